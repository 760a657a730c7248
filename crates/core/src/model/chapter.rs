use chrono::{DateTime, Utc};
use std::collections::HashSet;
use thiserror::Error;

use crate::model::flashcard::Flashcard;
use crate::model::ids::CardId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ChapterError {
    #[error("chapter title cannot be empty")]
    EmptyTitle,

    #[error("duplicate card id in chapter: {0}")]
    DuplicateCardId(CardId),

    #[error("card not found in chapter: {0}")]
    CardNotFound(CardId),
}

//
// ─── CHAPTER ───────────────────────────────────────────────────────────────────
//

/// A numbered unit of study content grouping flashcards.
///
/// Progress statistics are always recomputed from the cards, never stored,
/// so the cards are the single source of truth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    number: u32,
    title: String,
    cards: Vec<Flashcard>,
}

impl Chapter {
    /// Creates a chapter over an ordered card list.
    ///
    /// # Errors
    ///
    /// Returns `ChapterError::EmptyTitle` for a blank title and
    /// `ChapterError::DuplicateCardId` if two cards share an id.
    pub fn new(
        number: u32,
        title: impl Into<String>,
        cards: Vec<Flashcard>,
    ) -> Result<Self, ChapterError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(ChapterError::EmptyTitle);
        }

        let mut seen = HashSet::new();
        for card in &cards {
            if !seen.insert(card.id()) {
                return Err(ChapterError::DuplicateCardId(card.id()));
            }
        }

        Ok(Self {
            number,
            title,
            cards,
        })
    }

    #[must_use]
    pub fn number(&self) -> u32 {
        self.number
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn cards(&self) -> &[Flashcard] {
        &self.cards
    }

    #[must_use]
    pub fn card(&self, id: CardId) -> Option<&Flashcard> {
        self.cards.iter().find(|card| card.id() == id)
    }

    fn card_mut(&mut self, id: CardId) -> Result<&mut Flashcard, ChapterError> {
        self.cards
            .iter_mut()
            .find(|card| card.id() == id)
            .ok_or(ChapterError::CardNotFound(id))
    }

    // ─── Derived statistics ────────────────────────────────────────────────

    #[must_use]
    pub fn total_count(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn reviewed_count(&self) -> usize {
        self.cards.iter().filter(|card| card.is_reviewed()).count()
    }

    #[must_use]
    pub fn mastered_count(&self) -> usize {
        self.cards.iter().filter(|card| card.is_mastered()).count()
    }

    #[must_use]
    pub fn favorite_count(&self) -> usize {
        self.cards.iter().filter(|card| card.is_favorite()).count()
    }

    /// Reviewed fraction of this chapter, expressed 0–100.
    ///
    /// An empty chapter reports 0. The result is clamped for display
    /// robustness even though the formula cannot leave the range.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn progress_percentage(&self) -> f64 {
        if self.cards.is_empty() {
            return 0.0;
        }
        let pct = 100.0 * self.reviewed_count() as f64 / self.cards.len() as f64;
        pct.clamp(0.0, 100.0)
    }

    // ─── Card state transitions ────────────────────────────────────────────

    /// Records a review of the given card at `now`.
    ///
    /// # Errors
    ///
    /// Returns `ChapterError::CardNotFound` for an unknown card id.
    pub fn mark_reviewed(
        &mut self,
        id: CardId,
        now: DateTime<Utc>,
    ) -> Result<&Flashcard, ChapterError> {
        let card = self.card_mut(id)?;
        card.mark_reviewed(now);
        Ok(card)
    }

    /// Sets the mastered flag on the given card.
    ///
    /// # Errors
    ///
    /// Returns `ChapterError::CardNotFound` for an unknown card id.
    pub fn set_mastered(
        &mut self,
        id: CardId,
        mastered: bool,
    ) -> Result<&Flashcard, ChapterError> {
        let card = self.card_mut(id)?;
        card.set_mastered(mastered);
        Ok(card)
    }

    /// Flips the favorite flag on the given card, returning the new value.
    ///
    /// # Errors
    ///
    /// Returns `ChapterError::CardNotFound` for an unknown card id.
    pub fn toggle_favorite(&mut self, id: CardId) -> Result<bool, ChapterError> {
        Ok(self.card_mut(id)?.toggle_favorite())
    }

    /// Rehydrates one card's state from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns `ChapterError::CardNotFound` for an unknown card id.
    pub fn restore_card_state(
        &mut self,
        id: CardId,
        is_reviewed: bool,
        is_mastered: bool,
        is_favorite: bool,
        attempt_count: u32,
        last_review_date: Option<DateTime<Utc>>,
    ) -> Result<(), ChapterError> {
        self.card_mut(id)?.restore_state(
            is_reviewed,
            is_mastered,
            is_favorite,
            attempt_count,
            last_review_date,
        );
        Ok(())
    }

    /// Clears review state on every card in the chapter.
    pub fn reset_progress(&mut self) {
        for card in &mut self.cards {
            card.reset();
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
