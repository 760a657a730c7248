use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use prep_core::model::{CardId, Chapter, Flashcard};

/// Persisted shape for one card's review state.
///
/// This mirrors only the non-derivable fields of a `Flashcard`. Question and
/// answer text are always reloaded from the default catalog so content
/// updates in a new release are never masked by stale persisted copies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardStateRecord {
    pub card_id: CardId,
    pub is_reviewed: bool,
    pub is_mastered: bool,
    pub is_favorite: bool,
    pub attempt_count: u32,
    pub last_review_date: Option<DateTime<Utc>>,
}

impl CardStateRecord {
    #[must_use]
    pub fn from_card(card: &Flashcard) -> Self {
        Self {
            card_id: card.id(),
            is_reviewed: card.is_reviewed(),
            is_mastered: card.is_mastered(),
            is_favorite: card.is_favorite(),
            attempt_count: card.attempt_count(),
            last_review_date: card.last_review_date(),
        }
    }
}

/// Persisted shape for one chapter's worth of card state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterStateRecord {
    pub chapter_number: u32,
    pub cards: Vec<CardStateRecord>,
}

impl ChapterStateRecord {
    #[must_use]
    pub fn from_chapter(chapter: &Chapter) -> Self {
        Self {
            chapter_number: chapter.number(),
            cards: chapter.cards().iter().map(CardStateRecord::from_card).collect(),
        }
    }

    /// Rehydrate this record's state into a chapter built from the catalog.
    ///
    /// Cards are matched by id. Persisted ids unknown to the current catalog
    /// are skipped (the card was removed in a content update); catalog cards
    /// without a persisted record keep their zero-value flags.
    pub fn apply_to(&self, chapter: &mut Chapter) {
        for record in &self.cards {
            let _ = chapter.restore_card_state(
                record.card_id,
                record.is_reviewed,
                record.is_mastered,
                record.is_favorite,
                record.attempt_count,
                record.last_review_date,
            );
        }
    }
}
