use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ids::CardId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FlashcardError {
    #[error("flashcard question cannot be empty")]
    EmptyQuestion,

    #[error("flashcard answer cannot be empty")]
    EmptyAnswer,
}

//
// ─── FLASHCARD ─────────────────────────────────────────────────────────────────
//

/// One question/answer pair with its review state.
///
/// Content (question/answer) is fixed at construction; only the review flags,
/// the attempt counter, and the last-review timestamp change afterwards.
/// A mastered card is always also reviewed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flashcard {
    id: CardId,
    question: String,
    answer: String,
    is_reviewed: bool,
    is_mastered: bool,
    is_favorite: bool,
    attempt_count: u32,
    last_review_date: Option<DateTime<Utc>>,
}

impl Flashcard {
    /// Creates a fresh card with all review state at zero.
    ///
    /// # Errors
    ///
    /// Returns `FlashcardError` if the question or answer text is blank.
    pub fn new(
        id: CardId,
        question: impl Into<String>,
        answer: impl Into<String>,
    ) -> Result<Self, FlashcardError> {
        let question = question.into();
        let answer = answer.into();
        if question.trim().is_empty() {
            return Err(FlashcardError::EmptyQuestion);
        }
        if answer.trim().is_empty() {
            return Err(FlashcardError::EmptyAnswer);
        }

        Ok(Self {
            id,
            question,
            answer,
            is_reviewed: false,
            is_mastered: false,
            is_favorite: false,
            attempt_count: 0,
            last_review_date: None,
        })
    }

    #[must_use]
    pub fn id(&self) -> CardId {
        self.id
    }

    #[must_use]
    pub fn question(&self) -> &str {
        &self.question
    }

    #[must_use]
    pub fn answer(&self) -> &str {
        &self.answer
    }

    #[must_use]
    pub fn is_reviewed(&self) -> bool {
        self.is_reviewed
    }

    #[must_use]
    pub fn is_mastered(&self) -> bool {
        self.is_mastered
    }

    #[must_use]
    pub fn is_favorite(&self) -> bool {
        self.is_favorite
    }

    #[must_use]
    pub fn attempt_count(&self) -> u32 {
        self.attempt_count
    }

    #[must_use]
    pub fn last_review_date(&self) -> Option<DateTime<Utc>> {
        self.last_review_date
    }

    /// Records a review of this card at `now`.
    ///
    /// The reviewed flag is idempotent; the attempt counter is not and
    /// increments on every call.
    pub fn mark_reviewed(&mut self, now: DateTime<Utc>) {
        self.is_reviewed = true;
        self.attempt_count = self.attempt_count.saturating_add(1);
        self.last_review_date = Some(now);
    }

    /// Sets the mastered flag.
    ///
    /// Mastering a card forces the reviewed flag on; un-mastering leaves the
    /// reviewed flag untouched.
    pub fn set_mastered(&mut self, mastered: bool) {
        self.is_mastered = mastered;
        if mastered {
            self.is_reviewed = true;
        }
    }

    /// Flips the favorite flag and returns the new value.
    pub fn toggle_favorite(&mut self) -> bool {
        self.is_favorite = !self.is_favorite;
        self.is_favorite
    }

    /// Rehydrates review state from persisted storage.
    ///
    /// Content fields are never persisted, so only the state flags arrive
    /// here. The mastered ⇒ reviewed invariant is re-enforced on whatever
    /// was stored.
    pub fn restore_state(
        &mut self,
        is_reviewed: bool,
        is_mastered: bool,
        is_favorite: bool,
        attempt_count: u32,
        last_review_date: Option<DateTime<Utc>>,
    ) {
        self.is_reviewed = is_reviewed || is_mastered;
        self.is_mastered = is_mastered;
        self.is_favorite = is_favorite;
        self.attempt_count = attempt_count;
        self.last_review_date = last_review_date;
    }

    /// Clears all review state back to the fresh-card defaults.
    pub fn reset(&mut self) {
        self.is_reviewed = false;
        self.is_mastered = false;
        self.is_favorite = false;
        self.attempt_count = 0;
        self.last_review_date = None;
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    fn build_card() -> Flashcard {
        Flashcard::new(CardId::new(1), "What is CPTED?", "Crime Prevention Through Environmental Design").unwrap()
    }

    #[test]
    fn card_fails_if_question_empty() {
        let err = Flashcard::new(CardId::new(1), "   ", "answer").unwrap_err();
        assert!(matches!(err, FlashcardError::EmptyQuestion));
    }

    #[test]
    fn card_fails_if_answer_empty() {
        let err = Flashcard::new(CardId::new(1), "question", " ").unwrap_err();
        assert!(matches!(err, FlashcardError::EmptyAnswer));
    }

    #[test]
    fn fresh_card_has_zero_state() {
        let card = build_card();
        assert!(!card.is_reviewed());
        assert!(!card.is_mastered());
        assert!(!card.is_favorite());
        assert_eq!(card.attempt_count(), 0);
        assert_eq!(card.last_review_date(), None);
    }

    #[test]
    fn mark_reviewed_sets_flag_and_counts_attempts() {
        let mut card = build_card();
        let now = fixed_now();

        card.mark_reviewed(now);
        card.mark_reviewed(now);

        assert!(card.is_reviewed());
        assert_eq!(card.attempt_count(), 2);
        assert_eq!(card.last_review_date(), Some(now));
    }

    #[test]
    fn mastering_forces_reviewed() {
        let mut card = build_card();
        card.set_mastered(true);
        assert!(card.is_mastered());
        assert!(card.is_reviewed());
    }

    #[test]
    fn unmastering_leaves_reviewed_untouched() {
        let mut card = build_card();
        card.mark_reviewed(fixed_now());
        card.set_mastered(true);
        card.set_mastered(false);
        assert!(!card.is_mastered());
        assert!(card.is_reviewed());
    }

    #[test]
    fn toggle_favorite_flips_and_reports() {
        let mut card = build_card();
        assert!(card.toggle_favorite());
        assert!(card.is_favorite());
        assert!(!card.toggle_favorite());
        assert!(!card.is_favorite());
    }

    #[test]
    fn restore_enforces_mastered_implies_reviewed() {
        let mut card = build_card();
        card.restore_state(false, true, false, 3, Some(fixed_now()));
        assert!(card.is_mastered());
        assert!(card.is_reviewed());
        assert_eq!(card.attempt_count(), 3);
    }

    #[test]
    fn reset_clears_all_state() {
        let mut card = build_card();
        card.mark_reviewed(fixed_now());
        card.set_mastered(true);
        card.toggle_favorite();

        card.reset();

        assert!(!card.is_reviewed());
        assert!(!card.is_mastered());
        assert!(!card.is_favorite());
        assert_eq!(card.attempt_count(), 0);
        assert_eq!(card.last_review_date(), None);
    }
}
