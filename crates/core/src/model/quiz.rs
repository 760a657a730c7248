use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ids::SessionId;
use crate::model::question::Question;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("quiz session is already completed")]
    AlreadyCompleted,

    #[error("question index {index} out of range (session has {len})")]
    QuestionOutOfRange { index: usize, len: usize },

    #[error("option index {index} out of range (question has {len})")]
    OptionOutOfRange { index: usize, len: usize },
}

//
// ─── QUIZ QUESTION ─────────────────────────────────────────────────────────────
//

/// Snapshot of a bank question taken when a quiz is generated.
///
/// Options are flattened into a `Vec` in sorted-key order and the correct
/// answer becomes an index into that list. When the declared correct-answer
/// key is missing from the options the index falls back to 0 instead of
/// failing the whole quiz; this mirrors the bank's historical behavior and
/// must not be "fixed" here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizQuestion {
    number: u32,
    text: String,
    options: Vec<String>,
    correct_index: usize,
    explanation: String,
    selected: Option<usize>,
}

impl QuizQuestion {
    /// Builds a snapshot from a pool question.
    #[must_use]
    pub fn from_question(question: &Question) -> Self {
        let options: Vec<String> = question.options().values().cloned().collect();
        let correct_index = question
            .options()
            .keys()
            .position(|key| key == question.correct_key())
            .unwrap_or(0);

        Self {
            number: question.number(),
            text: question.text().to_owned(),
            options,
            correct_index,
            explanation: question.explanation().to_owned(),
            selected: None,
        }
    }

    #[must_use]
    pub fn number(&self) -> u32 {
        self.number
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn correct_index(&self) -> usize {
        self.correct_index
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    #[must_use]
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    #[must_use]
    pub fn is_answered(&self) -> bool {
        self.selected.is_some()
    }

    /// True when an answer is selected and it is the correct one.
    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.selected == Some(self.correct_index)
    }
}

//
// ─── QUIZ SESSION ──────────────────────────────────────────────────────────────
//

/// One quiz attempt over a chapter's questions.
///
/// Sessions are ephemeral: they live for the duration of a quiz run and are
/// never persisted. An empty question list is a valid session (the chapter
/// simply has no questions in the bank), not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSession {
    id: SessionId,
    chapter_number: u32,
    questions: Vec<QuizQuestion>,
    score: u32,
    created_at: DateTime<Utc>,
    completed: bool,
}

impl QuizSession {
    #[must_use]
    pub fn new(
        chapter_number: u32,
        questions: Vec<QuizQuestion>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: SessionId::new(),
            chapter_number,
            questions,
            score: 0,
            created_at,
            completed: false,
        }
    }

    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub fn chapter_number(&self) -> u32 {
        self.chapter_number
    }

    #[must_use]
    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Score as counted by the last `complete()` call.
    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.questions.iter().filter(|q| q.is_answered()).count()
    }

    #[must_use]
    pub fn correct_count(&self) -> usize {
        self.questions.iter().filter(|q| q.is_correct()).count()
    }

    /// Records an answer selection for one question.
    ///
    /// Re-selecting overwrites the previous choice.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::AlreadyCompleted` on a finished session and an
    /// out-of-range error for bad question or option indexes.
    pub fn select_answer(
        &mut self,
        question_index: usize,
        option_index: usize,
    ) -> Result<(), QuizError> {
        if self.completed {
            return Err(QuizError::AlreadyCompleted);
        }

        let len = self.questions.len();
        let question = self
            .questions
            .get_mut(question_index)
            .ok_or(QuizError::QuestionOutOfRange {
                index: question_index,
                len,
            })?;

        if option_index >= question.options.len() {
            return Err(QuizError::OptionOutOfRange {
                index: option_index,
                len: question.options.len(),
            });
        }

        question.selected = Some(option_index);
        Ok(())
    }

    /// Finalizes the session: counts correct selections into the score and
    /// marks the session completed. Idempotent.
    pub fn complete(&mut self) -> u32 {
        if !self.completed {
            self.score = u32::try_from(self.correct_count()).unwrap_or(u32::MAX);
            self.completed = true;
        }
        self.score
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
