use rand::Rng;
use rand::seq::SliceRandom;

use prep_core::Clock;
use prep_core::model::{QuizQuestion, QuizSession};

use crate::bank::QuestionBank;

/// Number of questions a quiz asks for when the caller has no preference.
pub const DEFAULT_QUIZ_SIZE: usize = 50;

/// Builds quiz sessions by sampling the question pool.
///
/// Stateless apart from the injected clock; every call reads the pool fresh.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuizService {
    clock: Clock,
}

impl QuizService {
    #[must_use]
    pub fn new(clock: Clock) -> Self {
        Self { clock }
    }

    /// Generate a quiz for one chapter using the thread RNG.
    ///
    /// See [`QuizService::generate_with_rng`] for the full contract.
    #[must_use]
    pub fn generate(
        &self,
        bank: &QuestionBank,
        chapter_number: u32,
        count: usize,
    ) -> QuizSession {
        let mut rng = rand::rng();
        self.generate_with_rng(&mut rng, bank, chapter_number, count)
    }

    /// Generate a quiz for one chapter with an explicit randomness source.
    ///
    /// Filters the pool to the chapter's questions, snapshots each into a
    /// [`QuizQuestion`], applies a uniform shuffle, and keeps at most
    /// `count`. A chapter with no questions yields an empty session, and a
    /// `count` beyond the available questions uses all of them; neither is
    /// an error.
    #[must_use]
    pub fn generate_with_rng<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        bank: &QuestionBank,
        chapter_number: u32,
        count: usize,
    ) -> QuizSession {
        let mut questions: Vec<QuizQuestion> = bank
            .for_chapter(chapter_number)
            .map(QuizQuestion::from_question)
            .collect();

        questions.shuffle(rng);
        questions.truncate(count);

        QuizSession::new(chapter_number, questions, self.clock.now())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
