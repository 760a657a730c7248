use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::Deserialize;

use prep_core::model::Question;

use crate::error::LoadError;

//
// ─── RAW FILE SCHEMA ───────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize)]
struct BankFile {
    total_questions: u32,
    questions_by_domain: BTreeMap<String, u32>,
    questions: Vec<RawQuestion>,
}

#[derive(Debug, Deserialize)]
struct RawQuestion {
    number: u32,
    domain: String,
    question: String,
    options: BTreeMap<String, String>,
    correct_answer: String,
    explanation: String,
}

//
// ─── DOMAIN LABEL PARSING ──────────────────────────────────────────────────────
//

/// Derives a chapter number from a domain label such as `"Domain 3"`.
///
/// Splits on whitespace, takes the last token, and parses it as an integer.
/// Any failure yields `0` rather than an error: loading is total-or-nothing,
/// and a record with an odd label should not sink the whole bank.
#[must_use]
pub fn chapter_number_from_domain(label: &str) -> u32 {
    label
        .split_whitespace()
        .next_back()
        .and_then(|token| token.parse().ok())
        .unwrap_or(0)
}

//
// ─── QUESTION BANK ─────────────────────────────────────────────────────────────
//

/// Immutable pool of exam questions, loaded once at startup.
///
/// Source order is preserved; no deduplication is performed.
#[derive(Debug)]
pub struct QuestionBank {
    questions: Vec<Question>,
    total_declared: u32,
    questions_by_domain: BTreeMap<String, u32>,
}

impl QuestionBank {
    /// An empty pool, used when the bundled bank cannot be loaded.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            questions: Vec::new(),
            total_declared: 0,
            questions_by_domain: BTreeMap::new(),
        }
    }

    /// Load the bank from a JSON file on disk.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::NotFound` if the file is absent and
    /// `LoadError::Malformed` if it cannot be read or parsed. Either way no
    /// partial pool is produced.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let payload = fs::read_to_string(path).map_err(|err| {
            if err.kind() == ErrorKind::NotFound {
                LoadError::NotFound {
                    path: path.display().to_string(),
                }
            } else {
                LoadError::Malformed {
                    reason: err.to_string(),
                }
            }
        })?;
        Self::from_json(&payload)
    }

    /// Parse the bank from an in-memory JSON document.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::Malformed` if the document does not match the
    /// bank schema.
    pub fn from_json(payload: &str) -> Result<Self, LoadError> {
        let file: BankFile = serde_json::from_str(payload).map_err(|err| LoadError::Malformed {
            reason: err.to_string(),
        })?;

        let questions = file
            .questions
            .into_iter()
            .map(|raw| {
                let chapter_number = chapter_number_from_domain(&raw.domain);
                Question::new(
                    raw.number,
                    chapter_number,
                    raw.question,
                    raw.options,
                    raw.correct_answer,
                    raw.explanation,
                )
            })
            .collect();

        Ok(Self {
            questions,
            total_declared: file.total_questions,
            questions_by_domain: file.questions_by_domain,
        })
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Questions whose derived chapter number matches, in source order.
    pub fn for_chapter(&self, chapter_number: u32) -> impl Iterator<Item = &Question> {
        self.questions
            .iter()
            .filter(move |q| q.chapter_number() == chapter_number)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// The `total_questions` count declared by the source file.
    #[must_use]
    pub fn total_declared(&self) -> u32 {
        self.total_declared
    }

    /// The per-domain counts declared by the source file.
    #[must_use]
    pub fn questions_by_domain(&self) -> &BTreeMap<String, u32> {
        &self.questions_by_domain
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
