use std::collections::BTreeMap;

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// One exam question from the bundled bank.
///
/// Immutable once loaded. Options are keyed by their short label ("A".."D");
/// the `BTreeMap` keeps iteration in sorted-key order, so a given bank file
/// always yields the same option order regardless of its storage order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    number: u32,
    chapter_number: u32,
    text: String,
    options: BTreeMap<String, String>,
    correct_key: String,
    explanation: String,
}

impl Question {
    #[must_use]
    pub fn new(
        number: u32,
        chapter_number: u32,
        text: impl Into<String>,
        options: BTreeMap<String, String>,
        correct_key: impl Into<String>,
        explanation: impl Into<String>,
    ) -> Self {
        Self {
            number,
            chapter_number,
            text: text.into(),
            options,
            correct_key: correct_key.into(),
            explanation: explanation.into(),
        }
    }

    #[must_use]
    pub fn number(&self) -> u32 {
        self.number
    }

    /// Chapter this question belongs to, derived from its domain label.
    #[must_use]
    pub fn chapter_number(&self) -> u32 {
        self.chapter_number
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Option texts keyed by short label, iterated in sorted-key order.
    #[must_use]
    pub fn options(&self) -> &BTreeMap<String, String> {
        &self.options
    }

    #[must_use]
    pub fn correct_key(&self) -> &str {
        &self.correct_key
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
