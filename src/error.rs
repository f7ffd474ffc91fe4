// src/error.rs
//! Typed failure reasons. None of these escape `EcoScoreAnalyzer::analyze`; they are
//! folded into `ScoreMetadata::error` so callers can assert on the message.

use thiserror::Error;

/// Why an analysis produced no scores. `Display` is the user-facing message stored
/// in `metadata.error`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error("No reviews available")]
    NoReviews,

    #[error("No valid review text found")]
    NoValidText { total: usize },

    #[error("Insufficient text for analysis")]
    InsufficientText { valid: usize, text_length: usize },

    #[error("Analysis failed: {0}")]
    Unexpected(String),
}

impl AnalysisError {
    /// True for the "not enough input" family; false for internal failures.
    pub fn is_insufficient_data(&self) -> bool {
        !matches!(self, AnalysisError::Unexpected(_))
    }
}

/// Unknown name passed where a category or match mode was expected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseNameError {
    #[error("unknown eco category `{0}`")]
    Category(String),

    #[error("unknown match mode `{0}` (expected `substring` or `word_boundary`)")]
    MatchMode(String),

    #[error("unknown venue type `{0}`")]
    VenueType(String),
}
