// src/lib.rs
// Public library surface for integration tests and embedding in the venue service.

pub mod analyzer;
pub mod config;
pub mod confidence;
pub mod defaults;
pub mod error;
pub mod lexicon;
pub mod logging;
pub mod places;
pub mod refresh;
pub mod scoring;
pub mod types;

// ---- Re-exports for stable public API ----
pub use analyzer::{analyze_eco_scores, EcoScoreAnalyzer};
pub use config::{AnalysisThresholds, EngineConfig};
pub use confidence::calculate_confidence_level;
pub use defaults::{get_default_eco_scores, DefaultEcoScores, DefaultScoreSet, VenueType};
pub use error::{AnalysisError, ParseNameError};
pub use lexicon::{EcoCategory, Lexicon, LexiconCategory, MatchMode};
pub use places::{reviews_from_value, score_place, PlaceDetails};
pub use refresh::{RefreshPolicy, RefreshReason};
pub use scoring::{calculate_category_score, ScoringParams};
pub use types::{CategoryScores, EcoScoreResult, PlaceContext, Review, ScoreMetadata};
