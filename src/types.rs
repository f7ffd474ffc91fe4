//! Records flowing in and out of the scoring engine.
//!
//! Wire names are camelCase so the output merges directly into stored venue
//! records (`energyEfficiencyScore`, `metadata.confidenceLevel`, ...).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;
use crate::lexicon::EcoCategory;
use crate::scoring::MIN_SCORE;

/// One review's free text. Author and rating are carried through from place
/// payloads but never read by scoring.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Review {
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
}

impl Review {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            author_name: None,
            rating: None,
        }
    }
}

/// Optional venue text analysed together with the reviews.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceContext<'a> {
    pub name: Option<&'a str>,
    pub description: Option<&'a str>,
}

impl<'a> PlaceContext<'a> {
    pub fn new(name: Option<&'a str>, description: Option<&'a str>) -> Self {
        Self { name, description }
    }
}

/// Five category scores; `None` means "no data".
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryScores {
    pub energy_efficiency_score: Option<f64>,
    pub waste_management_score: Option<f64>,
    pub water_conservation_score: Option<f64>,
    pub local_sourcing_score: Option<f64>,
    pub carbon_footprint_score: Option<f64>,
}

impl CategoryScores {
    pub fn get(&self, category: EcoCategory) -> Option<f64> {
        match category {
            EcoCategory::EnergyEfficiency => self.energy_efficiency_score,
            EcoCategory::WasteManagement => self.waste_management_score,
            EcoCategory::WaterConservation => self.water_conservation_score,
            EcoCategory::LocalSourcing => self.local_sourcing_score,
            EcoCategory::CarbonFootprint => self.carbon_footprint_score,
        }
    }

    pub fn set(&mut self, category: EcoCategory, score: Option<f64>) {
        let slot = match category {
            EcoCategory::EnergyEfficiency => &mut self.energy_efficiency_score,
            EcoCategory::WasteManagement => &mut self.waste_management_score,
            EcoCategory::WaterConservation => &mut self.water_conservation_score,
            EcoCategory::LocalSourcing => &mut self.local_sourcing_score,
            EcoCategory::CarbonFootprint => &mut self.carbon_footprint_score,
        };
        *slot = score;
    }

    pub fn iter(&self) -> impl Iterator<Item = (EcoCategory, Option<f64>)> + '_ {
        EcoCategory::ALL.into_iter().map(move |c| (c, self.get(c)))
    }

    /// Number of categories with a score.
    pub fn present_count(&self) -> usize {
        self.iter().filter(|(_, s)| s.is_some()).count()
    }
}

/// Audit record stored next to the scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreMetadata {
    pub reviews_analyzed: usize,
    #[serde(default)]
    pub total_reviews: usize,
    pub confidence_level: f64,
    pub last_calculated: DateTime<Utc>,
    #[serde(default)]
    pub keyword_matches: usize,
    #[serde(default)]
    pub valid_scores: usize,
    #[serde(default)]
    pub text_length: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_default: bool,
}

/// Output of one analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EcoScoreResult {
    pub scores: CategoryScores,
    pub metadata: ScoreMetadata,
}

impl EcoScoreResult {
    /// All-absent scores with the failure reason in `metadata.error`.
    pub fn degraded(err: &AnalysisError, total_reviews: usize, now: DateTime<Utc>) -> Self {
        let (reviews_analyzed, text_length) = match err {
            AnalysisError::NoReviews | AnalysisError::Unexpected(_) => (0, 0),
            AnalysisError::NoValidText { total } => (*total, 0),
            AnalysisError::InsufficientText { valid, text_length } => (*valid, *text_length),
        };
        Self {
            scores: CategoryScores::default(),
            metadata: ScoreMetadata {
                reviews_analyzed,
                total_reviews,
                confidence_level: MIN_SCORE,
                last_calculated: now,
                keyword_matches: 0,
                valid_scores: 0,
                text_length,
                error: Some(err.to_string()),
                is_default: false,
            },
        }
    }

    /// At least one category was scored.
    pub fn has_scores(&self) -> bool {
        self.scores.present_count() > 0
    }

    pub fn is_degraded(&self) -> bool {
        self.metadata.error.is_some() && !self.has_scores()
    }
}
