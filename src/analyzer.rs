//! # Eco Score Analyzer
//! Turns a venue's review texts (plus optional name/description) into five category
//! scores and a confidence level. Pure computation, no I/O.
//!
//! Order:
//! 1) input gates: no reviews → no usable review text → combined text too short
//! 2) every category scored against the same combined, lower-cased text
//! 3) lexicon-wide keyword matches feed the confidence level
//!
//! `analyze` never fails and never panics outward: every failure becomes an
//! all-absent result with `metadata.error` set. `try_analyze` exposes the typed
//! error for callers that want to branch on it.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde_json::Value;
use std::any::Any;
use std::borrow::Cow;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, warn};

use crate::config::{AnalysisThresholds, EngineConfig};
use crate::confidence::confidence_for_texts;
use crate::error::AnalysisError;
use crate::lexicon::{Lexicon, MatchMode};
use crate::logging::anon_hash;
use crate::places::reviews_from_value;
use crate::scoring::ScoringParams;
use crate::types::{CategoryScores, EcoScoreResult, PlaceContext, Review, ScoreMetadata};

static DEFAULT_ANALYZER: Lazy<EcoScoreAnalyzer> = Lazy::new(EcoScoreAnalyzer::new);

/// Scoring engine bound to a lexicon and a set of parameters.
/// Cheap to share across threads; holds no mutable state.
#[derive(Debug, Clone)]
pub struct EcoScoreAnalyzer {
    lexicon: Cow<'static, Lexicon>,
    scoring: ScoringParams,
    thresholds: AnalysisThresholds,
    match_mode: MatchMode,
}

impl Default for EcoScoreAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl EcoScoreAnalyzer {
    /// Built-in lexicon, production parameters, substring matching.
    pub fn new() -> Self {
        Self {
            lexicon: Cow::Borrowed(Lexicon::builtin()),
            scoring: ScoringParams::default(),
            thresholds: AnalysisThresholds::default(),
            match_mode: MatchMode::Substring,
        }
    }

    /// Build from config, loading the lexicon file if one is configured.
    pub fn from_config(cfg: &EngineConfig) -> anyhow::Result<Self> {
        let lexicon = match &cfg.lexicon_path {
            Some(path) => Cow::Owned(Lexicon::load_from(path)?),
            None => Cow::Borrowed(Lexicon::builtin()),
        };
        Ok(Self {
            lexicon,
            scoring: cfg.scoring.sanitized(),
            thresholds: cfg.analysis,
            match_mode: cfg.match_mode,
        })
    }

    pub fn with_lexicon(mut self, lexicon: Lexicon) -> Self {
        self.lexicon = Cow::Owned(lexicon);
        self
    }

    /// Unusable weights are replaced by their defaults.
    pub fn with_scoring(mut self, scoring: ScoringParams) -> Self {
        self.scoring = scoring.sanitized();
        self
    }

    pub fn with_thresholds(mut self, thresholds: AnalysisThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn with_match_mode(mut self, mode: MatchMode) -> Self {
        self.match_mode = mode;
        self
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn match_mode(&self) -> MatchMode {
        self.match_mode
    }

    /// Analyse reviews. Always returns a well-formed result.
    pub fn analyze(&self, reviews: &[Review], place: Option<PlaceContext<'_>>) -> EcoScoreResult {
        let now = Utc::now();
        guarded(reviews.len(), now, || self.analyze_at(reviews, place, now))
    }

    /// Analyse an untyped `reviews` value (e.g. straight from a JSON payload).
    /// Non-arrays are treated as "no reviews".
    pub fn analyze_value(&self, reviews: &Value, place: Option<PlaceContext<'_>>) -> EcoScoreResult {
        self.analyze(&reviews_from_value(reviews), place)
    }

    /// Same analysis with the insufficient-data cases as a typed error.
    pub fn try_analyze(
        &self,
        reviews: &[Review],
        place: Option<PlaceContext<'_>>,
    ) -> Result<EcoScoreResult, AnalysisError> {
        self.analyze_at(reviews, place, Utc::now())
    }

    fn analyze_at(
        &self,
        reviews: &[Review],
        place: Option<PlaceContext<'_>>,
        now: DateTime<Utc>,
    ) -> Result<EcoScoreResult, AnalysisError> {
        if reviews.is_empty() {
            return Err(AnalysisError::NoReviews);
        }

        let min_chars = self.thresholds.min_review_chars;
        let valid: Vec<&str> = reviews
            .iter()
            .map(|r| r.text.as_str())
            .filter(|t| t.trim().chars().count() > min_chars)
            .collect();
        if valid.is_empty() {
            return Err(AnalysisError::NoValidText {
                total: reviews.len(),
            });
        }

        let combined = combined_text(place, &valid);
        let text_length = combined.chars().count();
        if text_length < self.thresholds.min_combined_chars {
            return Err(AnalysisError::InsufficientText {
                valid: valid.len(),
                text_length,
            });
        }

        let mut scores = CategoryScores::default();
        for (category, keywords) in self.lexicon.iter() {
            scores.set(category, self.scoring.score(&combined, keywords, self.match_mode));
        }
        let keyword_matches = self.lexicon.total_matches(&combined, self.match_mode);
        let confidence_level = confidence_for_texts(&valid, keyword_matches);
        let valid_scores = scores.present_count();
        // Scoring params stricter than the input gates leave nothing scored.
        if valid_scores == 0 {
            return Err(AnalysisError::InsufficientText {
                valid: valid.len(),
                text_length,
            });
        }

        debug!(
            target: "eco_score",
            id = %anon_hash(&combined),
            reviews = valid.len(),
            total = reviews.len(),
            keyword_matches,
            confidence_level,
            valid_scores,
            "eco scores computed"
        );

        Ok(EcoScoreResult {
            scores,
            metadata: ScoreMetadata {
                reviews_analyzed: valid.len(),
                total_reviews: reviews.len(),
                confidence_level,
                last_calculated: now,
                keyword_matches,
                valid_scores,
                text_length,
                error: None,
                is_default: false,
            },
        })
    }
}

/// Analyse with the built-in lexicon and production parameters.
pub fn analyze_eco_scores(reviews: &[Review], place: Option<PlaceContext<'_>>) -> EcoScoreResult {
    DEFAULT_ANALYZER.analyze(reviews, place)
}

/// Run one analysis, folding typed errors and panics into a degraded result.
fn guarded<F>(total: usize, now: DateTime<Utc>, run: F) -> EcoScoreResult
where
    F: FnOnce() -> Result<EcoScoreResult, AnalysisError>,
{
    match panic::catch_unwind(AssertUnwindSafe(run)) {
        Ok(Ok(result)) => result,
        Ok(Err(err)) => {
            debug!(target: "eco_score", total, error = %err, "no eco scores");
            EcoScoreResult::degraded(&err, total, now)
        }
        Err(payload) => {
            let err = AnalysisError::Unexpected(panic_message(payload.as_ref()));
            warn!(target: "eco_score", total, error = %err, "eco scoring panicked");
            EcoScoreResult::degraded(&err, total, now)
        }
    }
}

/// Name, description and review texts; blank parts skipped, space-joined, lower-cased.
fn combined_text(place: Option<PlaceContext<'_>>, texts: &[&str]) -> String {
    let ctx = place.unwrap_or_default();
    ctx.name
        .into_iter()
        .chain(ctx.description)
        .filter(|s| !s.trim().is_empty())
        .chain(texts.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::EcoCategory;

    fn r(texts: &[&str]) -> Vec<Review> {
        texts.iter().map(|t| Review::new(*t)).collect()
    }

    #[test]
    fn combined_text_skips_blank_context() {
        let ctx = PlaceContext::new(Some("  "), Some("Hillside Lodge"));
        assert_eq!(combined_text(Some(ctx), &["Nice VIEW"]), "hillside lodge nice view");
        assert_eq!(combined_text(None, &["A", "B"]), "a b");
    }

    #[test]
    fn gates_run_in_order() {
        let a = EcoScoreAnalyzer::new();
        assert_eq!(a.try_analyze(&[], None), Err(AnalysisError::NoReviews));
        assert_eq!(
            a.try_analyze(&r(&["ok", "  fine  "]), None),
            Err(AnalysisError::NoValidText { total: 2 })
        );
        assert_eq!(
            a.try_analyze(&r(&["Lovely stay", "ok"]), None),
            Err(AnalysisError::InsufficientText {
                valid: 1,
                text_length: 11
            })
        );
    }

    #[test]
    fn place_text_counts_toward_minimum_length() {
        let a = EcoScoreAnalyzer::new();
        let reviews = r(&["Lovely stay with great breakfast"]);
        assert!(a.try_analyze(&reviews, None).is_err());
        let ctx = PlaceContext::new(Some("Riverside Farm Guesthouse"), None);
        let res = a.try_analyze(&reviews, Some(ctx)).unwrap();
        assert_eq!(res.metadata.valid_scores, 5);
    }

    #[test]
    fn custom_thresholds_apply() {
        let a = EcoScoreAnalyzer::new().with_thresholds(AnalysisThresholds {
            min_review_chars: 5,
            min_combined_chars: 10,
        });
        let res = a.analyze(&r(&["composting toilets"]), None);
        assert!(res.metadata.error.is_none());
        assert_eq!(res.scores.get(EcoCategory::WasteManagement), Some(3.5));
    }

    #[test]
    fn caught_panic_degrades_with_message() {
        let now = Utc::now();
        let res = guarded(3, now, || panic!("lexicon table corrupted"));
        assert!(res.is_degraded());
        assert_eq!(res.scores.present_count(), 0);
        assert_eq!(res.metadata.confidence_level, 1.0);
        assert_eq!(res.metadata.total_reviews, 3);
        assert_eq!(res.metadata.reviews_analyzed, 0);
        assert_eq!(
            res.metadata.error.as_deref(),
            Some("Analysis failed: lexicon table corrupted")
        );
    }

    #[test]
    fn guarded_passes_results_and_errors_through() {
        let now = Utc::now();
        let res = guarded(0, now, || Err(AnalysisError::NoReviews));
        assert_eq!(res.metadata.error.as_deref(), Some("No reviews available"));
        let reviews = r(&["Solar panels and composting toilets at this lovely farm stay"]);
        let ok = EcoScoreAnalyzer::new().try_analyze(&reviews, None).unwrap();
        let res = guarded(1, now, || Ok(ok.clone()));
        assert_eq!(res, ok);
    }

    #[test]
    fn strict_min_text_chars_reports_insufficient_text() {
        let a = EcoScoreAnalyzer::new().with_scoring(ScoringParams {
            min_text_chars: 500,
            ..ScoringParams::default()
        });
        let review = "Solar panels, composting toilets and a big organic vegetable garden";
        let res = a.analyze(&r(&[review]), None);
        assert_eq!(res.metadata.valid_scores, 0);
        assert_eq!(res.metadata.error.as_deref(), Some("Insufficient text for analysis"));
        assert_eq!(res.metadata.text_length, review.chars().count());
        assert_eq!(res.metadata.confidence_level, 1.0);
    }

    #[test]
    fn nan_weights_are_sanitized_on_the_builder() {
        let a = EcoScoreAnalyzer::new().with_scoring(ScoringParams {
            high_weight: f64::NAN,
            ..ScoringParams::default()
        });
        let review = "Solar panels, composting toilets and a big organic vegetable garden";
        let res = a.analyze(&r(&[review]), None);
        assert!(res.metadata.error.is_none());
        assert_eq!(res.metadata.valid_scores, 5);
        assert_eq!(res.scores.get(EcoCategory::EnergyEfficiency), Some(3.5));
    }

    #[test]
    fn panic_payloads_render() {
        let s: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(s.as_ref()), "boom");
        let s: Box<dyn Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(s.as_ref()), "bang");
        let s: Box<dyn Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(s.as_ref()), "unknown panic");
    }
}
