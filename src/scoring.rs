//! Category score calculator.
//!
//! Start from a neutral midpoint and move it by the number of distinct keywords of
//! each tier found in the text:
//!
//! score = base + w_high·#high + w_medium·#medium − w_negative·#negative
//!
//! The result is clamped to [1,5] and snapped to the nearest half point.

use serde::{Deserialize, Serialize};

use crate::lexicon::{LexiconCategory, MatchMode, TierCounts};

pub const MIN_SCORE: f64 = 1.0;
pub const MAX_SCORE: f64 = 5.0;

/// Tunable weights for the category score. Defaults are the production values.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringParams {
    pub base: f64,
    pub high_weight: f64,
    pub medium_weight: f64,
    pub negative_weight: f64,
    /// Texts shorter than this (after trimming, in chars) get no score.
    pub min_text_chars: usize,
}

impl Default for ScoringParams {
    fn default() -> Self {
        Self {
            base: 2.5,
            high_weight: 0.6,
            medium_weight: 0.3,
            negative_weight: 0.4,
            min_text_chars: 10,
        }
    }
}

impl ScoringParams {
    /// Replace non-finite or negative weights with their defaults.
    pub fn sanitized(self) -> Self {
        let d = Self::default();
        let pick = |v: f64, fallback: f64| if v.is_finite() && v >= 0.0 { v } else { fallback };
        Self {
            base: if self.base.is_finite() { self.base } else { d.base },
            high_weight: pick(self.high_weight, d.high_weight),
            medium_weight: pick(self.medium_weight, d.medium_weight),
            negative_weight: pick(self.negative_weight, d.negative_weight),
            min_text_chars: self.min_text_chars,
        }
    }

    /// Score `text` against one lexicon category. `None` means "no opinion".
    pub fn score(&self, text: &str, category: &LexiconCategory, mode: MatchMode) -> Option<f64> {
        let trimmed = text.trim();
        if trimmed.is_empty() || trimmed.chars().count() < self.min_text_chars {
            return None;
        }
        let lowered = text.to_lowercase();
        self.score_counts(category.tier_counts(&lowered, mode))
    }

    /// Map tier counts to a half-step score in [1,5].
    pub fn score_counts(&self, counts: TierCounts) -> Option<f64> {
        let raw = self.base + self.high_weight * counts.high as f64
            + self.medium_weight * counts.medium as f64
            - self.negative_weight * counts.negative as f64;
        if !raw.is_finite() {
            return None;
        }
        Some(round_half(raw.clamp(MIN_SCORE, MAX_SCORE)))
    }
}

/// Score with production weights and substring matching.
pub fn calculate_category_score(text: &str, category: &LexiconCategory) -> Option<f64> {
    ScoringParams::default().score(text, category, MatchMode::Substring)
}

/// Nearest half point, ties rounded up (`floor(2x + 0.5) / 2`).
pub fn round_half(x: f64) -> f64 {
    (x * 2.0 + 0.5).floor() / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::{EcoCategory, Lexicon};

    fn waste() -> &'static LexiconCategory {
        Lexicon::builtin().category(EcoCategory::WasteManagement)
    }

    #[test]
    fn round_half_snaps_and_rounds_ties_up() {
        assert_eq!(round_half(3.7), 3.5);
        assert_eq!(round_half(3.8), 4.0);
        assert_eq!(round_half(1.25), 1.5);
        assert_eq!(round_half(1.75), 2.0);
        assert_eq!(round_half(2.5), 2.5);
    }

    #[test]
    fn neutral_text_scores_midpoint() {
        let s = calculate_category_score("The staff were friendly and kind.", waste());
        assert_eq!(s, Some(2.5));
    }

    #[test]
    fn short_or_empty_text_has_no_score() {
        assert_eq!(calculate_category_score("", waste()), None);
        assert_eq!(calculate_category_score("   compost   ", waste()), None);
        assert_eq!(calculate_category_score("recycled!", waste()), None);
    }

    #[test]
    fn high_keywords_raise_and_negatives_lower() {
        // recycling + zero waste: 2.5 + 1.2 = 3.7 -> 3.5
        let up = calculate_category_score("They do recycling and aim for zero waste.", waste());
        assert_eq!(up, Some(3.5));
        // disposable + styrofoam + litter: 2.5 - 1.2 = 1.3 -> 1.5
        let down = calculate_category_score("Disposable cups, styrofoam boxes, litter.", waste());
        assert_eq!(down, Some(1.5));
    }

    #[test]
    fn presence_not_frequency() {
        let once = calculate_category_score("recycling is available here", waste());
        let many = calculate_category_score("recycling recycling recycling recycling", waste());
        assert_eq!(once, many);
    }

    #[test]
    fn clamps_to_bounds() {
        let p = ScoringParams::default();
        let top = p.score_counts(TierCounts { high: 20, medium: 0, negative: 0 });
        let bottom = p.score_counts(TierCounts { high: 0, medium: 0, negative: 20 });
        assert_eq!(top, Some(5.0));
        assert_eq!(bottom, Some(1.0));
    }

    #[test]
    fn sanitized_restores_broken_weights() {
        let p = ScoringParams {
            base: f64::NAN,
            high_weight: -1.0,
            medium_weight: f64::INFINITY,
            negative_weight: 0.2,
            min_text_chars: 3,
        }
        .sanitized();
        assert_eq!(p.base, 2.5);
        assert_eq!(p.high_weight, 0.6);
        assert_eq!(p.medium_weight, 0.3);
        assert_eq!(p.negative_weight, 0.2);
        assert_eq!(p.min_text_chars, 3);
    }

    #[test]
    fn word_boundary_mode_ignores_embedded_matches() {
        let energy = Lexicon::builtin().category(EcoCategory::EnergyEfficiency);
        let text = "an inefficient old boiler in the basement";
        let p = ScoringParams::default();
        // substring: "efficient" (+0.3) and "inefficient" (-0.4) both hit -> 2.4 -> 2.5
        assert_eq!(p.score(text, energy, MatchMode::Substring), Some(2.5));
        // word boundary: only "inefficient" -> 2.1 -> 2.0
        assert_eq!(p.score(text, energy, MatchMode::WordBoundary), Some(2.0));
    }
}
