//! Confidence level for an analysis, in half steps on the 1..=5 scale.
//!
//! Starts at 1 and adds four independent bonuses: review volume, average review
//! length, keyword relevance and the share of reviews with real content. Within
//! each bonus only the highest matching bracket applies.

use crate::scoring::{round_half, MAX_SCORE, MIN_SCORE};
use crate::types::Review;

/// Reviews at or below this many trimmed chars don't count as "quality" reviews.
const QUALITY_MIN_CHARS: usize = 10;

/// (min review count, bonus), highest first.
const COUNT_BRACKETS: [(usize, f64); 4] = [(50, 2.0), (20, 1.5), (10, 1.0), (5, 0.5)];
/// (min average length in chars, bonus), highest first.
const LENGTH_BRACKETS: [(f64, f64); 2] = [(200.0, 1.0), (100.0, 0.5)];
/// (min keyword matches, bonus), highest first.
const MATCH_BRACKETS: [(usize, f64); 3] = [(20, 1.0), (10, 0.5), (5, 0.25)];
const QUALITY_RATIO_WEIGHT: f64 = 0.5;

/// Confidence in [1,5] (half steps) for scores derived from `reviews` with
/// `total_keyword_matches` lexicon hits. Empty input is the lowest confidence.
pub fn calculate_confidence_level(reviews: &[Review], total_keyword_matches: usize) -> f64 {
    let texts: Vec<&str> = reviews.iter().map(|r| r.text.as_str()).collect();
    confidence_for_texts(&texts, total_keyword_matches)
}

pub(crate) fn confidence_for_texts(texts: &[&str], total_keyword_matches: usize) -> f64 {
    if texts.is_empty() {
        return MIN_SCORE;
    }

    let quality: Vec<&str> = texts
        .iter()
        .copied()
        .filter(|t| t.trim().chars().count() > QUALITY_MIN_CHARS)
        .collect();

    let avg_len = if quality.is_empty() {
        0.0
    } else {
        let total: usize = quality.iter().map(|t| t.chars().count()).sum();
        total as f64 / quality.len() as f64
    };

    let count_bonus = first_bracket(&COUNT_BRACKETS, |min| texts.len() >= min);
    let length_bonus = first_bracket(&LENGTH_BRACKETS, |min| avg_len >= min);
    let match_bonus = first_bracket(&MATCH_BRACKETS, |min| total_keyword_matches >= min);
    let quality_ratio = quality.len() as f64 / texts.len().max(1) as f64;
    let quality_bonus = QUALITY_RATIO_WEIGHT * quality_ratio;

    let confidence = MIN_SCORE + count_bonus + length_bonus + match_bonus + quality_bonus;
    if !confidence.is_finite() {
        return MIN_SCORE;
    }
    round_half(confidence.clamp(MIN_SCORE, MAX_SCORE))
}

fn first_bracket<T: Copy>(brackets: &[(T, f64)], hit: impl Fn(T) -> bool) -> f64 {
    brackets
        .iter()
        .find(|(min, _)| hit(*min))
        .map(|(_, bonus)| *bonus)
        .unwrap_or(0.0)
}
