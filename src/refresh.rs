//! When a stored eco-score record should be recomputed.
//!
//! Baselines and low-confidence analyses are always refreshed; anything else is
//! refreshed once it is older than `max_age_days`.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::ScoreMetadata;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshPolicy {
    pub max_age_days: i64,
    pub min_confidence: f64,
}

impl Default for RefreshPolicy {
    fn default() -> Self {
        Self {
            max_age_days: 7,
            min_confidence: 3.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshReason {
    Baseline,
    LowConfidence,
    Expired,
}

impl fmt::Display for RefreshReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RefreshReason::Baseline => "scores are a venue-type baseline",
            RefreshReason::LowConfidence => "confidence below threshold",
            RefreshReason::Expired => "scores older than the refresh window",
        })
    }
}

impl RefreshPolicy {
    /// Clamp to usable values: at least one day, confidence within 1..=5.
    pub fn sanitized(self) -> Self {
        let d = Self::default();
        Self {
            max_age_days: self.max_age_days.max(1),
            min_confidence: if self.min_confidence.is_finite() {
                self.min_confidence.clamp(1.0, 5.0)
            } else {
                d.min_confidence
            },
        }
    }

    pub fn refresh_reason(&self, meta: &ScoreMetadata, now: DateTime<Utc>) -> Option<RefreshReason> {
        if meta.is_default {
            return Some(RefreshReason::Baseline);
        }
        if meta.confidence_level < self.min_confidence {
            return Some(RefreshReason::LowConfidence);
        }
        // A timestamp in the future (clock skew) counts as fresh.
        let window = Duration::try_days(self.max_age_days)?;
        (now - meta.last_calculated >= window).then_some(RefreshReason::Expired)
    }

    pub fn needs_refresh(&self, meta: &ScoreMetadata, now: DateTime<Utc>) -> bool {
        self.refresh_reason(meta, now).is_some()
    }
}
