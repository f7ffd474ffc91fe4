// src/config.rs
//! Engine configuration (TOML or JSON).
//!
//! ```toml
//! match_mode = "substring"      # or "word_boundary"
//! lexicon_path = "lexicon.toml" # optional, relative to this file
//!
//! [scoring]
//! base = 2.5
//! high_weight = 0.6
//! medium_weight = 0.3
//! negative_weight = 0.4
//! min_text_chars = 10
//!
//! [analysis]
//! min_review_chars = 5
//! min_combined_chars = 50
//!
//! [refresh]
//! max_age_days = 7
//! min_confidence = 3.0
//! ```
//!
//! Every section and key is optional; missing values use the production defaults.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::lexicon::MatchMode;
use crate::refresh::RefreshPolicy;
use crate::scoring::ScoringParams;

// --- env defaults & names ---
pub const DEFAULT_CONFIG_PATH_TOML: &str = "config/eco_scoring.toml";
pub const DEFAULT_CONFIG_PATH_JSON: &str = "config/eco_scoring.json";

pub const ENV_CONFIG_PATH: &str = "ECO_SCORING_CONFIG_PATH";
pub const ENV_MATCH_MODE: &str = "ECO_MATCH_MODE";

/// Input gates applied before any scoring happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisThresholds {
    /// A review needs more than this many trimmed chars to be analysed.
    pub min_review_chars: usize,
    /// Combined text shorter than this is not scored.
    pub min_combined_chars: usize,
}

impl Default for AnalysisThresholds {
    fn default() -> Self {
        Self {
            min_review_chars: 5,
            min_combined_chars: 50,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub match_mode: MatchMode,
    pub lexicon_path: Option<PathBuf>,
    pub scoring: ScoringParams,
    pub analysis: AnalysisThresholds,
    pub refresh: RefreshPolicy,
}

impl EngineConfig {
    /// Load from an explicit path. `.json` is parsed as JSON, anything else as TOML.
    /// A relative `lexicon_path` is resolved against the config file's directory.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading eco scoring config from {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let mut cfg = if ext == "json" {
            serde_json::from_str::<Self>(&content)
                .with_context(|| format!("parsing JSON config {}", path.display()))?
        } else {
            Self::from_toml_str(&content)
                .with_context(|| format!("parsing TOML config {}", path.display()))?
        };

        if let (Some(lex), Some(dir)) = (cfg.lexicon_path.as_ref(), path.parent()) {
            if lex.is_relative() {
                cfg.lexicon_path = Some(dir.join(lex));
            }
        }
        Ok(cfg.sanitized())
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let cfg: Self = toml::from_str(s)?;
        Ok(cfg.sanitized())
    }

    /// Resolve the config using env var + fallbacks:
    /// 1) $ECO_SCORING_CONFIG_PATH (must exist)
    /// 2) config/eco_scoring.toml
    /// 3) config/eco_scoring.json
    /// 4) built-in defaults
    ///
    /// `$ECO_MATCH_MODE` then overrides `match_mode`.
    pub fn load_default() -> Result<Self> {
        let mut cfg = match std::env::var(ENV_CONFIG_PATH) {
            Ok(p) => {
                let pb = PathBuf::from(p);
                if !pb.exists() {
                    return Err(anyhow!(
                        "{ENV_CONFIG_PATH} points to non-existent path {}",
                        pb.display()
                    ));
                }
                Self::load_from(&pb)?
            }
            Err(_) => {
                let toml_p = Path::new(DEFAULT_CONFIG_PATH_TOML);
                let json_p = Path::new(DEFAULT_CONFIG_PATH_JSON);
                if toml_p.exists() {
                    Self::load_from(toml_p)?
                } else if json_p.exists() {
                    Self::load_from(json_p)?
                } else {
                    info!(target: "eco_score", "no config file found, using built-in defaults");
                    Self::default()
                }
            }
        };

        if let Some(mode) = parse_match_mode_env(std::env::var(ENV_MATCH_MODE).ok()) {
            cfg.match_mode = mode;
        }
        Ok(cfg)
    }

    /// Replace unusable values with defaults.
    pub fn sanitized(mut self) -> Self {
        self.scoring = self.scoring.sanitized();
        self.refresh = self.refresh.sanitized();
        if self.scoring.min_text_chars == 0 {
            self.scoring.min_text_chars = ScoringParams::default().min_text_chars;
        }
        // Text that passes the combined-length gate must be scorable.
        let gate = self.analysis.min_combined_chars.max(1);
        if self.scoring.min_text_chars > gate {
            warn!(
                target: "eco_score",
                min_text_chars = self.scoring.min_text_chars,
                min_combined_chars = gate,
                "clamping scoring.min_text_chars to the combined-text gate"
            );
            self.scoring.min_text_chars = gate;
        }
        self
    }
}

// parse optional match-mode env; an unknown value is ignored with a warning
fn parse_match_mode_env(raw: Option<String>) -> Option<MatchMode> {
    let raw = raw?;
    if raw.trim().is_empty() {
        return None;
    }
    match raw.parse() {
        Ok(mode) => Some(mode),
        Err(e) => {
            warn!(target: "eco_score", error = %e, "ignoring {ENV_MATCH_MODE}");
            None
        }
    }
}
