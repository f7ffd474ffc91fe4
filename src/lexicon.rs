//! Eco keyword lexicon: five categories, each split into `high`, `medium` and
//! `negative` tiers.
//!
//! The built-in table is immutable and compiled once. A replacement lexicon can be
//! loaded from TOML or JSON with the same shape:
//!
//! ```toml
//! [energy_efficiency]
//! high = ["solar", "renewable energy"]
//! medium = ["insulation"]
//! negative = ["wasteful"]
//! # ... waste_management, water_conservation, local_sourcing, carbon_footprint
//! ```
//!
//! Matching is case-insensitive and presence-based: a keyword contributes once no
//! matter how often it occurs. In `MatchMode::Substring` a keyword also matches
//! inside longer words ("efficient" inside "inefficient").

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::error::ParseNameError;

/// The five scored sustainability categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EcoCategory {
    EnergyEfficiency,
    WasteManagement,
    WaterConservation,
    LocalSourcing,
    CarbonFootprint,
}

impl EcoCategory {
    pub const ALL: [EcoCategory; 5] = [
        EcoCategory::EnergyEfficiency,
        EcoCategory::WasteManagement,
        EcoCategory::WaterConservation,
        EcoCategory::LocalSourcing,
        EcoCategory::CarbonFootprint,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EcoCategory::EnergyEfficiency => "energy_efficiency",
            EcoCategory::WasteManagement => "waste_management",
            EcoCategory::WaterConservation => "water_conservation",
            EcoCategory::LocalSourcing => "local_sourcing",
            EcoCategory::CarbonFootprint => "carbon_footprint",
        }
    }

    /// Field name used for this category in stored venue records.
    pub fn score_field(self) -> &'static str {
        match self {
            EcoCategory::EnergyEfficiency => "energyEfficiencyScore",
            EcoCategory::WasteManagement => "wasteManagementScore",
            EcoCategory::WaterConservation => "waterConservationScore",
            EcoCategory::LocalSourcing => "localSourcingScore",
            EcoCategory::CarbonFootprint => "carbonFootprintScore",
        }
    }
}

impl fmt::Display for EcoCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EcoCategory {
    type Err = ParseNameError;

    /// Accepts `energy_efficiency`, `energy-efficiency`, `energyEfficiency` and the
    /// score field name (`energyEfficiencyScore`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        let key = key.strip_suffix("score").unwrap_or(&key);
        EcoCategory::ALL
            .into_iter()
            .find(|c| c.as_str().replace('_', "") == key)
            .ok_or_else(|| ParseNameError::Category(s.to_string()))
    }
}

/// How a keyword is located in the lower-cased haystack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Raw substring containment.
    #[default]
    Substring,
    /// Keyword must start and end on a word boundary.
    WordBoundary,
}

impl FromStr for MatchMode {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "substring" => Ok(MatchMode::Substring),
            "word_boundary" | "word" => Ok(MatchMode::WordBoundary),
            _ => Err(ParseNameError::MatchMode(s.to_string())),
        }
    }
}

/// A single lower-cased keyword or phrase.
#[derive(Debug, Clone)]
pub struct Keyword {
    text: String,
    word_re: Regex,
}

impl Keyword {
    /// Returns `None` for blank input.
    pub fn new(raw: &str) -> Option<Self> {
        let text = raw.trim().to_lowercase();
        if text.is_empty() {
            return None;
        }
        // (?u) so \b agrees with Unicode word characters
        let word_re = Regex::new(&format!(r"(?u)\b{}\b", regex::escape(&text))).ok()?;
        Some(Self { text, word_re })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// `haystack` must already be lower-cased.
    pub fn is_present(&self, haystack: &str, mode: MatchMode) -> bool {
        match mode {
            MatchMode::Substring => haystack.contains(self.text.as_str()),
            MatchMode::WordBoundary => self.word_re.is_match(haystack),
        }
    }
}

/// Per-tier count of distinct keywords present in a text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TierCounts {
    pub high: usize,
    pub medium: usize,
    pub negative: usize,
}

impl TierCounts {
    pub fn total(&self) -> usize {
        self.high + self.medium + self.negative
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RawCategory {
    #[serde(default)]
    high: Vec<String>,
    #[serde(default)]
    medium: Vec<String>,
    #[serde(default)]
    negative: Vec<String>,
}

/// Keyword lists of one category.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "RawCategory")]
pub struct LexiconCategory {
    high: Vec<Keyword>,
    medium: Vec<Keyword>,
    negative: Vec<Keyword>,
}

impl LexiconCategory {
    /// Build from raw lists. Blank entries are dropped, duplicates within a tier
    /// are collapsed so each distinct keyword counts once.
    pub fn new<S: AsRef<str>>(high: &[S], medium: &[S], negative: &[S]) -> Self {
        Self {
            high: compile_tier(high),
            medium: compile_tier(medium),
            negative: compile_tier(negative),
        }
    }

    pub fn high(&self) -> &[Keyword] {
        &self.high
    }

    pub fn medium(&self) -> &[Keyword] {
        &self.medium
    }

    pub fn negative(&self) -> &[Keyword] {
        &self.negative
    }

    /// Total number of keywords across the three tiers.
    pub fn len(&self) -> usize {
        self.high.len() + self.medium.len() + self.negative.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Count distinct keywords of each tier present in `haystack` (lower-cased).
    pub fn tier_counts(&self, haystack: &str, mode: MatchMode) -> TierCounts {
        let present = |tier: &[Keyword]| {
            tier.iter()
                .filter(|k| k.is_present(haystack, mode))
                .count()
        };
        TierCounts {
            high: present(self.high.as_slice()),
            medium: present(self.medium.as_slice()),
            negative: present(self.negative.as_slice()),
        }
    }
}

impl From<RawCategory> for LexiconCategory {
    fn from(raw: RawCategory) -> Self {
        Self::new(&raw.high, &raw.medium, &raw.negative)
    }
}

fn compile_tier<S: AsRef<str>>(raw: &[S]) -> Vec<Keyword> {
    let mut seen = BTreeSet::new();
    raw.iter()
        .filter_map(|s| Keyword::new(s.as_ref()))
        .filter(|k| seen.insert(k.as_str().to_string()))
        .collect()
}

/// The full five-category lexicon.
#[derive(Debug, Clone, Deserialize)]
pub struct Lexicon {
    energy_efficiency: LexiconCategory,
    waste_management: LexiconCategory,
    water_conservation: LexiconCategory,
    local_sourcing: LexiconCategory,
    carbon_footprint: LexiconCategory,
}

static BUILTIN: Lazy<Lexicon> = Lazy::new(|| {
    let cat = |c: EcoCategory| {
        let (high, medium, negative) = builtin_lists(c);
        LexiconCategory::new(high, medium, negative)
    };
    Lexicon {
        energy_efficiency: cat(EcoCategory::EnergyEfficiency),
        waste_management: cat(EcoCategory::WasteManagement),
        water_conservation: cat(EcoCategory::WaterConservation),
        local_sourcing: cat(EcoCategory::LocalSourcing),
        carbon_footprint: cat(EcoCategory::CarbonFootprint),
    }
});

impl Lexicon {
    /// Shared built-in lexicon.
    pub fn builtin() -> &'static Lexicon {
        &BUILTIN
    }

    pub fn category(&self, category: EcoCategory) -> &LexiconCategory {
        match category {
            EcoCategory::EnergyEfficiency => &self.energy_efficiency,
            EcoCategory::WasteManagement => &self.waste_management,
            EcoCategory::WaterConservation => &self.water_conservation,
            EcoCategory::LocalSourcing => &self.local_sourcing,
            EcoCategory::CarbonFootprint => &self.carbon_footprint,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (EcoCategory, &LexiconCategory)> + '_ {
        EcoCategory::ALL.into_iter().map(move |c| (c, self.category(c)))
    }

    pub fn keyword_count(&self) -> usize {
        self.iter().map(|(_, c)| c.len()).sum()
    }

    /// Count every present keyword across all tiers of all categories.
    pub fn total_matches(&self, haystack: &str, mode: MatchMode) -> usize {
        self.iter()
            .map(|(_, c)| c.tier_counts(haystack, mode).total())
            .sum()
    }

    /// Load a lexicon file. Supports TOML or JSON (by extension, TOML otherwise).
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading lexicon from {}", path.display()))?;
        let is_json = path
            .extension()
            .and_then(|s| s.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        if is_json {
            serde_json::from_str(&content)
                .with_context(|| format!("parsing lexicon JSON {}", path.display()))
        } else {
            Self::from_toml_str(&content)
        }
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let lex: Lexicon = toml::from_str(s).context("parsing lexicon TOML")?;
        Ok(lex)
    }
}

/* ----------------------------
Built-in keyword table
---------------------------- */

type Tiers = (&'static [&'static str], &'static [&'static str], &'static [&'static str]);

fn builtin_lists(category: EcoCategory) -> Tiers {
    match category {
        EcoCategory::EnergyEfficiency => (
            &[
                "solar",
                "solar panels",
                "renewable energy",
                "energy efficient",
                "energy-efficient",
                "led lighting",
                "geothermal",
                "wind power",
                "wind turbine",
                "energy star",
                "net zero",
                "passive house",
            ],
            &[
                "efficient",
                "energy saving",
                "led lights",
                "led bulbs",
                "smart thermostat",
                "natural light",
                "natural ventilation",
                "insulation",
                "insulated",
                "motion sensor",
                "key card",
                "low energy",
            ],
            &[
                "wasteful",
                "energy waste",
                "lights left on",
                "lights on all day",
                "air conditioning running",
                "generator",
                "inefficient",
                "drafty",
                "heating always on",
            ],
        ),
        EcoCategory::WasteManagement => (
            &[
                "recycling",
                "composting",
                "compost",
                "zero waste",
                "zero-waste",
                "plastic free",
                "plastic-free",
                "upcycled",
                "refillable",
                "refill station",
            ],
            &[
                "recycle",
                "reusable",
                "biodegradable",
                "waste reduction",
                "no plastic",
                "minimal packaging",
                "glass bottles",
                "bulk dispensers",
                "cloth napkins",
            ],
            &[
                "plastic bottles",
                "single-use",
                "single use",
                "plastic straws",
                "disposable",
                "styrofoam",
                "litter",
                "trash everywhere",
                "excessive packaging",
                "overflowing bins",
            ],
        ),
        EcoCategory::WaterConservation => (
            &[
                "rainwater",
                "rainwater harvesting",
                "greywater",
                "grey water",
                "water saving",
                "water-saving",
                "water recycling",
                "low-flow",
                "low flow",
                "composting toilet",
            ],
            &[
                "towel reuse",
                "reuse towels",
                "reuse your towels",
                "water efficient",
                "dual flush",
                "short showers",
                "water conservation",
                "drought",
                "filtered water",
            ],
            &[
                "water waste",
                "wasting water",
                "leaking",
                "leaky",
                "dripping tap",
                "daily towel change",
                "sprinklers",
                "bottled water only",
            ],
        ),
        EcoCategory::LocalSourcing => (
            &[
                "locally sourced",
                "local produce",
                "local farmers",
                "farm to table",
                "farm-to-table",
                "organic",
                "homegrown",
                "own garden",
                "fair trade",
                "local ingredients",
            ],
            &[
                "local",
                "seasonal",
                "regional",
                "artisan",
                "handmade",
                "fresh",
                "family-run",
                "community",
            ],
            &[
                "imported",
                "processed food",
                "fast food",
                "frozen food",
                "chain restaurant",
                "mass produced",
                "mass-produced",
            ],
        ),
        EcoCategory::CarbonFootprint => (
            &[
                "carbon neutral",
                "carbon-neutral",
                "carbon offset",
                "carbon negative",
                "electric vehicle",
                "ev charging",
                "bike rental",
                "bicycle",
                "public transport",
                "climate positive",
            ],
            &[
                "walkable",
                "walking distance",
                "train",
                "shuttle",
                "electric",
                "low carbon",
                "carpool",
                "bike",
                "hiking",
            ],
            &[
                "diesel",
                "fossil fuel",
                "private jet",
                "car required",
                "need a car",
                "long drive",
                "traffic",
                "gas guzzler",
                "jet ski",
            ],
        ),
    }
}
