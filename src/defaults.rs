//! Baseline eco scores per venue type, used when there is no review text to
//! analyse. Confidence is pinned at 2: an unverified baseline, distinct from the 1
//! reported by a failed analysis.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ParseNameError;
use crate::lexicon::EcoCategory;
use crate::types::{CategoryScores, EcoScoreResult, ScoreMetadata};

/// Confidence reported for every baseline score set.
pub const DEFAULT_CONFIDENCE: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VenueType {
    EcoLodge,
    Resort,
    #[default]
    Hotel,
    Hostel,
    Guesthouse,
    Apartment,
}

impl VenueType {
    pub const ALL: [VenueType; 6] = [
        VenueType::EcoLodge,
        VenueType::Resort,
        VenueType::Hotel,
        VenueType::Hostel,
        VenueType::Guesthouse,
        VenueType::Apartment,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            VenueType::EcoLodge => "eco-lodge",
            VenueType::Resort => "resort",
            VenueType::Hotel => "hotel",
            VenueType::Hostel => "hostel",
            VenueType::Guesthouse => "guesthouse",
            VenueType::Apartment => "apartment",
        }
    }

    pub fn default_scores(self) -> DefaultScoreSet {
        match self {
            VenueType::EcoLodge => DefaultScoreSet::new(4, 4, 4, 4, 4),
            VenueType::Resort => DefaultScoreSet::new(2, 3, 2, 3, 2),
            VenueType::Hotel => DefaultScoreSet::new(3, 3, 3, 3, 3),
            VenueType::Hostel => DefaultScoreSet::new(3, 3, 3, 3, 4),
            VenueType::Guesthouse => DefaultScoreSet::new(3, 3, 3, 4, 3),
            VenueType::Apartment => DefaultScoreSet::new(3, 2, 3, 2, 3),
        }
    }
}

impl fmt::Display for VenueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VenueType {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        VenueType::ALL
            .into_iter()
            .find(|v| v.as_str() == key)
            .ok_or_else(|| ParseNameError::VenueType(s.to_string()))
    }
}

/// Fixed integer scores (1..=5) for the five categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefaultScoreSet {
    pub energy_efficiency_score: u8,
    pub waste_management_score: u8,
    pub water_conservation_score: u8,
    pub local_sourcing_score: u8,
    pub carbon_footprint_score: u8,
}

impl DefaultScoreSet {
    const fn new(energy: u8, waste: u8, water: u8, local: u8, carbon: u8) -> Self {
        Self {
            energy_efficiency_score: energy,
            waste_management_score: waste,
            water_conservation_score: water,
            local_sourcing_score: local,
            carbon_footprint_score: carbon,
        }
    }

    pub fn get(&self, category: EcoCategory) -> u8 {
        match category {
            EcoCategory::EnergyEfficiency => self.energy_efficiency_score,
            EcoCategory::WasteManagement => self.waste_management_score,
            EcoCategory::WaterConservation => self.water_conservation_score,
            EcoCategory::LocalSourcing => self.local_sourcing_score,
            EcoCategory::CarbonFootprint => self.carbon_footprint_score,
        }
    }

    pub fn to_category_scores(&self) -> CategoryScores {
        let mut out = CategoryScores::default();
        for c in EcoCategory::ALL {
            out.set(c, Some(f64::from(self.get(c))));
        }
        out
    }
}

/// Baseline scores plus their audit metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultEcoScores {
    pub scores: DefaultScoreSet,
    pub metadata: ScoreMetadata,
}

impl DefaultEcoScores {
    /// Same shape as an analysis result, for storing next to analysed venues.
    pub fn into_result(self) -> EcoScoreResult {
        EcoScoreResult {
            scores: self.scores.to_category_scores(),
            metadata: self.metadata,
        }
    }
}

/// Baseline for a venue type name. Unknown or empty names use the hotel entry.
pub fn get_default_eco_scores(venue_type: &str) -> DefaultEcoScores {
    default_eco_scores_for(venue_type.parse().unwrap_or_default())
}

pub fn default_eco_scores_for(venue: VenueType) -> DefaultEcoScores {
    DefaultEcoScores {
        scores: venue.default_scores(),
        metadata: ScoreMetadata {
            reviews_analyzed: 0,
            total_reviews: 0,
            confidence_level: DEFAULT_CONFIDENCE,
            last_calculated: Utc::now(),
            keyword_matches: 0,
            valid_scores: EcoCategory::ALL.len(),
            text_length: 0,
            error: None,
            is_default: true,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn venue_names_parse_loosely() {
        assert_eq!("Eco-Lodge".parse::<VenueType>().unwrap(), VenueType::EcoLodge);
        assert_eq!("eco_lodge".parse::<VenueType>().unwrap(), VenueType::EcoLodge);
        assert_eq!(" HOSTEL ".parse::<VenueType>().unwrap(), VenueType::Hostel);
        assert!("treehouse".parse::<VenueType>().is_err());
    }

    #[test]
    fn every_default_is_in_range() {
        for v in VenueType::ALL {
            let s = v.default_scores();
            for c in EcoCategory::ALL {
                assert!((1..=5).contains(&s.get(c)), "{v} {c} out of range");
            }
        }
    }

    #[test]
    fn into_result_keeps_default_flag() {
        let r = get_default_eco_scores("resort").into_result();
        assert_eq!(r.scores.energy_efficiency_score, Some(2.0));
        assert_eq!(r.scores.present_count(), 5);
        assert!(r.metadata.is_default);
        assert_eq!(r.metadata.confidence_level, DEFAULT_CONFIDENCE);
    }
}
