//! Place-details payloads as delivered by the external places client, and the
//! "analyse or fall back to baseline" step used when refreshing a venue.
//!
//! Only `name`, `description` and `reviews[].text` feed the scores. `types` and
//! `name` help pick a baseline when there is nothing to analyse.

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::info;

use crate::analyzer::EcoScoreAnalyzer;
use crate::defaults::{default_eco_scores_for, VenueType};
use crate::types::{EcoScoreResult, PlaceContext, Review};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceDetails {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_reviews")]
    pub reviews: Vec<Review>,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default, alias = "user_ratings_total")]
    pub user_ratings_total: Option<u32>,
}

impl PlaceDetails {
    pub fn from_json_str(s: &str) -> Result<Self> {
        serde_json::from_str(s).context("parsing place details JSON")
    }

    pub fn context(&self) -> PlaceContext<'_> {
        PlaceContext::new(self.name.as_deref(), self.description.as_deref())
    }

    /// Best guess of the venue type from place types, then from the name.
    pub fn infer_venue_type(&self) -> VenueType {
        let has = |t: &str| self.types.iter().any(|x| x.eq_ignore_ascii_case(t));
        if has("hostel") {
            return VenueType::Hostel;
        }
        if has("resort_hotel") {
            return VenueType::Resort;
        }
        if has("guest_house") || has("bed_and_breakfast") {
            return VenueType::Guesthouse;
        }
        if has("apartment_building") || has("apartment_complex") || has("private_guest_room") {
            return VenueType::Apartment;
        }

        let name = self.name.as_deref().unwrap_or_default().to_lowercase();
        if ["eco-lodge", "eco lodge", "ecolodge"]
            .iter()
            .any(|n| name.contains(n))
        {
            VenueType::EcoLodge
        } else if name.contains("resort") {
            VenueType::Resort
        } else if name.contains("hostel") {
            VenueType::Hostel
        } else {
            VenueType::Hotel
        }
    }
}

/// Normalize an untyped `reviews` value. A non-array yields no reviews; entries
/// without a string `text` become empty reviews so they still count toward the
/// total.
pub fn reviews_from_value(value: &Value) -> Vec<Review> {
    let Some(items) = value.as_array() else {
        return Vec::new();
    };
    items
        .iter()
        .map(|item| Review {
            text: item
                .get("text")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            author_name: item
                .get("author_name")
                .and_then(Value::as_str)
                .map(str::to_string),
            rating: item.get("rating").and_then(Value::as_f64),
        })
        .collect()
}

fn lenient_reviews<'de, D>(deserializer: D) -> Result<Vec<Review>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(reviews_from_value(&value))
}

/// Analyse a place; when nothing could be scored, return the baseline for
/// `venue_type` (or the inferred type) with the analysis error kept for audit.
pub fn score_place(
    analyzer: &EcoScoreAnalyzer,
    place: &PlaceDetails,
    venue_type: Option<VenueType>,
) -> EcoScoreResult {
    let result = analyzer.analyze(&place.reviews, Some(place.context()));
    if result.has_scores() {
        return result;
    }

    let venue = venue_type.unwrap_or_else(|| place.infer_venue_type());
    info!(
        target: "eco_score",
        venue = %venue,
        reason = result.metadata.error.as_deref().unwrap_or("no scores"),
        "falling back to baseline eco scores"
    );
    let mut fallback = default_eco_scores_for(venue).into_result();
    fallback.metadata.total_reviews = result.metadata.total_reviews;
    fallback.metadata.error = result.metadata.error;
    fallback
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reviews_from_non_array_is_empty() {
        assert!(reviews_from_value(&Value::Null).is_empty());
        assert!(reviews_from_value(&json!("great place")).is_empty());
        assert!(reviews_from_value(&json!({"text": "hi"})).is_empty());
    }

    #[test]
    fn malformed_entries_become_empty_reviews() {
        let v = json!([{}, {"text": 42}, "plain string", {"text": "Lovely solar setup"}]);
        let r = reviews_from_value(&v);
        assert_eq!(r.len(), 4);
        assert_eq!(r[0].text, "");
        assert_eq!(r[1].text, "");
        assert_eq!(r[2].text, "");
        assert_eq!(r[3].text, "Lovely solar setup");
    }

    #[test]
    fn payload_parses_google_style_fields() {
        let p = PlaceDetails::from_json_str(
            r#"{
                "name": "Cloud Forest Eco Lodge",
                "reviews": [{"author_name": "Ana", "rating": 5, "text": "Solar showers!"}],
                "coordinates": {"lat": 10.3, "lng": -84.8},
                "types": ["lodging"],
                "user_ratings_total": 87
            }"#,
        )
        .unwrap();
        assert_eq!(p.reviews.len(), 1);
        assert_eq!(p.reviews[0].author_name.as_deref(), Some("Ana"));
        assert_eq!(p.user_ratings_total, Some(87));
        assert_eq!(p.infer_venue_type(), VenueType::EcoLodge);
    }

    #[test]
    fn venue_type_inference_prefers_place_types() {
        let p = PlaceDetails {
            name: Some("Sunny Resort".into()),
            types: vec!["hostel".into(), "lodging".into()],
            ..Default::default()
        };
        assert_eq!(p.infer_venue_type(), VenueType::Hostel);
        let q = PlaceDetails {
            name: Some("Harbor Inn".into()),
            ..Default::default()
        };
        assert_eq!(q.infer_venue_type(), VenueType::Hotel);
    }
}
