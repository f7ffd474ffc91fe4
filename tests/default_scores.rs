// tests/default_scores.rs
use eco_score_engine::{get_default_eco_scores, EcoCategory, VenueType};
use serde_json::json;

#[test]
fn eco_lodge_baseline_is_all_fours() {
    let d = get_default_eco_scores("eco-lodge");
    for c in EcoCategory::ALL {
        assert_eq!(d.scores.get(c), 4, "{c}");
    }
    assert_eq!(d.metadata.confidence_level, 2.0);
    assert!(d.metadata.is_default);
    assert_eq!(d.metadata.reviews_analyzed, 0);
    assert_eq!(d.metadata.valid_scores, 5);
    assert!(d.metadata.error.is_none());
}

#[test]
fn unknown_and_empty_names_use_hotel() {
    let hotel = get_default_eco_scores("hotel").scores;
    assert_eq!(get_default_eco_scores("castle").scores, hotel);
    assert_eq!(get_default_eco_scores("").scores, hotel);
    assert_eq!(get_default_eco_scores("   ").scores, hotel);
}

#[test]
fn names_are_normalized() {
    let lodge = get_default_eco_scores("eco-lodge").scores;
    assert_eq!(get_default_eco_scores("Eco_Lodge").scores, lodge);
    assert_eq!(get_default_eco_scores(" ECO LODGE ").scores, lodge);
}

#[test]
fn every_baseline_stays_in_range() {
    for v in VenueType::ALL {
        let d = get_default_eco_scores(v.as_str());
        for c in EcoCategory::ALL {
            let s = d.scores.get(c);
            assert!((1..=5).contains(&s), "{v} {c} = {s}");
        }
    }
}

#[test]
fn resort_and_hostel_differ_from_hotel() {
    let resort = get_default_eco_scores("resort").scores;
    assert_eq!(resort.get(EcoCategory::EnergyEfficiency), 2);
    assert_eq!(resort.get(EcoCategory::WasteManagement), 3);
    let hostel = get_default_eco_scores("hostel").scores;
    assert_eq!(hostel.get(EcoCategory::CarbonFootprint), 4);
}

#[test]
fn baseline_serializes_with_stored_field_names() {
    let v = serde_json::to_value(get_default_eco_scores("guesthouse")).unwrap();
    assert_eq!(v["scores"]["localSourcingScore"], json!(4));
    assert_eq!(v["scores"]["energyEfficiencyScore"], json!(3));
    assert_eq!(v["metadata"]["isDefault"], json!(true));
    assert_eq!(v["metadata"]["confidenceLevel"], json!(2.0));
    assert!(v["metadata"].get("error").is_none());
}

#[test]
fn baseline_converts_to_result_shape() {
    let r = get_default_eco_scores("apartment").into_result();
    assert!(r.has_scores());
    assert_eq!(r.scores.get(EcoCategory::WasteManagement), Some(2.0));
    assert_eq!(r.scores.present_count(), 5);
    assert!(r.metadata.is_default);
}
