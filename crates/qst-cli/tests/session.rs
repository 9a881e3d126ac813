use qst_cli::listing::reference_listing;
use qst_cli::session::{load_session, run_session, Session};
use qst_core::models::age::AgeBracket;
use qst_core::models::area::BodyArea;
use qst_core::models::modality::Modality;
use qst_core::models::patient::Sex;
use qst_norms::{ReferenceTable, SkipReason};
use serde_json::json;

fn session(value: serde_json::Value) -> Session {
    serde_json::from_value(value).unwrap()
}

#[test]
fn direct_measurements_are_analyzed() {
    let s = session(json!({
        "patient": { "sex": "female", "age": 55 },
        "measurements": [
            { "modality": "CDT", "body_area": "face", "value": 1.0 },
            { "modality": "HPT", "body_area": "hand", "value": 44.0 }
        ]
    }));

    let analysis = run_session(&s, ReferenceTable::standard()).unwrap();
    assert_eq!(analysis.age_bracket, AgeBracket::From50To60);
    assert!(analysis.result(Modality::Cdt, BodyArea::Face).unwrap().is_normal);
    assert!(analysis.result(Modality::Hpt, BodyArea::Hand).unwrap().is_normal);
}

#[test]
fn all_sources_are_combined() {
    let s = session(json!({
        "patient": { "sex": "male", "age": 42 },
        "measurements": [ { "modality": "CPT", "body_area": "hand", "value": 10.0 } ],
        "parameters": { "WDT_feet": 5.0, "bogus": 1.0 },
        "summary": {
            "rows": [
                { "Sequence": 1, "Modality": "Heat Pain", "Avg": 45.0 },
                { "Sequence": 2, "Modality": "Cold Detection", "Avg": 1.1 }
            ],
            "assignments": [
                { "modality": "HPT", "sequence": 1, "area": "Feet" },
                { "modality": "CDT", "sequence": "2", "area": "Face" }
            ]
        }
    }));

    let analysis = run_session(&s, ReferenceTable::standard()).unwrap();
    assert_eq!(analysis.classified(), 4);
    assert!(analysis.result(Modality::Cpt, BodyArea::Hand).is_some());
    assert!(analysis.result(Modality::Wdt, BodyArea::Feet).is_some());
    assert!(analysis.result(Modality::Hpt, BodyArea::Feet).is_some());
    assert!(analysis.result(Modality::Cdt, BodyArea::Face).is_some());

    assert_eq!(analysis.skipped.len(), 1);
    assert_eq!(analysis.skipped[0].reason, SkipReason::InvalidParameterName);
}

#[test]
fn unresolved_summary_assignments_are_reported() {
    let s = session(json!({
        "patient": { "sex": "female", "age": 34 },
        "parameters": { "WDT_hand": 1.5 },
        "summary": {
            "rows": [
                { "Sequence": 1, "Modality": "Cold Detection", "Avg": "n/a" },
                { "Sequence": 2, "Modality": "Heat Pain", "Avg": 44.0 }
            ],
            "assignments": [
                { "modality": "CDT", "sequence": 1, "area": "face" },
                { "modality": "HPT", "sequence": 7, "area": "hand" }
            ]
        }
    }));

    let analysis = run_session(&s, ReferenceTable::standard()).unwrap();
    assert_eq!(analysis.classified(), 1);

    let skipped: Vec<_> = analysis
        .skipped
        .iter()
        .map(|s| (s.modality.as_str(), s.body_area.as_str(), s.value, s.reason))
        .collect();
    assert_eq!(
        skipped,
        vec![
            ("CDT", "face", None, SkipReason::InvalidValue),
            ("HPT", "hand", None, SkipReason::UnmatchedAssignment),
        ]
    );

    let json = serde_json::to_value(&analysis).unwrap();
    assert_eq!(json["skipped"][1]["reason"], "unmatched_assignment");
    assert!(json["skipped"][1]["value"].is_null());
}

#[test]
fn summary_with_only_unresolved_assignments_still_analyzes() {
    let s = session(json!({
        "patient": { "sex": "male", "age": 61 },
        "summary": {
            "rows": [ { "Sequence": 3, "Modality": "Cold Pain", "Avg": 12.0 } ],
            "assignments": [ { "modality": "CPT", "sequence": 4, "area": "feet" } ]
        }
    }));

    let analysis = run_session(&s, ReferenceTable::standard()).unwrap();
    assert_eq!(analysis.classified(), 0);
    assert_eq!(analysis.skipped.len(), 1);
    assert_eq!(analysis.skipped[0].reason, SkipReason::UnmatchedAssignment);
}

#[test]
fn patient_under_twenty_fails() {
    let s = session(json!({
        "patient": { "sex": "male", "age": 19 },
        "measurements": [ { "modality": "CPT", "body_area": "hand", "value": 10.0 } ]
    }));
    let err = run_session(&s, ReferenceTable::standard()).unwrap_err();
    assert!(err.to_string().contains("at least 20"));
}

#[test]
fn patient_outside_input_bounds_fails() {
    let s = session(json!({
        "patient": { "sex": "female", "age": 120 },
        "measurements": [ { "modality": "CPT", "body_area": "hand", "value": 10.0 } ]
    }));
    let err = run_session(&s, ReferenceTable::standard()).unwrap_err();
    assert!(err.to_string().contains("outside the accepted input range"));
}

#[test]
fn empty_session_fails() {
    let s = session(json!({ "patient": { "sex": "female", "age": 40 } }));
    let err = run_session(&s, ReferenceTable::standard()).unwrap_err();
    assert!(err.to_string().contains("no valid QST parameters"));
}

#[test]
fn summary_missing_columns_fails() {
    let s = session(json!({
        "patient": { "sex": "female", "age": 40 },
        "summary": { "rows": [ { "Sequence": 1, "Modality": "Cold Pain" } ] }
    }));
    let err = run_session(&s, ReferenceTable::standard()).unwrap_err();
    assert!(err.to_string().contains("Avg"));
}

#[test]
fn session_file_loads_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    std::fs::write(
        &path,
        r#"{ "patient": { "sex": "male", "age": 30 }, "parameters": { "HPT_face": 43.0 } }"#,
    )
    .unwrap();

    let s = load_session(&path).unwrap();
    assert_eq!(s.patient.sex, Sex::Male);
    assert_eq!(s.parameters.get("HPT_face"), Some(&43.0));

    std::fs::write(&path, "{ not json").unwrap();
    let err = load_session(&path).unwrap_err();
    assert!(err.to_string().contains("invalid session file"));
}

#[test]
fn reference_listing_for_bracket() {
    let listing = reference_listing(ReferenceTable::standard(), Sex::Female, 55).unwrap();
    assert_eq!(listing.age_bracket, AgeBracket::From50To60);
    assert_eq!(listing.entries.len(), 12);

    let hpt_hand = listing
        .entries
        .iter()
        .find(|r| r.modality == Modality::Hpt && r.body_area == BodyArea::Hand)
        .unwrap();
    assert_eq!(hpt_hand.mean, 44.73);
    assert!(!hpt_hand.log_transformed);

    let err = reference_listing(ReferenceTable::standard(), Sex::Female, 18).unwrap_err();
    assert!(err.to_string().contains("at least 20"));
}

#[test]
fn reference_listing_rejects_age_outside_input_bounds() {
    let err = reference_listing(ReferenceTable::standard(), Sex::Male, 150).unwrap_err();
    assert!(err.to_string().contains("outside the accepted input range"));

    let err = reference_listing(ReferenceTable::standard(), Sex::Male, 10).unwrap_err();
    assert!(err.to_string().contains("outside the accepted input range"));
}
