use qst_core::models::measurement::Measurement;
use qst_core::models::modality::{Modality, ModalityCode};
use qst_norms::analysis::SkipReason;
use qst_norms::error::ExtractError;
use qst_norms::extract::{extract, AreaAssignment, SummaryRow};
use serde_json::json;

fn rows(value: serde_json::Value) -> Vec<SummaryRow> {
    serde_json::from_value(value).unwrap()
}

fn assign(modality: &str, sequence: serde_json::Value, area: &str) -> AreaAssignment {
    AreaAssignment {
        modality: modality.to_string(),
        sequence,
        area: area.to_string(),
    }
}

fn sample_sheet() -> Vec<SummaryRow> {
    rows(json!([
        { "Sequence": 1, "Modality": "Cold Detection Threshold", "Trials": 3, "Avg": 1.2, "Var": 0.1, "STD": 0.3 },
        { "Sequence": 2, "Modality": "Cold Detection Threshold", "Trials": 3, "Avg": 2.4, "Var": 0.2, "STD": 0.4 },
        { "Sequence": 3, "Modality": "Heat Pain Test", "Trials": 3, "Avg": 44.0, "Var": 1.0, "STD": 1.0 },
        { "Sequence": 4, "Modality": "Vibration", "Trials": 3, "Avg": 5.0, "Var": 1.0, "STD": 1.0 }
    ]))
}

#[test]
fn assigned_rows_become_measurements() {
    let extraction = extract(
        &sample_sheet(),
        &[
            assign("CDT", json!(1), "Face"),
            assign("CDT", json!("2"), "feet"),
            assign("HPT", json!(3.0), "Hand"),
        ],
    )
    .unwrap();

    assert_eq!(
        extraction.measurements,
        vec![
            Measurement::new("CDT", "face", 1.2),
            Measurement::new("CDT", "feet", 2.4),
            Measurement::new("HPT", "hand", 44.0),
        ]
    );
    assert!(extraction.unmatched.is_empty());
}

#[test]
fn detected_modalities_keep_first_seen_order() {
    let extraction = extract(&sample_sheet(), &[]).unwrap();
    let detected: Vec<_> = extraction
        .detected
        .iter()
        .map(|d| (d.original.as_str(), d.normalized.clone()))
        .collect();

    assert_eq!(
        detected,
        vec![
            ("Cold Detection Threshold", ModalityCode::Canonical(Modality::Cdt)),
            ("Heat Pain Test", ModalityCode::Canonical(Modality::Hpt)),
            ("Vibration", ModalityCode::Unrecognized("Vibration".to_string())),
        ]
    );
    assert_eq!(extraction.qst_modalities(), vec![Modality::Cdt, Modality::Hpt]);
}

#[test]
fn missing_required_columns_are_listed() {
    let sheet = rows(json!([{ "Sequence": 1, "Modality": "Cold Pain", "Trials": 3 }]));
    let err = extract(&sheet, &[]).unwrap_err();

    match err {
        ExtractError::MissingColumns { missing, available } => {
            assert_eq!(missing, vec!["Avg".to_string()]);
            assert_eq!(available, vec!["Modality", "Sequence", "Trials"]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn empty_sheet_is_missing_every_required_column() {
    let err = extract(&[], &[]).unwrap_err();
    assert!(matches!(err, ExtractError::MissingColumns { ref missing, .. } if missing.len() == 3));
    assert!(err.to_string().contains("Sequence, Modality, Avg"));
}

#[test]
fn sheet_without_thermal_modalities_is_rejected() {
    let sheet = rows(json!([
        { "Sequence": 1, "Modality": "Vibration", "Avg": 5.0 },
        { "Sequence": 2, "Modality": "Pressure", "Avg": 300.0 }
    ]));
    match extract(&sheet, &[]).unwrap_err() {
        ExtractError::NoQstModalities { available } => {
            assert_eq!(available, vec!["Vibration", "Pressure"]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unresolvable_assignments_are_reported() {
    let extraction = extract(
        &sample_sheet(),
        &[
            assign("HPT", json!(9), "hand"),
            assign("Vibration", json!(4), "hand"),
            assign("CDT", json!(1), ""),
        ],
    )
    .unwrap();

    assert!(extraction.measurements.is_empty());
    assert_eq!(extraction.unmatched.len(), 2);

    let missing_row = &extraction.unmatched[0];
    assert_eq!(missing_row.reason, SkipReason::UnmatchedAssignment);
    assert_eq!(missing_row.modality, "HPT");
    assert_eq!(missing_row.body_area, "hand");
    assert_eq!(missing_row.value, None);
    assert_eq!(missing_row.message, "No HPT row with sequence 9 (assigned to hand)");

    assert_eq!(extraction.unmatched[1].reason, SkipReason::UnknownModality);
    assert_eq!(extraction.unmatched[1].modality, "Vibration");
}

#[test]
fn non_numeric_average_is_reported() {
    let sheet = rows(json!([
        { "Sequence": "A", "Modality": "Cold Pain", "Avg": "n/a" },
        { "Sequence": "B", "Modality": "Cold Pain", "Avg": " 12.5 " }
    ]));
    let extraction = extract(
        &sheet,
        &[assign("CPT", json!("A"), "hand"), assign("CPT", json!("B"), "feet")],
    )
    .unwrap();

    assert_eq!(extraction.measurements, vec![Measurement::new("CPT", "feet", 12.5)]);
    assert_eq!(extraction.unmatched.len(), 1);
    assert_eq!(extraction.unmatched[0].reason, SkipReason::InvalidValue);
    assert_eq!(extraction.unmatched[0].body_area, "hand");
    assert!(extraction.unmatched[0].message.contains("non-numeric Avg: n/a"));
}
