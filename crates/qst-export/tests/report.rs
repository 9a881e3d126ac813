use qst_core::models::measurement::Measurement;
use qst_core::models::patient::Sex;
use qst_export::render::render_template;
use qst_export::report::{build_context, render_report, render_report_with, to_json, ReportRow};
use qst_norms::{analyze, Analysis, ReferenceTable};

fn sample_analysis() -> Analysis {
    let measurements = vec![
        Measurement::new("HPT", "hand", 50.0),
        Measurement::new("CDT", "face", 1.0),
        Measurement::new("CDT", "wrist", 1.0),
    ];
    analyze(ReferenceTable::standard(), &measurements, Sex::Female, 25.0).unwrap()
}

#[test]
fn log_rows_show_raw_and_log_values() {
    let context = build_context(&sample_analysis());
    let cdt = &context.sections[0];
    assert_eq!(cdt.code, "CDT");
    assert!(cdt.log_transformed);
    assert_eq!(
        cdt.rows,
        vec![ReportRow {
            body_area: "Face".to_string(),
            patient_value: "1.00".to_string(),
            reference_mean: "0.93 (log10: -0.03)".to_string(),
            reference_sd: "0.20 (in log10 space)".to_string(),
            normal_range: "0.37 to 2.33".to_string(),
            status: "Normal".to_string(),
        }]
    );
}

#[test]
fn raw_rows_show_limits_directly() {
    let context = build_context(&sample_analysis());
    let hpt = &context.sections[1];
    assert_eq!(hpt.code, "HPT");
    assert!(!hpt.log_transformed);
    // 42.68 +/- 2 * 3.24
    assert_eq!(hpt.rows[0].normal_range, "36.20 to 49.16");
    assert_eq!(hpt.rows[0].status, "Abnormal");
}

#[test]
fn sections_follow_modality_order() {
    let context = build_context(&sample_analysis());
    let codes: Vec<_> = context.sections.iter().map(|s| s.code.as_str()).collect();
    assert_eq!(codes, ["CDT", "HPT"]);
    assert_eq!(context.classified, 2);
    assert_eq!(context.abnormal, 1);
    assert_eq!(context.age, "25");
}

#[test]
fn rendered_report_contains_tables_and_skips() {
    let report = render_report(&sample_analysis()).unwrap();
    assert!(report.starts_with("# QST Analysis Results"));
    assert!(report.contains("Patient: female, 25 years (age group 20-30)"));
    assert!(report.contains("## CDT (Cold Detection Threshold)"));
    assert!(report.contains("| Face | 1.00 | 0.93 (log10: -0.03) | 0.20 (in log10 space) | 0.37 to 2.33 | Normal |"));
    assert!(report.contains("| Hand | 50.00 | 42.68 | 3.24 | 36.20 to 49.16 | Abnormal |"));
    assert!(report.contains("## Skipped measurements"));
    assert!(report.contains("wrist"));
}

#[test]
fn report_without_skips_omits_section() {
    let measurements = vec![Measurement::new("CPT", "feet", 10.0)];
    let analysis = analyze(ReferenceTable::standard(), &measurements, Sex::Male, 64.0).unwrap();
    let report = render_report(&analysis).unwrap();
    assert!(report.contains("age group >60"));
    assert!(!report.contains("Skipped"));
}

#[test]
fn custom_template_uses_same_context() {
    let out = render_report_with("{{ age_bracket }}:{{ abnormal }}", &sample_analysis()).unwrap();
    assert_eq!(out, "20-30:1");
}

#[test]
fn bad_template_is_a_parse_error() {
    let err = render_template("broken", "{% if %}", &serde_json::json!({})).unwrap_err();
    assert!(err.to_string().starts_with("template parse error"));
}

#[test]
fn json_output_parses_back() {
    let analysis = sample_analysis();
    let json = to_json(&analysis).unwrap();
    let parsed: Analysis = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.age_bracket, analysis.age_bracket);
    assert_eq!(parsed.classified(), 2);
    assert_eq!(parsed.skipped, analysis.skipped);
}
