use std::collections::BTreeMap;
use std::path::Path;

use qst_core::models::measurement::Measurement;
use qst_core::models::patient::PatientInfo;
use qst_norms::analysis::{analyze, parse_parameters, Analysis};
use qst_norms::extract::{extract, AreaAssignment, SummaryRow};
use qst_norms::ReferenceTable;
use serde::{Deserialize, Serialize};

/// One patient's QST session as handed over by the extraction step.
///
/// Measurements may be given directly, as `<MODALITY>_<area>` parameters,
/// or as summary-sheet rows with pre-resolved area assignments. All three
/// sources are combined in that order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub patient: PatientInfo,
    #[serde(default)]
    pub measurements: Vec<Measurement>,
    #[serde(default)]
    pub parameters: BTreeMap<String, f64>,
    #[serde(default)]
    pub summary: Option<SummarySheet>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarySheet {
    pub rows: Vec<SummaryRow>,
    #[serde(default)]
    pub assignments: Vec<AreaAssignment>,
}

pub fn load_session(path: &Path) -> eyre::Result<Session> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read session at {}: {e}", path.display()))?;
    let session: Session = serde_json::from_str(&contents)
        .map_err(|e| eyre::eyre!("invalid session file {}: {e}", path.display()))?;
    Ok(session)
}

/// Validate the patient, gather measurements from every source and run the
/// analysis against `table`.
pub fn run_session(session: &Session, table: &ReferenceTable) -> eyre::Result<Analysis> {
    session.patient.validate()?;

    let mut measurements = session.measurements.clone();
    let (from_parameters, mut skipped) = parse_parameters(&session.parameters);
    measurements.extend(from_parameters);

    if let Some(summary) = &session.summary {
        let extraction = extract(&summary.rows, &summary.assignments)?;
        for detected in &extraction.detected {
            tracing::info!(
                original = %detected.original,
                normalized = %detected.normalized,
                "detected test type"
            );
        }
        measurements.extend(extraction.measurements);
        skipped.extend(extraction.unmatched);
    }

    if measurements.is_empty() && skipped.is_empty() {
        return Err(eyre::eyre!("no valid QST parameters to analyze"));
    }

    let analysis = analyze(
        table,
        &measurements,
        session.patient.sex,
        f64::from(session.patient.age),
    )?;
    Ok(analysis.with_skipped(skipped))
}
