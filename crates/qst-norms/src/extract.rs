//! Summary-sheet extraction.
//!
//! A QST summary sheet has one row per test sequence with free-text
//! modality labels and an average threshold. Which body area each
//! sequence was measured on is decided by the operator ahead of time and
//! supplied as [`AreaAssignment`]s.

use std::collections::BTreeSet;

use qst_core::models::measurement::Measurement;
use qst_core::models::modality::{normalize, Modality, ModalityCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

use crate::analysis::{SkipReason, SkippedMeasurement};
use crate::error::ExtractError;

pub const EXPECTED_COLUMNS: [&str; 6] = ["Sequence", "Modality", "Trials", "Avg", "Var", "STD"];
pub const REQUIRED_COLUMNS: [&str; 3] = ["Sequence", "Modality", "Avg"];

/// One summary-sheet row, column name to cell value.
pub type SummaryRow = serde_json::Map<String, Value>;

/// Operator decision: the row with this normalized modality and sequence
/// was measured on `area`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AreaAssignment {
    pub modality: String,
    #[ts(type = "string | number")]
    pub sequence: Value,
    pub area: String,
}

/// A distinct modality label found in the sheet and what it normalized to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DetectedModality {
    pub original: String,
    pub normalized: ModalityCode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Extraction {
    pub detected: Vec<DetectedModality>,
    pub measurements: Vec<Measurement>,
    /// Assignments that did not resolve to a usable row.
    pub unmatched: Vec<SkippedMeasurement>,
}

impl Extraction {
    /// Canonical modalities present in the sheet, in first-seen order.
    pub fn qst_modalities(&self) -> Vec<Modality> {
        let mut seen = Vec::new();
        for m in self.detected.iter().filter_map(|d| d.normalized.modality()) {
            if !seen.contains(&m) {
                seen.push(m);
            }
        }
        seen
    }
}

/// Turn summary rows plus area assignments into measurements.
pub fn extract(rows: &[SummaryRow], assignments: &[AreaAssignment]) -> Result<Extraction, ExtractError> {
    check_columns(rows)?;

    let labelled: Vec<(ModalityCode, &SummaryRow)> = rows
        .iter()
        .map(|row| (normalize(&cell_text(row.get("Modality"))), row))
        .collect();

    let detected = detect_modalities(rows);
    if !detected.iter().any(|d| d.normalized.modality().is_some()) {
        return Err(ExtractError::NoQstModalities {
            available: detected.into_iter().map(|d| d.original).collect(),
        });
    }

    let mut measurements = Vec::new();
    let mut unmatched = Vec::new();

    for assignment in assignments {
        let area = assignment.area.trim().to_lowercase();
        let sequence = cell_text(Some(&assignment.sequence));
        if area.is_empty() {
            tracing::debug!(modality = %assignment.modality, %sequence, "no area selected");
            continue;
        }

        let Ok(modality) = assignment.modality.parse::<Modality>() else {
            unmatched.push(SkippedMeasurement::record(
                &assignment.modality,
                &area,
                None,
                SkipReason::UnknownModality,
                format!(
                    "Assignment for sequence {sequence} names unknown modality '{}'",
                    assignment.modality
                ),
            ));
            continue;
        };

        let row = labelled.iter().find(|(code, row)| {
            code.modality() == Some(modality) && cell_text(row.get("Sequence")) == sequence
        });
        let Some((_, row)) = row else {
            unmatched.push(SkippedMeasurement::record(
                modality.code(),
                &area,
                None,
                SkipReason::UnmatchedAssignment,
                format!("No {modality} row with sequence {sequence} (assigned to {area})"),
            ));
            continue;
        };

        let Some(value) = row.get("Avg").and_then(numeric) else {
            unmatched.push(SkippedMeasurement::record(
                modality.code(),
                &area,
                None,
                SkipReason::InvalidValue,
                format!(
                    "{modality} sequence {sequence} ({area}) has a non-numeric Avg: {}",
                    cell_text(row.get("Avg"))
                ),
            ));
            continue;
        };

        measurements.push(Measurement::new(modality.code(), area, value));
    }

    tracing::info!(
        rows = rows.len(),
        measurements = measurements.len(),
        unmatched = unmatched.len(),
        "summary extracted"
    );

    Ok(Extraction {
        detected,
        measurements,
        unmatched,
    })
}

/// Distinct `Modality` labels with their normalized codes, first-seen order.
pub fn detect_modalities(rows: &[SummaryRow]) -> Vec<DetectedModality> {
    let mut detected: Vec<DetectedModality> = Vec::new();
    for row in rows {
        let original = cell_text(row.get("Modality"));
        if detected.iter().any(|d| d.original == original) {
            continue;
        }
        detected.push(DetectedModality {
            normalized: normalize(&original),
            original,
        });
    }
    detected
}

fn check_columns(rows: &[SummaryRow]) -> Result<(), ExtractError> {
    let available: BTreeSet<&str> = rows.iter().flat_map(|r| r.keys().map(String::as_str)).collect();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|c| !available.contains(*c))
        .map(|c| c.to_string())
        .collect();

    if missing.is_empty() {
        let absent: Vec<&str> = EXPECTED_COLUMNS
            .into_iter()
            .filter(|c| !available.contains(c))
            .collect();
        if !absent.is_empty() {
            tracing::debug!(?absent, "optional summary columns not present");
        }
        return Ok(());
    }
    Err(ExtractError::MissingColumns {
        missing,
        available: available.into_iter().map(str::to_string).collect(),
    })
}

/// Cell contents as text. Integral numbers drop their fraction so a
/// sequence of `1.0` matches `"1"`.
fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
            _ => n.to_string(),
        },
        Some(other) => other.to_string(),
    }
}

fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
