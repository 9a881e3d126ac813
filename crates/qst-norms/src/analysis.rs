use std::collections::BTreeMap;

use qst_core::models::age::{age_bracket_of, AgeBracket};
use qst_core::models::area::BodyArea;
use qst_core::models::classification::ClassificationResult;
use qst_core::models::measurement::Measurement;
use qst_core::models::modality::Modality;
use qst_core::models::patient::Sex;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::classify::classify_entry;
use crate::error::NormsError;
use crate::reference::ReferenceTable;

/// Why a measurement was left out of the results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum SkipReason {
    InvalidParameterName,
    UnknownModality,
    UnknownBodyArea,
    MissingReference,
    InvalidValue,
    Superseded,
    /// A summary-sheet area assignment that names no usable row.
    UnmatchedAssignment,
}

/// Diagnostic for a measurement excluded from the analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SkippedMeasurement {
    pub modality: String,
    pub body_area: String,
    /// Absent when the source cell was not numeric.
    pub value: Option<f64>,
    pub reason: SkipReason,
    /// Operator-facing explanation naming the parameter, area and cause.
    pub message: String,
}

impl SkippedMeasurement {
    fn new(measurement: &Measurement, reason: SkipReason, message: String) -> Self {
        Self::record(
            &measurement.modality,
            &measurement.body_area,
            Some(measurement.value),
            reason,
            message,
        )
    }

    pub(crate) fn record(
        modality: &str,
        body_area: &str,
        value: Option<f64>,
        reason: SkipReason,
        message: String,
    ) -> Self {
        tracing::warn!(%modality, %body_area, ?value, ?reason, "{message}");
        Self {
            modality: modality.to_string(),
            body_area: body_area.to_string(),
            value,
            reason,
            message,
        }
    }
}

/// Per-patient analysis output: results keyed by modality then body area,
/// plus a diagnostic for every measurement that could not be classified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Analysis {
    pub sex: Sex,
    pub age: f64,
    pub age_bracket: AgeBracket,
    pub results: BTreeMap<Modality, BTreeMap<BodyArea, ClassificationResult>>,
    pub skipped: Vec<SkippedMeasurement>,
}

impl Analysis {
    pub fn result(&self, modality: Modality, body_area: BodyArea) -> Option<&ClassificationResult> {
        self.results.get(&modality)?.get(&body_area)
    }

    /// Number of classified measurements.
    pub fn classified(&self) -> usize {
        self.results.values().map(BTreeMap::len).sum()
    }

    /// Classified measurements outside the normal range.
    pub fn abnormal(&self) -> impl Iterator<Item = (Modality, BodyArea, &ClassificationResult)> {
        self.results.iter().flat_map(|(modality, areas)| {
            areas
                .iter()
                .filter(|(_, r)| !r.is_normal)
                .map(move |(area, r)| (*modality, *area, r))
        })
    }

    /// Prepend diagnostics produced before analysis (e.g. by input parsing).
    pub fn with_skipped(mut self, mut earlier: Vec<SkippedMeasurement>) -> Self {
        earlier.append(&mut self.skipped);
        self.skipped = earlier;
        self
    }
}

/// Classify every measurement for one patient against `table`.
///
/// Fails only when the age has no reference bracket. Measurements with an
/// unknown modality or area, no reference entry, or a value that cannot be
/// log-transformed are skipped and reported in [`Analysis::skipped`]. When
/// two measurements share a modality and area, the later one replaces the
/// earlier result even if the later value itself cannot be classified.
pub fn analyze(
    table: &ReferenceTable,
    measurements: &[Measurement],
    sex: Sex,
    age: f64,
) -> Result<Analysis, NormsError> {
    let age_bracket = age_bracket_of(age).ok_or(NormsError::AgeOutOfRange { age })?;

    let mut results: BTreeMap<Modality, BTreeMap<BodyArea, ClassificationResult>> = BTreeMap::new();
    let mut origins: BTreeMap<(Modality, BodyArea), &Measurement> = BTreeMap::new();
    let mut skipped = Vec::new();

    for measurement in measurements {
        let Ok(modality) = measurement.modality.parse::<Modality>() else {
            skipped.push(SkippedMeasurement::new(
                measurement,
                SkipReason::UnknownModality,
                format!("Unknown parameter: {}", measurement.modality),
            ));
            continue;
        };

        let Ok(body_area) = measurement.body_area.parse::<BodyArea>() else {
            skipped.push(SkippedMeasurement::new(
                measurement,
                SkipReason::UnknownBodyArea,
                format!(
                    "Unknown body area for {modality}: {}",
                    measurement.body_area
                ),
            ));
            continue;
        };

        if let Some(previous) = origins.remove(&(modality, body_area)) {
            if let Some(areas) = results.get_mut(&modality) {
                areas.remove(&body_area);
                if areas.is_empty() {
                    results.remove(&modality);
                }
            }
            skipped.push(SkippedMeasurement::new(
                previous,
                SkipReason::Superseded,
                format!(
                    "{modality} {body_area} value {} was replaced by a later measurement ({})",
                    previous.value, measurement.value
                ),
            ));
        }

        let entry = match table.lookup(sex, age_bracket, modality, body_area) {
            Ok(entry) => entry,
            Err(e) => {
                skipped.push(SkippedMeasurement::new(
                    measurement,
                    SkipReason::MissingReference,
                    capitalize(&e.to_string()),
                ));
                continue;
            }
        };
        tracing::debug!(%modality, %body_area, mean = entry.mean, sd = entry.standard_deviation, "reference entry");

        let result = match classify_entry(measurement.value, entry, modality) {
            Ok(result) => result,
            Err(e) => {
                skipped.push(SkippedMeasurement::new(
                    measurement,
                    SkipReason::InvalidValue,
                    format!("{modality} {body_area}: {}", capitalize(&e.to_string())),
                ));
                continue;
            }
        };

        origins.insert((modality, body_area), measurement);
        results.entry(modality).or_default().insert(body_area, result);
    }

    let analysis = Analysis {
        sex,
        age,
        age_bracket,
        results,
        skipped,
    };
    tracing::info!(
        %sex,
        %age_bracket,
        classified = analysis.classified(),
        skipped = analysis.skipped.len(),
        "analysis complete"
    );
    Ok(analysis)
}

/// Convert `<MODALITY>_<area>` parameters into measurements. Names that do
/// not split into exactly two parts are returned as diagnostics.
pub fn parse_parameters<'a>(
    parameters: impl IntoIterator<Item = (&'a String, &'a f64)>,
) -> (Vec<Measurement>, Vec<SkippedMeasurement>) {
    let mut measurements = Vec::new();
    let mut skipped = Vec::new();

    for (name, value) in parameters {
        match Measurement::from_parameter(name, *value) {
            Ok(m) => measurements.push(m),
            Err(e) => {
                let raw = Measurement::new(name.as_str(), "", *value);
                skipped.push(SkippedMeasurement::new(
                    &raw,
                    SkipReason::InvalidParameterName,
                    capitalize(&e.to_string()),
                ));
            }
        }
    }
    (measurements, skipped)
}

/// Analyze measurements given as `<MODALITY>_<area>` parameters.
pub fn analyze_parameters(
    table: &ReferenceTable,
    parameters: &BTreeMap<String, f64>,
    sex: Sex,
    age: f64,
) -> Result<Analysis, NormsError> {
    let (measurements, skipped) = parse_parameters(parameters);
    Ok(analyze(table, &measurements, sex, age)?.with_skipped(skipped))
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
