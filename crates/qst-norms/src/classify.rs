use qst_core::models::classification::ClassificationResult;
use qst_core::models::modality::Modality;

use crate::error::NormsError;
use crate::reference::ReferenceEntry;

/// Half-width of the normal range, in standard deviations.
pub const NORMAL_RANGE_SDS: f64 = 2.0;

/// Classify a raw patient value against a reference distribution.
///
/// When `is_log_transformed` is set, `mean` and `sd` are log10-space
/// statistics: the value is log10-transformed and compared against
/// log-space bounds. The back-transformed `display_*` fields are for
/// presentation only and never decide the verdict.
pub fn classify(
    value: f64,
    mean: f64,
    sd: f64,
    is_log_transformed: bool,
) -> Result<ClassificationResult, NormsError> {
    let lower_limit = mean - NORMAL_RANGE_SDS * sd;
    let upper_limit = mean + NORMAL_RANGE_SDS * sd;

    if !is_log_transformed {
        return Ok(ClassificationResult {
            patient_value: value,
            patient_log_value: None,
            reference_mean: mean,
            reference_sd: sd,
            lower_limit,
            upper_limit,
            log_transformed: false,
            is_normal: lower_limit <= value && value <= upper_limit,
            display_lower: None,
            display_upper: None,
            display_mean: None,
        });
    }

    if value.is_nan() || value <= 0.0 {
        return Err(NormsError::InvalidInput { value });
    }
    let log_value = value.log10();

    Ok(ClassificationResult {
        patient_value: value,
        patient_log_value: Some(log_value),
        reference_mean: mean,
        reference_sd: sd,
        lower_limit,
        upper_limit,
        log_transformed: true,
        is_normal: lower_limit <= log_value && log_value <= upper_limit,
        display_lower: Some(from_log(lower_limit)),
        display_upper: Some(from_log(upper_limit)),
        display_mean: Some(from_log(mean)),
    })
}

/// Classify against a table entry, taking the transform from the modality.
pub fn classify_entry(
    value: f64,
    entry: ReferenceEntry,
    modality: Modality,
) -> Result<ClassificationResult, NormsError> {
    classify(
        value,
        entry.mean,
        entry.standard_deviation,
        modality.is_log_transformed(),
    )
}

fn from_log(log_value: f64) -> f64 {
    10f64.powf(log_value)
}
