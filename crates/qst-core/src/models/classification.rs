use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Verdict for one measurement against its reference distribution.
///
/// `lower_limit`/`upper_limit` are in the space the reference statistics
/// were fit in: log10 units when `log_transformed`, raw units otherwise.
/// The `display_*` fields hold the back-transformed raw-unit values and
/// are only present for log-transformed modalities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ClassificationResult {
    pub patient_value: f64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub patient_log_value: Option<f64>,
    pub reference_mean: f64,
    pub reference_sd: f64,
    pub lower_limit: f64,
    pub upper_limit: f64,
    pub log_transformed: bool,
    pub is_normal: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub display_lower: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub display_upper: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub display_mean: Option<f64>,
}

impl ClassificationResult {
    /// Normal range in raw units, suitable for display.
    pub fn raw_range(&self) -> (f64, f64) {
        match (self.display_lower, self.display_upper) {
            (Some(lower), Some(upper)) => (lower, upper),
            _ => (self.lower_limit, self.upper_limit),
        }
    }

    /// Reference mean in raw units, suitable for display.
    pub fn raw_mean(&self) -> f64 {
        self.display_mean.unwrap_or(self.reference_mean)
    }
}
