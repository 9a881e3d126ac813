use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

/// A single observed threshold, keyed by modality code and body area.
///
/// Both keys are carried as text: the analysis validates them and skips
/// the measurement with a diagnostic when either is not recognized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Measurement {
    pub modality: String,
    pub body_area: String,
    pub value: f64,
}

impl Measurement {
    pub fn new(modality: impl Into<String>, body_area: impl Into<String>, value: f64) -> Self {
        Self {
            modality: modality.into(),
            body_area: body_area.into(),
            value,
        }
    }

    /// Build a measurement from a `<MODALITY>_<area>` parameter name,
    /// e.g. `CDT_face`.
    pub fn from_parameter(name: &str, value: f64) -> Result<Self, CoreError> {
        let parts: Vec<&str> = name.split('_').collect();
        match parts.as_slice() {
            [modality, area] => Ok(Self::new(*modality, *area, value)),
            _ => Err(CoreError::InvalidParameterName(name.to_string())),
        }
    }

    /// The `<MODALITY>_<area>` name for this measurement.
    pub fn parameter_name(&self) -> String {
        format!("{}_{}", self.modality, self.body_area)
    }
}
