use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

/// The four thermal QST modalities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "UPPERCASE")]
#[ts(export)]
pub enum Modality {
    /// Cold Detection Threshold.
    Cdt,
    /// Warm Detection Threshold.
    Wdt,
    /// Cold Pain Threshold.
    Cpt,
    /// Heat Pain Threshold.
    Hpt,
}

/// Modalities whose normative mean/SD were fit on log10-transformed values.
pub const LOG_TRANSFORMED: [Modality; 2] = [Modality::Cdt, Modality::Wdt];

impl Modality {
    pub const ALL: [Modality; 4] = [Modality::Cdt, Modality::Wdt, Modality::Cpt, Modality::Hpt];

    pub fn code(&self) -> &'static str {
        match self {
            Modality::Cdt => "CDT",
            Modality::Wdt => "WDT",
            Modality::Cpt => "CPT",
            Modality::Hpt => "HPT",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Modality::Cdt => "Cold Detection Threshold",
            Modality::Wdt => "Warm Detection Threshold",
            Modality::Cpt => "Cold Pain Threshold",
            Modality::Hpt => "Heat Pain Threshold",
        }
    }

    pub fn is_log_transformed(&self) -> bool {
        LOG_TRANSFORMED.contains(self)
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Modality {
    type Err = CoreError;

    /// Parses a canonical code ("CDT", "wdt", ...). Free-text labels go
    /// through [`normalize`] instead.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Modality::ALL
            .into_iter()
            .find(|m| m.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CoreError::UnknownModality(s.to_string()))
    }
}

/// Outcome of normalizing a free-text modality label.
///
/// Labels that match none of the known phrases are carried through
/// untouched so callers can report them and exclude them from analysis.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ModalityCode {
    Canonical(Modality),
    Unrecognized(String),
}

impl ModalityCode {
    pub fn modality(&self) -> Option<Modality> {
        match self {
            ModalityCode::Canonical(m) => Some(*m),
            ModalityCode::Unrecognized(_) => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ModalityCode::Canonical(m) => m.code(),
            ModalityCode::Unrecognized(label) => label,
        }
    }
}

impl fmt::Display for ModalityCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a summary-sheet modality label to its canonical code.
///
/// Case-insensitive substring match, first hit wins:
/// "cold detection", "warm detection", "cold pain", then "hot pain" or
/// "heat pain".
pub fn normalize(label: &str) -> ModalityCode {
    let lower = label.to_lowercase();

    let modality = if lower.contains("cold detection") {
        Modality::Cdt
    } else if lower.contains("warm detection") {
        Modality::Wdt
    } else if lower.contains("cold pain") {
        Modality::Cpt
    } else if lower.contains("hot pain") || lower.contains("heat pain") {
        Modality::Hpt
    } else {
        return ModalityCode::Unrecognized(label.to_string());
    };

    ModalityCode::Canonical(modality)
}
