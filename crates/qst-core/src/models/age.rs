use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Youngest age covered by the normative data.
pub const MIN_REFERENCE_AGE: f64 = 20.0;

/// Age partition used to select normative statistics.
///
/// Brackets are half-open, `[20,30) [30,40) [40,50) [50,60)`, with the
/// top bracket open-ended at 60.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum AgeBracket {
    #[serde(rename = "20-30")]
    From20To30,
    #[serde(rename = "30-40")]
    From30To40,
    #[serde(rename = "40-50")]
    From40To50,
    #[serde(rename = "50-60")]
    From50To60,
    #[serde(rename = ">60")]
    Over60,
}

impl AgeBracket {
    pub const ALL: [AgeBracket; 5] = [
        AgeBracket::From20To30,
        AgeBracket::From30To40,
        AgeBracket::From40To50,
        AgeBracket::From50To60,
        AgeBracket::Over60,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            AgeBracket::From20To30 => "20-30",
            AgeBracket::From30To40 => "30-40",
            AgeBracket::From40To50 => "40-50",
            AgeBracket::From50To60 => "50-60",
            AgeBracket::Over60 => ">60",
        }
    }
}

impl fmt::Display for AgeBracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Resolve the bracket for an age in years.
///
/// Returns `None` below 20 (no reference data exists) and for non-finite
/// input. A boundary age belongs to the bracket it opens, so 30 maps to
/// `30-40` and 60 to `>60`.
pub fn age_bracket_of(age: f64) -> Option<AgeBracket> {
    if !age.is_finite() || age < MIN_REFERENCE_AGE {
        return None;
    }
    let bracket = if age < 30.0 {
        AgeBracket::From20To30
    } else if age < 40.0 {
        AgeBracket::From30To40
    } else if age < 50.0 {
        AgeBracket::From40To50
    } else if age < 60.0 {
        AgeBracket::From50To60
    } else {
        AgeBracket::Over60
    };
    Some(bracket)
}
