use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

/// Body region a threshold was measured on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum BodyArea {
    Face,
    Hand,
    Feet,
}

impl BodyArea {
    pub const ALL: [BodyArea; 3] = [BodyArea::Face, BodyArea::Hand, BodyArea::Feet];

    pub fn as_str(&self) -> &'static str {
        match self {
            BodyArea::Face => "face",
            BodyArea::Hand => "hand",
            BodyArea::Feet => "feet",
        }
    }

    /// Capitalized form used in report tables ("Face", "Hand", "Feet").
    pub fn title(&self) -> &'static str {
        match self {
            BodyArea::Face => "Face",
            BodyArea::Hand => "Hand",
            BodyArea::Feet => "Feet",
        }
    }
}

impl fmt::Display for BodyArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BodyArea {
    type Err = CoreError;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "face" => Ok(BodyArea::Face),
            "hand" => Ok(BodyArea::Hand),
            "feet" => Ok(BodyArea::Feet),
            _ => Err(CoreError::UnknownBodyArea(s.to_string())),
        }
    }
}
