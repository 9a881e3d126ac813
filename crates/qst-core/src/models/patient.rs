use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

/// Bounds the input layer accepts for a patient's age.
pub const MIN_INPUT_AGE: u32 = 18;
pub const MAX_INPUT_AGE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sex {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" => Ok(Sex::Male),
            "female" => Ok(Sex::Female),
            _ => Err(CoreError::InvalidSex(s.to_string())),
        }
    }
}

/// Patient demographics that select the normative reference data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PatientInfo {
    pub sex: Sex,
    /// Whole years.
    pub age: u32,
}

impl PatientInfo {
    /// Check the age against the input-layer bounds.
    ///
    /// Passing this does not guarantee a reference bracket exists: the
    /// normative data starts at 20.
    pub fn validate(&self) -> Result<(), CoreError> {
        if !(MIN_INPUT_AGE..=MAX_INPUT_AGE).contains(&self.age) {
            return Err(CoreError::InvalidAge {
                age: self.age,
                min: MIN_INPUT_AGE,
                max: MAX_INPUT_AGE,
            });
        }
        Ok(())
    }
}
