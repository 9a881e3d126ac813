use qst_core::models::age::AgeBracket;
use qst_core::models::area::BodyArea;
use qst_core::models::modality::Modality;
use qst_core::models::patient::Sex;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum NormsError {
    #[error("no reference values for {modality} in {body_area}, {sex}, age group {age_bracket}")]
    ReferenceNotFound {
        sex: Sex,
        age_bracket: AgeBracket,
        modality: Modality,
        body_area: BodyArea,
    },

    #[error("can't log-transform value {value} (must be positive)")]
    InvalidInput { value: f64 },

    #[error("age must be at least 20 years (got {age})")]
    AgeOutOfRange { age: f64 },
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error(
        "missing essential columns in summary sheet: {} (available: {})",
        .missing.join(", "),
        .available.join(", ")
    )]
    MissingColumns {
        missing: Vec<String>,
        available: Vec<String>,
    },

    #[error(
        "could not find or normalize modalities to CDT, WDT, CPT, or HPT (available: {})",
        .available.join(", ")
    )]
    NoQstModalities { available: Vec<String> },
}
