use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid sex: {0} (expected 'male' or 'female')")]
    InvalidSex(String),

    #[error("unknown body area: {0}")]
    UnknownBodyArea(String),

    #[error("unknown parameter: {0}")]
    UnknownModality(String),

    #[error("invalid parameter name format: {0}")]
    InvalidParameterName(String),

    #[error("age {age} is outside the accepted input range [{min}, {max}]")]
    InvalidAge { age: u32, min: u32, max: u32 },
}
