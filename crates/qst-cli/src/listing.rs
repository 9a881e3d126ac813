use qst_core::models::age::{age_bracket_of, AgeBracket};
use qst_core::models::area::BodyArea;
use qst_core::models::modality::Modality;
use qst_core::models::patient::{PatientInfo, Sex};
use qst_norms::error::NormsError;
use qst_norms::ReferenceTable;
use serde::Serialize;

/// One normative cell as printed by `qst reference`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceRow {
    pub modality: Modality,
    pub body_area: BodyArea,
    pub mean: f64,
    pub standard_deviation: f64,
    pub log_transformed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceListing {
    pub sex: Sex,
    pub age_bracket: AgeBracket,
    pub entries: Vec<ReferenceRow>,
}

/// Normative values that apply to a patient of this sex and age. The age
/// goes through the same input validation as a session's patient.
pub fn reference_listing(table: &ReferenceTable, sex: Sex, age: u32) -> eyre::Result<ReferenceListing> {
    PatientInfo { sex, age }.validate()?;

    let age = f64::from(age);
    let age_bracket = age_bracket_of(age).ok_or(NormsError::AgeOutOfRange { age })?;

    let entries = table
        .bracket(sex, age_bracket)
        .map(|(key, entry)| ReferenceRow {
            modality: key.modality,
            body_area: key.body_area,
            mean: entry.mean,
            standard_deviation: entry.standard_deviation,
            log_transformed: key.modality.is_log_transformed(),
        })
        .collect();

    Ok(ReferenceListing {
        sex,
        age_bracket,
        entries,
    })
}
