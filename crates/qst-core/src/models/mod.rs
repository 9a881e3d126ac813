pub mod age;
pub mod area;
pub mod classification;
pub mod measurement;
pub mod modality;
pub mod patient;
