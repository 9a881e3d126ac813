//! qst-core
//!
//! Pure domain types for quantitative sensory testing (QST) analysis.
//! No reference data lives here; this is the shared vocabulary of the
//! analyzer: sexes, age brackets, modalities, body areas, measurements
//! and classification results.

pub mod error;
pub mod models;
