//! qst-norms
//!
//! Normative QST thermal threshold data and the rules that classify a
//! patient's measurements against it. Pure computation: the reference
//! table is compiled in and never mutated after first use.

pub mod analysis;
pub mod classify;
pub mod error;
pub mod extract;
pub mod reference;

pub use analysis::{analyze, Analysis, SkipReason, SkippedMeasurement};
pub use classify::classify;
pub use reference::{ReferenceEntry, ReferenceTable};
