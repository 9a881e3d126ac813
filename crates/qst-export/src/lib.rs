//! qst-export
//!
//! Text rendering of QST analyses: JSON for machines, a Tera-rendered
//! Markdown report for operators.

pub mod error;
pub mod render;
pub mod report;
