use qst_core::models::area::BodyArea;
use qst_core::models::classification::ClassificationResult;
use qst_core::models::modality::Modality;
use qst_norms::Analysis;
use serde::Serialize;

use crate::error::ExportError;
use crate::render::render_template;

pub const REPORT_TEMPLATE: &str = include_str!("../templates/report.md.tera");

/// Template context for a single-patient report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportContext {
    pub sex: String,
    pub age: String,
    pub age_bracket: String,
    pub classified: usize,
    pub abnormal: usize,
    pub sections: Vec<ReportSection>,
    pub skipped: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportSection {
    pub code: String,
    pub name: String,
    pub log_transformed: bool,
    pub rows: Vec<ReportRow>,
}

/// One table row, every number already formatted to two decimals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub body_area: String,
    pub patient_value: String,
    pub reference_mean: String,
    pub reference_sd: String,
    pub normal_range: String,
    pub status: String,
}

impl ReportRow {
    pub fn new(body_area: BodyArea, result: &ClassificationResult) -> Self {
        let (lower, upper) = result.raw_range();
        let (reference_mean, reference_sd) = if result.log_transformed {
            (
                format!("{:.2} (log10: {:.2})", result.raw_mean(), result.reference_mean),
                format!("{:.2} (in log10 space)", result.reference_sd),
            )
        } else {
            (
                format!("{:.2}", result.reference_mean),
                format!("{:.2}", result.reference_sd),
            )
        };

        Self {
            body_area: body_area.title().to_string(),
            patient_value: format!("{:.2}", result.patient_value),
            reference_mean,
            reference_sd,
            normal_range: format!("{lower:.2} to {upper:.2}"),
            status: if result.is_normal { "Normal" } else { "Abnormal" }.to_string(),
        }
    }
}

pub fn build_context(analysis: &Analysis) -> ReportContext {
    let sections = Modality::ALL
        .into_iter()
        .filter_map(|modality| {
            let areas = analysis.results.get(&modality)?;
            let rows = BodyArea::ALL
                .into_iter()
                .filter_map(|area| areas.get(&area).map(|r| ReportRow::new(area, r)))
                .collect();
            Some(ReportSection {
                code: modality.code().to_string(),
                name: modality.name().to_string(),
                log_transformed: modality.is_log_transformed(),
                rows,
            })
        })
        .collect();

    ReportContext {
        sex: analysis.sex.to_string(),
        age: analysis.age.to_string(),
        age_bracket: analysis.age_bracket.to_string(),
        classified: analysis.classified(),
        abnormal: analysis.abnormal().count(),
        sections,
        skipped: analysis.skipped.iter().map(|s| s.message.clone()).collect(),
    }
}

/// Render the built-in Markdown report.
pub fn render_report(analysis: &Analysis) -> Result<String, ExportError> {
    render_report_with(REPORT_TEMPLATE, analysis)
}

/// Render a caller-supplied report template against the same context.
pub fn render_report_with(template_content: &str, analysis: &Analysis) -> Result<String, ExportError> {
    let context = build_context(analysis);
    let rendered = render_template("report.md", template_content, &context)?;
    tracing::debug!(sections = context.sections.len(), bytes = rendered.len(), "report rendered");
    Ok(rendered)
}

pub fn to_json(analysis: &Analysis) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(analysis)?)
}
