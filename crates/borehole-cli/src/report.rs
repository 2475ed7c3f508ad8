//! Console rendering and file export of survey results.

use std::{fmt::Write as _, fs, path::Path};

use log::info;
use serde::Serialize;

use borehole::{
    BoreholeError,
    registry::ResolutionMode,
    report::{BoreholeRecord, SurveyReport, SurveyStats},
};

const RULE_WIDTH: usize = 80;
const MISSING: &str = "n/a";
const WRITE_INFALLIBLE: &str = "Writing to String buffer is infallible";

/// Formats an optional value with two decimals
fn decimal(value: Option<f64>) -> String {
    value.map_or_else(|| MISSING.to_string(), |v| format!("{v:.2}"))
}

/// Renders the borehole table, one row per borehole in identifier order.
pub fn render_table(report: &SurveyReport) -> String {
    let rule = "-".repeat(RULE_WIDTH);
    let mut out = String::new();

    writeln!(out, "{rule}").expect(WRITE_INFALLIBLE);
    writeln!(
        out,
        "{:<8} {:>10} {:>10} {:>10} {:>10} {:>10}  {:<9}",
        "ID", "X", "Y", "Z", "ELEV", "REL", "STATUS"
    )
    .expect(WRITE_INFALLIBLE);
    writeln!(out, "{rule}").expect(WRITE_INFALLIBLE);

    for borehole in report.boreholes() {
        let position = borehole.position();
        let status = if borehole.is_reference() {
            "reference"
        } else {
            ""
        };
        writeln!(
            out,
            "{:<8} {:>10.2} {:>10.2} {:>10.2} {:>10} {:>10}  {:<9}",
            borehole.identifier().as_str(),
            position.x(),
            position.y(),
            position.z(),
            decimal(borehole.elevation()),
            decimal(borehole.relative_height()),
            status,
        )
        .expect(WRITE_INFALLIBLE);
    }

    writeln!(out, "{rule}").expect(WRITE_INFALLIBLE);
    out
}

/// Renders the counters and height spread below the table.
pub fn render_summary(report: &SurveyReport) -> String {
    let stats = report.stats();
    let mut out = String::new();

    writeln!(
        out,
        "Boreholes found: {} (from {})",
        stats.resolved,
        report.mode()
    )
    .expect(WRITE_INFALLIBLE);
    match report.reference() {
        Some(reference) => {
            writeln!(
                out,
                "Reference: {} at elevation {:.2}",
                reference.identifier(),
                report.reference_elevation()
            )
            .expect(WRITE_INFALLIBLE);
        }
        None => {
            writeln!(out, "Reference: not selected").expect(WRITE_INFALLIBLE);
        }
    }

    if let Some(heights) = stats.heights {
        writeln!(out, "Relative height min: {:.2}", heights.min).expect(WRITE_INFALLIBLE);
        writeln!(out, "Relative height max: {:.2}", heights.max).expect(WRITE_INFALLIBLE);
        writeln!(out, "Relative height mean: {:.2}", heights.mean).expect(WRITE_INFALLIBLE);
    }

    write!(
        out,
        "Entities: {} labels, {} markers, {} symbols",
        stats.labels, stats.markers, stats.symbols
    )
    .expect(WRITE_INFALLIBLE);
    if stats.filtered_out > 0 {
        write!(out, " ({} filtered out)", stats.filtered_out).expect(WRITE_INFALLIBLE);
    }
    writeln!(out).expect(WRITE_INFALLIBLE);

    let skipped = [
        (stats.duplicates, "duplicate identifiers dropped"),
        (stats.fallback_identifiers, "sequential identifiers assigned"),
        (stats.unparsed_labels, "labels without a borehole number"),
        (stats.unmatched_markers, "markers without a label"),
        (stats.label_only, "boreholes placed at their label"),
        (stats.non_finite, "entities with non-finite coordinates skipped"),
    ];
    for (count, what) in skipped {
        if count > 0 {
            writeln!(out, "  {count} {what}").expect(WRITE_INFALLIBLE);
        }
    }

    out
}

/// On-disk layout of an exported report.
#[derive(Debug, Serialize)]
struct ExportDocument<'a> {
    mode: ResolutionMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    reference: Option<&'a str>,
    reference_elevation: f64,
    stats: &'a SurveyStats,
    #[serde(rename = "borehole")]
    boreholes: Vec<BoreholeRecord>,
}

impl<'a> From<&'a SurveyReport> for ExportDocument<'a> {
    fn from(report: &'a SurveyReport) -> Self {
        Self {
            mode: report.mode(),
            reference: report.reference().map(|b| b.identifier().as_str()),
            reference_elevation: report.reference_elevation(),
            stats: report.stats(),
            boreholes: report.records(),
        }
    }
}

/// Serializes the report to TOML text.
pub fn to_toml(report: &SurveyReport) -> Result<String, BoreholeError> {
    toml::to_string(&ExportDocument::from(report))
        .map_err(|err| BoreholeError::Export(err.to_string()))
}

/// Writes the report as TOML to `path`.
pub fn export(report: &SurveyReport, path: impl AsRef<Path>) -> Result<(), BoreholeError> {
    let path = path.as_ref();
    fs::write(path, to_toml(report)?)?;
    info!(path = path.display().to_string(); "Report exported");
    Ok(())
}
