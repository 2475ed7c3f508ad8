//! Borehole CLI library
//!
//! This module contains the core CLI logic for the borehole survey tool.

pub mod error_adapter;
pub mod report;

mod args;
mod config;
mod snapshot;

pub use args::Args;

use log::info;

use borehole::{
    BoreholeError, ReferenceRequest, Survey, identifier::BoreholeId, report::SurveyReport,
};

/// Run the borehole CLI application
///
/// Loads the snapshot, runs the survey, prints the result table and summary
/// to stdout and, when requested, exports the results to a TOML file.
///
/// # Errors
///
/// Returns `BoreholeError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Unsupported or malformed snapshots
/// - An empty result or an unknown reference borehole
pub fn run(args: &Args) -> Result<SurveyReport, BoreholeError> {
    info!(
        input_path = args.input,
        output_path:? = args.output;
        "Processing snapshot"
    );

    let app_config = config::load_config(args.config.as_ref())?;
    let snapshot = snapshot::load_snapshot(&args.input)?;

    let request = reference_request(args)?;
    let survey = Survey::new(app_config)?;
    let survey_report = survey.run(&snapshot, &request)?;

    print!("{}", report::render_table(&survey_report));
    print!("{}", report::render_summary(&survey_report));

    if let Some(output) = &args.output {
        report::export(&survey_report, output)?;
        info!(output_file = output; "Results exported successfully");
    }

    Ok(survey_report)
}

/// Builds the reference request from the command-line overrides
fn reference_request(args: &Args) -> Result<ReferenceRequest, BoreholeError> {
    let mut request = ReferenceRequest::new();

    if let Some(reference) = &args.reference {
        let identifier = BoreholeId::new(reference)
            .map_err(|err| BoreholeError::Config(format!("invalid --reference: {err}")))?;
        request = request.with_identifier(identifier);
    }
    if let Some(elevation) = args.reference_z {
        if !elevation.is_finite() {
            return Err(BoreholeError::Config(format!(
                "--reference-z must be finite, got {elevation}"
            )));
        }
        request = request.with_elevation(elevation);
    }

    Ok(request)
}
