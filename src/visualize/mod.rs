pub mod charts;
pub mod parser;

use std::path::PathBuf;

use crate::core::{
    RenderConfig, Result, SortplotErrorKind,
    utils::{ensure_input_file, ensure_output_dir, input_directory},
};

pub use charts::{DistributionChart, RenderReport, render_distributions};
pub use parser::{GroupedDataset, Point, Record, load_results};

pub const DEFAULT_INPUT: &str = "results.csv";

#[derive(Debug, Clone)]
pub struct VisualizeConfig {
    pub input: PathBuf,
    pub render: RenderConfig,
}

/// Load the results file and write one chart per distribution next to it,
/// or into `render.output_dir` when one is configured.
pub fn run(config: &VisualizeConfig) -> Result<RenderReport> {
    tracing::debug!("Visualizing with config: {:?}", config);

    ensure_input_file(&config.input)?;
    let dataset = load_results(&config.input)?;

    let output_dir = match &config.render.output_dir {
        Some(dir) => {
            ensure_output_dir(dir)?;
            dir.clone()
        }
        None => input_directory(&config.input)?,
    };
    tracing::debug!("Output directory: {}", output_dir.display());

    let report = render_distributions(&dataset, &output_dir, &config.render)?;

    if !report.is_success() {
        let failed: Vec<&str> = report.failed.iter().map(|(dist, _)| dist.as_str()).collect();
        tracing::error!("Charts not written for: {}", failed.join(", "));
        return Err(SortplotErrorKind::RenderFailures {
            failed: report.failed.len(),
            total: report.total(),
        }
        .into());
    }

    tracing::debug!("{} chart(s) written", report.written.len());
    Ok(report)
}
