//! Rendering one comparison chart per distribution.

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use charming::{
    Chart, ImageFormat, ImageRenderer,
    component::{Axis, Grid, Legend, Title},
    element::{AxisType, SplitLine, Symbol},
    series::Line,
    theme::Theme,
};

use crate::{
    core::{
        RenderConfig,
        error::{Result, SortplotError, SortplotErrorKind},
        utils,
    },
    visualize::parser::{GroupedDataset, Point},
};

pub const X_AXIS_LABEL: &str = "Array size (n)";
pub const Y_AXIS_LABEL: &str = "Time (ms)";

/// One chart under construction. Created per distribution and dropped once saved,
/// so nothing drawn for one distribution leaks into the next.
#[derive(Debug)]
pub struct DistributionChart {
    distribution: String,
    series: Vec<(String, Vec<Vec<f64>>)>,
}

impl DistributionChart {
    pub fn new(distribution: impl Into<String>) -> Self {
        Self {
            distribution: distribution.into(),
            series: Vec::new(),
        }
    }

    /// Add a line for one algorithm. Points are drawn in the order given.
    pub fn add_series(&mut self, algorithm: &str, points: &[Point]) -> &mut Self {
        let data = points
            .iter()
            .map(|point| vec![point.n as f64, point.time_ms])
            .collect();
        self.series.push((algorithm.to_string(), data));
        self
    }

    pub fn distribution(&self) -> &str {
        &self.distribution
    }

    pub fn title(&self) -> String {
        format!("Sorting performance on {} data", self.distribution)
    }

    fn series_names(&self) -> impl Iterator<Item = &str> {
        self.series.iter().map(|(name, _)| name.as_str())
    }

    pub fn file_name(&self) -> String {
        utils::chart_file_name(&self.distribution)
    }

    pub fn build(&self) -> Chart {
        let mut chart = Chart::new()
            .title(Title::new().text(self.title()))
            .legend(Legend::new())
            .grid(
                Grid::new()
                    .left("3%")
                    .right("4%")
                    .bottom("3%")
                    .contain_label(true),
            )
            .x_axis(
                Axis::new()
                    .type_(AxisType::Value)
                    .name(X_AXIS_LABEL)
                    .split_line(SplitLine::new().show(true)),
            )
            .y_axis(
                Axis::new()
                    .type_(AxisType::Value)
                    .name(Y_AXIS_LABEL)
                    .split_line(SplitLine::new().show(true)),
            );

        for (algorithm, data) in &self.series {
            chart = chart.series(
                Line::new()
                    .name(algorithm.as_str())
                    .symbol(Symbol::Circle)
                    .data(data.clone()),
            );
        }

        chart
    }
}

/// What happened to each distribution during a render pass
#[derive(Debug, Default)]
pub struct RenderReport {
    pub written: Vec<PathBuf>,
    pub failed: Vec<(String, SortplotError)>,
}

impl RenderReport {
    pub fn total(&self) -> usize {
        self.written.len() + self.failed.len()
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Lazily build one chart per distribution, in first-seen order
pub fn build_charts(dataset: &GroupedDataset) -> impl Iterator<Item = DistributionChart> + '_ {
    dataset.distributions().map(|(distribution, algorithms)| {
        let mut chart = DistributionChart::new(distribution);
        for (algorithm, points) in algorithms {
            chart.add_series(algorithm, points);
        }
        chart
    })
}

/// Render every distribution of the dataset to `output_dir` as PNG.
///
/// A failure on one chart is logged and recorded in the report; the remaining
/// charts are still attempted unless `fail_fast` is set.
pub fn render_distributions(
    dataset: &GroupedDataset,
    output_dir: &Path,
    render_config: &RenderConfig,
) -> Result<RenderReport> {
    let mut report = RenderReport::default();

    if dataset.is_empty() {
        tracing::warn!("No benchmark rows found, no charts written");
        return Ok(report);
    }

    render_config.validate()?;
    let mut renderer =
        ImageRenderer::new(render_config.width, render_config.height).theme(Theme::Walden);

    let mut seen_files = HashSet::new();

    for chart in build_charts(dataset) {
        let file_name = chart.file_name();
        if !seen_files.insert(file_name.clone()) {
            tracing::warn!(
                "Distribution '{}' maps to {} which was already written, overwriting it",
                chart.distribution(),
                file_name
            );
        }

        let path = output_dir.join(&file_name);
        match save_chart(&mut renderer, &chart, &path) {
            Ok(()) => {
                tracing::info!("Plot saved to {file_name}");
                report.written.push(path);
            }
            Err(e) => {
                tracing::error!("{e}");
                if render_config.fail_fast {
                    return Err(e);
                }
                report.failed.push((chart.distribution().to_string(), e));
            }
        }
    }

    Ok(report)
}

fn save_chart(renderer: &mut ImageRenderer, chart: &DistributionChart, path: &Path) -> Result<()> {
    tracing::debug!(
        "Rendering '{}' with series: {}",
        chart.distribution(),
        chart.series_names().collect::<Vec<_>>().join(", ")
    );

    let bytes = renderer.render_format(ImageFormat::Png, &chart.build())?;
    std::fs::write(path, bytes).map_err(|e| {
        SortplotError::from(SortplotErrorKind::ChartWriteFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
        .with_hint(write_hint(&e))
    })
}

fn write_hint(error: &std::io::Error) -> Option<&'static str> {
    match error.kind() {
        std::io::ErrorKind::NotFound => Some("Check that the output directory exists."),
        std::io::ErrorKind::PermissionDenied => {
            Some("Check that the output directory is writable.")
        }
        _ => None,
    }
}
