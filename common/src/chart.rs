use serde::Serialize;
use tracing::debug;

use crate::{
    aggregate::Aggregator,
    config::Config,
    data::{UnifiedTable, load_table},
    error::ReportError,
    keys::Keys,
    layout::{Layout, SlotKey},
    util::{legend_label, log_bound, max_positive, min_positive},
};

pub const X_LABEL: &str = "Data Size";
pub const Y_LABEL: &str = "Average Execution Time (μs) - Log Scale";
/// Horizontal extent of a panel either side of its group centre, always wider than the group
const X_MARGIN: f64 = 1.0;
/// Decades of headroom below the smallest io bar
const LOWER_PAD: f64 = 0.1;
/// Decades of headroom above the tallest bar, leaves room for the value labels
const UPPER_PAD: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AxisScale {
    Linear,
    Log,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSlot {
    pub key: SlotKey,
    pub offset: i32,
    /// Bar centre
    pub x: f64,
    pub height: f64,
    pub legend: String,
    pub label: String,
}

impl BarSlot {
    /// Zero height comparison bars have no extent on a log axis
    pub fn is_renderable(&self) -> bool {
        self.height.is_finite() && self.height > 0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Panel {
    pub experiment: String,
    pub size: u64,
    pub group: usize,
    pub title: String,
    pub center: f64,
    pub x_range: (f64, f64),
    pub bars: Vec<BarSlot>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartModel {
    pub name: String,
    /// One row per experiment
    pub rows: usize,
    /// One column per size
    pub columns: usize,
    pub panels: Vec<Panel>,
    pub bar_width: f64,
    pub y_scale: AxisScale,
    pub y_range: (f64, f64),
    pub x_label: String,
    pub y_label: String,
}

/// Loads the configured files and builds the chart for them
pub fn prepare(config: &Config) -> Result<ChartModel, ReportError> {
    let table = load_table(&config.root_path, &config.file_names)?;
    let keys = Keys::extract(&table, &config.baseline_names)?;
    debug!(
        "{} rows, sizes {:?}, experiments {:?}, comparisons {:?}",
        table.len(),
        keys.axes.sizes,
        keys.axes.experiments,
        keys.names.comparison
    );
    ChartModel::build(config, &table, &keys)
}

impl ChartModel {
    pub fn build(config: &Config, table: &UnifiedTable, keys: &Keys) -> Result<Self, ReportError> {
        let sizes = &keys.axes.sizes;
        let experiments = &keys.axes.experiments;
        if sizes.is_empty() || experiments.is_empty() {
            return Err(ReportError::EmptyDataset(
                "no sizes or experiments to plot".to_owned(),
            ));
        }

        let layout = Layout::new(
            sizes.len(),
            &config.file_names,
            &keys.names.comparison,
            config.bar_width,
        );
        let aggregator = Aggregator::new(table, sizes);
        let baseline_file = config.baseline_source();
        let baselines = &config.baseline_names;

        let baseline_series = |name: &str, experiment: &str| {
            sizes
                .iter()
                .map(|size| aggregator.experiment_baseline(baseline_file, name, experiment, *size))
                .collect::<Result<Vec<_>, _>>()
        };

        let mut panels = Vec::with_capacity(experiments.len() * sizes.len());
        let mut io_values = Vec::with_capacity(experiments.len() * sizes.len());
        for experiment in experiments {
            let native_opt = baseline_series(&baselines.native_opt, experiment)?;
            let io = baseline_series(&baselines.io, experiment)?;
            let columns = layout
                .slots
                .iter()
                .map(|slot| match &slot.key {
                    SlotKey::NativeOpt => native_opt.clone(),
                    SlotKey::Io => io.clone(),
                    SlotKey::Comparison { source_file, name } => {
                        aggregator.comparison_series(source_file, name, experiment)
                    }
                })
                .collect::<Vec<_>>();

            for (group, size) in sizes.iter().enumerate() {
                let bars = layout
                    .slots
                    .iter()
                    .zip(&columns)
                    .map(|(slot, column)| {
                        let height = column[group];
                        BarSlot {
                            key: slot.key.clone(),
                            offset: slot.offset,
                            x: layout.x(group, slot),
                            height,
                            legend: legend_for(config, &slot.key),
                            label: format!("{height:.1}"),
                        }
                    })
                    .collect::<Vec<_>>();

                if !bars.iter().any(BarSlot::is_renderable) {
                    return Err(ReportError::EmptyBars(format!(
                        "experiment '{experiment}', size {size}"
                    )));
                }

                let center = layout.positions[group];
                panels.push(Panel {
                    experiment: experiment.clone(),
                    size: *size,
                    group,
                    title: format!("{experiment} Experiment: Performance Comparison (Log Scale)"),
                    center,
                    x_range: (center - X_MARGIN, center + X_MARGIN),
                    bars,
                });
            }

            for (size, value) in sizes.iter().zip(&io) {
                if !(value.is_finite() && *value > 0.0) {
                    return Err(ReportError::EmptyBars(format!(
                        "'{}' baseline for experiment '{experiment}', size {size} is {value}, the log axis needs a positive minimum",
                        baselines.io
                    )));
                }
            }
            io_values.extend(io);
        }

        let min_io = min_positive(io_values.iter().copied()).ok_or_else(|| {
            ReportError::EmptyBars(format!("no positive '{}' baseline value", baselines.io))
        })?;

        let lower = log_bound(min_io, -LOWER_PAD);
        let tallest = max_positive(panels.iter().flat_map(|p| p.bars.iter().map(|b| b.height)))
            .unwrap_or(min_io);
        let upper = log_bound(tallest, UPPER_PAD).max(lower * 10.0);

        Ok(Self {
            name: config.name.clone(),
            rows: experiments.len(),
            columns: sizes.len(),
            panels,
            bar_width: layout.bar_width,
            y_scale: AxisScale::Log,
            y_range: (lower, upper),
            x_label: X_LABEL.to_owned(),
            y_label: Y_LABEL.to_owned(),
        })
    }

    pub fn bars_per_panel(&self) -> Option<usize> {
        self.panels.first().map(|p| p.bars.len())
    }
}

fn legend_for(config: &Config, key: &SlotKey) -> String {
    match key {
        SlotKey::NativeOpt => config.baseline_names.native_opt.clone(),
        SlotKey::Io => config.baseline_names.io.clone(),
        SlotKey::Comparison { source_file, name } => {
            let label = config
                .file_names
                .iter()
                .find(|f| &f.file == source_file)
                .map_or(source_file.as_str(), |f| f.label.as_str());
            legend_label(label, name)
        }
    }
}
