//! Per-column distribution plots.
//!
//! Every column of a table (the date index excluded) becomes one histogram
//! panel. Panels are stacked vertically in a single PNG.

use chrono::Datelike;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;
use tracing::info;
use tsprep_common::{Result, Table, TsPrepError, Value};
use tsprep_config::PlotConfig;

const CAPTION_FONT: (&str, f64) = ("sans-serif", 20.0);

/// Counted distribution of one column.
#[derive(Debug, Clone, PartialEq)]
pub enum Histogram {
    /// Equal-width bins spanning `[min, max]`.
    Numeric {
        /// Left edge of the first bin.
        min: f64,
        /// Right edge of the last bin.
        max: f64,
        /// Count per bin.
        counts: Vec<usize>,
    },
    /// One bar per distinct value, in first-appearance order.
    Categorical {
        /// Distinct values.
        labels: Vec<String>,
        /// Count per label.
        counts: Vec<usize>,
    },
    /// The column holds nothing but missing values.
    Empty,
}

impl Histogram {
    /// Total number of values counted.
    pub fn total(&self) -> usize {
        match self {
            Self::Numeric { counts, .. } | Self::Categorical { counts, .. } => counts.iter().sum(),
            Self::Empty => 0,
        }
    }

    fn max_count(&self) -> usize {
        match self {
            Self::Numeric { counts, .. } | Self::Categorical { counts, .. } => {
                counts.iter().copied().max().unwrap_or(0)
            }
            Self::Empty => 0,
        }
    }
}

/// Counts `values` into a histogram. Nulls are skipped.
///
/// Columns holding any text or boolean are categorical. Dates are binned by
/// day number. When every value is equal the range is widened by half a unit
/// on each side. `bins` below 1 is treated as 1.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
pub fn histogram(values: &[&Value], bins: usize) -> Histogram {
    let present: Vec<&Value> = values.iter().copied().filter(|v| !v.is_null()).collect();
    if present.is_empty() {
        return Histogram::Empty;
    }

    if present
        .iter()
        .any(|v| matches!(v, Value::Text(_) | Value::Bool(_)))
    {
        let mut labels: Vec<String> = Vec::new();
        let mut counts: Vec<usize> = Vec::new();
        for value in present {
            let label = value.to_field();
            match labels.iter().position(|l| *l == label) {
                Some(i) => counts[i] += 1,
                None => {
                    labels.push(label);
                    counts.push(1);
                }
            }
        }
        return Histogram::Categorical { labels, counts };
    }

    let numbers: Vec<f64> = present
        .iter()
        .filter_map(|v| numeric(v))
        .filter(|x| x.is_finite())
        .collect();
    if numbers.is_empty() {
        return Histogram::Empty;
    }

    let bins = bins.max(1);
    let mut min = numbers.iter().copied().fold(f64::INFINITY, f64::min);
    let mut max = numbers.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if (max - min).abs() < f64::EPSILON {
        min -= 0.5;
        max += 0.5;
    }

    let width = (max - min) / bins as f64;
    let mut counts = vec![0usize; bins];
    for x in numbers {
        let bin = (((x - min) / width) as usize).min(bins - 1);
        counts[bin] += 1;
    }
    Histogram::Numeric { min, max, counts }
}

fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Date(d) => Some(f64::from(d.num_days_from_ce())),
        other => other.as_f64(),
    }
}

/// Figure layout for [`plot_distributions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DistributionPlot {
    /// Figure width in pixels.
    pub width: u32,
    /// Height of each panel in pixels.
    pub panel_height: u32,
    /// Bins per numeric histogram.
    pub bins: usize,
    /// Draw panel titles and axis labels. Without them no text is rendered
    /// and no system font is needed.
    pub labelled: bool,
}

impl Default for DistributionPlot {
    fn default() -> Self {
        Self {
            width: 1000,
            panel_height: 300,
            bins: 20,
            labelled: true,
        }
    }
}

impl DistributionPlot {
    /// Layout taken from the `plot` configuration section.
    pub const fn from_config(config: &PlotConfig) -> Self {
        Self {
            width: config.width,
            panel_height: config.panel_height,
            bins: config.bins,
            labelled: true,
        }
    }

    /// One histogram per column, in column order.
    pub fn histograms(&self, table: &Table) -> Vec<(String, Histogram)> {
        table
            .columns()
            .iter()
            .enumerate()
            .map(|(pos, name)| {
                let cells: Vec<&Value> = table.rows().iter().map(|row| &row[pos]).collect();
                (name.clone(), histogram(&cells, self.bins))
            })
            .collect()
    }

    /// Renders every column's histogram into a PNG at `path`.
    pub fn render_to_file(&self, table: &Table, path: &Path) -> Result<()> {
        if table.columns().is_empty() {
            return Err(TsPrepError::plot("Table has no columns to plot"));
        }
        let histograms = self.histograms(table);

        let panels = u32::try_from(histograms.len())
            .map_err(|_| TsPrepError::plot("Too many columns to plot"))?;
        let height = self
            .panel_height
            .checked_mul(panels)
            .ok_or_else(|| TsPrepError::plot("Figure height overflows"))?;

        let root = BitMapBackend::new(path, (self.width, height)).into_drawing_area();
        root.fill(&WHITE)?;

        let areas = root.split_evenly((histograms.len(), 1));
        for ((name, hist), area) in histograms.iter().zip(&areas) {
            draw_panel(area, name, hist, self.labelled)?;
        }

        root.present()?;
        info!(path = %path.display(), panels, "Rendered distribution plot");
        Ok(())
    }
}

#[allow(clippy::cast_precision_loss)]
fn draw_panel<DB>(
    area: &DrawingArea<DB, Shift>,
    name: &str,
    hist: &Histogram,
    labelled: bool,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: std::error::Error + Send + Sync + 'static,
{
    let y_max = (hist.max_count() as f64 * 1.1).max(1.0);
    let bar_style = BLUE.mix(0.6).filled();

    // Bars as (left, right, count) in x-axis units.
    let (x_range, bars, labels): (_, Vec<(f64, f64, usize)>, &[String]) = match hist {
        Histogram::Empty => {
            if labelled {
                area.titled(name, CAPTION_FONT)?;
            }
            return Ok(());
        }
        Histogram::Numeric { min, max, counts } => {
            let width = (max - min) / counts.len() as f64;
            let bars = counts
                .iter()
                .enumerate()
                .map(|(i, &count)| {
                    let left = min + width * i as f64;
                    (left, left + width, count)
                })
                .collect();
            (*min..*max, bars, &[] as &[String])
        }
        Histogram::Categorical { labels, counts } => {
            let bars = counts
                .iter()
                .enumerate()
                .map(|(i, &count)| (i as f64 + 0.1, i as f64 + 0.9, count))
                .collect();
            (0f64..labels.len() as f64, bars, labels.as_slice())
        }
    };

    let label_at = |x: &f64| {
        if *x < 0.0 {
            return String::new();
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let i = x.floor() as usize;
        labels.get(i).cloned().unwrap_or_default()
    };

    let mut builder = ChartBuilder::on(area);
    builder.margin(10);
    if labelled {
        builder
            .caption(name, CAPTION_FONT)
            .x_label_area_size(30)
            .y_label_area_size(50);
    }
    let mut chart = builder.build_cartesian_2d(x_range, 0f64..y_max)?;

    if labelled {
        let mut mesh = chart.configure_mesh();
        mesh.disable_x_mesh();
        if !labels.is_empty() {
            mesh.x_labels(labels.len().min(20)).x_label_formatter(&label_at);
        }
        mesh.draw()?;
    }

    chart.draw_series(bars.into_iter().map(|(left, right, count)| {
        Rectangle::new([(left, 0.0), (right, count as f64)], bar_style)
    }))?;
    Ok(())
}

/// Plots every column of `table` with the default layout.
pub fn plot_distributions(table: &Table, path: &Path) -> Result<()> {
    DistributionPlot::default().render_to_file(table, path)
}
