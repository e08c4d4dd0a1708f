use crate::error::Result;
use crate::models::{
    ExtremeKind, ExtremeSet, Metric, MetricAverages, MetricExtreme, OverallSummary, YearSummary,
};
use clap::ValueEnum;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

/// Renders an [`OverallSummary`] for people (text) or programs (JSON).
pub struct ReportWriter {
    format: ReportFormat,
}

impl ReportWriter {
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    pub fn render(&self, summary: &OverallSummary) -> Result<String> {
        match self.format {
            ReportFormat::Text => Ok(render_text(summary)),
            ReportFormat::Json => Ok(serde_json::to_string_pretty(summary)?),
        }
    }

    pub fn write_to_file(&self, summary: &OverallSummary, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        fs::write(path, self.render(summary)?)?;
        Ok(())
    }
}

impl Default for ReportWriter {
    fn default() -> Self {
        Self::new(ReportFormat::default())
    }
}

fn render_text(summary: &OverallSummary) -> String {
    let mut out = String::new();

    out.push_str("=== Overall Climate Summary ===\n");
    if let Some(averages) = &summary.averages {
        write_averages(&mut out, averages, "");
    }
    match &summary.extremes {
        Some(extremes) => write_extremes(&mut out, extremes, ""),
        None => out.push_str("No data in the requested year range\n"),
    }

    if !summary.years.is_empty() {
        out.push_str("\n=== Annual Climate Summary ===\n");
        for year_summary in summary.years.values() {
            write_year(&mut out, year_summary);
        }
    }

    let stats = &summary.statistics;
    let _ = write!(
        out,
        "\nRows read: {}, skipped: {}, in range: {}, years: {}",
        stats.rows_read,
        stats.rows_skipped,
        stats.records_in_range,
        stats.partitions_scheduled
    );
    if !stats.failed_years.is_empty() {
        let _ = write!(out, ", failed years: {:?}", stats.failed_years);
    }
    out.push('\n');

    out
}

fn write_year(out: &mut String, summary: &YearSummary) {
    let _ = writeln!(out, "\nYear: {} ({} records)", summary.year, summary.record_count);

    write_averages(out, &summary.averages, "  ");

    if let Some(extremes) = &summary.extremes {
        write_extremes(out, extremes, "  ");
    }
}

fn write_averages(out: &mut String, averages: &MetricAverages, indent: &str) {
    for metric in Metric::ALL {
        let _ = writeln!(
            out,
            "{}Average {}: {}",
            indent,
            metric,
            with_unit(averages.get(metric), metric)
        );
    }
}

fn write_extremes(out: &mut String, extremes: &ExtremeSet, indent: &str) {
    for metric in Metric::TRACKED {
        for kind in [ExtremeKind::Min, ExtremeKind::Max] {
            if let Some(extreme) = extremes.extreme(metric, kind) {
                let _ = writeln!(
                    out,
                    "{}{}: {}",
                    indent,
                    extreme_label(metric, kind),
                    describe(metric, extreme)
                );
            }
        }
    }
}

fn extreme_label(metric: Metric, kind: ExtremeKind) -> String {
    match (metric, kind) {
        (Metric::Temperature, ExtremeKind::Min) => "Coldest".to_string(),
        (Metric::Temperature, ExtremeKind::Max) => "Hottest".to_string(),
        (_, ExtremeKind::Min) => format!("Lowest {}", metric),
        (_, ExtremeKind::Max) => format!("Highest {}", metric),
    }
}

fn describe(metric: Metric, extreme: &MetricExtreme) -> String {
    format!(
        "{} ({}: {})",
        extreme.record.timestamp.format("%Y-%m-%d %H:%M:%S"),
        metric,
        with_unit(extreme.value, metric)
    )
}

fn with_unit(value: f64, metric: Metric) -> String {
    match metric.unit() {
        "" => format!("{:.2}", value),
        unit => format!("{:.2} {}", value, unit),
    }
}
