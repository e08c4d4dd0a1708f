use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{ClimateRecord, Metric, SequencedRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtremeKind {
    Min,
    Max,
}

/// A metric value paired with the record that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricExtreme {
    pub value: f64,
    pub position: usize,
    pub record: ClimateRecord,
}

impl MetricExtreme {
    pub fn from_record(metric: Metric, record: &SequencedRecord) -> Self {
        Self {
            value: record.value(metric),
            position: record.position,
            record: record.record,
        }
    }

    /// Strict comparison, never replaces on equal values.
    fn is_strictly_beyond(&self, other: &MetricExtreme, kind: ExtremeKind) -> bool {
        match kind {
            ExtremeKind::Min => self.value < other.value,
            ExtremeKind::Max => self.value > other.value,
        }
    }

    /// Whether `self` should replace `current` when the two come from
    /// different partitions. Equal values fall back to the original input
    /// position so the earliest record wins regardless of merge order.
    pub fn supersedes(&self, current: &MetricExtreme, kind: ExtremeKind) -> bool {
        self.is_strictly_beyond(current, kind)
            || (self.value == current.value && self.position < current.position)
    }
}

/// Minimum and maximum observation of one metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricRange {
    pub min: MetricExtreme,
    pub max: MetricExtreme,
}

impl MetricRange {
    pub fn seed(metric: Metric, record: &SequencedRecord) -> Self {
        let extreme = MetricExtreme::from_record(metric, record);
        Self {
            min: extreme,
            max: extreme,
        }
    }

    /// Fold the next record of a partition in. Records must arrive in input
    /// order; equal values keep the earlier holder.
    pub fn observe(&mut self, metric: Metric, record: &SequencedRecord) {
        let candidate = MetricExtreme::from_record(metric, record);
        if candidate.is_strictly_beyond(&self.min, ExtremeKind::Min) {
            self.min = candidate;
        }
        if candidate.is_strictly_beyond(&self.max, ExtremeKind::Max) {
            self.max = candidate;
        }
    }

    pub fn merge(&mut self, other: &MetricRange) {
        if other.min.supersedes(&self.min, ExtremeKind::Min) {
            self.min = other.min;
        }
        if other.max.supersedes(&self.max, ExtremeKind::Max) {
            self.max = other.max;
        }
    }

    pub fn get(&self, kind: ExtremeKind) -> &MetricExtreme {
        match kind {
            ExtremeKind::Min => &self.min,
            ExtremeKind::Max => &self.max,
        }
    }
}

/// One `MetricRange` per tracked metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtremeSet {
    pub temperature: MetricRange,
    pub humidity: MetricRange,
    pub wind_speed: MetricRange,
    pub visibility: MetricRange,
}

impl ExtremeSet {
    pub fn seed(record: &SequencedRecord) -> Self {
        Self {
            temperature: MetricRange::seed(Metric::Temperature, record),
            humidity: MetricRange::seed(Metric::Humidity, record),
            wind_speed: MetricRange::seed(Metric::WindSpeed, record),
            visibility: MetricRange::seed(Metric::Visibility, record),
        }
    }

    pub fn observe(&mut self, record: &SequencedRecord) {
        self.temperature.observe(Metric::Temperature, record);
        self.humidity.observe(Metric::Humidity, record);
        self.wind_speed.observe(Metric::WindSpeed, record);
        self.visibility.observe(Metric::Visibility, record);
    }

    pub fn merge(&mut self, other: &ExtremeSet) {
        self.temperature.merge(&other.temperature);
        self.humidity.merge(&other.humidity);
        self.wind_speed.merge(&other.wind_speed);
        self.visibility.merge(&other.visibility);
    }

    /// Range for a tracked metric; `None` for pressure
    pub fn range(&self, metric: Metric) -> Option<&MetricRange> {
        match metric {
            Metric::Temperature => Some(&self.temperature),
            Metric::Humidity => Some(&self.humidity),
            Metric::WindSpeed => Some(&self.wind_speed),
            Metric::Visibility => Some(&self.visibility),
            Metric::Pressure => None,
        }
    }

    pub fn extreme(&self, metric: Metric, kind: ExtremeKind) -> Option<&MetricExtreme> {
        self.range(metric).map(|r| r.get(kind))
    }

    pub fn coldest(&self) -> &MetricExtreme {
        &self.temperature.min
    }

    pub fn hottest(&self) -> &MetricExtreme {
        &self.temperature.max
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricAverages {
    pub temperature: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub visibility: f64,
    pub pressure: f64,
}

impl MetricAverages {
    /// Mean of several averages weighted by their record counts. `None` when
    /// the counts add up to zero.
    pub fn weighted<'a, I>(parts: I) -> Option<Self>
    where
        I: IntoIterator<Item = (&'a MetricAverages, usize)>,
    {
        let mut total = Self::default();
        let mut count = 0usize;

        for (averages, records) in parts {
            let weight = records as f64;
            total.temperature += averages.temperature * weight;
            total.humidity += averages.humidity * weight;
            total.wind_speed += averages.wind_speed * weight;
            total.visibility += averages.visibility * weight;
            total.pressure += averages.pressure * weight;
            count += records;
        }

        if count == 0 {
            return None;
        }

        let n = count as f64;
        Some(Self {
            temperature: total.temperature / n,
            humidity: total.humidity / n,
            wind_speed: total.wind_speed / n,
            visibility: total.visibility / n,
            pressure: total.pressure / n,
        })
    }

    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Temperature => self.temperature,
            Metric::Humidity => self.humidity,
            Metric::WindSpeed => self.wind_speed,
            Metric::Visibility => self.visibility,
            Metric::Pressure => self.pressure,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearSummary {
    pub year: i32,
    pub record_count: usize,
    pub averages: MetricAverages,
    pub extremes: Option<ExtremeSet>,
}

impl YearSummary {
    /// Summary of a partition with no records: zero averages, no extremes.
    pub fn empty(year: i32) -> Self {
        Self {
            year,
            record_count: 0,
            averages: MetricAverages::default(),
            extremes: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.record_count == 0
    }
}

/// Counters describing how a run went, from source rows to partitions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStatistics {
    pub rows_read: usize,
    pub rows_skipped: usize,
    pub records_in_range: usize,
    pub partitions_scheduled: usize,
    pub failed_years: Vec<i32>,
}

impl RunStatistics {
    pub fn partitions_failed(&self) -> usize {
        self.failed_years.len()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallSummary {
    pub years: BTreeMap<i32, YearSummary>,
    /// Averages over every record in range, not the mean of yearly means
    pub averages: Option<MetricAverages>,
    pub extremes: Option<ExtremeSet>,
    pub statistics: RunStatistics,
}

impl OverallSummary {
    /// The "no data" state: no years and no extremes.
    pub fn no_data(statistics: RunStatistics) -> Self {
        Self {
            years: BTreeMap::new(),
            averages: None,
            extremes: None,
            statistics,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty() && self.extremes.is_none()
    }

    pub fn year(&self, year: i32) -> Option<&YearSummary> {
        self.years.get(&year)
    }

    pub fn extreme(&self, metric: Metric, kind: ExtremeKind) -> Option<&MetricExtreme> {
        self.extremes.as_ref().and_then(|e| e.extreme(metric, kind))
    }

    pub fn total_records(&self) -> usize {
        self.years.values().map(|s| s.record_count).sum()
    }
}
