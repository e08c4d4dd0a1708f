use crate::error::{ProcessingError, Result};
use crate::models::{ExtremeSet, MetricAverages, SequencedRecord, YearSummary};

/// Running sums for the averaged metrics
#[derive(Debug, Default)]
struct MetricSums {
    temperature: f64,
    humidity: f64,
    wind_speed: f64,
    visibility: f64,
    pressure: f64,
}

impl MetricSums {
    fn add(&mut self, record: &SequencedRecord) {
        let record = &record.record;
        self.temperature += record.temperature;
        self.humidity += record.humidity;
        self.wind_speed += record.wind_speed;
        self.visibility += record.visibility;
        self.pressure += record.pressure;
    }

    fn averages(&self, count: usize) -> MetricAverages {
        if count == 0 {
            return MetricAverages::default();
        }

        let n = count as f64;
        MetricAverages {
            temperature: self.temperature / n,
            humidity: self.humidity / n,
            wind_speed: self.wind_speed / n,
            visibility: self.visibility / n,
            pressure: self.pressure / n,
        }
    }
}

/// Summarizes one year's records in a single pass.
///
/// Holds no state, so one instance can be shared by every worker.
#[derive(Debug, Clone, Copy, Default)]
pub struct PartitionReducer;

impl PartitionReducer {
    pub fn new() -> Self {
        Self
    }

    /// Reduce a partition to its averages and extremes.
    ///
    /// Extremes are seeded with the first record and only replaced on a
    /// strictly smaller or larger value, so among equal values the earliest
    /// record is kept. An empty partition gives zero averages and no extremes.
    pub fn reduce(&self, year: i32, records: &[SequencedRecord]) -> Result<YearSummary> {
        let Some(first) = records.first() else {
            return Ok(YearSummary::empty(year));
        };

        let mut sums = MetricSums::default();
        let mut extremes = ExtremeSet::seed(first);

        for record in records {
            let found = record.year();
            if found != year {
                return Err(ProcessingError::PartitionMismatch { year, found });
            }

            sums.add(record);
            extremes.observe(record);
        }

        Ok(YearSummary {
            year,
            record_count: records.len(),
            averages: sums.averages(records.len()),
            extremes: Some(extremes),
        })
    }
}
