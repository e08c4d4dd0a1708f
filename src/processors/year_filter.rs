use crate::error::{ProcessingError, Result};
use crate::models::{ClimateRecord, SequencedRecord};
use crate::utils::constants::{DEFAULT_MAX_YEAR, DEFAULT_MIN_YEAR};

/// Keeps records whose year lies in an inclusive range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearFilter {
    min_year: i32,
    max_year: i32,
}

impl YearFilter {
    pub fn new(min_year: i32, max_year: i32) -> Result<Self> {
        if min_year > max_year {
            return Err(ProcessingError::Config(format!(
                "Invalid year range: {} > {}",
                min_year, max_year
            )));
        }

        Ok(Self { min_year, max_year })
    }

    pub fn min_year(&self) -> i32 {
        self.min_year
    }

    pub fn max_year(&self) -> i32 {
        self.max_year
    }

    pub fn contains(&self, year: i32) -> bool {
        (self.min_year..=self.max_year).contains(&year)
    }

    /// Filter records, preserving order. Each kept record is tagged with its
    /// position in `records`, not in the filtered output.
    pub fn apply(&self, records: &[ClimateRecord]) -> Vec<SequencedRecord> {
        records
            .iter()
            .enumerate()
            .filter(|(_, record)| self.contains(record.year()))
            .map(|(position, record)| SequencedRecord::new(position, *record))
            .collect()
    }
}

impl Default for YearFilter {
    fn default() -> Self {
        Self {
            min_year: DEFAULT_MIN_YEAR,
            max_year: DEFAULT_MAX_YEAR,
        }
    }
}
