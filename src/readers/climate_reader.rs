use crate::error::Result;
use crate::models::ClimateRecord;
use crate::readers::TimestampPolicy;
use crate::utils::constants::{
    COLUMN_HUMIDITY, COLUMN_PRESSURE, COLUMN_TEMPERATURE, COLUMN_TIMESTAMP, COLUMN_VISIBILITY,
    COLUMN_WIND_SPEED, DEFAULT_BUFFER_SIZE,
};
use csv::StringRecord;
use memmap2::Mmap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, warn};

/// A source row that was dropped instead of failing the whole read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    pub line: usize,
    pub reason: String,
}

/// Everything read from one source, in input order.
#[derive(Debug, Clone, Default)]
pub struct SourceData {
    pub records: Vec<ClimateRecord>,
    pub rows_read: usize,
    pub skipped: Vec<SkippedRow>,
}

impl SourceData {
    pub fn rows_skipped(&self) -> usize {
        self.skipped.len()
    }
}

/// Column positions resolved from the header row. A column absent from the
/// header stays `None` and fails every row that needs it.
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    timestamp: Option<usize>,
    temperature: Option<usize>,
    humidity: Option<usize>,
    wind_speed: Option<usize>,
    visibility: Option<usize>,
    pressure: Option<usize>,
}

impl ColumnIndex {
    fn resolve(headers: &StringRecord) -> Self {
        let find = |name: &str| {
            let index = headers.iter().position(|h| h == name);
            if index.is_none() {
                warn!(column = name, "Required column not found in source header");
            }
            index
        };

        Self {
            timestamp: find(COLUMN_TIMESTAMP),
            temperature: find(COLUMN_TEMPERATURE),
            humidity: find(COLUMN_HUMIDITY),
            wind_speed: find(COLUMN_WIND_SPEED),
            visibility: find(COLUMN_VISIBILITY),
            pressure: find(COLUMN_PRESSURE),
        }
    }
}

/// Reads weather observations from a CSV file with a header row.
pub struct ClimateReader {
    timestamp_policy: TimestampPolicy,
    use_mmap: bool,
}

impl ClimateReader {
    pub fn new() -> Self {
        Self {
            timestamp_policy: TimestampPolicy::Skip,
            use_mmap: false,
        }
    }

    pub fn with_timestamp_policy(mut self, timestamp_policy: TimestampPolicy) -> Self {
        self.timestamp_policy = timestamp_policy;
        self
    }

    pub fn with_mmap(mut self, use_mmap: bool) -> Self {
        self.use_mmap = use_mmap;
        self
    }

    /// Read every row of the file. Failing to open or read the file is fatal;
    /// individual bad rows, including rows lacking a column the header never
    /// declared, are skipped and reported.
    pub fn read_path(&self, path: &Path) -> Result<SourceData> {
        debug!("Reading climate records from {}", path.display());

        if self.use_mmap {
            self.read_mmap(path)
        } else {
            self.read_buffered(path)
        }
    }

    fn read_buffered(&self, path: &Path) -> Result<SourceData> {
        let file = File::open(path)?;
        let reader = BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file);
        self.read_from(reader)
    }

    fn read_mmap(&self, path: &Path) -> Result<SourceData> {
        let file = File::open(path)?;
        let mmap = unsafe { Mmap::map(&file)? };
        self.read_from(&mmap[..])
    }

    /// Read rows from any byte source
    pub fn read_from<R: Read>(&self, source: R) -> Result<SourceData> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(source);

        let headers = reader.headers()?.clone();
        if headers.is_empty() {
            debug!("Source is empty");
            return Ok(SourceData::default());
        }
        let columns = ColumnIndex::resolve(&headers);

        let mut data = SourceData::default();
        let mut last_line = 1;

        for result in reader.records() {
            data.rows_read += 1;

            let row = match result {
                Ok(row) => row,
                Err(e) if e.is_io_error() => return Err(e.into()),
                Err(e) => {
                    let line = e.position().map_or(last_line + 1, |p| p.line() as usize);
                    last_line = line;
                    Self::skip(&mut data, line, format!("malformed CSV row: {}", e));
                    continue;
                }
            };

            // blank lines and multi-line quoted fields make row index and line differ
            let line = row.position().map_or(last_line + 1, |p| p.line() as usize);
            last_line = line;

            match self.parse_row(&row, &columns) {
                Ok(record) => data.records.push(record),
                Err(reason) => Self::skip(&mut data, line, reason),
            }
        }

        debug!(
            "Read {} rows: {} records, {} skipped",
            data.rows_read,
            data.records.len(),
            data.rows_skipped()
        );

        Ok(data)
    }

    fn skip(data: &mut SourceData, line: usize, reason: String) {
        warn!(line, %reason, "Skipping source row");
        data.skipped.push(SkippedRow { line, reason });
    }

    /// Parse one row; the error is a human-readable reason for skipping it
    fn parse_row(
        &self,
        row: &StringRecord,
        columns: &ColumnIndex,
    ) -> std::result::Result<ClimateRecord, String> {
        let raw_timestamp = field(row, columns.timestamp, COLUMN_TIMESTAMP)?;
        let temperature = number(row, columns.temperature, COLUMN_TEMPERATURE)?;
        let humidity = number(row, columns.humidity, COLUMN_HUMIDITY)?;
        let wind_speed = number(row, columns.wind_speed, COLUMN_WIND_SPEED)?;
        let visibility = number(row, columns.visibility, COLUMN_VISIBILITY)?;
        let pressure = number(row, columns.pressure, COLUMN_PRESSURE)?;

        let timestamp = self
            .timestamp_policy
            .resolve(raw_timestamp)
            .ok_or_else(|| format!("unparseable timestamp '{}'", raw_timestamp))?;

        Ok(ClimateRecord::new(
            timestamp,
            temperature,
            humidity,
            wind_speed,
            visibility,
            pressure,
        ))
    }
}

impl Default for ClimateReader {
    fn default() -> Self {
        Self::new()
    }
}

fn field<'r>(
    row: &'r StringRecord,
    index: Option<usize>,
    column: &str,
) -> std::result::Result<&'r str, String> {
    index
        .and_then(|i| row.get(i))
        .ok_or_else(|| format!("missing column '{}'", column))
}

fn number(
    row: &StringRecord,
    index: Option<usize>,
    column: &str,
) -> std::result::Result<f64, String> {
    let raw = field(row, index, column)?;
    let value = raw
        .parse::<f64>()
        .map_err(|_| format!("invalid {} '{}'", column, raw))?;

    if !value.is_finite() {
        return Err(format!("non-finite {} '{}'", column, raw));
    }

    Ok(value)
}
