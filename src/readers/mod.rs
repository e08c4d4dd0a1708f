pub mod climate_reader;
pub mod timestamp;

pub use climate_reader::{ClimateReader, SkippedRow, SourceData};
pub use timestamp::{parse_timestamp, TimestampPolicy, SENTINEL_TIMESTAMP};
