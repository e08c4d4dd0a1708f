use chrono::{DateTime, NaiveDateTime};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::utils::constants::{NAIVE_TIMESTAMP_FORMATS, OFFSET_TIMESTAMP_FORMATS};

/// Timestamp assigned under [`TimestampPolicy::Sentinel`]. It lies outside any
/// configurable year range, so such rows are always dropped by the year filter.
pub const SENTINEL_TIMESTAMP: NaiveDateTime = NaiveDateTime::MIN;

/// What to do with a row whose timestamp matches none of the accepted formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum TimestampPolicy {
    /// Skip the row and report it
    #[default]
    Skip,
    /// Keep the row with [`SENTINEL_TIMESTAMP`]
    Sentinel,
}

impl TimestampPolicy {
    pub fn resolve(&self, raw: &str) -> Option<NaiveDateTime> {
        match (parse_timestamp(raw), self) {
            (Some(timestamp), _) => Some(timestamp),
            (None, TimestampPolicy::Skip) => None,
            (None, TimestampPolicy::Sentinel) => Some(SENTINEL_TIMESTAMP),
        }
    }
}

/// Parse a timestamp trying each accepted format in order.
///
/// Offset-aware values keep the local time as written; the offset itself is
/// discarded, so `2006-04-01 00:00:00.000 +0200` belongs to 2006.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();

    OFFSET_TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| {
            DateTime::parse_from_str(raw, format)
                .ok()
                .map(|dt| dt.naive_local())
        })
        .or_else(|| {
            NAIVE_TIMESTAMP_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        })
}
