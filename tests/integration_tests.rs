use chrono::{NaiveDate, NaiveDateTime};
use climate_summarizer::models::{ClimateRecord, ExtremeKind, Metric};
use climate_summarizer::processors::{
    ClimateSummarizer, GlobalMerger, PartitionReducer, Partitioner, YearFilter,
};
use climate_summarizer::readers::TimestampPolicy;
use climate_summarizer::utils::ProgressReporter;
use climate_summarizer::writers::{ReportFormat, ReportWriter};
use climate_summarizer::ProcessingError;
use pretty_assertions::assert_eq;
use std::io::Write;
use std::sync::Arc;
use tempfile::{NamedTempFile, TempDir};

const HEADER: &str = "Formatted Date,Summary,Precip Type,Temperature (C),Apparent Temperature (C),Humidity,Wind Speed (km/h),Wind Bearing (degrees),Visibility (km),Loud Cover,Pressure (millibars),Daily Summary";

fn write_csv(rows: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    writeln!(file, "{}", HEADER).unwrap();
    for row in rows {
        writeln!(file, "{}", row).unwrap();
    }
    file
}

fn at(year: i32, month: u32, day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

/// Deterministic pseudo-random observations spread over several years
fn synthetic_records(count: usize) -> Vec<ClimateRecord> {
    let mut state: u64 = 0x2545_f491_4f6c_dd1d;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        (state % 1000) as f64 / 10.0
    };

    (0..count)
        .map(|i| {
            let year = 2004 + (i % 15) as i32;
            let timestamp = at(year, 1 + (i % 12) as u32, 1 + (i % 28) as u32, (i % 24) as u32);
            // coarse values so ties are common
            ClimateRecord::new(
                timestamp,
                (next() / 5.0).round() - 10.0,
                (next() / 100.0 * 10.0).round() / 10.0,
                next().round(),
                (next() / 10.0).round(),
                1000.0 + next(),
            )
        })
        .collect()
}

#[tokio::test]
async fn test_summarize_file_end_to_end() {
    let file = write_csv(&[
        "2010-05-01 00:00:00.000 +0200,Clear,rain,5.0,4.0,0.80,10.0,180,9.0,0,1010.0,Mild",
        "2010-05-01 01:00:00.000 +0200,Clear,rain,20.0,19.0,0.40,30.0,180,15.0,0,1020.0,Mild",
        "2011-01-01 00:00:00.000 +0100,Foggy,snow,-3.0,-6.0,0.95,2.0,90,1.0,0,1030.0,Cold",
        "2011-01-01 01:00:00.000 +0100,Foggy,snow,bad,-6.0,0.95,2.0,90,1.0,0,1030.0,Cold",
        "2004-01-01 01:00:00.000 +0100,Foggy,snow,-40.0,-6.0,0.95,2.0,90,1.0,0,1030.0,Cold",
    ]);

    let progress = Arc::new(ProgressReporter::new_spinner("test", true));
    let summary = ClimateSummarizer::new(2)
        .summarize_file(file.path(), Some(progress))
        .await
        .unwrap();

    assert_eq!(summary.years.keys().copied().collect::<Vec<_>>(), vec![2010, 2011]);
    assert_eq!(summary.year(2010).unwrap().averages.temperature, 12.5);
    assert_eq!(summary.year(2010).unwrap().averages.pressure, 1015.0);
    assert_eq!(summary.year(2011).unwrap().averages.temperature, -3.0);
    assert_eq!(summary.year(2011).unwrap().record_count, 1);

    let coldest = summary.extreme(Metric::Temperature, ExtremeKind::Min).unwrap();
    let hottest = summary.extreme(Metric::Temperature, ExtremeKind::Max).unwrap();
    assert_eq!(coldest.value, -3.0);
    assert_eq!(coldest.record.timestamp, at(2011, 1, 1, 0));
    assert_eq!(hottest.value, 20.0);
    assert_eq!(hottest.record.wind_speed, 30.0);

    assert_eq!(summary.statistics.rows_read, 5);
    assert_eq!(summary.statistics.rows_skipped, 1);
    assert_eq!(summary.statistics.records_in_range, 3);
    assert_eq!(summary.statistics.partitions_scheduled, 2);
    assert_eq!(summary.statistics.partitions_failed(), 0);
}

#[tokio::test]
async fn test_unreadable_file_is_fatal() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("weatherHistory.csv");

    let result = ClimateSummarizer::new(2).summarize_file(&missing, None).await;

    assert!(matches!(result, Err(ProcessingError::Io(_))));
}

#[tokio::test]
async fn test_file_without_rows_in_range_is_no_data() {
    let file = write_csv(&[
        "1999-05-01 00:00:00.000 +0200,Clear,rain,5.0,4.0,0.80,10.0,180,9.0,0,1010.0,Mild",
        "not a date,Clear,rain,5.0,4.0,0.80,10.0,180,9.0,0,1010.0,Mild",
    ]);

    for policy in [TimestampPolicy::Skip, TimestampPolicy::Sentinel] {
        let summary = ClimateSummarizer::new(2)
            .with_timestamp_policy(policy)
            .summarize_file(file.path(), None)
            .await
            .unwrap();

        assert!(summary.is_empty());
        assert!(summary.extremes.is_none());
        assert_eq!(summary.statistics.records_in_range, 0);
    }
}

#[tokio::test]
async fn test_header_without_required_column_is_no_data() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "Formatted Date,Temperature (C),Humidity,Wind Speed (km/h),Visibility (km)").unwrap();
    writeln!(file, "2010-01-01 00:00:00.000 +0100,5.0,0.5,10.0,10.0").unwrap();
    writeln!(file, "2011-01-01 00:00:00.000 +0100,6.0,0.5,10.0,10.0").unwrap();

    let summary = ClimateSummarizer::new(2)
        .summarize_file(file.path(), None)
        .await
        .unwrap();

    assert!(summary.is_empty());
    assert_eq!(summary.statistics.rows_read, 2);
    assert_eq!(summary.statistics.rows_skipped, 2);
    assert_eq!(summary.statistics.records_in_range, 0);
}

#[test]
fn test_averages_and_bounds_on_synthetic_data() {
    let records = synthetic_records(2_000);
    let filter = YearFilter::default();

    let summary = ClimateSummarizer::new(4).summarize(&records, None).unwrap();

    for (year, year_summary) in &summary.years {
        let values: Vec<&ClimateRecord> = records.iter().filter(|r| r.year() == *year).collect();
        assert_eq!(year_summary.record_count, values.len());

        let extremes = year_summary.extremes.unwrap();
        for metric in Metric::ALL {
            let mean = values.iter().map(|r| r.value(metric)).sum::<f64>() / values.len() as f64;
            assert!((year_summary.averages.get(metric) - mean).abs() < 1e-6);

            if let Some(range) = extremes.range(metric) {
                assert!(values
                    .iter()
                    .all(|r| range.min.value <= r.value(metric) && r.value(metric) <= range.max.value));
            }
        }
    }

    let in_range = records.iter().filter(|r| filter.contains(r.year())).count();
    assert_eq!(summary.total_records(), in_range);
}

#[test]
fn test_global_extremes_are_first_occurrence() {
    let records = synthetic_records(3_000);
    let filter = YearFilter::default();

    let summary = ClimateSummarizer::new(3).summarize(&records, None).unwrap();
    let extremes = summary.extremes.unwrap();

    let in_range: Vec<(usize, &ClimateRecord)> = records
        .iter()
        .enumerate()
        .filter(|(_, r)| filter.contains(r.year()))
        .collect();

    for metric in Metric::TRACKED {
        let values = || in_range.iter().map(move |(_, r)| r.value(metric));
        let min = values().fold(f64::INFINITY, f64::min);
        let max = values().fold(f64::NEG_INFINITY, f64::max);
        let first_min = in_range.iter().find(|(_, r)| r.value(metric) == min).unwrap().0;
        let first_max = in_range.iter().find(|(_, r)| r.value(metric) == max).unwrap().0;

        let range = extremes.range(metric).unwrap();
        assert_eq!(range.min.position, first_min, "min {}", metric);
        assert_eq!(range.max.position, first_max, "max {}", metric);
        assert_eq!(range.min.record, records[first_min]);
        assert_eq!(range.max.record, records[first_max]);
    }
}

#[test]
fn test_merge_ignores_summary_order() {
    let records = synthetic_records(1_500);
    let filtered = YearFilter::default().apply(&records);
    let partitions = Partitioner::new().partition(filtered);
    let reducer = PartitionReducer::new();

    let summaries: Vec<_> = partitions
        .iter()
        .map(|(year, records)| reducer.reduce(*year, records).unwrap())
        .collect();

    let merger = GlobalMerger::new();
    let forward = merger.merge_extremes(&summaries);
    let backward = merger.merge_extremes(summaries.iter().rev());
    let mut rotated: Vec<_> = summaries.iter().collect();
    rotated.rotate_left(summaries.len() / 2);
    let interleaved = merger.merge_extremes(rotated);

    assert_eq!(forward, backward);
    assert_eq!(forward, interleaved);
}

#[test]
fn test_worker_count_does_not_change_result() {
    let records = synthetic_records(1_000);

    let single = ClimateSummarizer::new(1).summarize(&records, None).unwrap();
    let many = ClimateSummarizer::new(8).summarize(&records, None).unwrap();

    assert_eq!(single, many);
}

#[tokio::test]
async fn test_json_report_from_file() {
    let file = write_csv(&[
        "2016-12-31 23:00:00.000 +0100,Clear,rain,1.5,0.0,0.70,5.0,180,10.0,0,1005.0,Mild",
        "2017-01-01 00:00:00.000 +0100,Clear,rain,2.5,0.0,0.70,5.0,180,10.0,0,1005.0,Mild",
    ]);
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("summary.json");

    let summary = ClimateSummarizer::new(2)
        .summarize_file(file.path(), None)
        .await
        .unwrap();
    ReportWriter::new(ReportFormat::Json)
        .write_to_file(&summary, &output)
        .unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(json["years"]["2016"]["record_count"], 1);
    assert!(json["years"]["2017"].is_null());
}
