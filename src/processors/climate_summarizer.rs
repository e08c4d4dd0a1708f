use crate::error::Result;
use crate::models::{ClimateRecord, OverallSummary, RunStatistics};
use crate::processors::{GlobalMerger, Partitioner, YearFilter, YearScheduler};
use crate::readers::{ClimateReader, SourceData, TimestampPolicy};
use crate::settings::SummaryConfig;
use crate::utils::progress::ProgressReporter;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Runs the whole pipeline: year filter, partitioning, concurrent per-year
/// reduction and the global merge.
#[derive(Debug, Clone)]
pub struct ClimateSummarizer {
    year_filter: YearFilter,
    max_workers: usize,
    deadline: Option<Duration>,
    timestamp_policy: TimestampPolicy,
    use_mmap: bool,
}

impl ClimateSummarizer {
    pub fn new(max_workers: usize) -> Self {
        Self {
            year_filter: YearFilter::default(),
            max_workers,
            deadline: None,
            timestamp_policy: TimestampPolicy::default(),
            use_mmap: false,
        }
    }

    pub fn from_config(config: &SummaryConfig) -> Result<Self> {
        config.check()?;

        Ok(Self::new(config.worker_concurrency)
            .with_year_range(config.min_year, config.max_year)?
            .with_deadline(config.deadline())
            .with_timestamp_policy(config.timestamp_policy)
            .with_mmap(config.use_mmap))
    }

    pub fn with_year_range(mut self, min_year: i32, max_year: i32) -> Result<Self> {
        self.year_filter = YearFilter::new(min_year, max_year)?;
        Ok(self)
    }

    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn with_timestamp_policy(mut self, timestamp_policy: TimestampPolicy) -> Self {
        self.timestamp_policy = timestamp_policy;
        self
    }

    pub fn with_mmap(mut self, use_mmap: bool) -> Self {
        self.use_mmap = use_mmap;
        self
    }

    pub fn year_filter(&self) -> &YearFilter {
        &self.year_filter
    }

    pub fn reader(&self) -> ClimateReader {
        ClimateReader::new()
            .with_timestamp_policy(self.timestamp_policy)
            .with_mmap(self.use_mmap)
    }

    /// Summarize records already in memory, in input order
    pub fn summarize(
        &self,
        records: &[ClimateRecord],
        progress: Option<&ProgressReporter>,
    ) -> Result<OverallSummary> {
        let statistics = RunStatistics {
            rows_read: records.len(),
            ..RunStatistics::default()
        };

        self.aggregate(records, statistics, progress)
    }

    /// Summarize the output of a [`ClimateReader`], keeping its row counts
    pub fn summarize_source(
        &self,
        source: &SourceData,
        progress: Option<&ProgressReporter>,
    ) -> Result<OverallSummary> {
        let statistics = RunStatistics {
            rows_read: source.rows_read,
            rows_skipped: source.rows_skipped(),
            ..RunStatistics::default()
        };

        self.aggregate(&source.records, statistics, progress)
    }

    /// Read and summarize a CSV file.
    ///
    /// Reading and aggregation run on the blocking thread pool. An unreadable
    /// file fails the whole run; no partial summary is returned.
    pub async fn summarize_file(
        &self,
        path: &Path,
        progress: Option<Arc<ProgressReporter>>,
    ) -> Result<OverallSummary> {
        if let Some(p) = &progress {
            p.set_message("Reading climate records...");
        }

        let reader = self.reader();
        let source_path = path.to_path_buf();
        let source = tokio::task::spawn_blocking(move || reader.read_path(&source_path)).await??;

        let summarizer = self.clone();
        tokio::task::spawn_blocking(move || summarizer.summarize_source(&source, progress.as_deref()))
            .await?
    }

    fn aggregate(
        &self,
        records: &[ClimateRecord],
        mut statistics: RunStatistics,
        progress: Option<&ProgressReporter>,
    ) -> Result<OverallSummary> {
        let filtered = self.year_filter.apply(records);
        statistics.records_in_range = filtered.len();

        if filtered.is_empty() {
            info!(
                "No records between {} and {}",
                self.year_filter.min_year(),
                self.year_filter.max_year()
            );
            if let Some(p) = progress {
                p.finish_with_message("No data in year range");
            }
            return Ok(OverallSummary::no_data(statistics));
        }

        let partitions = Partitioner::new().partition(filtered);
        statistics.partitions_scheduled = partitions.len();
        debug!(
            "{} records in range across {} years",
            statistics.records_in_range, statistics.partitions_scheduled
        );

        if let Some(p) = progress {
            p.start_partitions(partitions.len() as u64, "Summarizing years...");
        }

        let outcome = YearScheduler::new(self.max_workers)
            .with_deadline(self.deadline)
            .run(partitions, progress)?;
        statistics.failed_years = outcome.failed_years;

        let summary = GlobalMerger::new().merge(outcome.summaries, statistics);

        info!(
            years = summary.years.len(),
            records = summary.total_records(),
            failed = summary.statistics.partitions_failed(),
            "Climate summary complete"
        );
        if let Some(p) = progress {
            p.finish_with_message(&format!("Summarized {} years", summary.years.len()));
        }

        Ok(summary)
    }
}

impl Default for ClimateSummarizer {
    fn default() -> Self {
        Self::new(num_cpus::get())
    }
}
