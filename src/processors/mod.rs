pub mod climate_summarizer;
pub mod global_merger;
pub mod partition_reducer;
pub mod partitioner;
pub mod year_filter;
pub mod year_scheduler;

pub use climate_summarizer::ClimateSummarizer;
pub use global_merger::GlobalMerger;
pub use partition_reducer::PartitionReducer;
pub use partitioner::{Partitioner, Partitions};
pub use year_filter::YearFilter;
pub use year_scheduler::{ScheduleOutcome, YearScheduler};
