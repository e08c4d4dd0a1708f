pub mod climate;
pub mod summary;

pub use climate::{ClimateRecord, Metric, SequencedRecord};
pub use summary::{
    ExtremeKind, ExtremeSet, MetricAverages, MetricExtreme, MetricRange, OverallSummary,
    RunStatistics, YearSummary,
};
