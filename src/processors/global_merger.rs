use crate::models::{ExtremeSet, MetricAverages, OverallSummary, RunStatistics, YearSummary};
use std::collections::BTreeMap;

/// Folds per-year summaries into the overall summary.
pub struct GlobalMerger;

impl GlobalMerger {
    pub fn new() -> Self {
        Self
    }

    /// Build the overall summary. The year map is carried over unchanged,
    /// global averages are the record-count weighted mean of the yearly ones,
    /// and global extremes come from [`GlobalMerger::merge_extremes`].
    pub fn merge(
        &self,
        years: BTreeMap<i32, YearSummary>,
        statistics: RunStatistics,
    ) -> OverallSummary {
        if years.is_empty() {
            return OverallSummary::no_data(statistics);
        }

        let averages = MetricAverages::weighted(
            years
                .values()
                .map(|summary| (&summary.averages, summary.record_count)),
        );
        let extremes = self.merge_extremes(years.values());

        OverallSummary {
            years,
            averages,
            extremes,
            statistics,
        }
    }

    /// Reduce the extremes of every summary to one global set.
    ///
    /// Seeded from the first summary yielded (the earliest year when fed from
    /// a `BTreeMap`). A later candidate only wins with a strictly better value
    /// or an equal value from an earlier input position, so the result does
    /// not depend on the order summaries arrive in. Summaries without extremes
    /// are ignored; `None` when no summary has any.
    pub fn merge_extremes<'a, I>(&self, summaries: I) -> Option<ExtremeSet>
    where
        I: IntoIterator<Item = &'a YearSummary>,
    {
        summaries
            .into_iter()
            .filter_map(|summary| summary.extremes.as_ref())
            .fold(None, |global: Option<ExtremeSet>, candidate| match global {
                None => Some(*candidate),
                Some(mut current) => {
                    current.merge(candidate);
                    Some(current)
                }
            })
    }
}

impl Default for GlobalMerger {
    fn default() -> Self {
        Self::new()
    }
}
