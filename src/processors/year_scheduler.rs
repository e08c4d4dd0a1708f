use crate::error::{ProcessingError, Result};
use crate::models::{SequencedRecord, YearSummary};
use crate::processors::{PartitionReducer, Partitions};
use crate::utils::progress::ProgressReporter;
use crossbeam::channel::{self, Receiver, RecvTimeoutError};
use std::any::Any;
use std::collections::{BTreeMap, BTreeSet};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Result of running every partition reduction.
#[derive(Debug, Default)]
pub struct ScheduleOutcome {
    pub summaries: BTreeMap<i32, YearSummary>,
    pub failed_years: Vec<i32>,
}

/// Runs one partition reduction per year on a dedicated worker pool.
#[derive(Debug, Clone)]
pub struct YearScheduler {
    max_workers: usize,
    deadline: Option<Duration>,
}

impl YearScheduler {
    pub fn new(max_workers: usize) -> Self {
        Self {
            max_workers: max_workers.max(1),
            deadline: None,
        }
    }

    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    /// Reduce every partition with [`PartitionReducer`]
    pub fn run(
        &self,
        partitions: Partitions,
        progress: Option<&ProgressReporter>,
    ) -> Result<ScheduleOutcome> {
        let reducer = PartitionReducer::new();
        self.run_with(partitions, progress, move |year, records| {
            reducer.reduce(year, records)
        })
    }

    /// Reduce every partition with `reducer`, one pool task per year.
    ///
    /// Tasks share nothing mutable: each owns its partition and sends its
    /// result over a channel that only this thread drains. A task that fails
    /// or panics is logged and its year left out of the outcome. Hitting the
    /// deadline abandons the join and returns [`ProcessingError::Timeout`].
    /// A year whose task never reports is counted as failed. The pool is
    /// dropped on every return path.
    pub fn run_with<F>(
        &self,
        partitions: Partitions,
        progress: Option<&ProgressReporter>,
        reducer: F,
    ) -> Result<ScheduleOutcome>
    where
        F: Fn(i32, &[SequencedRecord]) -> Result<YearSummary> + Send + Sync + 'static,
    {
        if partitions.is_empty() {
            return Ok(ScheduleOutcome::default());
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.max_workers)
            .thread_name(|index| format!("year-reducer-{}", index))
            .build()
            .map_err(|e| ProcessingError::Config(e.to_string()))?;

        let pending: BTreeSet<i32> = partitions.keys().copied().collect();
        let reducer = Arc::new(reducer);
        let (sender, receiver) = channel::unbounded::<(i32, Result<YearSummary>)>();

        debug!(
            "Scheduling {} partition reductions on {} workers",
            pending.len(),
            self.max_workers
        );

        for (year, records) in partitions {
            let sender = sender.clone();
            let reducer = Arc::clone(&reducer);

            pool.spawn(move || {
                let result = panic::catch_unwind(AssertUnwindSafe(|| (*reducer)(year, &records)))
                    .unwrap_or_else(|payload| {
                        Err(ProcessingError::WorkerPanic {
                            year,
                            message: panic_message(payload.as_ref()),
                        })
                    });

                // The receiver is gone only after a timeout; nothing left to report to.
                let _ = sender.send((year, result));
            });
        }
        drop(sender);

        let outcome = self.collect(&receiver, pending, progress);
        drop(pool);
        outcome
    }

    /// Drain task results until every pending year has reported, the senders
    /// are gone, or the deadline passes.
    fn collect(
        &self,
        receiver: &Receiver<(i32, Result<YearSummary>)>,
        mut pending: BTreeSet<i32>,
        progress: Option<&ProgressReporter>,
    ) -> Result<ScheduleOutcome> {
        let mut outcome = ScheduleOutcome::default();
        let scheduled = pending.len();
        let deadline = self.deadline.map(|limit| (limit, Instant::now() + limit));

        while !pending.is_empty() {
            let message = match deadline {
                Some((limit, at)) => match receiver.recv_deadline(at) {
                    Ok(message) => message,
                    Err(RecvTimeoutError::Timeout) => {
                        warn!(
                            "Deadline of {:?} reached with {} of {} partitions outstanding",
                            limit,
                            pending.len(),
                            scheduled
                        );
                        return Err(ProcessingError::Timeout(limit));
                    }
                    Err(RecvTimeoutError::Disconnected) => break,
                },
                None => match receiver.recv() {
                    Ok(message) => message,
                    Err(_) => break,
                },
            };

            let (year, result) = message;
            if !pending.remove(&year) {
                warn!(year, "Ignoring result for a year that was not pending");
                continue;
            }

            match result {
                Ok(summary) => {
                    debug!(year, records = summary.record_count, "Partition reduced");
                    outcome.summaries.insert(year, summary);
                }
                Err(e) => {
                    warn!(year, error = %e, "Partition reduction failed; year omitted");
                    outcome.failed_years.push(year);
                }
            }

            if let Some(p) = progress {
                p.increment(1);
            }
        }

        if !pending.is_empty() {
            warn!(
                years = ?pending,
                "Workers stopped before reporting; years omitted"
            );
            outcome.failed_years.extend(pending);
        }

        outcome.failed_years.sort_unstable();
        Ok(outcome)
    }
}

impl Default for YearScheduler {
    fn default() -> Self {
        Self::new(num_cpus::get())
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
