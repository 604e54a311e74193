use std::time::Duration;

use crate::{VacancyId, VacancyStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// `stop()` was called.
    Requested,
    /// No pending vacancies were left.
    Exhausted,
}

/// Status-change and run-boundary notifications for displays and logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedulerEvent {
    Started {
        batch_size: usize,
        interval: Duration,
    },
    RunStarted {
        run: u64,
        claimed: Vec<VacancyId>,
    },
    /// A claimed vacancy is about to be submitted.
    Submitting {
        run: u64,
        id: VacancyId,
        title: String,
        company: String,
    },
    StatusChanged {
        id: VacancyId,
        status: VacancyStatus,
        detail: Option<String>,
    },
    RunFinished {
        run: u64,
        applied: usize,
        failed: usize,
        next_run_in: Option<Duration>,
    },
    Stopped {
        reason: StopReason,
    },
}
