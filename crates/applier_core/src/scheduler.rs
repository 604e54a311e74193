use std::time::{Duration, Instant};

use thiserror::Error;

use crate::StopReason;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchedulerPhase {
    #[default]
    Idle,
    /// Start accepted, first run not yet begun.
    Starting,
    /// Timer armed, between runs.
    Running,
    /// A run's submissions are executing.
    InBatch,
    Stopped,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("batch size must be at least 1")]
    ZeroBatchSize,
    #[error("interval must be greater than zero")]
    ZeroInterval,
    #[error("interval must not exceed {} days", MAX_INTERVAL.as_secs() / 86_400)]
    IntervalTooLong,
}

/// Longest accepted run interval.
pub const MAX_INTERVAL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    #[error("no pending vacancies to apply to")]
    NoPendingItems,
    #[error("scheduler cannot start while {phase:?}")]
    NotIdle { phase: SchedulerPhase },
}

/// Immutable per-session parameters, snapshotted when the scheduler starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerConfig {
    batch_size: usize,
    interval: Duration,
}

impl SchedulerConfig {
    pub fn new(batch_size: usize, interval: Duration) -> Result<Self, ConfigError> {
        if batch_size == 0 {
            return Err(ConfigError::ZeroBatchSize);
        }
        if interval.is_zero() {
            return Err(ConfigError::ZeroInterval);
        }
        if interval > MAX_INTERVAL {
            return Err(ConfigError::IntervalTooLong);
        }
        Ok(Self {
            batch_size,
            interval,
        })
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

/// Permission to execute one run, handed out by [`SchedulerState::begin_run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunTicket {
    pub run: u64,
    pub batch_size: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Rescheduled { deadline: Instant },
    Stopped(StopReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    /// Already idle or stopped; nothing changed.
    Ignored,
    /// Timer disarmed and the scheduler is stopped.
    Stopped,
    /// A run is in flight; it finishes its claimed items, then the scheduler stops.
    Deferred,
}

/// Scheduler bookkeeping without any timer or IO attached.
///
/// The async driver owns the timer and asks this type what to do at every
/// boundary, which keeps phase transitions testable with plain `Instant`s.
#[derive(Debug, Clone, Default)]
pub struct SchedulerState {
    phase: SchedulerPhase,
    config: Option<SchedulerConfig>,
    next_run_deadline: Option<Instant>,
    stop_requested: bool,
    runs_started: u64,
}

impl SchedulerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SchedulerPhase {
        self.phase
    }

    pub fn config(&self) -> Option<SchedulerConfig> {
        self.config
    }

    pub fn next_run_deadline(&self) -> Option<Instant> {
        self.next_run_deadline
    }

    pub fn runs_started(&self) -> u64 {
        self.runs_started
    }

    /// Whether the repeating timer is armed.
    pub fn is_running(&self) -> bool {
        matches!(
            self.phase,
            SchedulerPhase::Starting | SchedulerPhase::Running | SchedulerPhase::InBatch
        ) && !self.stop_requested
    }

    pub fn in_progress(&self) -> bool {
        self.phase == SchedulerPhase::InBatch
    }

    /// Accepts a start request. On error the state is left untouched.
    pub fn start(&mut self, config: SchedulerConfig, pending: usize) -> Result<(), SchedulerError> {
        if self.phase != SchedulerPhase::Idle {
            return Err(SchedulerError::NotIdle { phase: self.phase });
        }
        if pending == 0 {
            return Err(SchedulerError::NoPendingItems);
        }
        self.config = Some(config);
        self.phase = SchedulerPhase::Starting;
        self.stop_requested = false;
        self.next_run_deadline = None;
        Ok(())
    }

    /// Enters `InBatch`. Returns `None` when a run is already in flight or the
    /// scheduler is not armed, so overlapping runs are impossible.
    pub fn begin_run(&mut self) -> Option<RunTicket> {
        match self.phase {
            SchedulerPhase::Starting | SchedulerPhase::Running => {}
            SchedulerPhase::Idle | SchedulerPhase::InBatch | SchedulerPhase::Stopped => {
                return None;
            }
        }
        let config = self.config?;
        self.phase = SchedulerPhase::InBatch;
        self.next_run_deadline = None;
        self.runs_started += 1;
        Some(RunTicket {
            run: self.runs_started,
            batch_size: config.batch_size,
        })
    }

    /// Closes the current run and decides what comes next.
    ///
    /// `pending_left` is the registry's pending count after the run; zero
    /// stops the scheduler without waiting for another tick.
    pub fn finish_run(&mut self, now: Instant, pending_left: usize) -> RunOutcome {
        if self.stop_requested {
            return self.halt(StopReason::Requested);
        }
        if pending_left == 0 {
            return self.halt(StopReason::Exhausted);
        }
        match self.config.and_then(|config| now.checked_add(config.interval)) {
            Some(deadline) => {
                self.phase = SchedulerPhase::Running;
                self.next_run_deadline = Some(deadline);
                RunOutcome::Rescheduled { deadline }
            }
            None => self.halt(StopReason::Requested),
        }
    }

    /// Closes a run whose claim came back empty.
    pub fn finish_empty_run(&mut self) -> RunOutcome {
        if self.stop_requested {
            return self.halt(StopReason::Requested);
        }
        self.halt(StopReason::Exhausted)
    }

    pub fn stop(&mut self) -> StopOutcome {
        match self.phase {
            SchedulerPhase::Idle | SchedulerPhase::Stopped => StopOutcome::Ignored,
            SchedulerPhase::InBatch => {
                if self.stop_requested {
                    return StopOutcome::Ignored;
                }
                self.stop_requested = true;
                self.next_run_deadline = None;
                StopOutcome::Deferred
            }
            SchedulerPhase::Starting | SchedulerPhase::Running => {
                self.stop_requested = true;
                self.phase = SchedulerPhase::Stopped;
                self.next_run_deadline = None;
                StopOutcome::Stopped
            }
        }
    }

    /// Time left until the next run, floored at zero.
    ///
    /// `None` unless the timer is armed and no run is in flight.
    pub fn countdown_to(&self, now: Instant) -> Option<Duration> {
        if self.phase != SchedulerPhase::Running {
            return None;
        }
        self.next_run_deadline
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    fn halt(&mut self, reason: StopReason) -> RunOutcome {
        self.phase = SchedulerPhase::Stopped;
        self.next_run_deadline = None;
        RunOutcome::Stopped(reason)
    }
}
