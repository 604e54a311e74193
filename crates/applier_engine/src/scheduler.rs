use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use applier_core::{
    RunOutcome, RunTicket, SchedulerConfig, SchedulerError, SchedulerEvent, SchedulerPhase,
    SchedulerState, StopOutcome, StopReason, VacancyStatus,
};
use applier_logging::{applier_debug, applier_error, applier_info, applier_warn};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::{ApplicantProfile, EventSink, SharedRegistry, Submitter};

/// Timer-driven batch scheduler.
///
/// `start` validates and spawns a driver task on the current tokio runtime.
/// The driver performs the first run immediately and then one run per
/// interval, each claiming up to `batch_size` vacancies and submitting them
/// one at a time. Clones share the same scheduler.
#[derive(Clone)]
pub struct BatchScheduler {
    inner: Arc<Inner>,
    task: Arc<Mutex<Option<JoinHandle<()>>>>,
}

struct Inner {
    registry: SharedRegistry,
    submitter: Arc<dyn Submitter>,
    profile: ApplicantProfile,
    sink: Arc<dyn EventSink>,
    state: Mutex<SchedulerState>,
    cancel: Mutex<CancellationToken>,
}

impl BatchScheduler {
    pub fn new(
        registry: SharedRegistry,
        submitter: Arc<dyn Submitter>,
        profile: ApplicantProfile,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                registry,
                submitter,
                profile,
                sink,
                state: Mutex::new(SchedulerState::new()),
                cancel: Mutex::new(CancellationToken::new()),
            }),
            task: Arc::new(Mutex::new(None)),
        }
    }

    /// Starts the session. Must be called from within a tokio runtime.
    ///
    /// Fails with [`SchedulerError::NoPendingItems`] when the registry has
    /// nothing pending, leaving the scheduler idle.
    pub fn start(&self, config: SchedulerConfig) -> Result<(), SchedulerError> {
        let pending = self.inner.registry.count_pending();
        let token = {
            let mut state = self.inner.lock_state();
            if let Err(err) = state.start(config, pending) {
                applier_warn!("Scheduler start refused: {}", err);
                return Err(err);
            }
            let token = CancellationToken::new();
            *self.inner.lock_cancel() = token.clone();
            token
        };

        applier_info!(
            "Scheduler started batch_size={} interval_secs={} pending={}",
            config.batch_size(),
            config.interval().as_secs(),
            pending
        );
        self.inner.sink.emit(SchedulerEvent::Started {
            batch_size: config.batch_size(),
            interval: config.interval(),
        });

        let inner = self.inner.clone();
        let handle = tokio::spawn(async move { inner.drive(token).await });
        *lock(&self.task) = Some(handle);
        Ok(())
    }

    /// Disarms the timer. A run in flight finishes its claimed vacancies first.
    ///
    /// Returns `false` when there was nothing to stop.
    pub fn stop(&self) -> bool {
        let outcome = self.inner.lock_state().stop();
        match outcome {
            StopOutcome::Ignored => {
                applier_debug!("Stop ignored; scheduler not running");
                false
            }
            StopOutcome::Stopped => {
                self.inner.lock_cancel().cancel();
                applier_info!("Scheduler stopped reason=requested");
                self.inner.sink.emit(SchedulerEvent::Stopped {
                    reason: StopReason::Requested,
                });
                true
            }
            StopOutcome::Deferred => {
                self.inner.lock_cancel().cancel();
                applier_info!("Stop requested; finishing current batch");
                true
            }
        }
    }

    /// Remaining time before the next run, or `None` when not waiting for one.
    pub fn countdown_to(&self, now: Instant) -> Option<Duration> {
        self.inner.lock_state().countdown_to(now)
    }

    pub fn countdown(&self) -> Option<Duration> {
        self.countdown_to(now())
    }

    pub fn phase(&self) -> SchedulerPhase {
        self.inner.lock_state().phase()
    }

    pub fn next_run_deadline(&self) -> Option<Instant> {
        self.inner.lock_state().next_run_deadline()
    }

    pub fn runs_started(&self) -> u64 {
        self.inner.lock_state().runs_started()
    }

    pub fn registry(&self) -> &SharedRegistry {
        &self.inner.registry
    }

    /// Whether no driver task is alive, either because none was started or
    /// because it has exited.
    pub fn is_finished(&self) -> bool {
        lock(&self.task)
            .as_ref()
            .map_or(true, JoinHandle::is_finished)
    }

    /// Waits for the driver task to exit, i.e. for the scheduler to stop and
    /// any in-flight batch to finish.
    pub async fn wait(&self) {
        let handle = lock(&self.task).take();
        if let Some(handle) = handle {
            if let Err(err) = handle.await {
                applier_error!("Scheduler task ended abnormally: {}", err);
            }
        }
    }
}

impl Inner {
    async fn drive(self: Arc<Self>, cancel: CancellationToken) {
        loop {
            let ticket = self.lock_state().begin_run();
            let Some(ticket) = ticket else {
                break;
            };

            match self.run_batch(ticket).await {
                RunOutcome::Rescheduled { deadline } => {
                    tokio::select! {
                        _ = cancel.cancelled() => break,
                        _ = tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)) => {}
                    }
                }
                RunOutcome::Stopped(_) => break,
            }
        }
        applier_debug!("Scheduler driver exited");
    }

    async fn run_batch(&self, ticket: RunTicket) -> RunOutcome {
        let RunTicket { run, batch_size } = ticket;
        let claimed = self.registry.claim_pending(batch_size);

        if claimed.is_empty() {
            let outcome = self.lock_state().finish_empty_run();
            applier_info!("run={} nothing pending; all vacancies processed", run);
            self.emit_outcome(run, None, outcome);
            return outcome;
        }

        let ids: Vec<_> = claimed.iter().map(|v| v.id()).collect();
        applier_info!("run={} claimed={} ids={:?}", run, ids.len(), ids);
        self.sink.emit(SchedulerEvent::RunStarted { run, claimed: ids });

        let mut applied = 0;
        let mut failed = 0;
        for vacancy in &claimed {
            applier_info!(
                "run={} vacancy_id={} applying title={:?} company={:?} url={}",
                run,
                vacancy.id(),
                vacancy.title(),
                vacancy.company(),
                vacancy.url()
            );
            self.sink.emit(SchedulerEvent::Submitting {
                run,
                id: vacancy.id(),
                title: vacancy.title().to_string(),
                company: vacancy.company().to_string(),
            });

            let (status, detail) = match self.submitter.submit(vacancy.url(), &self.profile).await {
                Ok(receipt) => (VacancyStatus::Applied, receipt.message),
                Err(err) => {
                    applier_warn!("run={} vacancy_id={} submission failed: {}", run, vacancy.id(), err);
                    (VacancyStatus::Failed, Some(err.to_string()))
                }
            };

            if let Err(err) = self.registry.set_status(vacancy.id(), status) {
                applier_error!("run={} registry out of sync: {}", run, err);
                continue;
            }
            match status {
                VacancyStatus::Applied => applied += 1,
                _ => failed += 1,
            }
            applier_info!("run={} vacancy_id={} status={}", run, vacancy.id(), status);
            self.sink.emit(SchedulerEvent::StatusChanged {
                id: vacancy.id(),
                status,
                detail,
            });
        }

        let pending_left = self.registry.count_pending();
        let outcome = self.lock_state().finish_run(now(), pending_left);
        self.emit_outcome(run, Some((applied, failed)), outcome);
        outcome
    }

    /// `tally` is `(applied, failed)` for a run that claimed vacancies.
    fn emit_outcome(&self, run: u64, tally: Option<(usize, usize)>, outcome: RunOutcome) {
        let next_run_in = match outcome {
            RunOutcome::Rescheduled { deadline } => {
                Some(deadline.saturating_duration_since(now()))
            }
            RunOutcome::Stopped(_) => None,
        };
        if let Some((applied, failed)) = tally {
            applier_info!(
                "run={} finished applied={} failed={} next_run_in_secs={:?}",
                run,
                applied,
                failed,
                next_run_in.map(|d| d.as_secs())
            );
            self.sink.emit(SchedulerEvent::RunFinished {
                run,
                applied,
                failed,
                next_run_in,
            });
        }
        if let RunOutcome::Stopped(reason) = outcome {
            applier_info!("Scheduler stopped reason={:?}", reason);
            self.sink.emit(SchedulerEvent::Stopped { reason });
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, SchedulerState> {
        lock(&self.state)
    }

    fn lock_cancel(&self) -> MutexGuard<'_, CancellationToken> {
        lock(&self.cancel)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Current time on tokio's clock, so paused-clock tests see the same time
/// the timer does.
fn now() -> Instant {
    tokio::time::Instant::now().into_std()
}
