//! Applier core: vacancy registry and scheduler state machine, free of IO.
mod event;
mod registry;
mod scheduler;
mod vacancy;
mod view_model;

pub use event::{SchedulerEvent, StopReason};
pub use registry::{normalize_url_for_dedupe, IngestStats, Registry, RegistryError, RegistrySummary};
pub use scheduler::{
    ConfigError, RunOutcome, RunTicket, SchedulerConfig, SchedulerError, SchedulerPhase,
    SchedulerState, StopOutcome, MAX_INTERVAL,
};
pub use vacancy::{NewVacancy, Vacancy, VacancyId, VacancyStatus};
pub use view_model::{format_countdown, status_label};
