//! Applier engine: backend clients and the timer-driven batch scheduler.
mod policy;
mod registry;
mod scheduler;
mod sink;
mod source;
mod submit;
mod types;

pub use policy::{FieldEquals, FieldTrue, StatusOk, SuccessPolicy, SuccessRule};
pub use registry::SharedRegistry;
pub use scheduler::BatchScheduler;
pub use sink::{ChannelEventSink, EventSink};
pub use source::{ReqwestVacancySource, VacancySource};
pub use submit::{ReqwestSubmitter, Submitter};
pub use types::{
    ApplicantProfile, ApplicationRequest, BackendSettings, SearchQuery, SourceError,
    SubmissionError, SubmissionFailure, SubmissionReceipt, SubmissionResponse,
};
