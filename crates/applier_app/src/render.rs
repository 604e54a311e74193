use std::time::Duration;

use applier_core::{format_countdown, status_label, RegistrySummary, SchedulerEvent, StopReason};
use chrono::{DateTime, Local, TimeDelta};

pub fn render_event(event: &SchedulerEvent) -> String {
    match event {
        SchedulerEvent::Started {
            batch_size,
            interval,
        } => format!(
            "Scheduler started. Applying to {} vacancies every {}.",
            batch_size,
            format_countdown(*interval)
        ),
        SchedulerEvent::RunStarted { run, claimed } => {
            format!("--- Run {} started: {} vacancies ---", run, claimed.len())
        }
        SchedulerEvent::Submitting {
            id, title, company, ..
        } => format!("[#{id}] Applying to \"{title}\" at {company}"),
        SchedulerEvent::StatusChanged { id, status, detail } => match detail {
            Some(detail) => format!("[#{id}] -> {} ({detail})", status_label(*status)),
            None => format!("[#{id}] -> {}", status_label(*status)),
        },
        SchedulerEvent::RunFinished {
            run,
            applied,
            failed,
            next_run_in,
        } => match next_run_in {
            Some(next) => format!(
                "Run {run} finished: {applied} applied, {failed} failed. Next run in {}.",
                format_countdown(*next)
            ),
            None => format!("Run {run} finished: {applied} applied, {failed} failed."),
        },
        SchedulerEvent::Stopped { reason } => match reason {
            StopReason::Requested => "--- Scheduler stopped ---".to_string(),
            StopReason::Exhausted => {
                "--- No pending vacancies left. Scheduler stopped ---".to_string()
            }
        },
    }
}

/// One-line countdown with the local wall-clock time of the next run.
pub fn render_countdown(remaining: Duration, now: DateTime<Local>) -> String {
    let at = TimeDelta::from_std(remaining)
        .ok()
        .and_then(|delta| now.checked_add_signed(delta));
    match at {
        Some(at) => format!(
            "Next run in {} (at {})",
            format_countdown(remaining),
            at.format("%H:%M:%S")
        ),
        None => format!("Next run in {}", format_countdown(remaining)),
    }
}

pub fn render_summary(summary: &RegistrySummary) -> String {
    format!(
        "Vacancies: {} total | {} applied | {} failed | {} pending",
        summary.total(),
        summary.applied,
        summary.failed,
        summary.pending + summary.applying
    )
}
