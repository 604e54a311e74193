use std::time::Duration;

use crate::VacancyStatus;

/// Renders a countdown as `HH:MM:SS`. Hours do not wrap at 24.
pub fn format_countdown(remaining: Duration) -> String {
    let total = remaining.as_secs();
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

pub fn status_label(status: VacancyStatus) -> &'static str {
    match status {
        VacancyStatus::Pending => "Pending",
        VacancyStatus::Applying => "Applying...",
        VacancyStatus::Applied => "Applied",
        VacancyStatus::Failed => "Failed",
    }
}
