use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct BackendSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            connect_timeout: Duration::from_secs(10),
            // A submission drives a full browser session on the backend.
            request_timeout: Duration::from_secs(120),
        }
    }
}

impl BackendSettings {
    pub(crate) fn endpoint(&self, path: &str) -> Result<reqwest::Url, String> {
        let mut base = self.base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        reqwest::Url::parse(&base)
            .and_then(|url| url.join(path))
            .map_err(|err| format!("{}: {err}", self.base_url))
    }

    pub(crate) fn build_client(&self) -> Result<reqwest::Client, reqwest::Error> {
        reqwest::Client::builder()
            .connect_timeout(self.connect_timeout)
            .timeout(self.request_timeout)
            .build()
    }
}

/// Applicant data sent with every submission of a session.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicantProfile {
    pub resume_path: String,
    pub cover_letter_path: String,
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub linkedin_profile: String,
    pub github_profile: String,
    pub portfolio_link: String,
    pub years_of_experience: String,
    pub grad_month: String,
    pub grad_year: String,
    pub college_name: String,
    pub degree: String,
    pub major: String,
    pub work_authorization: String,
    pub sponsorship_required: String,
    pub disability: String,
    pub veteran_status: String,
}

/// Wire body of one application request.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationRequest<'a> {
    pub job_link: &'a str,
    #[serde(flatten)]
    pub profile: &'a ApplicantProfile,
}

/// A 2xx response from the submission backend, before the success policy ran.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionResponse {
    pub status: u16,
    pub body: serde_json::Value,
}

impl SubmissionResponse {
    pub fn field_str(&self, field: &str) -> Option<&str> {
        self.body.get(field).and_then(serde_json::Value::as_str)
    }

    /// Best human-readable summary the backend gave.
    pub fn summary(&self) -> Option<String> {
        self.field_str("result")
            .or_else(|| self.field_str("message"))
            .map(ToOwned::to_owned)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReceipt {
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct SubmissionError {
    pub kind: SubmissionFailure,
    pub message: String,
}

impl SubmissionError {
    pub fn new(kind: SubmissionFailure, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionFailure {
    InvalidUrl,
    Network,
    Timeout,
    HttpStatus(u16),
    InvalidResponse,
    /// The backend answered but the success policy did not accept it.
    Rejected,
}

impl fmt::Display for SubmissionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmissionFailure::InvalidUrl => write!(f, "invalid url"),
            SubmissionFailure::Network => write!(f, "network error"),
            SubmissionFailure::Timeout => write!(f, "timeout"),
            SubmissionFailure::HttpStatus(code) => write!(f, "http status {code}"),
            SubmissionFailure::InvalidResponse => write!(f, "invalid response"),
            SubmissionFailure::Rejected => write!(f, "rejected"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchQuery {
    pub job_title: String,
    pub location: String,
    pub radius: u32,
    pub job_platform: String,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            job_title: "Software Engineer".to_string(),
            location: "Remote".to_string(),
            radius: 0,
            job_platform: "Glassdoor".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    #[error("invalid backend url {0}")]
    InvalidUrl(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("search timed out: {0}")]
    Timeout(String),
    #[error("search failed with http status {status}: {message}")]
    HttpStatus { status: u16, message: String },
    #[error("invalid search response: {0}")]
    InvalidResponse(String),
}
