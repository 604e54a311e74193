use std::sync::Arc;

use crate::policy::SuccessPolicy;
use crate::{
    ApplicantProfile, ApplicationRequest, BackendSettings, SubmissionError, SubmissionFailure,
    SubmissionReceipt, SubmissionResponse,
};

const APPLY_PATH: &str = "api/apply";

/// Submits one application. `Ok` means the vacancy counts as applied.
#[async_trait::async_trait]
pub trait Submitter: Send + Sync {
    async fn submit(
        &self,
        job_link: &str,
        profile: &ApplicantProfile,
    ) -> Result<SubmissionReceipt, SubmissionError>;
}

/// Posts applications to the backend's apply endpoint.
#[derive(Clone)]
pub struct ReqwestSubmitter {
    client: reqwest::Client,
    endpoint: reqwest::Url,
    policy: Arc<dyn SuccessPolicy>,
}

impl ReqwestSubmitter {
    pub fn new(
        settings: &BackendSettings,
        policy: Arc<dyn SuccessPolicy>,
    ) -> Result<Self, SubmissionError> {
        let endpoint = settings
            .endpoint(APPLY_PATH)
            .map_err(|message| SubmissionError::new(SubmissionFailure::InvalidUrl, message))?;
        let client = settings
            .build_client()
            .map_err(|err| SubmissionError::new(SubmissionFailure::Network, err.to_string()))?;
        Ok(Self {
            client,
            endpoint,
            policy,
        })
    }

    pub fn endpoint(&self) -> &reqwest::Url {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl Submitter for ReqwestSubmitter {
    async fn submit(
        &self,
        job_link: &str,
        profile: &ApplicantProfile,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        let request = ApplicationRequest { job_link, profile };
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        let text = response.text().await.map_err(map_reqwest_error)?;

        if !status.is_success() {
            let message = error_message(&text).unwrap_or_else(|| status.to_string());
            return Err(SubmissionError::new(
                SubmissionFailure::HttpStatus(status.as_u16()),
                message,
            ));
        }

        let body: serde_json::Value = serde_json::from_str(&text).map_err(|err| {
            SubmissionError::new(SubmissionFailure::InvalidResponse, err.to_string())
        })?;
        let response = SubmissionResponse {
            status: status.as_u16(),
            body,
        };

        if self.policy.is_success(&response) {
            Ok(SubmissionReceipt {
                message: response.summary(),
            })
        } else {
            let message = response
                .summary()
                .unwrap_or_else(|| format!("expected {}", self.policy.describe()));
            Err(SubmissionError::new(SubmissionFailure::Rejected, message))
        }
    }
}

/// Pulls the `error` field out of a failure body, if it is JSON.
pub(crate) fn error_message(text: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(text).ok()?;
    value
        .get("error")
        .and_then(serde_json::Value::as_str)
        .map(ToOwned::to_owned)
}

fn map_reqwest_error(err: reqwest::Error) -> SubmissionError {
    if err.is_timeout() {
        return SubmissionError::new(SubmissionFailure::Timeout, err.to_string());
    }
    if err.is_decode() {
        return SubmissionError::new(SubmissionFailure::InvalidResponse, err.to_string());
    }
    SubmissionError::new(SubmissionFailure::Network, err.to_string())
}
