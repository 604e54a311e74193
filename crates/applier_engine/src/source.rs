use serde::Deserialize;

use crate::submit::error_message;
use crate::{BackendSettings, SearchQuery, SourceError};

const SEARCH_PATH: &str = "api/get_links";

/// Supplies candidate vacancy URLs for a search, in the order to apply.
#[async_trait::async_trait]
pub trait VacancySource: Send + Sync {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<String>, SourceError>;
}

#[derive(Debug, Deserialize)]
struct LinksResponse {
    #[serde(default)]
    links: Vec<String>,
}

/// Asks the backend's search endpoint for vacancy links.
#[derive(Debug, Clone)]
pub struct ReqwestVacancySource {
    client: reqwest::Client,
    endpoint: reqwest::Url,
}

impl ReqwestVacancySource {
    pub fn new(settings: &BackendSettings) -> Result<Self, SourceError> {
        let endpoint = settings
            .endpoint(SEARCH_PATH)
            .map_err(SourceError::InvalidUrl)?;
        let client = settings
            .build_client()
            .map_err(|err| SourceError::Network(err.to_string()))?;
        Ok(Self { client, endpoint })
    }
}

#[async_trait::async_trait]
impl VacancySource for ReqwestVacancySource {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<String>, SourceError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(query)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        let text = response.text().await.map_err(map_reqwest_error)?;

        if !status.is_success() {
            return Err(SourceError::HttpStatus {
                status: status.as_u16(),
                message: error_message(&text).unwrap_or_else(|| status.to_string()),
            });
        }

        let parsed: LinksResponse = serde_json::from_str(&text)
            .map_err(|err| SourceError::InvalidResponse(err.to_string()))?;
        Ok(parsed.links)
    }
}

fn map_reqwest_error(err: reqwest::Error) -> SourceError {
    if err.is_timeout() {
        SourceError::Timeout(err.to_string())
    } else {
        SourceError::Network(err.to_string())
    }
}
