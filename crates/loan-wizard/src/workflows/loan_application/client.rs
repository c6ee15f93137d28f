use std::future::Future;

use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::domain::ApplicationId;
use super::payload::SectionPayload;
use crate::config::ApiConfig;

/// Remote persistence boundary so the sequencer can be exercised without a network.
pub trait ApplicationApi: Send + Sync {
    /// Creates an empty application and returns its server-assigned identifier.
    fn create_application(&self) -> impl Future<Output = Result<ApplicationId, ApiError>> + Send;

    /// Stores one section under an existing application.
    fn save_section(
        &self,
        application_id: &ApplicationId,
        payload: &SectionPayload,
    ) -> impl Future<Output = Result<Value, ApiError>> + Send;
}

/// Failures talking to the application API. Callers treat every variant alike.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} responded with status {status}")]
    Status { endpoint: String, status: u16 },
    #[error("{endpoint} returned a body that is not valid JSON: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("no application id returned from server")]
    MissingApplicationId,
}

#[derive(Debug, Deserialize)]
struct CreatedApplication {
    #[serde(default)]
    id: Option<Value>,
}

impl CreatedApplication {
    fn into_id(self) -> Option<ApplicationId> {
        match self.id? {
            Value::String(id) if !id.trim().is_empty() => Some(ApplicationId(id)),
            Value::Number(id) => Some(ApplicationId(id.to_string())),
            _ => None,
        }
    }
}

/// JSON-over-HTTP client for the loan application endpoints.
#[derive(Debug, Clone)]
pub struct HttpApplicationApi {
    client: Client,
    base_url: String,
}

impl HttpApplicationApi {
    pub fn new(config: &ApiConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: &ApiConfig) -> Self {
        Self {
            client,
            base_url: config.base_url().to_string(),
        }
    }

    fn create_url(&self) -> String {
        format!("{}/applications/create", self.base_url)
    }

    fn section_url(&self, application_id: &ApplicationId, payload: &SectionPayload) -> String {
        format!(
            "{}/applications/{}/{}",
            self.base_url,
            application_id,
            payload.section().path()
        )
    }

    async fn read_json(endpoint: String, response: Response) -> Result<Value, ApiError> {
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                endpoint,
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| ApiError::Transport {
                endpoint: endpoint.clone(),
                source,
            })?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&body).map_err(|source| ApiError::Decode { endpoint, source })
    }
}

impl ApplicationApi for HttpApplicationApi {
    async fn create_application(&self) -> Result<ApplicationId, ApiError> {
        let endpoint = self.create_url();
        debug!(%endpoint, "creating application");

        let response = self
            .client
            .post(&endpoint)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                endpoint: endpoint.clone(),
                source,
            })?;

        let body = Self::read_json(endpoint.clone(), response).await?;
        if body.is_null() {
            return Err(ApiError::MissingApplicationId);
        }
        let created: CreatedApplication = serde_json::from_value(body)
            .map_err(|source| ApiError::Decode { endpoint, source })?;
        created.into_id().ok_or(ApiError::MissingApplicationId)
    }

    async fn save_section(
        &self,
        application_id: &ApplicationId,
        payload: &SectionPayload,
    ) -> Result<Value, ApiError> {
        let endpoint = self.section_url(application_id, payload);
        debug!(%endpoint, section = %payload.section(), "saving section");

        let response = self
            .client
            .post(&endpoint)
            .json(payload)
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                endpoint: endpoint.clone(),
                source,
            })?;

        Self::read_json(endpoint, response).await
    }
}
