// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! HTTP client for the backend's endpoints

use std::time::Duration;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared_types::{ErrorBody, HealthReport, ProcessDataReply, ShutdownAck};
use tracing::{debug, warn};
use url::Url;

use crate::{ClientError, health::HealthProbe};

/// Where the desktop shell expects the backend
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:11459";

const DEFAULT_TIMEOUT_SECONDS: u64 = 5;
const USER_AGENT: &str = concat!("backend-client/", env!("CARGO_PKG_VERSION"));

/// Configuration for [`BackendClient`]
#[derive(Debug, Clone)]
pub struct BackendClientConfig {
    /// Scheme, host and port of the backend
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for BackendClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
        }
    }
}

impl BackendClientConfig {
    /// Default configuration pointed at another base URL
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}

/// Client for the local backend
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    base_url: Url,
}

impl BackendClient {
    /// Create a new backend client
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client cannot
    /// be built.
    pub fn new(config: BackendClientConfig) -> Result<Self, ClientError> {
        let base_url =
            Url::parse(&config.base_url).map_err(|source| ClientError::InvalidBaseUrl {
                url: config.base_url.clone(),
                source,
            })?;

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { client, base_url })
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|source| ClientError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                source,
            })
    }

    /// Fetch the backend's health report
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unreachable or answers with an
    /// error status.
    pub async fn health(&self) -> Result<HealthReport, ClientError> {
        let response = self.client.get(self.endpoint("/health")?).send().await?;
        Self::decode(response).await
    }

    /// Probe the backend's health, folding every failure into the result
    pub async fn probe(&self) -> HealthProbe {
        let url = match self.endpoint("/health") {
            Ok(url) => url,
            Err(error) => {
                return HealthProbe::Disconnected {
                    error: error.to_string(),
                };
            }
        };

        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(error) => {
                debug!(%error, "backend unreachable");
                return HealthProbe::Disconnected {
                    error: error.to_string(),
                };
            }
        };

        let status = response.status();
        if !status.is_success() {
            return HealthProbe::from_status(status.as_u16());
        }

        match response.json::<HealthReport>().await {
            Ok(report) => HealthProbe::Connected { report },
            Err(error) => HealthProbe::Disconnected {
                error: error.to_string(),
            },
        }
    }

    /// Ask the backend to terminate
    ///
    /// The backend acknowledges first and exits shortly afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unreachable or answers with an
    /// error status.
    pub async fn shutdown(&self) -> Result<ShutdownAck, ClientError> {
        let response = self.client.post(self.endpoint("/shutdown")?).send().await?;
        Self::decode(response).await
    }

    /// Submit a JSON object to `POST /api/process_data`
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Rejected` carrying the backend's message when the
    /// payload is refused, or a transport error.
    pub async fn process_data(&self, data: &Value) -> Result<ProcessDataReply, ClientError> {
        let response = self
            .client
            .post(self.endpoint("/api/process_data")?)
            .json(data)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|error_body| error_body.error)
            .unwrap_or(body);

        warn!(status = status.as_u16(), %message, "backend rejected request");
        Err(ClientError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}
