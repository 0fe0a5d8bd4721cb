//! CO₂ estimation backend client
//!
//! The backend exposes a single `POST /route` endpoint. Several deployments
//! may exist (local development, hosted); they are tried in order.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::models::{EmissionsQuery, EmissionsReply};

/// Configuration for the emissions backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmissionsConfig {
    /// Primary backend base URL
    #[serde(default = "default_emissions_base_url")]
    pub base_url: String,

    /// Further deployments tried when the primary is unreachable
    #[serde(default)]
    pub fallback_base_urls: Vec<String>,

    /// Per-request timeout in seconds
    #[serde(default = "default_emissions_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_emissions_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

const fn default_emissions_timeout_secs() -> u64 {
    5
}

impl Default for EmissionsConfig {
    fn default() -> Self {
        Self {
            base_url: default_emissions_base_url(),
            fallback_base_urls: Vec::new(),
            timeout_secs: default_emissions_timeout_secs(),
        }
    }
}

impl EmissionsConfig {
    /// All deployments in the order they are tried
    #[must_use]
    pub fn candidate_urls(&self) -> Vec<&str> {
        std::iter::once(self.base_url.as_str())
            .chain(self.fallback_base_urls.iter().map(String::as_str))
            .filter(|u| !u.is_empty())
            .collect()
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.candidate_urls().is_empty() {
            return Err("at least one emissions base_url is required".to_string());
        }
        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }
        Ok(())
    }
}

/// Errors from the emissions backend
#[derive(Debug, Error)]
pub enum EmissionsError {
    /// No deployment could be reached
    #[error("Emissions backend unreachable: {0}")]
    Unreachable(String),

    /// Backend answered with an error status
    #[error("Emissions request failed: {0}")]
    RequestFailed(String),

    /// Backend answered with an unexpected body
    #[error("Emissions parse error: {0}")]
    ParseError(String),

    /// No deployment configured
    #[error("No emissions backend configured")]
    NotConfigured,
}

/// Trait for emissions backend clients
#[async_trait]
pub trait EmissionsClient: Send + Sync {
    /// Estimate CO₂ for a trip
    async fn estimate(&self, query: &EmissionsQuery) -> Result<EmissionsReply, EmissionsError>;
}

/// HTTP client for the emissions backend
#[derive(Debug)]
pub struct HttpEmissionsClient {
    client: Client,
    config: EmissionsConfig,
}

impl HttpEmissionsClient {
    /// Create a new emissions client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: &EmissionsConfig) -> Result<Self, EmissionsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent("GreenRoute/1.0")
            .build()
            .map_err(|e| EmissionsError::Unreachable(e.to_string()))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    async fn estimate_at(
        &self,
        base_url: &str,
        query: &EmissionsQuery,
    ) -> Result<EmissionsReply, EmissionsError> {
        let url = format!("{}/route", base_url.trim_end_matches('/'));

        let response = self
            .client
            .post(&url)
            .json(query)
            .send()
            .await
            .map_err(|e| EmissionsError::Unreachable(format!("{url}: {e}")))?;

        let status = response.status();
        if status.is_server_error() {
            return Err(EmissionsError::Unreachable(format!("{url}: HTTP {status}")));
        }
        if !status.is_success() {
            return Err(EmissionsError::RequestFailed(format!("HTTP {status}")));
        }

        response
            .json()
            .await
            .map_err(|e| EmissionsError::ParseError(e.to_string()))
    }
}

#[async_trait]
impl EmissionsClient for HttpEmissionsClient {
    #[instrument(skip(self, query), fields(mode = %query.mode))]
    async fn estimate(&self, query: &EmissionsQuery) -> Result<EmissionsReply, EmissionsError> {
        let mut last_error = EmissionsError::NotConfigured;

        for base_url in self.config.candidate_urls() {
            match self.estimate_at(base_url, query).await {
                Ok(reply) => {
                    debug!(%base_url, grams = reply.co2_estimated_g, "Emissions estimated");
                    return Ok(reply);
                },
                // Only an unreachable deployment moves on to the next one
                Err(EmissionsError::Unreachable(reason)) => {
                    warn!(%base_url, %reason, "Emissions backend unreachable");
                    last_error = EmissionsError::Unreachable(reason);
                },
                Err(e) => return Err(e),
            }
        }

        Err(last_error)
    }
}
