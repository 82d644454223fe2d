//! Analysis Service Client
//!
//! HTTP client for the external behavior-analysis service.

use std::future::Future;
use std::time::Duration;

use serde::de::DeserializeOwned;

use super::error::AnalysisError;
use super::types::{check_status, Acknowledgement, EndTestResponse, ErrorBody, StopBaselineResponse};
use crate::constants;
use crate::logic::session::SuspicionReport;

/// Analysis service configuration
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Base URL, e.g. `http://localhost:5000/api`
    pub base_url: String,
    /// Bound on a single request, connect included
    pub timeout: Duration,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            base_url: constants::get_analysis_url(),
            timeout: Duration::from_secs(constants::get_request_timeout_secs()),
        }
    }
}

impl AnalysisConfig {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        }
    }
}

/// The four round trips the orchestrator needs from the analysis service.
///
/// Each call is a single attempt. `idempotency_key` is stable across
/// retries of the same transition within one session.
pub trait AnalysisBackend: Send + Sync {
    fn start_baseline(
        &self,
        idempotency_key: &str,
    ) -> impl Future<Output = Result<Acknowledgement, AnalysisError>> + Send;

    fn stop_baseline(
        &self,
        idempotency_key: &str,
    ) -> impl Future<Output = Result<StopBaselineResponse, AnalysisError>> + Send;

    fn start_test(
        &self,
        idempotency_key: &str,
    ) -> impl Future<Output = Result<Acknowledgement, AnalysisError>> + Send;

    fn end_test(
        &self,
        idempotency_key: &str,
    ) -> impl Future<Output = Result<SuspicionReport, AnalysisError>> + Send;
}

/// reqwest-backed analysis client
pub struct HttpAnalysisClient {
    config: AnalysisConfig,
    http_client: reqwest::Client,
}

impl HttpAnalysisClient {
    pub fn new(config: AnalysisConfig) -> reqwest::Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.timeout)
            .build()?;

        Ok(Self { config, http_client })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// POST with no body, decode a JSON object reply
    async fn post<T: DeserializeOwned>(&self, path: &str, idempotency_key: &str) -> Result<T, AnalysisError> {
        let url = format!("{}/{}", self.config.base_url, path);
        log::debug!("POST {} ({}={})", url, constants::IDEMPOTENCY_HEADER, idempotency_key);

        let response = self.http_client
            .post(&url)
            .header(constants::IDEMPOTENCY_HEADER, idempotency_key)
            .send()
            .await
            .map_err(AnalysisError::from_transport)?;

        let status = response.status();
        let body = response.text().await.map_err(AnalysisError::from_transport)?;

        if !status.is_success() {
            let detail = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.error.or(b.message))
                .unwrap_or(body);
            log::warn!("{} failed with HTTP {}: {}", path, status.as_u16(), detail);
            return Err(AnalysisError::BadResponse(format!("HTTP {}: {}", status.as_u16(), detail)));
        }

        serde_json::from_str(&body)
            .map_err(|e| AnalysisError::BadResponse(format!("{} returned undecodable JSON: {}", path, e)))
    }
}

impl AnalysisBackend for HttpAnalysisClient {
    async fn start_baseline(&self, idempotency_key: &str) -> Result<Acknowledgement, AnalysisError> {
        let ack: Acknowledgement = self.post("start_baseline", idempotency_key).await?;
        check_status(ack.status.as_deref(), ack.message.as_deref().unwrap_or_default())?;
        Ok(ack)
    }

    async fn stop_baseline(&self, idempotency_key: &str) -> Result<StopBaselineResponse, AnalysisError> {
        let reply: StopBaselineResponse = self.post("stop_baseline", idempotency_key).await?;
        check_status(reply.status.as_deref(), reply.message.as_deref().unwrap_or_default())?;
        Ok(reply)
    }

    async fn start_test(&self, idempotency_key: &str) -> Result<Acknowledgement, AnalysisError> {
        let ack: Acknowledgement = self.post("start_test", idempotency_key).await?;
        check_status(ack.status.as_deref(), ack.message.as_deref().unwrap_or_default())?;
        Ok(ack)
    }

    async fn end_test(&self, idempotency_key: &str) -> Result<SuspicionReport, AnalysisError> {
        let reply: EndTestResponse = self.post("end_test", idempotency_key).await?;
        reply.into_report()
    }
}
