//! Narrow interface to the extraction service.

use tracing::{debug, warn};

use crate::{
    config::Config,
    error::{Result, YtknowError},
    types::{
        ExtractionFailure, ExtractionOutcome, ExtractionRequest, HealthStatus, ResponseEnvelope,
    },
};

pub trait ExtractionBackend {
    /// Never fails: transport problems come back as
    /// [`ExtractionFailure::Transport`].
    fn extract(
        &self,
        request: &ExtractionRequest,
    ) -> impl Future<Output = ExtractionOutcome> + Send;

    fn health(&self) -> impl Future<Output = Result<HealthStatus>> + Send;
}

/// JSON-over-HTTP client for the extraction service.
#[derive(Clone, Debug)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(config: &Config) -> Result<Self> {
        let base_url = config.backend_url.trim().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(YtknowError::InvalidBackendUrl {
                url: config.backend_url.clone(),
                reason: "expected an http:// or https:// URL".to_string(),
            });
        }

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn post_extract(&self, request: &ExtractionRequest) -> Result<ResponseEnvelope> {
        let endpoint = self.endpoint("extract");
        debug!(%endpoint, url = %request.url, "posting extraction request");

        let envelope = self
            .client
            .post(&endpoint)
            .json(request)
            .send()
            .await?
            .json::<ResponseEnvelope>()
            .await?;

        Ok(envelope)
    }
}

impl ExtractionBackend for HttpBackend {
    async fn extract(&self, request: &ExtractionRequest) -> ExtractionOutcome {
        match self.post_extract(request).await {
            Ok(envelope) => envelope.into(),
            Err(err) => {
                warn!(error = %err, "extraction request failed in transport");
                ExtractionOutcome::Failed(ExtractionFailure::Transport(err.to_string()))
            }
        }
    }

    async fn health(&self) -> Result<HealthStatus> {
        let endpoint = self.endpoint("health");
        let response = self.client.get(&endpoint).send().await?;

        if !response.status().is_success() {
            return Err(YtknowError::RequestFailed {
                endpoint,
                reason: format!("HTTP {}", response.status()),
            });
        }

        Ok(response.json::<HealthStatus>().await?)
    }
}
