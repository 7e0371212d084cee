use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use tracing::{debug, warn};

use super::types::{ContentsRequest, FindSimilarRequest, SearchRequest, SearchResponse};
use crate::config::ExaConfig;

pub const API_BASE: &str = "https://api.exa.ai";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, thiserror::Error)]
pub enum ExaError {
    #[error("missing credential: EXA_API_KEY not set. Get one at https://dashboard.exa.ai")]
    ApiKeyNotSet,

    #[error("Exa API rate limit exceeded")]
    RateLimited,

    #[error("Exa API rejected the credential: {0}")]
    Unauthorized(String),

    #[error("Exa API error ({code}): {message}")]
    Api { code: u16, message: String },

    #[error("malformed Exa response: {0}")]
    Decode(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Remote operations of the Exa search service.
/// Implemented by `ExaClient` for production; scripted mocks are used in tests.
// Futures are awaited in place on the caller's task, so no `Send` bound is needed.
#[allow(async_fn_in_trait)]
pub trait ExaApi {
    /// `POST /search`. Carries page contents when `request.contents` is set.
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, ExaError>;

    async fn get_contents(&self, request: &ContentsRequest) -> Result<SearchResponse, ExaError>;

    async fn find_similar(
        &self,
        request: &FindSimilarRequest,
    ) -> Result<SearchResponse, ExaError>;
}

#[derive(Clone)]
struct ApiKey(String);

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}

#[derive(Clone, Debug)]
pub struct ExaClient {
    http: Client,
    api_key: ApiKey,
    base_url: String,
    timeout: Duration,
}

impl ExaClient {
    /// Builds a client from configuration. A missing or blank key is an error;
    /// there is no built-in fallback credential.
    pub fn from_config(http: Client, config: &ExaConfig) -> Result<Self, ExaError> {
        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(ExaError::ApiKeyNotSet)?;
        Ok(Self {
            http,
            api_key: ApiKey(api_key.to_string()),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: config.timeout,
        })
    }

    #[cfg(test)]
    pub(crate) fn with_base_url(http: Client, base_url: &str) -> Self {
        Self {
            http,
            api_key: ApiKey("test-key".to_string()),
            base_url: base_url.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    async fn post_json<B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<SearchResponse, ExaError> {
        let url = format!("{}{path}", self.base_url);

        let response = self
            .http
            .post(&url)
            .header("x-api-key", &self.api_key.0)
            .header("User-Agent", crate::USER_AGENT)
            .json(body)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            warn!(path, "Exa API rate limited");
            return Err(ExaError::RateLimited);
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = error_message(&text).unwrap_or_else(|| {
                let end = text.floor_char_boundary(200);
                format!("HTTP {status}: {}", &text[..end])
            });
            warn!(status = %status, path, "Exa API error");
            return Err(match status.as_u16() {
                401 | 403 => ExaError::Unauthorized(message),
                code => ExaError::Api { code, message },
            });
        }

        let text = response.text().await?;
        let body: SearchResponse =
            serde_json::from_str(&text).map_err(|e| ExaError::Decode(e.to_string()))?;
        if let Some(err) = body.error.as_ref().filter(|e| !e.is_empty()) {
            warn!(path, error = %err, "Exa API error in 200 response");
            return Err(ExaError::Api {
                code: status.as_u16(),
                message: err.clone(),
            });
        }

        debug!(path, results = body.results.len(), "exa request complete");
        Ok(body)
    }
}

impl ExaApi for ExaClient {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, ExaError> {
        self.post_json("/search", request).await
    }

    async fn get_contents(&self, request: &ContentsRequest) -> Result<SearchResponse, ExaError> {
        self.post_json("/contents", request).await
    }

    async fn find_similar(
        &self,
        request: &FindSimilarRequest,
    ) -> Result<SearchResponse, ExaError> {
        self.post_json("/findSimilar", request).await
    }
}

/// Pulls the `error` string out of a JSON error body, if there is one.
fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("error")
        .and_then(|e| e.as_str().or_else(|| e.get("message").and_then(|m| m.as_str())))
        .map(str::to_string)
}
