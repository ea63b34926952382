//! Oracle trait and HTTP-backed client
//!
//! The pipeline only depends on the [`Oracle`] trait: structured request in,
//! opaque text out, fallible, no determinism assumed. [`HttpOracle`] is the
//! production implementation against a generateContent-style completion
//! endpoint, with bounded retry and a hard per-attempt deadline so a hung
//! call classifies as [`OracleError::Timeout`] instead of blocking a stage.

use crate::error::OracleError;
use crate::prompt::PromptPack;
use crate::request::OracleRequest;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Env var holding the completion endpoint base URL
pub const ENDPOINT_ENV: &str = "STRANGLER_ORACLE_ENDPOINT";
/// Env var holding the API key
pub const API_KEY_ENV: &str = "STRANGLER_ORACLE_KEY";

const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL: &str = "gemini-1.0-pro";

/// External judgment service boundary
///
/// Implementations must be safe to invoke concurrently and independently
/// per unit of work.
#[async_trait]
pub trait Oracle: Send + Sync + fmt::Debug {
    /// Render and submit a judgment request, returning the opaque response
    /// text.
    ///
    /// # Errors
    /// Transport-class failures ([`OracleError::is_transport`]) or request
    /// rendering failures. Schema validation of the text happens downstream.
    async fn judge(&self, request: OracleRequest) -> Result<String, OracleError>;
}

/// Configuration for [`HttpOracle`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpOracleConfig {
    /// Completion endpoint base URL
    pub endpoint: String,
    /// API key appended to each request
    pub api_key: String,
    /// Model identifier
    pub model: String,
    /// Per-attempt deadline in seconds
    pub timeout_secs: u64,
    /// Maximum retries for transport-class failures
    pub max_retries: u32,
    /// Sampling temperature, when the endpoint should not use its default
    pub temperature: Option<f32>,
}

impl Default for HttpOracleConfig {
    fn default() -> Self {
        Self {
            endpoint: std::env::var(ENDPOINT_ENV).unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string()),
            api_key: std::env::var(API_KEY_ENV).unwrap_or_default(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: 60,
            max_retries: 3,
            temperature: None,
        }
    }
}

impl HttpOracleConfig {
    /// Create the default configuration (env-backed endpoint/key)
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With an explicit endpoint
    #[inline]
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// With an explicit API key
    #[inline]
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    /// With a per-attempt deadline
    #[inline]
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// With a retry budget
    #[inline]
    #[must_use]
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }
}

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "candidateCount")]
    candidate_count: u32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Content,
}

/// HTTP-backed oracle client
#[derive(Debug)]
pub struct HttpOracle {
    config: HttpOracleConfig,
    client: reqwest::Client,
    pack: &'static PromptPack,
}

impl HttpOracle {
    /// Create a client from explicit configuration
    ///
    /// # Errors
    /// Returns [`OracleError::Config`] when the API key is empty or the
    /// underlying HTTP client cannot be built.
    pub fn new(config: HttpOracleConfig) -> Result<Self, OracleError> {
        if config.api_key.is_empty() {
            return Err(OracleError::Config(format!(
                "API key is required; set {API_KEY_ENV}"
            )));
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|err| OracleError::Config(err.to_string()))?;
        Ok(Self {
            config,
            client,
            pack: PromptPack::builtin(),
        })
    }

    /// Create a client from environment variables
    ///
    /// # Errors
    /// Same conditions as [`HttpOracle::new`].
    pub fn from_env() -> Result<Self, OracleError> {
        Self::new(HttpOracleConfig::default())
    }

    /// Submit one prompt with bounded retry
    ///
    /// Only transport-class failures retry; schema failures surface
    /// immediately. Backoff doubles per attempt (1s, 2s, 4s, ...).
    async fn send(&self, prompt: &str) -> Result<String, OracleError> {
        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                let delay = Duration::from_secs(2u64.pow(attempt - 1));
                tokio::time::sleep(delay).await;
            }

            let deadline = Duration::from_secs(self.config.timeout_secs);
            let outcome = match tokio::time::timeout(deadline, self.try_request(prompt)).await {
                Ok(result) => result,
                Err(_) => Err(OracleError::Timeout {
                    seconds: self.config.timeout_secs,
                }),
            };

            match outcome {
                Ok(text) => return Ok(text),
                Err(err) if err.is_transport() => {
                    tracing::warn!(
                        attempt = attempt + 1,
                        max = self.config.max_retries + 1,
                        %err,
                        "oracle request failed, retrying"
                    );
                    last_error = Some(err);
                }
                Err(err) => return Err(err),
            }
        }

        Err(last_error.unwrap_or(OracleError::Transport {
            message: "all retry attempts failed".to_string(),
        }))
    }

    async fn try_request(&self, prompt: &str) -> Result<String, OracleError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model,
            self.config.api_key,
        );

        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: self.config.temperature.map(|temperature| GenerationConfig {
                temperature,
                candidate_count: 1,
            }),
        };

        let response = self.client.post(&url).json(&request).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(OracleError::Http {
                status: status.as_u16(),
                body: excerpt(&body),
            });
        }

        let envelope: GenerateResponse = serde_json::from_str(&body)
            .map_err(|err| OracleError::malformed(format!("response envelope: {err}"), &body))?;
        envelope
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| OracleError::malformed("empty candidate list", &body))
    }
}

#[async_trait]
impl Oracle for HttpOracle {
    async fn judge(&self, request: OracleRequest) -> Result<String, OracleError> {
        let template = request.template;
        let prompt = self.pack.render(&request)?;
        tracing::debug!(%template, prompt_len = prompt.len(), "submitting judgment request");
        let text = self.send(&prompt).await?;
        tracing::debug!(%template, response_len = text.len(), "judgment response received");
        Ok(text)
    }
}

fn excerpt(body: &str) -> String {
    const MAX: usize = 512;
    if body.chars().count() <= MAX {
        body.to_string()
    } else {
        let head: String = body.chars().take(MAX).collect();
        format!("{head}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_api_key_is_a_config_error() {
        let config = HttpOracleConfig::new().with_api_key("");
        let err = HttpOracle::new(config).unwrap_err();
        assert!(matches!(err, OracleError::Config(_)));
    }

    #[test]
    fn config_builder_overrides() {
        let config = HttpOracleConfig::new()
            .with_endpoint("http://localhost:9090")
            .with_api_key("k")
            .with_timeout_secs(5)
            .with_max_retries(0);
        assert_eq!(config.endpoint, "http://localhost:9090");
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.max_retries, 0);
    }

    #[test]
    fn excerpt_truncates_long_bodies() {
        let long = "x".repeat(2000);
        assert!(excerpt(&long).len() < 600);
        assert!(excerpt("short") == "short");
    }
}
