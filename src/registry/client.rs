//! HTTP client shared foundation
//!
//! This module provides a shared HTTP client with:
//! - Configurable timeout and User-Agent
//! - Exponential backoff retry logic on transport errors and HTTP 429
//! - JSON decoding into typed documents

use crate::config::AnalyzerConfig;
use crate::error::{ConfigError, FetchError, ParseError, RegistryError};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Base delay for exponential backoff (in milliseconds)
const BASE_DELAY_MS: u64 = 100;

/// HTTP client wrapper with retry logic
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    max_retries: u32,
}

impl HttpClient {
    /// Create a new HTTP client from the analyzer configuration
    pub fn from_config(config: &AnalyzerConfig) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| ConfigError::HttpClient {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            max_retries: config.max_retries,
        })
    }

    /// Perform a GET request with retry logic and return the body
    ///
    /// 404 and other non-success statuses are returned immediately; transport
    /// errors, timeouts and 429 are retried up to `max_retries` times.
    pub async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        let mut last_error = None;
        let mut delay = BASE_DELAY_MS;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                debug!(url, attempt, delay_ms = delay, "retrying request");
                tokio::time::sleep(Duration::from_millis(delay)).await;
                delay = delay.saturating_mul(2);
            }

            debug!(url, "GET");
            let response = match self.client.get(url).send().await {
                Ok(response) => response,
                Err(e) => {
                    last_error = Some(transport_error(url, &e));
                    continue;
                }
            };

            let status = response.status();
            if status == StatusCode::TOO_MANY_REQUESTS {
                last_error = Some(FetchError::RateLimited {
                    url: url.to_string(),
                });
                continue;
            }

            if status == StatusCode::NOT_FOUND {
                return Err(FetchError::NotFound {
                    url: url.to_string(),
                });
            }

            if !status.is_success() {
                return Err(FetchError::Status {
                    url: url.to_string(),
                    status: status.as_u16(),
                });
            }

            match response.text().await {
                Ok(body) => return Ok(body),
                Err(e) => last_error = Some(transport_error(url, &e)),
            }
        }

        Err(last_error.unwrap_or_else(|| FetchError::network(url, "unknown error")))
    }

    /// Perform a GET request and decode a JSON object response
    ///
    /// Parse failures are not retried. A body that is valid JSON but not an
    /// object is reported as an unexpected shape.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, RegistryError> {
        let body = self.get_text(url).await?;
        Ok(decode_object(url, &body)?)
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

fn transport_error(url: &str, e: &reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::network(url, e.to_string())
    }
}

/// Decode `body` into `T`, requiring a top-level JSON object
pub(crate) fn decode_object<T: DeserializeOwned>(url: &str, body: &str) -> Result<T, ParseError> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| ParseError::from_json(url, &e))?;
    if !value.is_object() {
        return Err(ParseError::UnexpectedShape {
            url: url.to_string(),
            message: format!("expected a JSON object, found {}", json_kind(&value)),
        });
    }
    serde_json::from_value(value).map_err(|e| ParseError::from_json(url, &e))
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
