use anyhow::{anyhow, bail, Context, Result};
use serde::Serialize;
use std::time::Duration;
use tokio_retry::{strategy::ExponentialBackoff, Retry};

use super::{build_prompt, ModelSuggester};
use crate::config::{SuggestConfig, DEFAULT_MAX_LENGTH, DEFAULT_RETRIES};

/// Environment variable holding an optional bearer token for the endpoint
pub const ENV_TOKEN_VAR: &str = "PRIO_BRO_API_TOKEN";

/// Read the API token from `PRIO_BRO_API_TOKEN`, ignoring blank values.
pub fn get_token_from_env() -> Option<String> {
    match std::env::var(ENV_TOKEN_VAR) {
        Ok(val) => {
            let trimmed = val.trim().to_string();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed)
            }
        }
        Err(_) => None,
    }
}

#[derive(Debug, Serialize)]
struct GenerationRequest<'a> {
    inputs: &'a str,
    parameters: GenerationParameters,
}

#[derive(Debug, Serialize)]
struct GenerationParameters {
    max_length: u32,
    num_return_sequences: u32,
}

/// Suggests a model by asking a hosted text-generation endpoint.
#[derive(Debug, Clone)]
pub struct HttpSuggester {
    client: reqwest::Client,
    endpoint: String,
    token: Option<String>,
    max_length: u32,
    retries: usize,
    timeout: Duration,
}

impl HttpSuggester {
    pub fn from_config(config: &SuggestConfig) -> Result<Self> {
        let timeout = humantime::parse_duration(config.timeout_str())
            .with_context(|| format!("Invalid suggest.timeout '{}'", config.timeout_str()))?;

        // rustls 0.23+ needs a process-level provider (tests build clients without main)
        if rustls::crypto::ring::default_provider().install_default().is_err() {
            tracing::debug!("rustls crypto provider already installed");
        }

        let client = reqwest::Client::builder()
            .user_agent(concat!("prio-bro/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim().to_string(),
            token: get_token_from_env(),
            max_length: config.max_length.unwrap_or(DEFAULT_MAX_LENGTH),
            retries: config.retries.unwrap_or(DEFAULT_RETRIES),
            timeout,
        })
    }

    /// Overall time budget configured for one suggestion
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn request_once(&self, prompt: &str) -> Result<String> {
        let body = GenerationRequest {
            inputs: prompt,
            parameters: GenerationParameters {
                max_length: self.max_length,
                num_return_sequences: 1,
            },
        };

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(ref token) = self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("Failed to reach suggestion service at {}", self.endpoint))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .context("Failed to read suggestion response")?;

        if !status.is_success() {
            bail!("Suggestion service returned {}", status);
        }

        extract_generated_text(&text)
    }
}

impl ModelSuggester for HttpSuggester {
    async fn suggest(&self, descriptions: &[String]) -> Result<String> {
        let prompt = build_prompt(descriptions);

        let retry_strategy = ExponentialBackoff::from_millis(100)
            .max_delay(Duration::from_secs(2))
            .take(self.retries);

        tracing::debug!("Requesting model suggestion from {}", self.endpoint);
        Retry::spawn(retry_strategy, || self.request_once(&prompt)).await
    }
}

/// Pull the generated text out of a response body.
///
/// Accepts `[{"generated_text": ..}]`, `{"generated_text": ..}`, a bare JSON
/// string, or plain text.
pub fn extract_generated_text(body: &str) -> Result<String> {
    let body = body.trim();
    if body.is_empty() {
        bail!("Suggestion service returned an empty body");
    }

    let value: serde_json::Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(_) => return Ok(body.to_string()),
    };

    let generated = match &value {
        serde_json::Value::Array(items) => items
            .first()
            .and_then(|item| item.get("generated_text"))
            .and_then(|v| v.as_str()),
        serde_json::Value::Object(_) => value.get("generated_text").and_then(|v| v.as_str()),
        serde_json::Value::String(s) => Some(s.as_str()),
        _ => None,
    };

    generated
        .map(str::to_string)
        .ok_or_else(|| anyhow!("Suggestion response has no generated_text"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_from_array() {
        let body = r#"[{"generated_text": "Use RICE for these features."}]"#;
        assert_eq!(extract_generated_text(body).unwrap(), "Use RICE for these features.");
    }

    #[test]
    fn test_extract_from_object() {
        let body = r#"{"generated_text": "MoSCoW"}"#;
        assert_eq!(extract_generated_text(body).unwrap(), "MoSCoW");
    }

    #[test]
    fn test_extract_plain_text() {
        assert_eq!(extract_generated_text("  ICE fits best \n").unwrap(), "ICE fits best");
    }

    #[test]
    fn test_extract_json_string() {
        assert_eq!(extract_generated_text(r#""KANO""#).unwrap(), "KANO");
    }

    #[test]
    fn test_extract_missing_field() {
        assert!(extract_generated_text(r#"{"error": "model loading"}"#).is_err());
        assert!(extract_generated_text("[]").is_err());
        assert!(extract_generated_text("").is_err());
    }

    #[test]
    fn test_from_config_defaults() {
        let suggester = HttpSuggester::from_config(&SuggestConfig {
            endpoint: " http://localhost:9/generate ".to_string(),
            timeout: None,
            max_length: None,
            retries: None,
        })
        .unwrap();
        assert_eq!(suggester.endpoint, "http://localhost:9/generate");
        assert_eq!(suggester.max_length, 50);
        assert_eq!(suggester.retries, 2);
        assert_eq!(suggester.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_from_config_with_provider_already_installed() {
        let config = SuggestConfig {
            endpoint: "http://localhost:9/generate".to_string(),
            timeout: Some("2s".to_string()),
            max_length: None,
            retries: Some(0),
        };
        // The second build finds the crypto provider installed and still succeeds
        let _ = rustls::crypto::ring::default_provider().install_default();
        let first = HttpSuggester::from_config(&config).unwrap();
        let second = HttpSuggester::from_config(&config).unwrap();
        assert_eq!(first.timeout(), Duration::from_secs(2));
        assert_eq!(second.retries, 0);
    }

    #[test]
    fn test_from_config_bad_timeout() {
        let result = HttpSuggester::from_config(&SuggestConfig {
            endpoint: "http://localhost".to_string(),
            timeout: Some("whenever".to_string()),
            max_length: None,
            retries: None,
        });
        assert!(result.is_err());
    }
}
