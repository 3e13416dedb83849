//! Remote voice analyzer using OpenAI-compatible chat completion APIs
//!
//! Defaults target OpenRouter, but any endpoint that speaks the
//! `/chat/completions` protocol works.

use std::env;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::VoiceConfig;
use crate::voice::VoiceError;

const MAX_RETRIES: u32 = 3;
const REFERER: &str = "https://github.com/BioInfo/continuum";
const TITLE: &str = "Continuum Voice Analysis";

/// Backend that turns an analysis prompt into a model response
#[async_trait]
pub trait VoiceAnalyzer: Send + Sync {
    /// Send `prompt` and return the raw text of the reply
    async fn complete(&self, prompt: &str) -> Result<String, VoiceError>;

    /// Analyzer name for logging
    fn name(&self) -> &'static str;
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

/// Voice analyzer backed by an OpenAI-compatible HTTP API
#[derive(Debug)]
pub struct OpenRouterAnalyzer {
    client: Client,
    config: VoiceConfig,
    api_key: String,
    initial_backoff: Duration,
}

impl OpenRouterAnalyzer {
    /// Create an analyzer, reading the API key from `config.api_key_env`.
    pub fn new(config: &VoiceConfig) -> Result<Self, VoiceError> {
        let api_key = env::var(&config.api_key_env).map_err(|_| {
            VoiceError::ConfigError(format!(
                "{} environment variable not set",
                config.api_key_env
            ))
        })?;
        Self::with_api_key(config, api_key)
    }

    /// Create an analyzer with an explicit API key
    pub fn with_api_key(config: &VoiceConfig, api_key: impl Into<String>) -> Result<Self, VoiceError> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(VoiceError::ConfigError("API key is empty".to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| VoiceError::ApiError(e.to_string()))?;

        info!(
            "Voice analyzer initialized with model: {}, api_url: {}",
            config.model, config.api_url
        );

        Ok(Self {
            client,
            config: config.clone(),
            api_key,
            initial_backoff: Duration::from_secs(1),
        })
    }

    /// Override the first retry delay; later delays double from it.
    pub fn with_initial_backoff(mut self, delay: Duration) -> Self {
        self.initial_backoff = delay;
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.api_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl VoiceAnalyzer for OpenRouterAnalyzer {
    /// Posts the prompt, retrying rate limits and transport failures up to
    /// three times with exponential backoff.
    async fn complete(&self, prompt: &str) -> Result<String, VoiceError> {
        let request = ChatCompletionRequest {
            model: &self.config.model,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let url = self.endpoint();
        debug!("Calling voice analysis API at: {}", url);

        let mut last_error = None;
        let mut delay = self.initial_backoff;

        for attempt in 0..=MAX_RETRIES {
            if attempt > 0 {
                tokio::time::sleep(delay).await;
                delay *= 2;
            }

            let response = match self
                .client
                .post(&url)
                .bearer_auth(&self.api_key)
                .header("HTTP-Referer", REFERER)
                .header("X-Title", TITLE)
                .json(&request)
                .send()
                .await
            {
                Ok(response) => response,
                Err(e) => {
                    warn!(
                        "Request failed on attempt {}/{}: {}",
                        attempt + 1,
                        MAX_RETRIES + 1,
                        e
                    );
                    last_error = Some(e.to_string());
                    continue;
                }
            };

            let status = response.status();
            if status == StatusCode::TOO_MANY_REQUESTS {
                warn!(
                    "Rate limited on attempt {}/{}, backing off {:?}",
                    attempt + 1,
                    MAX_RETRIES + 1,
                    delay
                );
                last_error = Some(format!("API returned {status}"));
                continue;
            }

            if !status.is_success() {
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".to_string());
                return Err(VoiceError::ApiError(format!("API returned {status}: {body}")));
            }

            let completion: ChatCompletionResponse = response
                .json()
                .await
                .map_err(|e| VoiceError::ParseError(e.to_string()))?;

            return completion
                .choices
                .into_iter()
                .next()
                .map(|c| c.message.content)
                .ok_or_else(|| VoiceError::ApiError("Empty response".to_string()));
        }

        Err(VoiceError::ApiError(format!(
            "Failed after {} retries: {}",
            MAX_RETRIES,
            last_error.unwrap_or_else(|| "Unknown error".to_string())
        )))
    }

    fn name(&self) -> &'static str {
        "openrouter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(api_url: String) -> VoiceConfig {
        VoiceConfig {
            api_url,
            api_key_env: "CONTINUUM_TEST_VOICE_KEY".to_string(),
            model: "test-model".to_string(),
            timeout_secs: 5,
            ..VoiceConfig::default()
        }
    }

    fn completion(content: &str) -> serde_json::Value {
        serde_json::json!({
            "choices": [{ "message": { "content": content } }]
        })
    }

    #[test]
    fn test_new_missing_api_key() {
        let config = VoiceConfig {
            api_key_env: "CONTINUUM_TEST_UNSET_KEY".to_string(),
            ..VoiceConfig::default()
        };
        let err = OpenRouterAnalyzer::new(&config).unwrap_err();
        assert!(err.to_string().contains("CONTINUUM_TEST_UNSET_KEY"));
    }

    #[test]
    fn test_empty_api_key_rejected() {
        let result = OpenRouterAnalyzer::with_api_key(&VoiceConfig::default(), "");
        assert!(matches!(result, Err(VoiceError::ConfigError(_))));
    }

    #[tokio::test]
    async fn test_complete_sends_expected_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("Authorization", "Bearer test-key"))
            .and(header("X-Title", TITLE))
            .and(body_partial_json(serde_json::json!({
                "model": "test-model",
                "max_tokens": 8000,
                "messages": [{ "role": "user", "content": "analyze me" }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("{\"a\": 1}")))
            .expect(1)
            .mount(&server)
            .await;

        let analyzer = OpenRouterAnalyzer::with_api_key(&test_config(server.uri()), "test-key").unwrap();
        let reply = analyzer.complete("analyze me").await.unwrap();
        assert_eq!(reply, "{\"a\": 1}");
    }

    #[tokio::test]
    async fn test_complete_retries_rate_limit() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429))
            .up_to_n_times(2)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("ok")))
            .mount(&server)
            .await;

        let analyzer = OpenRouterAnalyzer::with_api_key(&test_config(server.uri()), "k")
            .unwrap()
            .with_initial_backoff(Duration::from_millis(10));
        assert_eq!(analyzer.complete("p").await.unwrap(), "ok");
    }

    #[tokio::test]
    async fn test_complete_gives_up_after_retries() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429))
            .expect(u64::from(MAX_RETRIES + 1))
            .mount(&server)
            .await;

        let analyzer = OpenRouterAnalyzer::with_api_key(&test_config(server.uri()), "k")
            .unwrap()
            .with_initial_backoff(Duration::from_millis(1));
        let err = analyzer.complete("p").await.unwrap_err();
        assert!(err.to_string().contains("Failed after 3 retries"));
    }

    #[tokio::test]
    async fn test_complete_client_error_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
            .expect(1)
            .mount(&server)
            .await;

        let analyzer = OpenRouterAnalyzer::with_api_key(&test_config(server.uri()), "k").unwrap();
        let err = analyzer.complete("p").await.unwrap_err();
        assert!(matches!(err, VoiceError::ApiError(ref msg) if msg.contains("bad key")));
    }

    #[tokio::test]
    async fn test_complete_empty_choices() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})))
            .mount(&server)
            .await;

        let analyzer = OpenRouterAnalyzer::with_api_key(&test_config(server.uri()), "k").unwrap();
        assert!(analyzer.complete("p").await.is_err());
    }
}
