use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::OracleError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Per-call sampling knobs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingParams {
    pub max_tokens: u32,
    pub temperature: f32,
}

impl SamplingParams {
    /// Short, near-deterministic label replies.
    pub const CLASSIFY: Self = Self {
        max_tokens: 50,
        temperature: 0.1,
    };
    pub const QUESTION: Self = Self {
        max_tokens: 400,
        temperature: 0.7,
    };
    pub const SUMMARY: Self = Self {
        max_tokens: 400,
        temperature: 0.6,
    };
}

/// An opaque text-completion service. It may be slow, may fail, and may
/// answer with text that is not what was asked for.
#[async_trait]
pub trait Oracle: Send + Sync {
    async fn complete(
        &self,
        system: &str,
        user: &str,
        params: SamplingParams,
    ) -> Result<String, OracleError>;
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl LlmConfig {
    pub fn from_env() -> Self {
        let base_url = dotenv::var("LLM_BASE_URL")
            .unwrap_or_else(|_| "https://api.openai.com/v1".to_string());
        let model = dotenv::var("LLM_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());
        let api_key = dotenv::var("LLM_API_KEY")
            .ok()
            .filter(|k| !k.is_empty())
            .or_else(|| dotenv::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty()));
        let timeout_secs = match dotenv::var("LLM_TIMEOUT_SECS") {
            Ok(raw) => raw.parse::<u64>().unwrap_or_else(|_| {
                warn!(value = %raw, "invalid LLM_TIMEOUT_SECS, using 120");
                120
            }),
            Err(_) => 120,
        };

        Self {
            base_url,
            model,
            api_key,
            timeout: Duration::from_secs(timeout_secs),
        }
    }
}

/// OpenAI-compatible chat completions client.
pub struct LlmClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl LlmClient {
    pub fn new(config: LlmConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url,
            model: config.model,
            api_key: config.api_key,
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(LlmConfig::from_env())
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Resolve the chat completions endpoint from the base URL.
    fn endpoint(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        if base.ends_with("/chat/completions") {
            base.to_string()
        } else if base.ends_with("/v1") {
            format!("{}/chat/completions", base)
        } else {
            format!("{}/v1/chat/completions", base)
        }
    }

    /// Non-streaming chat completion.
    pub async fn chat(
        &self,
        messages: &[Message],
        params: SamplingParams,
    ) -> Result<String, OracleError> {
        let body = serde_json::json!({
            "model": self.model,
            "messages": messages,
            "temperature": params.temperature,
            "max_tokens": params.max_tokens,
        });

        let mut req = self.client.post(self.endpoint()).json(&body);
        if let Some(key) = &self.api_key {
            req = req.header("Authorization", format!("Bearer {}", key));
        }

        let resp = req.send().await?;
        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            return Err(OracleError::Status { status, body: text });
        }

        let json: serde_json::Value = serde_json::from_str(&text)?;

        // choices[0].message.content may be null on refusals
        let content = json["choices"]
            .get(0)
            .and_then(|c| c["message"]["content"].as_str())
            .ok_or(OracleError::MissingContent)?
            .to_string();

        debug!(chars = content.len(), "LLM completion received");
        Ok(content)
    }
}

#[async_trait]
impl Oracle for LlmClient {
    async fn complete(
        &self,
        system: &str,
        user: &str,
        params: SamplingParams,
    ) -> Result<String, OracleError> {
        let messages = [Message::system(system), Message::user(user)];
        self.chat(&messages, params).await
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(base_url: String, api_key: Option<&str>) -> LlmClient {
        LlmClient::new(LlmConfig {
            base_url,
            model: "test-model".to_string(),
            api_key: api_key.map(str::to_string),
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    #[test]
    fn test_endpoint_resolution() {
        let c = client_for("http://localhost:1234/v1/".to_string(), None);
        assert_eq!(c.endpoint(), "http://localhost:1234/v1/chat/completions");

        let c = client_for("http://host/v1/chat/completions".to_string(), None);
        assert_eq!(c.endpoint(), "http://host/v1/chat/completions");

        let c = client_for("http://host".to_string(), None);
        assert_eq!(c.endpoint(), "http://host/v1/chat/completions");
    }

    #[tokio::test]
    async fn test_complete_sends_both_roles_and_extracts_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("Authorization", "Bearer sk-test"))
            .and(body_partial_json(serde_json::json!({
                "model": "test-model",
                "max_tokens": 50,
                "messages": [
                    {"role": "system", "content": "sys"},
                    {"role": "user", "content": "usr"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": "yes_no"}}]
            })))
            .mount(&server)
            .await;

        let client = client_for(format!("{}/v1", server.uri()), Some("sk-test"));
        let out = client
            .complete("sys", "usr", SamplingParams::CLASSIFY)
            .await
            .unwrap();
        assert_eq!(out, "yes_no");
    }

    #[tokio::test]
    async fn test_non_success_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .mount(&server)
            .await;

        let client = client_for(server.uri(), None);
        let err = client
            .complete("sys", "usr", SamplingParams::SUMMARY)
            .await
            .unwrap_err();
        match err {
            OracleError::Status { status, body } => {
                assert_eq!(status.as_u16(), 429);
                assert_eq!(body, "rate limited");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_null_content_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": null}}]
            })))
            .mount(&server)
            .await;

        let client = client_for(server.uri(), None);
        let err = client
            .complete("sys", "usr", SamplingParams::QUESTION)
            .await
            .unwrap_err();
        assert!(matches!(err, OracleError::MissingContent));
    }

    #[tokio::test]
    async fn test_garbage_body_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let client = client_for(server.uri(), None);
        let err = client
            .complete("sys", "usr", SamplingParams::QUESTION)
            .await
            .unwrap_err();
        assert!(matches!(err, OracleError::Decode(_)));
    }
}
