use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use upsell_core::config::LlmConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: ChatRole::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: ChatRole::User, content: content.into() }
    }
}

#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Returns the assistant message content. The reply is requested as a
    /// JSON object.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String>;
}

/// Chat-completions client for OpenAI and OpenAI-compatible servers such as
/// Ollama.
#[derive(Clone)]
pub struct OpenAiCompatibleClient {
    http: Client,
    base_url: String,
    model: String,
    api_key: Option<SecretString>,
}

impl OpenAiCompatibleClient {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<SecretString>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build llm http client")?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key,
        })
    }

    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        let base_url = config
            .effective_base_url()
            .ok_or_else(|| anyhow!("llm provider {:?} has no chat endpoint", config.provider))?;

        Self::new(
            base_url,
            config.model.clone(),
            config.api_key.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl LlmClient for OpenAiCompatibleClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = CompletionRequest {
            model: &self.model,
            messages,
            response_format: ResponseFormat { kind: "json_object" },
        };

        let mut request = self.http.post(&url).json(&body);
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key.expose_secret());
        }

        let response = request.send().await.with_context(|| format!("request to {url} failed"))?;
        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            bail!("llm endpoint returned {status}: {detail}");
        }

        let completion: CompletionResponse =
            response.json().await.context("llm response was not valid json")?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| anyhow!("llm response had no message content"))
    }
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Deserialize)]
struct AssistantMessage {
    #[serde(default)]
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use upsell_core::config::{AppConfig, LlmProvider};

    use super::{ChatMessage, ChatRole, OpenAiCompatibleClient};

    #[test]
    fn chat_messages_use_lowercase_roles() {
        let json = serde_json::to_string(&ChatMessage::system("hi")).expect("serialize");
        assert_eq!(json, r#"{"role":"system","content":"hi"}"#);

        let parsed: ChatMessage =
            serde_json::from_str(r#"{"role":"assistant","content":"ok"}"#).expect("parse");
        assert_eq!(parsed.role, ChatRole::Assistant);
    }

    #[test]
    fn ollama_config_resolves_local_endpoint() {
        let mut config = AppConfig::default().llm;
        config.provider = LlmProvider::Ollama;
        config.model = "llama3.1".to_string();

        let client = OpenAiCompatibleClient::from_config(&config).expect("client builds");
        assert_eq!(client.base_url, "http://localhost:11434/v1");
        assert_eq!(client.model(), "llama3.1");
    }

    #[test]
    fn heuristic_provider_has_no_client() {
        let config = AppConfig::default().llm;
        assert!(OpenAiCompatibleClient::from_config(&config).is_err());
    }

    #[test]
    fn explicit_base_url_drops_trailing_slash() {
        let client = OpenAiCompatibleClient::new(
            "http://llm.internal:8080/v1/",
            "gpt-4o",
            None,
            Duration::from_secs(5),
        )
        .expect("client builds");
        assert_eq!(client.base_url, "http://llm.internal:8080/v1");
    }
}
