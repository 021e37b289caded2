use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;

use crate::ProviderError;
use crate::http::{build_agent, post_json_with_retry};
use crate::types::{ChatMessage, ModelConfig};

use super::ChatProvider;

/// Google Gemini through its OpenAI-compatible chat completions endpoint.
pub struct GeminiProvider {
    model: String,
    base_url: String,
    api_key: String,
    temperature: f32,
    max_tokens: u32,
    max_retries: usize,
    agent: ureq::Agent,
}

impl GeminiProvider {
    pub fn new(config: &ModelConfig) -> Result<Self, ProviderError> {
        if config.model_name.trim().is_empty() {
            return Err(ProviderError::Config("model name must not be empty".into()));
        }
        if !(config.base_url.starts_with("https://") || config.base_url.starts_with("http://")) {
            return Err(ProviderError::Config(format!(
                "base url must be http or https (got {})",
                config.base_url
            )));
        }
        if !(0.0..=2.0).contains(&config.temperature) {
            return Err(ProviderError::Config(format!(
                "temperature must be within 0..=2 (got {})",
                config.temperature
            )));
        }
        if config.max_tokens == 0 {
            return Err(ProviderError::Config(
                "max tokens must be greater than 0".into(),
            ));
        }
        if config.timeout_secs == 0 {
            return Err(ProviderError::Config(
                "timeout must be greater than 0".into(),
            ));
        }

        Ok(Self {
            model: config.model_name.clone(),
            base_url: config.base_url.clone(),
            api_key: config.api_key().to_string(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            max_retries: config.max_retries,
            agent: build_agent(Duration::from_secs(config.timeout_secs)),
        })
    }

    fn build_request_body(&self, messages: &[ChatMessage]) -> Value {
        json!({
            "model": self.model,
            "messages": messages,
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
        })
    }

    /// Extract the first choice's text.
    ///
    /// Safety or recitation blocks arrive as an empty `choices` list or a null
    /// `content`; both read as an empty reply.
    fn parse_response(body: &str) -> Result<String, ProviderError> {
        let response: ChatResponse = serde_json::from_str(body)
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;
        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();
        Ok(content)
    }

    /// Pull the human-readable message out of an error body.
    ///
    /// Gemini answers with either `{"error": {...}}` or a one-element array of
    /// that object; anything else is passed through trimmed.
    fn error_message(body: &str) -> String {
        let parsed: Option<Value> = serde_json::from_str(body).ok();
        let object = match parsed {
            Some(Value::Array(items)) => items.into_iter().next(),
            other => other,
        };
        object
            .as_ref()
            .and_then(|value| value.get("error"))
            .and_then(|error| error.get("message"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| body.trim().to_string())
    }
}

impl ChatProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    fn complete(&self, messages: &[ChatMessage]) -> Result<String, ProviderError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = self.build_request_body(messages);
        tracing::debug!(model = %self.model, messages = messages.len(), "sending chat completion");

        let reply = post_json_with_retry(&self.agent, &url, &self.api_key, &body, self.max_retries)?;
        if !reply.is_success() {
            return Err(ProviderError::Status {
                code: reply.status,
                message: Self::error_message(&reply.body),
            });
        }

        Self::parse_response(reply.body.trim())
    }
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}
