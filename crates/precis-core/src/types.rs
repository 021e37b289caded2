use serde::Serialize;
use std::fmt;

use crate::SummarizeError;

pub const MIN_SUMMARY_WORDS: u32 = 50;
pub const MAX_SUMMARY_WORDS: u32 = 500;
pub const DEFAULT_SUMMARY_WORDS: u32 = 150;
pub const DEFAULT_LANGUAGE: &str = "english";

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";
pub const PROVIDER_NAME: &str = "Google";
pub const FRAMEWORK_NAME: &str = "ureq";
pub const TEMPERATURE: f32 = 0.3;
pub const MAX_TOKENS: u32 = 1024;
pub const TIMEOUT_SECS: u64 = 30;
pub const MAX_RETRIES: usize = 2;

/// Shape of the summary the model is asked for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SummaryStyle {
    #[default]
    Brief,
    Detailed,
    BulletPoints,
}

impl SummaryStyle {
    /// Parse a user-facing label. Unknown labels fall back to `Brief`.
    pub fn from_label(label: &str) -> Self {
        Self::parse(label).unwrap_or_default()
    }

    /// Strict parse, for config validation.
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "brief" => Some(Self::Brief),
            "detailed" => Some(Self::Detailed),
            "bullet points" | "bullet-points" | "bullet_points" | "bulletpoints" => {
                Some(Self::BulletPoints)
            }
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Brief => "brief",
            Self::Detailed => "detailed",
            Self::BulletPoints => "bullet-points",
        }
    }
}

impl fmt::Display for SummaryStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One summarization request, built per invocation and dropped afterwards.
#[derive(Debug, Clone)]
pub struct SummaryRequest {
    pub text: String,
    pub style: SummaryStyle,
    pub max_words: u32,
    pub language: String,
}

impl SummaryRequest {
    pub fn new(
        text: impl Into<String>,
        style: SummaryStyle,
        max_words: u32,
        language: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            style,
            max_words: clamp_summary_words(max_words),
            language: language.into(),
        }
    }
}

pub fn clamp_summary_words(max_words: u32) -> u32 {
    max_words.clamp(MIN_SUMMARY_WORDS, MAX_SUMMARY_WORDS)
}

/// Immutable model settings, owned by the summarizer for the process lifetime.
#[derive(Clone)]
pub struct ModelConfig {
    api_key: String,
    pub model_name: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
    pub max_retries: usize,
    pub base_url: String,
}

impl ModelConfig {
    pub fn new(api_key: &str) -> Result<Self, SummarizeError> {
        let api_key = Some(api_key.trim())
            .filter(|value| !value.is_empty())
            .ok_or_else(|| SummarizeError::Initialization("API key not set".into()))?
            .to_string();
        Ok(Self {
            api_key,
            model_name: DEFAULT_MODEL.to_string(),
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
            timeout_secs: TIMEOUT_SECS,
            max_retries: MAX_RETRIES,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Point the client at a different endpoint. Blank values keep the default.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        let trimmed = base_url.trim().trim_end_matches('/');
        if !trimmed.is_empty() {
            self.base_url = trimmed.to_string();
        }
        self
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn model_info(&self) -> ModelInfo {
        ModelInfo {
            model_name: self.model_name.clone(),
            provider: PROVIDER_NAME.to_string(),
            framework: FRAMEWORK_NAME.to_string(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }
}

impl fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelConfig")
            .field("api_key", &"<redacted>")
            .field("model_name", &self.model_name)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Display descriptor for the configured model.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelInfo {
    pub model_name: String,
    pub provider: String,
    pub framework: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// A role-tagged message sent through a chat provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}
