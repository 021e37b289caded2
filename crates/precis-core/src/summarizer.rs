use crate::SummarizeError;
use crate::prompt::{SYSTEM_PROMPT, VALIDATION_PROMPT, build_prompt, strip_known_prefix};
use crate::provider::{ChatProvider, GeminiProvider};
use crate::text::{MIN_INPUT_WORDS, preprocess, word_count};
use crate::types::{ChatMessage, ModelConfig, ModelInfo, SummaryRequest};

/// Turns a [`SummaryRequest`] into a summary via one blocking provider call.
pub struct Summarizer<P = GeminiProvider> {
    provider: P,
    info: ModelInfo,
}

impl Summarizer<GeminiProvider> {
    /// Build a client for the default Gemini model with the given credential.
    pub fn initialize(api_key: &str) -> Result<Self, SummarizeError> {
        Self::from_config(ModelConfig::new(api_key)?)
    }

    pub fn from_config(config: ModelConfig) -> Result<Self, SummarizeError> {
        let provider = GeminiProvider::new(&config)
            .map_err(|e| SummarizeError::Initialization(e.to_string()))?;
        tracing::debug!(?config, "summarizer initialized");
        Ok(Self::with_provider(&config, provider))
    }
}

impl<P: ChatProvider> Summarizer<P> {
    pub fn with_provider(config: &ModelConfig, provider: P) -> Self {
        Self {
            provider,
            info: config.model_info(),
        }
    }

    pub fn summarize(&self, request: &SummaryRequest) -> Result<String, SummarizeError> {
        let cleaned = preprocess(&request.text);
        let words = word_count(&cleaned);
        if words < MIN_INPUT_WORDS {
            return Err(SummarizeError::InputTooShort);
        }

        let prompt = build_prompt(&cleaned, request.style, request.max_words, &request.language);
        let messages = [ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(prompt)];
        tracing::debug!(
            provider = self.provider.name(),
            style = %request.style,
            max_words = request.max_words,
            language = %request.language,
            input_words = words,
            "requesting summary"
        );

        let response = self.provider.complete(&messages).map_err(|err| {
            tracing::debug!(error = %err, "provider call failed");
            SummarizeError::from(err)
        })?;

        let summary = strip_known_prefix(&response);
        if summary.is_empty() {
            return Err(SummarizeError::EmptyResult);
        }
        tracing::info!(summary_words = word_count(summary), "summary generated");
        Ok(summary.to_string())
    }

    /// Send a trivial message and report whether anything came back.
    ///
    /// Any non-empty reply counts, whitespace included; the key only has to be
    /// accepted.
    pub fn validate_api_key(&self) -> bool {
        match self.provider.complete(&[ChatMessage::user(VALIDATION_PROMPT)]) {
            Ok(reply) => !reply.is_empty(),
            Err(err) => {
                tracing::debug!(error = %err, "api key validation failed");
                false
            }
        }
    }

    pub fn model_info(&self) -> &ModelInfo {
        &self.info
    }
}

#[cfg(test)]
mod tests {
    use super::Summarizer;
    use crate::types::{ChatMessage, ModelConfig, Role, SummaryRequest, SummaryStyle};
    use crate::{ProviderError, SummarizeError};
    use std::sync::Mutex;

    struct ScriptedProvider {
        reply: Result<String, String>,
        calls: Mutex<Vec<Vec<ChatMessage>>>,
    }

    impl ScriptedProvider {
        fn replying(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                reply: Err(message.to_string()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<Vec<ChatMessage>> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl super::ChatProvider for ScriptedProvider {
        fn name(&self) -> &'static str {
            "scripted"
        }

        fn complete(&self, messages: &[ChatMessage]) -> Result<String, ProviderError> {
            self.calls.lock().unwrap().push(messages.to_vec());
            self.reply.clone().map_err(ProviderError::Network)
        }
    }

    fn summarizer(provider: ScriptedProvider) -> Summarizer<ScriptedProvider> {
        let config = ModelConfig::new("test-key").unwrap();
        Summarizer::with_provider(&config, provider)
    }

    fn long_text() -> String {
        "cats ".repeat(12)
    }

    #[test]
    fn detailed_french_request_end_to_end() {
        let summarizer = summarizer(ScriptedProvider::replying("Summary: Le texte parle de chats."));
        let request = SummaryRequest::new(long_text(), SummaryStyle::Detailed, 100, "french");

        let summary = summarizer.summarize(&request).unwrap();
        assert_eq!(summary, "Le texte parle de chats.");

        let calls = summarizer.provider.calls();
        assert_eq!(calls.len(), 1);
        let messages = &calls[0];
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert!(messages[0].content.contains("professional text summarizer"));
        assert_eq!(messages[1].role, Role::User);
        assert!(messages[1].content.contains("french"));
        assert!(messages[1].content.contains("100"));
        assert!(messages[1].content.contains("comprehensive summary"));
        assert!(messages[1].content.contains(long_text().trim()));
    }

    #[test]
    fn short_input_never_reaches_provider() {
        let summarizer = summarizer(ScriptedProvider::replying("unused"));
        let request = SummaryRequest::new(
            "one two three four five six seven eight nine @@ ## $$",
            SummaryStyle::Brief,
            150,
            "english",
        );
        let err = summarizer.summarize(&request).unwrap_err();
        assert!(matches!(err, SummarizeError::InputTooShort));
        assert!(summarizer.provider.calls().is_empty());
    }

    #[test]
    fn prompt_carries_cleaned_text() {
        let summarizer = summarizer(ScriptedProvider::replying("fine"));
        let request = SummaryRequest::new(
            "  alpha   beta\n\ngamma <delta> epsilon zeta eta theta iota kappa  ",
            SummaryStyle::BulletPoints,
            150,
            "english",
        );
        summarizer.summarize(&request).unwrap();
        let calls = summarizer.provider.calls();
        let prompt = &calls[0][1].content;
        assert!(prompt.contains("alpha beta gamma delta epsilon zeta eta theta iota kappa"));
        assert!(prompt.contains("bullet point format"));
    }

    #[test]
    fn prefix_only_reply_is_empty_result() {
        let summarizer = summarizer(ScriptedProvider::replying("  Summary:  "));
        let request = SummaryRequest::new(long_text(), SummaryStyle::Brief, 150, "english");
        let err = summarizer.summarize(&request).unwrap_err();
        assert!(matches!(err, SummarizeError::EmptyResult));
    }

    #[test]
    fn provider_failures_are_classified() {
        let request = SummaryRequest::new(long_text(), SummaryStyle::Brief, 150, "english");

        let quota = summarizer(ScriptedProvider::failing("quota exhausted, timeout"));
        assert!(matches!(
            quota.summarize(&request).unwrap_err(),
            SummarizeError::QuotaExceeded
        ));

        let auth = summarizer(ScriptedProvider::failing("invalid API key"));
        assert!(matches!(
            auth.summarize(&request).unwrap_err(),
            SummarizeError::Authentication
        ));

        let other = summarizer(ScriptedProvider::failing("connection refused"));
        match other.summarize(&request).unwrap_err() {
            SummarizeError::Generic(msg) => assert!(msg.contains("connection refused")),
            err => panic!("unexpected {err:?}"),
        }
    }

    #[test]
    fn validate_api_key_reports_reply_presence() {
        let ok = summarizer(ScriptedProvider::replying("API key is working"));
        assert!(ok.validate_api_key());
        let calls = ok.provider.calls();
        assert_eq!(calls[0].len(), 1);
        assert_eq!(calls[0][0].role, Role::User);

        let blank = summarizer(ScriptedProvider::replying("   "));
        assert!(blank.validate_api_key());

        let empty = summarizer(ScriptedProvider::replying(""));
        assert!(!empty.validate_api_key());

        let failing = summarizer(ScriptedProvider::failing("authentication failed"));
        assert!(!failing.validate_api_key());
    }

    #[test]
    fn model_info_is_fixed_descriptor() {
        let summarizer = summarizer(ScriptedProvider::replying("x"));
        let info = summarizer.model_info();
        assert_eq!(info.model_name, "gemini-1.5-flash");
        assert_eq!(info.provider, "Google");
        assert_eq!(info.max_tokens, 1024);
    }

    #[test]
    fn initialize_rejects_empty_key() {
        assert!(matches!(
            Summarizer::initialize(""),
            Err(SummarizeError::Initialization(_))
        ));
    }

    #[test]
    fn initialize_builds_default_client() {
        let summarizer = Summarizer::initialize("test-key").unwrap();
        assert_eq!(summarizer.model_info().model_name, "gemini-1.5-flash");
    }
}
