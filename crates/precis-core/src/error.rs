use thiserror::Error;

/// Errors surfaced by the summarization client.
///
/// Every variant renders as a message fit to show the user directly.
#[derive(Debug, Error)]
pub enum SummarizeError {
    #[error("failed to initialize model: {0}")]
    Initialization(String),

    #[error("text is too short for meaningful summarization (minimum 10 words required)")]
    InputTooShort,

    #[error("generated summary is empty; please try again")]
    EmptyResult,

    #[error("API quota exceeded; check your Google Cloud billing and quota limits")]
    QuotaExceeded,

    #[error(
        "authentication failed; verify your Google API key is correct and has proper permissions"
    )]
    Authentication,

    #[error("request timed out; try again with shorter text or check your internet connection")]
    Timeout,

    #[error("summarization failed: {0}")]
    Generic(String),
}

impl SummarizeError {
    /// Classify a provider failure by substring, first match wins.
    ///
    /// Quota is checked before authentication, which is checked before timeout.
    /// Messages that mention "quota" incidentally still land on `QuotaExceeded`.
    pub fn from_provider_message(message: &str) -> Self {
        let lowered = message.to_lowercase();
        if lowered.contains("quota") {
            Self::QuotaExceeded
        } else if lowered.contains("authentication") || lowered.contains("api key") {
            Self::Authentication
        } else if lowered.contains("timeout") {
            Self::Timeout
        } else {
            Self::Generic(message.to_string())
        }
    }
}

impl From<ProviderError> for SummarizeError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Config(msg) => Self::Initialization(msg),
            other => Self::from_provider_message(&other.to_string()),
        }
    }
}

/// Errors from chat providers.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider rejected configuration: {0}")]
    Config(String),

    #[error("provider returned status {code}: {message}")]
    Status { code: u16, message: String },

    #[error("request timeout: {0}")]
    Timeout(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
