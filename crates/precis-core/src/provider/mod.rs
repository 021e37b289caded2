mod gemini;

pub use gemini::GeminiProvider;

use crate::ProviderError;
use crate::types::ChatMessage;

/// A remote chat-completion endpoint.
///
/// Implementations block until the reply or an error arrives and perform any
/// transport-level retries themselves.
pub trait ChatProvider: Send {
    fn name(&self) -> &'static str;
    fn complete(&self, messages: &[ChatMessage]) -> Result<String, ProviderError>;
}
