pub mod error;
pub mod http;
pub mod prompt;
pub mod provider;
pub mod summarizer;
pub mod text;
pub mod types;

pub use error::*;
pub use summarizer::Summarizer;
pub use types::*;

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
