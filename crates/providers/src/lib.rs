//! LLM provider implementations for brandbot.
//!
//! All providers implement the `brandbot_core::Provider` trait.
//! The registry decides which exist; the resolver decides which answers.

pub mod anthropic;
pub mod gemini;
pub mod openai;
pub mod registry;
pub mod resolver;

pub use anthropic::AnthropicProvider;
pub use gemini::GeminiProvider;
pub use openai::OpenAiProvider;
pub use registry::{ProviderRegistry, build_from_config};
pub use resolver::{ProviderResolver, Resolution};

/// Shared HTTP client settings for vendor APIs.
///
/// The resolver enforces the per-call timeout; this one only bounds a
/// connection that never completes.
pub(crate) fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .connect_timeout(std::time::Duration::from_secs(30))
        .timeout(std::time::Duration::from_secs(300))
        .build()
        .unwrap_or_default()
}
