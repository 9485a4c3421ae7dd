//! Error types for the brandbot domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum; [`CommandError`] is what a
//! chat surface sees, and [`ErrorKind`] is the coarse tag it branches on.

use thiserror::Error;

/// Coarse classification of a failure, used by chat surfaces to pick a
/// user-facing message without matching on every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A required credential or provider is missing.
    Unconfigured,
    /// Every configured provider was tried and failed.
    ProviderFailure,
    /// The input is of a type the bot cannot handle (file type, URL, ...).
    Unsupported,
    /// The invocation itself is malformed (unknown command, missing option).
    InvalidInput,
    /// Storage or other internal failure.
    Internal,
}

// --- Bounded context errors ---

/// A single provider call failed.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// One failed attempt inside a fallback chain.
#[derive(Debug, Clone)]
pub struct ProviderAttempt {
    pub provider: String,
    pub error: ProviderError,
}

impl std::fmt::Display for ProviderAttempt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.provider, self.error)
    }
}

/// The provider chain could not produce a completion.
#[derive(Debug, Clone, Error)]
pub enum ResolveError {
    #[error("No AI provider is configured; set GEMINI_API_KEY, OPENAI_API_KEY or ANTHROPIC_API_KEY")]
    Unconfigured,

    #[error("All {} provider(s) failed: {}", .attempts.len(), join_attempts(.attempts))]
    ProviderFailure { attempts: Vec<ProviderAttempt> },
}

impl ResolveError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ResolveError::Unconfigured => ErrorKind::Unconfigured,
            ResolveError::ProviderFailure { .. } => ErrorKind::ProviderFailure,
        }
    }
}

fn join_attempts(attempts: &[ProviderAttempt]) -> String {
    attempts
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Error)]
pub enum KnowledgeError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("Failed to extract text from {source_name}: {reason}")]
    Extract { source_name: String, reason: String },

    #[error("Unsupported input: {0}")]
    Unsupported(String),
}

impl KnowledgeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            KnowledgeError::Unsupported(_) => ErrorKind::Unsupported,
            KnowledgeError::Fetch { .. } | KnowledgeError::Extract { .. } => {
                ErrorKind::Unsupported
            }
            KnowledgeError::Storage(_) => ErrorKind::Internal,
        }
    }
}

/// Everything a slash command can fail with.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Unknown agent type: {0}")]
    UnknownAgent(String),

    #[error("Missing required option '{0}'")]
    MissingArgument(String),

    #[error("{0}")]
    Unconfigured(String),

    #[error("{0}")]
    Unsupported(String),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Knowledge(#[from] KnowledgeError),
}

impl CommandError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CommandError::UnknownCommand(_)
            | CommandError::UnknownAgent(_)
            | CommandError::MissingArgument(_) => ErrorKind::InvalidInput,
            CommandError::Unconfigured(_) => ErrorKind::Unconfigured,
            CommandError::Unsupported(_) => ErrorKind::Unsupported,
            CommandError::Resolve(e) => e.kind(),
            CommandError::Provider(ProviderError::NotConfigured(_)) => ErrorKind::Unconfigured,
            CommandError::Provider(_) => ErrorKind::ProviderFailure,
            CommandError::Knowledge(e) => e.kind(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_displays_correctly() {
        let err = CommandError::Provider(ProviderError::ApiError {
            status_code: 429,
            message: "Too many requests".into(),
        });
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("Too many requests"));
    }

    #[test]
    fn provider_failure_lists_every_attempt() {
        let err = ResolveError::ProviderFailure {
            attempts: vec![
                ProviderAttempt {
                    provider: "gemini".into(),
                    error: ProviderError::Network("connection refused".into()),
                },
                ProviderAttempt {
                    provider: "openai".into(),
                    error: ProviderError::AuthenticationFailed("bad key".into()),
                },
            ],
        };
        let text = err.to_string();
        assert!(text.contains("All 2 provider(s) failed"));
        assert!(text.contains("gemini: Network error: connection refused"));
        assert!(text.contains("openai: Authentication failed"));
        assert_eq!(err.kind(), ErrorKind::ProviderFailure);
    }

    #[test]
    fn command_error_kinds() {
        assert_eq!(
            CommandError::from(ResolveError::Unconfigured).kind(),
            ErrorKind::Unconfigured
        );
        assert_eq!(
            CommandError::Knowledge(KnowledgeError::Unsupported("exe".into())).kind(),
            ErrorKind::Unsupported
        );
        assert_eq!(
            CommandError::MissingArgument("query".into()).kind(),
            ErrorKind::InvalidInput
        );
        assert_eq!(
            CommandError::Provider(ProviderError::NotConfigured("openai".into())).kind(),
            ErrorKind::Unconfigured
        );
        assert_eq!(
            CommandError::Knowledge(KnowledgeError::Storage("disk full".into())).kind(),
            ErrorKind::Internal
        );
    }
}
