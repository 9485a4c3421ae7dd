//! Provider resolver: ordered fallback chain with per-provider timeouts.
//!
//! Tries each registered provider in order and returns the first success.
//! Sequential, no retries. Every failure is logged and recorded, so an
//! all-failed result says what went wrong with each provider.

use crate::registry::{self, ProviderRegistry};
use brandbot_config::ProvidersConfig;
use brandbot_core::error::{ProviderAttempt, ProviderError, ResolveError};
use brandbot_core::provider::{ProviderKind, ProviderRequest, Usage};
use std::time::Duration;
use tracing::{info, warn};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// A successful completion and who produced it.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub provider: ProviderKind,
    pub model: String,
    pub text: String,
    pub usage: Option<Usage>,
}

pub struct ProviderResolver {
    registry: ProviderRegistry,
    timeout: Option<Duration>,
    temperature: f32,
}

impl ProviderResolver {
    pub fn new(registry: ProviderRegistry) -> Self {
        Self {
            registry,
            timeout: Some(DEFAULT_TIMEOUT),
            temperature: 0.7,
        }
    }

    /// Per-provider timeout; `None` waits indefinitely.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn from_config(config: &ProvidersConfig) -> Self {
        let timeout = (config.timeout_secs > 0).then(|| Duration::from_secs(config.timeout_secs));
        Self::new(registry::build_from_config(config))
            .with_timeout(timeout)
            .with_temperature(config.temperature)
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Registered providers in the order they will be tried.
    pub fn order(&self) -> Vec<ProviderKind> {
        self.registry.kinds()
    }

    pub fn is_configured(&self) -> bool {
        !self.registry.is_empty()
    }

    /// Complete a system + user exchange with the first provider that succeeds.
    pub async fn complete(
        &self,
        system: &str,
        user: &str,
    ) -> Result<Resolution, ResolveError> {
        let request = ProviderRequest::new(system, user).with_temperature(self.temperature);
        self.resolve(request).await
    }

    pub async fn resolve(&self, request: ProviderRequest) -> Result<Resolution, ResolveError> {
        if self.registry.is_empty() {
            warn!("No AI provider configured");
            return Err(ResolveError::Unconfigured);
        }

        let total = self.registry.len();
        let mut attempts = Vec::new();

        for (i, (kind, provider)) in self.registry.entries().iter().enumerate() {
            info!(
                provider = %kind,
                attempt = i + 1,
                total,
                "Resolver: trying provider"
            );

            let call = provider.complete(request.clone());
            let outcome = match self.timeout {
                Some(limit) => match tokio::time::timeout(limit, call).await {
                    Ok(result) => result,
                    Err(_) => Err(ProviderError::Timeout(format!(
                        "Provider '{kind}' timed out after {}s",
                        limit.as_secs()
                    ))),
                },
                None => call.await,
            };

            match outcome {
                Ok(response) => {
                    info!(provider = %kind, model = %response.model, "Resolver: provider succeeded");
                    return Ok(Resolution {
                        provider: *kind,
                        model: response.model,
                        text: response.message.content,
                        usage: response.usage,
                    });
                }
                Err(e) => {
                    warn!(
                        provider = %kind,
                        error = %e,
                        "Resolver: provider failed, trying next"
                    );
                    attempts.push(ProviderAttempt {
                        provider: kind.to_string(),
                        error: e,
                    });
                }
            }
        }

        Err(ResolveError::ProviderFailure { attempts })
    }

    /// Health of every registered provider, in order.
    pub async fn health(&self) -> Vec<(ProviderKind, Result<bool, ProviderError>)> {
        let mut report = Vec::with_capacity(self.registry.len());
        for (kind, provider) in self.registry.entries() {
            report.push((*kind, provider.health_check().await));
        }
        report
    }
}
