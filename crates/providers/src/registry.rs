//! Provider registry: which backends exist, in which order.
//!
//! Built once at startup from configuration and never mutated afterwards.
//! A provider is registered only when its API key is present.

use crate::anthropic::AnthropicProvider;
use crate::gemini::GeminiProvider;
use crate::openai::OpenAiProvider;
use brandbot_config::{ProviderConfig, ProvidersConfig};
use brandbot_core::provider::{ImageGenerator, Provider, ProviderKind};
use std::sync::Arc;
use tracing::{debug, info};

/// Ordered set of provider clients.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    entries: Vec<(ProviderKind, Arc<dyn Provider>)>,
    images: Option<Arc<dyn ImageGenerator>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a provider. Later registrations of the same kind are ignored.
    pub fn register(&mut self, kind: ProviderKind, provider: Arc<dyn Provider>) {
        if self.get(kind).is_some() {
            debug!(provider = %kind, "Provider already registered, ignoring");
            return;
        }
        self.entries.push((kind, provider));
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, kind: ProviderKind, provider: Arc<dyn Provider>) -> Self {
        self.register(kind, provider);
        self
    }

    pub fn with_images(mut self, images: Arc<dyn ImageGenerator>) -> Self {
        self.images = Some(images);
        self
    }

    pub fn get(&self, kind: ProviderKind) -> Option<Arc<dyn Provider>> {
        self.entries
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, p)| Arc::clone(p))
    }

    /// Registered providers in resolution order.
    pub fn entries(&self) -> &[(ProviderKind, Arc<dyn Provider>)] {
        &self.entries
    }

    pub fn kinds(&self) -> Vec<ProviderKind> {
        self.entries.iter().map(|(k, _)| *k).collect()
    }

    pub fn images(&self) -> Option<Arc<dyn ImageGenerator>> {
        self.images.clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.kinds())
            .field("images", &self.images.is_some())
            .finish()
    }
}

/// Build the registry from configuration, following `config.order`.
pub fn build_from_config(config: &ProvidersConfig) -> ProviderRegistry {
    let mut registry = ProviderRegistry::new();

    for kind in &config.order {
        let settings = config.get(*kind);
        let Some(api_key) = settings.api_key.as_deref().filter(|k| !k.trim().is_empty()) else {
            debug!(provider = %kind, "No API key, skipping");
            continue;
        };

        let provider: Arc<dyn Provider> = match kind {
            ProviderKind::Gemini => Arc::new(gemini(api_key, settings)),
            ProviderKind::OpenAi => Arc::new(openai(api_key, settings)),
            ProviderKind::Anthropic => Arc::new(anthropic(api_key, settings)),
        };
        registry.register(*kind, provider);
    }

    // Image generation uses the OpenAI Images API regardless of order.
    if let Some(api_key) = config.openai.api_key.as_deref().filter(|k| !k.trim().is_empty()) {
        registry.images = Some(Arc::new(openai(api_key, &config.openai)));
    }

    info!(providers = ?registry.kinds(), "Provider registry built");
    registry
}

fn gemini(api_key: &str, settings: &ProviderConfig) -> GeminiProvider {
    let mut p = GeminiProvider::new(api_key);
    if let Some(url) = &settings.api_url {
        p = p.with_base_url(url);
    }
    if let Some(model) = &settings.model {
        p = p.with_model(model);
    }
    p
}

fn openai(api_key: &str, settings: &ProviderConfig) -> OpenAiProvider {
    let mut p = OpenAiProvider::new(api_key);
    if let Some(url) = &settings.api_url {
        p = p.with_base_url(url);
    }
    if let Some(model) = &settings.model {
        p = p.with_model(model);
    }
    p
}

fn anthropic(api_key: &str, settings: &ProviderConfig) -> AnthropicProvider {
    let mut p = AnthropicProvider::new(api_key);
    if let Some(url) = &settings.api_url {
        p = p.with_base_url(url);
    }
    if let Some(model) = &settings.model {
        p = p.with_model(model);
    }
    if let Some(max_tokens) = settings.max_tokens {
        p = p.with_max_tokens(max_tokens);
    }
    p
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keyed(key: &str) -> ProviderConfig {
        ProviderConfig {
            api_key: Some(key.into()),
            ..ProviderConfig::default()
        }
    }

    #[test]
    fn empty_config_builds_empty_registry() {
        let registry = build_from_config(&ProvidersConfig::default());
        assert!(registry.is_empty());
        assert!(registry.images().is_none());
    }

    #[test]
    fn only_keyed_providers_are_registered() {
        let config = ProvidersConfig {
            openai: keyed("sk-openai"),
            anthropic: keyed("sk-ant"),
            ..ProvidersConfig::default()
        };
        let registry = build_from_config(&config);
        assert_eq!(
            registry.kinds(),
            vec![ProviderKind::OpenAi, ProviderKind::Anthropic]
        );
        assert!(registry.get(ProviderKind::Gemini).is_none());
        assert!(registry.images().is_some());
    }

    #[test]
    fn custom_order_is_followed() {
        let config = ProvidersConfig {
            order: vec![ProviderKind::Anthropic, ProviderKind::Gemini],
            gemini: keyed("g"),
            openai: keyed("o"),
            anthropic: keyed("a"),
            ..ProvidersConfig::default()
        };
        let registry = build_from_config(&config);
        // OpenAI has a key but is not in the order
        assert_eq!(
            registry.kinds(),
            vec![ProviderKind::Anthropic, ProviderKind::Gemini]
        );
        assert_eq!(registry.get(ProviderKind::Anthropic).unwrap().name(), "anthropic");
    }

    #[test]
    fn blank_key_is_not_configured() {
        let config = ProvidersConfig {
            gemini: keyed("  "),
            ..ProvidersConfig::default()
        };
        assert!(build_from_config(&config).is_empty());
    }
}
