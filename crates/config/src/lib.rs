//! Configuration loading, validation, and management for brandbot.
//!
//! Loads configuration from `~/.brandbot/config.toml` (or an explicit path)
//! and then applies environment variable overrides. The environment wins, so
//! a bare `.env` with `DISCORD_BOT_TOKEN` and one provider key is a complete
//! setup. Validates all settings at startup.

use brandbot_core::brand::{self, BrandConfig, parse_hex_color};
use brandbot_core::knowledge::CompanyInfo;
use brandbot_core::provider::ProviderKind;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Discord's hard limit for an embed field value.
pub const DISCORD_FIELD_LIMIT: usize = 1024;

/// Discord's hard limit for fields per embed.
pub const DISCORD_MAX_FIELDS: usize = 25;

/// The root configuration structure.
///
/// Maps directly to `~/.brandbot/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Discord connection settings
    #[serde(default)]
    pub discord: DiscordConfig,

    /// Brand identity (colors are hex strings, parsed leniently)
    #[serde(default)]
    pub brand: BrandSettings,

    /// Static company facts searched with the knowledge base
    #[serde(default)]
    pub company: CompanyInfo,

    /// LLM providers and their fallback order
    #[serde(default)]
    pub providers: ProvidersConfig,

    /// Knowledge base storage and search
    #[serde(default)]
    pub knowledge: KnowledgeConfig,

    /// Embed layout limits
    #[serde(default)]
    pub presentation: PresentationConfig,
}

/// Redact a secret for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct DiscordConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bot_token: Option<String>,

    /// Register commands to this guild only (instant) instead of globally.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<u64>,

    /// Text of the "Watching ..." presence.
    #[serde(default = "default_status_text")]
    pub status_text: String,
}

fn default_status_text() -> String {
    "for brand creation requests".into()
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            guild_id: None,
            status_text: default_status_text(),
        }
    }
}

impl std::fmt::Debug for DiscordConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordConfig")
            .field("bot_token", &redact(&self.bot_token))
            .field("guild_id", &self.guild_id)
            .field("status_text", &self.status_text)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandSettings {
    #[serde(default = "default_brand_name")]
    pub name: String,

    #[serde(default = "default_primary_color")]
    pub primary_color: String,

    #[serde(default = "default_secondary_color")]
    pub secondary_color: String,

    #[serde(default = "default_accent_color")]
    pub accent_color: String,

    #[serde(default = "default_style_guidelines")]
    pub style_guidelines: String,

    #[serde(default = "default_voice_tone")]
    pub voice_tone: String,
}

fn default_brand_name() -> String {
    brand::DEFAULT_BRAND_NAME.into()
}
fn default_primary_color() -> String {
    format!("#{:06x}", brand::DEFAULT_PRIMARY_COLOR)
}
fn default_secondary_color() -> String {
    format!("#{:06x}", brand::DEFAULT_SECONDARY_COLOR)
}
fn default_accent_color() -> String {
    format!("#{:06x}", brand::DEFAULT_ACCENT_COLOR)
}
fn default_style_guidelines() -> String {
    brand::DEFAULT_STYLE_GUIDELINES.into()
}
fn default_voice_tone() -> String {
    brand::DEFAULT_VOICE_TONE.into()
}

impl Default for BrandSettings {
    fn default() -> Self {
        Self {
            name: default_brand_name(),
            primary_color: default_primary_color(),
            secondary_color: default_secondary_color(),
            accent_color: default_accent_color(),
            style_guidelines: default_style_guidelines(),
            voice_tone: default_voice_tone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvidersConfig {
    /// Fallback order; the first configured provider that succeeds wins.
    #[serde(default = "default_order")]
    pub order: Vec<ProviderKind>,

    /// Per-provider call timeout in seconds (0 = no timeout).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default)]
    pub gemini: ProviderConfig,

    #[serde(default)]
    pub openai: ProviderConfig,

    #[serde(default)]
    pub anthropic: ProviderConfig,
}

fn default_order() -> Vec<ProviderKind> {
    ProviderKind::DEFAULT_ORDER.to_vec()
}
fn default_timeout_secs() -> u64 {
    120
}
fn default_temperature() -> f32 {
    0.7
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            order: default_order(),
            timeout_secs: default_timeout_secs(),
            temperature: default_temperature(),
            gemini: ProviderConfig::default(),
            openai: ProviderConfig::default(),
            anthropic: ProviderConfig::default(),
        }
    }
}

impl ProvidersConfig {
    pub fn get(&self, kind: ProviderKind) -> &ProviderConfig {
        match kind {
            ProviderKind::Gemini => &self.gemini,
            ProviderKind::OpenAi => &self.openai,
            ProviderKind::Anthropic => &self.anthropic,
        }
    }

    fn get_mut(&mut self, kind: ProviderKind) -> &mut ProviderConfig {
        match kind {
            ProviderKind::Gemini => &mut self.gemini,
            ProviderKind::OpenAi => &mut self.openai,
            ProviderKind::Anthropic => &mut self.anthropic,
        }
    }

    /// Providers in fallback order that have an API key.
    pub fn configured(&self) -> Vec<ProviderKind> {
        self.order
            .iter()
            .copied()
            .filter(|kind| self.get(*kind).is_configured())
            .collect()
    }
}

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL override (proxies, compatible endpoints, tests)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl ProviderConfig {
    pub fn is_configured(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeConfig {
    /// JSON file holding the knowledge base. Defaults to `~/.brandbot/knowledge.json`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Persist to disk; when false the base lives in memory only.
    #[serde(default = "default_true")]
    pub persist: bool,

    /// Maximum snippets merged into a prompt.
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Characters kept from each snippet.
    #[serde(default = "default_snippet_chars")]
    pub snippet_chars: usize,

    /// Timeout for `learn_url` fetches.
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
}

fn default_true() -> bool {
    true
}
fn default_max_results() -> usize {
    3
}
fn default_snippet_chars() -> usize {
    200
}
fn default_fetch_timeout_secs() -> u64 {
    30
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            path: None,
            persist: true,
            max_results: default_max_results(),
            snippet_chars: default_snippet_chars(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
        }
    }
}

impl KnowledgeConfig {
    pub fn resolved_path(&self) -> PathBuf {
        self.path
            .clone()
            .unwrap_or_else(|| AppConfig::config_dir().join("knowledge.json"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresentationConfig {
    /// Maximum characters per embed field.
    #[serde(default = "default_field_limit")]
    pub field_limit: usize,

    /// Maximum continuation fields before the full text is attached as a file.
    #[serde(default = "default_max_fields")]
    pub max_fields: usize,
}

fn default_field_limit() -> usize {
    DISCORD_FIELD_LIMIT
}
fn default_max_fields() -> usize {
    3
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            field_limit: default_field_limit(),
            max_fields: default_max_fields(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.brandbot/config.toml),
    /// then apply process environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(None)
    }

    /// Load from an explicit path (or the default one), then apply the
    /// process environment.
    pub fn load_with(path: Option<&Path>) -> Result<Self, ConfigError> {
        let default_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(path.unwrap_or(&default_path))?;
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides using `lookup` (the process environment in
    /// production, a map in tests). Empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(token) = get("DISCORD_BOT_TOKEN") {
            self.discord.bot_token = Some(token);
        }
        if let Some(guild) = get("DISCORD_GUILD_ID") {
            match guild.trim().parse() {
                Ok(id) => self.discord.guild_id = Some(id),
                Err(_) => tracing::warn!(value = %guild, "Ignoring invalid DISCORD_GUILD_ID"),
            }
        }

        if let Some(name) = get("BRAND_NAME") {
            self.brand.name = name;
        }
        if let Some(color) = get("BRAND_PRIMARY_COLOR") {
            self.brand.primary_color = color;
        }
        if let Some(color) = get("BRAND_SECONDARY_COLOR") {
            self.brand.secondary_color = color;
        }
        if let Some(color) = get("BRAND_ACCENT_COLOR") {
            self.brand.accent_color = color;
        }

        for kind in ProviderKind::DEFAULT_ORDER {
            if let Some(key) = get(kind.api_key_env()) {
                self.providers.get_mut(kind).api_key = Some(key);
            }
        }

        if let Some(order) = get("BRANDBOT_PROVIDER_ORDER") {
            match parse_order(&order) {
                Ok(parsed) => self.providers.order = parsed,
                Err(e) => tracing::warn!(value = %order, error = %e, "Ignoring invalid BRANDBOT_PROVIDER_ORDER"),
            }
        }

        if let Some(path) = get("BRANDBOT_KNOWLEDGE_PATH") {
            self.knowledge.path = Some(PathBuf::from(path));
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".brandbot")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.providers.temperature < 0.0 || self.providers.temperature > 2.0 {
            return Err(ConfigError::ValidationError(
                "providers.temperature must be between 0.0 and 2.0".into(),
            ));
        }

        let mut seen = Vec::new();
        for kind in &self.providers.order {
            if seen.contains(kind) {
                return Err(ConfigError::ValidationError(format!(
                    "providers.order lists '{kind}' more than once"
                )));
            }
            seen.push(*kind);
        }

        if self.presentation.field_limit == 0 || self.presentation.field_limit > DISCORD_FIELD_LIMIT {
            return Err(ConfigError::ValidationError(format!(
                "presentation.field_limit must be between 1 and {DISCORD_FIELD_LIMIT}"
            )));
        }

        // Commands add up to three extra fields (hashtags, next steps, ...).
        if self.presentation.max_fields == 0 || self.presentation.max_fields > DISCORD_MAX_FIELDS - 3 {
            return Err(ConfigError::ValidationError(format!(
                "presentation.max_fields must be between 1 and {}",
                DISCORD_MAX_FIELDS - 3
            )));
        }

        if self.knowledge.max_results == 0 {
            return Err(ConfigError::ValidationError(
                "knowledge.max_results must be > 0".into(),
            ));
        }

        Ok(())
    }

    /// The parsed, immutable brand record.
    pub fn brand(&self) -> BrandConfig {
        BrandConfig {
            name: self.brand.name.clone(),
            primary_color: parse_hex_color(&self.brand.primary_color, brand::DEFAULT_PRIMARY_COLOR),
            secondary_color: parse_hex_color(
                &self.brand.secondary_color,
                brand::DEFAULT_SECONDARY_COLOR,
            ),
            accent_color: parse_hex_color(&self.brand.accent_color, brand::DEFAULT_ACCENT_COLOR),
            style_guidelines: self.brand.style_guidelines.clone(),
            voice_tone: self.brand.voice_tone.clone(),
        }
    }

    /// The Discord token, required to connect.
    pub fn discord_token(&self) -> Result<&str, ConfigError> {
        self.discord
            .bot_token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .ok_or(ConfigError::MissingToken("DISCORD_BOT_TOKEN"))
    }

    /// Generate a default config TOML string (for `init`).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

/// Parse a comma-separated provider list such as `anthropic, openai`.
pub fn parse_order(raw: &str) -> Result<Vec<ProviderKind>, String> {
    let order = raw
        .split(',')
        .filter(|s| !s.trim().is_empty())
        .map(str::parse)
        .collect::<Result<Vec<ProviderKind>, String>>()?;

    if order.is_empty() {
        return Err("provider order is empty".into());
    }
    Ok(order)
}

#[cfg(target_os = "windows")]
const HOME_VAR: &str = "USERPROFILE";
#[cfg(target_os = "windows")]
const FALLBACK_HOME: &str = "C:\\Users\\Default";
#[cfg(not(target_os = "windows"))]
const HOME_VAR: &str = "HOME";
#[cfg(not(target_os = "windows"))]
const FALLBACK_HOME: &str = "/tmp";

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    home_or_fallback(std::env::var(HOME_VAR).ok())
}

fn home_or_fallback(home: Option<String>) -> PathBuf {
    match home.filter(|h| !h.trim().is_empty()) {
        Some(home) => PathBuf::from(home),
        None => {
            tracing::warn!(
                var = HOME_VAR,
                fallback = FALLBACK_HOME,
                "Home directory is not set; config and knowledge files fall back to a shared directory"
            );
            PathBuf::from(FALLBACK_HOME)
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    #[error("{0} is not set")]
    MissingToken(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.providers.order, ProviderKind::DEFAULT_ORDER.to_vec());
        assert_eq!(config.presentation.field_limit, 1024);
        assert_eq!(config.knowledge.max_results, 3);
        assert!(config.providers.configured().is_empty());
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.brand.name, config.brand.name);
        assert_eq!(parsed.providers.order, config.providers.order);
    }

    #[test]
    fn env_overrides_keys_and_brand() {
        let mut config = AppConfig::default();
        config.apply_env(env(&[
            ("DISCORD_BOT_TOKEN", "discord-token"),
            ("OPENAI_API_KEY", "sk-openai"),
            ("ANTHROPIC_API_KEY", "sk-ant"),
            ("GEMINI_API_KEY", "   "),
            ("BRAND_NAME", "Acme"),
            ("BRAND_PRIMARY_COLOR", "#00ff00"),
            ("BRAND_ACCENT_COLOR", "garbage"),
        ]));

        assert_eq!(config.discord_token().unwrap(), "discord-token");
        assert_eq!(
            config.providers.configured(),
            vec![ProviderKind::OpenAi, ProviderKind::Anthropic]
        );

        let brand = config.brand();
        assert_eq!(brand.name, "Acme");
        assert_eq!(brand.primary_color, 0x00ff00);
        assert_eq!(brand.accent_color, brand::DEFAULT_ACCENT_COLOR);
    }

    #[test]
    fn env_overrides_provider_order() {
        let mut config = AppConfig::default();
        config.apply_env(env(&[("BRANDBOT_PROVIDER_ORDER", "anthropic, gemini")]));
        assert_eq!(
            config.providers.order,
            vec![ProviderKind::Anthropic, ProviderKind::Gemini]
        );

        // An invalid list leaves the previous order in place
        config.apply_env(env(&[("BRANDBOT_PROVIDER_ORDER", "anthropic,mistral")]));
        assert_eq!(
            config.providers.order,
            vec![ProviderKind::Anthropic, ProviderKind::Gemini]
        );
    }

    #[test]
    fn missing_token_is_an_error() {
        let config = AppConfig::default();
        let err = config.discord_token().unwrap_err();
        assert!(err.to_string().contains("DISCORD_BOT_TOKEN"));
    }

    #[test]
    fn duplicate_order_rejected() {
        let mut config = AppConfig::default();
        config.providers.order = vec![ProviderKind::OpenAi, ProviderKind::OpenAi];
        assert!(config.validate().is_err());
    }

    #[test]
    fn oversized_field_limit_rejected() {
        let mut config = AppConfig::default();
        config.presentation.field_limit = 2048;
        assert!(config.validate().is_err());
    }

    #[test]
    fn invalid_temperature_rejected() {
        let mut config = AppConfig::default();
        config.providers.temperature = 5.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let result = AppConfig::load_from(Path::new("/nonexistent/brandbot.toml"));
        assert!(result.is_ok());
        assert_eq!(result.unwrap().brand.name, brand::DEFAULT_BRAND_NAME);
    }

    #[test]
    fn home_falls_back_when_unset() {
        assert_eq!(home_or_fallback(Some("/home/ada".into())), PathBuf::from("/home/ada"));
        assert_eq!(home_or_fallback(None), PathBuf::from(FALLBACK_HOME));
        assert_eq!(home_or_fallback(Some("  ".into())), PathBuf::from(FALLBACK_HOME));
    }

    #[test]
    fn loads_file_sections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r##"
[brand]
name = "Acme Studio"
primary_color = "#112233"

[company]
name = "Acme"
services = ["Design", "Staffing"]

[providers]
order = ["openai", "anthropic"]
timeout_secs = 30

[providers.openai]
model = "gpt-4o-mini"

[presentation]
max_fields = 2
"##,
        )
        .unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.brand.name, "Acme Studio");
        assert_eq!(config.brand().primary_color, 0x112233);
        assert_eq!(config.company.services.len(), 2);
        assert_eq!(
            config.providers.order,
            vec![ProviderKind::OpenAi, ProviderKind::Anthropic]
        );
        assert_eq!(config.providers.openai.model.as_deref(), Some("gpt-4o-mini"));
        assert_eq!(config.presentation.max_fields, 2);
        assert_eq!(config.presentation.field_limit, 1024);
    }

    #[test]
    fn malformed_file_reports_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[providers\norder = 3").unwrap();
        match AppConfig::load_from(&path) {
            Err(ConfigError::ParseError { .. }) => {}
            other => panic!("Expected ParseError, got: {other:?}"),
        }
    }

    #[test]
    fn debug_redacts_secrets() {
        let mut config = AppConfig::default();
        config.apply_env(env(&[
            ("DISCORD_BOT_TOKEN", "super-secret-token"),
            ("OPENAI_API_KEY", "sk-very-secret"),
        ]));
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret-token"));
        assert!(!debug.contains("sk-very-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn default_toml_generation() {
        let toml_str = AppConfig::default_toml();
        assert!(toml_str.contains("[brand]"));
        assert!(toml_str.contains("gemini"));
    }
}
