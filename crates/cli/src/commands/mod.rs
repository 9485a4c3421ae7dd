pub mod ask;
pub mod doctor;
pub mod init;
pub mod knowledge;
pub mod providers;
pub mod run;

use anyhow::Context;
use brandbot_agent::{BotContext, CommandRouter};
use brandbot_config::AppConfig;
use std::path::Path;
use std::sync::Arc;

pub(crate) fn load_config(path: Option<&Path>) -> anyhow::Result<AppConfig> {
    AppConfig::load_with(path).context("Failed to load config")
}

pub(crate) fn build_router(config: &AppConfig) -> CommandRouter {
    CommandRouter::new(Arc::new(BotContext::from_config(config)))
}
