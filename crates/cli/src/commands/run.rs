//! `brandbot run`: serve slash commands on Discord.

use super::{build_router, load_config};
use anyhow::Context;
use std::path::Path;
use tracing::{info, warn};

pub async fn run(config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let token = config
        .discord_token()
        .context("Cannot connect to Discord")?
        .to_string();

    let router = build_router(&config);
    let order = router.context().resolver.order();
    if order.is_empty() {
        warn!("No AI provider configured; agent commands will fail until an API key is set");
    } else {
        let names: Vec<&str> = order.iter().map(|k| k.as_str()).collect();
        info!(providers = %names.join(" -> "), "Provider fallback order");
    }
    info!(brand = %router.context().brand.name, "Starting brandbot");

    brandbot_channels::run(router, &token, &config.discord)
        .await
        .context("Discord client stopped")
}
