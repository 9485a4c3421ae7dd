//! `brandbot providers`: show the fallback order.

use super::{build_router, load_config};
use brandbot_core::provider::ProviderKind;
use std::path::Path;

pub async fn run(config_path: Option<&Path>, check: bool) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    println!("🤖 AI Providers (fallback order)");
    println!("================================\n");
    for (i, kind) in config.providers.order.iter().enumerate() {
        let provider = config.providers.get(*kind);
        let status = if provider.is_configured() {
            "✅ key set"
        } else {
            "⚪ no key, skipped"
        };
        let model = provider.model.as_deref().unwrap_or(default_model(*kind));
        println!("  {}. {:<10} {:<28} {status}", i + 1, kind.as_str(), model);
    }
    println!(
        "\n  Override the order with BRANDBOT_PROVIDER_ORDER (e.g. anthropic,openai)\n  \
         or [providers] order in the config file."
    );

    if check {
        let router = build_router(&config);
        println!("\n  Health checks:");
        for (kind, result) in router.context().resolver.health().await {
            match result {
                Ok(true) => println!("    ✅ {kind}"),
                Ok(false) => println!("    ⚠️  {kind}: unhealthy"),
                Err(e) => println!("    ❌ {kind}: {e}"),
            }
        }
    }
    Ok(())
}

fn default_model(kind: ProviderKind) -> &'static str {
    match kind {
        ProviderKind::Gemini => brandbot_providers::gemini::DEFAULT_MODEL,
        ProviderKind::OpenAi => brandbot_providers::openai::DEFAULT_MODEL,
        ProviderKind::Anthropic => brandbot_providers::anthropic::DEFAULT_MODEL,
    }
}
