//! `brandbot doctor`: diagnose configuration.

use brandbot_config::AppConfig;
use std::path::Path;

pub async fn run(config_path: Option<&Path>) -> anyhow::Result<()> {
    println!("🩺 brandbot Doctor: Configuration Diagnostics");
    println!("=============================================\n");

    let mut issues = 0;

    let default_path = AppConfig::config_dir().join("config.toml");
    let path = config_path.unwrap_or(&default_path);
    if path.exists() {
        println!("  ✅ Config file found: {}", path.display());
    } else {
        println!("  ⚪ No config file at {} (defaults + environment)", path.display());
    }

    let config = match AppConfig::load_with(config_path) {
        Ok(config) => {
            println!("  ✅ Config valid");
            config
        }
        Err(e) => {
            println!("  ❌ Config invalid: {e}");
            println!("\n  ⚠️  Fix the config file and run doctor again.");
            return Ok(());
        }
    };

    match config.discord_token() {
        Ok(_) => println!("  ✅ Discord token set"),
        Err(e) => {
            println!("  ❌ {e}");
            issues += 1;
        }
    }
    match config.discord.guild_id {
        Some(id) => println!("  ✅ Commands register to guild {id}"),
        None => println!("  ⚪ Commands register globally (set DISCORD_GUILD_ID for instant updates)"),
    }

    let configured = config.providers.configured();
    if configured.is_empty() {
        println!("  ❌ No AI provider key: set GEMINI_API_KEY, OPENAI_API_KEY or ANTHROPIC_API_KEY");
        issues += 1;
    } else {
        let names: Vec<&str> = configured.iter().map(|k| k.as_str()).collect();
        println!("  ✅ AI providers: {}", names.join(" -> "));
    }
    if config.providers.openai.is_configured() {
        println!("  ✅ Image generation available");
    } else {
        println!("  ⚪ Image generation unavailable (needs OPENAI_API_KEY)");
    }

    if config.knowledge.persist {
        let kb_path = config.knowledge.resolved_path();
        let dir_ok = kb_path
            .parent()
            .is_some_and(|dir| dir.exists() || std::fs::create_dir_all(dir).is_ok());
        if dir_ok {
            println!("  ✅ Knowledge file: {}", kb_path.display());
        } else {
            println!("  ❌ Cannot create directory for {}", kb_path.display());
            issues += 1;
        }
    } else {
        println!("  ⚪ Knowledge base is in-memory only");
    }

    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
