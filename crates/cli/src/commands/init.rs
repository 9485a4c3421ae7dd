//! `brandbot init`: write a default config file.

use anyhow::{Context, bail};
use brandbot_config::AppConfig;
use std::path::Path;

pub fn run(config_path: Option<&Path>, force: bool) -> anyhow::Result<()> {
    let default_path = AppConfig::config_dir().join("config.toml");
    let path = config_path.unwrap_or(&default_path);

    println!("🎨 brandbot Setup");
    println!("=================\n");

    if path.exists() && !force {
        bail!(
            "Config already exists at {} (use --force to overwrite)",
            path.display()
        );
    }
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    std::fs::write(path, AppConfig::default_toml())
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("✅ Created {}", path.display());
    println!("\n📝 Next steps:");
    println!("   1. Put DISCORD_BOT_TOKEN and at least one AI key in .env or your environment");
    println!("   2. Adjust [brand] and [company] in {}", path.display());
    println!("   3. Run: brandbot doctor");
    println!("   4. Run: brandbot run\n");
    Ok(())
}
