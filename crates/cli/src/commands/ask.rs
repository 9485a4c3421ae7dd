//! `brandbot ask`: run one slash command in the terminal.

use super::{build_router, load_config};
use anyhow::{Context, bail};
use brandbot_agent::{Args, Invocation};
use std::path::{Path, PathBuf};

pub async fn run(
    config_path: Option<&Path>,
    command: &str,
    options: &[String],
    file: Option<PathBuf>,
    out: Option<PathBuf>,
) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let router = build_router(&config);

    let mut invocation = Invocation::new(command, parse_options(options)?);
    if let Some(path) = file {
        let bytes = std::fs::read(&path).with_context(|| format!("Failed to read {}", path.display()))?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".into());
        invocation = invocation.with_upload(filename, bytes);
    }

    let reply = router.dispatch(invocation).await?;
    println!("{}", reply.to_plain_text());

    if let (Some(dir), Some(file)) = (out, &reply.attachment) {
        std::fs::create_dir_all(&dir)?;
        let path = dir.join(&file.filename);
        std::fs::write(&path, &file.content)?;
        println!("Saved {}", path.display());
    }
    Ok(())
}

/// `name=value` pairs into command options.
pub(crate) fn parse_options(options: &[String]) -> anyhow::Result<Args> {
    let mut args = Args::new();
    for option in options {
        let Some((name, value)) = option.split_once('=') else {
            bail!("Expected NAME=VALUE, got '{option}'");
        };
        args.insert(name.trim(), value);
    }
    Ok(args)
}
