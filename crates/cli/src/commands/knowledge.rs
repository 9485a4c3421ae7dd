//! `brandbot knowledge`: the knowledge commands without Discord.

use super::{build_router, load_config};
use brandbot_agent::{Args, Invocation};
use std::path::Path;

pub async fn status(config_path: Option<&Path>) -> anyhow::Result<()> {
    dispatch(config_path, Invocation::new("knowledge_status", Args::new())).await
}

pub async fn add(config_path: Option<&Path>, title: &str, content: &str) -> anyhow::Result<()> {
    let args = Args::new().with("title", title).with("content", content);
    dispatch(config_path, Invocation::new("add_info", args)).await
}

pub async fn learn_url(config_path: Option<&Path>, url: &str) -> anyhow::Result<()> {
    dispatch(config_path, Invocation::new("learn_url", Args::new().with("url", url))).await
}

async fn dispatch(config_path: Option<&Path>, invocation: Invocation) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    if let Some(path) = config.knowledge.persist.then(|| config.knowledge.resolved_path()) {
        println!("Knowledge file: {}\n", path.display());
    }
    let reply = build_router(&config).dispatch(invocation).await?;
    println!("{}", reply.to_plain_text());
    Ok(())
}
