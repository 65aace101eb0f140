//! Audit log commands.

use anyhow::{Context, Result};
use campus_activity_client::{ClientConfig, JsonFileDocument, LogStore};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Open the configured log document and load it.
pub async fn open(config: &ClientConfig) -> LogStore {
    let document = Arc::new(JsonFileDocument::new(&config.logs.document));
    let store = LogStore::new(document).with_export_prefix(&config.logs.export_prefix);
    store.load().await;
    store
}

/// Print the audit lines, optionally only the last `tail`.
pub async fn show(config: &ClientConfig, tail: Option<usize>) -> Result<()> {
    let entries = open(config).await.entries().await;
    if entries.is_empty() {
        println!("Audit log is empty.");
        return Ok(());
    }

    let skip = tail.map_or(0, |n| entries.len().saturating_sub(n));
    for entry in &entries[skip..] {
        println!("{entry}");
    }
    Ok(())
}

/// Append a line.
pub async fn add(config: &ClientConfig, message: &str) -> Result<()> {
    if message.trim().is_empty() {
        anyhow::bail!("Message must not be empty");
    }
    open(config).await.add(message).await;
    Ok(())
}

/// Drop every line.
pub async fn clear(config: &ClientConfig) -> Result<()> {
    open(config).await.clear().await;
    println!("Audit log cleared.");
    Ok(())
}

/// Export the log into `dir`, returning the written file.
pub async fn export(config: &ClientConfig, dir: &Path) -> Result<PathBuf> {
    open(config)
        .await
        .export_to_file(dir)
        .await
        .context("Failed to export audit log")
}

/// Turn developer mode on.
pub async fn dev_mode(config: &ClientConfig) -> Result<()> {
    let store = open(config).await;
    if store.dev_mode().await {
        println!("Developer mode already enabled.");
        return Ok(());
    }
    store.enable_dev_mode().await;
    println!("Developer mode enabled.");
    Ok(())
}
