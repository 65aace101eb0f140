//! Show resolved configuration and log state.

use anyhow::Result;
use campus_activity_client::ClientConfig;
use std::path::Path;

use super::logs;

/// Run the status command.
pub async fn run(config: &ClientConfig, data_dir: &Path) -> Result<()> {
    println!("=== activity-cli status ===");
    println!();

    println!("Paths:");
    println!("  Data dir:     {}", data_dir.display());
    println!("  Log document: {}", config.logs.document.display());
    println!("  Export dir:   {}", config.logs.export_dir.display());
    println!();

    if !config.logs.document.exists() {
        println!("Audit log: NOT CREATED");
        println!();
        println!("Run 'activity-cli logs add <message>' to start one.");
        return Ok(());
    }

    let store = logs::open(config).await;
    let entries = store.entries().await;
    println!("Audit log:");
    println!("  Entries:  {}", entries.len());
    println!(
        "  Dev mode: {}",
        if store.dev_mode().await { "on" } else { "off" }
    );
    if let Some(last) = entries.last() {
        println!("  Last:     {last}");
    }

    println!();
    println!("Cache:");
    println!("  Preview:  {} chars", config.cache.preview_chars);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn status_without_log() {
        let dir = tempdir().unwrap();
        let config = ClientConfig::default().with_data_dir(dir.path());

        // Should succeed but show "not created"
        let result = run(&config, dir.path()).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn status_with_log() {
        let dir = tempdir().unwrap();
        let config = ClientConfig::default().with_data_dir(dir.path());
        logs::add(&config, "hello").await.unwrap();

        let result = run(&config, dir.path()).await;
        assert!(result.is_ok());
    }
}
