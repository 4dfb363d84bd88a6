//! Subcommand handlers for Zapper.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use zapper_config::Config;
use zapper_core::{LocalTabs, SelectorGenerator, ZapAgent};
use zapper_dom::{Document, PageSnapshot};
use zapper_protocols::{PageKey, TabTransport, ZapMessage, ZapStore};
use zapper_store::open_store;

use crate::cli::Commands;

/// Tab id the CLI attaches its single page under.
const CLI_TAB: u64 = 1;

/// Handle a subcommand.
pub(crate) async fn handle_command(
    command: Commands,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Selector { page, x, y } => selector(&page, x, y, config),
        Commands::Zap { page, x, y, out } => zap(&page, x, y, out.as_deref(), config).await,
        Commands::Restore { page, out } => restore(&page, out.as_deref(), config).await,
        Commands::List { url } => list(url.as_deref(), config).await,
        Commands::Message { page, json, out } => {
            message(&page, &json, out.as_deref(), config).await
        }
    }
}

/// Load a page snapshot into a live document.
pub(crate) fn load_page(path: &Path) -> anyhow::Result<Document> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read page {}", path.display()))?;
    let snapshot: PageSnapshot = serde_json::from_str(&content)
        .with_context(|| format!("Invalid page snapshot {}", path.display()))?;
    Document::from_snapshot(&snapshot).context("Failed to build document")
}

/// Write the document back out as a snapshot.
pub(crate) fn write_page(doc: &Document, path: &Path) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(&doc.to_snapshot())?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Page written to {}", path.display());
    Ok(())
}

async fn load_agent(page: &Path, config: &Config) -> Result<ZapAgent, Box<dyn std::error::Error>> {
    let doc = load_page(page)?;
    let store = open_store(&config.storage).await?;
    let mut agent = ZapAgent::new(doc, store, config);
    agent.init().await?;
    agent.dom_content_loaded().await?;
    Ok(agent)
}

/// Let pending zaps finish and their records land.
async fn finish(agent: &mut ZapAgent, config: &Config) {
    agent.advance(config.zap.transition_ms);
    let failed = agent.settle().await;
    if failed > 0 {
        warn!("{} zap record(s) could not be saved", failed);
    }
}

fn selector(
    page: &Path,
    x: f64,
    y: f64,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = load_page(page)?;
    let element = doc
        .element_from_point(x, y)
        .ok_or_else(|| format!("No element at ({}, {})", x, y))?;
    let generator = SelectorGenerator::new(&config.selector);
    println!("{}", generator.generate(&doc, element));
    Ok(())
}

async fn zap(
    page: &Path,
    x: f64,
    y: f64,
    out: Option<&Path>,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut agent = load_agent(page, config).await?;
    let element = agent
        .document()
        .element_from_point(x, y)
        .ok_or_else(|| format!("No element at ({}, {})", x, y))?;
    let selector = agent
        .zap(element)
        .ok_or_else(|| format!("Nothing zappable at ({}, {})", x, y))?;
    finish(&mut agent, config).await;

    println!("{}", selector);
    if let Some(out) = out {
        write_page(agent.document(), out)?;
    }
    Ok(())
}

async fn restore(
    page: &Path,
    out: Option<&Path>,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut agent = load_agent(page, config).await?;
    // Loading already restored once; this pass only produces the report.
    let report = agent.restore().await?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    if let Some(out) = out {
        write_page(agent.document(), out)?;
    }
    Ok(())
}

async fn list(url: Option<&str>, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(&config.storage).await?;
    let keys: Vec<PageKey> = match url {
        Some(url) => vec![PageKey::from_url(url)],
        None => store
            .keys()
            .await?
            .iter()
            .filter_map(|k| PageKey::parse(k))
            .collect(),
    };

    if keys.is_empty() {
        println!("No zapped pages");
        return Ok(());
    }
    for key in keys {
        print_record(store.as_ref(), &key).await?;
    }
    Ok(())
}

async fn print_record(
    store: &dyn ZapStore,
    key: &PageKey,
) -> Result<(), Box<dyn std::error::Error>> {
    let record = store.load_record(key).await?;
    println!("{} ({} selector(s))", key.url(), record.selectors.len());
    for selector in &record.selectors {
        println!("  {}", selector);
    }
    Ok(())
}

async fn message(
    page: &Path,
    json: &str,
    out: Option<&Path>,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let message = ZapMessage::from_json(json)?;
    let agent = load_agent(page, config).await?.into_shared();

    let tabs = LocalTabs::new();
    tabs.attach(CLI_TAB, Arc::clone(&agent)).await;
    let response = tabs.send(CLI_TAB, message).await?;

    let mut agent = agent.lock().await;
    finish(&mut agent, config).await;

    println!("{}", serde_json::to_string(&response)?);
    if let Some(out) = out {
        write_page(agent.document(), out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const PAGE: &str = r#"{
        "url": "https://example.com/",
        "body": { "tag": "body", "children": [
            { "tag": "div", "attributes": { "id": "ad" },
              "rect": { "x": 0, "y": 0, "width": 100, "height": 100 } }
        ] }
    }"#;

    #[test]
    fn test_load_and_write_page() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("page.json");
        std::fs::write(&input, PAGE).unwrap();

        let doc = load_page(&input).unwrap();
        assert!(doc.get_element_by_id("ad").is_some());

        let output = dir.path().join("out.json");
        write_page(&doc, &output).unwrap();
        let again = load_page(&output).unwrap();
        assert_eq!(again.to_snapshot(), doc.to_snapshot());
    }

    #[test]
    fn test_load_page_reports_path() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.json");
        let err = load_page(&missing).unwrap_err();
        assert!(err.to_string().contains("nope.json"));
    }
}
