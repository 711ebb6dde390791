//! `charshapes fetch` – acquire every configured book.

use anyhow::{Context, Result};
use charshapes_core::acquire;
use charshapes_core::config::CharShapesConfig;
use std::path::Path;

pub fn run_fetch(cfg: &CharShapesConfig, root: &Path) -> Result<()> {
    let catalog = cfg.catalog();
    if catalog.is_empty() {
        tracing::warn!("catalog is empty; nothing to fetch");
    }
    let source = cfg.curl_source();
    let report = acquire(&catalog, root, &source, &cfg.acquire_options())
        .with_context(|| format!("acquire into {}", root.display()))?;

    for id in &report.fetched {
        println!("fetched    {id}");
    }
    for id in &report.skipped {
        println!("present    {id}");
    }
    println!(
        "{} fetched, {} extracted, {} already present",
        report.fetched.len(),
        report.extracted.len(),
        report.skipped.len()
    );
    Ok(())
}
