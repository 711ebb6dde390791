//! `charshapes catalog` – list the configured books.

use anyhow::Result;
use charshapes_core::config::CharShapesConfig;

pub fn run_catalog(cfg: &CharShapesConfig) -> Result<()> {
    let catalog = cfg.catalog();
    println!("{:<10} {:<32} {}", "BOOK", "MD5", "URL");
    for d in catalog.iter() {
        println!("{:<10} {:<32} {}", d.identifier, d.expected_md5, d.source_url);
    }
    Ok(())
}
