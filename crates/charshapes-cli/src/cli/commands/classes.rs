//! `charshapes classes` – print the label vocabulary.

use anyhow::Result;
use charshapes_core::config::CharShapesConfig;
use charshapes_core::{CharShapes, CharShapesOptions};
use std::path::Path;

pub fn run_classes(cfg: &CharShapesConfig, root: &Path) -> Result<()> {
    let opts = CharShapesOptions::default()
        .with_acquire_options(cfg.acquire_options())
        .with_index_options(cfg.index_options());
    let dataset = CharShapes::open(root, opts)?;
    tracing::debug!(
        root = %dataset.root().display(),
        images = dataset.index().len(),
        "listing classes"
    );
    for label in dataset.classes() {
        println!("{label}");
    }
    Ok(())
}
