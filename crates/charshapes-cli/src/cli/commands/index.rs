//! `charshapes index` – build the index and summarize or dump it.

use anyhow::{Context, Result};
use charshapes_core::config::CharShapesConfig;
use charshapes_core::{build_index, LabelSource};
use std::collections::BTreeMap;
use std::path::Path;

pub fn run_index(
    cfg: &CharShapesConfig,
    root: &Path,
    sort: bool,
    label_root: bool,
    json: bool,
) -> Result<()> {
    let mut opts = cfg.index_options();
    opts.sort |= sort;
    if label_root {
        opts.label_source = LabelSource::LabelRoot;
    }

    let raw = root.join(&cfg.raw_folder);
    let index = build_index(&raw, &opts).with_context(|| format!("index {}", raw.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&index)?);
        return Ok(());
    }

    let mut per_label: BTreeMap<&str, usize> = BTreeMap::new();
    for r in &index.records {
        *per_label.entry(r.code_point.as_str()).or_default() += 1;
    }
    println!("{:<12} {}", "LABEL", "IMAGES");
    for label in &index.labels {
        let n = per_label.get(label.as_str()).copied().unwrap_or(0);
        println!("{:<12} {}", label, n);
    }
    println!("{} images, {} labels", index.records.len(), index.labels.len());
    Ok(())
}
