use crate::acquire::{AcquireOptions, DEFAULT_RAW_FOLDER};
use crate::catalog::{Catalog, DEFAULT_BASE_URL};
use crate::fetch::CurlSource;
use crate::index::{IndexOptions, LabelSource};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Global configuration loaded from `~/.config/charshapes/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharShapesConfig {
    /// Host the book archives are served from (`{base_url}/book/{id}/{id}.zip`).
    pub base_url: String,
    /// Folder under the dataset root holding archives and extracted books.
    pub raw_folder: String,
    /// Seconds to wait for the TCP/TLS connection.
    pub connect_timeout_secs: u64,
    /// Upper bound in seconds for one archive transfer.
    pub timeout_secs: u64,
    /// Skip books whose archive is gone but whose extraction directory exists.
    pub skip_extracted: bool,
    /// Sort index records by path (default: walk order).
    #[serde(default)]
    pub sort_records: Option<bool>,
    /// "immediate-parent" (default) or "label-root".
    #[serde(default)]
    pub label_source: Option<LabelSource>,
}

impl Default for CharShapesConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            raw_folder: DEFAULT_RAW_FOLDER.to_string(),
            connect_timeout_secs: 30,
            timeout_secs: 3600,
            skip_extracted: true,
            sort_records: None,
            label_source: None,
        }
    }
}

impl CharShapesConfig {
    pub fn catalog(&self) -> Catalog {
        Catalog::codh(&self.base_url)
    }

    pub fn curl_source(&self) -> CurlSource {
        CurlSource::new(
            Duration::from_secs(self.connect_timeout_secs),
            Duration::from_secs(self.timeout_secs),
        )
    }

    pub fn acquire_options(&self) -> AcquireOptions {
        AcquireOptions {
            raw_folder: self.raw_folder.clone(),
            skip_extracted: self.skip_extracted,
        }
    }

    pub fn index_options(&self) -> IndexOptions {
        IndexOptions {
            label_source: self.label_source.unwrap_or_default(),
            sort: self.sort_records.unwrap_or(false),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("charshapes")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from `path`, writing the defaults there if it is missing.
pub fn load_or_init_at(path: &Path) -> Result<CharShapesConfig> {
    if !path.exists() {
        let default_cfg = CharShapesConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml).with_context(|| format!("write {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: CharShapesConfig =
        toml::from_str(&data).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<CharShapesConfig> {
    load_or_init_at(&config_path()?)
}
