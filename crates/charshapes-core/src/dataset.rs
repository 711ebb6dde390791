//! Index-addressable access to character samples.

use crate::acquire::{self, AcquireOptions};
use crate::catalog::Catalog;
use crate::error::{DatasetError, Result};
use crate::fetch::{ArchiveSource, CurlSource};
use crate::index::{self, CharacterRecord, DatasetIndex, IndexOptions};
use image::DynamicImage;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Anything exposing a length and random access by position. Batching and
/// iteration code only needs this.
pub trait Dataset {
    type Item;

    fn len(&self) -> usize;

    /// Fails with `DatasetError::OutOfRange` when `index >= len()`.
    fn get(&self, index: usize) -> Result<Self::Item>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Iterate every item of `dataset` in index order.
pub fn iter<D: Dataset>(dataset: &D) -> impl Iterator<Item = Result<D::Item>> + '_ {
    (0..dataset.len()).map(move |i| dataset.get(i))
}

/// Decoded image plus its label.
#[derive(Debug, Clone)]
pub struct Sample {
    pub image: DynamicImage,
    pub code_point: String,
}

/// Turns a file into a raster image.
pub trait ImageDecoder: Send + Sync {
    fn decode(&self, path: &Path) -> Result<DynamicImage>;
}

/// Decoder backed by the `image` crate; the format is guessed from content.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageCrateDecoder;

impl ImageDecoder for ImageCrateDecoder {
    fn decode(&self, path: &Path) -> Result<DynamicImage> {
        image::ImageReader::open(path)
            .map_err(DatasetError::fs("open", path))?
            .with_guessed_format()
            .map_err(DatasetError::fs("read", path))?
            .decode()
            .map_err(|source| DatasetError::Decode {
                path: path.to_path_buf(),
                source,
            })
    }
}

pub type Transform = Box<dyn Fn(Sample) -> Sample + Send + Sync>;
pub type TargetTransform = Box<dyn Fn(String) -> String + Send + Sync>;
pub type BoxedSource = Box<dyn ArchiveSource + Send + Sync>;

/// Construction options for [`CharShapes`].
pub struct CharShapesOptions {
    /// Applied to every sample after decoding.
    pub transform: Option<Transform>,
    /// Applied to the code point before the sample is assembled.
    pub target_transform: Option<TargetTransform>,
    /// Run acquisition over `catalog` before indexing.
    pub download: bool,
    pub catalog: Catalog,
    pub acquire: AcquireOptions,
    pub index: IndexOptions,
    /// Used when `download` is set; libcurl with default timeouts if `None`.
    pub source: Option<BoxedSource>,
    pub decoder: Box<dyn ImageDecoder>,
}

impl Default for CharShapesOptions {
    fn default() -> Self {
        Self {
            transform: None,
            target_transform: None,
            download: false,
            catalog: Catalog::default(),
            acquire: AcquireOptions::default(),
            index: IndexOptions::default(),
            source: None,
            decoder: Box::new(ImageCrateDecoder),
        }
    }
}

impl CharShapesOptions {
    pub fn with_download(mut self, download: bool) -> Self {
        self.download = download;
        self
    }

    pub fn with_transform(mut self, f: impl Fn(Sample) -> Sample + Send + Sync + 'static) -> Self {
        self.transform = Some(Box::new(f));
        self
    }

    pub fn with_target_transform(
        mut self,
        f: impl Fn(String) -> String + Send + Sync + 'static,
    ) -> Self {
        self.target_transform = Some(Box::new(f));
        self
    }

    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_source(mut self, source: impl ArchiveSource + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn with_decoder(mut self, decoder: impl ImageDecoder + 'static) -> Self {
        self.decoder = Box::new(decoder);
        self
    }

    pub fn with_index_options(mut self, index: IndexOptions) -> Self {
        self.index = index;
        self
    }

    pub fn with_acquire_options(mut self, acquire: AcquireOptions) -> Self {
        self.acquire = acquire;
        self
    }
}

/// The PMJT Character Shapes dataset rooted at a local directory.
///
/// The index is built once at construction and never changes afterwards.
pub struct CharShapes {
    root: PathBuf,
    index: DatasetIndex,
    transform: Option<Transform>,
    target_transform: Option<TargetTransform>,
    decoder: Box<dyn ImageDecoder>,
}

impl CharShapes {
    /// Optionally acquire the catalog into `root`, then index `root/<raw_folder>`.
    pub fn open(root: impl AsRef<Path>, options: CharShapesOptions) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        let CharShapesOptions {
            transform,
            target_transform,
            download,
            catalog,
            acquire: acquire_opts,
            index: index_opts,
            source,
            decoder,
        } = options;

        if download {
            let source: BoxedSource = source.unwrap_or_else(|| Box::new(CurlSource::default()));
            let report = acquire::acquire(&catalog, &root, source.as_ref(), &acquire_opts)?;
            tracing::info!(
                fetched = report.fetched.len(),
                skipped = report.skipped.len(),
                extracted = report.extracted.len(),
                "acquisition finished"
            );
        }

        let raw_path = root.join(&acquire_opts.raw_folder);
        let index = index::build_index(&raw_path, &index_opts)?;

        Ok(Self {
            root,
            index,
            transform,
            target_transform,
            decoder,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Distinct labels seen while indexing.
    pub fn classes(&self) -> &BTreeSet<String> {
        &self.index.labels
    }

    pub fn records(&self) -> &[CharacterRecord] {
        &self.index.records
    }

    pub fn index(&self) -> &DatasetIndex {
        &self.index
    }
}

impl Dataset for CharShapes {
    type Item = Sample;

    fn len(&self) -> usize {
        self.index.len()
    }

    fn get(&self, index: usize) -> Result<Sample> {
        let record = self.index.records.get(index).ok_or(DatasetError::OutOfRange {
            index,
            len: self.index.len(),
        })?;

        let image = self.decoder.decode(&record.image_path)?;
        let code_point = match &self.target_transform {
            Some(f) => f(record.code_point.clone()),
            None => record.code_point.clone(),
        };
        let sample = Sample { image, code_point };

        Ok(match &self.transform {
            Some(f) => f(sample),
            None => sample,
        })
    }
}
