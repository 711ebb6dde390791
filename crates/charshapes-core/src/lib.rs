pub mod config;
pub mod logging;

pub mod acquire;
pub mod catalog;
pub mod checksum;
pub mod dataset;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod index;
pub mod storage;

pub use acquire::{acquire, AcquireOptions, AcquireReport};
pub use catalog::{ArchiveDescriptor, Catalog};
pub use dataset::{CharShapes, CharShapesOptions, Dataset, ImageDecoder, Sample};
pub use error::{DatasetError, Result};
pub use fetch::{ArchiveSource, CurlSource};
pub use index::{build_index, CharacterRecord, DatasetIndex, IndexOptions, LabelSource};
