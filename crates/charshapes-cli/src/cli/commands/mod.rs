//! CLI command handlers, one file per command.

mod catalog;
mod checksum;
mod classes;
mod fetch;
mod index;

pub use catalog::run_catalog;
pub use checksum::{run_checksum, run_verify};
pub use classes::run_classes;
pub use fetch::run_fetch;
pub use index::run_index;
