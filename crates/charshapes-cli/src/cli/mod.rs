//! CLI for the CharShapes dataset tools.

mod commands;

use anyhow::Result;
use charshapes_core::config;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use commands::{run_catalog, run_checksum, run_classes, run_fetch, run_index, run_verify};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "charshapes")]
#[command(about = "Download, verify and index the PMJT Character Shapes dataset", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download and extract every book that is not already present.
    Fetch {
        /// Dataset root; books land in <ROOT>/<raw_folder>.
        #[arg(long, default_value = ".")]
        root: PathBuf,
    },

    /// Build the character index and print a summary.
    Index {
        #[arg(long, default_value = ".")]
        root: PathBuf,
        /// Sort records by path.
        #[arg(long)]
        sort: bool,
        /// Label files by their enclosing U+ directory instead of their parent.
        #[arg(long)]
        label_root: bool,
        /// Print every record as JSON instead of a summary.
        #[arg(long)]
        json: bool,
    },

    /// Print the label vocabulary, one code point per line.
    Classes {
        #[arg(long, default_value = ".")]
        root: PathBuf,
    },

    /// List the configured books with their URLs and checksums.
    Catalog,

    /// Print the MD5 of a file.
    Checksum {
        /// Path to the file.
        path: PathBuf,
    },

    /// Check a file against an expected MD5; exits non-zero on mismatch.
    Verify {
        path: PathBuf,
        /// Expected lowercase hex digest.
        md5: String,
    },
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Fetch { root } => run_fetch(&cfg, &root)?,
            CliCommand::Index {
                root,
                sort,
                label_root,
                json,
            } => run_index(&cfg, &root, sort, label_root, json)?,
            CliCommand::Classes { root } => run_classes(&cfg, &root)?,
            CliCommand::Catalog => run_catalog(&cfg)?,
            CliCommand::Checksum { path } => run_checksum(&path)?,
            CliCommand::Verify { path, md5 } => run_verify(&path, &md5)?,
        }

        Ok(())
    }
}
