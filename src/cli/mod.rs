//! Command-line interface for read-refine.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **profile**: full two-pass run - raw abundances, false-positive
//!   filtering, refined abundances
//! - **classify**: single raw classification pass only
//!
//! ## Usage
//!
//! ```text
//! # Full pipeline against a genome directory
//! read-refine profile --references genomes/ --reads sample.fa --output run1
//!
//! # Restrict candidates to a name list from an upstream classifier
//! read-refine profile --references all_phages.fa --names candidates.lsv \
//!     --reads sample.fa --output run1
//!
//! # Raw pass only, with the evidence artifact for plotting
//! read-refine classify --references genomes/ --reads sample.fa \
//!     --output raw1 --evidence
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::core::Reference;
use crate::parsing;

pub mod classify;
pub mod profile;

#[derive(Parser)]
#[command(name = "read-refine")]
#[command(version)]
#[command(about = "Estimate reference abundances from read mapping and filter cross-mapping false positives")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run both classification passes with false-positive filtering
    Profile(profile::ProfileArgs),

    /// Run a single raw classification pass
    Classify(classify::ClassifyArgs),
}

/// Load candidate references from a genome directory or a multi-FASTA,
/// optionally restricted by a line-separated name list.
pub(crate) fn load_references(
    references: &Path,
    names: Option<&PathBuf>,
) -> anyhow::Result<Vec<Reference>> {
    let subset = names
        .map(|path| {
            parsing::parse_name_list(path)
                .with_context(|| format!("reading name list {}", path.display()))
        })
        .transpose()?;

    let loaded = if references.is_dir() {
        let names = subset.ok_or_else(|| {
            anyhow::anyhow!("--names is required when --references is a directory")
        })?;
        parsing::ReferenceRepository::new(references).load(&names)
    } else {
        parsing::load_multifasta(references, subset.as_deref())
            .with_context(|| format!("reading references {}", references.display()))?
    };

    anyhow::ensure!(
        !loaded.is_empty(),
        "no usable references loaded from {}",
        references.display()
    );
    Ok(loaded)
}

/// Load the query read pool from a FASTA file
pub(crate) fn load_reads(path: &Path) -> anyhow::Result<Vec<Vec<u8>>> {
    let records = parsing::parse_fasta_file(path)
        .with_context(|| format!("reading read pool {}", path.display()))?;
    Ok(records.into_iter().map(|record| record.sequence).collect())
}

/// Install the global rayon pool when an explicit thread count is given
pub(crate) fn configure_threads(threads: usize) {
    if threads == 0 {
        return;
    }
    if let Err(err) = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
    {
        tracing::warn!(%err, "thread pool already initialized; keeping existing size");
    }
}
