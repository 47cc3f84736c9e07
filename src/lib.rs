//! # read-refine
//!
//! A library for estimating which candidate reference genomes are present in
//! a read sample and in what relative proportion.
//!
//! Naive read counting over-reports references that merely resemble a genome
//! that is actually in the sample: reads cross-map between near-identical
//! references and inflate their apparent abundance. `read-refine` suppresses
//! these false positives by clustering per-reference mapping statistics and
//! re-classifying against only the references that cluster with the
//! highest-confidence match.
//!
//! ## Pipeline
//!
//! 1. Map every read against every candidate reference (exhaustively - a
//!    read hitting more than one reference is ambiguous, not assigned)
//! 2. Merge each reference's mapped intervals and compute its coverage
//!    fraction and mean mapping quality
//! 3. Split references into two unsupervised clusters and keep the cluster
//!    containing the highest-scoring reference
//! 4. Re-classify the same reads against the surviving references
//!
//! ## Example
//!
//! ```rust
//! use read_refine::align::KmerAligner;
//! use read_refine::core::Reference;
//! use read_refine::refine::RefinementDriver;
//!
//! let references = vec![
//!     Reference::new("R1", b"ACGTACGGTTCAGCATTACGGATCCAGTCAAG".to_vec()),
//!     Reference::new("R2", b"TTGACCATGGCAGGCAACTTGGCCGTAAGGCA".to_vec()),
//! ];
//! let reads = vec![b"ACGGTTCAGCATTACGGATC".to_vec()];
//!
//! let aligner = KmerAligner::new(8, 0.5);
//! let outcome = RefinementDriver::new(&aligner).run(&references, &reads).unwrap();
//! println!("{:?}", outcome.refined.fractions());
//! ```
//!
//! ## Modules
//!
//! - [`core`]: references, mapping evidence, abundance tables
//! - [`align`]: the pluggable alignment backend and the built-in k-mer engine
//! - [`classify`]: read classification against an ordered reference set
//! - [`coverage`]: interval merging and coverage fractions
//! - [`filter`]: unsupervised false-positive filtering
//! - [`refine`]: the two-pass refinement driver
//! - [`parsing`]: FASTA I/O and reference resolution
//! - [`report`]: CSV/JSON output emission
//! - [`cli`]: command-line interface implementation

pub mod align;
pub mod classify;
pub mod cli;
pub mod core;
pub mod coverage;
pub mod filter;
pub mod parsing;
pub mod refine;
pub mod report;

// Re-export commonly used types for convenience
pub use align::{AlignmentBackend, BestHit, KmerAligner, QueryIndex, ReferenceIndex};
pub use classify::ReadClassifier;
pub use core::{AbundanceTable, Assignment, Interval, MappingEvidence, Reference, ReferenceId};
pub use filter::{FalsePositiveFilter, FeatureVector};
pub use refine::{RefinementDriver, RefinementOutcome};
