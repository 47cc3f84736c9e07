//! Alignment abstraction: a pluggable backend trait plus the typed
//! per-reference index wrapper the classifier depends on.
//!
//! The backend is deliberately narrow - build an index over one reference,
//! return the single best hit (or none) for a query - so a different aligner
//! can be substituted without touching any classification logic.

pub mod kmer;

use thiserror::Error;

use crate::core::{Interval, Reference, ReferenceId};

pub use kmer::KmerAligner;

/// Maximum mapping quality reported by alignment backends (minimap2 convention)
pub const MAX_MAPPING_QUALITY: u8 = 60;

#[derive(Error, Debug)]
pub enum IndexBuildError {
    #[error("reference '{0}' has an empty sequence")]
    EmptySequence(ReferenceId),

    #[error("reference '{id}' yields no indexable seeds (length {length}, k {k})")]
    NoValidSeeds {
        id: ReferenceId,
        length: u64,
        k: usize,
    },
}

/// The single best-scoring alignment of a query against a reference.
///
/// Coordinates are half-open `[start, end)` on the reference. Ties between
/// equally-scoring placements are resolved by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BestHit {
    /// Mapping quality in `0..=60`
    pub quality: u8,
    /// Reference start of the alignment span
    pub start: u64,
    /// Reference end of the alignment span (exclusive)
    pub end: u64,
}

impl BestHit {
    /// The reference span as an interval
    #[must_use]
    pub fn interval(&self) -> Interval {
        Interval::new(self.start, self.end)
    }
}

/// A queryable alignment index over one reference sequence
pub trait QueryIndex: Send + Sync {
    /// Return the single best hit for the query, or `None` if it does not map
    fn best_hit(&self, query: &[u8]) -> Option<BestHit>;
}

/// Factory for alignment indexes; the seam where aligners are swapped
pub trait AlignmentBackend: Send + Sync {
    /// Build an index over the reference's sequence.
    ///
    /// # Errors
    ///
    /// Returns `IndexBuildError` if the sequence is empty or contains
    /// nothing the engine can index.
    fn build_index(&self, reference: &Reference) -> Result<Box<dyn QueryIndex>, IndexBuildError>;
}

/// One reference plus the alignment index built over it.
///
/// Thin typed wrapper; performs no classification logic itself.
pub struct ReferenceIndex {
    reference: Reference,
    index: Box<dyn QueryIndex>,
}

impl ReferenceIndex {
    /// Build the index for one reference.
    ///
    /// # Errors
    ///
    /// Propagates `IndexBuildError` from the backend.
    pub fn build(
        backend: &dyn AlignmentBackend,
        reference: Reference,
    ) -> Result<Self, IndexBuildError> {
        let index = backend.build_index(&reference)?;
        Ok(Self { reference, index })
    }

    /// Submit one query sequence to the alignment engine
    #[must_use]
    pub fn query(&self, sequence: &[u8]) -> Option<BestHit> {
        self.index.best_hit(sequence)
    }

    #[must_use]
    pub fn id(&self) -> &ReferenceId {
        &self.reference.id
    }

    /// Length of the wrapped reference sequence
    #[must_use]
    pub fn reference_len(&self) -> u64 {
        self.reference.len()
    }
}

impl std::fmt::Debug for ReferenceIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReferenceIndex")
            .field("id", &self.reference.id)
            .field("length", &self.reference.len())
            .finish_non_exhaustive()
    }
}
