//! Read classification against an ordered reference set.
//!
//! Each read is queried against **every** reference before a verdict is
//! reached: exactly one hit assigns the read, zero hits mark it `UNK`, and
//! two or more mark it `MULTIPLE`. The scan is deliberately exhaustive -
//! short-circuiting on the first hit would make ambiguity undetectable and
//! inflate abundances of references that happen to come first.

use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, warn};

use crate::align::{AlignmentBackend, BestHit, ReferenceIndex};
use crate::core::{AbundanceTable, Assignment, MappingEvidence, Reference, ReferenceId};

#[derive(Error, Debug)]
pub enum ClassifyError {
    #[error("cannot classify reads against an empty reference set")]
    NoReferences,
}

/// Classifies query reads against a fixed, ordered pool of reference indexes,
/// accumulating per-reference mapping evidence as a side effect.
pub struct ReadClassifier {
    indexes: Vec<ReferenceIndex>,
    evidence: Vec<MappingEvidence>,
}

impl ReadClassifier {
    /// Create a classifier over a nonempty ordered reference set.
    ///
    /// The order is preserved for the lifetime of the pass; it determines
    /// abundance-table row order and downstream tie-breaking.
    ///
    /// # Errors
    ///
    /// Returns `ClassifyError::NoReferences` when `indexes` is empty.
    pub fn new(indexes: Vec<ReferenceIndex>) -> Result<Self, ClassifyError> {
        if indexes.is_empty() {
            return Err(ClassifyError::NoReferences);
        }
        let evidence = indexes.iter().map(|_| MappingEvidence::new()).collect();
        Ok(Self { indexes, evidence })
    }

    /// Index every reference with the backend and wrap the results in a
    /// classifier. References the backend rejects are skipped with a
    /// warning; they take no part in the pass.
    ///
    /// # Errors
    ///
    /// Returns `ClassifyError::NoReferences` when no reference survives
    /// index construction.
    pub fn from_references(
        backend: &dyn AlignmentBackend,
        references: Vec<Reference>,
    ) -> Result<Self, ClassifyError> {
        let indexes: Vec<ReferenceIndex> = references
            .into_par_iter()
            .filter_map(|reference| {
                let id = reference.id.clone();
                match ReferenceIndex::build(backend, reference) {
                    Ok(index) => Some(index),
                    Err(err) => {
                        warn!(reference = %id, %err, "skipping reference");
                        None
                    }
                }
            })
            .collect();
        Self::new(indexes)
    }

    /// Reference identities in classifier order
    #[must_use]
    pub fn reference_ids(&self) -> Vec<ReferenceId> {
        self.indexes.iter().map(|idx| idx.id().clone()).collect()
    }

    #[must_use]
    pub fn indexes(&self) -> &[ReferenceIndex] {
        &self.indexes
    }

    /// Accumulated evidence, parallel to `reference_ids()`
    #[must_use]
    pub fn evidence(&self) -> &[MappingEvidence] {
        &self.evidence
    }

    /// Consume the classifier, keeping the accumulated evidence
    #[must_use]
    pub fn into_evidence(self) -> Vec<(ReferenceId, MappingEvidence)> {
        self.indexes
            .iter()
            .map(|idx| idx.id().clone())
            .zip(self.evidence)
            .collect()
    }

    /// Classify one read.
    ///
    /// Every reference is queried (fanned out across the rayon pool) and the
    /// outcomes are reduced afterwards, so ambiguity is detected regardless
    /// of reference order. Evidence is recorded only for unique assignments;
    /// ambiguous reads contribute no statistics to any reference.
    pub fn classify(&mut self, read: &[u8]) -> Assignment {
        let hits: Vec<(usize, BestHit)> = self
            .indexes
            .par_iter()
            .enumerate()
            .filter_map(|(position, index)| index.query(read).map(|hit| (position, hit)))
            .collect();

        match hits.as_slice() {
            [] => Assignment::Unmapped,
            [(position, hit)] => {
                self.evidence[*position].record(hit.quality, hit.interval());
                Assignment::Mapped(self.indexes[*position].id().clone())
            }
            _ => Assignment::Ambiguous,
        }
    }

    /// Classify every read in the pool and normalize the counts into a
    /// relative abundance table.
    pub fn classify_batch(&mut self, reads: &[Vec<u8>]) -> AbundanceTable {
        if reads.is_empty() {
            warn!("read pool is empty; abundance table will be all zeros");
        }

        let mut table = AbundanceTable::new(&self.reference_ids());
        for read in reads {
            let assignment = self.classify(read);
            table.tally(&assignment);
        }

        debug!(
            reads = reads.len(),
            references = self.indexes.len(),
            "classification pass complete"
        );
        table
    }
}
