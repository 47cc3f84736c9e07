use serde::{Deserialize, Serialize};

use crate::core::types::{Assignment, ReferenceId, AMBIGUOUS_LABEL, UNMAPPED_LABEL};

/// Relative abundance estimate for one classification pass.
///
/// Holds per-reference read counts in the classifier's reference order plus
/// the reserved `UNK` (unmapped) and `MULTIPLE` (ambiguous) rows. Every read
/// contributes to exactly one row, so the normalized fractions sum to 1.0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbundanceTable {
    counts: Vec<(ReferenceId, u64)>,
    unmapped: u64,
    ambiguous: u64,
    total_reads: u64,
}

impl AbundanceTable {
    /// Create an empty table over a fixed, ordered reference set
    #[must_use]
    pub fn new(references: &[ReferenceId]) -> Self {
        Self {
            counts: references.iter().map(|id| (id.clone(), 0)).collect(),
            unmapped: 0,
            ambiguous: 0,
            total_reads: 0,
        }
    }

    /// Count one read's assignment.
    ///
    /// Assignments to references outside the table's reference set are
    /// counted as unmapped; the classifier never produces them.
    pub fn tally(&mut self, assignment: &Assignment) {
        self.total_reads += 1;
        match assignment {
            Assignment::Mapped(id) => {
                match self.counts.iter_mut().find(|(rid, _)| rid == id) {
                    Some((_, count)) => *count += 1,
                    None => self.unmapped += 1,
                }
            }
            Assignment::Unmapped => self.unmapped += 1,
            Assignment::Ambiguous => self.ambiguous += 1,
        }
    }

    /// Total number of reads tallied
    #[must_use]
    pub fn total_reads(&self) -> u64 {
        self.total_reads
    }

    /// Raw read count for one reference
    #[must_use]
    pub fn count(&self, id: &ReferenceId) -> Option<u64> {
        self.counts
            .iter()
            .find(|(rid, _)| rid == id)
            .map(|&(_, count)| count)
    }

    /// Relative abundance for one reference, `None` if it is not in the table
    #[must_use]
    pub fn fraction(&self, id: &ReferenceId) -> Option<f64> {
        self.count(id).map(|count| self.normalize(count))
    }

    /// All rows as `(label, fraction)` pairs: references in their fixed
    /// order, then the reserved `UNK` and `MULTIPLE` rows (present only
    /// when nonzero).
    #[must_use]
    pub fn fractions(&self) -> Vec<(String, f64)> {
        let mut rows: Vec<(String, f64)> = self
            .counts
            .iter()
            .map(|(id, count)| (id.to_string(), self.normalize(*count)))
            .collect();
        if self.unmapped > 0 {
            rows.push((UNMAPPED_LABEL.to_string(), self.normalize(self.unmapped)));
        }
        if self.ambiguous > 0 {
            rows.push((AMBIGUOUS_LABEL.to_string(), self.normalize(self.ambiguous)));
        }
        rows
    }

    fn normalize(&self, count: u64) -> f64 {
        if self.total_reads == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        {
            count as f64 / self.total_reads as f64
        }
    }
}
