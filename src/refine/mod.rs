//! Two-pass refinement: a raw classification pass over every candidate
//! reference, an unsupervised false-positive filter, and a second pass
//! restricted to the surviving references.
//!
//! The raw and refined passes use disjoint classifier instances with
//! independent evidence; indexes are rebuilt for the refined pass.

use tracing::{info, warn};

use crate::align::AlignmentBackend;
use crate::classify::{ClassifyError, ReadClassifier};
use crate::core::{AbundanceTable, MappingEvidence, Reference, ReferenceId};
use crate::filter::{build_features, FalsePositiveFilter, FeatureVector};

/// Minimum number of references carrying mapping evidence for the filter
/// to run: 2-means over two points always splits them, which would evict
/// a genuinely-present reference
pub const MIN_REFERENCES_FOR_FILTERING: usize = 3;

/// Everything one driver invocation produces
#[derive(Debug)]
pub struct RefinementOutcome {
    /// Abundances from the raw pass over the full reference set
    pub raw: AbundanceTable,

    /// Abundances from the refined pass; equals `raw` when refinement
    /// was skipped
    pub refined: AbundanceTable,

    /// References surviving the filter (all of them when skipped)
    pub retained: Vec<ReferenceId>,

    /// Feature vectors from the raw pass, for references with evidence
    pub features: Vec<(ReferenceId, FeatureVector)>,

    /// Raw-pass mapping evidence per reference
    pub evidence: Vec<(ReferenceId, MappingEvidence)>,

    /// Whether the filter actually ran and restricted the second pass
    pub refinement_applied: bool,
}

/// Orchestrates RawPass -> filter -> RefinedPass
pub struct RefinementDriver<'a> {
    backend: &'a dyn AlignmentBackend,
    filter: FalsePositiveFilter,
}

impl<'a> RefinementDriver<'a> {
    #[must_use]
    pub fn new(backend: &'a dyn AlignmentBackend) -> Self {
        Self {
            backend,
            filter: FalsePositiveFilter::default(),
        }
    }

    #[must_use]
    pub fn with_filter(backend: &'a dyn AlignmentBackend, filter: FalsePositiveFilter) -> Self {
        Self { backend, filter }
    }

    /// Run both passes over the read pool.
    ///
    /// References whose index cannot be built are skipped with a warning;
    /// a read pool with zero hits still yields a valid all-`UNK` table.
    ///
    /// # Errors
    ///
    /// Returns `ClassifyError::NoReferences` when no reference survives
    /// index construction.
    pub fn run(
        &self,
        references: &[Reference],
        reads: &[Vec<u8>],
    ) -> Result<RefinementOutcome, ClassifyError> {
        let mut raw_classifier = ReadClassifier::from_references(self.backend, references.to_vec())?;
        info!(
            references = raw_classifier.indexes().len(),
            reads = reads.len(),
            "raw classification pass"
        );
        let raw = raw_classifier.classify_batch(reads);

        let features = build_features(
            raw_classifier
                .indexes()
                .iter()
                .zip(raw_classifier.evidence())
                .map(|(index, evidence)| (index.id(), index.reference_len(), evidence)),
        );
        let all_ids = raw_classifier.reference_ids();
        let evidence = raw_classifier.into_evidence();

        // Gate on references that actually attracted reads, not on the
        // candidate count: evidence-free candidates carry no feature row
        // and must not push a 2-reference profile into the filter.
        if features.len() < MIN_REFERENCES_FOR_FILTERING {
            info!(
                with_evidence = features.len(),
                candidates = all_ids.len(),
                "too few references with evidence for filtering; refined result equals raw"
            );
            return Ok(RefinementOutcome {
                refined: raw.clone(),
                raw,
                retained: all_ids,
                features,
                evidence,
                refinement_applied: false,
            });
        }

        let retained = match self.filter.partition(&features) {
            Ok(outcome) => {
                info!(
                    anchor = %outcome.anchor,
                    retained = outcome.retained.len(),
                    candidates = features.len(),
                    "false-positive filter applied"
                );
                outcome.retained
            }
            Err(err) => {
                warn!(%err, "skipping refinement; reusing raw pass output");
                return Ok(RefinementOutcome {
                    refined: raw.clone(),
                    raw,
                    retained: all_ids,
                    features,
                    evidence,
                    refinement_applied: false,
                });
            }
        };

        let surviving: Vec<Reference> = references
            .iter()
            .filter(|reference| retained.contains(&reference.id))
            .cloned()
            .collect();

        info!(references = surviving.len(), "refined classification pass");
        let mut refined_classifier = ReadClassifier::from_references(self.backend, surviving)?;
        let refined = refined_classifier.classify_batch(reads);

        Ok(RefinementOutcome {
            raw,
            refined,
            retained,
            features,
            evidence,
            refinement_applied: true,
        })
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::align::KmerAligner;
    use crate::core::ReferenceId;

    const K: usize = 8;

    fn id(s: &str) -> ReferenceId {
        ReferenceId::new(s)
    }

    // Distinct random-looking sequences with no shared 8-mers
    fn seq_a() -> Vec<u8> {
        b"ACGTACGGTTCAGCATTACGGATCCAGTCAAGGTCCAGTTACCGGTTGACGGATTACGGTCAGGTACCAGTA".to_vec()
    }

    fn seq_b() -> Vec<u8> {
        b"TTGACCATGGCAGGCAACTTGGCCGTAAGGCACAGTTCCTGATTGGCAATCCATGGTTCGCAAGGTTCCAAT".to_vec()
    }

    fn seq_c() -> Vec<u8> {
        b"GAGTCCTAGGATCGAGGTTAGAGTCTTCCAGTGGAGGCATTGGAACTAGCGAGGTGACCTAAGGCCTTAGGA".to_vec()
    }

    fn reads_from(sequence: &[u8], count: usize, length: usize) -> Vec<Vec<u8>> {
        (0..count)
            .map(|start| sequence[start..start + length].to_vec())
            .collect()
    }

    #[test]
    fn test_two_reference_scenario_skips_refinement() {
        let references = vec![Reference::new("R1", seq_a()), Reference::new("R2", seq_b())];
        let mut reads = reads_from(&seq_a(), 7, 24);
        reads.extend(reads_from(&seq_b(), 3, 24));

        let aligner = KmerAligner::new(K, 0.5);
        let outcome = RefinementDriver::new(&aligner)
            .run(&references, &reads)
            .unwrap();

        assert!(!outcome.refinement_applied);
        assert_eq!(outcome.retained, vec![id("R1"), id("R2")]);
        assert!((outcome.raw.fraction(&id("R1")).unwrap() - 0.7).abs() < 1e-9);
        assert!((outcome.raw.fraction(&id("R2")).unwrap() - 0.3).abs() < 1e-9);
        assert_eq!(outcome.raw.fractions(), outcome.refined.fractions());
    }

    #[test]
    fn test_evidence_free_candidates_do_not_trigger_filtering() {
        // Three candidates but only two attract reads. Clustering the two
        // evidence rows would always split them and evict the weaker
        // genuine reference, so the filter must stay out of the way.
        let references = vec![
            Reference::new("R1", seq_a()),
            Reference::new("R2", seq_b()),
            Reference::new("R3", seq_c()),
        ];
        let mut reads = reads_from(&seq_a(), 7, 24);
        reads.extend(reads_from(&seq_b(), 3, 24));

        let aligner = KmerAligner::new(K, 0.5);
        let outcome = RefinementDriver::new(&aligner)
            .run(&references, &reads)
            .unwrap();

        assert!(!outcome.refinement_applied);
        assert_eq!(outcome.retained, vec![id("R1"), id("R2"), id("R3")]);
        assert!((outcome.refined.fraction(&id("R1")).unwrap() - 0.7).abs() < 1e-9);
        assert!((outcome.refined.fraction(&id("R2")).unwrap() - 0.3).abs() < 1e-9);
        assert_eq!(outcome.raw.fractions(), outcome.refined.fractions());
    }

    #[test]
    fn test_zero_hit_pool_yields_valid_table() {
        let references = vec![
            Reference::new("R1", seq_a()),
            Reference::new("R2", seq_b()),
            Reference::new("R3", seq_c()),
        ];
        let reads = vec![b"GGGGGGGGGGGGGGGGGGGGGGGG".to_vec(); 4];

        let aligner = KmerAligner::new(K, 0.5);
        let outcome = RefinementDriver::new(&aligner)
            .run(&references, &reads)
            .unwrap();

        assert!(!outcome.refinement_applied);
        assert_eq!(outcome.raw.total_reads(), 4);
        let rows = outcome.raw.fractions();
        let unk = rows.iter().find(|(label, _)| label == "UNK").unwrap();
        assert!((unk.1 - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_reference_set_is_fatal() {
        let aligner = KmerAligner::new(K, 0.5);
        let result = RefinementDriver::new(&aligner).run(&[], &[seq_a()[0..24].to_vec()]);
        assert!(matches!(result, Err(ClassifyError::NoReferences)));
    }

    #[test]
    fn test_unbuildable_reference_skipped_not_fatal() {
        let references = vec![Reference::new("empty", Vec::new()), Reference::new("R1", seq_a())];
        let reads = reads_from(&seq_a(), 2, 24);

        let aligner = KmerAligner::new(K, 0.5);
        let outcome = RefinementDriver::new(&aligner)
            .run(&references, &reads)
            .unwrap();
        assert_eq!(outcome.retained, vec![id("R1")]);
        assert!((outcome.raw.fraction(&id("R1")).unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_cross_mapping_reference_filtered_out() {
        // R3 gets clean exclusive reads. R1 and R2 share most of their
        // sequence, so reads drawn from the shared region are ambiguous and
        // only a sliver of unique coverage lands on each; they fall in the
        // low-coverage cluster and R3 anchors the true one.
        let shared = seq_a();
        let mut r1 = shared.clone();
        r1.extend_from_slice(b"GGCATTACGATCAGGT");
        let mut r2 = shared.clone();
        r2.extend_from_slice(b"CCTTAAGCGTACCAGG");

        let references = vec![
            Reference::new("R1", r1.clone()),
            Reference::new("R2", r2.clone()),
            Reference::new("R3", seq_c()),
        ];

        // Many strong exclusive reads for R3, one unique tail read each
        // for R1 and R2 so all three carry evidence, everything else
        // ambiguous
        let mut reads = reads_from(&seq_c(), 20, 32);
        let tail_start = r1.len() - 24;
        reads.push(r1[tail_start..].to_vec());
        reads.push(r2[tail_start..].to_vec());
        reads.extend(reads_from(&shared, 6, 32));

        let aligner = KmerAligner::new(K, 0.5);
        let outcome = RefinementDriver::new(&aligner)
            .run(&references, &reads)
            .unwrap();

        assert!(outcome.refinement_applied);
        assert!(outcome.retained.contains(&id("R3")));
        assert!(!outcome.retained.contains(&id("R1")));
        assert!(!outcome.retained.contains(&id("R2")));

        let total: f64 = outcome.refined.fractions().iter().map(|(_, f)| f).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }
}
