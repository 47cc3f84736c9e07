use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::align::MAX_MAPPING_QUALITY;
use crate::core::{MappingEvidence, ReferenceId};
use crate::coverage;

/// Per-reference feature vector fed to the clustering model
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Mean mapping quality over uniquely-assigned reads
    pub mean_quality: f64,

    /// Fraction of the reference covered by merged read spans
    pub coverage_fraction: f64,

    /// Whether this reference may serve as the anchor. False when its
    /// coverage was undefined (zero-length reference).
    pub anchor_eligible: bool,
}

impl FeatureVector {
    /// Heuristic confidence that the reference is genuinely present:
    /// normalized quality plus coverage, each in roughly `[0, 1]`
    #[must_use]
    pub fn confidence_score(&self) -> f64 {
        self.mean_quality / f64::from(MAX_MAPPING_QUALITY) + self.coverage_fraction
    }
}

/// Build feature vectors from accumulated mapping evidence.
///
/// References with zero recorded hits carry no signal to cluster on and are
/// excluded without error. A reference whose coverage is undefined keeps a
/// 0.0 coverage feature but is barred from anchor selection.
pub fn build_features<'a>(
    items: impl IntoIterator<Item = (&'a ReferenceId, u64, &'a MappingEvidence)>,
) -> Vec<(ReferenceId, FeatureVector)> {
    let mut features = Vec::new();

    for (id, reference_length, evidence) in items {
        let Some(mean_quality) = evidence.mean_quality() else {
            debug!(reference = %id, "no mapped reads; excluded from clustering");
            continue;
        };

        let merged = coverage::merge(&evidence.intervals);
        let (coverage_fraction, anchor_eligible) =
            match coverage::coverage_fraction(reference_length, &merged) {
                Ok(fraction) => (fraction, true),
                Err(err) => {
                    warn!(reference = %id, %err, "coverage undefined; treating as 0.0");
                    (0.0, false)
                }
            };

        features.push((
            id.clone(),
            FeatureVector {
                mean_quality,
                coverage_fraction,
                anchor_eligible,
            },
        ));
    }

    features
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Interval;

    fn evidence(qualities: &[u8], intervals: &[(u64, u64)]) -> MappingEvidence {
        let mut ev = MappingEvidence::new();
        for (&quality, &(start, end)) in qualities.iter().zip(intervals) {
            ev.record(quality, Interval::new(start, end));
        }
        ev
    }

    #[test]
    fn test_features_from_evidence() {
        let id = ReferenceId::new("R1");
        let ev = evidence(&[60, 60], &[(0, 250), (250, 500)]);

        let features = build_features([(&id, 1000, &ev)]);
        assert_eq!(features.len(), 1);
        let (_, fv) = &features[0];
        assert!((fv.mean_quality - 60.0).abs() < 1e-9);
        assert!((fv.coverage_fraction - 0.5).abs() < 1e-9);
        assert!((fv.confidence_score() - 1.5).abs() < 1e-9);
        assert!(fv.anchor_eligible);
    }

    #[test]
    fn test_zero_hit_reference_excluded_without_error() {
        let id = ReferenceId::new("R1");
        let empty = MappingEvidence::new();
        assert!(build_features([(&id, 1000, &empty)]).is_empty());
    }

    #[test]
    fn test_zero_length_reference_not_anchor_eligible() {
        let id = ReferenceId::new("R1");
        let ev = evidence(&[30], &[(0, 10)]);

        let features = build_features([(&id, 0, &ev)]);
        assert_eq!(features.len(), 1);
        let (_, fv) = &features[0];
        assert!(!fv.anchor_eligible);
        assert!((fv.coverage_fraction - 0.0).abs() < 1e-12);
    }
}
