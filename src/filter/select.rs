use tracing::debug;

use crate::core::ReferenceId;
use crate::filter::features::FeatureVector;

/// Pick the anchor: the anchor-eligible reference with the maximum
/// confidence score. Ties keep the first reference in iteration order,
/// which makes the choice deterministic for a fixed reference ordering.
#[must_use]
pub fn select_anchor(features: &[(ReferenceId, FeatureVector)]) -> Option<usize> {
    let mut anchor: Option<(usize, f64)> = None;
    for (position, (_, fv)) in features.iter().enumerate() {
        if !fv.anchor_eligible {
            continue;
        }
        let score = fv.confidence_score();
        // Strictly-greater comparison keeps the earliest maximum
        if anchor.map_or(true, |(_, best)| score > best) {
            anchor = Some((position, score));
        }
    }
    anchor.map(|(position, _)| position)
}

/// References sharing the anchor's cluster label, the anchor included.
///
/// Membership is decided purely by cluster label; feature values are never
/// thresholded directly.
#[must_use]
pub fn filter_by_cluster(
    features: &[(ReferenceId, FeatureVector)],
    labels: &[usize],
    true_label: usize,
) -> Vec<ReferenceId> {
    let retained: Vec<ReferenceId> = features
        .iter()
        .zip(labels)
        .filter(|(_, &label)| label == true_label)
        .map(|((id, _), _)| id.clone())
        .collect();
    debug!(
        retained = retained.len(),
        candidates = features.len(),
        "cluster-membership filter applied"
    );
    retained
}
