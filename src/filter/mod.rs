//! False-positive suppression.
//!
//! Cross-mapping between similar references inflates hit counts for
//! references that are not actually in the sample. This stage builds a
//! 2-dimensional feature vector per reference (mean mapping quality,
//! coverage fraction), splits the references into two unsupervised
//! clusters, and keeps the cluster containing the anchor - the reference
//! with the highest heuristic confidence score. It is a heuristic, not a
//! guarantee, and is only meaningful with more than 2 candidates.

pub mod cluster;
pub mod features;
pub mod select;

use ndarray::Array2;

use crate::core::ReferenceId;

pub use cluster::{ClusterError, ClusterModel, KMeans};
pub use features::{build_features, FeatureVector};
pub use select::{filter_by_cluster, select_anchor};

/// Result of one filtering round
#[derive(Debug, Clone)]
pub struct FilterOutcome {
    /// References assigned to the anchor's cluster, in input order
    pub retained: Vec<ReferenceId>,

    /// The anchor reference
    pub anchor: ReferenceId,

    /// Cluster label per input feature row (opaque 0/1)
    pub labels: Vec<usize>,
}

/// Partitions candidate references into a "true" and a "false" cluster
pub struct FalsePositiveFilter {
    model: Box<dyn ClusterModel>,
}

impl Default for FalsePositiveFilter {
    fn default() -> Self {
        Self {
            model: Box::new(KMeans::default()),
        }
    }
}

impl FalsePositiveFilter {
    /// Use a specific clustering model
    #[must_use]
    pub fn with_model(model: Box<dyn ClusterModel>) -> Self {
        Self { model }
    }

    /// Cluster the feature vectors and keep the anchor's cluster.
    ///
    /// # Errors
    ///
    /// Returns `ClusterError::InsufficientData` when fewer than 2 feature
    /// rows are supplied (also the case when no anchor can be chosen, since
    /// that requires at least one scored reference).
    pub fn partition(
        &self,
        features: &[(ReferenceId, FeatureVector)],
    ) -> Result<FilterOutcome, ClusterError> {
        let matrix = feature_matrix(features);
        let labels = self.model.fit_predict(&matrix)?;

        let Some(anchor_position) = select_anchor(features) else {
            return Err(ClusterError::InsufficientData(0));
        };
        let true_label = labels[anchor_position];
        let retained = filter_by_cluster(features, &labels, true_label);

        Ok(FilterOutcome {
            retained,
            anchor: features[anchor_position].0.clone(),
            labels,
        })
    }
}

/// One row per reference: `[mean_quality, coverage_fraction]`
fn feature_matrix(features: &[(ReferenceId, FeatureVector)]) -> Array2<f64> {
    let mut matrix = Array2::zeros((features.len(), 2));
    for (row, (_, fv)) in features.iter().enumerate() {
        matrix[[row, 0]] = fv.mean_quality;
        matrix[[row, 1]] = fv.coverage_fraction;
    }
    matrix
}
