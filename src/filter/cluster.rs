use ndarray::{Array1, Array2, ArrayView1, Axis};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClusterError {
    #[error("clustering into 2 groups requires at least 2 references, got {0}")]
    InsufficientData(usize),
}

/// Two-group unsupervised partitioning of feature vectors.
///
/// The labels are opaque cluster identifiers (0 or 1) with no inherent
/// meaning; anchor selection decides which label is the "true" one. Kept
/// behind a trait so k-means, a Gaussian mixture, or a fixed threshold are
/// all valid substitutions.
pub trait ClusterModel: Send + Sync {
    /// Fit the model on the feature matrix (one row per reference) and
    /// return one label per row.
    ///
    /// # Errors
    ///
    /// Returns `ClusterError::InsufficientData` when fewer than 2 rows are
    /// supplied.
    fn fit_predict(&self, features: &Array2<f64>) -> Result<Vec<usize>, ClusterError>;
}

/// Built-in 2-means clustering.
///
/// Centroids are initialized from the farthest pair of points, which makes
/// the fit deterministic without a random seed.
#[derive(Debug, Clone)]
pub struct KMeans {
    max_iterations: usize,
}

impl Default for KMeans {
    fn default() -> Self {
        Self {
            max_iterations: 100,
        }
    }
}

impl KMeans {
    #[must_use]
    pub fn new(max_iterations: usize) -> Self {
        Self { max_iterations }
    }
}

impl ClusterModel for KMeans {
    fn fit_predict(&self, features: &Array2<f64>) -> Result<Vec<usize>, ClusterError> {
        let points = features.nrows();
        if points < 2 {
            return Err(ClusterError::InsufficientData(points));
        }

        let (seed_a, seed_b) = farthest_pair(features);
        let mut centroids = [
            features.row(seed_a).to_owned(),
            features.row(seed_b).to_owned(),
        ];

        let mut labels = vec![0usize; points];
        for _ in 0..self.max_iterations {
            let mut changed = false;
            for (row, label) in features.axis_iter(Axis(0)).zip(labels.iter_mut()) {
                let nearest = usize::from(
                    squared_distance(row, centroids[1].view())
                        < squared_distance(row, centroids[0].view()),
                );
                if nearest != *label {
                    *label = nearest;
                    changed = true;
                }
            }
            if !changed {
                break;
            }

            for (cluster, centroid) in centroids.iter_mut().enumerate() {
                let members: Vec<usize> = labels
                    .iter()
                    .enumerate()
                    .filter(|(_, &label)| label == cluster)
                    .map(|(row, _)| row)
                    .collect();
                // An emptied cluster keeps its previous centroid
                if members.is_empty() {
                    continue;
                }
                let mut mean = Array1::zeros(features.ncols());
                for &row in &members {
                    mean += &features.row(row);
                }
                #[allow(clippy::cast_precision_loss)]
                {
                    mean /= members.len() as f64;
                }
                *centroid = mean;
            }
        }

        Ok(labels)
    }
}

/// Indexes of the two rows at maximum squared distance
fn farthest_pair(features: &Array2<f64>) -> (usize, usize) {
    let mut best = (0, 1);
    let mut best_distance = -1.0;
    for i in 0..features.nrows() {
        for j in (i + 1)..features.nrows() {
            let distance = squared_distance(features.row(i), features.row(j));
            if distance > best_distance {
                best_distance = distance;
                best = (i, j);
            }
        }
    }
    best
}

fn squared_distance(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum()
}
