//! Nearest-centroid assignment over the embedding space.
//!
//! A linear scan computing squared distance to every centroid and keeping
//! the minimum, in the same style as nearest-subspace-centroid lookup used
//! by product quantization. `K` here is small (the published alphabet has
//! 20 states) so a linear scan, not an index, is appropriate.

/// Squared Euclidean distance between two embeddings.
fn squared_dist(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).powi(2)).sum()
}

/// Return the index of the centroid in `centroids` nearest to `embedding`
/// under squared Euclidean distance. Ties are broken by smallest index.
///
/// Returns `None` only if `centroids` is empty (an asset-loading
/// precondition violation the driver never exercises once
/// [`crate::asset::Asset::load`] has succeeded).
#[must_use]
pub fn nearest_centroid(embedding: &[f64], centroids: &[Vec<f64>]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (k, centroid) in centroids.iter().enumerate() {
        let d = squared_dist(embedding, centroid);
        let better = match best {
            None => true,
            Some((_, best_d)) => d < best_d,
        };
        if better {
            best = Some((k, d));
        }
    }
    best.map(|(k, _)| k)
}
