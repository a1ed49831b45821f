//! 3-vector arithmetic used throughout the geometric feature pipeline.
//!
//! All arithmetic is double precision (`glam::DVec3`) because the embedding
//! network and centroid table are trained against double-precision
//! reference outputs; single precision would drift by more than the
//! tolerance the asset was fit to.

use glam::DVec3;

use crate::error::CoreError;

/// Euclidean distance between two points.
#[must_use]
pub fn dist(a: DVec3, b: DVec3) -> f64 {
    (a - b).length()
}

/// Normalize `v` to unit length.
///
/// # Errors
///
/// Returns [`CoreError::DegenerateGeometry`] if `v` is the zero vector (or
/// close enough that normalization would be numerically meaningless).
/// Callers pass the residue index responsible so the driver can mark just
/// that residue invalid rather than failing the whole call.
pub fn unit(v: DVec3, residue: usize) -> Result<DVec3, CoreError> {
    let len = v.length();
    if !len.is_finite() || len < 1e-12 {
        return Err(CoreError::DegenerateGeometry { residue });
    }
    Ok(v / len)
}

/// Rotate `v` about a unit-length `axis` by `theta` radians (Rodrigues'
/// rotation formula).
///
/// `axis` is assumed unit-length; callers are responsible for normalizing it
/// first (typically via [`unit`]).
#[must_use]
pub fn rotate(v: DVec3, axis: DVec3, theta: f64) -> DVec3 {
    let (sin_t, cos_t) = theta.sin_cos();
    v * cos_t + axis.cross(v) * sin_t + axis * (axis.dot(v)) * (1.0 - cos_t)
}
