//! Fixed-length descriptor of a residue pair's local backbone geometry.
//!
//! The ten output slots are a protocol with the trained embedding network:
//! its first layer is indexed positionally against them. [`FEATURE_NAMES`]
//! keeps the slot -> semantic mapping in one place so a reorder is caught at
//! a glance rather than by silently retraining a different network.

use glam::DVec3;

use crate::error::CoreError;
use crate::geometry::{dist, unit};

/// Number of features produced per residue pair.
pub const FEATURE_COUNT: usize = 10;

/// Slot -> semantic name, in emission order. See [`extract`].
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "u1.u2",
    "u3.u4",
    "u1.u5",
    "u3.u5",
    "u1.u4",
    "u2.u3",
    "u1.u3",
    "dist(ca_i, ca_j)",
    "sign(j-i) * min(|j-i|, 4)",
    "sign(j-i) * ln(|j-i|+1)",
];

/// Sequence-separation clip ceiling for feature slot 8.
///
/// Distinct from [`crate::partner::SeparationPenalty::ClippedLinear`]'s
/// `d_max`, even though both default to 4 — they are independent
/// asset-declared constants that are free to diverge.
const FEATURE_8_CLIP: f64 = 4.0;

/// Compute the ten-feature descriptor for residue pair `(i, j)`.
///
/// `ca` is the Cα coordinate array for the whole chain. The caller must
/// ensure `i - 1`, `i + 1`, `j - 1`, and `j + 1` are all valid indices into
/// `ca` before calling; the driver enforces this via its endpoint rule
/// before ever reaching this function.
///
/// # Errors
///
/// Returns [`CoreError::DegenerateGeometry`] if any of the five backbone
/// tangents cannot be formed (coincident Cα positions).
pub fn extract(
    ca: &[DVec3],
    i: usize,
    j: usize,
) -> Result<[f64; FEATURE_COUNT], CoreError> {
    let u1 = unit(ca[i] - ca[i - 1], i)?;
    let u2 = unit(ca[i + 1] - ca[i], i)?;
    let u3 = unit(ca[j] - ca[j - 1], j)?;
    let u4 = unit(ca[j + 1] - ca[j], j)?;
    let u5 = unit(ca[j] - ca[i], i)?;

    let signed_separation = j as i64 - i as i64;
    let sign = f64::from(signed_separation.signum());
    let separation = signed_separation.unsigned_abs() as f64;

    Ok([
        u1.dot(u2),
        u3.dot(u4),
        u1.dot(u5),
        u3.dot(u5),
        u1.dot(u4),
        u2.dot(u3),
        u1.dot(u3),
        dist(ca[i], ca[j]),
        sign * separation.min(FEATURE_8_CLIP),
        sign * (separation + 1.0).ln(),
    ])
}
