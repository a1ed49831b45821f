//! Deterministic pseudo-Cβ ("virtual center") synthesis.
//!
//! Produces a pseudo-Cβ position from Cα, N, and C so that downstream
//! features are defined even for glycine or residues with an unresolved Cβ.
//! The construction is frozen: different but algebraically "equivalent"
//! derivations produce distinguishable floating-point outputs and would
//! invalidate a trained set of centroids, so this module implements exactly
//! one fixed sequence of operations.

use glam::DVec3;

use crate::error::CoreError;
use crate::geometry::{rotate, unit};

/// Geometric constants for virtual-center placement, read from the model
/// asset header rather than hardcoded, since they change with the asset
/// version.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VirtualCenterParams {
    /// First rotation angle, in degrees (published default: 270).
    pub alpha_deg: f64,
    /// Second rotation angle, in degrees (published default: 0).
    pub beta_deg: f64,
    /// Bond length of the synthesised pseudo-Cβ, in Ångström (published
    /// default: 2.0; the frozen training asset uses 1.5336).
    pub bond_length: f64,
}

impl VirtualCenterParams {
    fn alpha_rad(self) -> f64 {
        self.alpha_deg.to_radians()
    }

    fn beta_rad(self) -> f64 {
        self.beta_deg.to_radians()
    }
}

/// Construct the virtual center for one residue from its Cα, N, C positions.
///
/// `residue` is the index used to tag a [`CoreError::DegenerateGeometry`]
/// error if `ca`, `n`, or `c` coincide.
///
/// # Errors
///
/// Returns [`CoreError::DegenerateGeometry`] if the backbone vectors at this
/// residue are coincident (cannot be normalised).
pub fn virtual_center(
    ca: DVec3,
    n: DVec3,
    c: DVec3,
    params: VirtualCenterParams,
    residue: usize,
) -> Result<DVec3, CoreError> {
    let u1 = unit(ca - n, residue)?;
    let u2 = unit(c - n, residue)?;

    // Tetrahedral-angle constants: cos(109.47 deg) = -1/3, sin = sqrt(8)/3.
    let sqrt3_2 = 3.0_f64.sqrt() / 2.0;
    let sqrt8_3 = 8.0_f64.sqrt() / 3.0;

    let v3 = -u1 / 3.0 - (-u1 / 2.0 - u2 * sqrt3_2) * sqrt8_3;
    let v4 = -u2 / 3.0 - (-u2 / 2.0 - u1 * sqrt3_2) * sqrt8_3;

    let axis = unit(v4, residue)?;
    let rotated = rotate(v3, axis, params.alpha_rad());
    let rotated = rotate(rotated, u2, params.beta_rad());
    let direction = unit(rotated, residue)?;

    Ok(ca + direction * params.bond_length)
}
