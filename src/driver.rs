//! Per-chain orchestration: virtual centers -> partner selection -> feature
//! extraction -> embedding -> quantisation.

use glam::DVec3;

use crate::asset::Asset;
use crate::error::CoreError;
use crate::features;
use crate::network::ForwardScratch;
use crate::partner::{select_partners, PartnerTable};
use crate::quantizer::nearest_centroid;
use crate::virtual_center::virtual_center;

/// Reserved state code for a residue that could not be assigned (endpoints,
/// degenerate geometry, or a too-short chain). Equal to the asset's
/// centroid count `K`, never itself a valid centroid index.
pub fn invalid_state(asset: &Asset) -> u8 {
    u8::try_from(asset.header.centroid_count).unwrap_or(u8::MAX)
}

/// One chain's backbone coordinates, borrowed for the duration of a single
/// [`encode`] call.
#[derive(Debug, Clone, Copy)]
pub struct BackboneCoords<'a> {
    /// Cα positions, one per residue.
    pub ca: &'a [DVec3],
    /// Backbone nitrogen positions, one per residue.
    pub n: &'a [DVec3],
    /// Backbone carbonyl carbon positions, one per residue.
    pub c: &'a [DVec3],
    /// Cβ positions, one per residue. A non-finite entry means "missing";
    /// see [`effective_cb`].
    pub cb: &'a [DVec3],
}

impl BackboneCoords<'_> {
    fn len(&self) -> usize {
        self.ca.len()
    }

    fn check_shapes(&self) -> Result<(), CoreError> {
        let len = self.ca.len();
        if self.n.len() != len || self.c.len() != len || self.cb.len() != len {
            return Err(CoreError::InputShapeMismatch {
                ca: self.ca.len(),
                n: self.n.len(),
                c: self.c.len(),
                cb: self.cb.len(),
            });
        }
        Ok(())
    }
}

/// The length-`L` state array and per-residue validity produced by [`encode`].
#[derive(Debug, Clone)]
pub struct EncodeOutput {
    /// One state code per residue, in `{0..K-1}` or the reserved `INVALID`
    /// sentinel.
    pub states: Vec<u8>,
    /// `valid[i]` mirrors `states[i] != INVALID`; kept as an explicit
    /// parallel array because callers commonly branch on validity without
    /// caring about the sentinel's numeric value.
    pub valid: Vec<bool>,
}

/// Build the effective Cβ array: the real Cβ where finite, otherwise a
/// synthesised virtual center.
///
/// A residue whose virtual-center construction degenerates (coincident
/// backbone atoms) gets a `NaN`-free but otherwise arbitrary placeholder
/// position here; it is marked invalid downstream once partner selection
/// and feature extraction are attempted against it, so the placeholder
/// never influences a valid residue's output except through partner
/// selection's distance term — see the degenerate-pair handling test in
/// `tests/encode.rs`.
fn effective_cb(coords: &BackboneCoords, asset: &Asset) -> Vec<DVec3> {
    let mut out = Vec::with_capacity(coords.len());
    for i in 0..coords.len() {
        let raw = coords.cb[i];
        if raw.is_finite() {
            out.push(raw);
            continue;
        }
        match virtual_center(coords.ca[i], coords.n[i], coords.c[i], asset.header.virtual_center, i)
        {
            Ok(vc) => out.push(vc),
            Err(_) => {
                log::warn!("residue {i}: virtual-center synthesis degenerated, using Cα as placeholder");
                out.push(coords.ca[i]);
            }
        }
    }
    out
}

/// Encode one chain's backbone geometry into a 3Di state string.
///
/// # Errors
///
/// Returns [`CoreError::InputShapeMismatch`] if `coords`' four arrays do not
/// share a common length. All other failures (coincident atoms, a too-short
/// chain) are recovered locally and surfaced as `INVALID` states: geometric
/// degeneracies are never fatal to the call.
pub fn encode(coords: &BackboneCoords, asset: &Asset) -> Result<EncodeOutput, CoreError> {
    coords.check_shapes()?;
    let len = coords.len();
    let invalid = invalid_state(asset);

    if len == 0 {
        return Ok(EncodeOutput {
            states: Vec::new(),
            valid: Vec::new(),
        });
    }

    let cb = effective_cb(coords, asset);
    let PartnerTable { partner, valid } = select_partners(&cb, asset.header.partner_cost);

    let mut states = vec![invalid; len];
    let mut valid_out = vec![false; len];
    let mut scratch = ForwardScratch::new(&asset.network);

    for i in 0..len {
        if !valid[i] {
            continue;
        }
        let j = partner[i];

        let descriptor = match features::extract(coords.ca, i, j) {
            Ok(f) => f,
            Err(CoreError::DegenerateGeometry { residue }) => {
                log::debug!("residue {residue}: degenerate feature geometry, marking invalid");
                continue;
            }
            Err(other) => return Err(other),
        };

        let embedding = asset.network.forward(&descriptor, &mut scratch)?;
        let Some(state) = nearest_centroid(embedding, &asset.centroids) else {
            continue;
        };
        states[i] = u8::try_from(state).unwrap_or(invalid);
        valid_out[i] = true;
    }

    Ok(EncodeOutput {
        states,
        valid: valid_out,
    })
}
