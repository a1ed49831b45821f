//! Partner-residue selection under a composite distance/sequence-separation
//! cost.
//!
//! For each residue `i` we pick the residue `j` whose local geometry, paired
//! with `i`'s, yields the most informative descriptor. Modeled as a plain
//! parameterised function rather than a trait hierarchy: different
//! sequence-penalty shapes collapse to one algorithm plus an injected
//! [`SeparationPenalty`] value, with no need for per-shape types.

use glam::DVec3;

use crate::geometry::dist;

/// Sequence-separation penalty shapes.
///
/// The partner-selection cost clips the separation rather than taking its
/// log; the log transform is reserved for feature 9 in [`crate::features`].
/// The two are named distinctly to keep that asymmetry visible.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SeparationPenalty {
    /// `f(d) = min(d, d_max)`.
    ClippedLinear {
        /// Clip ceiling, read from the asset.
        d_max: f64,
    },
}

impl SeparationPenalty {
    fn evaluate(self, separation: usize) -> f64 {
        match self {
            Self::ClippedLinear { d_max } => (separation as f64).min(d_max),
        }
    }
}

/// Weighted composite cost: `dist(cb_i, cb_j) + weight * f(|j - i|)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartnerCost {
    /// Weight applied to the sequence-separation penalty term.
    pub weight: f64,
    /// The sequence-separation penalty shape.
    pub penalty: SeparationPenalty,
}

impl PartnerCost {
    fn evaluate(self, effective_cb: &[DVec3], i: usize, j: usize) -> f64 {
        let separation = i.abs_diff(j);
        dist(effective_cb[i], effective_cb[j]) + self.weight * self.penalty.evaluate(separation)
    }
}

/// Per-residue partner assignment and validity.
#[derive(Debug, Clone)]
pub struct PartnerTable {
    /// `partner[i]` is the chosen partner residue for `i`, meaningful only
    /// where `valid[i]` is true.
    pub partner: Vec<usize>,
    /// `valid[i]` is true iff residue `i` has a usable partner.
    pub valid: Vec<bool>,
}

/// Select a partner for every residue in a chain of length `effective_cb.len()`.
///
/// Residues `0` and `len - 1` are always invalid. If `len < 3` no residue
/// has both neighbours in range, so every residue is invalid (a too-short
/// chain; not an error).
#[must_use]
pub fn select_partners(effective_cb: &[DVec3], cost: PartnerCost) -> PartnerTable {
    let len = effective_cb.len();
    let mut partner = vec![0_usize; len];
    let mut valid = vec![false; len];

    if len < 3 {
        return PartnerTable { partner, valid };
    }

    for i in 0..len {
        if i == 0 || i == len - 1 {
            continue;
        }

        let mut best: Option<(usize, f64)> = None;
        for j in 1..(len - 1) {
            if j == i {
                continue;
            }
            let candidate_cost = cost.evaluate(effective_cb, i, j);
            let better = match best {
                None => true,
                Some((best_j, best_cost)) => {
                    if candidate_cost < best_cost {
                        true
                    } else if (candidate_cost - best_cost).abs() < f64::EPSILON {
                        // Tie-break: smallest |j - i|, then smallest j.
                        let candidate_sep = i.abs_diff(j);
                        let best_sep = i.abs_diff(best_j);
                        candidate_sep < best_sep || (candidate_sep == best_sep && j < best_j)
                    } else {
                        false
                    }
                }
            };
            if better {
                best = Some((j, candidate_cost));
            }
        }

        if let Some((j, _)) = best {
            partner[i] = j;
            valid[i] = true;
        }
    }

    PartnerTable { partner, valid }
}
