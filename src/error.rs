//! Crate-level error types.

use std::fmt;

/// Errors produced by the `tridi-core` crate.
#[derive(Debug)]
pub enum CoreError {
    /// The model asset could not be parsed, or has inconsistent dimensions.
    AssetMalformed(String),
    /// The four input coordinate arrays do not share a common length.
    InputShapeMismatch {
        /// Length of the Cα array.
        ca: usize,
        /// Length of the N array.
        n: usize,
        /// Length of the C array.
        c: usize,
        /// Length of the Cβ array.
        cb: usize,
    },
    /// Coincident atoms prevented a unit-vector construction for a residue.
    ///
    /// Always caught within [`crate::driver::encode`] and downgraded to an
    /// invalid residue state; exposed here only so geometry helpers have a
    /// typed failure to return.
    DegenerateGeometry {
        /// Index of the residue whose local geometry degenerated.
        residue: usize,
    },
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AssetMalformed(msg) => write!(f, "asset malformed: {msg}"),
            Self::InputShapeMismatch { ca, n, c, cb } => {
                write!(f, "input shape mismatch: ca={ca} n={n} c={c} cb={cb}")
            }
            Self::DegenerateGeometry { residue } => {
                write!(f, "degenerate geometry at residue {residue}")
            }
        }
    }
}

impl std::error::Error for CoreError {}
