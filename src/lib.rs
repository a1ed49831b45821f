// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits (thresholds in clippy.toml)
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Geometric feature extraction and embedding core for the 3Di structural
//! alphabet.
//!
//! Translates a protein backbone — Cα, N, C, and (possibly missing) Cβ
//! coordinates, one entry per residue — into a one-dimensional string over
//! a small discrete alphabet, enabling downstream sequence-based similarity
//! search over structures.
//!
//! # Key entry points
//!
//! - [`asset::Asset::load`] — parse the frozen binary model asset (network
//!   weights, centroids, geometric constants).
//! - [`driver::encode`] — run the full per-chain pipeline against a loaded
//!   asset and a set of borrowed coordinate arrays.
//!
//! # Architecture
//!
//! [`driver::encode`] orchestrates, per residue: virtual-center synthesis
//! ([`virtual_center`]) where Cβ is missing, partner selection
//! ([`partner`]) under a composite distance/sequence-separation cost,
//! fixed-length feature extraction ([`features`]), a small feed-forward
//! embedding network ([`network`]), and nearest-centroid quantisation
//! ([`quantizer`]). PDB/mmCIF parsing, on-disk database writers, CLI
//! argument parsing, and symbol-to-character mapping are all external
//! collaborators — this crate is a pure function from coordinate arrays to
//! a state array plus per-residue validity flags.

pub mod asset;
pub mod driver;
pub mod error;
pub mod features;
pub mod geometry;
pub mod network;
pub mod partner;
pub mod quantizer;
pub mod virtual_center;
