//! Parser for the frozen, versioned binary model asset.
//!
//! Layout, all numbers little-endian:
//!
//! ```text
//! magic:    u32   = MAGIC
//! version:  u32   = CURRENT_VERSION
//! width:    u8    = 0 (f64) | 1 (f32) — on-disk float width
//! f:        u32   feature count, must equal FEATURE_COUNT
//! e:        u32   embedding dimension
//! k:        u32   centroid count
//! alpha_deg, beta_deg, bond_length, seq_weight, seq_d_max: width-typed floats
//! centroids: k * e width-typed floats, row-major
//! layer_count: u32
//! per layer: rows: u32, cols: u32, activation: u8,
//!            weights: rows * cols width-typed floats, row-major,
//!            biases: rows width-typed floats
//! ```
//!
//! The loader fully materialises every layer and the centroid table into
//! contiguous `Vec<f64>` buffers in a single validated pass: partial data
//! is rejected outright rather than lazily loaded. On-disk values may be declared `f32` (the
//! reader widens them to `f64` as they're read); internal arithmetic is
//! always `f64` regardless of declared width.

use std::io::Cursor;

use byteorder::{LittleEndian, ReadBytesExt};

use crate::error::CoreError;
use crate::features::FEATURE_COUNT;
use crate::network::{Activation, Layer, Network};
use crate::partner::{PartnerCost, SeparationPenalty};
use crate::virtual_center::VirtualCenterParams;

/// Magic number identifying a `tridi-core` asset blob.
const MAGIC: u32 = 0x3344_4931; // "3DI1" read as a little-endian u32.
/// The only asset format version this crate understands.
const CURRENT_VERSION: u32 = 1;

/// On-disk float width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Width {
    F64,
    F32,
}

impl Width {
    fn from_tag(tag: u8) -> Result<Self, CoreError> {
        match tag {
            0 => Ok(Self::F64),
            1 => Ok(Self::F32),
            other => Err(CoreError::AssetMalformed(format!(
                "unknown float width tag {other}"
            ))),
        }
    }

    fn tag(self) -> u8 {
        match self {
            Self::F64 => 0,
            Self::F32 => 1,
        }
    }
}

/// Header fields shared by the geometric and partner-selection stages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssetHeader {
    /// Asset format version.
    pub version: u32,
    /// Declared feature count (must equal [`FEATURE_COUNT`] to load).
    pub feature_count: usize,
    /// Embedding dimension produced by the network.
    pub embedding_dim: usize,
    /// Number of centroids (alphabet size `K`).
    pub centroid_count: usize,
    /// Virtual-center synthesis parameters.
    pub virtual_center: VirtualCenterParams,
    /// Partner-selection composite cost.
    pub partner_cost: PartnerCost,
}

/// The immutable, shared model asset: network layers plus the centroid
/// table, loaded once per process.
#[derive(Debug, Clone)]
pub struct Asset {
    /// Metadata and geometric constants.
    pub header: AssetHeader,
    /// The embedding network.
    pub network: Network,
    /// `K` centroids, each of length `header.embedding_dim`.
    pub centroids: Vec<Vec<f64>>,
}

struct Reader<'a> {
    cursor: Cursor<&'a [u8]>,
    width: Width,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(bytes),
            width: Width::F64,
        }
    }

    fn u32(&mut self) -> Result<u32, CoreError> {
        self.cursor
            .read_u32::<LittleEndian>()
            .map_err(|e| CoreError::AssetMalformed(format!("truncated u32: {e}")))
    }

    fn u8(&mut self) -> Result<u8, CoreError> {
        self.cursor
            .read_u8()
            .map_err(|e| CoreError::AssetMalformed(format!("truncated u8: {e}")))
    }

    fn float(&mut self) -> Result<f64, CoreError> {
        match self.width {
            Width::F64 => self
                .cursor
                .read_f64::<LittleEndian>()
                .map_err(|e| CoreError::AssetMalformed(format!("truncated f64: {e}"))),
            Width::F32 => self
                .cursor
                .read_f32::<LittleEndian>()
                .map(f64::from)
                .map_err(|e| CoreError::AssetMalformed(format!("truncated f32: {e}"))),
        }
    }

    fn floats(&mut self, count: usize) -> Result<Vec<f64>, CoreError> {
        (0..count).map(|_| self.float()).collect()
    }
}

impl Asset {
    /// Parse and fully validate a model asset from its binary representation.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::AssetMalformed`] on bad magic/version, an
    /// unsupported float width tag, truncated data, or any dimension
    /// mismatch between declared and actual layer/centroid sizes.
    pub fn load(bytes: &[u8]) -> Result<Self, CoreError> {
        let mut reader = Reader::new(bytes);

        let magic = reader.u32()?;
        if magic != MAGIC {
            return Err(CoreError::AssetMalformed(format!(
                "bad magic: expected {MAGIC:#010x}, got {magic:#010x}"
            )));
        }
        let version = reader.u32()?;
        if version != CURRENT_VERSION {
            return Err(CoreError::AssetMalformed(format!(
                "unsupported asset version {version}"
            )));
        }
        reader.width = Width::from_tag(reader.u8()?)?;

        let feature_count = reader.u32()? as usize;
        if feature_count != FEATURE_COUNT {
            return Err(CoreError::AssetMalformed(format!(
                "asset declares {feature_count} features, crate expects {FEATURE_COUNT}"
            )));
        }
        let embedding_dim = reader.u32()? as usize;
        let centroid_count = reader.u32()? as usize;

        let alpha_deg = reader.float()?;
        let beta_deg = reader.float()?;
        let bond_length = reader.float()?;
        let seq_weight = reader.float()?;
        let seq_d_max = reader.float()?;

        let mut centroids = Vec::with_capacity(centroid_count);
        for _ in 0..centroid_count {
            centroids.push(reader.floats(embedding_dim)?);
        }

        let layer_count = reader.u32()? as usize;
        let mut layers = Vec::with_capacity(layer_count);
        for _ in 0..layer_count {
            let rows = reader.u32()? as usize;
            let cols = reader.u32()? as usize;
            let activation = match reader.u8()? {
                0 => Activation::Identity,
                1 => Activation::Relu,
                2 => Activation::Tanh,
                3 => Activation::Sigmoid,
                4 => Activation::Softmax,
                other => {
                    return Err(CoreError::AssetMalformed(format!(
                        "unknown activation tag {other}"
                    )))
                }
            };
            let weights = reader.floats(rows * cols)?;
            let biases = reader.floats(rows)?;
            layers.push(Layer {
                rows,
                cols,
                weights,
                biases,
                activation,
            });
        }

        let network = Network::new(layers)?;
        if network.output_dim() != embedding_dim {
            return Err(CoreError::AssetMalformed(format!(
                "network outputs {} dims, asset declares embedding_dim {embedding_dim}",
                network.output_dim()
            )));
        }
        for (idx, centroid) in centroids.iter().enumerate() {
            if centroid.len() != embedding_dim {
                return Err(CoreError::AssetMalformed(format!(
                    "centroid {idx} has {} components, expected {embedding_dim}",
                    centroid.len()
                )));
            }
        }

        let header = AssetHeader {
            version,
            feature_count,
            embedding_dim,
            centroid_count,
            virtual_center: VirtualCenterParams {
                alpha_deg,
                beta_deg,
                bond_length,
            },
            partner_cost: PartnerCost {
                weight: seq_weight,
                penalty: SeparationPenalty::ClippedLinear { d_max: seq_d_max },
            },
        };

        log::debug!(
            "loaded 3Di asset: version={version} k={centroid_count} e={embedding_dim} layers={layer_count}"
        );

        Ok(Self {
            header,
            network,
            centroids,
        })
    }

    /// Serialise this asset back to its binary representation, always using
    /// `f64` on-disk width. Used by the asset round-trip tests and available
    /// to callers that train or transcode assets outside this crate.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend(MAGIC.to_le_bytes());
        out.extend(CURRENT_VERSION.to_le_bytes());
        out.push(Width::F64.tag());
        out.extend((self.header.feature_count as u32).to_le_bytes());
        out.extend((self.header.embedding_dim as u32).to_le_bytes());
        out.extend((self.header.centroid_count as u32).to_le_bytes());
        out.extend(self.header.virtual_center.alpha_deg.to_le_bytes());
        out.extend(self.header.virtual_center.beta_deg.to_le_bytes());
        out.extend(self.header.virtual_center.bond_length.to_le_bytes());
        out.extend(self.header.partner_cost.weight.to_le_bytes());
        let SeparationPenalty::ClippedLinear { d_max } = self.header.partner_cost.penalty;
        out.extend(d_max.to_le_bytes());

        for centroid in &self.centroids {
            for v in centroid {
                out.extend(v.to_le_bytes());
            }
        }

        // Layers are reconstructed one at a time from `self.network`'s
        // internal state via its public accessor.
        let layers = self.network.layers_for_serialization();
        out.extend((layers.len() as u32).to_le_bytes());
        for layer in layers {
            out.extend((layer.rows as u32).to_le_bytes());
            out.extend((layer.cols as u32).to_le_bytes());
            out.push(activation_tag(layer.activation));
            for w in &layer.weights {
                out.extend(w.to_le_bytes());
            }
            for b in &layer.biases {
                out.extend(b.to_le_bytes());
            }
        }

        out
    }
}

fn activation_tag(activation: Activation) -> u8 {
    match activation {
        Activation::Identity => 0,
        Activation::Relu => 1,
        Activation::Tanh => 2,
        Activation::Sigmoid => 3,
        Activation::Softmax => 4,
    }
}
