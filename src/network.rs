//! Small feed-forward embedding network.
//!
//! Maps a ten-feature descriptor to a two-dimensional embedding. Dimensions
//! are validated once, at [`crate::asset::Asset::load`] time; [`Network::forward`]
//! trusts those pre-validated shapes and only guards against non-finite
//! propagation.

use crate::error::CoreError;
use crate::features::FEATURE_COUNT;

/// Supported activation functions, tagged as in the asset format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// `f(x) = x`.
    Identity,
    /// `f(x) = max(0, x)`.
    Relu,
    /// `f(x) = tanh(x)`.
    Tanh,
    /// `f(x) = 1 / (1 + e^-x)`.
    Sigmoid,
    /// `f(x_k) = e^{x_k} / sum_j e^{x_j}`.
    Softmax,
}

impl Activation {
    fn apply(self, x: &mut [f64]) {
        match self {
            Self::Identity => {}
            Self::Relu => {
                for v in x.iter_mut() {
                    *v = v.max(0.0);
                }
            }
            Self::Tanh => {
                for v in x.iter_mut() {
                    *v = v.tanh();
                }
            }
            Self::Sigmoid => {
                for v in x.iter_mut() {
                    *v = 1.0 / (1.0 + (-*v).exp());
                }
            }
            Self::Softmax => {
                let max = x.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                let mut sum = 0.0;
                for v in x.iter_mut() {
                    *v = (*v - max).exp();
                    sum += *v;
                }
                if sum > 0.0 {
                    for v in x.iter_mut() {
                        *v /= sum;
                    }
                }
            }
        }
    }
}

/// One fully-connected layer: `y = activation(W * x + b)`.
#[derive(Debug, Clone)]
pub struct Layer {
    /// Output dimension (number of rows of `W`).
    pub rows: usize,
    /// Input dimension (number of columns of `W`).
    pub cols: usize,
    /// Row-major weight matrix, `rows * cols` entries.
    pub weights: Vec<f64>,
    /// Bias vector, `rows` entries.
    pub biases: Vec<f64>,
    /// Activation applied after the affine transform.
    pub activation: Activation,
}

impl Layer {
    fn forward_into(&self, input: &[f64], output: &mut Vec<f64>) {
        output.clear();
        output.extend(self.biases.iter().copied());
        for (row, out) in output.iter_mut().enumerate() {
            let row_start = row * self.cols;
            let row_weights = &self.weights[row_start..row_start + self.cols];
            let mut acc = 0.0;
            for (w, x) in row_weights.iter().zip(input.iter()) {
                acc += w * x;
            }
            *out += acc;
        }
        self.activation.apply(output);
    }
}

/// A stack of fully-connected layers mapping a [`FEATURE_COUNT`]-dimensional
/// input to an `E`-dimensional embedding, where `E` is declared by the
/// asset.
#[derive(Debug, Clone)]
pub struct Network {
    layers: Vec<Layer>,
}

/// Reusable buffers for [`Network::forward`].
///
/// Sized once to the network's largest layer width and reused across every
/// residue in a chain, so the per-residue inner loop performs no dynamic
/// allocation.
#[derive(Debug, Clone)]
pub struct ForwardScratch {
    current: Vec<f64>,
    next: Vec<f64>,
}

impl ForwardScratch {
    /// Allocate scratch buffers sized to `network`'s widest layer.
    #[must_use]
    pub fn new(network: &Network) -> Self {
        let max_width = network
            .layers
            .iter()
            .flat_map(|layer| [layer.cols, layer.rows])
            .chain(std::iter::once(FEATURE_COUNT))
            .max()
            .unwrap_or(FEATURE_COUNT);
        Self {
            current: Vec::with_capacity(max_width),
            next: Vec::with_capacity(max_width),
        }
    }
}

impl Network {
    /// Build a network from a validated list of layers.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::AssetMalformed`] if the first layer's input
    /// dimension does not match [`FEATURE_COUNT`], if any layer's declared
    /// row/column counts disagree with the length of its weight/bias
    /// buffers, or if consecutive layers' dimensions do not chain (layer
    /// `k`'s `rows` must equal layer `k + 1`'s `cols`).
    pub fn new(layers: Vec<Layer>) -> Result<Self, CoreError> {
        let Some(first) = layers.first() else {
            return Err(CoreError::AssetMalformed(
                "network has no layers".to_owned(),
            ));
        };
        if first.cols != FEATURE_COUNT {
            return Err(CoreError::AssetMalformed(format!(
                "first layer expects {} inputs, got {}",
                FEATURE_COUNT, first.cols
            )));
        }
        for (idx, layer) in layers.iter().enumerate() {
            if layer.weights.len() != layer.rows * layer.cols {
                return Err(CoreError::AssetMalformed(format!(
                    "layer {idx} weight buffer has {} entries, expected {}",
                    layer.weights.len(),
                    layer.rows * layer.cols
                )));
            }
            if layer.biases.len() != layer.rows {
                return Err(CoreError::AssetMalformed(format!(
                    "layer {idx} bias buffer has {} entries, expected {}",
                    layer.biases.len(),
                    layer.rows
                )));
            }
            if idx > 0 && layers[idx - 1].rows != layer.cols {
                return Err(CoreError::AssetMalformed(format!(
                    "layer {idx} expects {} inputs but layer {} produces {}",
                    layer.cols,
                    idx - 1,
                    layers[idx - 1].rows
                )));
            }
        }
        Ok(Self { layers })
    }

    /// Output dimension of the final layer.
    #[must_use]
    pub fn output_dim(&self) -> usize {
        self.layers.last().map_or(0, |l| l.rows)
    }

    /// Expose the underlying layers for asset serialization.
    ///
    /// Not intended for numerical use outside [`crate::asset::Asset::to_bytes`] —
    /// [`Network::forward`] is the only supported way to evaluate the network.
    #[must_use]
    pub fn layers_for_serialization(&self) -> &[Layer] {
        &self.layers
    }

    /// Evaluate the network on a feature descriptor.
    ///
    /// `scratch` holds the intermediate per-layer activations and is reused
    /// across calls (one [`ForwardScratch`] per chain, not per residue) so
    /// this performs no dynamic allocation once `scratch` has grown to the
    /// network's widest layer.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::AssetMalformed`] only in the unreachable case
    /// that `self.layers` is empty (guarded against at construction in
    /// [`Network::new`]); also returns an error rather than panicking if
    /// activations ever produce a non-finite value, since upstream inputs
    /// are guaranteed finite and a non-finite output indicates an
    /// inconsistent asset, not a bad call.
    pub fn forward<'s>(
        &self,
        input: &[f64; FEATURE_COUNT],
        scratch: &'s mut ForwardScratch,
    ) -> Result<&'s [f64], CoreError> {
        scratch.current.clear();
        scratch.current.extend_from_slice(input);
        for layer in &self.layers {
            layer.forward_into(&scratch.current, &mut scratch.next);
            std::mem::swap(&mut scratch.current, &mut scratch.next);
        }
        if scratch.current.iter().any(|v| !v.is_finite()) {
            return Err(CoreError::AssetMalformed(
                "network produced a non-finite embedding".to_owned(),
            ));
        }
        Ok(&scratch.current)
    }
}
