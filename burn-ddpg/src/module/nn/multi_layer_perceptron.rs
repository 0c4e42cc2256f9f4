use burn::module::Module;
use burn::nn::{Linear, Relu};
use burn::prelude::*;
use rand::Rng;

use super::init::{hidden_linear, hidden_init, reset_linear, uniform_linear, OUTPUT_WEIGHT_RANGE};
use crate::error::ModelError;

/// Sizes of a ReLU perceptron as `(input size, hidden size, ..., output size)`.
#[derive(Config, Debug)]
pub struct MultiLayerPerceptronConfig {
    sizes: Vec<usize>,
}

/// Dense layers with a ReLU after every layer but the last.
///
/// Hidden weights are drawn from their [`hidden_init`] range and the output
/// weights from [`OUTPUT_WEIGHT_RANGE`].
#[derive(Module, Debug)]
pub struct MultiLayerPerceptron<B: Backend> {
    linear_layers: Vec<Linear<B>>,
    activation: Relu,
}

impl MultiLayerPerceptronConfig {
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.sizes.len() < 2 {
            return Err(ModelError::InvalidConfiguration(format!(
                "expected (input size, hidden size, ..., output size), got {:?}",
                self.sizes
            )));
        }
        if self.sizes.contains(&0) {
            return Err(ModelError::InvalidConfiguration(format!(
                "layer sizes must be positive, got {:?}",
                self.sizes
            )));
        }
        Ok(())
    }

    pub fn init_with<B: Backend, R: Rng>(
        &self,
        rng: &mut R,
        device: &B::Device,
    ) -> Result<MultiLayerPerceptron<B>, ModelError> {
        self.validate()?;

        let n_layers = self.sizes.len() - 1;
        let linear_layers = self
            .sizes
            .windows(2)
            .enumerate()
            .map(|(i, pair)| {
                if i + 1 == n_layers {
                    uniform_linear::<B, _>(pair[0], pair[1], OUTPUT_WEIGHT_RANGE, rng, device)
                } else {
                    hidden_linear::<B, _>(pair[0], pair[1], rng, device)
                }
            })
            .collect();

        Ok(MultiLayerPerceptron {
            linear_layers,
            activation: Relu::new(),
        })
    }
}

impl<B: Backend> MultiLayerPerceptron<B> {
    pub fn forward<const D: usize>(&self, input: Tensor<B, D>) -> Tensor<B, D> {
        let mut x = input;

        match self.linear_layers.split_last() {
            Some((out, hidden)) => {
                for layer in hidden {
                    x = layer.forward(x);
                    x = self.activation.forward(x);
                }
                out.forward(x)
            }
            None => x,
        }
    }

    /// Re-draw every parameter from `rng`, in the same order as construction.
    pub fn reset_parameters<R: Rng>(self, rng: &mut R) -> Self {
        let n_layers = self.linear_layers.len();
        let linear_layers = self
            .linear_layers
            .into_iter()
            .enumerate()
            .map(|(i, layer)| {
                let range = if i + 1 == n_layers {
                    OUTPUT_WEIGHT_RANGE
                } else {
                    hidden_init(&layer)
                };
                reset_linear(layer, range, rng)
            })
            .collect();
        MultiLayerPerceptron {
            linear_layers,
            activation: self.activation,
        }
    }

    pub fn input_size(&self) -> usize {
        self.layer_shapes().first().map_or(0, |shape| shape[0])
    }

    pub fn hidden_layers(&self) -> &[Linear<B>] {
        self.linear_layers
            .split_last()
            .map_or(&[][..], |(_, hidden)| hidden)
    }

    pub fn output_layer(&self) -> Option<&Linear<B>> {
        self.linear_layers.last()
    }

    /// Weight shapes `[fan_in, fan_out]` in forward order.
    pub fn layer_shapes(&self) -> Vec<[usize; 2]> {
        self.linear_layers
            .iter()
            .map(|layer| layer.weight.val().dims())
            .collect()
    }
}
