use burn::module::Module;
use burn::prelude::*;
use burn::tensor::activation::tanh;
use rand::{rngs::StdRng, SeedableRng};

use super::multi_layer_perceptron::{MultiLayerPerceptron, MultiLayerPerceptronConfig};
use crate::error::{ModelError, ShapeMismatch};

#[derive(Config, Debug)]
pub struct ActorConfig {
    pub state_size: usize,
    pub action_size: usize,
    /// Seed of the generator that draws this model's initial parameters.
    pub seed: u64,
    #[config(default = "vec![64, 64]")]
    pub hidden_sizes: Vec<usize>,
}

/// Deterministic policy network: `state -> tanh(mlp(state))`.
#[derive(Module, Debug)]
pub struct ActorModel<B: Backend> {
    mlp: MultiLayerPerceptron<B>,
    state_size: usize,
    action_size: usize,
}

impl ActorConfig {
    pub fn validate(&self) -> Result<(), ModelError> {
        validate_sizes(self.state_size, self.action_size, &self.hidden_sizes)
    }

    fn mlp_config(&self) -> MultiLayerPerceptronConfig {
        let mut sizes = Vec::with_capacity(self.hidden_sizes.len() + 2);
        sizes.push(self.state_size);
        sizes.extend_from_slice(&self.hidden_sizes);
        sizes.push(self.action_size);
        MultiLayerPerceptronConfig::new(sizes)
    }

    pub fn init<B: Backend>(&self, device: &B::Device) -> Result<ActorModel<B>, ModelError> {
        self.validate()?;
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mlp = self.mlp_config().init_with::<B, _>(&mut rng, device)?;
        tracing::debug!(
            state_size = self.state_size,
            action_size = self.action_size,
            hidden_sizes = ?self.hidden_sizes,
            seed = self.seed,
            "initialized actor"
        );
        Ok(ActorModel {
            mlp,
            state_size: self.state_size,
            action_size: self.action_size,
        })
    }
}

/// Checks shared by the actor and critic configurations.
pub(crate) fn validate_sizes(
    state_size: usize,
    action_size: usize,
    hidden_sizes: &[usize],
) -> Result<(), ModelError> {
    if state_size == 0 || action_size == 0 {
        return Err(ModelError::InvalidConfiguration(format!(
            "state_size and action_size must be positive, got {state_size} and {action_size}"
        )));
    }
    if hidden_sizes.is_empty() {
        return Err(ModelError::InvalidConfiguration(
            "hidden_sizes must not be empty".into(),
        ));
    }
    if hidden_sizes.contains(&0) {
        return Err(ModelError::InvalidConfiguration(format!(
            "hidden sizes must be positive, got {hidden_sizes:?}"
        )));
    }
    Ok(())
}

impl<B: Backend> ActorModel<B> {
    /// Map states of shape `[..., state_size]` to actions of shape
    /// `[..., action_size]`, every component in `(-1, 1)`.
    pub fn forward<const D: usize>(&self, state: Tensor<B, D>) -> Result<Tensor<B, D>, ModelError> {
        ShapeMismatch::check_width("state", self.state_size, state.dims()[D - 1])?;
        Ok(tanh(self.mlp.forward(state)))
    }

    /// Re-draw all parameters as a fresh construction with `seed` would.
    pub fn reset_parameters(self, seed: u64) -> Self {
        tracing::debug!(seed, "resetting actor parameters");
        let mlp = self.mlp.reset_parameters(&mut StdRng::seed_from_u64(seed));
        ActorModel { mlp, ..self }
    }

    pub fn state_size(&self) -> usize {
        self.state_size
    }

    pub fn action_size(&self) -> usize {
        self.action_size
    }

    pub fn layer_shapes(&self) -> Vec<[usize; 2]> {
        self.mlp.layer_shapes()
    }

    pub fn mlp(&self) -> &MultiLayerPerceptron<B> {
        &self.mlp
    }
}
