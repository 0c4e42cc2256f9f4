use burn::module::Module;
use burn::nn::{Linear, Relu};
use burn::prelude::*;
use burn::tensor::activation::tanh;
use rand::{rngs::StdRng, SeedableRng};

use super::actor::validate_sizes;
use super::init::{hidden_init, hidden_linear, reset_linear};
use super::multi_layer_perceptron::{MultiLayerPerceptron, MultiLayerPerceptronConfig};
use crate::error::{ModelError, ShapeMismatch};

#[derive(Config, Debug)]
pub struct CriticConfig {
    pub state_size: usize,
    pub action_size: usize,
    /// Seed of the generator that draws this model's initial parameters.
    pub seed: u64,
    #[config(default = "vec![64, 64]")]
    pub hidden_sizes: Vec<usize>,
}

/// Q network: the state is embedded by one layer, then joined with the action
/// before the remaining layers.
///
/// The output width is `action_size`, not a single scalar.
#[derive(Module, Debug)]
pub struct CriticModel<B: Backend> {
    state_layer: Linear<B>,
    head: MultiLayerPerceptron<B>,
    activation: Relu,
    state_size: usize,
    action_size: usize,
}

impl CriticConfig {
    pub fn validate(&self) -> Result<(), ModelError> {
        validate_sizes(self.state_size, self.action_size, &self.hidden_sizes)
    }

    /// Layers after the concatenation: `(h0 + action_size, h1, ..., action_size)`.
    fn head_config(&self) -> MultiLayerPerceptronConfig {
        let mut sizes = self.hidden_sizes.clone();
        sizes[0] += self.action_size;
        sizes.push(self.action_size);
        MultiLayerPerceptronConfig::new(sizes)
    }

    pub fn init<B: Backend>(&self, device: &B::Device) -> Result<CriticModel<B>, ModelError> {
        self.validate()?;
        let mut rng = StdRng::seed_from_u64(self.seed);
        let state_layer =
            hidden_linear::<B, _>(self.state_size, self.hidden_sizes[0], &mut rng, device);
        let head = self.head_config().init_with::<B, _>(&mut rng, device)?;
        tracing::debug!(
            state_size = self.state_size,
            action_size = self.action_size,
            hidden_sizes = ?self.hidden_sizes,
            seed = self.seed,
            "initialized critic"
        );
        Ok(CriticModel {
            state_layer,
            head,
            activation: Relu::new(),
            state_size: self.state_size,
            action_size: self.action_size,
        })
    }
}

impl<B: Backend> CriticModel<B> {
    /// Evaluate `state: [..., state_size]` and `action: [..., action_size]`
    /// with identical leading dims, giving `[..., action_size]` in `(-1, 1)`.
    pub fn forward<const D: usize>(
        &self,
        state: Tensor<B, D>,
        action: Tensor<B, D>,
    ) -> Result<Tensor<B, D>, ModelError> {
        let state_dims = state.dims();
        let action_dims = action.dims();
        ShapeMismatch::check_width("state", self.state_size, state_dims[D - 1])?;
        ShapeMismatch::check_width("action", self.action_size, action_dims[D - 1])?;
        if state_dims[..D - 1] != action_dims[..D - 1] {
            return Err(ShapeMismatch::BatchShape {
                state: state_dims[..D - 1].to_vec(),
                action: action_dims[..D - 1].to_vec(),
            }
            .into());
        }

        let x = self.activation.forward(self.state_layer.forward(state));
        let x = Tensor::cat(vec![x, action], D - 1);
        Ok(tanh(self.head.forward(x)))
    }

    /// Re-draw all parameters as a fresh construction with `seed` would.
    pub fn reset_parameters(self, seed: u64) -> Self {
        tracing::debug!(seed, "resetting critic parameters");
        let mut rng = StdRng::seed_from_u64(seed);
        let range = hidden_init(&self.state_layer);
        let state_layer = reset_linear(self.state_layer, range, &mut rng);
        let head = self.head.reset_parameters(&mut rng);
        CriticModel {
            state_layer,
            head,
            ..self
        }
    }

    pub fn state_size(&self) -> usize {
        self.state_size
    }

    pub fn action_size(&self) -> usize {
        self.action_size
    }

    pub fn state_layer(&self) -> &Linear<B> {
        &self.state_layer
    }

    pub fn head(&self) -> &MultiLayerPerceptron<B> {
        &self.head
    }

    /// Weight shapes in forward order, starting with the state layer.
    pub fn layer_shapes(&self) -> Vec<[usize; 2]> {
        let mut shapes = vec![self.state_layer.weight.val().dims()];
        shapes.extend(self.head.layer_shapes());
        shapes
    }
}

#[cfg(test)]
mod tests {
    use burn::backend::NdArray;
    use burn::tensor::Distribution;
    use expect_test::expect;

    use super::*;
    use crate::module::nn::testing::{float_values, parameters};

    type B = NdArray;

    fn small_critic(seed: u64) -> CriticModel<B> {
        CriticConfig::new(4, 2, seed)
            .with_hidden_sizes(vec![8, 8])
            .init(&Default::default())
            .unwrap()
    }

    fn random<const D: usize>(shape: [usize; D]) -> Tensor<B, D> {
        Tensor::random(shape, Distribution::Uniform(-1.0, 1.0), &Default::default())
    }

    #[test]
    fn test_forward_shape_and_layer_widths() {
        let critic = small_critic(0);
        let q = critic.forward(random([5, 4]), random([5, 2])).unwrap();
        assert_eq!(q.dims(), [5, 2]);

        expect!["[[4, 8], [10, 8], [8, 2]]"].assert_eq(&format!("{:?}", critic.layer_shapes()));
        assert_eq!(critic.state_layer().weight.val().dims()[1], 8);
        assert_eq!(critic.head().input_size(), 10);
    }

    #[test]
    fn test_single_state_action_vector() {
        let device = &Default::default();
        let critic = small_critic(8);
        let state = [0.2, -0.6, 0.1, 0.9];
        let action = [0.5, -0.5];
        let single = critic
            .forward(
                Tensor::<B, 1>::from_floats(state, device),
                Tensor::<B, 1>::from_floats(action, device),
            )
            .unwrap();
        assert_eq!(single.dims(), [2]);

        let batched = critic
            .forward(
                Tensor::<B, 2>::from_floats([state], device),
                Tensor::<B, 2>::from_floats([action], device),
            )
            .unwrap();
        for (a, b) in float_values(single).iter().zip(&float_values(batched)) {
            assert!((a - b).abs() < 1e-6);
        }

        let err = critic
            .forward(
                Tensor::<B, 1>::from_floats(state, device),
                Tensor::<B, 1>::from_floats([0.5, -0.5, 0.0], device),
            )
            .unwrap_err();
        expect!["shape mismatch: action has 3 features, expected 2"].assert_eq(&err.to_string());
    }

    #[test]
    fn test_config_hidden_sizes_untouched() {
        let hidden_sizes = vec![8, 8];
        let config = CriticConfig::new(4, 2, 0).with_hidden_sizes(hidden_sizes.clone());
        let _critic = config.init::<B>(&Default::default()).unwrap();
        let _again = config.init::<B>(&Default::default()).unwrap();
        assert_eq!(config.hidden_sizes, vec![8, 8]);
        assert_eq!(hidden_sizes, vec![8, 8]);
    }

    #[test]
    fn test_outputs_are_bounded() {
        for seed in 0..5 {
            let critic = small_critic(seed);
            let q = float_values(critic.forward(random([64, 4]), random([64, 2])).unwrap());
            assert!(q.iter().all(|v| -1.0 < *v && *v < 1.0));
        }
    }

    #[test]
    fn test_same_seed_same_parameters() {
        let first = small_critic(23);
        let _other = small_critic(24);
        let second = small_critic(23);
        assert_eq!(parameters(&first), parameters(&second));
        assert_ne!(parameters(&first), parameters(&small_critic(24)));
    }

    #[test]
    fn test_reset_parameters() {
        let reset = small_critic(1).reset_parameters(2);
        assert_eq!(parameters(&reset), parameters(&small_critic(2)));
    }

    #[test]
    fn test_batch_matches_single_rows() {
        let device = &Default::default();
        let critic = small_critic(4);
        let states = [[0.1, -0.4, 0.9, 0.0], [-1.0, 0.5, 0.25, -0.75]];
        let actions = [[0.2, -0.9], [0.0, 0.7]];
        let batch = float_values(
            critic
                .forward(
                    Tensor::<B, 2>::from_floats(states, device),
                    Tensor::<B, 2>::from_floats(actions, device),
                )
                .unwrap(),
        );
        for i in 0..states.len() {
            let single = float_values(
                critic
                    .forward(
                        Tensor::<B, 2>::from_floats([states[i]], device),
                        Tensor::<B, 2>::from_floats([actions[i]], device),
                    )
                    .unwrap(),
            );
            for (a, b) in single.iter().zip(&batch[i * 2..i * 2 + 2]) {
                assert!((a - b).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_initial_weight_ranges() {
        let critic = small_critic(6);
        let mut hidden = vec![critic.state_layer()];
        hidden.extend(critic.head().hidden_layers());
        for layer in hidden {
            let (low, high) = hidden_init(layer);
            assert!(float_values(layer.weight.val())
                .iter()
                .all(|&w| low as f32 <= w && w <= high as f32));
        }
        let out = critic.head().output_layer().unwrap();
        assert!(float_values(out.weight.val())
            .iter()
            .all(|w| w.abs() <= 3e-3));
    }

    #[test]
    fn test_shape_mismatches() {
        let critic = small_critic(0);

        let err = critic.forward(random([5, 4]), random([4, 2])).unwrap_err();
        expect!["shape mismatch: action batch dims [4] do not match state batch dims [5]"]
            .assert_eq(&err.to_string());

        let err = critic.forward(random([5, 4]), random([5, 3])).unwrap_err();
        expect!["shape mismatch: action has 3 features, expected 2"].assert_eq(&err.to_string());

        let err = critic.forward(random([5, 6]), random([5, 2])).unwrap_err();
        expect!["shape mismatch: state has 6 features, expected 4"].assert_eq(&err.to_string());
    }

    #[test]
    fn test_single_hidden_layer() {
        let critic = CriticConfig::new(4, 2, 0)
            .with_hidden_sizes(vec![16])
            .init::<B>(&Default::default())
            .unwrap();
        expect!["[[4, 16], [18, 2]]"].assert_eq(&format!("{:?}", critic.layer_shapes()));
        assert!(critic.head().hidden_layers().is_empty());
        let q = critic.forward(random([3, 4]), random([3, 2])).unwrap();
        assert_eq!(q.dims(), [3, 2]);
    }

    #[test]
    fn test_invalid_configuration() {
        let err = CriticConfig::new(4, 0, 0)
            .init::<B>(&Default::default())
            .unwrap_err();
        assert!(matches!(err, ModelError::InvalidConfiguration(_)));
    }
}
