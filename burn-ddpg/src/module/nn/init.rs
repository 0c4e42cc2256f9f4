use burn::module::Param;
use burn::nn::{Initializer, Linear, LinearConfig};
use burn::prelude::*;
use burn::tensor::TensorData;
use rand::distributions::Uniform;
use rand::Rng;

/// Weight range of the final layer of both models. Keeps the initial
/// outputs close to zero, well inside the linear region of `tanh`.
pub const OUTPUT_WEIGHT_RANGE: (f64, f64) = (-3e-3, 3e-3);

/// Symmetric initialization range `(-1/sqrt(fan_in), 1/sqrt(fan_in))` for a
/// hidden layer, where `fan_in` is the number of rows of its weight matrix.
pub fn hidden_init<B: Backend>(layer: &Linear<B>) -> (f64, f64) {
    fan_in_range(layer.weight.val().dims()[0])
}

fn fan_in_range(fan_in: usize) -> (f64, f64) {
    let limit = 1.0 / (fan_in as f64).sqrt();
    (-limit, limit)
}

fn uniform_tensor<B: Backend, const D: usize, R: Rng>(
    shape: [usize; D],
    range: (f64, f64),
    rng: &mut R,
    device: &B::Device,
) -> Tensor<B, D> {
    let distribution = Uniform::new(range.0 as f32, range.1 as f32);
    let values: Vec<f32> = (0..shape.iter().product::<usize>())
        .map(|_| rng.sample(distribution))
        .collect();
    Tensor::from_data(TensorData::new(values, shape), device)
}

/// Refill `layer` from `rng`, keeping its parameter ids.
///
/// Weights are drawn uniformly from `weight_range`. Biases follow the usual
/// dense-layer default of `(-1/sqrt(fan_in), 1/sqrt(fan_in))`, drawn from the
/// same generator so the whole layer is reproducible from one seed.
pub fn reset_linear<B: Backend, R: Rng>(
    mut layer: Linear<B>,
    weight_range: (f64, f64),
    rng: &mut R,
) -> Linear<B> {
    let weight = layer.weight.val();
    let device = weight.device();
    let [fan_in, fan_out] = weight.dims();

    layer.weight = Param::initialized(
        layer.weight.id,
        uniform_tensor([fan_in, fan_out], weight_range, rng, &device),
    );
    layer.bias = layer.bias.map(|bias| {
        Param::initialized(
            bias.id,
            uniform_tensor([fan_out], fan_in_range(fan_in), rng, &device),
        )
    });
    layer
}

/// Build a `fan_in -> fan_out` dense layer whose weights are uniform in
/// `weight_range`. See [`reset_linear`].
pub fn uniform_linear<B: Backend, R: Rng>(
    fan_in: usize,
    fan_out: usize,
    weight_range: (f64, f64),
    rng: &mut R,
    device: &B::Device,
) -> Linear<B> {
    // Zeros only allocates the layer; every parameter is redrawn below.
    let layer = LinearConfig::new(fan_in, fan_out)
        .with_initializer(Initializer::Zeros)
        .init(device);
    reset_linear(layer, weight_range, rng)
}

/// Build a hidden layer with weights in its [`hidden_init`] range.
pub fn hidden_linear<B: Backend, R: Rng>(
    fan_in: usize,
    fan_out: usize,
    rng: &mut R,
    device: &B::Device,
) -> Linear<B> {
    uniform_linear(fan_in, fan_out, fan_in_range(fan_in), rng, device)
}
