use burn::{prelude::Backend, tensor::Tensor};

use crate::error::ModelError;
use crate::module::nn::{actor::ActorModel, critic::CriticModel};

/// Deterministic policy over a batch of observations.
pub trait Actor<B: Backend> {
    type OBatch;

    fn a_batch(&self, observations: &Self::OBatch) -> Result<Tensor<B, 2>, ModelError>;
}

/// State-action value estimate over a batch.
pub trait Critic<B: Backend> {
    type OBatch;
    type ABatch;

    fn q_batch(
        &self,
        observations: &Self::OBatch,
        actions: &Self::ABatch,
    ) -> Result<Tensor<B, 2>, ModelError>;
}

impl<B: Backend> Actor<B> for ActorModel<B> {
    type OBatch = Tensor<B, 2>;

    fn a_batch(&self, observations: &Self::OBatch) -> Result<Tensor<B, 2>, ModelError> {
        self.forward(observations.clone())
    }
}

impl<B: Backend> Critic<B> for CriticModel<B> {
    type OBatch = Tensor<B, 2>;
    type ABatch = Tensor<B, 2>;

    fn q_batch(
        &self,
        observations: &Self::OBatch,
        actions: &Self::ABatch,
    ) -> Result<Tensor<B, 2>, ModelError> {
        self.forward(observations.clone(), actions.clone())
    }
}

/// Value the critic assigns to the actor's own actions, `Q(s, μ(s))`.
pub fn policy_value<B, A, C>(
    actor: &A,
    critic: &C,
    observations: &Tensor<B, 2>,
) -> Result<Tensor<B, 2>, ModelError>
where
    B: Backend,
    A: Actor<B, OBatch = Tensor<B, 2>>,
    C: Critic<B, OBatch = Tensor<B, 2>, ABatch = Tensor<B, 2>>,
{
    let actions = actor.a_batch(observations)?;
    critic.q_batch(observations, &actions)
}
