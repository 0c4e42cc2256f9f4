//! Actor and critic networks for deterministic policy gradient methods.
//!
//! ```no_run
//! use burn::backend::NdArray;
//! use burn::prelude::*;
//! use burn_ddpg::module::nn::{actor::ActorConfig, critic::CriticConfig};
//!
//! let device = Default::default();
//! let actor = ActorConfig::new(4, 2, 0).init::<NdArray>(&device)?;
//! let critic = CriticConfig::new(4, 2, 0).init::<NdArray>(&device)?;
//!
//! let state = Tensor::<NdArray, 2>::zeros([5, 4], &device);
//! let action = actor.forward(state.clone())?;
//! let q = critic.forward(state, action)?;
//! assert_eq!(q.dims(), [5, 2]);
//! # Ok::<(), burn_ddpg::error::ModelError>(())
//! ```

pub mod error;
pub mod module;
