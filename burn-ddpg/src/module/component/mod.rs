mod abc;

pub use abc::{policy_value, Actor, Critic};
