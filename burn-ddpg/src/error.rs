/// Errors raised while building or evaluating the actor and critic models.
///
/// Both kinds are programmer errors: the caller either passed a bad
/// architecture to a config or fed tensors of the wrong shape to `forward`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    #[error("shape mismatch: {0}")]
    ShapeMismatch(#[from] ShapeMismatch),

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShapeMismatch {
    /// The last (feature) dimension of an input differs from the configured size.
    #[error("{input} has {actual} features, expected {expected}")]
    FeatureWidth {
        input: &'static str,
        expected: usize,
        actual: usize,
    },

    /// The leading (batch) dimensions of action and state differ.
    #[error("action batch dims {action:?} do not match state batch dims {state:?}")]
    BatchShape {
        state: Vec<usize>,
        action: Vec<usize>,
    },
}

impl ShapeMismatch {
    pub(crate) fn check_width(
        input: &'static str,
        expected: usize,
        actual: usize,
    ) -> Result<(), ModelError> {
        if expected == actual {
            Ok(())
        } else {
            Err(ShapeMismatch::FeatureWidth {
                input,
                expected,
                actual,
            }
            .into())
        }
    }
}
