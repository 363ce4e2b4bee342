//! Errors in the library.
use thiserror::Error;

/// Errors in the library.
#[derive(Error, Debug)]
pub enum EnvPipeError {
    /// The action-meaning table of the wrapped environment does not declare
    /// the action a wrapper relies on.
    #[error("Action {index} is expected to be {expected:?}, but the environment declares {found:?}")]
    ActionMeaning {
        /// Index of the action.
        index: usize,
        /// Label the wrapper requires.
        expected: String,
        /// Label declared by the environment, if any.
        found: Option<String>,
    },

    /// The environment declares fewer actions than a wrapper needs.
    #[error("At least {required} actions are required, but the environment declares {found}")]
    TooFewActions {
        /// The number of actions the wrapper needs.
        required: usize,
        /// The number of actions declared by the environment.
        found: usize,
    },

    /// An observation does not have the expected shape.
    #[error("Shape mismatch: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        /// The declared shape.
        expected: Vec<usize>,
        /// The actual shape.
        found: Vec<usize>,
    },

    /// A wrapper was given an invalid parameter.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Info key error.
    #[error("Info key error: {0}")]
    InfoKeyError(String),

    /// Info value type error.
    #[error("Info value type error: {0}")]
    InfoValueTypeError(String),
}
