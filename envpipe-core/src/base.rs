//! Core functionalities.
mod env;
mod step;
pub use env::Env;
use ndarray::ArrayD;
use std::fmt::Debug;
pub use step::Step;

/// An observation of an environment.
///
/// Observations are produced fresh by the innermost environment at every step.
/// Each wrapper either passes it through or builds a new owned value.
pub trait Obs: Debug {}

impl<T: Debug> Obs for ArrayD<T> {}

/// An action of an environment.
///
/// Actions are opaque to the pipeline. Wrappers that need to issue a fixed
/// action, like a no-op, require `Act: From<u8>` and use the action index.
pub trait Act: Clone + Debug {}
