//! Environment.
use super::{Act, Obs, Step};
use anyhow::Result;

/// Represents an environment, typically an MDP, or a wrapper around one.
///
/// This is the capability both consumed and re-exposed by every wrapper in a
/// pipeline. `reset` and `step` descend from the outermost wrapper to the
/// innermost environment and the results ascend back out, each layer
/// transforming them on the way.
///
/// Errors of the innermost environment are propagated unchanged; no wrapper
/// catches or retries them.
pub trait Env {
    /// Observation of the environment.
    type Obs: Obs;

    /// Action of the environment.
    type Act: Act;

    /// Resets the environment and returns the initial observation.
    fn reset(&mut self, seed: Option<u64>) -> Result<Self::Obs>;

    /// Performes an environment step.
    fn step(&mut self, act: &Self::Act) -> Result<Step<Self::Obs>>;

    /// Shape of the observations returned by [`Env::reset`] and [`Env::step`].
    fn observation_shape(&self) -> Vec<usize>;

    /// Labels of the discrete actions, ordered by action index.
    ///
    /// Labels follow the Atari convention, e.g., `"NOOP"` and `"FIRE"`.
    fn action_meanings(&self) -> Vec<String>;

    /// The number of remaining lives.
    ///
    /// Environments without a life concept report a constant.
    fn lives(&self) -> u32 {
        1
    }

    /// Sets training (`true`) or evaluation (`false`) mode.
    ///
    /// A wrapper stores the flag and forwards the call to the environment it
    /// wraps, so toggling the outermost wrapper sets the whole chain.
    /// Raw environments ignore it.
    fn set_training(&mut self, _training: bool) {}

    /// Returns `true` in training mode.
    fn is_training(&self) -> bool {
        true
    }
}

impl<E: Env + ?Sized> Env for Box<E> {
    type Obs = E::Obs;
    type Act = E::Act;

    fn reset(&mut self, seed: Option<u64>) -> Result<Self::Obs> {
        (**self).reset(seed)
    }

    fn step(&mut self, act: &Self::Act) -> Result<Step<Self::Obs>> {
        (**self).step(act)
    }

    fn observation_shape(&self) -> Vec<usize> {
        (**self).observation_shape()
    }

    fn action_meanings(&self) -> Vec<String> {
        (**self).action_meanings()
    }

    fn lives(&self) -> u32 {
        (**self).lives()
    }

    fn set_training(&mut self, training: bool) {
        (**self).set_training(training)
    }

    fn is_training(&self) -> bool {
        (**self).is_training()
    }
}

/// Generates the capabilities a wrapper forwards unchanged to the environment it wraps.
///
/// The wrapper struct must have a `training: bool` field and a field holding
/// the wrapped environment. `set_training` stores the flag locally and then
/// forwards the call.
///
/// Use `without_shape` when the wrapper changes the observation shape and
/// implements `observation_shape` itself.
///
/// ```ignore
/// impl<E: Env> Env for ClipReward<E> {
///     type Obs = E::Obs;
///     type Act = E::Act;
///
///     fn reset(&mut self, seed: Option<u64>) -> Result<Self::Obs> { .. }
///     fn step(&mut self, act: &Self::Act) -> Result<Step<Self::Obs>> { .. }
///
///     delegate_env!(env);
/// }
/// ```
#[macro_export]
macro_rules! delegate_env {
    (@shape $env:ident) => {
        fn observation_shape(&self) -> Vec<usize> {
            self.$env.observation_shape()
        }
    };
    (@common $env:ident) => {
        fn action_meanings(&self) -> Vec<String> {
            self.$env.action_meanings()
        }

        fn lives(&self) -> u32 {
            self.$env.lives()
        }

        fn set_training(&mut self, training: bool) {
            self.training = training;
            self.$env.set_training(training);
        }

        fn is_training(&self) -> bool {
            self.training
        }
    };
    ($env:ident) => {
        $crate::delegate_env!(@shape $env);
        $crate::delegate_env!(@common $env);
    };
    ($env:ident, without_shape) => {
        $crate::delegate_env!(@common $env);
    };
}
