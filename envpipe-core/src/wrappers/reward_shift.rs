use crate::{delegate_env, Env, Step};
use anyhow::Result;

/// Scales rewards by a constant factor in training mode.
///
/// In evaluation mode rewards pass through unchanged.
pub struct RewardShift<E> {
    env: E,
    reward_scale: f64,
    training: bool,
}

impl<E: Env> RewardShift<E> {
    /// Wraps `env`.
    pub fn new(env: E, reward_scale: f64) -> Self {
        Self {
            env,
            reward_scale,
            training: true,
        }
    }

    /// The wrapped environment.
    pub fn inner(&self) -> &E {
        &self.env
    }
}

impl<E: Env> Env for RewardShift<E> {
    type Obs = E::Obs;
    type Act = E::Act;

    fn reset(&mut self, seed: Option<u64>) -> Result<Self::Obs> {
        self.env.reset(seed)
    }

    fn step(&mut self, act: &Self::Act) -> Result<Step<Self::Obs>> {
        let mut step = self.env.step(act)?;
        if self.training {
            step.reward *= self.reward_scale;
        }
        Ok(step)
    }

    delegate_env!(env);
}
