use anyhow::Result;
use envpipe_core::{delegate_env, Env, Step};

/// Clips rewards to their sign, `-1`, `0` or `1`.
pub struct ClipReward<E> {
    env: E,
    training: bool,
}

impl<E: Env> ClipReward<E> {
    /// Wraps `env`.
    pub fn new(env: E) -> Self {
        Self {
            env,
            training: true,
        }
    }

    /// The wrapped environment.
    pub fn inner(&self) -> &E {
        &self.env
    }
}

/// Sign of `r`. Unlike [`f64::signum`], zero maps to zero.
fn sign(r: f64) -> f64 {
    if r > 0.0 {
        1.0
    } else if r < 0.0 {
        -1.0
    } else {
        r * 0.0
    }
}

impl<E: Env> Env for ClipReward<E> {
    type Obs = E::Obs;
    type Act = E::Act;

    fn reset(&mut self, seed: Option<u64>) -> Result<Self::Obs> {
        self.env.reset(seed)
    }

    fn step(&mut self, act: &Self::Act) -> Result<Step<Self::Obs>> {
        let mut step = self.env.step(act)?;
        step.reward = sign(step.reward);
        Ok(step)
    }

    delegate_env!(env);
}
