use anyhow::Result;
use envpipe_core::{delegate_env, Env, Step};
use ndarray::ArrayD;

/// Converts `u8` frames to `f32`, mapping `[0, 255]` to `[-0.5, 0.5]`.
///
/// Accepts [`LazyFrames`](crate::LazyFrames), forcing their concatenation.
pub struct ScaledFloatFrame<E> {
    env: E,
    training: bool,
}

impl<E> ScaledFloatFrame<E>
where
    E: Env,
    E::Obs: Into<ArrayD<u8>>,
{
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

fn scale(obs: ArrayD<u8>) -> ArrayD<f32> {
    obs.mapv(|v| v as f32 / 255.0 - 0.5)
}

impl<E> Env for ScaledFloatFrame<E>
where
    E: Env,
    E::Obs: Into<ArrayD<u8>>,
{
    type Obs = ArrayD<f32>;
    type Act = E::Act;

    fn reset(&mut self, seed: Option<u64>) -> Result<Self::Obs> {
        Ok(scale(self.env.reset(seed)?.into()))
    }

    fn step(&mut self, act: &Self::Act) -> Result<Step<Self::Obs>> {
        Ok(self.env.step(act)?.map_obs(|obs| scale(obs.into())))
    }

    delegate_env!(env);
}
