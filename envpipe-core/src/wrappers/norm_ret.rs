use crate::{delegate_env, error::EnvPipeError, Env, RunningMoments, Step};
use anyhow::Result;

/// Rescales rewards with the running variance of the discounted return.
///
/// A per-episode discounted return `ret = ret * discount + reward` is
/// accumulated and its variance is estimated with [`RunningMoments`]. The
/// emitted reward is `reward / sqrt(return_var + epsilon)`; note that the
/// reward is rescaled with the variance of the *return*, not of the reward.
///
/// The accumulator is zeroed on every reset and after every step reporting
/// `done`. In evaluation mode, rewards and the accumulator are left untouched.
pub struct NormRet<E> {
    env: E,
    moments: RunningMoments,
    ret: f64,
    discount: f64,
    epsilon: f64,
    training: bool,
}

impl<E: Env> NormRet<E> {
    /// Wraps `env` with `discount = 0.99` and `epsilon = 1e-4`.
    pub fn new(env: E) -> Result<Self> {
        Self::build(env, 0.99, 1e-4)
    }

    /// Wraps `env`. `epsilon` is both the count floor of the statistics and
    /// the epsilon in the denominator.
    pub fn build(env: E, discount: f64, epsilon: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&discount) {
            return Err(EnvPipeError::InvalidConfig(format!(
                "discount must be in [0, 1], got {}",
                discount
            ))
            .into());
        }

        Ok(Self {
            env,
            moments: RunningMoments::scalar(epsilon)?,
            ret: 0.0,
            discount,
            epsilon,
            training: true,
        })
    }

    /// The wrapped environment.
    pub fn inner(&self) -> &E {
        &self.env
    }

    /// Current statistics of the discounted return.
    pub fn moments(&self) -> &RunningMoments {
        &self.moments
    }

    /// Replaces the statistics, e.g., with ones restored from a checkpoint.
    pub fn set_moments(&mut self, moments: RunningMoments) -> Result<()> {
        if moments.dim() != 1 {
            return Err(EnvPipeError::ShapeMismatch {
                expected: vec![1],
                found: vec![moments.dim()],
            }
            .into());
        }
        self.moments = moments;
        Ok(())
    }

    /// The discounted return accumulated in the current episode.
    pub fn discounted_return(&self) -> f64 {
        self.ret
    }

    /// Accumulates `reward`, updates the statistics and returns the rescaled reward.
    ///
    /// The accumulator is zeroed when `is_done`, after it was used for the update.
    fn accumulate(&mut self, reward: f64, is_done: bool) -> Result<f64> {
        self.ret = self.ret * self.discount + reward;
        self.moments.update(&[self.ret])?;
        let scaled = reward / (self.moments.var()[0] + self.epsilon).sqrt();
        log::trace!(
            "NormRet: ret = {}, var = {}, reward = {} -> {}",
            self.ret,
            self.moments.var()[0],
            reward,
            scaled
        );

        if is_done {
            self.ret = 0.0;
        }

        Ok(scaled)
    }
}

impl<E: Env> Env for NormRet<E> {
    type Obs = E::Obs;
    type Act = E::Act;

    fn reset(&mut self, seed: Option<u64>) -> Result<Self::Obs> {
        self.ret = 0.0;
        self.env.reset(seed)
    }

    fn step(&mut self, act: &Self::Act) -> Result<Step<Self::Obs>> {
        let mut step = self.env.step(act)?;
        if self.training {
            step.reward = self.accumulate(step.reward, step.is_done)?;
        }
        Ok(step)
    }

    delegate_env!(env);
}
