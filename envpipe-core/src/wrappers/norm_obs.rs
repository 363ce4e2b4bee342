use crate::{delegate_env, error::EnvPipeError, Env, RunningMoments, Step};
use anyhow::Result;
use ndarray::{ArrayD, IxDyn};

/// Normalizes observations with their running mean and variance.
///
/// Each element of the observation has its own statistics. The output is
/// `clip((x - mean) / (sqrt(var) + 1e-8), -clip, clip)`. Statistics are updated
/// with every observation, including the initial one of an episode, while in
/// training mode; in evaluation mode the frozen statistics are applied.
pub struct NormObs<E> {
    env: E,
    moments: RunningMoments,
    shape: Vec<usize>,
    clip: f64,
    eps: f64,
    training: bool,
}

impl<E> NormObs<E>
where
    E: Env,
    E::Obs: Into<ArrayD<f32>>,
{
    /// Wraps `env` with count floor `1e-4` and clip range `10`.
    pub fn new(env: E) -> Result<Self> {
        Self::build(env, 1e-4, 10.0)
    }

    /// Wraps `env` with the given count floor and clip range.
    pub fn build(env: E, count_floor: f64, clip: f64) -> Result<Self> {
        if !(clip > 0.0) {
            return Err(EnvPipeError::InvalidConfig(format!(
                "clip range must be positive, got {}",
                clip
            ))
            .into());
        }
        let shape = env.observation_shape();
        let dim = shape.iter().product();

        Ok(Self {
            env,
            moments: RunningMoments::new(dim, count_floor)?,
            shape,
            clip,
            eps: 1e-8,
            training: true,
        })
    }

    /// The wrapped environment.
    pub fn inner(&self) -> &E {
        &self.env
    }

    /// Current statistics.
    pub fn moments(&self) -> &RunningMoments {
        &self.moments
    }

    /// Replaces the statistics, e.g., with ones restored from a checkpoint.
    pub fn set_moments(&mut self, moments: RunningMoments) -> Result<()> {
        if moments.dim() != self.moments.dim() {
            return Err(EnvPipeError::ShapeMismatch {
                expected: vec![self.moments.dim()],
                found: vec![moments.dim()],
            }
            .into());
        }
        self.moments = moments;
        Ok(())
    }

    fn normalize(&mut self, obs: E::Obs) -> Result<ArrayD<f32>> {
        let obs: ArrayD<f32> = obs.into();
        if obs.shape() != self.shape.as_slice() {
            return Err(EnvPipeError::ShapeMismatch {
                expected: self.shape.clone(),
                found: obs.shape().to_vec(),
            }
            .into());
        }

        let x = obs.iter().map(|&v| v as f64).collect::<Vec<_>>();
        if self.training {
            self.moments.update(&x)?;
            log::trace!("NormObs: count = {}", self.moments.count());
        }

        let clip = self.clip;
        let y = self
            .moments
            .normalize(&x, self.eps)?
            .into_iter()
            .map(|v| v.max(-clip).min(clip) as f32)
            .collect::<Vec<_>>();

        Ok(ArrayD::from_shape_vec(IxDyn(&self.shape), y)?)
    }
}

impl<E> Env for NormObs<E>
where
    E: Env,
    E::Obs: Into<ArrayD<f32>>,
{
    type Obs = ArrayD<f32>;
    type Act = E::Act;

    fn reset(&mut self, seed: Option<u64>) -> Result<Self::Obs> {
        let obs = self.env.reset(seed)?;
        self.normalize(obs)
    }

    fn step(&mut self, act: &Self::Act) -> Result<Step<Self::Obs>> {
        let step = self.env.step(act)?;
        step.try_map_obs(|obs| self.normalize(obs))
    }

    delegate_env!(env);
}
