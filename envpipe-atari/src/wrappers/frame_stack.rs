use super::check_shape;
use crate::LazyFrames;
use anyhow::Result;
use envpipe_core::{delegate_env, error::EnvPipeError, Env, Step};
use ndarray::ArrayD;
use std::{collections::VecDeque, fmt::Debug, sync::Arc};

/// Stacks the last `k` observations along their first axis.
///
/// On reset, the buffer is filled with `k` copies of the initial observation.
/// On every step, the new observation is pushed and the oldest one is evicted.
/// Observations are returned as [`LazyFrames`], which share the buffered
/// frames instead of copying them.
pub struct FrameStack<E, T> {
    env: E,
    k: usize,
    shape: Vec<usize>,
    frames: VecDeque<Arc<ArrayD<T>>>,
    training: bool,
}

impl<E, T> FrameStack<E, T>
where
    E: Env,
    E::Obs: Into<ArrayD<T>>,
    T: Clone + Debug,
{
    /// Wraps `env`. `k` must be positive.
    pub fn new(env: E, k: usize) -> Result<Self> {
        if k == 0 {
            return Err(
                EnvPipeError::InvalidConfig("the number of frames must be positive".to_string())
                    .into(),
            );
        }
        let shape = env.observation_shape();
        if shape.is_empty() {
            return Err(EnvPipeError::InvalidConfig(
                "FrameStack needs observations with at least one dimension".to_string(),
            )
            .into());
        }

        Ok(Self {
            env,
            k,
            shape,
            frames: VecDeque::with_capacity(k),
            training: true,
        })
    }

    /// The wrapped environment.
    pub fn inner(&self) -> &E {
        &self.env
    }

    fn frame(&self, obs: E::Obs) -> Result<Arc<ArrayD<T>>> {
        let obs: ArrayD<T> = obs.into();
        check_shape(&self.shape, obs.shape())?;
        Ok(Arc::new(obs))
    }

    fn fill(&mut self, frame: Arc<ArrayD<T>>) {
        self.frames.clear();
        self.frames.extend(std::iter::repeat(frame).take(self.k));
    }

    fn push(&mut self, frame: Arc<ArrayD<T>>) {
        if self.frames.is_empty() {
            // Stepped before any reset
            self.fill(frame);
        } else {
            if self.frames.len() == self.k {
                self.frames.pop_front();
            }
            self.frames.push_back(frame);
        }
    }

    fn stack(&self) -> Result<LazyFrames<T>> {
        LazyFrames::new(self.frames.iter().cloned().collect())
    }
}

impl<E, T> Env for FrameStack<E, T>
where
    E: Env,
    E::Obs: Into<ArrayD<T>>,
    T: Clone + Debug,
{
    type Obs = LazyFrames<T>;
    type Act = E::Act;

    fn reset(&mut self, seed: Option<u64>) -> Result<Self::Obs> {
        let obs = self.env.reset(seed)?;
        let frame = self.frame(obs)?;
        self.fill(frame);
        self.stack()
    }

    fn step(&mut self, act: &Self::Act) -> Result<Step<Self::Obs>> {
        let step = self.env.step(act)?;
        step.try_map_obs(|obs| {
            let frame = self.frame(obs)?;
            self.push(frame);
            self.stack()
        })
    }

    fn observation_shape(&self) -> Vec<usize> {
        let mut shape = self.shape.clone();
        shape[0] *= self.k;
        shape
    }

    delegate_env!(env, without_shape);
}
