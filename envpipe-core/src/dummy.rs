//! This module is used for tests.
use crate::{Act, Env, Info, InfoValue, Step};
use anyhow::Result;
use ndarray::{ArrayD, IxDyn};

#[derive(Clone, Debug, PartialEq)]
/// Dummy action, an action index.
pub struct DummyAct(pub u8);

impl Act for DummyAct {}

impl From<u8> for DummyAct {
    fn from(act: u8) -> Self {
        Self(act)
    }
}

/// A scripted environment with vector observations.
///
/// Step `t` (counted from the last reset) emits `observations[t]`,
/// `rewards[t]` and `dones[t]`. Past the end of the script, it emits zero
/// observations and rewards and `done = false`.
/// Every step appends `"t"` to the info.
#[derive(Debug, Clone)]
pub struct DummyEnv {
    dim: usize,
    observations: Vec<Vec<f32>>,
    rewards: Vec<f64>,
    dones: Vec<bool>,
    t: usize,
    n_resets: usize,
    training: bool,
}

impl DummyEnv {
    /// Creates an environment emitting `dim`-dimensional observations.
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            observations: vec![],
            rewards: vec![],
            dones: vec![],
            t: 0,
            n_resets: 0,
            training: true,
        }
    }

    /// Sets observations emitted by steps.
    pub fn observations(mut self, observations: Vec<Vec<f32>>) -> Self {
        self.observations = observations;
        self
    }

    /// Sets rewards emitted by steps.
    pub fn rewards(mut self, rewards: Vec<f64>) -> Self {
        self.rewards = rewards;
        self
    }

    /// Sets termination flags emitted by steps.
    pub fn dones(mut self, dones: Vec<bool>) -> Self {
        self.dones = dones;
        self
    }

    /// The number of times [`Env::reset`] was called.
    pub fn n_resets(&self) -> usize {
        self.n_resets
    }

    fn obs(&self, v: Option<&Vec<f32>>) -> Result<ArrayD<f32>> {
        let v = v.cloned().unwrap_or_else(|| vec![0.0; self.dim]);
        Ok(ArrayD::from_shape_vec(IxDyn(&[self.dim]), v)?)
    }
}

impl Env for DummyEnv {
    type Obs = ArrayD<f32>;
    type Act = DummyAct;

    fn reset(&mut self, _seed: Option<u64>) -> Result<Self::Obs> {
        self.t = 0;
        self.n_resets += 1;
        self.obs(None)
    }

    fn step(&mut self, _act: &Self::Act) -> Result<Step<Self::Obs>> {
        let obs = self.obs(self.observations.get(self.t))?;
        let reward = self.rewards.get(self.t).cloned().unwrap_or(0.0);
        let is_done = self.dones.get(self.t).cloned().unwrap_or(false);
        let info = Info::from_slice(&[("t", InfoValue::Int(self.t as i64))]);
        self.t += 1;

        Ok(Step::new(obs, reward, is_done, info))
    }

    fn observation_shape(&self) -> Vec<usize> {
        vec![self.dim]
    }

    fn action_meanings(&self) -> Vec<String> {
        vec!["NOOP".to_string(), "FIRE".to_string()]
    }

    // Records the flag so tests can observe propagation down a chain.
    fn set_training(&mut self, training: bool) {
        self.training = training;
    }

    fn is_training(&self) -> bool {
        self.training
    }
}
