//! Configuration of the standard Atari preprocessing pipeline.
use crate::{
    ClipReward, EpisodicLife, FireReset, FrameStack, LazyFrames, MaxAndSkip, NoopReset, WarpFrame,
};
use anyhow::Result;
use envpipe_core::Env;
use log::info;
use ndarray::ArrayD;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// A pipeline built by [`AtariWrapperConfig::build`], with its composition erased.
pub type AtariPipeline<A> = Box<dyn Env<Obs = LazyFrames<u8>, Act = A>>;

type Frames<A> = Box<dyn Env<Obs = ArrayD<u8>, Act = A>>;

/// Configuration of the DeepMind-style preprocessing of Atari environments.
///
/// The default values are those of the DQN paper.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct AtariWrapperConfig {
    /// Maximum number of no-ops taken on reset. `None` disables [`NoopReset`].
    pub noop_max: Option<usize>,

    /// Number of frames an action is repeated for. `1` disables [`MaxAndSkip`].
    pub skip: usize,

    /// If `true`, losing a life ends an episode, see [`EpisodicLife`].
    pub episodic_life: bool,

    /// If `true`, applies [`FireReset`].
    pub fire_reset: bool,

    /// If `true`, rewards are clipped to their sign.
    pub clip_rewards: bool,

    /// Width of the frames after [`WarpFrame`].
    pub width: usize,

    /// Height of the frames after [`WarpFrame`].
    pub height: usize,

    /// If `true`, frames are converted to grayscale.
    pub grayscale: bool,

    /// Number of stacked frames.
    pub frame_stack: usize,

    /// Seed of the generator of the number of no-ops.
    pub seed: u64,

    /// If `false`, the pipeline is built in evaluation mode.
    pub train: bool,
}

impl Default for AtariWrapperConfig {
    fn default() -> Self {
        Self {
            noop_max: Some(30),
            skip: 4,
            episodic_life: true,
            fire_reset: false,
            clip_rewards: true,
            width: 84,
            height: 84,
            grayscale: true,
            frame_stack: 4,
            seed: 0,
            train: true,
        }
    }
}

impl AtariWrapperConfig {
    /// Sets the maximum number of no-ops.
    pub fn noop_max(mut self, v: Option<usize>) -> Self {
        self.noop_max = v;
        self
    }

    /// Sets the number of skipped frames.
    pub fn skip(mut self, v: usize) -> Self {
        self.skip = v;
        self
    }

    /// Enables or disables episodic life.
    pub fn episodic_life(mut self, v: bool) -> Self {
        self.episodic_life = v;
        self
    }

    /// Enables or disables fire reset.
    pub fn fire_reset(mut self, v: bool) -> Self {
        self.fire_reset = v;
        self
    }

    /// Enables or disables reward clipping.
    pub fn clip_rewards(mut self, v: bool) -> Self {
        self.clip_rewards = v;
        self
    }

    /// Sets the size of the warped frames.
    pub fn frame_size(mut self, width: usize, height: usize) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Enables or disables grayscale conversion.
    pub fn grayscale(mut self, v: bool) -> Self {
        self.grayscale = v;
        self
    }

    /// Sets the number of stacked frames.
    pub fn frame_stack(mut self, v: usize) -> Self {
        self.frame_stack = v;
        self
    }

    /// Sets the seed of the no-op generator.
    pub fn seed(mut self, v: u64) -> Self {
        self.seed = v;
        self
    }

    /// Sets training or evaluation mode.
    pub fn train(mut self, v: bool) -> Self {
        self.train = v;
        self
    }

    /// Loads the configuration from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves the configuration to a YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }

    /// Wraps `env`, an environment emitting RGB frames of shape `[height, width, 3]`.
    ///
    /// Wrappers are applied in the order [`NoopReset`], [`MaxAndSkip`],
    /// [`EpisodicLife`], [`FireReset`], [`WarpFrame`], [`ClipReward`] and
    /// [`FrameStack`], innermost first. Fails if any of them cannot be
    /// constructed.
    pub fn build<E>(&self, env: E) -> Result<AtariPipeline<E::Act>>
    where
        E: Env<Obs = ArrayD<u8>> + 'static,
        E::Act: From<u8> + 'static,
    {
        let mut env: Frames<E::Act> = Box::new(env);

        if let Some(noop_max) = self.noop_max {
            env = Box::new(NoopReset::new(env, noop_max, self.seed)?);
        }
        if self.skip != 1 {
            env = Box::new(MaxAndSkip::new(env, self.skip)?);
        }
        if self.episodic_life {
            env = Box::new(EpisodicLife::new(env));
        }
        if self.fire_reset {
            env = Box::new(FireReset::new(env)?);
        }
        env = Box::new(WarpFrame::new(env, self.width, self.height, self.grayscale)?);
        if self.clip_rewards {
            env = Box::new(ClipReward::new(env));
        }

        let mut env: AtariPipeline<E::Act> =
            Box::new(FrameStack::<_, u8>::new(env, self.frame_stack)?);
        if !self.train {
            env.set_training(false);
        }

        info!(
            "Built Atari pipeline: observation shape {:?}, {} actions, train = {}",
            env.observation_shape(),
            env.action_meanings().len(),
            self.train
        );

        Ok(env)
    }
}
