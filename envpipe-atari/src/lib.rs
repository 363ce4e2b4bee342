//! Wrappers implementing the DeepMind preprocessing of Atari environments.
//!
//! This crate applies the preprocessing of
//! [`atari_wrappers.py`](https://github.com/openai/baselines/blob/master/baselines/common/atari_wrappers.py)
//! to any [`Env`](envpipe_core::Env) emitting RGB frames as `ndarray` arrays of
//! shape `[height, width, 3]`:
//!
//! * [`NoopReset`] takes a random number of no-ops on reset.
//! * [`MaxAndSkip`] repeats actions and max-pools the last two frames.
//! * [`EpisodicLife`] ends episodes on life loss.
//! * [`FireReset`] presses fire on reset.
//! * [`WarpFrame`] converts frames to grayscale and resizes them.
//! * [`ClipReward`] clips rewards to their sign.
//! * [`FrameStack`] stacks the last frames into [`LazyFrames`].
//! * [`ScaledFloatFrame`] converts frames to floating point values.
//!
//! The environment adapter itself, e.g., one binding the Arcade Learning
//! Environment, is not part of this crate. It needs to report its action set
//! through [`Env::action_meanings`](envpipe_core::Env::action_meanings) with
//! the labels of [`AtariAction`], and its remaining lives through
//! [`Env::lives`](envpipe_core::Env::lives).
//!
//! Here is an example of building the standard pipeline around a scripted
//! environment.
//!
//! ```rust
//! use anyhow::Result;
//! use envpipe_atari::{util::test::ScriptedEnv, AtariAct, AtariAction, AtariWrapperConfig};
//! use envpipe_core::Env as _;
//!
//! # fn main() -> Result<()> {
//! let env = ScriptedEnv::new(210, 160, AtariAction::pong());
//! let mut env = AtariWrapperConfig::default().build(env)?;
//!
//! let obs = env.reset(Some(42))?;
//! assert_eq!(obs.shape(), &[4, 84, 84]);
//!
//! let step = env.step(&AtariAct::new(1))?;
//! assert_eq!(step.obs.as_array().shape(), &[4, 84, 84]);
//! # Ok(())
//! # }
//! ```
mod act;
mod config;
mod obs;
pub mod util;
pub mod wrappers;
pub use act::{AtariAct, AtariAction};
pub use config::{AtariPipeline, AtariWrapperConfig};
pub use obs::LazyFrames;
pub use wrappers::{
    ClipReward, EpisodicLife, FireReset, FrameStack, MaxAndSkip, NoopReset, ScaledFloatFrame,
    WarpFrame,
};
