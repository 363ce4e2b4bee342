//! Wrappers of the DeepMind Atari preprocessing.
mod clip_reward;
mod episodic_life;
mod fire_reset;
mod frame_stack;
mod max_and_skip;
mod noop_reset;
mod scaled_float;
mod warp_frame;
pub use clip_reward::ClipReward;
pub use episodic_life::EpisodicLife;
pub use fire_reset::FireReset;
pub use frame_stack::FrameStack;
pub use max_and_skip::MaxAndSkip;
pub use noop_reset::NoopReset;
pub use scaled_float::ScaledFloatFrame;
pub use warp_frame::WarpFrame;

use crate::AtariAction;
use anyhow::Result;
use envpipe_core::{error::EnvPipeError, Env};

/// Fails unless the environment declares `expected` at index `expected as usize`.
fn check_action_meaning<E: Env>(env: &E, expected: AtariAction) -> Result<()> {
    let index = expected as usize;
    let meanings = env.action_meanings();
    match meanings.get(index) {
        Some(found) if found == expected.meaning() => Ok(()),
        found => Err(EnvPipeError::ActionMeaning {
            index,
            expected: expected.meaning().to_string(),
            found: found.cloned(),
        }
        .into()),
    }
}

/// Fails if the observation does not have the declared shape.
fn check_shape(expected: &[usize], found: &[usize]) -> Result<()> {
    if expected != found {
        Err(EnvPipeError::ShapeMismatch {
            expected: expected.to_vec(),
            found: found.to_vec(),
        }
        .into())
    } else {
        Ok(())
    }
}
