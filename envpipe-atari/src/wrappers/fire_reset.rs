use super::check_action_meaning;
use crate::AtariAction;
use anyhow::Result;
use envpipe_core::{delegate_env, error::EnvPipeError, Env, Step};

/// Takes the fire action on reset, for environments that stay paused until firing.
///
/// On reset, actions 1 and 2 are taken in order; the environment is reset again
/// after either of them terminates the episode. The observation of action 2 is
/// returned, even when that step was terminal and was followed by a reset.
///
/// The environment must declare action 1 as `"FIRE"` and at least 3 actions.
pub struct FireReset<E> {
    env: E,
    training: bool,
}

impl<E> FireReset<E>
where
    E: Env,
    E::Act: From<u8>,
{
    /// Wraps `env`.
    pub fn new(env: E) -> Result<Self> {
        check_action_meaning(&env, AtariAction::Fire)?;
        let n_actions = env.action_meanings().len();
        if n_actions < 3 {
            return Err(EnvPipeError::TooFewActions {
                required: 3,
                found: n_actions,
            }
            .into());
        }

        Ok(Self {
            env,
            training: true,
        })
    }

    /// The wrapped environment.
    pub fn inner(&self) -> &E {
        &self.env
    }
}

impl<E> Env for FireReset<E>
where
    E: Env,
    E::Act: From<u8>,
{
    type Obs = E::Obs;
    type Act = E::Act;

    fn reset(&mut self, seed: Option<u64>) -> Result<Self::Obs> {
        self.env.reset(seed)?;

        let step = self.env.step(&E::Act::from(1u8))?;
        if step.is_done {
            log::debug!("FireReset: episode ended by action 1, resetting");
            self.env.reset(seed)?;
        }

        let step = self.env.step(&E::Act::from(2u8))?;
        if step.is_done {
            log::debug!("FireReset: episode ended by action 2, resetting");
            self.env.reset(seed)?;
        }

        Ok(step.obs)
    }

    fn step(&mut self, act: &Self::Act) -> Result<Step<Self::Obs>> {
        self.env.step(act)
    }

    delegate_env!(env);
}
