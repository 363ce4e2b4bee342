//! Environment step.
use crate::Info;

/// Represents an observation, reward and termination tuple `(o_t+1, r_t, done_t)`
/// with some additional information.
///
/// An environment emits [`Step`] object at every interaction steps.
/// Any wrapper in a pipeline may rewrite the reward and the termination flag;
/// the info is only appended to.
#[derive(Debug, Clone)]
pub struct Step<O> {
    /// Observation.
    pub obs: O,

    /// Reward.
    pub reward: f64,

    /// Flag denoting if episode is done.
    pub is_done: bool,

    /// Additional information.
    pub info: Info,
}

impl<O> Step<O> {
    /// Constructs a [`Step`] object.
    pub fn new(obs: O, reward: f64, is_done: bool, info: Info) -> Self {
        Step {
            obs,
            reward,
            is_done,
            info,
        }
    }

    /// Replaces the observation, keeping reward, termination flag and info.
    pub fn map_obs<P>(self, f: impl FnOnce(O) -> P) -> Step<P> {
        Step {
            obs: f(self.obs),
            reward: self.reward,
            is_done: self.is_done,
            info: self.info,
        }
    }

    /// Replaces the observation with a fallible transform.
    pub fn try_map_obs<P, E>(self, f: impl FnOnce(O) -> Result<P, E>) -> Result<Step<P>, E> {
        Ok(Step {
            obs: f(self.obs)?,
            reward: self.reward,
            is_done: self.is_done,
            info: self.info,
        })
    }
}
