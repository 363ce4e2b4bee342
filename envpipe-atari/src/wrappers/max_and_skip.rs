use super::check_shape;
use anyhow::Result;
use envpipe_core::{delegate_env, error::EnvPipeError, Env, Step};
use ndarray::{ArrayD, IxDyn, Zip};
use num_traits::Zero;
use std::fmt::Debug;

/// Repeats an action over `skip` frames and max-pools the last two of them.
///
/// The rewards of the internal steps are summed. The loop stops early when an
/// internal step terminates; the done flag and the info of the last internal
/// step are returned.
///
/// The last two frames are kept in a scratch buffer of two slots, which is
/// overwritten and never cleared. When the episode terminates before two
/// internal steps are taken, the returned frame is the maximum of whatever the
/// slots hold at that point.
pub struct MaxAndSkip<E, T> {
    env: E,
    skip: usize,
    shape: Vec<usize>,
    buffer: [ArrayD<T>; 2],
    training: bool,
}

impl<E, T> MaxAndSkip<E, T>
where
    E: Env<Obs = ArrayD<T>>,
    T: Copy + PartialOrd + Zero + Debug,
{
    /// Wraps `env`. `skip` must be positive.
    pub fn new(env: E, skip: usize) -> Result<Self> {
        if skip == 0 {
            return Err(EnvPipeError::InvalidConfig("skip must be positive".to_string()).into());
        }
        let shape = env.observation_shape();
        let buffer = [
            ArrayD::zeros(IxDyn(&shape)),
            ArrayD::zeros(IxDyn(&shape)),
        ];

        Ok(Self {
            env,
            skip,
            shape,
            buffer,
            training: true,
        })
    }

    /// The wrapped environment.
    pub fn inner(&self) -> &E {
        &self.env
    }

    fn store(&mut self, slot: usize, obs: ArrayD<T>) -> Result<()> {
        check_shape(&self.shape, obs.shape())?;
        self.buffer[slot] = obs;
        Ok(())
    }
}

impl<E, T> Env for MaxAndSkip<E, T>
where
    E: Env<Obs = ArrayD<T>>,
    T: Copy + PartialOrd + Zero + Debug,
{
    type Obs = ArrayD<T>;
    type Act = E::Act;

    fn reset(&mut self, seed: Option<u64>) -> Result<Self::Obs> {
        self.env.reset(seed)
    }

    fn step(&mut self, act: &Self::Act) -> Result<Step<Self::Obs>> {
        let mut total_reward = 0.0;
        let mut last = None;

        for i in 0..self.skip {
            let step = self.env.step(act)?;
            total_reward += step.reward;
            let Step {
                obs, is_done, info, ..
            } = step;

            if i + 2 == self.skip {
                self.store(0, obs)?;
            } else if i + 1 == self.skip {
                self.store(1, obs)?;
            }

            last = Some((is_done, info));
            if is_done {
                log::trace!("MaxAndSkip: terminated after {} of {} frames", i + 1, self.skip);
                break;
            }
        }

        // Max pooling
        let obs = Zip::from(&self.buffer[0])
            .and(&self.buffer[1])
            .map_collect(|&a, &b| if b > a { b } else { a });

        // `skip > 0`, so the loop ran at least once
        let (is_done, info) = last.unwrap_or_default();

        Ok(Step::new(obs, total_reward, is_done, info))
    }

    delegate_env!(env);
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        util::test::{ScriptedEnv, ScriptedStep},
        AtariAct, AtariAction,
    };
    use envpipe_core::dummy::{DummyAct, DummyEnv};

    fn env() -> ScriptedEnv {
        ScriptedEnv::new(2, 2, AtariAction::pong())
    }

    #[test_log::test]
    fn test_rewards_are_summed() -> Result<()> {
        let script = [1.0, 2.0, 3.0, 4.0]
            .iter()
            .map(|&r| ScriptedStep::reward(r))
            .collect();
        let mut env = MaxAndSkip::new(env().script(script), 4)?;
        env.reset(None)?;
        let step = env.step(&AtariAct::new(2))?;

        assert_eq!(step.reward, 10.0);
        assert!(!step.is_done);
        assert_eq!(env.inner().n_steps(), 4);
        assert_eq!(env.inner().taken_actions(), &[2, 2, 2, 2]);
        Ok(())
    }

    #[test_log::test]
    fn test_max_of_last_two_frames() -> Result<()> {
        let base = env().filled_frame(1);
        let mut third = base.clone();
        third[[1, 0, 2]] = 5;
        let mut fourth = base.clone();
        fourth[[1, 0, 2]] = 9;
        fourth[[0, 1, 0]] = 3;

        let mut env = MaxAndSkip::new(
            env().script(vec![
                ScriptedStep::reward(0.0).frame(env().filled_frame(200)),
                ScriptedStep::reward(0.0).frame(base.clone()),
                ScriptedStep::reward(0.0).frame(third),
                ScriptedStep::reward(0.0).frame(fourth),
            ]),
            4,
        )?;
        env.reset(None)?;
        let obs = env.step(&AtariAct::new(0))?.obs;

        // Frames before the last two do not contribute.
        assert_eq!(obs[[1, 0, 2]], 9);
        assert_eq!(obs[[0, 1, 0]], 3);
        assert_eq!(obs[[0, 0, 0]], 1);
        assert_eq!(obs.shape(), &[2, 2, 3]);
        Ok(())
    }

    #[test_log::test]
    fn test_early_termination() -> Result<()> {
        let mut env = MaxAndSkip::new(
            env().script(vec![
                ScriptedStep::reward(1.0),
                ScriptedStep::reward(1.0).done(),
            ]),
            4,
        )?;
        env.reset(None)?;
        let step = env.step(&AtariAct::new(0))?;

        assert!(step.is_done);
        assert_eq!(step.reward, 2.0);
        assert_eq!(env.inner().n_steps(), 2);
        // Neither slot was written yet.
        assert!(step.obs.iter().all(|&v| v == 0));

        // Slots now hold frames 5 and 6 of the environment.
        let step = env.step(&AtariAct::new(0))?;
        assert!(step.obs.iter().all(|&v| v == 6));
        Ok(())
    }

    #[test_log::test]
    fn test_info_of_last_internal_step() -> Result<()> {
        let mut env = MaxAndSkip::new(DummyEnv::new(3), 4)?;
        env.reset(None)?;
        let step = env.step(&DummyAct(0))?;
        assert_eq!(step.info.get_int("t")?, 3);
        Ok(())
    }

    #[test]
    fn test_skip_must_be_positive() {
        assert!(MaxAndSkip::new(env(), 0).is_err());
    }
}
