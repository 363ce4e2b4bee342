use crate::AtariAction;
use anyhow::Result;
use envpipe_core::{delegate_env, Env, InfoValue, Step};

/// Makes end-of-life the end of an episode, but only resets on true game over.
///
/// A step that loses a life, while at least one life remains, is reported as
/// `done`. The following [`Env::reset`] does not reset the environment; it
/// takes a single no-op to move past the frame where the life was lost. Only
/// after the environment itself reported termination does `reset` reset it.
///
/// Every step appends `"lives"` and `"was_real_terminal"` to the info.
pub struct EpisodicLife<E> {
    env: E,
    lives: u32,
    was_real_terminal: bool,
    training: bool,
}

impl<E> EpisodicLife<E>
where
    E: Env,
    E::Act: From<u8>,
{
    /// Wraps `env`.
    pub fn new(env: E) -> Self {
        Self {
            env,
            lives: 0,
            was_real_terminal: true,
            training: true,
        }
    }

    /// `true` if the last step was terminal for the environment itself.
    pub fn was_real_terminal(&self) -> bool {
        self.was_real_terminal
    }

    /// The wrapped environment.
    pub fn inner(&self) -> &E {
        &self.env
    }
}

impl<E> Env for EpisodicLife<E>
where
    E: Env,
    E::Act: From<u8>,
{
    type Obs = E::Obs;
    type Act = E::Act;

    fn step(&mut self, act: &Self::Act) -> Result<Step<Self::Obs>> {
        let mut step = self.env.step(act)?;
        self.was_real_terminal = step.is_done;

        // Keep lives > 0 here: some games stay at zero lives for a few frames
        // before the environment reports termination.
        let lives = self.env.lives();
        if lives < self.lives && lives > 0 {
            log::debug!("EpisodicLife: life lost ({} -> {})", self.lives, lives);
            step.is_done = true;
        }
        self.lives = lives;

        step.info.append("lives", InfoValue::Int(lives as i64));
        step.info
            .append("was_real_terminal", InfoValue::Bool(self.was_real_terminal));

        Ok(step)
    }

    fn reset(&mut self, seed: Option<u64>) -> Result<Self::Obs> {
        let obs = if self.was_real_terminal {
            log::debug!("EpisodicLife: game over, resetting the environment");
            self.env.reset(seed)?
        } else {
            self.env.step(&E::Act::from(AtariAction::Noop as u8))?.obs
        };
        self.lives = self.env.lives();

        Ok(obs)
    }

    delegate_env!(env);
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        util::test::{ScriptedEnv, ScriptedStep},
        AtariAct,
    };

    fn env() -> ScriptedEnv {
        ScriptedEnv::new(4, 4, AtariAction::breakout())
            .start_lives(3)
            .script(vec![
                ScriptedStep::reward(0.0).lives(3),
                ScriptedStep::reward(0.0).lives(3),
                ScriptedStep::reward(0.0).lives(2),
                ScriptedStep::reward(0.0).lives(2),
                ScriptedStep::reward(0.0).lives(1),
                ScriptedStep::reward(0.0).lives(0).done(),
            ])
    }

    #[test_log::test]
    fn test_done_on_life_loss_and_game_over() -> Result<()> {
        let mut env = EpisodicLife::new(env());
        env.reset(None)?;
        assert_eq!(env.inner().n_resets(), 1);

        let mut dones = vec![];
        let mut real = vec![];
        for _ in 0..6 {
            let step = env.step(&AtariAct::new(3))?;
            assert_eq!(step.info.get_int("lives")?, env.lives() as i64);
            dones.push(step.is_done);
            real.push(env.was_real_terminal());
        }

        // 3 -> 2 and 2 -> 1 end episodes, 1 -> 0 comes with the real termination.
        assert_eq!(dones, vec![false, false, true, false, true, true]);
        assert_eq!(real, vec![false, false, false, false, false, true]);
        Ok(())
    }

    #[test_log::test]
    fn test_reset_after_life_loss_takes_noop() -> Result<()> {
        let mut env = EpisodicLife::new(env());
        env.reset(None)?;
        env.step(&AtariAct::new(3))?;
        env.step(&AtariAct::new(3))?;
        let step = env.step(&AtariAct::new(3))?;
        assert!(step.is_done);
        assert!(!step.info.get_bool("was_real_terminal")?);

        env.reset(None)?;
        assert_eq!(env.inner().n_resets(), 1);
        assert_eq!(env.inner().taken_actions().last(), Some(&0));
        // The life count was not restored by an environment reset.
        assert_eq!(env.lives(), 2);
        Ok(())
    }

    #[test_log::test]
    fn test_reset_after_game_over_resets_environment() -> Result<()> {
        let mut env = EpisodicLife::new(env());
        env.reset(None)?;
        for _ in 0..6 {
            env.step(&AtariAct::new(3))?;
        }
        assert!(env.was_real_terminal());

        env.reset(None)?;
        assert_eq!(env.inner().n_resets(), 2);
        assert_eq!(env.lives(), 3);
        Ok(())
    }

    #[test_log::test]
    fn test_losing_last_life_waits_for_termination() -> Result<()> {
        let env = ScriptedEnv::new(4, 4, AtariAction::breakout())
            .start_lives(1)
            .script(vec![
                ScriptedStep::reward(0.0).lives(0),
                ScriptedStep::reward(0.0).lives(0).done(),
            ]);
        let mut env = EpisodicLife::new(env);
        env.reset(None)?;

        // 1 -> 0 is not reported until the environment terminates.
        let step = env.step(&AtariAct::new(3))?;
        assert!(!step.is_done);
        assert_eq!(step.info.get_int("lives")?, 0);
        assert!(!env.was_real_terminal());

        let step = env.step(&AtariAct::new(3))?;
        assert!(step.is_done);
        assert!(env.was_real_terminal());
        Ok(())
    }

    #[test_log::test]
    fn test_inner_info_is_kept() -> Result<()> {
        // An inner layer already reported lives; the outer one must not overwrite it.
        let mut env = EpisodicLife::new(EpisodicLife::new(env()));
        env.reset(None)?;
        let step = env.step(&AtariAct::new(3))?;
        assert_eq!(step.info.get_int("lives")?, 3);
        assert_eq!(step.info.len(), 2);
        Ok(())
    }
}
