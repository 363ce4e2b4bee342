use super::check_action_meaning;
use crate::AtariAction;
use anyhow::Result;
use envpipe_core::{delegate_env, error::EnvPipeError, Env, Step};
use rand::{rngs::SmallRng, Rng, SeedableRng};

/// Randomizes initial states by taking a random number of no-ops on reset.
///
/// The number of no-ops is drawn uniformly from `[1, noop_max]`. The
/// environment must declare action 0 as `"NOOP"`.
pub struct NoopReset<E> {
    env: E,
    noop_max: usize,
    override_num_noops: Option<usize>,
    rng: SmallRng,
    training: bool,
}

impl<E> NoopReset<E>
where
    E: Env,
    E::Act: From<u8>,
{
    /// Wraps `env`. `seed` initializes the generator of the number of no-ops.
    pub fn new(env: E, noop_max: usize, seed: u64) -> Result<Self> {
        check_action_meaning(&env, AtariAction::Noop)?;
        if noop_max == 0 {
            return Err(EnvPipeError::InvalidConfig("noop_max must be positive".to_string()).into());
        }

        Ok(Self {
            env,
            noop_max,
            override_num_noops: None,
            rng: SmallRng::seed_from_u64(seed),
            training: true,
        })
    }

    /// Fixes the number of no-ops taken on every reset. `None` restores sampling.
    pub fn override_num_noops(&mut self, n: Option<usize>) -> Result<()> {
        if n == Some(0) {
            return Err(
                EnvPipeError::InvalidConfig("the number of no-ops must be positive".to_string())
                    .into(),
            );
        }
        self.override_num_noops = n;
        Ok(())
    }

    /// The wrapped environment.
    pub fn inner(&self) -> &E {
        &self.env
    }
}

impl<E> Env for NoopReset<E>
where
    E: Env,
    E::Act: From<u8>,
{
    type Obs = E::Obs;
    type Act = E::Act;

    fn reset(&mut self, seed: Option<u64>) -> Result<Self::Obs> {
        if let Some(seed) = seed {
            self.rng = SmallRng::seed_from_u64(seed);
        }

        let mut obs = self.env.reset(seed)?;
        let noops = match self.override_num_noops {
            Some(n) => n,
            None => self.rng.gen_range(1..=self.noop_max),
        };
        log::debug!("NoopReset: taking {} no-ops", noops);

        let noop = E::Act::from(AtariAction::Noop as u8);
        for _ in 0..noops {
            let step = self.env.step(&noop)?;
            obs = if step.is_done {
                self.env.reset(seed)?
            } else {
                step.obs
            };
        }

        Ok(obs)
    }

    fn step(&mut self, act: &Self::Act) -> Result<Step<Self::Obs>> {
        self.env.step(act)
    }

    delegate_env!(env);
}
