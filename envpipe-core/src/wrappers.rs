//! Wrappers built on running statistics.
//!
//! All three read the training-mode flag: statistics are updated and rewards
//! are shaped only in training mode.
mod norm_obs;
mod norm_ret;
mod reward_shift;
pub use norm_obs::NormObs;
pub use norm_ret::NormRet;
pub use reward_shift::RewardShift;

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        dummy::{DummyAct, DummyEnv},
        Env,
    };
    use anyhow::Result;
    use ndarray::ArrayD;

    #[test_log::test]
    fn test_training_flag_propagates_inward() -> Result<()> {
        let env = DummyEnv::new(3).rewards(vec![1.0; 8]);
        let mut env = RewardShift::new(NormRet::new(NormObs::new(env)?)?, 2.0);
        assert!(env.is_training());

        env.set_training(false);
        assert!(!env.is_training());
        assert!(!env.inner().is_training());
        assert!(!env.inner().inner().is_training());

        env.set_training(true);
        assert!(env.inner().inner().is_training());
        Ok(())
    }

    #[test_log::test]
    fn test_boxed_chain_forwards_everything() -> Result<()> {
        let env = DummyEnv::new(3).rewards(vec![1.0; 8]);
        let mut env: Box<dyn Env<Obs = ArrayD<f32>, Act = DummyAct>> =
            Box::new(NormObs::new(RewardShift::new(env, 3.0))?);
        assert_eq!(env.observation_shape(), vec![3]);
        assert_eq!(env.action_meanings()[0], "NOOP");
        assert_eq!(env.lives(), 1);

        env.reset(None)?;
        let step = env.step(&DummyAct(0))?;
        assert_eq!(step.reward, 3.0);
        assert_eq!(step.info.get_int("t")?, 0);

        env.set_training(false);
        assert!(!env.is_training());
        let step = env.step(&DummyAct(0))?;
        assert_eq!(step.reward, 1.0);
        Ok(())
    }
}
