#![warn(missing_docs)]
//! Composable preprocessing of environment outputs for reinforcement learning.
//!
//! This crate defines the capability shared by environments and the wrappers
//! around them ([`Env`]), the data emitted at every step ([`Step`], [`Info`]),
//! and wrappers driven by streaming statistics ([`RunningMoments`]):
//! [`RewardShift`], [`NormObs`] and [`NormRet`].
//!
//! Wrappers form a chain. `reset` and `step` calls descend from the outermost
//! wrapper to the environment and results ascend back, each layer transforming
//! them. The training-mode flag is set on the outermost wrapper with
//! [`Env::set_training`] and propagates inward through the chain.
//!
//! ```rust
//! use envpipe_core::{
//!     dummy::{DummyAct, DummyEnv},
//!     Env, NormObs, NormRet,
//! };
//!
//! # fn main() -> anyhow::Result<()> {
//! let env = DummyEnv::new(4).rewards(vec![1.0, 0.0, -1.0]);
//! let mut env = NormRet::new(NormObs::new(env)?)?;
//!
//! let _obs = env.reset(Some(42))?;
//! let step = env.step(&DummyAct(0))?;
//! assert_eq!(step.obs.shape(), &[4]);
//!
//! // Freezes statistics down the whole chain.
//! env.set_training(false);
//! # Ok(())
//! # }
//! ```
pub mod dummy;
pub mod error;

mod base;
pub use base::{Act, Env, Obs, Step};

mod info;
pub use info::{Info, InfoValue};

mod moments;
pub use moments::{merge_moments, RunningMoments};

mod wrappers;
pub use wrappers::{NormObs, NormRet, RewardShift};
