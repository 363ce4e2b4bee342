//! Utilities for test.
//!
//! [`ScriptedEnv`] stands in for an emulator: it emits RGB frames and follows a
//! script of rewards, life counts and termination flags, while counting resets
//! and recording the actions it receives.
use crate::{AtariAct, AtariAction};
use anyhow::{bail, Result};
use envpipe_core::{Env, Info, Step};
use ndarray::{ArrayD, IxDyn};

/// One scripted outcome of [`Env::step`].
#[derive(Debug, Clone, Default)]
pub struct ScriptedStep {
    /// Reward.
    pub reward: f64,

    /// The life count after the step. `None` keeps the current count.
    pub lives: Option<u32>,

    /// Raw termination flag.
    pub done: bool,

    /// Frame to emit. `None` emits a frame filled with the step counter.
    pub frame: Option<ArrayD<u8>>,
}

impl ScriptedStep {
    /// A step with the given reward.
    pub fn reward(reward: f64) -> Self {
        Self {
            reward,
            ..Self::default()
        }
    }

    /// Sets the life count after the step.
    pub fn lives(mut self, lives: u32) -> Self {
        self.lives = Some(lives);
        self
    }

    /// Marks the step as terminal.
    pub fn done(mut self) -> Self {
        self.done = true;
        self
    }

    /// Sets the frame to emit.
    pub fn frame(mut self, frame: ArrayD<u8>) -> Self {
        self.frame = Some(frame);
        self
    }
}

/// A scripted Atari-like environment.
///
/// Frames have shape `[height, width, 3]`. Reset frames are all zeros and,
/// unless the script provides one, the frame of the `n`-th step (counted over
/// the lifetime of the environment, starting at 1) is filled with `n % 256`.
/// The script is a single timeline: it is not rewound by resets. Past its end,
/// steps give zero reward and never terminate.
#[derive(Debug, Clone)]
pub struct ScriptedEnv {
    shape: Vec<usize>,
    actions: Vec<AtariAction>,
    start_lives: u32,
    lives: u32,
    script: Vec<ScriptedStep>,
    cursor: usize,
    n_resets: usize,
    n_steps: usize,
    taken: Vec<u8>,
    seeds: Vec<Option<u64>>,
    fail_at_step: Option<usize>,
}

impl ScriptedEnv {
    /// Creates an environment emitting `height x width` RGB frames with the
    /// given action set.
    pub fn new(height: usize, width: usize, actions: Vec<AtariAction>) -> Self {
        Self {
            shape: vec![height, width, 3],
            actions,
            start_lives: 1,
            lives: 1,
            script: vec![],
            cursor: 0,
            n_resets: 0,
            n_steps: 0,
            taken: vec![],
            seeds: vec![],
            fail_at_step: None,
        }
    }

    /// Sets the life count restored by every reset.
    pub fn start_lives(mut self, lives: u32) -> Self {
        self.start_lives = lives;
        self.lives = lives;
        self
    }

    /// Sets the script.
    pub fn script(mut self, script: Vec<ScriptedStep>) -> Self {
        self.script = script;
        self
    }

    /// Makes the `n`-th step (starting at 1) fail.
    pub fn fail_at_step(mut self, n: usize) -> Self {
        self.fail_at_step = Some(n);
        self
    }

    /// The number of times [`Env::reset`] was called.
    pub fn n_resets(&self) -> usize {
        self.n_resets
    }

    /// The number of times [`Env::step`] was called.
    pub fn n_steps(&self) -> usize {
        self.n_steps
    }

    /// Indices of the actions received, in order.
    pub fn taken_actions(&self) -> &[u8] {
        &self.taken
    }

    /// Seeds received by [`Env::reset`], in order.
    pub fn seeds(&self) -> &[Option<u64>] {
        &self.seeds
    }

    /// A frame of this environment's shape filled with `value`.
    pub fn filled_frame(&self, value: u8) -> ArrayD<u8> {
        ArrayD::from_elem(IxDyn(&self.shape), value)
    }
}

impl Env for ScriptedEnv {
    type Obs = ArrayD<u8>;
    type Act = AtariAct;

    fn reset(&mut self, seed: Option<u64>) -> Result<Self::Obs> {
        self.n_resets += 1;
        self.seeds.push(seed);
        self.lives = self.start_lives;
        Ok(self.filled_frame(0))
    }

    fn step(&mut self, act: &Self::Act) -> Result<Step<Self::Obs>> {
        if act.act as usize >= self.actions.len() {
            bail!(
                "Action {} is out of the action set of size {}",
                act.act,
                self.actions.len()
            );
        }
        self.n_steps += 1;
        if self.fail_at_step == Some(self.n_steps) {
            bail!("Emulator failure at step {}", self.n_steps);
        }
        self.taken.push(act.act);

        let scripted = self.script.get(self.cursor).cloned().unwrap_or_default();
        self.cursor += 1;
        if let Some(lives) = scripted.lives {
            self.lives = lives;
        }
        let obs = match scripted.frame {
            Some(frame) => frame,
            None => self.filled_frame((self.n_steps % 256) as u8),
        };

        Ok(Step::new(obs, scripted.reward, scripted.done, Info::empty()))
    }

    fn observation_shape(&self) -> Vec<usize> {
        self.shape.clone()
    }

    fn action_meanings(&self) -> Vec<String> {
        AtariAction::meanings(&self.actions)
    }

    fn lives(&self) -> u32 {
        self.lives
    }
}
