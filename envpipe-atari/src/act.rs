//! Actions of Atari-like environments.
use envpipe_core::Act;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// A discrete action, identified by its index in the environment's action set.
pub struct AtariAct {
    /// Action index.
    pub act: u8,
}

impl AtariAct {
    /// Constructs an action with the given index.
    pub fn new(act: u8) -> Self {
        Self { act }
    }
}

impl Act for AtariAct {}

impl From<u8> for AtariAct {
    fn from(act: u8) -> Self {
        Self { act }
    }
}

/// Full action set of the Arcade Learning Environment.
///
/// The label returned by [`AtariAction::meaning`] is what environments report
/// from [`Env::action_meanings`](envpipe_core::Env::action_meanings).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum AtariAction {
    Noop = 0,
    Fire = 1,
    Up = 2,
    Right = 3,
    Left = 4,
    Down = 5,
    UpRight = 6,
    UpLeft = 7,
    DownRight = 8,
    DownLeft = 9,
    UpFire = 10,
    RightFire = 11,
    LeftFire = 12,
    DownFire = 13,
    UpRightFire = 14,
    UpLeftFire = 15,
    DownRightFire = 16,
    DownLeftFire = 17,
}

impl AtariAction {
    /// Label of the action, e.g., `"NOOP"`.
    pub fn meaning(&self) -> &'static str {
        match self {
            Self::Noop => "NOOP",
            Self::Fire => "FIRE",
            Self::Up => "UP",
            Self::Right => "RIGHT",
            Self::Left => "LEFT",
            Self::Down => "DOWN",
            Self::UpRight => "UPRIGHT",
            Self::UpLeft => "UPLEFT",
            Self::DownRight => "DOWNRIGHT",
            Self::DownLeft => "DOWNLEFT",
            Self::UpFire => "UPFIRE",
            Self::RightFire => "RIGHTFIRE",
            Self::LeftFire => "LEFTFIRE",
            Self::DownFire => "DOWNFIRE",
            Self::UpRightFire => "UPRIGHTFIRE",
            Self::UpLeftFire => "UPLEFTFIRE",
            Self::DownRightFire => "DOWNRIGHTFIRE",
            Self::DownLeftFire => "DOWNLEFTFIRE",
        }
    }

    /// Labels of an action set, in order.
    pub fn meanings(actions: &[AtariAction]) -> Vec<String> {
        actions.iter().map(|a| a.meaning().to_string()).collect()
    }

    /// Minimal action set of Pong.
    pub fn pong() -> Vec<AtariAction> {
        vec![
            Self::Noop,
            Self::Fire,
            Self::Right,
            Self::Left,
            Self::RightFire,
            Self::LeftFire,
        ]
    }

    /// Minimal action set of Breakout.
    pub fn breakout() -> Vec<AtariAction> {
        vec![Self::Noop, Self::Fire, Self::Right, Self::Left]
    }
}
