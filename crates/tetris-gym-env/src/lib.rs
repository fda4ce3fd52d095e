//! Reinforcement-learning adapter for the Tetris board engine.
//!
//! [`TetrisEnv`] follows the usual episodic contract: [`TetrisEnv::reset`]
//! starts an episode, [`TetrisEnv::step`] applies one of the seven discrete
//! [`Action`]s and reports the observation, reward and episode end flags.
//!
//! # Example
//!
//! ```
//! use tetris_gym_env::{Action, EnvConfig, TetrisEnv};
//! use tetris_gym_engine::PieceSeed;
//!
//! let mut env = TetrisEnv::new(EnvConfig::default()).unwrap();
//! let (observation, _info) = env.reset(Some(PieceSeed::from_u64(7)));
//! assert_eq!(observation.board.len(), 20);
//!
//! let step = env.step(Action::HardDrop);
//! assert_eq!(step.reward, 2);
//! assert!(!step.terminated);
//! ```

pub use self::{action::*, env::*, observation::*};

mod action;
mod env;
mod observation;
