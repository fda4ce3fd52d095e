//! Board engine for a Tetris reinforcement-learning environment.
//!
//! - [`core`] - Piece catalog, piece instances and the cell grid
//! - [`engine`] - The [`Board`] rules, 7-bag generation and scoring

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// A board configuration that cannot be played on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("board width must be positive")]
    ZeroWidth,
    #[display("board height must be positive")]
    ZeroHeight,
}
