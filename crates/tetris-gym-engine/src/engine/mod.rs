//! Game rules on top of the core data.
//!
//! - [`Board`] - The playfield: falling piece, locked cells, scoring, game over
//! - [`BoardConfig`] - Playfield dimensions
//! - [`GameStats`] - Score and line statistics
//! - [`PieceGenerator`] - 7-bag piece dealing
//! - [`PieceSeed`] - Seed for deterministic piece sequences
//!
//! # Game Flow
//!
//! 1. Create a [`Board`], which spawns the first piece
//! 2. Move and rotate the falling piece; illegal moves are rejected
//! 3. A soft drop that cannot move, or a hard drop, locks the piece
//! 4. Full rows are cleared, points are awarded and the next piece spawns
//! 5. Repeat until a spawned piece overlaps the stack
//!
//! # Example
//!
//! ```
//! use tetris_gym_engine::{Board, BoardConfig, PieceSeed};
//!
//! let mut board = Board::with_seed(BoardConfig::default(), PieceSeed::from_u64(42)).unwrap();
//!
//! while !board.is_game_over() {
//!     board.hard_drop();
//! }
//!
//! println!("final score: {}", board.score());
//! ```

pub use self::{board::*, game_stats::*, piece_generator::*};

mod board;
mod game_stats;
mod piece_generator;
