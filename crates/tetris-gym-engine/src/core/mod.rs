//! Static game data: the piece catalog, piece instances and the grid.

pub use self::{grid::*, piece::*};

pub(crate) mod grid;
pub(crate) mod piece;
