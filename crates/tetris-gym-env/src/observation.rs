use rand::Rng;
use serde::Serialize;
use tetris_gym_engine::{Board, EMPTY_CELL, PieceKind};

/// What the agent sees after a reset or step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Observation {
    /// `height × width` cells: the locked grid with the falling piece drawn
    /// in its color. Cells of the piece above the grid are omitted.
    pub board: Vec<Vec<u8>>,
    /// [`PieceKind::index`] of the piece that spawns next.
    pub next_piece: usize,
}

impl Observation {
    /// Captures the current state of `board`.
    ///
    /// Takes `&mut` because peeking at an empty bag refills it.
    pub fn capture<R: Rng>(board: &mut Board<R>) -> Self {
        Self {
            next_piece: board.peek_next().index(),
            board: board_with_piece(board),
        }
    }

    #[must_use]
    pub fn next_piece_kind(&self) -> Option<PieceKind> {
        PieceKind::from_index(self.next_piece)
    }

    /// Number of non-empty cells.
    #[must_use]
    pub fn filled_cells(&self) -> usize {
        self.board
            .iter()
            .flatten()
            .filter(|&&cell| cell != EMPTY_CELL)
            .count()
    }
}

/// The grid cells with the falling piece's in-bounds cells drawn in.
pub(crate) fn board_with_piece<R: Rng>(board: &Board<R>) -> Vec<Vec<u8>> {
    let mut cells = board
        .grid()
        .rows()
        .map(<[u8]>::to_vec)
        .collect::<Vec<_>>();
    let piece = board.current_piece();
    for cell in piece.occupied_cells() {
        let (Ok(row), Ok(col)) = (usize::try_from(cell.row), usize::try_from(cell.col)) else {
            continue;
        };
        if let Some(value) = cells.get_mut(row).and_then(|r| r.get_mut(col)) {
            *value = piece.color();
        }
    }
    cells
}

/// Episode bookkeeping returned next to every observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StepInfo {
    pub score: u64,
    pub lines_cleared: usize,
    pub game_over: bool,
}

impl StepInfo {
    pub fn capture<R: Rng>(board: &Board<R>) -> Self {
        Self {
            score: board.score(),
            lines_cleared: board.lines_cleared(),
            game_over: board.is_game_over(),
        }
    }
}

/// Shape and value bounds of [`Observation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ObservationSpace {
    pub height: usize,
    pub width: usize,
    /// Largest cell value (the highest piece color).
    pub max_cell: u8,
    /// Number of distinct `next_piece` values.
    pub piece_kinds: usize,
}

impl ObservationSpace {
    #[must_use]
    pub const fn new(width: usize, height: usize) -> Self {
        Self {
            height,
            width,
            max_cell: 7,
            piece_kinds: PieceKind::LEN,
        }
    }

    /// Returns `true` if `observation` has this shape and its values are in range.
    #[must_use]
    pub fn contains(&self, observation: &Observation) -> bool {
        observation.board.len() == self.height
            && observation.board.iter().all(|row| {
                row.len() == self.width && row.iter().all(|&cell| cell <= self.max_cell)
            })
            && observation.next_piece < self.piece_kinds
    }
}
