use rand::{Rng, distr::StandardUniform, prelude::Distribution};

/// A falling tetromino: its kind, rotation state and origin position.
///
/// `Piece` is plain data. Moving or rotating it always succeeds; deciding
/// whether the result is a legal placement is the job of the
/// [`Board`](crate::Board) that owns it.
///
/// # Coordinate System
///
/// - Row 0 is the top row of the visible grid, rows grow downward
/// - Negative rows are the spawn buffer above the visible grid
/// - Each rotation state is a set of four `(row, col)` offsets from the origin
///
/// # Example
///
/// ```
/// use tetris_gym_engine::{Piece, PieceKind, RotationDirection};
///
/// let mut piece = Piece::new(PieceKind::T);
/// piece.move_by(-1, 2);
/// piece.rotate(RotationDirection::Clockwise);
///
/// assert_eq!(piece.rotation(), 1);
/// assert_eq!(piece.position().row(), 2);
/// assert_eq!(piece.position().col(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    kind: PieceKind,
    rotation: usize,
    position: PiecePosition,
}

impl Piece {
    /// Creates a piece of the given kind at the spawn position with rotation 0.
    #[must_use]
    pub const fn new(kind: PieceKind) -> Self {
        Self {
            kind,
            rotation: 0,
            position: PiecePosition::SPAWN_POSITION,
        }
    }

    /// Creates a piece at an arbitrary placement.
    ///
    /// `rotation` is reduced modulo the kind's number of rotation states.
    #[must_use]
    pub const fn with_placement(kind: PieceKind, rotation: usize, position: PiecePosition) -> Self {
        Self {
            kind,
            rotation: rotation % kind.rotation_count(),
            position,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub const fn rotation(&self) -> usize {
        self.rotation
    }

    #[must_use]
    pub const fn position(&self) -> PiecePosition {
        self.position
    }

    /// Grid color value written when this piece locks.
    #[must_use]
    pub const fn color(&self) -> u8 {
        self.kind.color()
    }

    /// Absolute `(row, col)` of the four cells covered in the current state.
    #[must_use]
    pub fn occupied_cells(&self) -> [CellPosition; 4] {
        self.kind
            .cells(self.rotation)
            .map(|(dr, dc)| CellPosition::new(self.position.row + dr, self.position.col + dc))
    }

    /// Advances the rotation state by one step in `direction`, wrapping around.
    pub fn rotate(&mut self, direction: RotationDirection) {
        self.rotation = direction.apply(self.rotation, self.kind.rotation_count());
    }

    /// Shifts the origin by `dx` columns and `dy` rows.
    pub fn move_by(&mut self, dx: i32, dy: i32) {
        self.position = self.position.translated(dx, dy);
    }

    #[must_use]
    pub fn moved(mut self, dx: i32, dy: i32) -> Self {
        self.move_by(dx, dy);
        self
    }
}

/// Origin of a piece's offset table on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PiecePosition {
    row: i32,
    col: i32,
}

impl PiecePosition {
    pub const SPAWN_ROW: i32 = 0;
    pub const SPAWN_COL: i32 = 4;
    pub const SPAWN_POSITION: Self = Self::new(Self::SPAWN_ROW, Self::SPAWN_COL);

    #[must_use]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    #[must_use]
    pub const fn row(self) -> i32 {
        self.row
    }

    #[must_use]
    pub const fn col(self) -> i32 {
        self.col
    }

    #[must_use]
    pub const fn translated(self, dx: i32, dy: i32) -> Self {
        Self::new(self.row + dy, self.col + dx)
    }
}

/// Absolute grid coordinate of one piece cell.
///
/// Signed, because a falling piece may stick out above the grid or past a
/// wall while a move is being tested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellPosition {
    pub row: i32,
    pub col: i32,
}

impl CellPosition {
    #[must_use]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }
}

/// Direction of a single rotation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RotationDirection {
    /// +1 rotation state.
    Clockwise,
    /// -1 rotation state.
    CounterClockwise,
}

impl RotationDirection {
    const fn apply(self, rotation: usize, count: usize) -> usize {
        match self {
            RotationDirection::Clockwise => (rotation + 1) % count,
            RotationDirection::CounterClockwise => (rotation + count - 1) % count,
        }
    }
}

/// The seven tetromino kinds.
///
/// The discriminant is the kind's index in [`PieceKind::ALL`], which is also
/// the value reported as "next piece" in environment observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
#[repr(u8)]
pub enum PieceKind {
    /// T-piece.
    T = 0,
    /// I-piece.
    I = 1,
    /// O-piece.
    O = 2,
    /// L-piece.
    L = 3,
    /// J-piece.
    J = 4,
    /// S-piece.
    S = 5,
    /// Z-piece.
    Z = 6,
}

impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        PieceKind::ALL[rng.random_range(0..PieceKind::LEN)]
    }
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    /// All kinds in index order.
    pub const ALL: [PieceKind; Self::LEN] = [
        PieceKind::T,
        PieceKind::I,
        PieceKind::O,
        PieceKind::L,
        PieceKind::J,
        PieceKind::S,
        PieceKind::Z,
    ];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < Self::LEN {
            Some(Self::ALL[index])
        } else {
            None
        }
    }

    /// Grid value of a locked cell of this kind (`1..=7`).
    #[must_use]
    pub const fn color(self) -> u8 {
        match self {
            PieceKind::Z => 1,
            PieceKind::S => 2,
            PieceKind::O => 3,
            PieceKind::J => 4,
            PieceKind::T => 5,
            PieceKind::I => 6,
            PieceKind::L => 7,
        }
    }

    /// Inverse of [`Self::color`]. Returns `None` for `0` and out-of-range values.
    #[must_use]
    pub const fn from_color(color: u8) -> Option<Self> {
        match color {
            1 => Some(PieceKind::Z),
            2 => Some(PieceKind::S),
            3 => Some(PieceKind::O),
            4 => Some(PieceKind::J),
            5 => Some(PieceKind::T),
            6 => Some(PieceKind::I),
            7 => Some(PieceKind::L),
            _ => None,
        }
    }

    /// Number of distinct rotation states (1 for O, 2 for I/S/Z, 4 for T/L/J).
    #[must_use]
    pub const fn rotation_count(self) -> usize {
        PIECE_SHAPES[self as usize].len()
    }

    /// `(row, col)` offsets of the four cells in the given rotation state.
    ///
    /// `rotation` is taken modulo [`Self::rotation_count`].
    #[must_use]
    pub const fn cells(self, rotation: usize) -> [CellOffset; 4] {
        let states = PIECE_SHAPES[self as usize];
        states[rotation % states.len()]
    }

}

/// `(row, col)` offset of a cell from the piece origin.
pub type CellOffset = (i32, i32);

type RotationStates = &'static [[CellOffset; 4]];

const PIECE_SHAPES: [RotationStates; PieceKind::LEN] = [
    // T-piece
    &[
        [(0, 1), (1, 0), (1, 1), (1, 2)],
        [(0, 1), (1, 1), (1, 2), (2, 1)],
        [(1, 0), (1, 1), (1, 2), (2, 1)],
        [(0, 1), (1, 0), (1, 1), (2, 1)],
    ],
    // I-piece
    &[
        [(1, 0), (1, 1), (1, 2), (1, 3)],
        [(0, 2), (1, 2), (2, 2), (3, 2)],
    ],
    // O-piece
    &[[(0, 1), (0, 2), (1, 1), (1, 2)]],
    // L-piece
    &[
        [(0, 2), (1, 0), (1, 1), (1, 2)],
        [(0, 1), (1, 1), (2, 1), (2, 2)],
        [(1, 0), (1, 1), (1, 2), (2, 0)],
        [(0, 0), (0, 1), (1, 1), (2, 1)],
    ],
    // J-piece
    &[
        [(0, 0), (1, 0), (1, 1), (1, 2)],
        [(0, 1), (0, 2), (1, 1), (2, 1)],
        [(1, 0), (1, 1), (1, 2), (2, 2)],
        [(0, 1), (1, 1), (2, 0), (2, 1)],
    ],
    // S-piece
    &[
        [(0, 1), (0, 2), (1, 0), (1, 1)],
        [(0, 1), (1, 1), (1, 2), (2, 2)],
    ],
    // Z-piece
    &[
        [(0, 0), (0, 1), (1, 1), (1, 2)],
        [(0, 2), (1, 1), (1, 2), (2, 1)],
    ],
];
