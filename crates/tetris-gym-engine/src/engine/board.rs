use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::{
    ConfigError,
    core::{
        grid::Grid,
        piece::{CellPosition, Piece, PieceKind, RotationDirection},
    },
};

use super::{
    game_stats::{GameStats, HARD_DROP_LOCK_BONUS, SOFT_DROP_LOCK_BONUS},
    piece_generator::{PieceGenerator, PieceSeed},
};

/// Playfield dimensions.
///
/// Deserializes from JSON such as `{ "width": 10, "height": 20 }`; missing
/// fields fall back to the standard 10×20 field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BoardConfig {
    pub width: usize,
    pub height: usize,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            width: Self::DEFAULT_WIDTH,
            height: Self::DEFAULT_HEIGHT,
        }
    }
}

impl BoardConfig {
    pub const DEFAULT_WIDTH: usize = 10;
    pub const DEFAULT_HEIGHT: usize = 20;

    /// Creates a validated configuration.
    pub fn new(width: usize, height: usize) -> Result<Self, ConfigError> {
        let config = Self { width, height };
        config.validate()?;
        Ok(config)
    }

    /// Checks that both dimensions are positive.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 {
            return Err(ConfigError::ZeroWidth);
        }
        if self.height == 0 {
            return Err(ConfigError::ZeroHeight);
        }
        Ok(())
    }
}

/// The Tetris playfield and its rules.
///
/// A board owns the grid of locked cells, the single falling piece, the
/// [`PieceGenerator`] that deals the following pieces and the running
/// [`GameStats`]. Every operation runs to completion synchronously; illegal
/// moves are reported as `false` and leave the board untouched.
///
/// # Lifecycle
///
/// 1. Construction (or [`reset`](Self::reset)) spawns the first piece
/// 2. [`move_piece`](Self::move_piece) / [`rotate`](Self::rotate) manipulate it
/// 3. [`soft_drop`](Self::soft_drop) or [`hard_drop`](Self::hard_drop) lock it,
///    clear full rows and spawn the next piece
/// 4. A spawn that collides ends the game; afterwards every mutating
///    operation is a no-op until the next reset
///
/// # Example
///
/// ```
/// use tetris_gym_engine::{Board, BoardConfig, PieceSeed, RotationDirection};
///
/// let mut board = Board::with_seed(BoardConfig::default(), PieceSeed::from_u64(1)).unwrap();
///
/// board.move_piece(-1, 0);
/// board.rotate(RotationDirection::Clockwise);
/// board.hard_drop();
///
/// assert_eq!(board.stats().locked_pieces(), 1);
/// assert!(board.score() >= 2);
/// ```
#[derive(Debug, Clone)]
pub struct Board<R = Pcg32> {
    config: BoardConfig,
    grid: Grid,
    current_piece: Piece,
    generator: PieceGenerator<R>,
    stats: GameStats,
    game_over: bool,
}

impl Board<Pcg32> {
    /// Creates a board whose pieces come from a freshly seeded random source.
    pub fn new(config: BoardConfig) -> Result<Self, ConfigError> {
        Self::with_seed(config, rand::rng().random())
    }

    /// Like [`Self::new`], but with a specific seed for a reproducible game.
    pub fn with_seed(config: BoardConfig, seed: PieceSeed) -> Result<Self, ConfigError> {
        Self::with_rng(config, seed.into_rng())
    }

    /// Resets the board and reseeds its piece generator.
    pub fn reset_with_seed(&mut self, seed: PieceSeed) {
        self.reset_with_rng(seed.into_rng());
    }
}

impl<R> Board<R>
where
    R: Rng,
{
    /// Creates a board drawing piece randomness from `rng`.
    pub fn with_rng(config: BoardConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut generator = PieceGenerator::new(rng);
        let current_piece = generator.next_piece();
        let mut board = Self {
            config,
            grid: Grid::new(config.width, config.height),
            current_piece,
            generator,
            stats: GameStats::new(),
            game_over: false,
        };
        board.check_spawn_collision();
        Ok(board)
    }

    /// Starts a new game, continuing the current random stream.
    ///
    /// The grid is emptied, statistics are zeroed, a fresh bag is shuffled
    /// and the first piece spawns.
    pub fn reset(&mut self) {
        self.generator.refill_bag();
        self.restart();
    }

    /// Starts a new game with a new random source.
    pub fn reset_with_rng(&mut self, rng: R) {
        self.generator = PieceGenerator::new(rng);
        self.restart();
    }

    fn restart(&mut self) {
        self.grid.clear();
        self.stats = GameStats::new();
        self.game_over = false;
        self.spawn_piece();
        tracing::debug!(piece = %self.current_piece.kind(), "board reset");
    }

    #[must_use]
    pub const fn config(&self) -> &BoardConfig {
        &self.config
    }

    #[must_use]
    pub const fn width(&self) -> usize {
        self.config.width
    }

    #[must_use]
    pub const fn height(&self) -> usize {
        self.config.height
    }

    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Mutable access to the locked cells, for setting up positions.
    ///
    /// The board does not re-check the falling piece against the edited grid.
    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    #[must_use]
    pub const fn current_piece(&self) -> &Piece {
        &self.current_piece
    }

    /// Replaces the falling piece without a collision check.
    pub fn set_current_piece(&mut self, piece: Piece) {
        self.current_piece = piece;
    }

    #[must_use]
    pub const fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub const fn score(&self) -> u64 {
        self.stats.score()
    }

    #[must_use]
    pub const fn lines_cleared(&self) -> usize {
        self.stats.lines_cleared()
    }

    #[must_use]
    pub const fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Kind of the piece that will spawn after the current one locks.
    pub fn peek_next(&mut self) -> PieceKind {
        self.generator.peek_next()
    }

    /// Remaining kinds of the current bag, in deal order.
    pub fn upcoming(&self) -> impl ExactSizeIterator<Item = PieceKind> + '_ {
        self.generator.upcoming()
    }

    /// Where the current piece would lock after a hard drop.
    #[must_use]
    pub fn drop_position(&self) -> Piece {
        let mut dropped = self.current_piece;
        loop {
            let next = dropped.moved(0, 1);
            if self.collides(&next) {
                return dropped;
            }
            dropped = next;
        }
    }

    /// Deals the next piece at the spawn position.
    ///
    /// If it overlaps the grid the game is over; the colliding piece is kept
    /// as the current piece so it can still be drawn.
    pub fn spawn_piece(&mut self) {
        if self.game_over {
            return;
        }
        self.current_piece = self.generator.next_piece();
        self.check_spawn_collision();
    }

    fn check_spawn_collision(&mut self) {
        if self.collides(&self.current_piece) {
            self.game_over = true;
            tracing::info!(
                score = self.stats.score(),
                lines = self.stats.lines_cleared(),
                pieces = self.stats.locked_pieces(),
                "game over"
            );
        }
    }

    /// Returns `true` if any cell hits a wall, the floor or a locked cell.
    ///
    /// Cells above the grid (negative rows) are in the spawn buffer and only
    /// checked against the side walls.
    #[must_use]
    pub fn is_collision(&self, cells: &[CellPosition]) -> bool {
        cells.iter().any(|cell| {
            let Some(col) = usize::try_from(cell.col).ok().filter(|&c| c < self.width()) else {
                return true;
            };
            match usize::try_from(cell.row) {
                Ok(row) => row >= self.height() || self.grid.is_occupied(row, col),
                Err(_) => false,
            }
        })
    }

    fn collides(&self, piece: &Piece) -> bool {
        self.is_collision(&piece.occupied_cells())
    }

    /// Moves the current piece by `dx` columns and `dy` rows.
    ///
    /// Returns `false`, leaving the piece where it was, if the target
    /// position collides or the game is over.
    pub fn move_piece(&mut self, dx: i32, dy: i32) -> bool {
        self.try_update(|piece| piece.move_by(dx, dy))
    }

    /// Rotates the current piece one step in place (no wall kicks).
    ///
    /// Returns `false`, leaving the rotation unchanged, if the rotated piece
    /// collides or the game is over.
    pub fn rotate(&mut self, direction: RotationDirection) -> bool {
        self.try_update(|piece| piece.rotate(direction))
    }

    fn try_update<F>(&mut self, f: F) -> bool
    where
        F: FnOnce(&mut Piece),
    {
        if self.game_over {
            return false;
        }
        let original = self.current_piece;
        f(&mut self.current_piece);
        if self.collides(&self.current_piece) {
            self.current_piece = original;
            return false;
        }
        true
    }

    /// Moves the current piece one row down.
    ///
    /// When the piece is resting on something it is locked instead, the
    /// placement earns [`SOFT_DROP_LOCK_BONUS`] and `false` is returned.
    pub fn soft_drop(&mut self) -> bool {
        if self.game_over {
            return false;
        }
        if self.move_piece(0, 1) {
            return true;
        }
        self.lock_piece();
        self.stats.add_bonus(SOFT_DROP_LOCK_BONUS);
        false
    }

    /// Drops the current piece as far as it goes and locks it.
    ///
    /// Earns [`HARD_DROP_LOCK_BONUS`] on top of any line-clear points.
    pub fn hard_drop(&mut self) {
        if self.game_over {
            return;
        }
        while self.move_piece(0, 1) {}
        self.lock_piece();
        self.stats.add_bonus(HARD_DROP_LOCK_BONUS);
    }

    fn lock_piece(&mut self) {
        let piece = self.current_piece;
        // Cells in the spawn buffer, or outside a placement forced through
        // `set_current_piece`, are dropped.
        for cell in piece.occupied_cells() {
            if !self.grid.contains(cell.row, cell.col) {
                continue;
            }
            if let (Ok(row), Ok(col)) = (usize::try_from(cell.row), usize::try_from(cell.col)) {
                self.grid.fill_cell(row, col, piece.kind());
            }
        }
        tracing::trace!(piece = ?piece, "piece locked");

        let cleared = self.clear_lines();
        self.stats.record_lock(cleared);
        self.spawn_piece();
    }

    fn clear_lines(&mut self) -> usize {
        let cleared = self.grid.clear_full_rows();
        if cleared > 0 {
            tracing::debug!(
                cleared,
                total = self.stats.lines_cleared() + cleared,
                "lines cleared"
            );
        }
        cleared
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;

    use super::*;
    use crate::{core::piece::PiecePosition, line_clear_score};

    fn board() -> Board {
        Board::with_seed(BoardConfig::default(), PieceSeed::from_u64(0)).unwrap()
    }

    fn vertical_i_at(row: i32, col: i32) -> Piece {
        // Rotation 1 of the I-piece occupies column offset 2.
        Piece::with_placement(PieceKind::I, 1, PiecePosition::new(row, col - 2))
    }

    fn fill_row_except_first(board: &mut Board, row: usize) {
        for col in 1..board.width() {
            board.grid_mut().fill_cell(row, col, PieceKind::Z);
        }
    }

    fn apply_action<R: Rng>(board: &mut Board<R>, action: u8) {
        match action {
            0 | 3 => _ = board.soft_drop(),
            1 => _ = board.move_piece(-1, 0),
            2 => _ = board.move_piece(1, 0),
            4 => _ = board.rotate(RotationDirection::Clockwise),
            5 => _ = board.rotate(RotationDirection::CounterClockwise),
            _ => board.hard_drop(),
        }
    }

    #[test]
    fn test_initialization() {
        let board = board();
        assert_eq!(board.width(), 10);
        assert_eq!(board.height(), 20);
        assert_eq!(board.score(), 0);
        assert_eq!(board.lines_cleared(), 0);
        assert!(!board.is_game_over());
        assert_eq!(board.current_piece().position(), PiecePosition::SPAWN_POSITION);
        assert_eq!(board.current_piece().rotation(), 0);
        assert_eq!(*board.grid(), Grid::new(10, 20));
    }

    #[test]
    fn test_invalid_config() {
        assert_eq!(BoardConfig::new(0, 20), Err(ConfigError::ZeroWidth));
        assert_eq!(BoardConfig::new(10, 0), Err(ConfigError::ZeroHeight));
        let config = BoardConfig {
            width: 0,
            height: 0,
        };
        assert!(Board::new(config).is_err());
    }

    #[test]
    fn test_config_deserialize_defaults() {
        let config: BoardConfig = serde_json::from_str(r#"{ "height": 12 }"#).unwrap();
        assert_eq!(config, BoardConfig::new(10, 12).unwrap());
        assert!(serde_json::from_str::<BoardConfig>(r#"{ "depth": 3 }"#).is_err());
    }

    #[test]
    fn test_piece_move_valid() {
        let mut board = board();
        let initial = board.current_piece().position();
        assert!(board.move_piece(1, 0));
        assert_eq!(board.current_piece().position().col(), initial.col() + 1);
        assert!(board.move_piece(-1, 0));
        assert_eq!(board.current_piece().position(), initial);
    }

    #[test]
    fn test_piece_move_invalid_wall() {
        let mut board = board();
        while board.move_piece(-1, 0) {}

        let before = *board.current_piece();
        assert!(!board.move_piece(-1, 0));
        assert_eq!(*board.current_piece(), before);
        assert!(
            board
                .current_piece()
                .occupied_cells()
                .iter()
                .any(|c| c.col == 0)
        );
    }

    #[test]
    fn test_move_into_locked_cell_is_reverted() {
        let mut board = board();
        board.set_current_piece(Piece::new(PieceKind::O));
        // O occupies columns 5 and 6 at rows 0 and 1.
        board.grid_mut().fill_cell(1, 7, PieceKind::T);

        let before = *board.current_piece();
        assert!(!board.move_piece(1, 0));
        assert_eq!(*board.current_piece(), before);
    }

    #[test]
    fn test_rotation_blocked_by_wall_is_reverted() {
        let mut board = board();
        board.set_current_piece(vertical_i_at(5, 9));
        assert!(!board.rotate(RotationDirection::Clockwise));
        assert_eq!(board.current_piece().rotation(), 1);
        assert!(!board.rotate(RotationDirection::CounterClockwise));
        assert_eq!(*board.current_piece(), vertical_i_at(5, 9));
    }

    #[test]
    fn test_rotation_in_open_space() {
        let mut board = board();
        board.set_current_piece(Piece::with_placement(
            PieceKind::T,
            0,
            PiecePosition::new(8, 3),
        ));
        for expected in [1, 2, 3, 0] {
            assert!(board.rotate(RotationDirection::Clockwise));
            assert_eq!(board.current_piece().rotation(), expected);
        }
    }

    #[test]
    fn test_spawn_buffer_is_only_wall_checked() {
        let board = board();
        assert!(!board.is_collision(&[CellPosition::new(-3, 0)]));
        assert!(!board.is_collision(&[CellPosition::new(-1, 9)]));
        assert!(board.is_collision(&[CellPosition::new(-3, -1)]));
        assert!(board.is_collision(&[CellPosition::new(-3, 10)]));
        assert!(board.is_collision(&[CellPosition::new(20, 0)]));
        assert!(!board.is_collision(&[CellPosition::new(19, 0)]));
    }

    #[test]
    fn test_piece_can_move_up_into_spawn_buffer() {
        let mut board = board();
        assert!(board.move_piece(0, -2));
        assert!(
            board
                .current_piece()
                .occupied_cells()
                .iter()
                .all(|c| c.row < 0)
        );
    }

    #[test]
    fn test_soft_drop_moves_then_locks() {
        let mut board = board();
        let kind = board.current_piece().kind();
        let mut moves = 0;
        while board.soft_drop() {
            moves += 1;
            assert!(moves <= 20);
        }
        assert_eq!(board.score(), SOFT_DROP_LOCK_BONUS);
        assert_eq!(board.stats().locked_pieces(), 1);
        assert!(
            board
                .grid()
                .row(19)
                .iter()
                .any(|&cell| cell == kind.color())
        );
        assert_eq!(board.current_piece().position(), PiecePosition::SPAWN_POSITION);
    }

    #[test]
    fn test_line_clear() {
        let mut board = board();
        fill_row_except_first(&mut board, 19);
        board.set_current_piece(vertical_i_at(16, 0));

        board.hard_drop();

        assert_eq!(board.lines_cleared(), 1);
        assert_eq!(board.score(), line_clear_score(1) + HARD_DROP_LOCK_BONUS);

        // Old row 18 held only the I-piece cell in column 0.
        let mut expected_bottom_row = vec![0; 10];
        expected_bottom_row[0] = PieceKind::I.color();
        assert_eq!(board.grid().row(19), expected_bottom_row.as_slice());
        assert_eq!(board.grid().cell(17, 0), PieceKind::I.color());
        assert_eq!(board.grid().cell(18, 0), PieceKind::I.color());
        assert!(!board.grid().is_occupied(16, 0));
    }

    #[test]
    fn test_multi_line_bonus() {
        let mut board = board();
        fill_row_except_first(&mut board, 18);
        fill_row_except_first(&mut board, 19);
        board.set_current_piece(vertical_i_at(16, 0));

        board.hard_drop();

        assert_eq!(board.lines_cleared(), 2);
        assert_eq!(board.score(), 400 + HARD_DROP_LOCK_BONUS);
        assert_eq!(board.stats().line_clear_counter()[2], 1);
        assert_eq!(board.grid().cell(19, 0), PieceKind::I.color());
        assert_eq!(board.grid().cell(18, 0), PieceKind::I.color());
        assert!(!board.grid().is_occupied(17, 0));
    }

    #[test]
    fn test_soft_drop_lock_clears_lines() {
        let mut board = board();
        fill_row_except_first(&mut board, 19);
        board.set_current_piece(vertical_i_at(16, 0));

        assert!(!board.soft_drop());
        assert_eq!(board.lines_cleared(), 1);
        assert_eq!(board.score(), line_clear_score(1) + SOFT_DROP_LOCK_BONUS);
    }

    #[test]
    fn test_game_over() {
        let mut board = board();
        board.grid_mut().fill_row(0, PieceKind::Z);
        board.grid_mut().fill_row(1, PieceKind::Z);

        board.spawn_piece();
        assert!(board.is_game_over());

        let grid = board.grid().clone();
        let piece = *board.current_piece();
        let score = board.score();

        assert!(!board.move_piece(1, 0));
        assert!(!board.move_piece(0, 1));
        assert!(!board.rotate(RotationDirection::Clockwise));
        assert!(!board.soft_drop());
        board.hard_drop();
        board.spawn_piece();

        assert!(board.is_game_over());
        assert_eq!(*board.grid(), grid);
        assert_eq!(*board.current_piece(), piece);
        assert_eq!(board.score(), score);
    }

    #[test]
    fn test_lock_above_grid_drops_buffer_cells_and_ends_game() {
        let mut board = board();
        for col in 4..7 {
            board.grid_mut().fill_cell(1, col, PieceKind::J);
        }
        // T rotation 0 at row -1: (-1, 5), (0, 4), (0, 5), (0, 6).
        board.set_current_piece(Piece::with_placement(
            PieceKind::T,
            0,
            PiecePosition::new(-1, 4),
        ));

        assert!(!board.soft_drop());

        for col in 4..7 {
            assert_eq!(board.grid().cell(0, col), PieceKind::T.color());
        }
        assert!(board.is_game_over());
        assert_eq!(board.score(), SOFT_DROP_LOCK_BONUS);
    }

    #[test]
    fn test_lock_past_right_wall_drops_outside_cells() {
        let mut board = board();
        // I rotation 0 at col 8: row 1, cols 8..=11 on a 10-wide grid.
        board.set_current_piece(Piece::with_placement(
            PieceKind::I,
            0,
            PiecePosition::new(0, 8),
        ));

        board.hard_drop();

        assert_eq!(board.grid().cell(1, 8), PieceKind::I.color());
        assert_eq!(board.grid().cell(1, 9), PieceKind::I.color());
        assert_eq!(board.grid().rows().flatten().filter(|&&c| c != 0).count(), 2);
        assert_eq!(board.stats().locked_pieces(), 1);
        assert_eq!(board.score(), HARD_DROP_LOCK_BONUS);
    }

    #[test]
    fn test_narrow_board_is_immediately_over() {
        let config = BoardConfig::new(4, 20).unwrap();
        let board = Board::with_seed(config, PieceSeed::from_u64(3)).unwrap();
        assert!(board.is_game_over());
    }

    #[test]
    fn test_drop_position_matches_hard_drop() {
        let mut board = board();
        board.move_piece(-2, 0);
        let landing = board.drop_position();
        let kind = landing.kind();
        board.hard_drop();
        for cell in landing.occupied_cells() {
            let (row, col) = (
                usize::try_from(cell.row).unwrap(),
                usize::try_from(cell.col).unwrap(),
            );
            assert_eq!(board.grid().cell(row, col), kind.color());
        }
    }

    #[test]
    fn test_reset_clears_state() {
        let mut board = board();
        for _ in 0..5 {
            board.hard_drop();
        }
        assert!(board.score() > 0);

        board.reset();
        assert_eq!(board.score(), 0);
        assert_eq!(board.lines_cleared(), 0);
        assert_eq!(board.stats().locked_pieces(), 0);
        assert!(!board.is_game_over());
        assert_eq!(*board.grid(), Grid::new(10, 20));
        assert_eq!(board.upcoming().len(), PieceKind::LEN - 1);
    }

    #[test]
    fn test_reset_with_seed_matches_fresh_board() {
        let seed = PieceSeed::from_u64(77);
        let mut reused = board();
        for _ in 0..3 {
            reused.hard_drop();
        }
        reused.reset_with_seed(seed);
        let fresh = Board::with_seed(BoardConfig::default(), seed).unwrap();

        assert_eq!(reused.current_piece(), fresh.current_piece());
        assert!(reused.upcoming().eq(fresh.upcoming()));
    }

    #[test]
    fn test_peek_next_is_the_next_spawn() {
        let mut board = board();
        for _ in 0..20 {
            let next = board.peek_next();
            board.hard_drop();
            if board.is_game_over() {
                break;
            }
            assert_eq!(board.current_piece().kind(), next);
        }
    }

    #[test]
    fn test_random_play_invariants() {
        let mut actions = Pcg32::seed_from_u64(2024);
        let mut board = board();
        let mut last_score = 0;
        let mut last_lines = 0;
        for _ in 0..5000 {
            if board.is_game_over() {
                board.reset();
                last_score = 0;
                last_lines = 0;
            }
            apply_action(&mut board, actions.random_range(0..7));

            for cell in board.current_piece().occupied_cells() {
                assert!((0..10).contains(&cell.col), "{cell:?}");
                assert!(cell.row < 20, "{cell:?}");
            }
            for row in board.grid().rows() {
                assert!(row.iter().all(|&c| usize::from(c) <= PieceKind::LEN));
            }
            assert!(board.score() >= last_score);
            assert!(board.lines_cleared() >= last_lines);
            last_score = board.score();
            last_lines = board.lines_cleared();
        }
    }

    #[test]
    fn test_determinism() {
        let seed = PieceSeed::from_u64(555);
        let mut a = Board::with_seed(BoardConfig::default(), seed).unwrap();
        let mut b = Board::with_seed(BoardConfig::default(), seed).unwrap();
        let mut actions = Pcg32::seed_from_u64(9);
        for _ in 0..2000 {
            let action = actions.random_range(0..7);
            apply_action(&mut a, action);
            apply_action(&mut b, action);
            assert_eq!(a.grid(), b.grid());
            assert_eq!(a.current_piece(), b.current_piece());
            assert_eq!(a.score(), b.score());
            assert_eq!(a.is_game_over(), b.is_game_over());
        }
    }

    #[test]
    fn test_custom_rng_source() {
        let config = BoardConfig::default();
        let a = Board::with_rng(config, Pcg32::seed_from_u64(1)).unwrap();
        let b = Board::with_rng(config, Pcg32::seed_from_u64(1)).unwrap();
        assert_eq!(a.current_piece(), b.current_piece());
        assert!(a.upcoming().eq(b.upcoming()));
    }
}
