use serde::Serialize;

/// Points for a lock that ended a soft drop.
pub const SOFT_DROP_LOCK_BONUS: u64 = 1;

/// Points for a lock that ended a hard drop.
pub const HARD_DROP_LOCK_BONUS: u64 = 2;

/// Points for clearing `lines` rows with a single lock: `100 × lines²`.
///
/// ```
/// use tetris_gym_engine::line_clear_score;
///
/// assert_eq!(line_clear_score(1), 100);
/// assert_eq!(line_clear_score(2), 400);
/// assert_eq!(line_clear_score(4), 1600);
/// ```
#[must_use]
pub const fn line_clear_score(lines: usize) -> u64 {
    let lines = lines as u64;
    100 * lines * lines
}

/// Game statistics tracking score, lines cleared, and piece count.
///
/// - **Score**: quadratic line-clear points plus flat placement bonuses
/// - **Lines cleared**: total rows removed
/// - **Locked pieces**: number of pieces committed to the grid
/// - **Line clear distribution**: locks by number of rows they cleared
///
/// Every counter only grows until the owning board is reset.
///
/// # Scoring
///
/// Deliberately simple:
/// - No level multiplier
/// - No combo or back-to-back bonuses
/// - No T-spin scoring
///
/// # Example
///
/// ```
/// use tetris_gym_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// stats.record_lock(2);
///
/// assert_eq!(stats.score(), 400);
/// assert_eq!(stats.lines_cleared(), 2);
/// assert_eq!(stats.line_clear_counter()[2], 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GameStats {
    score: u64,
    lines_cleared: usize,
    locked_pieces: usize,
    line_clear_counter: [usize; 5],
}

impl GameStats {
    /// Creates a new game statistics tracker with all counters at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            lines_cleared: 0,
            locked_pieces: 0,
            line_clear_counter: [0; 5],
        }
    }

    #[must_use]
    pub const fn score(&self) -> u64 {
        self.score
    }

    #[must_use]
    pub const fn lines_cleared(&self) -> usize {
        self.lines_cleared
    }

    #[must_use]
    pub const fn locked_pieces(&self) -> usize {
        self.locked_pieces
    }

    /// Returns a histogram of locks by rows cleared.
    ///
    /// - `[0]`: locks that cleared nothing
    /// - `[1]`..`[4]`: singles, doubles, triples, tetrises
    #[must_use]
    pub const fn line_clear_counter(&self) -> &[usize; 5] {
        &self.line_clear_counter
    }

    /// Records a piece lock that cleared `cleared_lines` rows.
    pub const fn record_lock(&mut self, cleared_lines: usize) {
        self.locked_pieces += 1;
        self.lines_cleared += cleared_lines;
        if cleared_lines < self.line_clear_counter.len() {
            self.line_clear_counter[cleared_lines] += 1;
        }
        self.score += line_clear_score(cleared_lines);
    }

    /// Adds a flat bonus such as [`SOFT_DROP_LOCK_BONUS`].
    pub const fn add_bonus(&mut self, points: u64) {
        self.score += points;
    }
}
