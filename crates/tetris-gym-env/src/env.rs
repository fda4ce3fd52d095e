use serde::{Deserialize, Serialize};
use tetris_gym_engine::{Board, BoardConfig, ConfigError, PieceSeed, RotationDirection};

use crate::{
    action::Action,
    observation::{Observation, ObservationSpace, StepInfo, board_with_piece},
};

/// Environment settings.
///
/// ```
/// use tetris_gym_env::EnvConfig;
///
/// let config: EnvConfig = serde_json::from_str(
///     r#"{ "board": { "width": 8, "height": 16 }, "max_episode_steps": null }"#,
/// )
/// .unwrap();
/// assert_eq!(config.board.width, 8);
/// assert_eq!(config.max_episode_steps, None);
/// assert_eq!(config.game_over_penalty, 100);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnvConfig {
    pub board: BoardConfig,
    /// Steps after which an episode is truncated; `None` or `0` never
    /// truncates.
    pub max_episode_steps: Option<u64>,
    /// Subtracted from the reward of the step that ends the game.
    pub game_over_penalty: i64,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            board: BoardConfig::default(),
            max_episode_steps: Some(Self::DEFAULT_MAX_EPISODE_STEPS),
            game_over_penalty: Self::DEFAULT_GAME_OVER_PENALTY,
        }
    }
}

impl EnvConfig {
    pub const DEFAULT_MAX_EPISODE_STEPS: u64 = 10_000;
    pub const DEFAULT_GAME_OVER_PENALTY: i64 = 100;

    /// The effective step limit, with `Some(0)` read as no limit.
    #[must_use]
    pub fn step_limit(&self) -> Option<u64> {
        self.max_episode_steps.filter(|&max| max > 0)
    }
}

/// Result of one [`TetrisEnv::step`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Step {
    pub observation: Observation,
    /// Score gained by the step, minus the game-over penalty if the step
    /// ended the game.
    pub reward: i64,
    /// The game is over.
    pub terminated: bool,
    /// The step limit was reached before the game ended.
    pub truncated: bool,
    pub info: StepInfo,
}

impl Step {
    /// Either end flag is set.
    #[must_use]
    pub const fn is_done(&self) -> bool {
        self.terminated || self.truncated
    }
}

/// Episodic Tetris environment with seven discrete actions.
///
/// The environment owns a single [`Board`] for its whole lifetime and
/// restarts it on [`reset`](Self::reset).
#[derive(Debug, Clone)]
pub struct TetrisEnv {
    config: EnvConfig,
    board: Board,
    elapsed_steps: u64,
}

impl TetrisEnv {
    /// Creates an environment seeded from the system random source.
    pub fn new(config: EnvConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            board: Board::new(config.board)?,
            config,
            elapsed_steps: 0,
        })
    }

    /// Creates an environment with a reproducible piece sequence.
    pub fn with_seed(config: EnvConfig, seed: PieceSeed) -> Result<Self, ConfigError> {
        Ok(Self {
            board: Board::with_seed(config.board, seed)?,
            config,
            elapsed_steps: 0,
        })
    }

    #[must_use]
    pub const fn config(&self) -> &EnvConfig {
        &self.config
    }

    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// Steps taken since the last reset.
    #[must_use]
    pub const fn elapsed_steps(&self) -> u64 {
        self.elapsed_steps
    }

    /// Size of the discrete action space.
    #[must_use]
    pub const fn action_count() -> usize {
        Action::COUNT
    }

    #[must_use]
    pub const fn observation_space(&self) -> ObservationSpace {
        ObservationSpace::new(self.config.board.width, self.config.board.height)
    }

    /// Starts a new episode.
    ///
    /// With a seed the piece sequence restarts from it; without one the
    /// environment keeps drawing from its current random stream.
    pub fn reset(&mut self, seed: Option<PieceSeed>) -> (Observation, StepInfo) {
        match seed {
            Some(seed) => self.board.reset_with_seed(seed),
            None => self.board.reset(),
        }
        self.elapsed_steps = 0;
        tracing::debug!(?seed, "episode reset");
        (self.observation(), self.info())
    }

    /// Applies `action` and advances the step counter.
    ///
    /// Stepping a finished game is allowed: the board ignores the action,
    /// the reward is zero and `terminated` stays set.
    pub fn step(&mut self, action: Action) -> Step {
        let score_before = self.board.score();
        let was_over = self.board.is_game_over();

        match action {
            Action::Noop | Action::SoftDrop => _ = self.board.soft_drop(),
            Action::MoveLeft => _ = self.board.move_piece(-1, 0),
            Action::MoveRight => _ = self.board.move_piece(1, 0),
            Action::RotateClockwise => _ = self.board.rotate(RotationDirection::Clockwise),
            Action::RotateCounterClockwise => {
                _ = self.board.rotate(RotationDirection::CounterClockwise);
            }
            Action::HardDrop => self.board.hard_drop(),
        }
        self.elapsed_steps += 1;

        let gained = self.board.score() - score_before;
        let mut reward = i64::try_from(gained).unwrap_or(i64::MAX);
        let terminated = self.board.is_game_over();
        if terminated && !was_over {
            reward -= self.config.game_over_penalty;
            tracing::info!(
                steps = self.elapsed_steps,
                score = self.board.score(),
                lines = self.board.lines_cleared(),
                "episode terminated"
            );
        }
        let truncated = !terminated
            && self
                .config
                .step_limit()
                .is_some_and(|max| self.elapsed_steps >= max);
        if truncated {
            tracing::info!(
                steps = self.elapsed_steps,
                score = self.board.score(),
                "episode truncated"
            );
        }
        tracing::trace!(%action, reward, "step");

        Step {
            observation: self.observation(),
            reward,
            terminated,
            truncated,
            info: self.info(),
        }
    }

    /// The current observation.
    pub fn observation(&mut self) -> Observation {
        Observation::capture(&mut self.board)
    }

    #[must_use]
    pub fn info(&self) -> StepInfo {
        StepInfo::capture(&self.board)
    }

    /// Plain-text frame: one line per row, `█` for a filled cell and a space
    /// for an empty one. The falling piece is included.
    #[must_use]
    pub fn render_ansi(&self) -> String {
        let mut out = String::new();
        for row in board_with_piece(&self.board) {
            out.extend(row.iter().map(|&cell| if cell > 0 { '█' } else { ' ' }));
            out.push('\n');
        }
        out
    }

    /// Framed view with double-width cells, the score line and the next piece.
    pub fn render_framed(&mut self) -> String {
        let width = self.config.board.width * 2 + 2;
        let border = "=".repeat(width);
        let next = self.board.peek_next();

        let mut out = String::new();
        out.push_str(&border);
        out.push('\n');
        for row in board_with_piece(&self.board) {
            out.push('|');
            for &cell in &row {
                out.push_str(if cell > 0 { "██" } else { "  " });
            }
            out.push_str("|\n");
        }
        out.push_str(&border);
        out.push('\n');
        out.push_str(&format!(
            "Score: {} | Lines: {}\n",
            self.board.score(),
            self.board.lines_cleared()
        ));
        out.push_str(&format!("Next Piece: {next}\n"));
        out
    }
}
