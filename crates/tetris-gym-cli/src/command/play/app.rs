use std::time::{Duration, Instant};

use crossterm::event::{Event, KeyCode};
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
};
use tetris_gym_engine::{Board, PieceKind, RotationDirection};

use crate::{
    tui::{App, RenderMode, Tui},
    view::widgets::{GameDisplay, KeyBinding, KeyBindingDisplay, PlayState},
};

/// Time between gravity steps.
const GRAVITY_INTERVAL: Duration = Duration::from_millis(500);
/// Time between gravity steps while soft drop is held.
const SOFT_DROP_INTERVAL: Duration = Duration::from_millis(50);
/// How long a soft-drop key press keeps fast gravity active.
///
/// Terminals report key repeats but not releases.
const SOFT_DROP_HOLD: Duration = Duration::from_millis(150);
const FPS: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Input {
    MoveLeft,
    MoveRight,
    RotateClockwise,
    RotateCounterClockwise,
    SoftDrop,
    HardDrop,
    Pause,
    Quit,
}

impl Input {
    fn from_key(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::Left | KeyCode::Char('a') => Some(Self::MoveLeft),
            KeyCode::Right | KeyCode::Char('d') => Some(Self::MoveRight),
            KeyCode::Up | KeyCode::Char('w') => Some(Self::RotateClockwise),
            KeyCode::Char('z') => Some(Self::RotateCounterClockwise),
            KeyCode::Down | KeyCode::Char('s') => Some(Self::SoftDrop),
            KeyCode::Char(' ') => Some(Self::HardDrop),
            KeyCode::Char('p') => Some(Self::Pause),
            KeyCode::Char('q') | KeyCode::Esc => Some(Self::Quit),
            _ => None,
        }
    }

    fn bindings(state: PlayState) -> &'static [KeyBinding<'static>] {
        match state {
            PlayState::Playing => &[
                (&["←", "a", "→", "d"], "Move"),
                (&["↑", "w"], "Rotate"),
                (&["z"], "Rotate Back"),
                (&["↓", "s"], "Soft Drop"),
                (&["Space"], "Hard Drop"),
                (&["p"], "Pause"),
                (&["q", "Esc"], "Quit"),
            ],
            PlayState::Paused => &[(&["p"], "Resume"), (&["q", "Esc"], "Quit")],
            PlayState::GameOver => &[(&["q", "Esc"], "Quit")],
        }
    }
}

#[derive(Debug)]
pub struct PlayApp {
    board: Board,
    next_piece: PieceKind,
    show_ghost: bool,
    state: PlayState,
    is_exiting: bool,
    last_fall: Instant,
    fast_fall_until: Option<Instant>,
}

impl PlayApp {
    pub fn new(mut board: Board, show_ghost: bool) -> Self {
        let state = if board.is_game_over() {
            PlayState::GameOver
        } else {
            PlayState::Playing
        };
        Self {
            next_piece: board.peek_next(),
            board,
            show_ghost,
            state,
            is_exiting: false,
            last_fall: Instant::now(),
            fast_fall_until: None,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    fn apply(&mut self, input: Input, now: Instant) {
        match input {
            Input::MoveLeft => _ = self.board.move_piece(-1, 0),
            Input::MoveRight => _ = self.board.move_piece(1, 0),
            Input::RotateClockwise => _ = self.board.rotate(RotationDirection::Clockwise),
            Input::RotateCounterClockwise => {
                _ = self.board.rotate(RotationDirection::CounterClockwise);
            }
            Input::SoftDrop => {
                self.fast_fall_until = Some(now + SOFT_DROP_HOLD);
                self.fall(now);
            }
            Input::HardDrop => {
                self.board.hard_drop();
                self.last_fall = now;
            }
            Input::Pause | Input::Quit => {}
        }
        self.sync();
    }

    fn fall(&mut self, now: Instant) {
        self.board.soft_drop();
        self.last_fall = now;
    }

    fn fall_interval(&self, now: Instant) -> Duration {
        if self.fast_fall_until.is_some_and(|until| now < until) {
            SOFT_DROP_INTERVAL
        } else {
            GRAVITY_INTERVAL
        }
    }

    fn sync(&mut self) {
        self.next_piece = self.board.peek_next();
        if self.board.is_game_over() && !self.state.is_game_over() {
            self.state = PlayState::GameOver;
            tracing::info!(score = self.board.score(), "player topped out");
        }
    }

    fn toggle_pause(&mut self, now: Instant) {
        self.state = match self.state {
            PlayState::Playing => PlayState::Paused,
            PlayState::Paused => {
                self.last_fall = now;
                PlayState::Playing
            }
            PlayState::GameOver => PlayState::GameOver,
        };
    }
}

impl App for PlayApp {
    fn init(&mut self, tui: &mut Tui) {
        tui.set_tick_interval(Some(SOFT_DROP_INTERVAL));
        tui.set_render_mode(RenderMode::from_frame_rate(FPS));
    }

    fn should_exit(&self) -> bool {
        self.is_exiting
    }

    fn handle_event(&mut self, _tui: &mut Tui, event: &Event) {
        let Some(key) = event.as_key_press_event() else {
            return;
        };
        let Some(input) = Input::from_key(key.code) else {
            return;
        };
        let now = Instant::now();
        match input {
            Input::Quit => self.is_exiting = true,
            Input::Pause => self.toggle_pause(now),
            _ if self.state.is_playing() => self.apply(input, now),
            _ => {}
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let mut game = GameDisplay::new(
            self.board.grid(),
            self.board.stats(),
            *self.board.current_piece(),
            self.next_piece,
            self.state,
        );
        if self.show_ghost && !self.state.is_game_over() {
            game = game.ghost(self.board.drop_position());
        }

        let [main_area, help_area] =
            Layout::vertical([Constraint::Length(game.height()), Constraint::Length(1)])
                .areas(frame.area());
        frame.render_widget(game, main_area);
        frame.render_widget(KeyBindingDisplay::new(Input::bindings(self.state)), help_area);
    }

    fn update(&mut self, _tui: &mut Tui) {
        if !self.state.is_playing() {
            return;
        }
        let now = Instant::now();
        if now.duration_since(self.last_fall) >= self.fall_interval(now) {
            self.fall(now);
            self.sync();
        }
    }
}
