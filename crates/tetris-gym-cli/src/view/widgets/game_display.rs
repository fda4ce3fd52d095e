use ratatui::{
    layout::{Constraint, Flex, Layout},
    prelude::{Buffer, Rect},
    style::Style,
    text::{Line, Text},
    widgets::{Block, Clear, Padding, Widget},
};
use tetris_gym_engine::{GameStats, Grid, Piece, PieceKind};

use crate::view::widgets::{BoardDisplay, PieceDisplay, StatsDisplay, color, style};

/// Whether the interactive game is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum PlayState {
    Playing,
    Paused,
    GameOver,
}

/// Stats panel, playfield and next-piece preview side by side.
#[derive(Debug)]
pub struct GameDisplay<'a> {
    grid: &'a Grid,
    stats: &'a GameStats,
    falling_piece: Piece,
    ghost: Option<Piece>,
    next_piece: PieceKind,
    state: PlayState,
}

impl<'a> GameDisplay<'a> {
    pub fn new(
        grid: &'a Grid,
        stats: &'a GameStats,
        falling_piece: Piece,
        next_piece: PieceKind,
        state: PlayState,
    ) -> Self {
        Self {
            grid,
            stats,
            falling_piece,
            ghost: None,
            next_piece,
            state,
        }
    }

    pub fn ghost(self, ghost: Piece) -> Self {
        Self {
            ghost: Some(ghost),
            ..self
        }
    }

    pub fn height(&self) -> u16 {
        self.board().height()
    }

    fn board(&self) -> BoardDisplay<'a> {
        let border = self.border_color();
        let board = BoardDisplay::new(self.grid)
            .falling_piece(self.falling_piece)
            .block(Block::bordered().border_style(border).style(style::DEFAULT));
        match self.ghost {
            Some(ghost) => board.ghost(ghost),
            None => board,
        }
    }

    fn border_color(&self) -> ratatui::style::Color {
        match self.state {
            PlayState::Playing => color::WHITE,
            PlayState::Paused => color::YELLOW,
            PlayState::GameOver => color::RED,
        }
    }

    fn panel(&self, title: &'static str) -> Block<'static> {
        Block::bordered()
            .title(Line::from(title).centered())
            .padding(Padding::horizontal(1))
            .border_style(self.border_color())
            .style(style::DEFAULT)
    }
}

impl Widget for GameDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let board = self.board();
        let next = PieceDisplay::new()
            .piece(self.next_piece)
            .block(self.panel("NEXT"));
        let stats = StatsDisplay::new(self.stats).block(self.panel("STATS"));

        let [left_column, center_column, right_column] = Layout::horizontal([
            Constraint::Length(stats.width()),
            Constraint::Length(board.width()),
            Constraint::Length(next.width()),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(area);

        let [stats_area] = Layout::vertical([Constraint::Length(stats.height())]).areas(left_column);
        let [board_area] = Layout::vertical([Constraint::Length(board.height())]).areas(center_column);
        let [next_area] = Layout::vertical([Constraint::Length(next.height())]).areas(right_column);

        let board_width = board.width();
        stats.render(stats_area, buf);
        board.render(board_area, buf);
        next.render(next_area, buf);

        let popup = match self.state {
            PlayState::Playing => None,
            PlayState::Paused => Some(("PAUSED", Style::new().fg(color::BLACK).bg(color::YELLOW))),
            PlayState::GameOver => {
                Some(("GAME OVER!!", Style::new().fg(color::WHITE).bg(color::RED)))
            }
        };
        if let Some((text, style)) = popup {
            let block = Block::new().style(style);
            let area = board_area.centered(Constraint::Length(board_width), Constraint::Length(3));
            let inner = block.inner(area);
            Clear.render(area, buf);
            block.render(area, buf);
            Text::styled(text, style)
                .centered()
                .render(inner.centered_vertically(Constraint::Length(1)), buf);
        }
    }
}
