use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    widgets::{Paragraph, Widget},
};
use tetris_gym_engine::PieceKind;

use crate::view::widgets::style;

/// What a single playfield cell shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellView {
    Empty,
    /// Landing preview of the falling piece.
    Ghost,
    Piece(PieceKind),
}

impl CellView {
    /// Interprets a grid value (`0` empty, otherwise a piece color).
    #[must_use]
    pub fn from_grid_value(value: u8) -> Self {
        PieceKind::from_color(value).map_or(Self::Empty, Self::Piece)
    }
}

#[derive(Debug)]
pub struct CellDisplay {
    style: Style,
    symbol: &'static str,
}

impl CellDisplay {
    pub const WIDTH: u16 = 2;
    pub const HEIGHT: u16 = 1;

    #[must_use]
    pub const fn from_cell(cell: CellView, show_dots: bool) -> Self {
        let (style, symbol) = match cell {
            CellView::Empty if show_dots => (style::EMPTY_DOT, "."),
            CellView::Empty => (style::EMPTY, ""),
            CellView::Ghost => (style::GHOST, "[]"),
            CellView::Piece(kind) => (style::piece(kind), ""),
        };
        Self { style, symbol }
    }
}

impl Widget for &CellDisplay {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Paragraph fills the whole area with the style, not only the symbol.
        Paragraph::new(self.symbol)
            .style(self.style)
            .centered()
            .render(area, buf);
    }
}
