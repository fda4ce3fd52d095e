use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};
use tetris_gym_engine::PieceKind;

use crate::view::widgets::{CellDisplay, CellView};

/// A single piece in its spawn rotation, centered in a 4×2 box.
#[derive(Debug)]
pub struct PieceDisplay<'a> {
    piece: Option<PieceKind>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> PieceDisplay<'a> {
    pub fn new() -> Self {
        Self {
            piece: None,
            block: None,
        }
    }

    pub fn piece(self, piece: PieceKind) -> Self {
        Self {
            piece: Some(piece),
            ..self
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        4 * CellDisplay::WIDTH + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        2 * CellDisplay::HEIGHT + super::block_vertical_margin(self.block.as_ref())
    }
}

/// Spawn-rotation cells shifted so the bounding box starts at `(0, 0)`,
/// plus the box size as `(rows, cols)`.
fn normalized_cells(kind: PieceKind) -> ([(u16, u16); 4], (u16, u16)) {
    let cells = kind.cells(0);
    let min_row = cells.iter().map(|&(r, _)| r).min().unwrap_or(0);
    let min_col = cells.iter().map(|&(_, c)| c).min().unwrap_or(0);
    let shift = |offset: i32, min: i32| u16::try_from(offset - min).unwrap_or(0);
    let normalized = cells.map(|(r, c)| (shift(r, min_row), shift(c, min_col)));
    let rows = normalized.iter().map(|&(r, _)| r + 1).max().unwrap_or(0);
    let cols = normalized.iter().map(|&(_, c)| c + 1).max().unwrap_or(0);
    (normalized, (rows, cols))
}

impl Widget for PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);
        CellDisplay::from_cell(CellView::Empty, false).render(area, buf);

        let Some(kind) = self.piece else {
            return;
        };
        let (cells, (rows, cols)) = normalized_cells(kind);
        let piece_area = area.centered(
            Constraint::Length(cols * CellDisplay::WIDTH),
            Constraint::Length(rows * CellDisplay::HEIGHT),
        );
        let occupied = CellDisplay::from_cell(CellView::Piece(kind), false);
        for (row, col) in cells {
            let cell_area = Rect::new(
                piece_area.x + col * CellDisplay::WIDTH,
                piece_area.y + row * CellDisplay::HEIGHT,
                CellDisplay::WIDTH,
                CellDisplay::HEIGHT,
            )
            .intersection(piece_area);
            occupied.render(cell_area, buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_bounding_boxes() {
        assert_eq!(normalized_cells(PieceKind::I).1, (1, 4));
        assert_eq!(normalized_cells(PieceKind::O).1, (2, 2));
        assert_eq!(normalized_cells(PieceKind::T).1, (2, 3));
        let (cells, _) = normalized_cells(PieceKind::I);
        assert_eq!(cells, [(0, 0), (0, 1), (0, 2), (0, 3)]);
    }
}
