use std::iter;

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};
use tetris_gym_engine::{Grid, Piece};

use crate::view::widgets::{CellDisplay, CellView};

/// The playfield: locked cells, the falling piece and its ghost.
#[derive(Debug)]
pub struct BoardDisplay<'a> {
    grid: &'a Grid,
    ghost: Option<Piece>,
    falling_piece: Option<Piece>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    pub fn new(grid: &'a Grid) -> Self {
        Self {
            grid,
            ghost: None,
            falling_piece: None,
            block: None,
        }
    }

    pub fn ghost(self, piece: Piece) -> Self {
        Self {
            ghost: Some(piece),
            ..self
        }
    }

    pub fn falling_piece(self, piece: Piece) -> Self {
        Self {
            falling_piece: Some(piece),
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
        super::cells_to_u16(self.grid.width()) * CellDisplay::WIDTH
            + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        super::cells_to_u16(self.grid.height()) * CellDisplay::HEIGHT
            + super::block_vertical_margin(self.block.as_ref())
    }

    /// Cell contents with the ghost and falling piece composed over the grid.
    fn compose(&self) -> Vec<Vec<CellView>> {
        let mut cells = self
            .grid
            .rows()
            .map(|row| row.iter().copied().map(CellView::from_grid_value).collect())
            .collect::<Vec<Vec<_>>>();

        let mut paint = |piece: Piece, view: CellView| {
            for cell in piece.occupied_cells() {
                if !self.grid.contains(cell.row, cell.col) {
                    continue;
                }
                let (Ok(row), Ok(col)) = (usize::try_from(cell.row), usize::try_from(cell.col))
                else {
                    continue;
                };
                let target = &mut cells[row][col];
                // The ghost never hides locked cells.
                if view != CellView::Ghost || *target == CellView::Empty {
                    *target = view;
                }
            }
        };
        if let Some(ghost) = self.ghost {
            paint(ghost, CellView::Ghost);
        }
        if let Some(piece) = self.falling_piece {
            paint(piece, CellView::Piece(piece.kind()));
        }
        cells
    }
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let horizontal = Layout::horizontal(
            (0..self.grid.width()).map(|_| Constraint::Length(CellDisplay::WIDTH)),
        )
        .flex(Flex::Center);
        let vertical =
            Layout::vertical((0..self.grid.height()).map(|_| Constraint::Length(CellDisplay::HEIGHT)));
        let cell_areas = area
            .layout_vec(&vertical)
            .into_iter()
            .map(|row| row.layout_vec(&horizontal));

        for (row_areas, row) in iter::zip(cell_areas, self.compose()) {
            for (cell_area, cell) in iter::zip(row_areas, row) {
                CellDisplay::from_cell(cell, true).render(cell_area, buf);
            }
        }
    }
}
