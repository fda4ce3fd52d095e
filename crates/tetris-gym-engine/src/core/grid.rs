use super::piece::PieceKind;

/// Grid value of an empty cell.
pub const EMPTY_CELL: u8 = 0;

/// The locked cells of the playfield.
///
/// Stored row-major, `height` rows of `width` cells each. Row 0 is the top.
/// A cell is [`EMPTY_CELL`] or the [`PieceKind::color`] of the piece that
/// locked there; writes only go through [`PieceKind`], so every value stays
/// within `0..=7`.
///
/// # Example
///
/// ```
/// use tetris_gym_engine::{Grid, PieceKind};
///
/// let mut grid = Grid::new(4, 3);
/// for col in 0..4 {
///     grid.fill_cell(2, col, PieceKind::O);
/// }
/// grid.fill_cell(1, 0, PieceKind::T);
///
/// assert_eq!(grid.clear_full_rows(), 1);
/// assert_eq!(grid.cell(2, 0), PieceKind::T.color());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<u8>,
}

impl Grid {
    /// Creates an all-empty grid.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![EMPTY_CELL; width * height],
        }
    }

    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Returns `true` if `(row, col)` lies inside the grid.
    #[must_use]
    pub fn contains(&self, row: i32, col: i32) -> bool {
        usize::try_from(row).is_ok_and(|r| r < self.height)
            && usize::try_from(col).is_ok_and(|c| c < self.width)
    }

    /// Returns the cell value at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate is outside the grid.
    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> u8 {
        self.cells[self.offset(row, col)]
    }

    #[must_use]
    pub fn is_occupied(&self, row: usize, col: usize) -> bool {
        self.cell(row, col) != EMPTY_CELL
    }

    /// Writes the color of `kind` into `(row, col)`.
    pub fn fill_cell(&mut self, row: usize, col: usize, kind: PieceKind) {
        let offset = self.offset(row, col);
        self.cells[offset] = kind.color();
    }

    pub fn clear_cell(&mut self, row: usize, col: usize) {
        let offset = self.offset(row, col);
        self.cells[offset] = EMPTY_CELL;
    }

    /// Fills every cell of `row` with `kind`.
    pub fn fill_row(&mut self, row: usize, kind: PieceKind) {
        self.row_mut(row).fill(kind.color());
    }

    /// Empties every cell.
    pub fn clear(&mut self) {
        self.cells.fill(EMPTY_CELL);
    }

    #[must_use]
    pub fn row(&self, row: usize) -> &[u8] {
        &self.cells[row * self.width..][..self.width]
    }

    fn row_mut(&mut self, row: usize) -> &mut [u8] {
        &mut self.cells[row * self.width..][..self.width]
    }

    /// Iterates rows top to bottom.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[u8]> + '_ {
        // `chunks_exact(0)` panics; a zero-width grid has no cells to chunk.
        self.cells.chunks_exact(self.width.max(1))
    }

    /// A row is full when none of its cells is empty.
    #[must_use]
    pub fn is_row_full(&self, row: usize) -> bool {
        self.row(row).iter().all(|&cell| cell != EMPTY_CELL)
    }

    /// Removes every full row and returns how many were removed.
    ///
    /// The remaining rows keep their relative order and settle to the bottom;
    /// the same number of empty rows appear at the top.
    pub fn clear_full_rows(&mut self) -> usize {
        let mut count = 0;
        for row in (0..self.height).rev() {
            if self.is_row_full(row) {
                count += 1;
                continue;
            }
            if count > 0 {
                let start = row * self.width;
                self.cells
                    .copy_within(start..start + self.width, start + count * self.width);
            }
        }
        self.cells[..count * self.width].fill(EMPTY_CELL);
        count
    }

    fn offset(&self, row: usize, col: usize) -> usize {
        assert!(
            row < self.height && col < self.width,
            "cell ({row}, {col}) is outside the {}x{} grid",
            self.width,
            self.height
        );
        row * self.width + col
    }
}
