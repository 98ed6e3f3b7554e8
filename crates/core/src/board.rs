//! Board module - manages the game grid
//!
//! The board is a 10x20 grid where each cell is empty or holds the kind of the piece that
//! locked there. Uses a flat array for cache locality and zero-allocation.
//! Coordinates: (x, y) where x ranges 0..9 (left to right), y ranges 0..19 (top to bottom).
//! Pieces may protrude above row 0 (negative y) while spawning; those cells only need to stay
//! inside the side walls.

use arrayvec::ArrayVec;

use crate::pieces::MAX_SHAPE_DIM;
use crate::types::{Cell, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};

/// Total number of cells on the board
const BOARD_SIZE: usize = (BOARD_WIDTH * BOARD_HEIGHT) as usize;

const WIDTH: usize = BOARD_WIDTH as usize;
const HEIGHT: usize = BOARD_HEIGHT as usize;

/// Row-major copy of the grid (`rows[y][x]`)
pub type BoardRows = [[Cell; WIDTH]; HEIGHT];

/// Rows cleared by a single lock, top to bottom. A piece spans at most four rows.
pub type ClearedRows = ArrayVec<usize, MAX_SHAPE_DIM>;

/// The game board - 10 columns x 20 rows using flat array storage
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    /// Flat array of cells, row-major order (y * WIDTH + x)
    cells: [Cell; BOARD_SIZE],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [None; BOARD_SIZE],
        }
    }

    #[inline(always)]
    fn index(x: i8, y: i8) -> Option<usize> {
        if x < 0 || x >= BOARD_WIDTH as i8 || y < 0 || y >= BOARD_HEIGHT as i8 {
            return None;
        }
        Some((y as usize) * WIDTH + (x as usize))
    }

    pub fn width(&self) -> u8 {
        BOARD_WIDTH
    }

    pub fn height(&self) -> u8 {
        BOARD_HEIGHT
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        Self::index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match Self::index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Check if position is occupied (within bounds and filled)
    pub fn is_occupied(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(Some(_)))
    }

    /// Whether a piece cell may sit at (x, y)
    ///
    /// The column must be inside the walls and the row above the floor. Rows above the top
    /// (`y < 0`) skip the overlap test; visible rows must be empty.
    pub fn is_cell_free(&self, x: i8, y: i8) -> bool {
        if x < 0 || x >= BOARD_WIDTH as i8 || y >= BOARD_HEIGHT as i8 {
            return false;
        }
        y < 0 || !self.is_occupied(x, y)
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= HEIGHT {
            return false;
        }
        let start = y * WIDTH;
        self.cells[start..start + WIDTH].iter().all(|cell| cell.is_some())
    }

    /// Clear all full rows in one pass and return their indices (top to bottom)
    ///
    /// Full rows are identified first, then the remaining rows are compacted downwards in
    /// their original order and empty rows are written at the top.
    pub fn clear_full_rows(&mut self) -> ClearedRows {
        let mut cleared = ClearedRows::new();
        let mut write_y = HEIGHT;

        for read_y in (0..HEIGHT).rev() {
            if self.is_row_full(read_y) {
                if cleared.try_push(read_y).is_err() {
                    tracing::warn!(row = read_y, "more full rows than one piece can fill");
                }
            } else {
                write_y -= 1;
                if write_y != read_y {
                    let src = read_y * WIDTH;
                    self.cells.copy_within(src..src + WIDTH, write_y * WIDTH);
                }
            }
        }

        for cell in &mut self.cells[..write_y * WIDTH] {
            *cell = None;
        }

        cleared.reverse();
        cleared
    }

    /// Write piece cells at (x, y) as `kind`
    ///
    /// Cells above the board or outside the `i8` range are skipped; the number skipped is
    /// returned so the caller can report it. Cells are written unconditionally, so callers
    /// validate first.
    pub fn lock_cells(&mut self, shape: &[(i8, i8)], x: i8, y: i8, kind: PieceKind) -> usize {
        let mut skipped = 0;
        for &(dx, dy) in shape {
            let placed = match (x.checked_add(dx), y.checked_add(dy)) {
                (Some(cx), Some(cy)) => self.set(cx, cy, Some(kind)),
                _ => false,
            };
            if !placed {
                skipped += 1;
            }
        }
        skipped
    }

    /// Height of the tallest column
    ///
    /// A column contributes `20 - topmost occupied row`, or 0 when empty.
    pub fn stack_height(&self) -> u32 {
        (0..WIDTH)
            .map(|x| {
                (0..HEIGHT)
                    .find(|&y| self.cells[y * WIDTH + x].is_some())
                    .map_or(0, |top| (HEIGHT - top) as u32)
            })
            .max()
            .unwrap_or(0)
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Copy into a row-major 2D array
    pub fn rows(&self) -> BoardRows {
        let mut rows = [[None; WIDTH]; HEIGHT];
        for (y, row) in rows.iter_mut().enumerate() {
            row.copy_from_slice(&self.cells[y * WIDTH..(y + 1) * WIDTH]);
        }
        rows
    }

    /// Build from a row-major 2D array
    pub fn from_rows(rows: &BoardRows) -> Self {
        let mut board = Self::new();
        for (y, row) in rows.iter().enumerate() {
            board.cells[y * WIDTH..(y + 1) * WIDTH].copy_from_slice(row);
        }
        board
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        self.cells = [None; BOARD_SIZE];
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill_row(board: &mut Board, y: i8, kind: PieceKind) {
        for x in 0..BOARD_WIDTH as i8 {
            board.set(x, y, Some(kind));
        }
    }

    #[test]
    fn test_board_index_calculation() {
        assert_eq!(Board::index(0, 0), Some(0));
        assert_eq!(Board::index(9, 0), Some(9));
        assert_eq!(Board::index(0, 1), Some(10));
        assert_eq!(Board::index(9, 19), Some(199));
        assert_eq!(Board::index(-1, 0), None);
        assert_eq!(Board::index(10, 0), None);
        assert_eq!(Board::index(0, 20), None);
    }

    #[test]
    fn test_cell_free_above_board() {
        let board = Board::new();
        assert!(board.is_cell_free(0, -2));
        assert!(board.is_cell_free(9, -1));
        assert!(!board.is_cell_free(-1, -1));
        assert!(!board.is_cell_free(10, -1));
        assert!(!board.is_cell_free(0, 20));
    }

    #[test]
    fn test_cell_free_overlap() {
        let mut board = Board::new();
        board.set(4, 10, Some(PieceKind::T));
        assert!(!board.is_cell_free(4, 10));
        assert!(board.is_cell_free(4, 9));
    }

    #[test]
    fn test_stack_height() {
        let mut board = Board::new();
        assert_eq!(board.stack_height(), 0);

        board.set(0, 19, Some(PieceKind::O));
        assert_eq!(board.stack_height(), 1);

        // Overhang: topmost cell decides, holes underneath don't matter.
        board.set(7, 12, Some(PieceKind::Z));
        assert_eq!(board.stack_height(), 8);

        board.set(3, 0, Some(PieceKind::I));
        assert_eq!(board.stack_height(), 20);
    }

    #[test]
    fn test_clear_rows_preserves_order() {
        let mut board = Board::new();
        fill_row(&mut board, 19, PieceKind::I);
        board.set(2, 18, Some(PieceKind::T));
        fill_row(&mut board, 17, PieceKind::L);
        board.set(5, 16, Some(PieceKind::S));

        let cleared = board.clear_full_rows();
        assert_eq!(cleared.as_slice(), &[17, 19]);

        assert_eq!(board.get(2, 19), Some(Some(PieceKind::T)));
        assert_eq!(board.get(5, 18), Some(Some(PieceKind::S)));
        assert_eq!(board.cells().iter().filter(|c| c.is_some()).count(), 2);
        assert!(!board.is_row_full(19));
    }

    #[test]
    fn test_lock_cells_skips_rows_above_top() {
        let mut board = Board::new();
        let skipped = board.lock_cells(&[(0, 0), (0, 1), (0, 2)], 4, -1, PieceKind::I);
        assert_eq!(skipped, 1);
        assert_eq!(board.get(4, 0), Some(Some(PieceKind::I)));
        assert_eq!(board.get(4, 1), Some(Some(PieceKind::I)));
    }

    #[test]
    fn test_lock_cells_out_of_range_offsets() {
        let mut board = Board::new();
        let skipped = board.lock_cells(&[(0, 0), (1, 0)], i8::MAX, 19, PieceKind::T);
        assert_eq!(skipped, 2);
        assert_eq!(board.cells().iter().filter(|c| c.is_some()).count(), 0);
    }

    #[test]
    fn test_rows_round_trip() {
        let mut board = Board::new();
        board.set(3, 5, Some(PieceKind::O));
        board.set(9, 19, Some(PieceKind::Float));
        assert_eq!(Board::from_rows(&board.rows()), board);
    }
}
