use crate::geometry::Offset;
use crate::piece::{spawn_origin, TetrominoType};

pub const GRID_WIDTH: usize = 10;
pub const GRID_HEIGHT: usize = 20;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CellState {
    Empty,
    Filled(TetrominoType),
}

impl CellState {
    pub fn is_filled(self) -> bool {
        self != CellState::Empty
    }
}

/// Settled cells. Row 0 is the top visible row; rows above it (negative)
/// exist only for falling pieces and always count as empty.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Board {
    width: usize,
    height: usize,
    rows: Vec<Vec<CellState>>,
}

impl Board {
    /// Both sizes must fit in the `i16` coordinates pieces use.
    pub fn new(width: usize, height: usize) -> Self {
        assert!(
            i16::try_from(width).is_ok() && i16::try_from(height).is_ok(),
            "board size {width}x{height} exceeds cell coordinate range"
        );
        Self {
            width,
            height,
            rows: vec![vec![CellState::Empty; width]; height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn rows(&self) -> &[Vec<CellState>] {
        &self.rows
    }

    pub fn spawn_origin(&self, kind: TetrominoType) -> Offset {
        spawn_origin(self.width, kind)
    }

    /// Cell at `(x, y)`, or `None` outside the visible grid.
    pub fn get(&self, x: i16, y: i16) -> Option<CellState> {
        let (x, y) = self.index(x, y)?;
        Some(self.rows[y][x])
    }

    pub fn set(&mut self, x: i16, y: i16, cell: CellState) -> bool {
        match self.index(x, y) {
            Some((x, y)) => {
                self.rows[y][x] = cell;
                true
            }
            None => false,
        }
    }

    fn index(&self, x: i16, y: i16) -> Option<(usize, usize)> {
        let x = usize::try_from(x).ok().filter(|&x| x < self.width)?;
        let y = usize::try_from(y).ok().filter(|&y| y < self.height)?;
        Some((x, y))
    }

    /// Whether a piece could occupy `cells`: every column inside the grid,
    /// every row above the floor, and no overlap with a filled cell. Rows
    /// above the top are open.
    pub fn is_legal(&self, cells: &[Offset]) -> bool {
        cells.iter().all(|cell| {
            let Some(x) = usize::try_from(cell.x).ok().filter(|&x| x < self.width) else {
                return false;
            };
            match usize::try_from(cell.y) {
                Err(_) => true,
                Ok(y) => y < self.height && !self.rows[y][x].is_filled(),
            }
        })
    }

    /// Fills every on-grid cell with `kind`. Cells above the top are dropped.
    pub fn merge(&mut self, cells: &[Offset], kind: TetrominoType) {
        for cell in cells {
            self.set(cell.x, cell.y, CellState::Filled(kind));
        }
    }

    /// Removes every full row in one pass and drops the rows above into the
    /// gaps. Returns the number of rows removed.
    pub fn clear_full_lines(&mut self) -> u32 {
        let before = self.rows.len();
        self.rows
            .retain(|row| !row.iter().all(|cell| cell.is_filled()));
        let cleared = before - self.rows.len();

        let mut rows = vec![vec![CellState::Empty; self.width]; cleared];
        rows.append(&mut self.rows);
        self.rows = rows;

        cleared as u32
    }

    pub fn is_row_complete(&self, y: usize) -> bool {
        self.rows[y].iter().all(|cell| cell.is_filled())
    }

    pub fn filled_count_in_row(&self, y: usize) -> usize {
        self.rows[y].iter().filter(|cell| cell.is_filled()).count()
    }

    pub fn total_filled_cells(&self) -> usize {
        self.rows
            .iter()
            .flatten()
            .filter(|cell| cell.is_filled())
            .count()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(GRID_WIDTH, GRID_HEIGHT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_access_is_none() {
        let board = Board::default();
        assert_eq!(board.get(-1, 0), None);
        assert_eq!(board.get(0, GRID_HEIGHT as i16), None);
        assert_eq!(board.get(0, 0), Some(CellState::Empty));
    }

    #[test]
    fn merge_above_top_is_dropped() {
        let mut board = Board::default();
        board.merge(&[Offset::new(3, -1), Offset::new(3, 0)], TetrominoType::I);
        assert_eq!(board.total_filled_cells(), 1);
    }

    #[test]
    fn tall_board_floor_is_checked_without_wrapping() {
        let board = Board::new(4, i16::MAX as usize);
        assert!(board.is_legal(&[Offset::new(0, i16::MAX - 1)]));
        assert!(!board.is_legal(&[Offset::new(0, i16::MAX)]));
    }

    #[test]
    #[should_panic(expected = "exceeds cell coordinate range")]
    fn oversized_board_is_rejected() {
        Board::new(10, i16::MAX as usize + 1);
    }
}
