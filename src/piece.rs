use rand::Rng;

use crate::board::GRID_WIDTH;
use crate::geometry::{rotate90, translate, Offset};

/// Number of cells in every tetromino.
pub const PIECE_CELLS: usize = 4;

// ============================================================================
// Shape Table
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum TetrominoType {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl TetrominoType {
    pub const ALL: [TetrominoType; 7] = [
        TetrominoType::I,
        TetrominoType::O,
        TetrominoType::T,
        TetrominoType::S,
        TetrominoType::Z,
        TetrominoType::J,
        TetrominoType::L,
    ];

    /// Cells of the unrotated shape, relative to the piece origin.
    pub const fn base_shape(self) -> [Offset; PIECE_CELLS] {
        const fn o(x: i16, y: i16) -> Offset {
            Offset::new(x, y)
        }
        match self {
            TetrominoType::I => [o(0, 0), o(1, 0), o(2, 0), o(3, 0)],
            TetrominoType::O => [o(0, 0), o(1, 0), o(0, 1), o(1, 1)],
            TetrominoType::T => [o(0, 0), o(1, 0), o(2, 0), o(1, 1)],
            TetrominoType::S => [o(1, 0), o(2, 0), o(0, 1), o(1, 1)],
            TetrominoType::Z => [o(0, 0), o(1, 0), o(1, 1), o(2, 1)],
            TetrominoType::J => [o(0, 0), o(0, 1), o(1, 1), o(2, 1)],
            TetrominoType::L => [o(2, 0), o(0, 1), o(1, 1), o(2, 1)],
        }
    }

    /// Columns spanned by the unrotated shape.
    pub fn width(self) -> i16 {
        self.base_shape().iter().map(|cell| cell.x).max().unwrap_or(0) + 1
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

/// Where a new piece of `kind` appears on a grid of the given width: centred
/// by the shape's own width (odd leftovers go right), top row of the shape on
/// the top visible row.
pub fn spawn_origin(grid_width: usize, kind: TetrominoType) -> Offset {
    let grid_width = i16::try_from(grid_width).unwrap_or(i16::MAX);
    Offset::new((grid_width - kind.width()).max(0) / 2, 0)
}

// ============================================================================
// Piece
// ============================================================================

/// A falling tetromino.
///
/// The shape is kept relative to `origin` so rotation always turns about the
/// piece's own origin, never about the board corner. There are no wall kicks:
/// a quarter turn that collides is simply rejected, and shapes drift
/// sideways as they turn because the pivot is a corner cell rather than the
/// shape's centre.
///
/// `moved` and `rotated` return candidates. Nothing here checks the board;
/// the engine validates a candidate and only then replaces its piece.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Piece {
    pub tetromino_type: TetrominoType,
    pub origin: Offset,
    pub rotation: u8,
    shape: [Offset; PIECE_CELLS],
}

impl Piece {
    /// New piece at the spawn origin of a default-width grid.
    pub fn spawn(tetromino_type: TetrominoType) -> Self {
        Self::spawn_at(tetromino_type, spawn_origin(GRID_WIDTH, tetromino_type))
    }

    pub fn spawn_at(tetromino_type: TetrominoType, origin: Offset) -> Self {
        Self {
            tetromino_type,
            origin,
            rotation: 0,
            shape: tetromino_type.base_shape(),
        }
    }

    /// Absolute board coordinates of the four cells, in shape order.
    pub fn cells(&self) -> [Offset; PIECE_CELLS] {
        translate(&self.shape, self.origin.x, self.origin.y)
    }

    /// Cells relative to the origin, after the current rotation.
    pub fn local_cells(&self) -> [Offset; PIECE_CELLS] {
        self.shape
    }

    pub fn moved(&self, dx: i16, dy: i16) -> Self {
        Self {
            origin: self.origin.shifted(dx, dy),
            ..*self
        }
    }

    pub fn rotated(&self) -> Self {
        Self {
            rotation: (self.rotation + 1) % 4,
            shape: self.shape.map(rotate90),
            ..*self
        }
    }
}
