use std::io::{self, Write};

use crate::board::{Board, CellState};
use crate::game::GameState;
use crate::piece::Piece;

/// Read-only view of one tick's result, handed to a `Renderer`.
#[derive(Clone, Copy, Debug)]
pub struct Snapshot<'a> {
    pub board: &'a Board,
    pub piece: &'a Piece,
    pub score: u32,
    pub level: u32,
    pub lines_cleared: u32,
    pub state: GameState,
}

impl Snapshot<'_> {
    /// The visible rows with the current piece drawn over the settled cells.
    /// Piece cells above the top row are not shown.
    pub fn visible_grid(&self) -> Vec<Vec<CellState>> {
        let mut grid = self.board.rows().to_vec();
        let kind = self.piece.tetromino_type;

        for cell in self.piece.cells() {
            if let (Ok(x), Ok(y)) = (usize::try_from(cell.x), usize::try_from(cell.y)) {
                if let Some(slot) = grid.get_mut(y).and_then(|row| row.get_mut(x)) {
                    *slot = CellState::Filled(kind);
                }
            }
        }

        grid
    }
}

pub trait Renderer {
    /// Draws one full frame. Called once per tick.
    fn draw(&mut self, snapshot: &Snapshot<'_>) -> io::Result<()>;
}

/// Plain-text frame: a score line, then one `|...|` line per row with `[]`
/// for filled cells.
pub fn text_frame(snapshot: &Snapshot<'_>) -> Vec<String> {
    let mut lines = Vec::with_capacity(snapshot.board.height() + 1);
    lines.push(format!("Score: {} Level: {}", snapshot.score, snapshot.level));

    for row in snapshot.visible_grid() {
        let mut line = String::with_capacity(row.len() * 2 + 2);
        line.push('|');
        for cell in row {
            line.push_str(if cell.is_filled() { "[]" } else { "  " });
        }
        line.push('|');
        lines.push(line);
    }

    lines
}

/// Writes text frames to any `Write` sink, e.g. a log file or a buffer.
pub struct TextRenderer<W: Write> {
    out: W,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn draw(&mut self, snapshot: &Snapshot<'_>) -> io::Result<()> {
        for line in text_frame(snapshot) {
            writeln!(self.out, "{line}")?;
        }
        self.out.flush()
    }
}
