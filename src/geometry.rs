/// A column/row pair. Used both for cell offsets relative to a piece origin
/// and for absolute board coordinates; rows grow downwards.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Default)]
pub struct Offset {
    pub x: i16,
    pub y: i16,
}

impl Offset {
    pub const fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }

    pub const fn shifted(self, dx: i16, dy: i16) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Quarter turn about the local origin: (x, y) -> (-y, x).
pub const fn rotate90(offset: Offset) -> Offset {
    Offset {
        x: -offset.y,
        y: offset.x,
    }
}

/// Returns a shifted copy of `cells`; the input is left untouched.
pub fn translate<const N: usize>(cells: &[Offset; N], dx: i16, dy: i16) -> [Offset; N] {
    std::array::from_fn(|i| cells[i].shifted(dx, dy))
}
