//! Fixed-size square bitset of wall/open cells.
//!
//! A [`Chunk`] covers `SIZE × SIZE` maze cells. Each column `x` is stored as one
//! `u32` whose bit `y` is set when the cell `(x, y)` has been carved open. Laying
//! the columns out in order and writing them little-endian yields exactly the
//! save-file packing (bit index `x * SIZE + y`, byte `index / 8`, bit `index % 8`).

/// Side length of a chunk in cells.
pub const SIZE: usize = 32;

/// Number of bytes one chunk occupies in a save file.
pub const BYTES: usize = SIZE * SIZE / 8;

/// A `SIZE × SIZE` block of maze cells.
///
/// Chunks start fully closed. They do no bounds checking of their own: the
/// owning maze only ever hands them local coordinates in `0..SIZE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    columns: [u32; SIZE],
}

impl Default for Chunk {
    fn default() -> Self {
        Self::new()
    }
}

impl Chunk {
    /// Creates a chunk with every cell closed.
    pub const fn new() -> Self {
        Self { columns: [0; SIZE] }
    }

    /// Returns whether the local cell `(x, y)` is open.
    pub fn get_opened(&self, x: usize, y: usize) -> bool {
        self.columns[x] & (1 << y) != 0
    }

    /// Opens or closes the local cell `(x, y)`.
    pub fn set_opened(&mut self, x: usize, y: usize, opened: bool) {
        if opened {
            self.columns[x] |= 1 << y;
        } else {
            self.columns[x] &= !(1 << y);
        }
    }

    /// Closes every cell.
    pub fn clear(&mut self) {
        self.columns = [0; SIZE];
    }

    /// Number of open cells in the chunk.
    pub fn open_count(&self) -> u32 {
        self.columns.iter().map(|c| c.count_ones()).sum()
    }

    /// Packs the chunk into its on-disk form.
    pub fn to_bytes(&self) -> [u8; BYTES] {
        let mut bytes = [0u8; BYTES];
        for (column, out) in self.columns.iter().zip(bytes.chunks_exact_mut(4)) {
            out.copy_from_slice(&column.to_le_bytes());
        }
        bytes
    }

    /// Rebuilds a chunk from its on-disk form.
    pub fn from_bytes(bytes: &[u8; BYTES]) -> Self {
        let mut columns = [0u32; SIZE];
        for (column, chunk) in columns.iter_mut().zip(bytes.chunks_exact(4)) {
            *column = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        Self { columns }
    }
}
