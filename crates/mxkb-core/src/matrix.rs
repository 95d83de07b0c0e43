use mxkb_common::util::BitMatrix;

use crate::keymap::MatrixCoord;

pub const MATRIX_ROWS: usize = 11;
pub const MATRIX_COLS: u8 = 8;

/// State of one key cell of the emulated matrix.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum KeyState {
    #[default]
    Released,
    Pressed,
}

impl KeyState {
    pub const fn from_bool(pressed: bool) -> KeyState {
        match pressed {
            true => KeyState::Pressed,
            false => KeyState::Released,
        }
    }

    pub const fn is_pressed(self) -> bool {
        matches!(self, KeyState::Pressed)
    }
}

/// The emulated keyboard matrix. One pressed flag per physical key
/// position of the MSX keyboard.
///
/// There is a single writer (the report translator) and a single
/// reader (the bus responder). Both run interleaved on the same
/// thread; splitting them across threads or tasks requires wrapping
/// this struct in explicit synchronization first.
pub struct KeyMatrixState {
    matrix: BitMatrix<MATRIX_ROWS, MATRIX_COLS>,
}

impl KeyMatrixState {
    pub fn new() -> Self {
        Self {
            matrix: BitMatrix::new(),
        }
    }

    #[inline(always)]
    pub fn get_key_state(&self, coord: MatrixCoord) -> KeyState {
        KeyState::from_bool(self.matrix.get_value(coord.row as usize, coord.col))
    }

    /// Sets the state of a single key, returning true if the cell
    /// actually changed.
    #[inline(always)]
    pub fn set_key_state(&mut self, coord: MatrixCoord, state: KeyState) -> bool {
        self.matrix
            .set_value(coord.row as usize, coord.col, state.is_pressed())
    }

    /// Packed pressed bitmap of one row, bit `col` set when the key at
    /// that column is held.
    #[inline(always)]
    pub fn row_bits(&self, row: u8) -> u8 {
        self.matrix.row_bits(row as usize)
    }

    /// Releases every key at once.
    pub fn clear(&mut self) {
        self.matrix.clear();
    }

    pub fn is_all_released(&self) -> bool {
        (0..MATRIX_ROWS).all(|row| self.matrix.row_bits(row) == 0)
    }
}

impl Default for KeyMatrixState {
    fn default() -> Self {
        Self::new()
    }
}
