use core::fmt::{Binary, Debug};

pub trait BitMatrixLayout {
    type ColType: Copy + Default + Debug + Binary + PartialEq;

    fn set_state(elem: &mut Self::ColType, col: u8, value: bool);
    fn get_state(elem: Self::ColType, col: u8) -> bool;
}

pub struct ColBitMatrixLayout<const COLS: u8> {}

macro_rules! bit_matrix_layout_impl {
    ($cols:literal, $typ:ty) => {
        impl BitMatrixLayout for ColBitMatrixLayout<$cols> {
            type ColType = $typ;

            fn set_state(elem: &mut Self::ColType, col: u8, value: bool) {
                if value {
                    *elem |= 1 << col;
                } else {
                    *elem &= !(1 << col);
                }
            }

            fn get_state(elem: Self::ColType, col: u8) -> bool {
                (elem & (1 << col)) > 0
            }
        }
    };
}

seq_macro::seq!(N in 1..=8 {
    bit_matrix_layout_impl!(N, u8);
});

seq_macro::seq!(N in 9..=16 {
    bit_matrix_layout_impl!(N, u16);
});

/// A packed matrix of booleans. Each row is stored in the smallest
/// unsigned integer that fits `COLS` bits.
#[derive(Debug)]
pub struct BitMatrix<const ROWS: usize, const COLS: u8>
where
    ColBitMatrixLayout<COLS>: BitMatrixLayout,
{
    buf: [<ColBitMatrixLayout<COLS> as BitMatrixLayout>::ColType; ROWS],
}

impl<const ROWS: usize, const COLS: u8> BitMatrix<ROWS, COLS>
where
    ColBitMatrixLayout<COLS>: BitMatrixLayout,
{
    pub fn new() -> Self {
        Self {
            buf: [Default::default(); ROWS],
        }
    }

    pub fn get_value(&self, row: usize, col: u8) -> bool {
        assert!(row < ROWS, "Row out of bounds");
        assert!(col < COLS, "Col out of bounds");

        <ColBitMatrixLayout<COLS> as BitMatrixLayout>::get_state(self.buf[row], col)
    }

    /// Sets the state of a single cell, returning true if the cell
    /// actually changed.
    pub fn set_value(&mut self, row: usize, col: u8, value: bool) -> bool {
        assert!(row < ROWS, "Row out of bounds");
        assert!(col < COLS, "Col out of bounds");

        let prev = self.buf[row];
        <ColBitMatrixLayout<COLS> as BitMatrixLayout>::set_state(&mut self.buf[row], col, value);
        prev != self.buf[row]
    }

    /// Returns the packed bits of a whole row, bit `col` set when the
    /// cell at that column is true.
    pub fn row_bits(&self, row: usize) -> <ColBitMatrixLayout<COLS> as BitMatrixLayout>::ColType {
        assert!(row < ROWS, "Row out of bounds");

        self.buf[row]
    }

    pub fn clear(&mut self) {
        self.buf = [Default::default(); ROWS];
    }
}

impl<const ROWS: usize, const COLS: u8> Default for BitMatrix<ROWS, COLS>
where
    ColBitMatrixLayout<COLS>: BitMatrixLayout,
{
    fn default() -> Self {
        Self::new()
    }
}
