use mxkb_common::dev_debug;

use crate::matrix::{KeyMatrixState, MATRIX_ROWS};

/// Number of shared row-select-high / column-output lines.
pub const SHARED_LINES: u8 = 4;

/// First matrix column returned over the shared lines: line `k` carries
/// column `SHARED_LINE_COL_BASE + k` of the selected row (YD..YA order,
/// as wired on the 13-pin MSX keyboard header).
pub const SHARED_LINE_COL_BASE: u8 = 3;

const ALL_LINES_RELEASED: u8 = (1 << SHARED_LINES) - 1;

/// The four bidirectional bus lines. While the host scans they are
/// column-output drains; while the bus is idle they float as pull-up
/// inputs so the host can drive them.
pub trait SharedBusPins {
    fn set_as_outputs(&mut self);
    fn set_as_inputs_pulled_up(&mut self);

    /// Drives the physical level of each line: bit `k` set means line
    /// `k` high. Only meaningful while the lines are outputs.
    fn write_lines(&mut self, levels: u8);
}

/// The four dedicated row-select input lines.
pub trait RowSelectPins {
    /// Raw physical levels, bit `k` set when line `k` is high. The
    /// host selects a row active-low; decoding is up to the caller.
    fn read_lines(&self) -> u8;
}

/// The direction-sense line. High while the host is actively scanning
/// the keyboard port.
pub trait DirSensePin {
    fn is_bus_active(&self) -> bool;
}

impl<T: SharedBusPins> SharedBusPins for &mut T {
    fn set_as_outputs(&mut self) {
        (**self).set_as_outputs();
    }

    fn set_as_inputs_pulled_up(&mut self) {
        (**self).set_as_inputs_pulled_up();
    }

    fn write_lines(&mut self, levels: u8) {
        (**self).write_lines(levels);
    }
}

impl<T: RowSelectPins> RowSelectPins for &mut T {
    fn read_lines(&self) -> u8 {
        (**self).read_lines()
    }
}

impl<T: DirSensePin> DirSensePin for &mut T {
    fn is_bus_active(&self) -> bool {
        (**self).is_bus_active()
    }
}

/// Answers the host's row polling on the matrix bus.
///
/// Each tick re-evaluates everything from the sampled direction-sense
/// line; nothing is edge-detected or debounced, so the responder
/// follows the host's scan cadence as long as `tick` runs at least
/// once per scan slot (low single-digit milliseconds).
pub struct BusResponder<S, R, D> {
    shared: S,
    select: R,
    dir_sense: D,
}

impl<S, R, D> BusResponder<S, R, D>
where
    S: SharedBusPins,
    R: RowSelectPins,
    D: DirSensePin,
{
    /// Takes ownership of the bus pin groups. The shared lines start
    /// out yielded (inputs with pull-ups).
    pub fn new(mut shared: S, select: R, dir_sense: D) -> Self {
        shared.set_as_inputs_pulled_up();

        Self {
            shared,
            select,
            dir_sense,
        }
    }

    pub fn tick(&mut self, matrix: &KeyMatrixState) {
        if !self.dir_sense.is_bus_active() {
            // Host is idle; yield the bus.
            self.shared.set_as_inputs_pulled_up();
            return;
        }

        self.shared.set_as_outputs();

        // Row select is active-low on the wire.
        let row = !self.select.read_lines() & 0x0f;
        let levels = if (row as usize) < MATRIX_ROWS {
            Self::column_levels(matrix.row_bits(row))
        } else {
            // Rows 11-15 do not exist; report no key pressed.
            dev_debug!("Row select out of range: {}", row);
            ALL_LINES_RELEASED
        };

        self.shared.write_lines(levels);
    }

    /// Active-low column levels for one row's pressed bitmap: a held
    /// key pulls its line low.
    fn column_levels(row_bits: u8) -> u8 {
        let mut levels = 0;
        for line in 0..SHARED_LINES {
            if row_bits & (1 << (SHARED_LINE_COL_BASE + line)) == 0 {
                levels |= 1 << line;
            }
        }
        levels
    }
}
