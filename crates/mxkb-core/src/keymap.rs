use usbd_hid::descriptor::KeyboardUsage;

use crate::matrix::{MATRIX_COLS, MATRIX_ROWS};

/// Position of one key inside the 11x8 MSX matrix.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MatrixCoord {
    pub row: u8,
    pub col: u8,
}

impl MatrixCoord {
    pub const fn new(row: u8, col: u8) -> Self {
        assert!((row as usize) < MATRIX_ROWS, "Row out of bounds");
        assert!(col < MATRIX_COLS, "Col out of bounds");

        Self { row, col }
    }
}

#[derive(Copy, Clone, Debug)]
pub struct KeyMapEntry {
    pub code: u8,
    pub coord: MatrixCoord,
}

/// Immutable HID usage -> matrix coordinate table. Codes not present
/// in the table are not part of the MSX layout and are meant to be
/// ignored by the caller.
pub struct KeyMap {
    entries: &'static [KeyMapEntry],
}

impl KeyMap {
    pub const fn new(entries: &'static [KeyMapEntry]) -> Self {
        Self { entries }
    }

    pub fn lookup(&self, code: u8) -> Option<MatrixCoord> {
        self.entries
            .iter()
            .find(|entry| entry.code == code)
            .map(|entry| entry.coord)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &'static [KeyMapEntry] {
        self.entries
    }
}

const fn key(code: KeyboardUsage, row: u8, col: u8) -> KeyMapEntry {
    KeyMapEntry {
        code: code as u8,
        coord: MatrixCoord::new(row, col),
    }
}

/// Standard MSX matrix layout. Rows follow the machine's own numbering;
/// the legend comments name the MSX key at each position.
#[rustfmt::skip]
pub static MSX_KEYMAP: KeyMap = KeyMap::new(&[
    // Row 0: digits 0-7
    key(KeyboardUsage::Keyboard0CloseParens, 0, 0),
    key(KeyboardUsage::Keyboard1Exclamation, 0, 1),
    key(KeyboardUsage::Keyboard2At, 0, 2),
    key(KeyboardUsage::Keyboard3Hash, 0, 3),
    key(KeyboardUsage::Keyboard4Dollar, 0, 4),
    key(KeyboardUsage::Keyboard5Percent, 0, 5),
    key(KeyboardUsage::Keyboard6Caret, 0, 6),
    key(KeyboardUsage::Keyboard7Ampersand, 0, 7),

    // Row 1: 8 9 - = \ [ ] ;
    key(KeyboardUsage::Keyboard8Asterisk, 1, 0),
    key(KeyboardUsage::Keyboard9OpenParens, 1, 1),
    key(KeyboardUsage::KeyboardDashUnderscore, 1, 2),
    key(KeyboardUsage::KeyboardEqualPlus, 1, 3),
    key(KeyboardUsage::KeyboardBackslashBar, 1, 4),
    key(KeyboardUsage::KeyboardOpenBracketBrace, 1, 5),
    key(KeyboardUsage::KeyboardCloseBracketBrace, 1, 6),
    key(KeyboardUsage::KeyboardSemiColon, 1, 7),

    // Row 2: ' A B C D E F G
    key(KeyboardUsage::KeyboardSingleDoubleQuote, 2, 0),
    key(KeyboardUsage::KeyboardAa, 2, 1),
    key(KeyboardUsage::KeyboardBb, 2, 2),
    key(KeyboardUsage::KeyboardCc, 2, 3),
    key(KeyboardUsage::KeyboardDd, 2, 4),
    key(KeyboardUsage::KeyboardEe, 2, 5),
    key(KeyboardUsage::KeyboardFf, 2, 6),
    key(KeyboardUsage::KeyboardGg, 2, 7),

    // Row 3: H-O
    key(KeyboardUsage::KeyboardHh, 3, 0),
    key(KeyboardUsage::KeyboardIi, 3, 1),
    key(KeyboardUsage::KeyboardJj, 3, 2),
    key(KeyboardUsage::KeyboardKk, 3, 3),
    key(KeyboardUsage::KeyboardLl, 3, 4),
    key(KeyboardUsage::KeyboardMm, 3, 5),
    key(KeyboardUsage::KeyboardNn, 3, 6),
    key(KeyboardUsage::KeyboardOo, 3, 7),

    // Row 4: P-W
    key(KeyboardUsage::KeyboardPp, 4, 0),
    key(KeyboardUsage::KeyboardQq, 4, 1),
    key(KeyboardUsage::KeyboardRr, 4, 2),
    key(KeyboardUsage::KeyboardSs, 4, 3),
    key(KeyboardUsage::KeyboardTt, 4, 4),
    key(KeyboardUsage::KeyboardUu, 4, 5),
    key(KeyboardUsage::KeyboardVv, 4, 6),
    key(KeyboardUsage::KeyboardWw, 4, 7),

    // Row 5: X Y Z SHIFT CTRL ` , .
    key(KeyboardUsage::KeyboardXx, 5, 0),
    key(KeyboardUsage::KeyboardYy, 5, 1),
    key(KeyboardUsage::KeyboardZz, 5, 2),
    key(KeyboardUsage::KeyboardLeftShift, 5, 3),
    key(KeyboardUsage::KeyboardLeftControl, 5, 4),
    key(KeyboardUsage::KeyboardBacktickTilde, 5, 5),
    key(KeyboardUsage::KeyboardCommaLess, 5, 6),
    key(KeyboardUsage::KeyboardPeriodGreater, 5, 7),

    // Row 6: / SHIFT(dead) cursor block DEL INS
    key(KeyboardUsage::KeyboardSlashQuestion, 6, 0),
    key(KeyboardUsage::KeyboardRightShift, 6, 1),
    key(KeyboardUsage::KeyboardUpArrow, 6, 2),
    key(KeyboardUsage::KeyboardRightArrow, 6, 3),
    key(KeyboardUsage::KeyboardDownArrow, 6, 4),
    key(KeyboardUsage::KeyboardLeftArrow, 6, 5),
    key(KeyboardUsage::KeyboardDelete, 6, 6),
    key(KeyboardUsage::KeyboardInsert, 6, 7),

    // Row 7: HOME/CLR paging F1-F5
    key(KeyboardUsage::KeyboardHome, 7, 0),
    key(KeyboardUsage::KeyboardPageUp, 7, 1),
    key(KeyboardUsage::KeyboardPageDown, 7, 2),
    key(KeyboardUsage::KeyboardF1, 7, 3),
    key(KeyboardUsage::KeyboardF2, 7, 4),
    key(KeyboardUsage::KeyboardF3, 7, 5),
    key(KeyboardUsage::KeyboardF4, 7, 6),
    key(KeyboardUsage::KeyboardF5, 7, 7),

    // Row 8: ESC TAB STOP BS RETURN SPACE GRAPH CAPS
    key(KeyboardUsage::KeyboardEscape, 8, 0),
    key(KeyboardUsage::KeyboardTab, 8, 1),
    key(KeyboardUsage::KeyboardEnd, 8, 2),
    key(KeyboardUsage::KeyboardBackspace, 8, 3),
    key(KeyboardUsage::KeyboardEnter, 8, 4),
    key(KeyboardUsage::KeyboardSpacebar, 8, 5),
    key(KeyboardUsage::KeyboardLeftAlt, 8, 6),
    key(KeyboardUsage::KeyboardCapsLock, 8, 7),

    // Row 9: keypad 1-8
    key(KeyboardUsage::Keypad1End, 9, 0),
    key(KeyboardUsage::Keypad2DownArrow, 9, 1),
    key(KeyboardUsage::Keypad3PageDown, 9, 2),
    key(KeyboardUsage::Keypad4LeftArrow, 9, 3),
    key(KeyboardUsage::Keypad5, 9, 4),
    key(KeyboardUsage::Keypad6RightArrow, 9, 5),
    key(KeyboardUsage::Keypad7Home, 9, 6),
    key(KeyboardUsage::Keypad8UpArrow, 9, 7),

    // Row 10: keypad 9 0 - + * / . Enter
    key(KeyboardUsage::Keypad9PageUp, 10, 0),
    key(KeyboardUsage::Keypad0Insert, 10, 1),
    key(KeyboardUsage::KeypadMinus, 10, 2),
    key(KeyboardUsage::KeypadPlus, 10, 3),
    key(KeyboardUsage::KeypadMultiply, 10, 4),
    key(KeyboardUsage::KeypadDivide, 10, 5),
    key(KeyboardUsage::KeypadPeriodDelete, 10, 6),
    key(KeyboardUsage::KeypadEnter, 10, 7),
]);
