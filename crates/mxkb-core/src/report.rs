use core::fmt::Display;

use bitflags::bitflags;
use mxkb_common::dev_debug;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use crate::keymap::{KeyMap, MatrixCoord};
use crate::matrix::{KeyMatrixState, KeyState};

pub const REPORT_KEY_SLOTS: usize = 6;

/// First HID usage of the modifier block. Bit `i` of the report's
/// modifier byte corresponds to usage `MODIFIER_USAGE_BASE + i`.
const MODIFIER_USAGE_BASE: u8 = 0xe0;

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct Modifiers: u8 {
        const LEFT_CTRL = 1 << 0;
        const LEFT_SHIFT = 1 << 1;
        const LEFT_ALT = 1 << 2;
        const LEFT_GUI = 1 << 3;
        const RIGHT_CTRL = 1 << 4;
        const RIGHT_SHIFT = 1 << 5;
        const RIGHT_ALT = 1 << 6;
        const RIGHT_GUI = 1 << 7;
    }
}

/// HID boot protocol keyboard report, as delivered by the USB host
/// transport. Reinterpreted in place from the raw transfer buffer.
#[derive(FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned, Copy, Clone, Debug)]
#[repr(C)]
pub struct KeyboardReport {
    pub modifiers: u8,
    pub reserved: u8,
    pub keycodes: [u8; REPORT_KEY_SLOTS],
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ReportError {
    /// The transport handed over a buffer that is not a boot keyboard
    /// report. The matrix is left untouched.
    BadLength { len: usize },
}

impl Display for ReportError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ReportError::BadLength { len } => {
                write!(f, "Unexpected report length: {}", len)
            }
        }
    }
}

/// Turns consecutive keyboard report snapshots into press/release
/// edits on a [`KeyMatrixState`].
///
/// The six keycode slots are treated as an unordered set; a key
/// re-ordered between two reports by n-key rollover produces no
/// events. Exactly one previous report is retained for diffing.
pub struct ReportTranslator {
    keymap: &'static KeyMap,
    prev_keycodes: [u8; REPORT_KEY_SLOTS],
    prev_modifiers: Modifiers,
}

impl ReportTranslator {
    pub fn new(keymap: &'static KeyMap) -> Self {
        Self {
            keymap,
            prev_keycodes: [0; REPORT_KEY_SLOTS],
            prev_modifiers: Modifiers::empty(),
        }
    }

    pub fn apply(&mut self, raw: &[u8], matrix: &mut KeyMatrixState) -> Result<(), ReportError> {
        self.apply_act(raw, matrix, |_, _| {})
    }

    /// Applies one report. `changed_fn` runs once per key whose matrix
    /// cell actually changed.
    pub fn apply_act<F: FnMut(MatrixCoord, KeyState)>(
        &mut self,
        raw: &[u8],
        matrix: &mut KeyMatrixState,
        mut changed_fn: F,
    ) -> Result<(), ReportError> {
        let report = KeyboardReport::ref_from_bytes(raw)
            .map_err(|_| ReportError::BadLength { len: raw.len() })?;

        // Modifier edges are tracked on every report, full releases
        // included, so the stored byte never drifts from the wire.
        let modifiers = Modifiers::from_bits_retain(report.modifiers);
        let changed_modifiers = modifiers ^ self.prev_modifiers;
        if !changed_modifiers.is_empty() {
            for bit in 0..8 {
                let flag = Modifiers::from_bits_retain(1 << bit);
                if changed_modifiers.contains(flag) {
                    let state = KeyState::from_bool(modifiers.contains(flag));
                    self.edit_key(MODIFIER_USAGE_BASE + bit, state, matrix, &mut changed_fn);
                }
            }
            self.prev_modifiers = modifiers;
        }

        if report.keycodes.iter().all(|&code| code == 0) {
            // No regular keys held. A full clear also recovers any
            // release edge lost to a dropped report; modifier cells
            // edited just above go down with it.
            dev_debug!("Empty report, clearing the matrix");
            matrix.clear();
            self.prev_keycodes = [0; REPORT_KEY_SLOTS];
            return Ok(());
        }

        for &code in report.keycodes.iter().filter(|&&code| code != 0) {
            if !self.prev_keycodes.contains(&code) {
                self.edit_key(code, KeyState::Pressed, matrix, &mut changed_fn);
            }
        }

        for &code in self.prev_keycodes.iter().filter(|&&code| code != 0) {
            if !report.keycodes.contains(&code) {
                self.edit_key(code, KeyState::Released, matrix, &mut changed_fn);
            }
        }

        self.prev_keycodes = report.keycodes;
        Ok(())
    }

    fn edit_key<F: FnMut(MatrixCoord, KeyState)>(
        &self,
        code: u8,
        state: KeyState,
        matrix: &mut KeyMatrixState,
        changed_fn: &mut F,
    ) {
        match self.keymap.lookup(code) {
            Some(coord) => {
                if matrix.set_key_state(coord, state) {
                    dev_debug!(
                        "{:?} HID {:#04x} -> ({}; {})",
                        state,
                        code,
                        coord.row,
                        coord.col
                    );
                    changed_fn(coord, state);
                }
            }
            None => {
                // Not part of the MSX layout.
                dev_debug!("Unmapped HID code: {:#04x}", code);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::vec::Vec;

    use super::{Modifiers, REPORT_KEY_SLOTS, ReportError, ReportTranslator};
    use crate::keymap::{MSX_KEYMAP, MatrixCoord};
    use crate::matrix::{KeyMatrixState, KeyState};

    fn report(modifiers: Modifiers, keys: &[u8]) -> [u8; 8] {
        assert!(keys.len() <= REPORT_KEY_SLOTS);
        let mut raw = [0u8; 8];
        raw[0] = modifiers.bits();
        raw[2..2 + keys.len()].copy_from_slice(keys);
        raw
    }

    fn apply_collecting(
        translator: &mut ReportTranslator,
        matrix: &mut KeyMatrixState,
        raw: &[u8],
    ) -> Vec<(MatrixCoord, KeyState)> {
        let mut events = Vec::new();
        translator
            .apply_act(raw, matrix, |coord, state| events.push((coord, state)))
            .unwrap();
        events
    }

    // HID codes 4 and 5 are 'A' (2;1) and 'B' (2;2) in the MSX map.
    const KEY_A: u8 = 0x04;
    const KEY_B: u8 = 0x05;
    const COORD_A: MatrixCoord = MatrixCoord::new(2, 1);
    const COORD_B: MatrixCoord = MatrixCoord::new(2, 2);

    #[test]
    fn press_then_release_restores_initial_state() {
        let mut tr = ReportTranslator::new(&MSX_KEYMAP);
        let mut matrix = KeyMatrixState::new();

        tr.apply(&report(Modifiers::empty(), &[KEY_A]), &mut matrix)
            .unwrap();
        assert_eq!(matrix.get_key_state(COORD_A), KeyState::Pressed);

        tr.apply(&report(Modifiers::empty(), &[]), &mut matrix)
            .unwrap();
        assert!(matrix.is_all_released());
    }

    #[test]
    fn two_keys_then_one_releases_only_the_missing_one() {
        let mut tr = ReportTranslator::new(&MSX_KEYMAP);
        let mut matrix = KeyMatrixState::new();

        tr.apply(&report(Modifiers::empty(), &[KEY_A, KEY_B]), &mut matrix)
            .unwrap();
        assert_eq!(matrix.get_key_state(COORD_A), KeyState::Pressed);
        assert_eq!(matrix.get_key_state(COORD_B), KeyState::Pressed);

        tr.apply(&report(Modifiers::empty(), &[KEY_A]), &mut matrix)
            .unwrap();
        assert_eq!(matrix.get_key_state(COORD_A), KeyState::Pressed);
        assert_eq!(matrix.get_key_state(COORD_B), KeyState::Released);
    }

    #[test]
    fn rollover_reorder_produces_no_events() {
        let mut tr = ReportTranslator::new(&MSX_KEYMAP);
        let mut matrix = KeyMatrixState::new();

        tr.apply(&report(Modifiers::empty(), &[KEY_A, KEY_B]), &mut matrix)
            .unwrap();
        let events = apply_collecting(
            &mut tr,
            &mut matrix,
            &report(Modifiers::empty(), &[KEY_B, KEY_A]),
        );
        assert!(events.is_empty());
        assert_eq!(matrix.get_key_state(COORD_A), KeyState::Pressed);
        assert_eq!(matrix.get_key_state(COORD_B), KeyState::Pressed);
    }

    #[test]
    fn identical_report_is_idempotent() {
        let mut tr = ReportTranslator::new(&MSX_KEYMAP);
        let mut matrix = KeyMatrixState::new();
        let raw = report(Modifiers::LEFT_SHIFT, &[KEY_A]);

        tr.apply(&raw, &mut matrix).unwrap();
        let events = apply_collecting(&mut tr, &mut matrix, &raw);
        assert!(events.is_empty());
    }

    #[test]
    fn all_zero_report_clears_everything() {
        let mut tr = ReportTranslator::new(&MSX_KEYMAP);
        let mut matrix = KeyMatrixState::new();

        tr.apply(&report(Modifiers::LEFT_SHIFT, &[KEY_A, KEY_B]), &mut matrix)
            .unwrap();
        assert!(!matrix.is_all_released());

        tr.apply(&report(Modifiers::LEFT_SHIFT, &[]), &mut matrix)
            .unwrap();
        assert!(matrix.is_all_released());
    }

    #[test]
    fn modifier_press_and_release() {
        let mut tr = ReportTranslator::new(&MSX_KEYMAP);
        let mut matrix = KeyMatrixState::new();
        let shift = MatrixCoord::new(5, 3);

        // A regular key is held alongside so the empty-report fast
        // path stays out of the way.
        tr.apply(&report(Modifiers::LEFT_SHIFT, &[KEY_A]), &mut matrix)
            .unwrap();
        assert_eq!(matrix.get_key_state(shift), KeyState::Pressed);

        tr.apply(&report(Modifiers::empty(), &[KEY_A]), &mut matrix)
            .unwrap();
        assert_eq!(matrix.get_key_state(shift), KeyState::Released);
        assert_eq!(matrix.get_key_state(COORD_A), KeyState::Pressed);
    }

    // A modifier byte that never changes across a full release shows
    // no new edge, so its cell stays released until the host toggles
    // the bit again.
    #[test]
    fn unchanged_modifier_stays_released_after_full_release() {
        let mut tr = ReportTranslator::new(&MSX_KEYMAP);
        let mut matrix = KeyMatrixState::new();
        let shift = MatrixCoord::new(5, 3);

        tr.apply(&report(Modifiers::LEFT_SHIFT, &[KEY_A]), &mut matrix)
            .unwrap();
        assert_eq!(matrix.get_key_state(shift), KeyState::Pressed);

        // Shift still held, 'A' released: the all-zero path clears the
        // shift cell and emits no events.
        let events = apply_collecting(&mut tr, &mut matrix, &report(Modifiers::LEFT_SHIFT, &[]));
        assert!(events.is_empty());
        assert!(matrix.is_all_released());

        // Shift still held with a new regular key: no 0->1 edge on the
        // modifier byte, so the shift cell stays released.
        tr.apply(&report(Modifiers::LEFT_SHIFT, &[KEY_B]), &mut matrix)
            .unwrap();
        assert_eq!(matrix.get_key_state(shift), KeyState::Released);
        assert_eq!(matrix.get_key_state(COORD_B), KeyState::Pressed);
    }

    #[test]
    fn modifier_rearms_after_full_release() {
        let mut tr = ReportTranslator::new(&MSX_KEYMAP);
        let mut matrix = KeyMatrixState::new();
        let shift = MatrixCoord::new(5, 3);

        tr.apply(&report(Modifiers::LEFT_SHIFT, &[KEY_A]), &mut matrix)
            .unwrap();

        // Everything released at once, modifier byte included. The
        // stored byte must follow the wire down to zero here.
        tr.apply(&report(Modifiers::empty(), &[]), &mut matrix)
            .unwrap();
        assert!(matrix.is_all_released());

        // Shift comes back with the next chord: a fresh 0->1 edge, so
        // its cell is pressed again.
        tr.apply(&report(Modifiers::LEFT_SHIFT, &[KEY_B]), &mut matrix)
            .unwrap();
        assert_eq!(matrix.get_key_state(shift), KeyState::Pressed);
        assert_eq!(matrix.get_key_state(COORD_B), KeyState::Pressed);
    }

    #[test]
    fn unmapped_keycodes_are_inert() {
        let mut tr = ReportTranslator::new(&MSX_KEYMAP);
        let mut matrix = KeyMatrixState::new();

        // F12 and GUI modifiers have no MSX position.
        let events = apply_collecting(
            &mut tr,
            &mut matrix,
            &report(Modifiers::LEFT_GUI | Modifiers::RIGHT_GUI, &[0x45]),
        );
        assert!(events.is_empty());
        assert!(matrix.is_all_released());
    }

    #[test]
    fn bad_length_rejected_without_side_effects() {
        let mut tr = ReportTranslator::new(&MSX_KEYMAP);
        let mut matrix = KeyMatrixState::new();

        tr.apply(&report(Modifiers::empty(), &[KEY_A]), &mut matrix)
            .unwrap();

        let err = tr.apply(&[0u8; 3], &mut matrix).unwrap_err();
        assert_eq!(err, ReportError::BadLength { len: 3 });
        // Prior state survives, including the diff baseline: releasing
        // the key afterwards still works.
        assert_eq!(matrix.get_key_state(COORD_A), KeyState::Pressed);
        tr.apply(&report(Modifiers::empty(), &[]), &mut matrix)
            .unwrap();
        assert!(matrix.is_all_released());
    }

    // The final matrix only depends on the last report of a sequence
    // (plus modifier history): every consecutive-pair diff composes.
    #[test]
    fn sequence_composes_to_last_report() {
        let mut tr = ReportTranslator::new(&MSX_KEYMAP);
        let mut matrix = KeyMatrixState::new();

        let sequence = [
            report(Modifiers::empty(), &[KEY_A]),
            report(Modifiers::empty(), &[KEY_A, KEY_B]),
            report(Modifiers::empty(), &[KEY_B, KEY_A]),
            report(Modifiers::empty(), &[KEY_B, 0x06]), // + 'C'
            report(Modifiers::empty(), &[0x06]),
        ];
        for raw in &sequence {
            tr.apply(raw, &mut matrix).unwrap();
        }

        let mut expected = KeyMatrixState::new();
        expected.set_key_state(MSX_KEYMAP.lookup(0x06).unwrap(), KeyState::Pressed);
        for row in 0..11 {
            assert_eq!(matrix.row_bits(row), expected.row_bits(row), "row {}", row);
        }
    }
}
