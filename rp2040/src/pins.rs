//! Keyboard-port pin groups over runtime-configurable GPIO.
//!
//! The shared bus lines flip between input and output every time the
//! host starts or stops scanning, so they are kept as [`DynPin`]s
//! instead of statically typed pins.

use embedded_hal::digital::v2::{InputPin, OutputPin};
use mxkb_core::bus::{DirSensePin, RowSelectPins, SharedBusPins};
use rp2040_hal::gpio::DynPin;

/// X4/YD .. X7/YA, header pins 7-10. Index 0 is X4/YD.
pub struct SharedLines {
    pins: [DynPin; 4],
}

impl SharedLines {
    pub fn new(mut pins: [DynPin; 4]) -> Self {
        for pin in &mut pins {
            pin.into_pull_up_input();
        }
        Self { pins }
    }
}

impl SharedBusPins for SharedLines {
    fn set_as_outputs(&mut self) {
        for pin in &mut self.pins {
            pin.into_push_pull_output();
        }
    }

    fn set_as_inputs_pulled_up(&mut self) {
        for pin in &mut self.pins {
            pin.into_pull_up_input();
        }
    }

    fn write_lines(&mut self, levels: u8) {
        for (line, pin) in self.pins.iter_mut().enumerate() {
            // Only fails while the pin is an input, which tick() rules
            // out by reconfiguring first.
            if levels & (1 << line) != 0 {
                pin.set_high().ok();
            } else {
                pin.set_low().ok();
            }
        }
    }
}

/// X0..X3, header pins 3-6. The host drives these low to select a row.
pub struct RowSelectLines {
    pins: [DynPin; 4],
}

impl RowSelectLines {
    pub fn new(mut pins: [DynPin; 4]) -> Self {
        for pin in &mut pins {
            pin.into_pull_up_input();
        }
        Self { pins }
    }
}

impl RowSelectPins for RowSelectLines {
    fn read_lines(&self) -> u8 {
        let mut lines = 0;
        for (line, pin) in self.pins.iter().enumerate() {
            if pin.is_high().unwrap_or(false) {
                lines |= 1 << line;
            }
        }
        lines
    }
}

/// KBDIR, header pin 11. High while the MSX reads the keyboard.
pub struct DirSenseLine {
    pin: DynPin,
}

impl DirSenseLine {
    pub fn new(mut pin: DynPin) -> Self {
        pin.into_pull_up_input();
        Self { pin }
    }
}

impl DirSensePin for DirSenseLine {
    fn is_bus_active(&self) -> bool {
        self.pin.is_high().unwrap_or(false)
    }
}
