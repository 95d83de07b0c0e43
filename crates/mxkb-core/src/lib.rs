#![no_std]

pub mod bridge;
pub mod bus;
pub mod keymap;
pub mod matrix;
pub mod report;
pub mod transport;
