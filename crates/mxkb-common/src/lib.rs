#![no_std]

mod devlog;
pub mod util;

pub use log as __log;
