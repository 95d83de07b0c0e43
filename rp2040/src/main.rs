#![no_std]
#![no_main]

use defmt_rtt as _;
use panic_probe as _;

mod pins;

use cortex_m_rt::entry;
use embedded_hal::digital::v2::OutputPin;
use rp2040_hal as hal;

use hal::Clock;
use hal::pac;

use mxkb_core::bridge::KeyboardBridge;
use mxkb_core::keymap::MSX_KEYMAP;
use mxkb_core::transport::NullReportSource;

use pins::{DirSenseLine, RowSelectLines, SharedLines};

#[link_section = ".boot2"]
#[used]
pub static BOOT2: [u8; 256] = rp2040_boot2::BOOT_LOADER_W25Q080;

const XOSC_CRYSTAL_FREQ: u32 = 12_000_000;

/// Tick period of the polling loop. The direction flip must land
/// within the MSX's scan slot, so keep this at most in the low
/// single-digit milliseconds.
const TICK_PERIOD_MS: u32 = 1;

#[entry]
fn main() -> ! {
    let mut pac = pac::Peripherals::take().unwrap();
    let core = pac::CorePeripherals::take().unwrap();

    let mut watchdog = hal::Watchdog::new(pac.WATCHDOG);
    let clocks = hal::clocks::init_clocks_and_plls(
        XOSC_CRYSTAL_FREQ,
        pac.XOSC,
        pac.CLOCKS,
        pac.PLL_SYS,
        pac.PLL_USB,
        &mut pac.RESETS,
        &mut watchdog,
    )
    .ok()
    .unwrap();
    let mut delay = cortex_m::delay::Delay::new(core.SYST, clocks.system_clock.freq().to_Hz());

    let sio = hal::Sio::new(pac.SIO);
    let gpio = hal::gpio::Pins::new(
        pac.IO_BANK0,
        pac.PADS_BANK0,
        sio.gpio_bank0,
        &mut pac.RESETS,
    );

    // Header pins 1 and 2: KANA/CODE and CAPS indicators, idle high.
    let mut kana = gpio.gpio0.into_push_pull_output();
    let mut caps = gpio.gpio1.into_push_pull_output();
    kana.set_high().unwrap();
    caps.set_high().unwrap();

    let select = RowSelectLines::new([
        gpio.gpio2.into(), // X0
        gpio.gpio3.into(), // X1
        gpio.gpio4.into(), // X2
        gpio.gpio5.into(), // X3
    ]);
    let shared = SharedLines::new([
        gpio.gpio6.into(), // X4/YD
        gpio.gpio7.into(), // X5/YC
        gpio.gpio8.into(), // X6/YB
        gpio.gpio9.into(), // X7/YA
    ]);
    let dir_sense = DirSenseLine::new(gpio.gpio10.into()); // KBDIR

    defmt::info!("MSX keyboard port ready");

    let mut bridge = KeyboardBridge::new(&MSX_KEYMAP, shared, select, dir_sense);

    // TODO: wire the PIO-USB host stack in here once it lands; until
    // then the bus side runs against an empty matrix.
    let mut transport = NullReportSource;

    loop {
        let _ = bridge.service(&mut transport);
        bridge.tick();
        delay.delay_ms(TICK_PERIOD_MS);
    }
}
