#![cfg_attr(target_os = "none", no_std)]
#![cfg_attr(target_os = "none", no_main)]

#[cfg(target_os = "none")]
use panic_reset as _;

#[cfg(target_os = "none")]
use cortex_m_rt::entry;
#[cfg(target_os = "none")]
use pong_firmware::{PongConfig, PongController};
#[cfg(target_os = "none")]
use stm32f1xx_hal::pac::Peripherals;

#[cfg(target_os = "none")]
mod pong_board;
#[cfg(target_os = "none")]
mod pong_semihosting;

#[cfg(target_os = "none")]
#[entry]
fn main() -> ! {
    let dp = Peripherals::take().unwrap();

    pong_semihosting::init();
    let game_timer = pong_board::init(dp);
    let mut controller = PongController::new(PongConfig::DEFAULT, game_timer, &pong_board::STATUS);

    controller.run();
}

#[cfg(not(target_os = "none"))]
fn main() {
    eprintln!("pong-firmware runs on the STM32F103, build it with --target thumbv7m-none-eabi");
}
