//! One-dimensional pong for a line of charlieplexed LEDs and two buttons.
//!
//! Everything here is hardware independent. The board crate supplies the
//! pin and timer implementations and calls the interrupt entry points:
//! `PongPlex::fire` from the refresh timer, `PongInput::on_falling_edge`
//! from the button lines and `on_clock_interrupt` from the game clock.

#![cfg_attr(not(test), no_std)]

pub mod pong_clock;
pub mod pong_config;
pub mod pong_controller;
pub mod pong_game;
pub mod pong_input;
pub mod pong_plex;
pub mod pong_status;

pub use pong_clock::{on_clock_interrupt, GameSpeed, PongClock};
pub use pong_config::{PongConfig, LED_COUNT};
pub use pong_controller::PongController;
pub use pong_game::{Direction, PongGame, PongPhase};
pub use pong_input::PongInput;
pub use pong_plex::{PlexPair, PlexPins, PongPlex};
pub use pong_status::{PongButton, PongStatus};
