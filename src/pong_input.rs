//! Button debouncing.
//!
//! The debounce counters are counted down by the multiplexer interrupt
//! (see `PongPlex::fire`), so the window is measured in multiplexer firings
//! and no timer is spent on the buttons.

use crate::pong_status::{PongButton, PongStatus};

pub struct PongInput {
    window: u16,
}

impl PongInput {
    pub const fn new(window: u16) -> Self {
        PongInput { window }
    }

    /// Handles a falling edge on `button`'s line. Call from the edge
    /// interrupt. Edges inside the debounce window are dropped; a press
    /// accepted while the previous one is unconsumed merges with it.
    pub fn on_falling_edge<const N: usize>(
        &self,
        status: &PongStatus<N>,
        button: PongButton,
    ) -> bool {
        status.try_press(button, self.window)
    }

    /// Clears both press flags and restarts both debounce windows.
    pub fn reset<const N: usize>(&self, status: &PongStatus<N>) {
        status.reset_buttons(self.window);
    }
}
