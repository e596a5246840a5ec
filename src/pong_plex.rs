//! Charlieplexed LED multiplexing.
//!
//! One LED is lit per firing, so a lit LED sees a 1/N duty cycle. A pin
//! pair is always released before the next one is driven; two pairs
//! driven at once light LEDs that share their pins.

use crate::pong_status::PongStatus;

/// Pins driving one LED: current flows from `anode` to `cathode`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlexPair {
    pub anode: u8,
    pub cathode: u8,
}

impl PlexPair {
    pub const fn new(anode: u8, cathode: u8) -> Self {
        PlexPair { anode, cathode }
    }
}

/// Pin access needed to charlieplex.
pub trait PlexPins {
    /// Puts both pins into high-impedance input mode.
    fn release(&mut self, pair: PlexPair);
    /// Makes both pins outputs, anode high and cathode low.
    fn drive(&mut self, pair: PlexPair);
}

pub struct PongPlex<P: PlexPins, const N: usize> {
    pins: P,
    table: &'static [PlexPair; N],
    current: usize,
    previous: Option<usize>,
}

impl<P: PlexPins, const N: usize> PongPlex<P, N> {
    pub fn new(mut pins: P, table: &'static [PlexPair; N]) -> Self {
        for pair in table.iter() {
            pins.release(*pair);
        }

        PongPlex {
            pins,
            table,
            current: 0,
            previous: None,
        }
    }

    /// One multiplexer step. Call from the refresh timer interrupt.
    pub fn fire(&mut self, status: &PongStatus<N>) {
        if let Some(previous) = self.previous {
            self.pins.release(self.table[previous]);
        }

        status.count_down_debounce();

        if status.led(self.current) {
            self.pins.drive(self.table[self.current]);
        }

        self.previous = Some(self.current);
        self.current = (self.current + 1) % N;
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn pins(&self) -> &P {
        &self.pins
    }
}
