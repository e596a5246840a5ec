//! Game pacing.
//!
//! The game clock interrupt only raises the tick flag. Its period is owned
//! by the game, which shortens it every rally tick through `PongClock`.

use crate::pong_config::PongConfig;
use crate::pong_status::PongStatus;

/// A periodic interrupt source whose period can be changed at run time.
pub trait PongClock {
    /// Sets the interval between ticks, in game clock units.
    fn set_period(&mut self, period: u16);
}

/// Prescaler register value that makes a timer clocked at `timer_clock_hz`
/// count at `tick_hz`.
pub const fn timer_prescaler(timer_clock_hz: u32, tick_hz: u32) -> u16 {
    (timer_clock_hz / tick_hz - 1) as u16
}

/// Auto-reload register value for an update event every `period` counts.
pub const fn auto_reload(period: u16) -> u16 {
    if period == 0 {
        0
    } else {
        period - 1
    }
}

/// Call from the game clock interrupt.
pub fn on_clock_interrupt<const N: usize>(status: &PongStatus<N>) {
    status.raise_tick();
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameSpeed {
    period: u16,
    start: u16,
    floor: u16,
    step: u16,
}

impl GameSpeed {
    pub const fn new(config: &PongConfig) -> Self {
        GameSpeed {
            period: config.start_speed,
            start: config.start_speed,
            floor: config.min_speed,
            step: config.speed_step,
        }
    }

    pub fn period(&self) -> u16 {
        self.period
    }

    /// Shortens the period by one step unless it already sits at the floor.
    /// Returns whether the period changed.
    pub fn accelerate(&mut self) -> bool {
        if self.period <= self.floor {
            return false;
        }

        self.period = self.period.saturating_sub(self.step).max(self.floor);
        true
    }

    pub fn reset(&mut self) {
        self.period = self.start;
    }
}
