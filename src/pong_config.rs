//! Compile-time game configuration.
//!
//! Durations are expressed in the unit of the interrupt that consumes them:
//! the debounce window counts multiplexer firings and game speeds count
//! game clock ticks. Their real-time length follows from the board's timer
//! frequencies.

/// Number of charlieplexed LEDs driven by the multiplexer.
pub const LED_COUNT: usize = 20;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PongConfig {
    /// Playable part of the LED line, starting at index 0. May be shorter
    /// than the display.
    pub field_length: u8,
    /// Multiplexer firings a button stays deaf after an accepted press.
    pub debounce_window: u16,
    /// Game clock period at the start of every rally.
    pub start_speed: u16,
    /// Fastest game clock period; acceleration stops here.
    pub min_speed: u16,
    /// Amount the period shrinks by on every rally tick.
    pub speed_step: u16,
    /// Ball position at power-on.
    pub serve_position: u8,
    /// Points that end a game. Not consulted by any transition yet.
    pub max_score: u8,
}

impl PongConfig {
    pub const DEFAULT: PongConfig = PongConfig {
        field_length: 20,
        debounce_window: 500,
        start_speed: 20_000,
        min_speed: 600,
        speed_step: 50,
        serve_position: 10,
        max_score: 3,
    };

    /// Index of the LED defended by button 1.
    pub const fn high_end(&self) -> u8 {
        self.field_length - 1
    }

    /// Checks the invariants the game logic relies on for a display of
    /// `led_count` LEDs.
    pub const fn is_valid_for(&self, led_count: usize) -> bool {
        self.field_length > 0
            && self.field_length as usize <= led_count
            && self.serve_position < self.field_length
            && self.min_speed <= self.start_speed
            && self.speed_step > 0
    }
}

impl Default for PongConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

const _: () = assert!(PongConfig::DEFAULT.is_valid_for(LED_COUNT));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_a_twenty_led_field() {
        let config = PongConfig::default();
        assert_eq!(config.field_length, 20);
        assert_eq!(config.high_end(), 19);
        assert_eq!(config.serve_position, 10);
    }

    #[test]
    fn rejects_field_longer_than_display() {
        let config = PongConfig {
            field_length: 21,
            ..PongConfig::DEFAULT
        };
        assert!(!config.is_valid_for(LED_COUNT));
        assert!(config.is_valid_for(24));
    }

    #[test]
    fn rejects_inverted_speed_range() {
        let config = PongConfig {
            min_speed: 30_000,
            ..PongConfig::DEFAULT
        };
        assert!(!config.is_valid_for(LED_COUNT));
    }
}
