//! State shared between the interrupt handlers and the foreground loop.
//!
//! Every field is a single atomic word, so plain loads and stores need no
//! locking. Compound updates spanning more than one field go through
//! `critical_section::with`.

use core::sync::atomic::{AtomicBool, AtomicU16, Ordering};

/// The two player buttons.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PongButton {
    /// Defends the high end of the field.
    One = 0,
    /// Defends index 0.
    Two = 1,
}

impl PongButton {
    pub const ALL: [PongButton; 2] = [PongButton::One, PongButton::Two];
}

pub struct PongButtonState {
    pressed: AtomicBool,
    debounce: AtomicU16,
}

impl PongButtonState {
    const fn new() -> Self {
        PongButtonState {
            pressed: AtomicBool::new(false),
            debounce: AtomicU16::new(0),
        }
    }
}

pub struct PongStatus<const N: usize> {
    leds: [AtomicBool; N],
    buttons: [PongButtonState; 2],
    tick: AtomicBool,
}

impl<const N: usize> PongStatus<N> {
    pub const fn new() -> Self {
        PongStatus {
            leds: [const { AtomicBool::new(false) }; N],
            buttons: [PongButtonState::new(), PongButtonState::new()],
            tick: AtomicBool::new(false),
        }
    }

    pub fn led(&self, index: usize) -> bool {
        self.leds[index].load(Ordering::Relaxed)
    }

    pub fn set_led(&self, index: usize, on: bool) {
        self.leds[index].store(on, Ordering::Relaxed);
    }

    pub fn toggle_led(&self, index: usize) {
        self.leds[index].fetch_xor(true, Ordering::Relaxed);
    }

    pub fn clear_leds(&self) {
        for led in self.leds.iter() {
            led.store(false, Ordering::Relaxed);
        }
    }

    /// Copy of the status vector, for inspection.
    pub fn leds(&self) -> [bool; N] {
        core::array::from_fn(|i| self.led(i))
    }

    pub fn is_pressed(&self, button: PongButton) -> bool {
        self.button(button).pressed.load(Ordering::Acquire)
    }

    pub fn clear_press(&self, button: PongButton) {
        self.button(button).pressed.store(false, Ordering::Release);
    }

    /// True when exactly one of the two press flags is set. A simultaneous
    /// press on both buttons does not count.
    pub fn presses_differ(&self) -> bool {
        self.is_pressed(PongButton::One) != self.is_pressed(PongButton::Two)
    }

    pub fn debounce_remaining(&self, button: PongButton) -> u16 {
        self.button(button).debounce.load(Ordering::Relaxed)
    }

    /// Accepts a press when the button's debounce counter has run out,
    /// reloading it with `window`. Returns `true` when the edge was taken,
    /// either raising the press flag or merging into one still pending;
    /// `false` when it fell inside the window and was dropped.
    pub(crate) fn try_press(&self, button: PongButton, window: u16) -> bool {
        let state = self.button(button);

        critical_section::with(|_| {
            if state.debounce.load(Ordering::Relaxed) != 0 {
                return false;
            }

            state.pressed.store(true, Ordering::Release);
            state.debounce.store(window, Ordering::Relaxed);
            true
        })
    }

    /// Counts both debounce counters down by one, stopping at zero.
    pub(crate) fn count_down_debounce(&self) {
        for state in self.buttons.iter() {
            let _ = state
                .debounce
                .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |remaining| {
                    remaining.checked_sub(1)
                });
        }
    }

    /// Clears both press flags and makes both buttons deaf for `window`
    /// multiplexer firings.
    pub fn reset_buttons(&self, window: u16) {
        critical_section::with(|_| {
            for state in self.buttons.iter() {
                state.pressed.store(false, Ordering::Release);
                state.debounce.store(window, Ordering::Relaxed);
            }
        });
    }

    pub fn raise_tick(&self) {
        self.tick.store(true, Ordering::Release);
    }

    pub fn tick_pending(&self) -> bool {
        self.tick.load(Ordering::Acquire)
    }

    pub fn clear_tick(&self) {
        self.tick.store(false, Ordering::Release);
    }

    fn button(&self, button: PongButton) -> &PongButtonState {
        &self.buttons[button as usize]
    }
}

impl<const N: usize> Default for PongStatus<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clearing_clear_flags_is_a_no_op() {
        let status = PongStatus::<4>::new();

        status.clear_press(PongButton::One);
        status.clear_tick();
        assert!(!status.is_pressed(PongButton::One));
        assert!(!status.tick_pending());

        status.raise_tick();
        status.clear_tick();
        status.clear_tick();
        assert!(!status.tick_pending());
    }

    #[test]
    fn repeated_ticks_coalesce() {
        let status = PongStatus::<4>::new();

        status.raise_tick();
        status.raise_tick();
        assert!(status.tick_pending());

        status.clear_tick();
        assert!(!status.tick_pending());
    }

    #[test]
    fn double_press_does_not_differ() {
        let status = PongStatus::<4>::new();
        assert!(!status.presses_differ());

        assert!(status.try_press(PongButton::Two, 3));
        assert!(status.presses_differ());

        assert!(status.try_press(PongButton::One, 3));
        assert!(!status.presses_differ());
    }

    #[test]
    fn press_after_window_merges_into_pending_flag() {
        let status = PongStatus::<4>::new();
        assert!(status.try_press(PongButton::One, 2));
        status.count_down_debounce();
        status.count_down_debounce();

        assert!(status.try_press(PongButton::One, 2));
        assert!(status.is_pressed(PongButton::One));
        assert_eq!(status.debounce_remaining(PongButton::One), 2);

        status.clear_press(PongButton::One);
        assert!(!status.is_pressed(PongButton::One));
    }

    #[test]
    fn press_inside_window_is_dropped() {
        let status = PongStatus::<4>::new();
        assert!(status.try_press(PongButton::Two, 2));
        status.clear_press(PongButton::Two);
        status.count_down_debounce();

        assert!(!status.try_press(PongButton::Two, 2));
        assert!(!status.is_pressed(PongButton::Two));
        assert_eq!(status.debounce_remaining(PongButton::Two), 1);
    }

    #[test]
    fn debounce_countdown_stops_at_zero() {
        let status = PongStatus::<4>::new();
        status.reset_buttons(2);

        status.count_down_debounce();
        assert_eq!(status.debounce_remaining(PongButton::One), 1);
        status.count_down_debounce();
        status.count_down_debounce();
        assert_eq!(status.debounce_remaining(PongButton::One), 0);
        assert_eq!(status.debounce_remaining(PongButton::Two), 0);
    }

    #[test]
    fn toggle_inverts_one_led() {
        let status = PongStatus::<4>::new();

        status.toggle_led(2);
        assert_eq!(status.leds(), [false, false, true, false]);
        status.toggle_led(2);
        assert_eq!(status.leds(), [false; 4]);
    }
}
