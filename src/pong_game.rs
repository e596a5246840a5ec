//! The pong state machine.
//!
//! Runs in the foreground only. It reads nothing from the interrupts except
//! through the flags the controller hands it, and writes the LED status
//! vector the multiplexer displays.

use log::{debug, info};

use crate::pong_clock::{GameSpeed, PongClock};
use crate::pong_config::PongConfig;
use crate::pong_input::PongInput;
use crate::pong_status::{PongButton, PongStatus};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PongPhase {
    /// Idle demo mode. Never entered.
    Attract,
    Rally,
    ScoreDisplay,
    Serve,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Toward index 0.
    Low,
    /// Toward the last field index.
    High,
}

impl Direction {
    pub fn reversed(self) -> Self {
        match self {
            Direction::Low => Direction::High,
            Direction::High => Direction::Low,
        }
    }
}

pub struct PongGame<C: PongClock> {
    config: PongConfig,
    input: PongInput,
    clock: C,
    phase: PongPhase,
    ball: u8,
    direction: Direction,
    scores: [u8; 2],
    speed: GameSpeed,
}

impl<C: PongClock> PongGame<C> {
    pub fn new(config: PongConfig, clock: C) -> Self {
        PongGame {
            input: PongInput::new(config.debounce_window),
            clock,
            phase: PongPhase::Rally,
            ball: config.serve_position,
            direction: Direction::High,
            scores: [0; 2],
            speed: GameSpeed::new(&config),
            config,
        }
    }

    /// Power-on: blank display, fresh scores, ball lit at the serve
    /// position heading for the high end.
    pub fn start<const N: usize>(&mut self, status: &PongStatus<N>) {
        status.clear_leds();

        self.phase = PongPhase::Rally;
        self.ball = self.config.serve_position;
        self.direction = Direction::High;
        self.scores = [0; 2];
        self.speed.reset();
        self.clock.set_period(self.speed.period());

        status.set_led(self.ball as usize, true);
        self.input.reset(status);

        info!("game started, ball at {}", self.ball);
    }

    /// Applies a consumed press. Only a press made while the ball sits on
    /// the button's own end has an effect: the ball is returned.
    pub fn on_press(&mut self, button: PongButton) {
        if self.phase != PongPhase::Rally {
            return;
        }

        match button {
            PongButton::One if self.ball == self.config.high_end() => {
                self.direction = Direction::Low;
            }
            PongButton::Two if self.ball == 0 => {
                self.direction = Direction::High;
            }
            _ => {}
        }
    }

    /// Advances the game by one consumed clock tick.
    pub fn on_tick<const N: usize>(&mut self, status: &PongStatus<N>) {
        match self.phase {
            PongPhase::Rally => self.rally_tick(status),
            PongPhase::Serve => status.toggle_led(self.ball as usize),
            PongPhase::ScoreDisplay | PongPhase::Attract => {}
        }
    }

    /// Leaves the score display for the serve. Call once a single button
    /// has been pressed.
    pub fn acknowledge<const N: usize>(&mut self, status: &PongStatus<N>) {
        if self.phase != PongPhase::ScoreDisplay {
            return;
        }

        self.input.reset(status);
        status.clear_leds();
        self.phase = PongPhase::Serve;

        debug!("score acknowledged, serving from {}", self.ball);
    }

    /// Puts the blinking ball back in play. Call once a single button has
    /// been pressed.
    pub fn serve<const N: usize>(&mut self, status: &PongStatus<N>) {
        if self.phase != PongPhase::Serve {
            return;
        }

        self.input.reset(status);
        status.clear_tick();
        status.set_led(self.ball as usize, true);
        self.phase = PongPhase::Rally;

        debug!("served from {} heading {:?}", self.ball, self.direction);
    }

    pub fn phase(&self) -> PongPhase {
        self.phase
    }

    pub fn ball(&self) -> u8 {
        self.ball
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn score(&self, button: PongButton) -> u8 {
        self.scores[button as usize]
    }

    pub fn period(&self) -> u16 {
        self.speed.period()
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    fn rally_tick<const N: usize>(&mut self, status: &PongStatus<N>) {
        if self.speed.accelerate() {
            self.clock.set_period(self.speed.period());
        }

        status.set_led(self.ball as usize, false);

        // Stepping off index 0 wraps to 255, which the range check below
        // treats like leaving the high end. The direction tells them apart.
        self.ball = match self.direction {
            Direction::High => self.ball.wrapping_add(1),
            Direction::Low => self.ball.wrapping_sub(1),
        };

        if self.ball < self.config.field_length {
            status.set_led(self.ball as usize, true);
            return;
        }

        self.score_point(status);
    }

    fn score_point<const N: usize>(&mut self, status: &PongStatus<N>) {
        let scorer = match self.direction {
            Direction::High => {
                self.ball = self.config.high_end();
                PongButton::One
            }
            Direction::Low => {
                self.ball = 0;
                PongButton::Two
            }
        };

        self.scores[scorer as usize] = self.scores[scorer as usize].saturating_add(1);
        self.direction = self.direction.reversed();
        self.speed.reset();
        self.clock.set_period(self.speed.period());

        info!(
            "point for {:?}, score {}-{}",
            scorer, self.scores[0], self.scores[1]
        );

        self.show_scores(status);
        self.phase = PongPhase::ScoreDisplay;
    }

    /// Player one's score grows from index 0, player two's from the high
    /// end of the field.
    fn show_scores<const N: usize>(&self, status: &PongStatus<N>) {
        let length = self.config.field_length as usize;

        for i in 0..(self.score(PongButton::One) as usize).min(length) {
            status.set_led(i, true);
        }

        for i in 0..(self.score(PongButton::Two) as usize).min(length) {
            status.set_led(length - 1 - i, true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const N: usize = 20;

    #[derive(Default)]
    struct FakeClock {
        periods: Vec<u16>,
    }

    impl PongClock for FakeClock {
        fn set_period(&mut self, period: u16) {
            self.periods.push(period);
        }
    }

    fn started() -> (PongGame<FakeClock>, PongStatus<N>) {
        let status = PongStatus::new();
        let mut game = PongGame::new(PongConfig::DEFAULT, FakeClock::default());
        game.start(&status);
        (game, status)
    }

    fn lit(status: &PongStatus<N>) -> Vec<usize> {
        (0..N).filter(|i| status.led(*i)).collect()
    }

    #[test]
    fn start_lights_serve_position() {
        let (game, status) = started();

        assert_eq!(game.phase(), PongPhase::Rally);
        assert_eq!(game.ball(), 10);
        assert_eq!(game.direction(), Direction::High);
        assert_eq!(lit(&status), vec![10]);
        assert_eq!(game.clock().periods, vec![20_000]);
    }

    #[test]
    fn start_makes_buttons_deaf_for_a_window() {
        let (_, status) = started();

        assert_eq!(status.debounce_remaining(PongButton::One), 500);
        assert_eq!(status.debounce_remaining(PongButton::Two), 500);
    }

    #[test]
    fn rally_tick_moves_single_lit_led() {
        let (mut game, status) = started();

        game.on_tick(&status);

        assert_eq!(game.ball(), 11);
        assert_eq!(lit(&status), vec![11]);
    }

    #[test]
    fn rally_tick_speeds_up_clock() {
        let (mut game, status) = started();

        game.on_tick(&status);
        game.on_tick(&status);

        assert_eq!(game.clock().periods, vec![20_000, 19_950, 19_900]);
    }

    #[test]
    fn press_away_from_own_end_is_ignored() {
        let (mut game, _) = started();

        game.on_press(PongButton::One);
        game.on_press(PongButton::Two);

        assert_eq!(game.direction(), Direction::High);
    }

    #[test]
    fn low_end_return() {
        let (mut game, status) = started();
        game.on_press(PongButton::One);
        game.direction = Direction::Low;
        for _ in 0..10 {
            game.on_tick(&status);
        }
        assert_eq!(game.ball(), 0);

        game.on_press(PongButton::Two);
        game.on_tick(&status);

        assert_eq!(game.direction(), Direction::High);
        assert_eq!(game.ball(), 1);
        assert_eq!(game.phase(), PongPhase::Rally);
    }

    #[test]
    fn leaving_low_end_wraps_then_clamps() {
        let (mut game, status) = started();
        game.direction = Direction::Low;

        for _ in 0..11 {
            game.on_tick(&status);
        }

        assert_eq!(game.phase(), PongPhase::ScoreDisplay);
        assert_eq!(game.ball(), 0);
        assert_eq!(game.direction(), Direction::High);
        assert_eq!(game.score(PongButton::Two), 1);
        assert_eq!(game.score(PongButton::One), 0);
        assert_eq!(lit(&status), vec![19]);
    }

    #[test]
    fn scores_render_from_both_ends() {
        let (mut game, status) = started();
        game.scores = [2, 1];

        game.show_scores(&status);

        assert_eq!(lit(&status), vec![0, 1, 10, 19]);
    }

    #[test]
    fn oversized_scores_stay_inside_field() {
        let (mut game, status) = started();
        status.clear_leds();
        game.scores = [40, 0];

        game.show_scores(&status);

        assert_eq!(lit(&status).len(), N);
    }

    #[test]
    fn ticks_are_ignored_during_score_display() {
        let (mut game, status) = started();
        for _ in 0..10 {
            game.on_tick(&status);
        }
        let shown = status.leds();

        game.on_tick(&status);

        assert_eq!(game.phase(), PongPhase::ScoreDisplay);
        assert_eq!(status.leds(), shown);
    }

    #[test]
    fn serve_blinks_ball() {
        let (mut game, status) = started();
        for _ in 0..10 {
            game.on_tick(&status);
        }
        game.acknowledge(&status);
        assert!(lit(&status).is_empty());

        game.on_tick(&status);
        assert_eq!(lit(&status), vec![19]);
        game.on_tick(&status);
        assert!(lit(&status).is_empty());
    }

    #[test]
    fn serve_relights_ball_and_drops_pending_tick() {
        let (mut game, status) = started();
        for _ in 0..10 {
            game.on_tick(&status);
        }
        game.acknowledge(&status);
        game.on_tick(&status);
        game.on_tick(&status);
        status.raise_tick();

        game.serve(&status);

        assert_eq!(game.phase(), PongPhase::Rally);
        assert_eq!(lit(&status), vec![19]);
        assert!(!status.tick_pending());
    }

    #[test]
    fn transitions_outside_their_phase_do_nothing() {
        let (mut game, status) = started();

        game.acknowledge(&status);
        game.serve(&status);

        assert_eq!(game.phase(), PongPhase::Rally);
        assert_eq!(lit(&status), vec![10]);
    }
}
