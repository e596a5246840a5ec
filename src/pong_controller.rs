//! The foreground loop.
//!
//! Interrupts only raise flags. This loop consumes them and feeds the game,
//! one flag at a time, never blocking.

use crate::pong_clock::PongClock;
use crate::pong_config::PongConfig;
use crate::pong_game::{PongGame, PongPhase};
use crate::pong_status::{PongButton, PongStatus};

pub struct PongController<'a, C: PongClock, const N: usize> {
    status: &'a PongStatus<N>,
    game: PongGame<C>,
}

impl<'a, C: PongClock, const N: usize> PongController<'a, C, N> {
    pub fn new(config: PongConfig, clock: C, status: &'a PongStatus<N>) -> Self {
        debug_assert!(config.is_valid_for(N));

        let mut game = PongGame::new(config, clock);
        game.start(status);

        PongController { status, game }
    }

    pub fn run(&mut self) -> ! {
        loop {
            self.poll();
        }
    }

    /// One pass over the flags.
    ///
    /// While the score is shown or the ball waits to be served the loop
    /// only moves on once exactly one button has been pressed; pressing
    /// both keeps it waiting.
    pub fn poll(&mut self) {
        match self.game.phase() {
            PongPhase::Rally => {
                for button in PongButton::ALL {
                    if self.status.is_pressed(button) {
                        self.game.on_press(button);
                        self.status.clear_press(button);
                    }
                }

                self.consume_tick();
            }
            PongPhase::ScoreDisplay => {
                if self.status.presses_differ() {
                    self.game.acknowledge(self.status);
                }
            }
            PongPhase::Serve => {
                if self.status.presses_differ() {
                    self.game.serve(self.status);
                } else {
                    self.consume_tick();
                }
            }
            PongPhase::Attract => {}
        }
    }

    pub fn game(&self) -> &PongGame<C> {
        &self.game
    }

    fn consume_tick(&mut self) {
        if self.status.tick_pending() {
            self.game.on_tick(self.status);
            self.status.clear_tick();
        }
    }
}
