use std::io;
use std::time::Duration;

use crate::clock::Clock;
use crate::game::{Game, GameEvent};
use crate::input::InputSource;
use crate::render::Renderer;

/// Default delay between ticks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Drives one game to completion: poll, tick, draw, sleep.
///
/// The poll interval only caps how often input is read and frames are drawn;
/// gravity runs off `Clock::now`.
pub struct Session<'a, I, R, C> {
    game: Game,
    input: &'a mut I,
    renderer: &'a mut R,
    clock: &'a C,
    poll_interval: Duration,
    history: Vec<GameEvent>,
}

impl<'a, I, R, C> Session<'a, I, R, C>
where
    I: InputSource,
    R: Renderer,
    C: Clock,
{
    pub fn new(game: Game, input: &'a mut I, renderer: &'a mut R, clock: &'a C) -> Self {
        Self {
            game,
            input,
            renderer,
            clock,
            poll_interval: DEFAULT_POLL_INTERVAL,
            history: Vec::new(),
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Every event the game emitted so far, in order.
    pub fn history(&self) -> &[GameEvent] {
        &self.history
    }

    /// Runs one tick and draws the result. Returns the final score once the
    /// game is over.
    pub fn step(&mut self) -> io::Result<Option<u32>> {
        let command = self.input.poll()?;
        self.game.tick(command, self.clock.now());
        self.history.extend(self.game.take_events());
        self.renderer.draw(&self.game.snapshot())?;
        Ok(self.game.final_score())
    }

    /// Ticks until the game is over and returns the final score.
    pub fn run(&mut self) -> io::Result<u32> {
        loop {
            if let Some(score) = self.step()? {
                return Ok(score);
            }
            self.clock.sleep(self.poll_interval);
        }
    }
}
