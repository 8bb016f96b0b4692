use anyhow::{Context, Result};
use clap::Parser;

use blockfall::{
    clock::MonotonicClock,
    config::Config,
    game::{Game, RandomPieceProvider},
    input::TerminalInput,
    session::Session,
    ui::TerminalRenderer,
};

fn main() -> Result<()> {
    let config = Config::parse();

    let provider = RandomPieceProvider::new(config.seed);
    let game = Game::with_dimensions(
        usize::from(config.width),
        usize::from(config.height),
        Box::new(provider),
    );

    let mut renderer = TerminalRenderer::enter().context("failed to set up the terminal")?;
    let mut input = TerminalInput;
    let clock = MonotonicClock::new();

    let result = Session::new(game, &mut input, &mut renderer, &clock)
        .with_poll_interval(config.poll_interval())
        .run();

    // Always try to restore terminal state.
    let restored = renderer.exit();
    let score = result.context("terminal session failed")?;
    restored.context("failed to restore the terminal")?;

    println!("Game Over! Score: {score}");
    Ok(())
}
