use std::time::Duration;

use clap::Parser;

use crate::board::{GRID_HEIGHT, GRID_WIDTH};

/// Narrowest board the CLI accepts: the I piece needs four columns.
pub const MIN_WIDTH: u16 = 4;
pub const MAX_WIDTH: u16 = 30;
pub const MIN_HEIGHT: u16 = 4;
pub const MAX_HEIGHT: u16 = 40;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about = "Falling-block puzzle game for the terminal", long_about = None)]
pub struct Config {
    /// Seed for the piece randomizer (random when omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Board width in cells
    #[arg(long, default_value_t = GRID_WIDTH as u16, value_parser = clap::value_parser!(u16).range(i64::from(MIN_WIDTH)..=i64::from(MAX_WIDTH)))]
    pub width: u16,

    /// Board height in cells
    #[arg(long, default_value_t = GRID_HEIGHT as u16, value_parser = clap::value_parser!(u16).range(i64::from(MIN_HEIGHT)..=i64::from(MAX_HEIGHT)))]
    pub height: u16,

    /// Milliseconds between input polls and redraws
    #[arg(long, default_value_t = 50, value_parser = clap::value_parser!(u64).range(1..=1000))]
    pub poll_ms: u64,
}

impl Config {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: None,
            width: GRID_WIDTH as u16,
            height: GRID_HEIGHT as u16,
            poll_ms: 50,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_parser_defaults() {
        let parsed = Config::parse_from(["blockfall"]);
        let default = Config::default();
        assert_eq!(parsed.width, default.width);
        assert_eq!(parsed.height, default.height);
        assert_eq!(parsed.poll_ms, default.poll_ms);
        assert_eq!(parsed.seed, None);
    }

    #[test]
    fn rejects_too_narrow_board() {
        assert!(Config::try_parse_from(["blockfall", "--width", "3"]).is_err());
    }

    #[test]
    fn reads_seed_and_size() {
        let parsed = Config::parse_from(["blockfall", "--seed", "7", "--width", "12", "--height", "22"]);
        assert_eq!(parsed.seed, Some(7));
        assert_eq!(parsed.poll_interval(), Duration::from_millis(50));
        assert_eq!((parsed.width, parsed.height), (12, 22));
    }
}
