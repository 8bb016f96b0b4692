//! Falling-block puzzle game engine with a terminal front end.
//!
//! The engine (`geometry`, `piece`, `board`, `game`) is pure state: it never
//! touches the terminal or the system clock. Terminal glue lives behind the
//! `InputSource`, `Renderer` and `Clock` seams so a whole session can run
//! headless.

pub mod board;
pub mod clock;
pub mod config;
pub mod game;
pub mod geometry;
pub mod input;
pub mod piece;
pub mod render;
pub mod session;
pub mod ui;
