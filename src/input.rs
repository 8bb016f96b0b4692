//! Key mapping from terminal events to game commands.

use std::collections::VecDeque;
use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::game::Command;

/// Source of at most one command per tick.
pub trait InputSource {
    /// Returns the next pending command without blocking, or
    /// `Command::None` when nothing is pending.
    fn poll(&mut self) -> io::Result<Command>;
}

/// Map a key press to a command. Anything unrecognised is `Command::None`.
pub fn command_for_key(key: KeyEvent) -> Command {
    if key.kind != KeyEventKind::Press {
        return Command::None;
    }
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Command::Quit;
    }

    match key.code {
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Char('h') | KeyCode::Char('H') => {
            Command::MoveLeft
        }
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Char('l') | KeyCode::Char('L') => {
            Command::MoveRight
        }
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Char('j') | KeyCode::Char('J') => {
            Command::SoftDrop
        }
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Char('k') | KeyCode::Char('K') => {
            Command::Rotate
        }
        KeyCode::Char(' ') => Command::HardDrop,
        KeyCode::Char('p') | KeyCode::Char('P') => Command::Pause,
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => Command::Quit,
        _ => Command::None,
    }
}

/// Reads crossterm events without waiting. Non-key events map to `None`.
#[derive(Default)]
pub struct TerminalInput;

impl InputSource for TerminalInput {
    fn poll(&mut self) -> io::Result<Command> {
        if !event::poll(Duration::ZERO)? {
            return Ok(Command::None);
        }
        match event::read()? {
            Event::Key(key) => Ok(command_for_key(key)),
            _ => Ok(Command::None),
        }
    }
}

/// Replays a fixed list of commands, then reports `None` forever.
#[derive(Default)]
pub struct ScriptedInput {
    commands: VecDeque<Command>,
}

impl ScriptedInput {
    pub fn new(commands: impl IntoIterator<Item = Command>) -> Self {
        Self {
            commands: commands.into_iter().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> io::Result<Command> {
        Ok(self.commands.pop_front().unwrap_or(Command::None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    #[test]
    fn movement_keys() {
        assert_eq!(command_for_key(KeyEvent::from(KeyCode::Left)), Command::MoveLeft);
        assert_eq!(command_for_key(KeyEvent::from(KeyCode::Char('d'))), Command::MoveRight);
        assert_eq!(command_for_key(KeyEvent::from(KeyCode::Char('J'))), Command::SoftDrop);
        assert_eq!(command_for_key(KeyEvent::from(KeyCode::Up)), Command::Rotate);
        assert_eq!(command_for_key(KeyEvent::from(KeyCode::Char(' '))), Command::HardDrop);
    }

    #[test]
    fn quit_and_pause_keys() {
        assert_eq!(command_for_key(KeyEvent::from(KeyCode::Esc)), Command::Quit);
        assert_eq!(
            command_for_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Command::Quit
        );
        assert_eq!(command_for_key(KeyEvent::from(KeyCode::Char('p'))), Command::Pause);
    }

    #[test]
    fn unknown_keys_and_releases_are_ignored() {
        assert_eq!(command_for_key(KeyEvent::from(KeyCode::Char('x'))), Command::None);
        assert_eq!(command_for_key(KeyEvent::from(KeyCode::F(5))), Command::None);

        let release = KeyEvent {
            code: KeyCode::Left,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert_eq!(command_for_key(release), Command::None);
    }

    #[test]
    fn scripted_input_runs_dry() {
        let mut input = ScriptedInput::new([Command::Rotate]);
        assert_eq!(input.poll().unwrap(), Command::Rotate);
        assert_eq!(input.poll().unwrap(), Command::None);
    }
}
