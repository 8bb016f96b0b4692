//! Headless sessions: scripted input, a manual clock and recording renderers.

use std::io;
use std::time::Duration;

use blockfall::board::CellState;
use blockfall::clock::{Clock, ManualClock};
use blockfall::game::{test_helpers::*, Command, Game, GameEvent, GameState, SequencePieceProvider};
use blockfall::geometry::Offset;
use blockfall::input::ScriptedInput;
use blockfall::piece::{Piece, TetrominoType};
use blockfall::render::{Renderer, Snapshot, TextRenderer};
use blockfall::session::Session;

#[derive(Default)]
struct RecordingRenderer {
    frames: Vec<Frame>,
}

#[derive(Debug, Clone, PartialEq)]
struct Frame {
    state: GameState,
    score: u32,
    level: u32,
    piece_origin: Offset,
    settled: usize,
}

impl Renderer for RecordingRenderer {
    fn draw(&mut self, snapshot: &Snapshot<'_>) -> io::Result<()> {
        self.frames.push(Frame {
            state: snapshot.state,
            score: snapshot.score,
            level: snapshot.level,
            piece_origin: snapshot.piece.origin,
            settled: snapshot.board.total_filled_cells(),
        });
        Ok(())
    }
}

fn o_pieces() -> Box<SequencePieceProvider> {
    Box::new(SequencePieceProvider::new(vec![TetrominoType::O]))
}

mod scripted_play {
    use super::*;

    #[test]
    fn start_drop_quit() {
        let game = Game::new(o_pieces());
        let mut input = ScriptedInput::new([Command::MoveLeft, Command::HardDrop, Command::Quit]);
        let mut renderer = RecordingRenderer::default();
        let clock = ManualClock::new();

        let mut session = Session::new(game, &mut input, &mut renderer, &clock);
        let score = session.run().unwrap();

        assert_eq!(score, 0);
        let history = session.history().to_vec();
        assert_eq!(history.first(), Some(&GameEvent::Started));
        assert!(history.contains(&GameEvent::PieceLocked));
        assert_eq!(history.last(), Some(&GameEvent::GameOver));
        drop(session);

        let states: Vec<GameState> = renderer.frames.iter().map(|f| f.state).collect();
        assert_eq!(states, vec![GameState::Running, GameState::Running, GameState::Over]);
        assert_eq!(renderer.frames[1].settled, 4);
        assert!(input.is_empty());
    }

    #[test]
    fn one_frame_per_tick() {
        let game = Game::new(o_pieces());
        let mut input = ScriptedInput::default();
        let mut renderer = RecordingRenderer::default();
        let clock = ManualClock::new();

        let mut session = Session::new(game, &mut input, &mut renderer, &clock);
        for _ in 0..5 {
            assert_eq!(session.step().unwrap(), None);
        }
        assert_eq!(session.game().state(), GameState::Ready);
        drop(session);

        assert_eq!(renderer.frames.len(), 5);
        assert!(renderer.frames.iter().all(|f| f.score == 0 && f.level == 1));
    }

    #[test]
    fn pause_holds_the_piece_across_ticks() {
        let game = running_game(empty_board(), Piece::spawn(TetrominoType::O), TetrominoType::O);
        let mut input = ScriptedInput::new([Command::Pause]);
        let mut renderer = RecordingRenderer::default();
        let clock = ManualClock::new();

        let mut session = Session::new(game, &mut input, &mut renderer, &clock);
        for _ in 0..40 {
            session.step().unwrap();
            clock.advance(Duration::from_millis(100));
        }
        assert_eq!(session.game().state(), GameState::Paused);
        drop(session);

        assert!(renderer.frames.iter().all(|f| f.piece_origin == Offset::new(4, 0)));
    }
}

mod timing {
    use super::*;

    fn origin_after(poll: Duration, until: Duration) -> Offset {
        let game = running_game(empty_board(), Piece::spawn(TetrominoType::O), TetrominoType::O);
        let mut input = ScriptedInput::default();
        let mut renderer = RecordingRenderer::default();
        let clock = ManualClock::new();

        let mut session = Session::new(game, &mut input, &mut renderer, &clock);
        loop {
            session.step().unwrap();
            if clock.now() >= until {
                break;
            }
            clock.sleep(poll);
        }
        session.game().current_piece().origin
    }

    #[test]
    fn coarse_polling_keeps_gravity_on_schedule() {
        let until = Duration::from_millis(2_800);
        let fine = origin_after(Duration::from_millis(50), until);
        let coarse = origin_after(Duration::from_millis(700), until);

        assert_eq!(fine, Offset::new(4, 3));
        assert_eq!(coarse, fine);
    }

    #[test]
    fn blocked_spawn_ends_a_session_under_gravity() {
        let mut board = empty_board();
        for (x, y) in [(4, 0), (5, 0), (4, 1), (5, 1)] {
            board.set(x, y, CellState::Filled(TetrominoType::Z));
        }
        let game = Game::with_board(board, Piece::spawn_at(TetrominoType::O, Offset::new(0, 0)), o_pieces());
        let mut input = ScriptedInput::default();
        let mut renderer = RecordingRenderer::default();
        let clock = ManualClock::new();

        let mut session = Session::new(game, &mut input, &mut renderer, &clock)
            .with_poll_interval(Duration::from_millis(50));
        let score = session.run().unwrap();

        assert_eq!(score, 0);
        let locks = session
            .history()
            .iter()
            .filter(|e| **e == GameEvent::PieceLocked)
            .count();
        assert_eq!(locks, 1);
        assert_eq!(session.game().board().total_filled_cells(), 8);
        drop(session);

        // 18 falls to reach the floor, then one more interval to land.
        assert!(clock.now() >= Duration::from_millis(19 * 800));
        assert_eq!(renderer.frames.last().map(|f| f.state), Some(GameState::Over));
    }
}

mod text_output {
    use super::*;

    #[test]
    fn text_renderer_writes_each_frame() {
        let game = running_game(empty_board(), Piece::spawn(TetrominoType::O), TetrominoType::O);
        let mut input = ScriptedInput::new([Command::None, Command::Quit]);
        let mut renderer = TextRenderer::new(Vec::new());
        let clock = ManualClock::new();

        Session::new(game, &mut input, &mut renderer, &clock).run().unwrap();

        let out = String::from_utf8(renderer.into_inner()).unwrap();
        assert_eq!(out.matches("Score: 0 Level: 1").count(), 2);
        assert!(out.contains("|        [][]        |"));
    }
}
