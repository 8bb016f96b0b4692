use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::board::{Board, GRID_HEIGHT, GRID_WIDTH};
use crate::piece::{Piece, TetrominoType};
use crate::render::Snapshot;

// ============================================================================
// Configuration
// ============================================================================

// Timing (in milliseconds)
const BASE_FALL_MS: u64 = 800;
const MIN_FALL_MS: u64 = 100;
const SPEED_INCREASE_PER_LEVEL: u64 = 50;
pub const LINES_PER_LEVEL: u32 = 10;

// Scoring
pub const SCORE_SINGLE: u32 = 100;
pub const SCORE_DOUBLE: u32 = 300;
pub const SCORE_TRIPLE: u32 = 500;
pub const SCORE_TETRIS: u32 = 800;

/// Base points indexed by the number of rows cleared by one landing.
pub const LINE_SCORES: [u32; 5] = [0, SCORE_SINGLE, SCORE_DOUBLE, SCORE_TRIPLE, SCORE_TETRIS];

/// Points for clearing `lines` rows at once on `level`.
pub fn line_score(lines: u32, level: u32) -> u32 {
    let base = LINE_SCORES.get(lines as usize).copied().unwrap_or(0);
    base * level
}

pub fn level_for_lines(lines_cleared: u32) -> u32 {
    lines_cleared / LINES_PER_LEVEL + 1
}

/// Time between automatic one-row falls on `level`.
pub fn fall_interval(level: u32) -> Duration {
    let speed_reduction = u64::from(level.saturating_sub(1)) * SPEED_INCREASE_PER_LEVEL;
    Duration::from_millis(BASE_FALL_MS.saturating_sub(speed_reduction).max(MIN_FALL_MS))
}

// ============================================================================
// Types
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Command {
    MoveLeft,
    MoveRight,
    SoftDrop,
    Rotate,
    HardDrop,
    Pause,
    Quit,
    None,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameState {
    /// Waiting for the first key.
    Ready,
    Running,
    Paused,
    /// Terminal. Nothing changes after this.
    Over,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum GameEvent {
    Started,
    PieceMoved,
    PieceRotated,
    PieceLocked,
    LinesCleared(u32),
    LevelUp(u32),
    Paused,
    Unpaused,
    GameOver,
}

// ============================================================================
// Piece Provider Trait
// ============================================================================

pub trait PieceProvider {
    fn next_piece(&mut self) -> TetrominoType;
}

/// Uniform choice among the seven shapes.
pub struct RandomPieceProvider {
    rng: StdRng,
}

impl RandomPieceProvider {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }
}

impl PieceProvider for RandomPieceProvider {
    fn next_piece(&mut self) -> TetrominoType {
        TetrominoType::random(&mut self.rng)
    }
}

pub struct SequencePieceProvider {
    pieces: Vec<TetrominoType>,
    index: usize,
}

impl SequencePieceProvider {
    pub fn new(pieces: Vec<TetrominoType>) -> Self {
        assert!(!pieces.is_empty(), "piece sequence must not be empty");
        Self { pieces, index: 0 }
    }
}

impl PieceProvider for SequencePieceProvider {
    fn next_piece(&mut self) -> TetrominoType {
        let piece = self.pieces[self.index % self.pieces.len()];
        self.index += 1;
        piece
    }
}

// ============================================================================
// Game
// ============================================================================

pub struct Game {
    board: Board,
    current_piece: Piece,
    score: u32,
    lines_cleared: u32,
    level: u32,
    state: GameState,
    /// Clock reading of the tick being processed.
    now: Duration,
    last_fall: Duration,
    piece_provider: Box<dyn PieceProvider>,
    events: Vec<GameEvent>,
}

impl Game {
    pub fn new(provider: Box<dyn PieceProvider>) -> Self {
        Self::with_dimensions(GRID_WIDTH, GRID_HEIGHT, provider)
    }

    /// Fresh game on an empty board, waiting in `Ready` for the first key.
    pub fn with_dimensions(width: usize, height: usize, mut provider: Box<dyn PieceProvider>) -> Self {
        let board = Board::new(width, height);
        let kind = provider.next_piece();
        let current_piece = Piece::spawn_at(kind, board.spawn_origin(kind));

        let mut game = Self {
            board,
            current_piece,
            score: 0,
            lines_cleared: 0,
            level: 1,
            state: GameState::Ready,
            now: Duration::ZERO,
            last_fall: Duration::ZERO,
            piece_provider: provider,
            events: Vec::new(),
        };
        if !game.board.is_legal(&game.current_piece.cells()) {
            game.end();
        }
        game
    }

    /// Already-running game on a prepared board. Later pieces come from
    /// `provider`.
    pub fn with_board(board: Board, current_piece: Piece, provider: Box<dyn PieceProvider>) -> Self {
        Self {
            board,
            current_piece,
            score: 0,
            lines_cleared: 0,
            level: 1,
            state: GameState::Running,
            now: Duration::ZERO,
            last_fall: Duration::ZERO,
            piece_provider: provider,
            events: Vec::new(),
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_piece(&self) -> &Piece {
        &self.current_piece
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lines_cleared(&self) -> u32 {
        self.lines_cleared
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_game_over(&self) -> bool {
        self.state == GameState::Over
    }

    /// The final score once the game has ended.
    pub fn final_score(&self) -> Option<u32> {
        self.is_game_over().then_some(self.score)
    }

    pub fn fall_interval(&self) -> Duration {
        fall_interval(self.level)
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            board: &self.board,
            piece: &self.current_piece,
            score: self.score,
            level: self.level,
            lines_cleared: self.lines_cleared,
            state: self.state,
        }
    }

    /// Takes and clears all pending events
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // ------------------------------------------------------------------
    // Tick
    // ------------------------------------------------------------------

    /// Advances the game by one tick: applies `command`, then gravity if the
    /// level's fall interval has elapsed since the last fall. `now` must come
    /// from a monotonic clock.
    pub fn tick(&mut self, command: Command, now: Duration) {
        self.now = now;

        match self.state {
            GameState::Over => {}
            GameState::Ready => match command {
                Command::None => {}
                Command::Quit => self.end(),
                // The key that starts the game is not applied.
                _ => {
                    self.state = GameState::Running;
                    self.last_fall = now;
                    self.events.push(GameEvent::Started);
                }
            },
            GameState::Paused => match command {
                Command::Pause => self.toggle_pause(),
                Command::Quit => self.end(),
                _ => {}
            },
            GameState::Running => {
                match command {
                    Command::MoveLeft => {
                        self.move_piece(-1, 0);
                    }
                    Command::MoveRight => {
                        self.move_piece(1, 0);
                    }
                    Command::SoftDrop => self.soft_drop(),
                    Command::Rotate => {
                        self.rotate_piece();
                    }
                    Command::HardDrop => self.hard_drop(),
                    Command::Pause => {
                        self.toggle_pause();
                        return;
                    }
                    Command::Quit => {
                        self.end();
                        return;
                    }
                    Command::None => {}
                }
                self.apply_gravity();
            }
        }
    }

    fn apply_gravity(&mut self) {
        if self.state != GameState::Running {
            return;
        }
        let interval = self.fall_interval();
        if self.now.saturating_sub(self.last_fall) < interval {
            return;
        }
        // Advance by whole intervals so coarse ticks do not slow gravity down.
        // A backlog of more than one fall is dropped rather than replayed.
        self.last_fall += interval;
        if self.now.saturating_sub(self.last_fall) >= interval {
            self.last_fall = self.now;
        }
        if !self.try_commit(self.current_piece.moved(0, 1)) {
            self.land();
        }
    }

    // ------------------------------------------------------------------
    // Player commands
    // ------------------------------------------------------------------

    /// Replaces the current piece with `candidate` if the board allows it.
    fn try_commit(&mut self, candidate: Piece) -> bool {
        if self.board.is_legal(&candidate.cells()) {
            self.current_piece = candidate;
            true
        } else {
            false
        }
    }

    pub fn move_piece(&mut self, dx: i16, dy: i16) -> bool {
        if self.state != GameState::Running {
            return false;
        }
        if self.try_commit(self.current_piece.moved(dx, dy)) {
            self.events.push(GameEvent::PieceMoved);
            true
        } else {
            false
        }
    }

    pub fn rotate_piece(&mut self) -> bool {
        if self.state != GameState::Running {
            return false;
        }
        if self.try_commit(self.current_piece.rotated()) {
            self.events.push(GameEvent::PieceRotated);
            true
        } else {
            false
        }
    }

    pub fn soft_drop(&mut self) {
        if self.state != GameState::Running {
            return;
        }
        if !self.move_piece(0, 1) {
            self.land();
        }
    }

    pub fn hard_drop(&mut self) {
        if self.state != GameState::Running {
            return;
        }
        while self.try_commit(self.current_piece.moved(0, 1)) {}
        self.land();
    }

    pub fn toggle_pause(&mut self) {
        match self.state {
            GameState::Running => {
                self.state = GameState::Paused;
                self.events.push(GameEvent::Paused);
            }
            GameState::Paused => {
                self.state = GameState::Running;
                // Time spent paused does not count towards the next fall.
                self.last_fall = self.now;
                self.events.push(GameEvent::Unpaused);
            }
            GameState::Ready | GameState::Over => {}
        }
    }

    fn end(&mut self) {
        self.state = GameState::Over;
        self.events.push(GameEvent::GameOver);
    }

    // ------------------------------------------------------------------
    // Landing
    // ------------------------------------------------------------------

    fn land(&mut self) {
        let piece = self.current_piece;
        self.board.merge(&piece.cells(), piece.tetromino_type);
        self.events.push(GameEvent::PieceLocked);

        let lines = self.board.clear_full_lines();
        if lines > 0 {
            self.events.push(GameEvent::LinesCleared(lines));
            self.add_score(lines);
        }

        self.spawn_next_piece();
    }

    fn add_score(&mut self, lines: u32) {
        self.score += line_score(lines, self.level);
        self.lines_cleared += lines;

        let new_level = level_for_lines(self.lines_cleared);
        if new_level > self.level {
            self.level = new_level;
            self.events.push(GameEvent::LevelUp(self.level));
        }
    }

    fn spawn_next_piece(&mut self) {
        let next_type = self.piece_provider.next_piece();
        self.current_piece = Piece::spawn_at(next_type, self.board.spawn_origin(next_type));
        self.last_fall = self.now;

        if !self.board.is_legal(&self.current_piece.cells()) {
            self.end();
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new(Box::new(RandomPieceProvider::new(None)))
    }
}

// ============================================================================
// Test Helpers
// ============================================================================

pub mod test_helpers {
    use super::*;
    use crate::board::CellState;

    pub fn empty_board() -> Board {
        Board::default()
    }

    pub fn fill_row(board: &mut Board, y: usize) {
        for x in 0..board.width() {
            board.set(x as i16, y as i16, CellState::Filled(TetrominoType::T));
        }
    }

    pub fn fill_row_with_gap(board: &mut Board, y: usize, gap_x: usize) {
        for x in 0..board.width() {
            if x != gap_x {
                board.set(x as i16, y as i16, CellState::Filled(TetrominoType::T));
            }
        }
    }

    /// Running game on `board` whose following pieces are all `next`.
    pub fn running_game(board: Board, piece: Piece, next: TetrominoType) -> Game {
        Game::with_board(board, piece, Box::new(SequencePieceProvider::new(vec![next])))
    }
}
