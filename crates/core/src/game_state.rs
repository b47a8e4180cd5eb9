//! Game state module - the game loop state machine
//!
//! Ties together the board, piece generator, transforms, scoring and the drop
//! timer. Every mutation goes through [`GameState::tick`] or
//! [`GameState::apply_action`], so a caller that serializes those two calls
//! gets a fully ordered history with no interleaving.

use crate::board::Board;
use crate::pieces::Piece;
use crate::rng::PieceGenerator;
use crate::scoring::ScoreState;
use crate::snapshot::{ActiveSnapshot, GameSnapshot};
use crate::timer::DropTimer;
use crate::transform::{self, MoveResult};
use crate::types::{
    CellView, CoreEvent, GameAction, GeneratorKind, LockKind, Phase, PieceKind, BOARD_HEIGHT,
    BOARD_WIDTH,
};

/// Parameters fixed for the lifetime of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    pub seed: u32,
    pub generator: GeneratorKind,
    pub width: u8,
    pub height: u8,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            generator: GeneratorKind::Bag,
            width: BOARD_WIDTH,
            height: BOARD_HEIGHT,
        }
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    config: GameConfig,
    board: Board,
    active: Option<Piece>,
    generator: PieceGenerator,
    score: ScoreState,
    timer: DropTimer,
    phase: Phase,
    paused: bool,
    /// Monotonic episode id (increments on restart).
    episode_id: u32,
    /// Monotonic id for spawned pieces.
    piece_id: u32,
    events: Vec<CoreEvent>,
}

impl GameState {
    /// Create a new 7-bag game on the canonical board
    pub fn new(seed: u32) -> Self {
        Self::with_config(GameConfig {
            seed,
            ..GameConfig::default()
        })
    }

    pub fn with_config(config: GameConfig) -> Self {
        let board = Board::with_size(config.width, config.height);
        let generator =
            PieceGenerator::with_board_width(config.generator, config.seed, board.width());
        let score = ScoreState::new();
        Self {
            config,
            board,
            active: None,
            generator,
            timer: DropTimer::new(score.drop_interval_ms()),
            score,
            phase: Phase::Spawning,
            paused: false,
            episode_id: 0,
            piece_id: 0,
            events: Vec::new(),
        }
    }

    /// Spawn the first piece. No-op once a piece has entered.
    pub fn start(&mut self) {
        if self.phase == Phase::Spawning {
            self.spawn_piece();
        }
    }

    /// Draw the next piece and place it at the spawn anchor.
    ///
    /// Returns false, and ends the game, when the spawn position is blocked.
    pub fn spawn_piece(&mut self) -> bool {
        if self.phase == Phase::GameOver {
            return false;
        }
        self.phase = Phase::Spawning;

        let piece = self.generator.next();
        if !self.board.is_valid_position(&piece, 0, 0) {
            self.active = None;
            self.enter_game_over();
            return false;
        }

        self.active = Some(piece);
        self.phase = Phase::Active;
        self.piece_id = self.piece_id.wrapping_add(1);
        self.timer.reset();
        self.events.push(CoreEvent::Spawned { kind: piece.kind });
        true
    }

    /// Advance the descent timer by `elapsed_ms`.
    ///
    /// Each full drop interval moves the active piece down one row, locking it
    /// when blocked. Ignored while paused or after game over. Returns true if
    /// anything changed.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        if self.paused || self.phase == Phase::GameOver {
            return false;
        }

        let mut changed = false;
        if self.active.is_none() {
            changed = self.spawn_piece() || self.phase == Phase::GameOver;
            if self.active.is_none() {
                return changed;
            }
        }

        self.timer.advance(elapsed_ms);
        while self.timer.fire() {
            changed = true;
            self.step_down();
            if self.phase == Phase::GameOver {
                break;
            }
        }
        changed
    }

    /// Apply a game action. Returns true if it was accepted.
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        match action {
            GameAction::Restart => {
                self.restart();
                return true;
            }
            _ if self.phase == Phase::GameOver => return false,
            GameAction::TogglePause => {
                self.paused = !self.paused;
                self.events.push(CoreEvent::PauseChanged {
                    paused: self.paused,
                });
                return true;
            }
            _ => {}
        }
        if self.paused && action.is_piece_control() {
            return false;
        }

        if self.active.is_none() && !self.spawn_piece() {
            return false;
        }
        let Some(piece) = self.active else {
            return false;
        };

        match action {
            GameAction::MoveLeft => self.shift(&piece, -1),
            GameAction::MoveRight => self.shift(&piece, 1),
            GameAction::SoftDrop => {
                match transform::try_move(&self.board, &piece, 0, 1) {
                    MoveResult::Moved(moved) => self.active = Some(moved),
                    MoveResult::Lock(landed) => self.lock_active(landed, LockKind::Gravity),
                    MoveResult::Blocked(_) => return false,
                }
                true
            }
            GameAction::Rotate => {
                let rotated = transform::rotate(&self.board, &piece);
                if rotated == piece {
                    return false;
                }
                self.active = Some(rotated);
                true
            }
            GameAction::HardDrop => {
                let (landed, rows_dropped) = transform::hard_drop(&self.board, &piece);
                self.lock_active(landed, LockKind::HardDrop { rows_dropped });
                true
            }
            GameAction::TogglePause | GameAction::Restart => false,
        }
    }

    fn shift(&mut self, piece: &Piece, dx: i8) -> bool {
        match transform::try_move(&self.board, piece, dx, 0) {
            MoveResult::Moved(moved) => {
                self.active = Some(moved);
                true
            }
            MoveResult::Blocked(_) | MoveResult::Lock(_) => false,
        }
    }

    /// One timer-driven descent
    fn step_down(&mut self) {
        let Some(piece) = self.active else {
            return;
        };
        match transform::try_move(&self.board, &piece, 0, 1) {
            MoveResult::Moved(moved) => self.active = Some(moved),
            MoveResult::Lock(landed) => self.lock_active(landed, LockKind::Gravity),
            MoveResult::Blocked(_) => {}
        }
    }

    /// Lock sequence: place, clear, score, then spawn or top out
    fn lock_active(&mut self, piece: Piece, lock: LockKind) {
        self.phase = Phase::Locking;
        self.active = None;

        let clipped = self.board.lock(&piece);
        let cleared = self.board.clear_full_rows() as u32;
        let result = self.score.apply_lock(cleared, lock);
        self.timer.set_interval(self.score.drop_interval_ms());

        self.events.push(CoreEvent::Locked {
            kind: piece.kind,
            lock,
        });
        if cleared > 0 {
            self.events.push(CoreEvent::LinesCleared {
                count: cleared,
                points: result.total,
            });
        }

        // Locking with cells still above the field is a top-out.
        if clipped > 0 {
            self.enter_game_over();
        } else {
            self.spawn_piece();
        }
    }

    fn enter_game_over(&mut self) {
        if self.phase == Phase::GameOver {
            return;
        }
        self.phase = Phase::GameOver;
        self.timer.reset();
        self.events.push(CoreEvent::GameOver {
            points: self.score.points,
            lines: self.score.lines,
            level: self.score.level,
        });
    }

    /// Reset board, score and bag, then spawn the first piece of the new game.
    ///
    /// The RNG continues from its current state, so consecutive games differ.
    /// Events not yet drained are kept.
    pub fn restart(&mut self) {
        let seed = self.generator.seed();
        let next_episode = self.episode_id.wrapping_add(1);
        let pending = std::mem::take(&mut self.events);
        let config = self.config;

        *self = Self::with_config(GameConfig { seed, ..config });
        self.config = config;
        self.episode_id = next_episode;
        self.events = pending;
        self.events.push(CoreEvent::Restarted);
        self.start();
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn active(&self) -> Option<Piece> {
        self.active
    }

    /// Landing position of the active piece
    pub fn ghost(&self) -> Option<Piece> {
        self.active
            .map(|piece| transform::ghost(&self.board, &piece))
    }

    pub fn points(&self) -> u32 {
        self.score.points
    }

    pub fn lines(&self) -> u32 {
        self.score.lines
    }

    pub fn level(&self) -> u32 {
        self.score.level
    }

    pub fn score(&self) -> &ScoreState {
        &self.score
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    pub fn drop_interval_ms(&self) -> u32 {
        self.timer.interval_ms()
    }

    /// Time accumulated toward the next descent
    pub fn drop_elapsed_ms(&self) -> u32 {
        self.timer.elapsed_ms()
    }

    /// Kind the next spawn will use
    pub fn next_kind(&self) -> PieceKind {
        self.generator.peek()
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn piece_id(&self) -> u32 {
        self.piece_id
    }

    /// Drain recorded notifications, oldest first.
    pub fn take_events(&mut self) -> Vec<CoreEvent> {
        std::mem::take(&mut self.events)
    }

    /// Swap in a prepared board, e.g. for scenarios and tools.
    pub fn replace_board(&mut self, board: Board) {
        self.board = board;
    }

    /// Replace the active piece. Rejected if the piece does not fit.
    pub fn replace_active(&mut self, piece: Piece) -> bool {
        if self.phase == Phase::GameOver || !self.board.is_valid_position(&piece, 0, 0) {
            return false;
        }
        self.active = Some(piece);
        self.phase = Phase::Active;
        true
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        out.width = self.board.width();
        out.height = self.board.height();
        out.cells.clear();
        out.cells.extend(self.board.cells().iter().map(|cell| {
            if cell.is_filled() {
                CellView::Locked
            } else {
                CellView::Empty
            }
        }));

        let ghost = self.ghost();
        if let Some(ghost) = ghost {
            self.paint(&ghost, CellView::Ghost, &mut out.cells);
        }
        if let Some(active) = self.active {
            self.paint(&active, CellView::Active, &mut out.cells);
        }

        out.active = self.active.map(ActiveSnapshot::from);
        out.ghost_y = ghost.map(|g| g.y);
        out.next = if self.game_over() {
            None
        } else {
            Some(self.next_kind())
        };
        out.score = self.score.points;
        out.level = self.score.level;
        out.lines = self.score.lines;
        out.phase = self.phase;
        out.paused = self.paused;
        out.episode_id = self.episode_id;
        out.piece_id = self.piece_id;
        out.drop_interval_ms = self.timer.interval_ms();
    }

    /// Tag the on-board cells of `piece`, leaving locked cells alone
    fn paint(&self, piece: &Piece, view: CellView, cells: &mut [CellView]) {
        let width = self.board.width() as usize;
        for (x, y) in piece.cells() {
            if self.board.get(x, y).is_none() {
                continue;
            }
            let idx = y as usize * width + x as usize;
            if cells[idx] != CellView::Locked {
                cells[idx] = view;
            }
        }
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Cell;

    #[test]
    fn test_new_game_state() {
        let state = GameState::new(12345);

        assert_eq!(state.phase(), Phase::Spawning);
        assert!(!state.paused());
        assert_eq!(state.points(), 0);
        assert_eq!(state.level(), 1);
        assert_eq!(state.lines(), 0);
        assert_eq!(state.episode_id(), 0);
        assert!(state.active().is_none());
        assert_eq!(state.drop_interval_ms(), 1000);
    }

    #[test]
    fn test_start_spawns_piece() {
        let mut state = GameState::new(12345);
        state.start();
        assert_eq!(state.phase(), Phase::Active);
        assert_eq!(state.piece_id(), 1);
        assert!(state.active().is_some());
        assert_eq!(
            state.take_events(),
            vec![CoreEvent::Spawned {
                kind: state.active().unwrap().kind
            }]
        );
    }

    #[test]
    fn test_first_tick_spawns() {
        let mut state = GameState::new(7);
        assert!(state.tick(16));
        assert_eq!(state.phase(), Phase::Active);
    }

    #[test]
    fn test_next_kind_matches_following_spawn() {
        let mut state = GameState::new(12345);
        state.start();
        let next = state.next_kind();
        state.apply_action(GameAction::HardDrop);
        assert_eq!(state.active().unwrap().kind, next);
    }

    #[test]
    fn test_tick_descends_one_row_per_interval() {
        let mut state = GameState::new(12345);
        state.start();
        let y = state.active().unwrap().y;

        assert!(!state.tick(999));
        assert_eq!(state.active().unwrap().y, y);
        assert!(state.tick(1));
        assert_eq!(state.active().unwrap().y, y + 1);
    }

    #[test]
    fn test_pause_freezes_timer_without_resetting_phase() {
        let mut state = GameState::new(12345);
        state.start();
        state.tick(600);
        assert!(state.apply_action(GameAction::TogglePause));
        assert!(!state.tick(5000));
        assert_eq!(state.drop_elapsed_ms(), 600);
        assert!(!state.apply_action(GameAction::MoveLeft));
        assert!(!state.apply_action(GameAction::HardDrop));

        assert!(state.apply_action(GameAction::TogglePause));
        let y = state.active().unwrap().y;
        state.tick(400);
        assert_eq!(state.active().unwrap().y, y + 1);
    }

    #[test]
    fn test_soft_drop_locks_when_blocked() {
        let mut state = GameState::new(12345);
        state.start();
        let piece = Piece::at(PieceKind::O, 0, 18);
        assert!(state.replace_active(piece));
        state.take_events();

        assert!(state.apply_action(GameAction::SoftDrop));
        assert!(state.board().is_filled(0, 19));
        assert_eq!(state.points(), 10);
        let events = state.take_events();
        assert_eq!(
            events[0],
            CoreEvent::Locked {
                kind: PieceKind::O,
                lock: LockKind::Gravity
            }
        );
    }

    #[test]
    fn test_rotation_rejection_reports_false() {
        let mut state = GameState::new(12345);
        state.start();
        // O rotates onto itself, which counts as no change.
        assert!(state.replace_active(Piece::at(PieceKind::O, 4, 5)));
        assert!(!state.apply_action(GameAction::Rotate));
        assert!(state.replace_active(Piece::at(PieceKind::T, 4, 5)));
        assert!(state.apply_action(GameAction::Rotate));
    }

    #[test]
    fn test_lock_above_top_ends_game() {
        let mut state = GameState::new(12345);
        state.start();
        // Column 4 stacked to the top row; a vertical I resting on it pokes above.
        let mut board = Board::new();
        for y in 0..20 {
            board.set(4, y, Cell::Filled);
        }
        state.replace_board(board);
        let vertical_i = Piece::at(PieceKind::I, 4, -4).rotated();
        state.active = Some(vertical_i);
        state.take_events();

        assert!(state.apply_action(GameAction::SoftDrop));
        assert!(state.game_over());
        let over = state
            .take_events()
            .into_iter()
            .filter(|e| matches!(e, CoreEvent::GameOver { .. }))
            .count();
        assert_eq!(over, 1);
    }

    #[test]
    fn test_game_over_ignores_everything_but_restart() {
        let mut state = GameState::new(3);
        state.start();
        while !state.game_over() {
            state.apply_action(GameAction::HardDrop);
        }
        let points = state.points();
        assert!(!state.apply_action(GameAction::MoveLeft));
        assert!(!state.apply_action(GameAction::TogglePause));
        assert!(!state.tick(10_000));
        assert_eq!(state.points(), points);

        assert!(state.apply_action(GameAction::Restart));
        assert_eq!(state.phase(), Phase::Active);
        assert_eq!(state.points(), 0);
        assert_eq!(state.episode_id(), 1);
        assert_eq!(state.board().filled_count(), 0);
    }

    #[test]
    fn test_game_over_emitted_once() {
        let mut state = GameState::new(9);
        state.start();
        for _ in 0..200 {
            state.apply_action(GameAction::HardDrop);
            state.tick(1000);
        }
        let over = state
            .take_events()
            .into_iter()
            .filter(|e| matches!(e, CoreEvent::GameOver { .. }))
            .count();
        assert_eq!(over, 1);
    }

    #[test]
    fn test_snapshot_tags_cells() {
        let mut state = GameState::new(12345);
        state.start();
        assert!(state.replace_active(Piece::at(PieceKind::O, 0, 2)));
        let snap = state.snapshot();

        assert_eq!(snap.cell(0, 2), CellView::Active);
        assert_eq!(snap.cell(1, 3), CellView::Active);
        assert_eq!(snap.cell(0, 18), CellView::Ghost);
        assert_eq!(snap.cell(1, 19), CellView::Ghost);
        assert_eq!(snap.cell(5, 10), CellView::Empty);
        assert_eq!(snap.ghost_y, Some(18));
        assert_eq!(snap.cells.len(), 200);
        assert!(snap.next.is_some());
    }
}
