//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the application.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (core logic, terminal rendering, leaderboard protocol).
//!
//! # Board Dimensions
//!
//! Canonical playfield dimensions:
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 20 rows (indexed 0-19)
//! - **Spawn row**: -1, so two-row pieces enter with their top row hidden
//!
//! # Timing and Scoring Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Frontend frame interval (~60 FPS) |
//! | `BASE_DROP_MS` | 1000 | Automatic descent period at level 1 |
//! | `DROP_STEP_MS` | 100 | Speed-up per level |
//! | `DROP_INTERVAL_MIN_MS` | 50 | Descent period floor |
//! | `LINES_PER_LEVEL` | 10 | Lines needed per level |
//! | `LINE_CLEAR_POINTS` | 100 | Points per cleared row, times level |
//! | `LOCK_BONUS` | 10 | Flat bonus for a gravity or soft-drop lock |
//! | `HARD_DROP_POINTS_PER_ROW` | 2 | Hard drop bonus per row fallen |
//!
//! # Examples
//!
//! ```
//! use tetris_ladder_types::{GameAction, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! let piece = PieceKind::T;
//! let parsed = PieceKind::from_str("t").unwrap();
//! assert_eq!(piece, parsed);
//!
//! let action = GameAction::from_str("hard-drop").unwrap();
//! assert_eq!(action, GameAction::HardDrop);
//!
//! assert_eq!(BOARD_WIDTH, 10);
//! assert_eq!(BOARD_HEIGHT, 20);
//! ```

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Board height in cells (20 rows)
pub const BOARD_HEIGHT: u8 = 20;

/// Row at which new pieces are anchored. Negative rows are above the visible field.
pub const SPAWN_ROW: i8 = -1;

/// Frontend frame interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Automatic descent period at level 1
pub const BASE_DROP_MS: u32 = 1000;

/// Descent period reduction per level
pub const DROP_STEP_MS: u32 = 100;

/// Descent period floor
pub const DROP_INTERVAL_MIN_MS: u32 = 50;

/// Cleared lines needed to advance one level
pub const LINES_PER_LEVEL: u32 = 10;

/// Points per cleared row, multiplied by the level reached with that clear
pub const LINE_CLEAR_POINTS: u32 = 100;

/// Flat bonus for any lock caused by gravity or a soft drop
pub const LOCK_BONUS: u32 = 10;

/// Bonus per row fallen during a hard drop
pub const HARD_DROP_POINTS_PER_ROW: u32 = 2;

/// Maximum number of entries in a leaderboard listing
pub const LEADERBOARD_TOP_N: usize = 10;

/// The seven tetromino piece kinds
///
/// Each piece has a distinct shape and display color:
/// - **I**: Sky blue, horizontal bar
/// - **O**: Amber, 2x2 square
/// - **T**: Violet, T-shaped
/// - **S**: Lime, S-shaped
/// - **Z**: Pink, Z-shaped (mirror of S)
/// - **J**: Deep blue, J-shaped
/// - **L**: Orange, L-shaped (mirror of J)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    /// All kinds in canonical order (the order a fresh bag starts from before shuffling).
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Parse piece kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use tetris_ladder_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("O"), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "o" => Some(PieceKind::O),
            "t" => Some(PieceKind::T),
            "s" => Some(PieceKind::S),
            "z" => Some(PieceKind::Z),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "i",
            PieceKind::O => "o",
            PieceKind::T => "t",
            PieceKind::S => "s",
            PieceKind::Z => "z",
            PieceKind::J => "j",
            PieceKind::L => "l",
        }
    }

    /// Display color as `(r, g, b)`.
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            PieceKind::I => (56, 189, 248),
            PieceKind::O => (253, 230, 138),
            PieceKind::T => (167, 139, 250),
            PieceKind::S => (190, 242, 100),
            PieceKind::Z => (244, 114, 182),
            PieceKind::J => (30, 64, 175),
            PieceKind::L => (253, 186, 116),
        }
    }
}

/// A cell of the locked board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    Filled,
}

impl Cell {
    pub fn is_filled(self) -> bool {
        matches!(self, Cell::Filled)
    }
}

/// A cell as seen by the presentation layer.
///
/// Active piece cells take precedence over ghost cells, which take precedence
/// over empty cells. Locked cells are never covered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CellView {
    #[default]
    Empty,
    Locked,
    Active,
    Ghost,
}

/// Game actions that can be applied to modify game state
///
/// These are decoupled from physical keys; the input layer maps any number of
/// keys onto each action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameAction {
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Move piece one row down; locks the piece when blocked
    SoftDrop,
    /// Rotate piece 90° clockwise (no wall kicks)
    Rotate,
    /// Drop piece to the lowest valid row and lock it
    HardDrop,
    /// Toggle pause state
    TogglePause,
    /// Restart the game (accepted in every phase)
    Restart,
}

impl GameAction {
    pub const ALL: [GameAction; 7] = [
        GameAction::MoveLeft,
        GameAction::MoveRight,
        GameAction::SoftDrop,
        GameAction::Rotate,
        GameAction::HardDrop,
        GameAction::TogglePause,
        GameAction::Restart,
    ];

    /// Parse action from its kebab-case name.
    ///
    /// Case is ignored and `-`/`_` separators are optional, so `move-left`,
    /// `moveLeft` and `MOVE_LEFT` all parse.
    ///
    /// # Examples
    ///
    /// ```
    /// use tetris_ladder_types::GameAction;
    ///
    /// assert_eq!(GameAction::from_str("move-left"), Some(GameAction::MoveLeft));
    /// assert_eq!(GameAction::from_str("rotate"), Some(GameAction::Rotate));
    /// assert_eq!(GameAction::from_str("toggle-pause"), Some(GameAction::TogglePause));
    /// assert_eq!(GameAction::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .flat_map(char::to_lowercase)
            .collect();
        match normalized.as_str() {
            "moveleft" => Some(GameAction::MoveLeft),
            "moveright" => Some(GameAction::MoveRight),
            "softdrop" => Some(GameAction::SoftDrop),
            "rotate" => Some(GameAction::Rotate),
            "harddrop" => Some(GameAction::HardDrop),
            "togglepause" | "pause" => Some(GameAction::TogglePause),
            "restart" => Some(GameAction::Restart),
            _ => None,
        }
    }

    /// Kebab-case action name
    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::MoveLeft => "move-left",
            GameAction::MoveRight => "move-right",
            GameAction::SoftDrop => "soft-drop",
            GameAction::Rotate => "rotate",
            GameAction::HardDrop => "hard-drop",
            GameAction::TogglePause => "toggle-pause",
            GameAction::Restart => "restart",
        }
    }

    /// Actions that move or lock the active piece. These are ignored while paused.
    pub fn is_piece_control(&self) -> bool {
        !matches!(self, GameAction::TogglePause | GameAction::Restart)
    }
}

/// Lifecycle phase of the game loop.
///
/// `Spawning` and `Locking` are transient inside one serialized step; an
/// observer between steps only sees `Spawning` before the first piece enters,
/// then `Active` or `GameOver`. Pause is an orthogonal flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    #[default]
    Spawning,
    Active,
    Locking,
    GameOver,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Spawning => "spawning",
            Phase::Active => "active",
            Phase::Locking => "locking",
            Phase::GameOver => "game_over",
        }
    }
}

/// Piece supply strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GeneratorKind {
    /// Every run of 7 spawns contains each kind exactly once.
    #[default]
    Bag,
    /// Independent uniform draw per spawn.
    Uniform,
}

impl GeneratorKind {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "bag" | "7bag" | "7-bag" => Some(GeneratorKind::Bag),
            "uniform" | "random" => Some(GeneratorKind::Uniform),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GeneratorKind::Bag => "bag",
            GeneratorKind::Uniform => "uniform",
        }
    }
}

/// How a piece came to lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LockKind {
    /// Timer descent or soft drop found the cell below blocked.
    Gravity,
    /// Hard drop, with the number of rows fallen.
    HardDrop { rows_dropped: u32 },
}

/// Core-side notification emitted by the game state machine.
///
/// Presentation concerns (sound, flashes) subscribe to these instead of being
/// embedded in game logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreEvent {
    /// A new active piece entered the board.
    Spawned { kind: PieceKind },
    /// The active piece became part of the board.
    Locked { kind: PieceKind, lock: LockKind },
    /// One lock removed `count` rows and awarded `points` in total.
    LinesCleared { count: u32, points: u32 },
    /// Pause flag flipped.
    PauseChanged { paused: bool },
    /// Terminal state reached. Emitted exactly once per game.
    GameOver { points: u32, lines: u32, level: u32 },
    /// Board, score and bag reset.
    Restarted,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_rule_constants() {
        assert_eq!(BOARD_WIDTH, 10);
        assert_eq!(BOARD_HEIGHT, 20);
        assert_eq!(SPAWN_ROW, -1);
        assert_eq!(BASE_DROP_MS, 1000);
        assert_eq!(DROP_STEP_MS, 100);
        assert_eq!(DROP_INTERVAL_MIN_MS, 50);
        assert_eq!(LINES_PER_LEVEL, 10);
        assert_eq!(LINE_CLEAR_POINTS, 100);
        assert_eq!(LOCK_BONUS, 10);
        assert_eq!(HARD_DROP_POINTS_PER_ROW, 2);
    }

    #[test]
    fn action_names_round_trip() {
        for action in GameAction::ALL {
            assert_eq!(GameAction::from_str(action.as_str()), Some(action));
        }
        assert_eq!(GameAction::from_str("softDrop"), Some(GameAction::SoftDrop));
        assert_eq!(GameAction::from_str("PAUSE"), Some(GameAction::TogglePause));
        assert_eq!(GameAction::from_str("hold"), None);
    }

    #[test]
    fn generator_kind_parsing() {
        assert_eq!(GeneratorKind::from_str("bag"), Some(GeneratorKind::Bag));
        assert_eq!(GeneratorKind::from_str("7-bag"), Some(GeneratorKind::Bag));
        assert_eq!(GeneratorKind::from_str("Uniform"), Some(GeneratorKind::Uniform));
        assert_eq!(GeneratorKind::from_str("srs"), None);
    }

    #[test]
    fn pause_and_restart_are_not_piece_control() {
        assert!(!GameAction::TogglePause.is_piece_control());
        assert!(!GameAction::Restart.is_piece_control());
        assert!(GameAction::MoveLeft.is_piece_control());
        assert!(GameAction::HardDrop.is_piece_control());
    }
}
