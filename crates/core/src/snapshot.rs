use crate::pieces::{Piece, Shape};
use crate::types::{CellView, PieceKind, Phase, BOARD_HEIGHT, BOARD_WIDTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActiveSnapshot {
    pub kind: PieceKind,
    pub x: i8,
    pub y: i8,
    pub shape: Shape,
}

impl From<Piece> for ActiveSnapshot {
    fn from(value: Piece) -> Self {
        Self {
            kind: value.kind,
            x: value.x,
            y: value.y,
            shape: value.shape,
        }
    }
}

/// Read-only view of a game for presentation
///
/// `cells` is row-major and tagged per [`CellView`]: active piece cells win
/// over ghost cells, and neither ever covers a locked cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GameSnapshot {
    pub width: u8,
    pub height: u8,
    pub cells: Vec<CellView>,
    pub active: Option<ActiveSnapshot>,
    pub ghost_y: Option<i8>,
    pub next: Option<PieceKind>,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    pub phase: Phase,
    pub paused: bool,
    pub episode_id: u32,
    pub piece_id: u32,
    pub drop_interval_ms: u32,
}

impl GameSnapshot {
    pub fn cell(&self, x: usize, y: usize) -> CellView {
        if x >= self.width as usize || y >= self.height as usize {
            return CellView::Empty;
        }
        self.cells[y * self.width as usize + x]
    }

    pub fn game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    pub fn clear(&mut self) {
        self.cells.clear();
        self.cells
            .resize(self.width as usize * self.height as usize, CellView::Empty);
        self.active = None;
        self.ghost_y = None;
        self.next = None;
        self.score = 0;
        self.level = 1;
        self.lines = 0;
        self.phase = Phase::Spawning;
        self.paused = false;
        self.episode_id = 0;
        self.piece_id = 0;
        self.drop_interval_ms = 0;
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        let mut s = Self {
            width: BOARD_WIDTH,
            height: BOARD_HEIGHT,
            cells: Vec::new(),
            active: None,
            ghost_y: None,
            next: None,
            score: 0,
            level: 1,
            lines: 0,
            phase: Phase::Spawning,
            paused: false,
            episode_id: 0,
            piece_id: 0,
            drop_interval_ms: 0,
        };
        s.clear();
        s
    }
}
