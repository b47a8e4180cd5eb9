//! Transform module - move, rotate, ghost projection and hard drop
//!
//! All functions are pure: they take the board and a piece and return a new
//! piece. Rejected transforms hand back the original piece unchanged.

use crate::board::Board;
use crate::pieces::Piece;

/// Outcome of [`try_move`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveResult {
    /// The shifted piece fits.
    Moved(Piece),
    /// Sideways or upward move blocked; the original piece is unchanged.
    Blocked(Piece),
    /// Downward move blocked; the original piece must be locked where it is.
    Lock(Piece),
}

impl MoveResult {
    /// The piece to keep as active when the result is not a lock
    pub fn piece(&self) -> Piece {
        match *self {
            MoveResult::Moved(p) | MoveResult::Blocked(p) | MoveResult::Lock(p) => p,
        }
    }
}

/// Shift `piece` by `(dx, dy)`.
pub fn try_move(board: &Board, piece: &Piece, dx: i8, dy: i8) -> MoveResult {
    if board.is_valid_position(piece, dx, dy) {
        MoveResult::Moved(piece.shifted(dx, dy))
    } else if dy > 0 {
        MoveResult::Lock(*piece)
    } else {
        MoveResult::Blocked(*piece)
    }
}

/// Rotate 90° clockwise around the anchor, or return the piece unchanged
/// when the rotated shape does not fit. There are no wall kicks.
pub fn rotate(board: &Board, piece: &Piece) -> Piece {
    let rotated = piece.rotated();
    if board.is_valid_position(&rotated, 0, 0) {
        rotated
    } else {
        *piece
    }
}

/// Number of rows `piece` can fall before it rests
fn drop_distance(board: &Board, piece: &Piece) -> i8 {
    let mut distance: i8 = 0;
    while distance < i8::MAX && board.is_valid_position(piece, 0, distance + 1) {
        distance += 1;
    }
    distance
}

/// Lowest valid position straight below `piece`. Used only for display.
pub fn ghost(board: &Board, piece: &Piece) -> Piece {
    piece.shifted(0, drop_distance(board, piece))
}

/// Drop `piece` to its ghost position.
///
/// Returns the landed piece and the number of rows fallen. The caller must
/// lock the returned piece; a hard drop never leaves a movable piece.
pub fn hard_drop(board: &Board, piece: &Piece) -> (Piece, u32) {
    let distance = drop_distance(board, piece);
    (piece.shifted(0, distance), distance as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Cell, PieceKind};

    #[test]
    fn test_move_into_open_space() {
        let board = Board::new();
        let piece = Piece::at(PieceKind::T, 4, 5);
        assert_eq!(
            try_move(&board, &piece, 1, 0),
            MoveResult::Moved(Piece::at(PieceKind::T, 5, 5))
        );
    }

    #[test]
    fn test_blocked_sideways_is_not_a_lock() {
        let mut board = Board::new();
        let piece = Piece::at(PieceKind::O, 0, 5);
        assert_eq!(try_move(&board, &piece, -1, 0), MoveResult::Blocked(piece));

        board.set(0, 4, Cell::Filled);
        assert_eq!(try_move(&board, &piece, 0, -1), MoveResult::Blocked(piece));
    }

    #[test]
    fn test_upward_move_above_top_is_unobstructed() {
        let board = Board::new();
        let piece = Piece::at(PieceKind::O, 0, 5);
        assert_eq!(
            try_move(&board, &piece, 0, -10),
            MoveResult::Moved(Piece::at(PieceKind::O, 0, -5))
        );
    }

    #[test]
    fn test_blocked_downward_signals_lock() {
        let board = Board::new();
        let piece = Piece::at(PieceKind::O, 0, 18);
        assert_eq!(try_move(&board, &piece, 0, 1), MoveResult::Lock(piece));
    }

    #[test]
    fn test_rotation_rejected_at_wall() {
        let board = Board::new();
        // Vertical I against the right wall: rotating to horizontal would overflow.
        let vertical = Piece::at(PieceKind::I, 9, 5).rotated();
        assert_eq!(rotate(&board, &vertical), vertical);
    }

    #[test]
    fn test_rotation_accepted_in_open_space() {
        let board = Board::new();
        let piece = Piece::at(PieceKind::L, 4, 5);
        assert_eq!(rotate(&board, &piece), piece.rotated());
    }

    #[test]
    fn test_ghost_rests_on_stack() {
        let board = Board::from_ascii(&[
            "..........",
            "..........",
            "..........",
            "....#.....",
        ]);
        let piece = Piece::at(PieceKind::O, 4, 0);
        assert_eq!(ghost(&board, &piece).y, 1);
    }

    #[test]
    fn test_hard_drop_reports_distance() {
        let board = Board::new();
        let piece = Piece::at(PieceKind::T, 3, 0);
        let (landed, rows) = hard_drop(&board, &piece);
        assert_eq!(landed.y, 18);
        assert_eq!(rows, 18);
    }
}
