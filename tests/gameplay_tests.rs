//! Gameplay scenarios driven through the public `GameState` API

use tetris_ladder::core::{hard_drop, Board, GameConfig, GameState, Piece};
use tetris_ladder::types::{
    Cell, CoreEvent, GameAction, GeneratorKind, PieceKind, Phase, BOARD_HEIGHT,
};

fn started(seed: u32) -> GameState {
    let mut state = GameState::new(seed);
    state.start();
    state.take_events();
    state
}

#[test]
fn test_game_lifecycle() {
    let mut state = GameState::new(12345);
    assert_eq!(state.phase(), Phase::Spawning);

    state.start();
    assert_eq!(state.phase(), Phase::Active);
    assert!(state.active().is_some());
    assert!(!state.game_over());
    assert!(!state.paused());
}

#[test]
fn test_hard_drop_lands_at_floor_for_every_kind() {
    let board = Board::new();
    for kind in PieceKind::ALL {
        let piece = Piece::at(kind, 3, 0);
        let (landed, rows) = hard_drop(&board, &piece);
        let expected = (BOARD_HEIGHT - piece.height()) as i8;
        assert_eq!(landed.y, expected, "{:?}", kind);
        assert_eq!(rows, expected as u32, "{:?}", kind);
    }
}

#[test]
fn test_horizontal_i_hard_drop_scores_distance_only() {
    let mut state = started(1);
    assert!(state.replace_active(Piece::spawn(PieceKind::I, 10)));
    assert_eq!(state.active().unwrap().x, 3);

    assert!(state.apply_action(GameAction::HardDrop));

    let board = state.board();
    for x in 3..7 {
        assert!(board.is_filled(x, 19), "column {}", x);
    }
    assert_eq!(board.filled_count(), 4);
    assert_eq!(state.lines(), 0);
    // From the spawn row -1 down to row 19.
    assert_eq!(state.points(), 40);
}

#[test]
fn test_o_piece_completes_bottom_row() {
    let mut state = started(1);
    let mut board = Board::new();
    for x in 2..10 {
        board.set(x, 19, Cell::Filled);
    }
    state.replace_board(board);
    assert!(state.replace_active(Piece::at(PieceKind::O, 0, 0)));

    assert!(state.apply_action(GameAction::HardDrop));

    assert_eq!(state.lines(), 1);
    assert_eq!(state.level(), 1);
    // One line at level 1 plus 18 rows of hard drop.
    assert_eq!(state.points(), 100 + 18 * 2);
    // The upper half of the O survives and drops into the cleared row.
    assert!(state.board().is_filled(0, 19));
    assert!(state.board().is_filled(1, 19));
    assert_eq!(state.board().filled_count(), 2);

    let events = state.take_events();
    assert!(events.contains(&CoreEvent::LinesCleared {
        count: 1,
        points: 136
    }));
}

#[test]
fn test_soft_drop_lock_with_clear_adds_lock_bonus() {
    let mut state = started(1);
    let mut board = Board::new();
    for x in 2..10 {
        board.set(x, 19, Cell::Filled);
    }
    state.replace_board(board);
    assert!(state.replace_active(Piece::at(PieceKind::O, 0, 18)));

    assert!(state.apply_action(GameAction::SoftDrop));
    assert_eq!(state.lines(), 1);
    assert_eq!(state.points(), 110);
}

#[test]
fn test_left_wall_stops_movement() {
    let mut state = started(42);
    let mut rejected = 0;
    for _ in 0..20 {
        if !state.apply_action(GameAction::MoveLeft) {
            rejected += 1;
        }
        assert!(state.active().unwrap().x >= 0);
    }
    assert_eq!(state.active().unwrap().x, 0);
    assert!(rejected > 0);

    let y = state.active().unwrap().y;
    assert!(!state.apply_action(GameAction::MoveLeft));
    assert_eq!(state.active().unwrap().x, 0);
    assert_eq!(state.active().unwrap().y, y);
}

#[test]
fn test_right_wall_stops_movement() {
    let mut state = started(42);
    for _ in 0..20 {
        state.apply_action(GameAction::MoveRight);
    }
    let piece = state.active().unwrap();
    assert_eq!(piece.x + piece.width() as i8, 10);
}

#[test]
fn test_blocked_spawn_zone_tops_out() {
    let mut state = GameState::new(8);
    let mut board = Board::new();
    for x in 2..9 {
        board.set(x, 0, Cell::Filled);
    }
    state.replace_board(board);

    state.start();
    state.tick(1000);
    state.tick(1000);

    assert!(state.game_over());
    assert!(state.active().is_none());
    let over = state
        .take_events()
        .into_iter()
        .filter(|e| matches!(e, CoreEvent::GameOver { .. }))
        .count();
    assert_eq!(over, 1);
}

#[test]
fn test_pause_blocks_gravity_and_input() {
    let mut state = started(12345);
    let before = state.active().unwrap();

    assert!(state.apply_action(GameAction::TogglePause));
    assert!(state.paused());
    state.tick(10_000);
    assert!(!state.apply_action(GameAction::MoveRight));
    assert!(!state.apply_action(GameAction::Rotate));
    assert_eq!(state.active().unwrap(), before);
    assert!(state.snapshot().paused);

    assert!(state.apply_action(GameAction::TogglePause));
    assert!(state.apply_action(GameAction::SoftDrop));
    assert_eq!(state.active().unwrap().y, before.y + 1);
}

#[test]
fn test_restart_is_accepted_while_paused() {
    let mut state = started(12345);
    assert!(state.apply_action(GameAction::TogglePause));
    assert!(!state.apply_action(GameAction::HardDrop));

    assert!(state.apply_action(GameAction::Restart));
    assert!(!state.paused());
    assert!(state.apply_action(GameAction::MoveLeft));
}

#[test]
fn test_score_and_lines_never_decrease() {
    let mut state = started(99);
    let actions = [
        GameAction::MoveLeft,
        GameAction::Rotate,
        GameAction::MoveRight,
        GameAction::SoftDrop,
        GameAction::MoveLeft,
        GameAction::MoveLeft,
        GameAction::HardDrop,
    ];

    let mut last = (0, 0, 1);
    for step in 0..2000 {
        if state.game_over() {
            break;
        }
        state.apply_action(actions[step % actions.len()]);
        state.tick(16);
        let now = (state.points(), state.lines(), state.level());
        assert!(now.0 >= last.0 && now.1 >= last.1 && now.2 >= last.2);
        assert_eq!(now.2, now.1 / 10 + 1);
        last = now;
    }
}

#[test]
fn test_first_seven_spawns_form_a_bag() {
    let mut state = GameState::with_config(GameConfig {
        seed: 31,
        generator: GeneratorKind::Bag,
        ..GameConfig::default()
    });
    state.start();
    for _ in 0..6 {
        state.apply_action(GameAction::HardDrop);
    }

    let mut kinds: Vec<PieceKind> = state
        .take_events()
        .into_iter()
        .filter_map(|e| match e {
            CoreEvent::Spawned { kind } => Some(kind),
            _ => None,
        })
        .collect();
    assert_eq!(kinds.len(), 7);
    kinds.sort_by_key(|k| k.as_str());
    kinds.dedup();
    assert_eq!(kinds.len(), 7);
}

#[test]
fn test_restart_resets_and_bumps_episode() {
    let mut state = started(5);
    state.apply_action(GameAction::HardDrop);
    assert!(state.points() > 0);

    assert!(state.apply_action(GameAction::Restart));
    assert_eq!(state.points(), 0);
    assert_eq!(state.lines(), 0);
    assert_eq!(state.episode_id(), 1);
    assert_eq!(state.board().filled_count(), 0);
    assert_eq!(state.phase(), Phase::Active);
    assert!(state.take_events().contains(&CoreEvent::Restarted));
}

#[test]
fn test_same_seed_replays_identically() {
    let script = [
        GameAction::Rotate,
        GameAction::MoveLeft,
        GameAction::HardDrop,
        GameAction::MoveRight,
        GameAction::MoveRight,
        GameAction::HardDrop,
        GameAction::SoftDrop,
        GameAction::HardDrop,
    ];
    let play = || {
        let mut state = started(2718);
        for action in script {
            state.apply_action(action);
            state.tick(250);
        }
        state
    };

    let a = play();
    let b = play();
    assert_eq!(a.board(), b.board());
    assert_eq!(a.points(), b.points());
    assert_eq!(a.active(), b.active());
}

#[test]
fn test_vertical_i_clears_four_rows() {
    let mut state = started(1);
    let mut board = Board::new();
    for y in 16..20 {
        for x in 1..10 {
            board.set(x, y, Cell::Filled);
        }
    }
    board.set(4, 15, Cell::Filled);
    state.replace_board(board);
    assert!(state.replace_active(Piece::at(PieceKind::I, 0, 0).rotated()));

    assert!(state.apply_action(GameAction::HardDrop));

    assert_eq!(state.lines(), 4);
    assert_eq!(state.level(), 1);
    // 4 lines at level 1 plus 16 rows of hard drop.
    assert_eq!(state.points(), 4 * 100 + 16 * 2);
    assert_eq!(state.board().filled_count(), 1);
    assert!(state.board().is_filled(4, 19));
}
