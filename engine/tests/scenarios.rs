//! End-to-end decision scenarios against hand-built boards.

use rand::rngs::StdRng;
use rand::SeedableRng;

use frontline::board::{Board, Move, TileKind};
use frontline::config::EngineConfig;
use frontline::explore::ExplorationTracker;
use frontline::movegen::{
    leave_swamp, move_path, move_priority, path_proximity_target, select_move, Strategy,
    TickContext,
};
use frontline::protocol::apply_diff;
use frontline::search::get_best_swamp_path;

const ME: TileKind = TileKind::Owned(0);
const THEM: TileKind = TileKind::Owned(1);

fn select(board: &Board, seed: u64) -> Option<frontline::movegen::Decision> {
    let mut tracker = ExplorationTracker::new();
    let config = EngineConfig::default();
    let mut rng = StdRng::seed_from_u64(seed);
    let mut ctx = TickContext {
        board,
        tracker: &mut tracker,
        config: &config,
        rng: &mut rng,
    };
    select_move(&mut ctx)
}

#[test]
fn adjacent_weaker_enemy_is_attacked_along_path() {
    let mut board = Board::new(3, 3, 0);
    board.turn = 1;
    let me = board.id_at(1, 1).unwrap();
    let enemy = board.id_at(1, 2).unwrap();
    board.update_tile(me, ME, 5, false, false, false);
    board.update_tile(enemy, THEM, 3, false, false, false);

    assert_eq!(move_priority(&board), None);

    let mut tracker = ExplorationTracker::new();
    let path = path_proximity_target(&board, &mut tracker);
    assert_eq!(path, vec![me, enemy]);
    assert_eq!(move_path(&board, &path), Some(Move::new(me, enemy, false)));

    let decision = select(&board, 42).unwrap();
    assert_eq!(decision.strategy, Strategy::PathTarget);
    assert_eq!(decision.mv, Move::new(me, enemy, false));
}

#[test]
fn trailing_only_diff_is_a_no_op() {
    let mut cache = vec![3, 3, 1, 2, 3];
    apply_diff(&mut cache, &[5]).unwrap();
    assert_eq!(cache, vec![3, 3, 1, 2, 3]);
}

#[test]
fn trapped_swamp_army_defers_to_next_strategy() {
    // (0,0) own swamp, (0,1) mountain, (1,0) own, (1,1) empty.
    let mut board = Board::new(2, 2, 0);
    board.turn = 1;
    board.set_swamp(0, true);
    board.update_tile(0, ME, 2, false, false, false);
    board.update_tile(1, TileKind::Mountain, 0, false, false, false);
    board.update_tile(2, ME, 3, false, false, false);
    board.update_tile(3, TileKind::Empty, 0, false, false, false);

    assert_eq!(leave_swamp(&board), None);
    let decision = select(&board, 7).unwrap();
    assert_ne!(decision.strategy, Strategy::LeaveSwamp);
    assert_eq!(decision.mv, Move::new(2, 3, false));
}

#[test]
fn swamp_escape_prefers_capture_over_fog() {
    // Row 0: fog | own swamp | swamp | empty
    // Row 1: mountains underneath.
    let mut board = Board::new(2, 4, 0);
    board.turn = 1;
    board.set_swamp(1, true);
    board.set_swamp(2, true);
    board.update_tile(1, ME, 9, false, false, false);
    board.update_tile(3, TileKind::Empty, 0, false, false, false);
    for id in 4..8 {
        board.update_tile(id, TileKind::Mountain, 0, false, false, false);
    }

    let best = get_best_swamp_path(&board, 1).unwrap();
    assert_eq!(best.path, vec![1, 2, 3]);
    assert_eq!(best.cost, 4);

    let decision = select(&board, 1).unwrap();
    assert_eq!(decision.strategy, Strategy::LeaveSwamp);
    assert_eq!(decision.mv, Move::new(1, 2, false));
    assert_eq!(decision.path, vec![1, 2, 3]);
}

#[test]
fn known_general_is_captured_first() {
    let mut board = Board::new(3, 3, 0);
    board.turn = 1;
    board.update_tile(4, ME, 9, false, false, false);
    board.update_tile(5, THEM, 2, false, true, false);
    board.update_tile(3, THEM, 1, false, false, false);

    let decision = select(&board, 42).unwrap();
    assert_eq!(decision.strategy, Strategy::Priority);
    assert_eq!(decision.mv, Move::new(4, 5, false));
}

#[test]
fn late_general_moves_are_seeded() {
    let build = || {
        let mut board = Board::new(1, 2, 0);
        board.turn = 301;
        board.update_tile(0, ME, 40, false, true, false);
        board.update_tile(1, TileKind::Empty, 0, false, false, false);
        board
    };
    let board = build();
    let a = select(&board, 9).unwrap();
    let b = select(&build(), 9).unwrap();
    assert_eq!(a.mv, b.mv);
}

#[test]
fn do_not_attack_players_are_spared() {
    let mut board = Board::new(1, 3, 0);
    board.turn = 1;
    board.update_tile(0, THEM, 1, false, false, false);
    board.update_tile(1, ME, 9, false, false, false);
    board.update_tile(2, TileKind::Owned(2), 1, false, false, false);
    board.do_not_attack = vec![1];

    let decision = select(&board, 42).unwrap();
    assert_eq!(decision.mv.dest, 2);
}
