//! Direct captures of known generals and cities.

use crate::board::{Board, Move, Passage};

/// Finds an adjacent own army large enough to take a known general or city
/// outright.
///
/// Among city captures the strongest attacker wins. Any general capture
/// takes precedence over every city capture.
pub fn move_priority(board: &Board) -> Option<Move> {
    let generals: Vec<_> = board.generals().collect();
    let mut best: Option<(Move, i32, bool)> = None;

    for target in generals.iter().chain(board.cities()).copied() {
        if !board.should_attack(target) {
            continue;
        }
        let target_army = board.tile(target).army;
        let is_general = board.tile(target).is_general;

        for source in board.neighbors(target, Passage::DEFAULT) {
            let army = board.tile(source).army;
            if !board.is_self(source) || army <= (target_army + 1).max(1) {
                continue;
            }
            let better = match best {
                None => true,
                Some((_, best_army, best_general)) => {
                    (is_general && !best_general)
                        || (is_general == best_general && best_army < army)
                }
            };
            if better {
                best = Some((Move::new(source, target, false), army, is_general));
            }
        }
    }

    if let Some((mv, army, general)) = best {
        tracing::debug!(source = mv.source, dest = mv.dest, army, general, "priority capture");
    }
    best.map(|(mv, _, _)| mv)
}
