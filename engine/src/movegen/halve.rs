//! Split-army policy.

use rand::Rng;

use crate::board::{Board, Passage, TileId};
use crate::config::EngineConfig;

/// Decides whether the move `source -> dest` should leave half the army
/// behind.
///
/// Never splits into a city unless the mover is a city holding at least four
/// times the target. Past `halve_after_turn`, a general splits with
/// probability `general_halve_chance` and a city splits while any enemy
/// other than `dest` borders it.
pub fn should_move_half<R: Rng>(
    board: &Board,
    source: TileId,
    dest: TileId,
    rng: &mut R,
    config: &EngineConfig,
) -> bool {
    let src = board.tile(source);
    let dst = board.tile(dest);
    if dst.is_city && (!src.is_city || src.army < dst.army.saturating_mul(4)) {
        return false;
    }
    if board.turn <= config.halve_after_turn {
        return false;
    }
    if src.is_general {
        rng.gen_bool(config.general_halve_chance)
    } else if src.is_city {
        board
            .neighbors(source, Passage::ALL)
            .any(|n| n != dest && board.is_enemy(n))
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::TileKind;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const ME: TileKind = TileKind::Owned(0);
    const THEM: TileKind = TileKind::Owned(1);

    fn late_board() -> Board {
        let mut board = Board::new(1, 3, 0);
        board.turn = 300;
        board
    }

    #[test]
    fn never_before_threshold() {
        let mut board = late_board();
        board.turn = 250;
        board.update_tile(1, ME, 40, false, true, false);
        board.update_tile(2, THEM, 1, false, false, false);
        let mut rng = StdRng::seed_from_u64(42);
        let config = EngineConfig {
            general_halve_chance: 1.0,
            ..EngineConfig::default()
        };
        assert!(!should_move_half(&board, 1, 2, &mut rng, &config));
    }

    #[test]
    fn plain_tiles_never_split() {
        let mut board = late_board();
        board.update_tile(1, ME, 40, false, false, false);
        board.update_tile(0, THEM, 1, false, false, false);
        let mut rng = StdRng::seed_from_u64(42);
        assert!(!should_move_half(&board, 1, 2, &mut rng, &EngineConfig::default()));
    }

    #[test]
    fn general_follows_configured_chance() {
        let mut board = late_board();
        board.update_tile(1, ME, 40, false, true, false);
        let mut rng = StdRng::seed_from_u64(42);
        let always = EngineConfig {
            general_halve_chance: 1.0,
            ..EngineConfig::default()
        };
        let never = EngineConfig {
            general_halve_chance: 0.0,
            ..EngineConfig::default()
        };
        assert!(should_move_half(&board, 1, 2, &mut rng, &always));
        assert!(!should_move_half(&board, 1, 2, &mut rng, &never));
    }

    #[test]
    fn city_splits_only_with_other_enemy_neighbor() {
        let mut board = late_board();
        board.update_tile(1, ME, 40, true, false, false);
        board.update_tile(2, THEM, 1, false, false, false);
        let mut rng = StdRng::seed_from_u64(42);
        let config = EngineConfig::default();
        assert!(!should_move_half(&board, 1, 2, &mut rng, &config));
        board.update_tile(0, THEM, 1, false, false, false);
        assert!(should_move_half(&board, 1, 2, &mut rng, &config));
    }

    #[test]
    fn city_target_requires_fourfold_city_source() {
        let mut board = late_board();
        board.update_tile(1, ME, 39, true, false, false);
        board.update_tile(0, THEM, 1, false, false, false);
        board.update_tile(2, THEM, 10, true, false, false);
        let mut rng = StdRng::seed_from_u64(42);
        let config = EngineConfig::default();
        assert!(!should_move_half(&board, 1, 2, &mut rng, &config));
        board.update_tile(1, ME, 40, true, false, false);
        assert!(should_move_half(&board, 1, 2, &mut rng, &config));
    }
}
