//! Board model.
//!
//! Owns the tile arena plus the indices derived from it: per-player tile
//! lists, known cities and the general slot table. Tiles refer back to the
//! board only through their `TileId`.
//!
//! Every tick the decoded server buffers are folded into the arena through
//! a per-tile state machine (`update_tile`) that decides which parts of the
//! incoming state to trust, since fogged tiles report stale or no data.

use std::time::{Duration, Instant};

use super::moves::Move;
use super::tile::{PlayerId, Tile, TileId, TileKind};
use crate::protocol::diff::{apply_diff, DiffError};
use crate::protocol::message::{scores_by_player, GameStart, GameUpdate, Score};

/// Size of the general slot table and the initial per-player index.
pub const MAX_PLAYERS: usize = 12;

/// Default lifetime of a locally-predicted tile update.
pub const DEFAULT_DIRTY_WINDOW: Duration = Duration::from_millis(600);

/// Errors raised while folding a server update into the board.
#[derive(Debug, thiserror::Error)]
pub enum UpdateError {
    #[error("map diff rejected: {0}")]
    MapDiff(#[source] DiffError),

    #[error("cities diff rejected: {0}")]
    CitiesDiff(#[source] DiffError),

    #[error("map buffer holds {len} values, expected {expected}")]
    BufferTooShort { len: usize, expected: usize },

    #[error("board dimensions changed from {rows}x{cols} to {new_rows}x{new_cols}")]
    DimensionsChanged {
        rows: usize,
        cols: usize,
        new_rows: usize,
        new_cols: usize,
    },

    #[error("unknown tile code {code} at cell {cell}")]
    UnknownTileCode { code: i32, cell: usize },

    #[error("invalid board dimensions {rows}x{cols}")]
    InvalidDimensions { rows: i32, cols: i32 },

    #[error("player index {player} exceeds the {MAX_PLAYERS}-player table")]
    PlayerOutOfRange { player: usize },
}

/// Which neighbours a traversal may step onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Passage {
    pub swamps: bool,
    pub cities: bool,
}

impl Passage {
    /// Cities allowed, swamps avoided.
    pub const DEFAULT: Passage = Passage {
        swamps: false,
        cities: true,
    };
    /// Everything passable.
    pub const ALL: Passage = Passage {
        swamps: true,
        cities: true,
    };
    /// Swamps allowed, cities avoided.
    pub const NO_CITIES: Passage = Passage {
        swamps: true,
        cities: false,
    };
}

/// How `find_largest_tile` treats a player's general.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeneralPolicy {
    Exclude,
    /// Prefer the general whenever it holds the most army.
    Include,
    /// Prefer the general only while the best other tile holds at most
    /// `max(6, ratio * general.army)`.
    Ratio(f64),
}

/// The complete known state of one game.
#[derive(Debug, Clone)]
pub struct Board {
    rows: usize,
    cols: usize,
    tiles: Vec<Tile>,
    owned: Vec<Vec<TileId>>,
    cities: Vec<TileId>,
    generals: [Option<TileId>; MAX_PLAYERS],
    team: Vec<PlayerId>,
    map_cache: Vec<i32>,
    cities_cache: Vec<i32>,
    pub player_index: PlayerId,
    pub turn: u32,
    pub usernames: Vec<String>,
    pub scores: Vec<Score>,
    pub complete: bool,
    pub won: bool,
    pub do_not_attack: Vec<PlayerId>,
    pub dirty_window: Duration,
    /// Path currently pursued by the agent; also shown by viewers.
    pub path: Vec<TileId>,
    /// Gather path, when the pursued path merges own armies.
    pub collect_path: Vec<TileId>,
    pub bottom_text: String,
}

impl Board {
    /// Creates a fully fogged board with static 4-connected adjacency.
    pub fn new(rows: usize, cols: usize, player_index: PlayerId) -> Self {
        let mut tiles = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                tiles.push(Tile::fogged(row * cols + col, row, col));
            }
        }

        for tile in tiles.iter_mut() {
            let (row, col) = tile.coords();
            if row > 0 {
                tile.neighbors.push((row - 1) * cols + col);
            }
            if row + 1 < rows {
                tile.neighbors.push((row + 1) * cols + col);
            }
            if col > 0 {
                tile.neighbors.push(row * cols + col - 1);
            }
            if col + 1 < cols {
                tile.neighbors.push(row * cols + col + 1);
            }
        }

        Board {
            rows,
            cols,
            tiles,
            owned: vec![Vec::new(); MAX_PLAYERS],
            cities: Vec::new(),
            generals: [None; MAX_PLAYERS],
            team: vec![player_index],
            map_cache: Vec::new(),
            cities_cache: Vec::new(),
            player_index,
            turn: 0,
            usernames: Vec::new(),
            scores: Vec::new(),
            complete: false,
            won: false,
            do_not_attack: Vec::new(),
            dirty_window: DEFAULT_DIRTY_WINDOW,
            path: Vec::new(),
            collect_path: Vec::new(),
            bottom_text: String::new(),
        }
    }

    /// Builds the board from the start message and the first tick update.
    ///
    /// Dimensions, swamps, player index and teams are fixed from here on.
    pub fn from_start(start: &GameStart, first: &GameUpdate) -> Result<Self, UpdateError> {
        let mut map_cache = Vec::new();
        apply_diff(&mut map_cache, &first.map_diff).map_err(UpdateError::MapDiff)?;
        if map_cache.len() < 2 {
            return Err(UpdateError::BufferTooShort {
                len: map_cache.len(),
                expected: 2,
            });
        }
        let (cols, rows) = (map_cache[0], map_cache[1]);
        if cols <= 0 || rows <= 0 {
            return Err(UpdateError::InvalidDimensions { rows, cols });
        }
        let expected = (rows as usize)
            .checked_mul(cols as usize)
            .and_then(|size| size.checked_mul(2))
            .and_then(|cells| cells.checked_add(2))
            .ok_or(UpdateError::InvalidDimensions { rows, cols })?;
        if map_cache.len() < expected {
            return Err(UpdateError::BufferTooShort {
                len: map_cache.len(),
                expected,
            });
        }
        if start.player_index >= MAX_PLAYERS {
            return Err(UpdateError::PlayerOutOfRange {
                player: start.player_index,
            });
        }

        let mut board = Board::new(rows as usize, cols as usize, start.player_index);
        board.usernames = start.usernames.clone();
        board.set_teams(start.teams.as_deref());
        for &cell in &start.swamps {
            if let Some(tile) = board.tiles.get_mut(cell) {
                tile.is_swamp = true;
            }
        }

        board.map_cache = map_cache;
        board.ingest(first)?;
        Ok(board)
    }

    /// Decodes one tick's diffs and folds them into the tiles.
    ///
    /// Updates arriving after the game completed are ignored.
    pub fn apply_update(&mut self, update: &GameUpdate) -> Result<(), UpdateError> {
        if self.complete {
            return Ok(());
        }
        apply_diff(&mut self.map_cache, &update.map_diff).map_err(UpdateError::MapDiff)?;
        self.ingest(update)
    }

    /// Marks the game finished.
    pub fn apply_result(&mut self, won: bool) {
        self.complete = true;
        self.won = won;
    }

    /// Applies everything but the map diff, which the caller has decoded.
    fn ingest(&mut self, update: &GameUpdate) -> Result<(), UpdateError> {
        apply_diff(&mut self.cities_cache, &update.cities_diff).map_err(UpdateError::CitiesDiff)?;

        let size = self.rows * self.cols;
        let expected = 2 + 2 * size;
        if self.map_cache.len() < expected {
            return Err(UpdateError::BufferTooShort {
                len: self.map_cache.len(),
                expected,
            });
        }
        let (new_cols, new_rows) = (self.map_cache[0] as usize, self.map_cache[1] as usize);
        if new_cols != self.cols || new_rows != self.rows {
            return Err(UpdateError::DimensionsChanged {
                rows: self.rows,
                cols: self.cols,
                new_rows,
                new_cols,
            });
        }

        self.turn = update.turn;
        self.scores = scores_by_player(&update.scores);

        let mut city_cells = vec![false; size];
        for &cell in &self.cities_cache {
            if let Some(flag) = usize::try_from(cell).ok().and_then(|c| city_cells.get_mut(c)) {
                *flag = true;
            }
        }
        let mut general_cells = vec![false; size];
        for &cell in &update.generals {
            if let Some(flag) = usize::try_from(cell).ok().and_then(|c| general_cells.get_mut(c)) {
                *flag = true;
            }
        }

        for cell in 0..size {
            let army = self.map_cache[2 + cell];
            let code = self.map_cache[2 + size + cell];
            let kind = TileKind::from_code(code)
                .filter(|k| k.owner().map_or(true, |p| p < MAX_PLAYERS))
                .ok_or(UpdateError::UnknownTileCode { code, cell })?;
            self.update_tile(cell, kind, army, city_cells[cell], general_cells[cell], false);
        }

        // The list is indexed by player, which also covers generals sighted
        // on cells still shown as fog.
        for (player, &cell) in update.generals.iter().enumerate().take(MAX_PLAYERS) {
            let Some(id) = usize::try_from(cell).ok().filter(|&c| c < size) else {
                continue;
            };
            let tile = &mut self.tiles[id];
            if tile.is_city {
                continue;
            }
            tile.is_general = true;
            tile.is_basic = false;
            tile.general_of = Some(player);
            self.generals[player] = Some(id);
        }
        Ok(())
    }

    /// Folds one tile observation into the board.
    ///
    /// Ownership is trusted when the tile was not player-owned before, when
    /// the tile is in view, or when the agent owns it (server corrections win
    /// over local predictions). Army is trusted when the remembered value is
    /// zero, the new value is positive, the tile is in view, or it is a swamp.
    pub fn update_tile(
        &mut self,
        id: TileId,
        kind: TileKind,
        army: i32,
        is_city: bool,
        is_general: bool,
        dirty: bool,
    ) {
        let prev = self.tiles[id].kind;
        let trust_owner = prev.owner().is_none()
            || kind.is_visible()
            || prev.owner() == Some(self.player_index);

        if trust_owner {
            if (kind.owner().is_some() || prev.owner().is_some()) && prev != kind {
                self.tiles[id].turn_captured = self.turn;
                if let Some(old) = prev.owner() {
                    self.owned[old].retain(|&t| t != id);
                }
                if let Some(list) = kind.owner().and_then(|new| self.owned.get_mut(new)) {
                    list.push(id);
                }
            }
            if kind.owner() == Some(self.player_index) {
                self.tiles[id].turn_held = self.turn;
            }
            self.tiles[id].kind = kind;
        }

        let turn = self.turn;
        let tile = &mut self.tiles[id];
        if dirty {
            tile.dirty_at = Some(Instant::now());
        }
        if tile.army == 0 || army > 0 || kind.is_visible() || tile.is_swamp {
            tile.army = army;
        }
        if kind == TileKind::Mountain {
            tile.is_mountain = true;
        }
        if kind.is_visible() {
            tile.turn_first_seen.get_or_insert(turn);
            if !is_city && !is_general && kind != TileKind::Mountain && !tile.is_swamp {
                tile.is_basic = true;
            }
        }

        if is_city {
            tile.is_city = true;
            tile.is_general = false;
            tile.is_basic = false;
            if !self.cities.contains(&id) {
                self.cities.push(id);
            }
            if let Some(p) = tile.general_of.take() {
                if self.generals.get(p) == Some(&Some(id)) {
                    self.generals[p] = None;
                }
            }
        } else if is_general {
            tile.is_general = true;
            tile.is_basic = false;
            if let Some(p) = kind.owner().or(prev.owner()) {
                if p < MAX_PLAYERS {
                    self.generals[p] = Some(id);
                    tile.general_of = Some(p);
                } else {
                    tracing::warn!(player = p, "general outside slot table ignored");
                }
            }
        }
    }

    /// Applies the expected outcome of a move the agent just sent, marking
    /// the destination dirty until the server confirms it.
    pub fn apply_predicted_move(&mut self, mv: &Move) -> bool {
        let source = &self.tiles[mv.source];
        let source_kind = source.kind;
        let army = if mv.halve { source.army / 2 } else { source.army };
        let dest_army = self.tiles[mv.dest].army;
        let dest_is_general = self.tiles[mv.dest].is_general;

        self.update_tile(mv.source, source_kind, 1, false, false, false);

        if self.is_on_team(mv.dest) {
            self.update_tile(mv.dest, source_kind, army - 1 + dest_army, false, false, true);
            true
        } else if army > dest_army + 1 {
            // A captured general becomes a city.
            self.update_tile(mv.dest, source_kind, army - 1 - dest_army, dest_is_general, false, true);
            true
        } else {
            false
        }
    }

    /// Sets the agent's team from the per-player team id list.
    pub fn set_teams(&mut self, teams: Option<&[i32]>) {
        self.team = match teams.and_then(|t| t.get(self.player_index).map(|own| (t, *own))) {
            Some((teams, own)) => teams
                .iter()
                .enumerate()
                .filter(|(_, &t)| t == own)
                .map(|(p, _)| p)
                .collect(),
            None => vec![self.player_index],
        };
    }

    pub fn set_swamp(&mut self, id: TileId, is_swamp: bool) {
        self.tiles[id].is_swamp = is_swamp;
    }

    // ======================== Accessors ======================== //

    pub const fn rows(&self) -> usize {
        self.rows
    }

    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Row-major id of `(row, col)`, or `None` if out of bounds.
    pub fn id_at(&self, row: usize, col: usize) -> Option<TileId> {
        (row < self.rows && col < self.cols).then_some(row * self.cols + col)
    }

    pub fn tile(&self, id: TileId) -> &Tile {
        &self.tiles[id]
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Tiles owned by `player`, in capture order.
    pub fn tiles_of(&self, player: PlayerId) -> &[TileId] {
        self.owned.get(player).map_or(&[], Vec::as_slice)
    }

    /// Tiles owned by the agent.
    pub fn own_tiles(&self) -> &[TileId] {
        self.tiles_of(self.player_index)
    }

    /// Every tile ever identified as a city.
    pub fn cities(&self) -> &[TileId] {
        &self.cities
    }

    pub fn general(&self, player: PlayerId) -> Option<TileId> {
        self.generals.get(player).copied().flatten()
    }

    /// All discovered generals.
    pub fn generals(&self) -> impl Iterator<Item = TileId> + '_ {
        self.generals.iter().flatten().copied()
    }

    pub fn team(&self) -> &[PlayerId] {
        &self.team
    }

    // ======================== Tile Predicates ======================== //

    /// True if the agent owns the tile.
    pub fn is_self(&self, id: TileId) -> bool {
        self.tiles[id].owner() == Some(self.player_index)
    }

    /// True if the agent or a teammate owns the tile.
    pub fn is_on_team(&self, id: TileId) -> bool {
        self.tiles[id]
            .owner()
            .is_some_and(|p| self.team.contains(&p))
    }

    /// True if a player outside the agent's team owns the tile.
    pub fn is_enemy(&self, id: TileId) -> bool {
        self.tiles[id]
            .owner()
            .is_some_and(|p| !self.team.contains(&p))
    }

    pub fn is_dirty(&self, id: TileId) -> bool {
        self.tiles[id].is_dirty(self.dirty_window)
    }

    /// In bounds and not a known mountain.
    pub fn is_valid_position(&self, row: usize, col: usize) -> bool {
        self.id_at(row, col)
            .is_some_and(|id| !self.tiles[id].is_mountain())
    }

    /// Passable neighbours of `id` under the given passage rules.
    ///
    /// Mountains and unconfirmed obstacles are never passable, except
    /// obstacles already known to be cities or generals.
    pub fn neighbors(&self, id: TileId, passage: Passage) -> impl Iterator<Item = TileId> + '_ {
        self.tiles[id].neighbors.iter().copied().filter(move |&n| {
            let t = &self.tiles[n];
            (t.kind != TileKind::Obstacle || t.is_city || t.is_general)
                && !t.is_mountain()
                && (passage.swamps || !t.is_swamp)
                && (passage.cities || !t.is_city)
        })
    }

    /// Reachable: in view or remembered as empty/owned, and bordering a tile
    /// the agent has held.
    pub fn is_valid_target(&self, id: TileId) -> bool {
        if !matches!(self.tiles[id].kind, TileKind::Empty | TileKind::Owned(_)) {
            return false;
        }
        self.neighbors(id, Passage::ALL)
            .any(|n| self.tiles[n].turn_held > 0)
    }

    /// True if `id` is a reachable tile outside the team, not protected by
    /// the do-not-attack list, and not awaiting confirmation of a prior move.
    pub fn should_attack(&self, id: TileId) -> bool {
        if !self.is_valid_target(id) || self.is_on_team(id) {
            return false;
        }
        if self.tiles[id]
            .owner()
            .is_some_and(|p| self.do_not_attack.contains(&p))
        {
            return false;
        }
        !self.is_dirty(id)
    }

    // ======================== Search/Selection ======================== //

    /// Returns `player`'s tile with the most army, not in `exclude`.
    pub fn find_largest_tile(
        &self,
        player: PlayerId,
        exclude: &[TileId],
        policy: GeneralPolicy,
    ) -> Option<TileId> {
        let general = self.general(player);
        if general.is_none() {
            tracing::error!(player, turn = self.turn, "general slot empty while finding largest tile");
        }

        let mut largest: Option<TileId> = None;
        for &id in self.tiles_of(player) {
            let tile = &self.tiles[id];
            if tile.is_general || exclude.contains(&id) {
                continue;
            }
            if largest.map_or(true, |l| self.tiles[l].army < tile.army) {
                largest = Some(id);
            }
        }

        let general = match general {
            Some(g) if !exclude.contains(&g) && self.tiles[g].owner() == Some(player) => g,
            _ => return largest,
        };
        let general_army = self.tiles[general].army;
        let Some(best) = largest else {
            return match policy {
                GeneralPolicy::Exclude => None,
                _ => Some(general),
            };
        };
        let best_army = self.tiles[best].army;

        let prefer_general = match policy {
            GeneralPolicy::Exclude => false,
            GeneralPolicy::Include => best_army < general_army,
            GeneralPolicy::Ratio(ratio) => {
                let threshold = (f64::from(general_army) * ratio).max(6.0);
                best_army < general_army && f64::from(best_army) <= threshold
            }
        };
        Some(if prefer_general { general } else { best })
    }
}
