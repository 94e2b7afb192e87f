use rts_core::{EngineView, PlayerId, Position, Tile};

/// What a path search needs to know about the board, from one player's point of view.
pub trait Passability {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// The tile as the planner currently believes it to be.
    fn tile(&self, pos: Position) -> Option<Tile>;

    /// Engine legality predicate (`isMovementPossible(x, y, player)`).
    fn is_movement_possible(&self, pos: Position) -> bool;

    fn is_explored(&self, pos: Position) -> bool;

    fn is_visible(&self, pos: Position) -> bool;

    fn remaining_capacity(&self, pos: Position) -> u32;

    fn is_enemy_occupied(&self, pos: Position) -> bool;

    fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < self.width() && (pos.y as u32) < self.height()
    }

    fn is_mountain(&self, pos: Position) -> bool {
        self.tile(pos).map(|t| t.is_mountain()).unwrap_or(true)
    }
}

/// [`Passability`] adapter over any engine view, bound to one player.
#[derive(Debug, Clone, Copy)]
pub struct EnginePassability<'a, E: ?Sized> {
    engine: &'a E,
    player: PlayerId,
}

impl<'a, E: EngineView + ?Sized> EnginePassability<'a, E> {
    pub fn new(engine: &'a E, player: PlayerId) -> Self {
        Self { engine, player }
    }

    pub fn player(&self) -> PlayerId {
        self.player
    }
}

impl<E: EngineView + ?Sized> Passability for EnginePassability<'_, E> {
    fn width(&self) -> u32 {
        self.engine.width()
    }

    fn height(&self) -> u32 {
        self.engine.height()
    }

    fn tile(&self, pos: Position) -> Option<Tile> {
        self.engine.tile(pos)
    }

    fn is_movement_possible(&self, pos: Position) -> bool {
        self.engine.is_movement_possible(pos, self.player)
    }

    fn is_explored(&self, pos: Position) -> bool {
        self.engine.is_discovered(self.player, pos)
    }

    fn is_visible(&self, pos: Position) -> bool {
        self.engine.is_visible(self.player, pos)
    }

    fn remaining_capacity(&self, pos: Position) -> u32 {
        self.engine.remaining_capacity(pos)
    }

    fn is_enemy_occupied(&self, pos: Position) -> bool {
        self.engine.is_enemy_occupied(pos, self.player)
    }
}

/// Standalone grid for tests, benches and offline planning.
///
/// Every cell starts as an explored, visible, empty plain.
#[derive(Debug, Clone)]
pub struct NavGrid {
    width: i32,
    height: i32,
    tiles: Vec<Tile>,
    explored: Vec<bool>,
    visible: Vec<bool>,
    enemy: Vec<bool>,
    load: Vec<u8>,
}

impl NavGrid {
    pub fn new(width: u32, height: u32) -> Self {
        assert!(width > 0 && height > 0, "grid must be non-empty");
        let width = width as i32;
        let height = height as i32;
        let len = (width * height) as usize;
        Self {
            width,
            height,
            tiles: vec![Tile::plain(); len],
            explored: vec![true; len],
            visible: vec![true; len],
            enemy: vec![false; len],
            load: vec![0; len],
        }
    }

    fn idx(&self, pos: Position) -> Option<usize> {
        if pos.x < 0 || pos.y < 0 || pos.x >= self.width || pos.y >= self.height {
            return None;
        }
        Some((pos.y * self.width + pos.x) as usize)
    }

    pub fn set_tile(&mut self, pos: Position, tile: Tile) {
        if let Some(idx) = self.idx(pos) {
            self.tiles[idx] = tile;
        }
    }

    pub fn set_blocked(&mut self, pos: Position, blocked: bool) {
        let tile = if blocked { Tile::mountain() } else { Tile::plain() };
        self.set_tile(pos, tile);
    }

    pub fn set_explored(&mut self, pos: Position, explored: bool) {
        if let Some(idx) = self.idx(pos) {
            self.explored[idx] = explored;
            if !explored {
                self.visible[idx] = false;
            }
        }
    }

    pub fn set_visible(&mut self, pos: Position, visible: bool) {
        if let Some(idx) = self.idx(pos) {
            self.visible[idx] = visible;
            if visible {
                self.explored[idx] = true;
            }
        }
    }

    pub fn set_enemy(&mut self, pos: Position, enemy: bool) {
        if let Some(idx) = self.idx(pos) {
            self.enemy[idx] = enemy;
        }
    }

    /// Number of units standing on the tile.
    pub fn set_load(&mut self, pos: Position, load: u8) {
        if let Some(idx) = self.idx(pos) {
            self.load[idx] = load;
        }
    }
}

impl Passability for NavGrid {
    fn width(&self) -> u32 {
        self.width as u32
    }

    fn height(&self) -> u32 {
        self.height as u32
    }

    fn tile(&self, pos: Position) -> Option<Tile> {
        self.idx(pos).map(|idx| self.tiles[idx])
    }

    fn is_movement_possible(&self, pos: Position) -> bool {
        let Some(idx) = self.idx(pos) else {
            return false;
        };
        self.tiles[idx].is_passable() && !self.enemy[idx] && self.load[idx] < self.tiles[idx].capacity
    }

    fn is_explored(&self, pos: Position) -> bool {
        self.idx(pos).map(|idx| self.explored[idx]).unwrap_or(false)
    }

    fn is_visible(&self, pos: Position) -> bool {
        self.idx(pos).map(|idx| self.visible[idx]).unwrap_or(false)
    }

    fn remaining_capacity(&self, pos: Position) -> u32 {
        self.idx(pos)
            .map(|idx| self.tiles[idx].capacity.saturating_sub(self.load[idx]) as u32)
            .unwrap_or(0)
    }

    fn is_enemy_occupied(&self, pos: Position) -> bool {
        self.idx(pos).map(|idx| self.enemy[idx]).unwrap_or(false)
    }
}
