//! Tile catalogue and the tile grid
//!
//! Each tile has an immutable coordinate, a kind whose static [`TileDef`]
//! carries all behavior (solidity, water, destructibility, look), and
//! mutable health used only by destructible kinds.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use crate::tile_of;

/// Tile types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TileKind {
    #[default]
    Floor,
    Wall,
    Water,
    /// Destructible cover, becomes rubble
    Crate,
    /// Walkable debris left by a destroyed crate
    Rubble,
}

/// Static behavior record for a tile kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileDef {
    pub solid: bool,
    pub water: bool,
    pub destructible: bool,
    pub max_health: i32,
    /// Kind swapped in once health reaches zero
    pub after_destruction: TileKind,
    pub tint: [f32; 4],
    /// Atlas rectangle (u0, v0, u1, v1)
    pub uv: [f32; 4],
    /// Opaque stamping color that selects this kind
    pub stamp_color: [u8; 3],
}

const FLOOR: TileDef = TileDef {
    solid: false,
    water: false,
    destructible: false,
    max_health: 0,
    after_destruction: TileKind::Floor,
    tint: [0.55, 0.5, 0.45, 1.0],
    uv: [0.0, 0.0, 0.25, 0.25],
    stamp_color: [255, 255, 255],
};

const WALL: TileDef = TileDef {
    solid: true,
    water: false,
    destructible: false,
    max_health: 0,
    after_destruction: TileKind::Wall,
    tint: [0.3, 0.3, 0.4, 1.0],
    uv: [0.25, 0.0, 0.5, 0.25],
    stamp_color: [0, 0, 0],
};

const WATER: TileDef = TileDef {
    solid: false,
    water: true,
    destructible: false,
    max_health: 0,
    after_destruction: TileKind::Water,
    tint: [0.2, 0.4, 0.9, 1.0],
    uv: [0.5, 0.0, 0.75, 0.25],
    stamp_color: [0, 0, 255],
};

const CRATE: TileDef = TileDef {
    solid: true,
    water: false,
    destructible: true,
    max_health: 3,
    after_destruction: TileKind::Rubble,
    tint: [0.8, 0.55, 0.25, 1.0],
    uv: [0.75, 0.0, 1.0, 0.25],
    stamp_color: [255, 128, 0],
};

const RUBBLE: TileDef = TileDef {
    solid: false,
    water: false,
    destructible: false,
    max_health: 0,
    after_destruction: TileKind::Rubble,
    tint: [0.45, 0.4, 0.35, 1.0],
    uv: [0.0, 0.25, 0.25, 0.5],
    stamp_color: [128, 128, 128],
};

impl TileKind {
    pub const ALL: [TileKind; 5] = [
        TileKind::Floor,
        TileKind::Wall,
        TileKind::Water,
        TileKind::Crate,
        TileKind::Rubble,
    ];

    pub fn def(self) -> &'static TileDef {
        match self {
            TileKind::Floor => &FLOOR,
            TileKind::Wall => &WALL,
            TileKind::Water => &WATER,
            TileKind::Crate => &CRATE,
            TileKind::Rubble => &RUBBLE,
        }
    }

    /// Kind whose stamping color matches, if any
    pub fn from_stamp_color(rgb: [u8; 3]) -> Option<TileKind> {
        Self::ALL.into_iter().find(|k| k.def().stamp_color == rgb)
    }
}

/// Movement capabilities that change what counts as solid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Traversal {
    pub can_swim: bool,
}

/// A single grid cell
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    coord: IVec2,
    kind: TileKind,
    pub health: i32,
}

impl Tile {
    pub fn new(coord: IVec2, kind: TileKind) -> Self {
        Self {
            coord,
            kind,
            health: kind.def().max_health,
        }
    }

    #[inline]
    pub fn coord(&self) -> IVec2 {
        self.coord
    }

    #[inline]
    pub fn kind(&self) -> TileKind {
        self.kind
    }

    #[inline]
    pub fn def(&self) -> &'static TileDef {
        self.kind.def()
    }

    /// Replace the kind and reset health to its maximum (generation path)
    pub fn set_kind(&mut self, kind: TileKind) {
        self.kind = kind;
        self.health = kind.def().max_health;
    }

    /// Apply impact damage; only destructible tiles lose health
    pub fn damage(&mut self, amount: i32) {
        if self.def().destructible {
            self.health = (self.health - amount).max(0);
        }
    }

    /// True for a destructible tile whose health ran out
    pub fn is_destroyed(&self) -> bool {
        self.def().destructible && self.health <= 0
    }

    /// Swap to the successor kind. Health is left as is; successors are
    /// expected to be non-destructible.
    pub fn decay(&mut self) -> bool {
        if !self.is_destroyed() {
            return false;
        }
        self.kind = self.def().after_destruction;
        true
    }

    /// Blocking test for the generation-time solvability field
    #[inline]
    pub fn blocks_globally(&self) -> bool {
        let def = self.def();
        def.solid || def.water
    }

    /// Blocking test for sight lines and projectiles
    #[inline]
    pub fn blocks_sight(&self) -> bool {
        self.def().solid
    }

    /// Blocking test for an entity, ignoring occupancy
    #[inline]
    pub fn blocks(&self, traversal: Traversal) -> bool {
        let def = self.def();
        def.solid || (def.water && !traversal.can_swim)
    }

    /// Axis-aligned bounds in world units
    pub fn bounds(&self) -> (Vec2, Vec2) {
        let min = self.coord.as_vec2();
        (min, min + Vec2::ONE)
    }
}

/// Row-major grid of tiles
#[derive(Debug, Clone, PartialEq)]
pub struct TileGrid {
    width: i32,
    height: i32,
    tiles: Vec<Tile>,
}

impl TileGrid {
    /// Create a grid filled with one kind
    pub fn new(width: i32, height: i32, fill: TileKind) -> Self {
        let mut tiles = Vec::with_capacity((width.max(0) * height.max(0)) as usize);
        for y in 0..height {
            for x in 0..width {
                tiles.push(Tile::new(IVec2::new(x, y), fill));
            }
        }
        Self {
            width,
            height,
            tiles,
        }
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// World-space size of the grid
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    /// Whether `coord` lies in `[0,width) × [0,height)`
    #[inline]
    pub fn is_valid(&self, coord: IVec2) -> bool {
        coord.x >= 0 && coord.y >= 0 && coord.x < self.width && coord.y < self.height
    }

    /// Whether `coord` is off the border ring
    #[inline]
    pub fn is_interior(&self, coord: IVec2) -> bool {
        coord.x > 0 && coord.y > 0 && coord.x < self.width - 1 && coord.y < self.height - 1
    }

    #[inline]
    fn index(&self, coord: IVec2) -> usize {
        (coord.y * self.width + coord.x) as usize
    }

    pub fn tile_at(&self, coord: IVec2) -> Option<&Tile> {
        if self.is_valid(coord) {
            Some(&self.tiles[self.index(coord)])
        } else {
            None
        }
    }

    pub fn tile_at_mut(&mut self, coord: IVec2) -> Option<&mut Tile> {
        if self.is_valid(coord) {
            let index = self.index(coord);
            Some(&mut self.tiles[index])
        } else {
            None
        }
    }

    /// Tile under a world position
    pub fn tile_at_pos(&self, pos: Vec2) -> Option<&Tile> {
        self.tile_at(tile_of(pos))
    }

    /// Generation-path kind change. Returns `false` when out of bounds.
    pub fn set_kind(&mut self, coord: IVec2, kind: TileKind) -> bool {
        match self.tile_at_mut(coord) {
            Some(tile) => {
                tile.set_kind(kind);
                true
            }
            None => false,
        }
    }

    pub fn kind_at(&self, coord: IVec2) -> Option<TileKind> {
        self.tile_at(coord).map(Tile::kind)
    }

    /// Reset every tile to `kind`
    pub fn fill(&mut self, kind: TileKind) {
        for tile in &mut self.tiles {
            tile.set_kind(kind);
        }
    }

    /// Paint the border ring with `kind`
    pub fn stamp_border(&mut self, kind: TileKind) {
        for x in 0..self.width {
            self.set_kind(IVec2::new(x, 0), kind);
            self.set_kind(IVec2::new(x, self.height - 1), kind);
        }
        for y in 0..self.height {
            self.set_kind(IVec2::new(0, y), kind);
            self.set_kind(IVec2::new(self.width - 1, y), kind);
        }
    }

    /// Global blocking test; off-grid coordinates block
    pub fn blocks_globally(&self, coord: IVec2) -> bool {
        self.tile_at(coord).is_none_or(Tile::blocks_globally)
    }

    /// Sight blocking test; off-grid coordinates block
    pub fn blocks_sight(&self, coord: IVec2) -> bool {
        self.tile_at(coord).is_none_or(Tile::blocks_sight)
    }

    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    pub fn tiles_mut(&mut self) -> impl Iterator<Item = &mut Tile> {
        self.tiles.iter_mut()
    }
}
