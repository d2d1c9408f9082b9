//! Procedural map generation
//!
//! A layout is built from a floor fill and border walls, random-walk "worm"
//! carving, an optional bitmap stamp and two fixed corner rooms. Layouts are
//! retried until the solvability field links the entry to the exit.

use glam::{IVec2, Vec2};
use rand::Rng;

use super::entity::Species;
use super::heat_map::HeatMap;
use super::pathfind::{NEIGHBOURS, propagate};
use super::tile::{TileGrid, TileKind, Traversal};
use crate::consts::{MIN_MAP_SIZE, ROOM_SIZE};
use crate::error::{ArenaError, Result};
use crate::tile_center;
use crate::tuning::{MapTuning, WormConfig};

/// Worm families beyond this many are ignored
pub const MAX_WORM_FAMILIES: usize = 3;

/// Bitmap the generator can stamp onto the grid
pub trait StampImage {
    /// (width, height) in pixels
    fn dimensions(&self) -> (u32, u32);
    /// RGBA at a pixel inside the dimensions
    fn pixel(&self, x: u32, y: u32) -> [u8; 4];
}

impl StampImage for image::RgbaImage {
    fn dimensions(&self) -> (u32, u32) {
        image::ImageBuffer::dimensions(self)
    }

    fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.get_pixel(x, y).0
    }
}

/// An accepted layout
#[derive(Debug, Clone)]
pub struct GeneratedLayout {
    pub grid: TileGrid,
    /// Solvability buffer reused as a binary map: 0 = reached, 1 = sealed
    pub open_map: HeatMap,
    pub entry: IVec2,
    pub exit: IVec2,
    /// Attempts it took, starting at 1
    pub attempts: u32,
}

/// Entry marker: innermost tile of the near corner
pub fn entry_marker() -> IVec2 {
    IVec2::new(1, 1)
}

/// Exit marker: innermost tile of the far corner
pub fn exit_marker(width: i32, height: i32) -> IVec2 {
    IVec2::new(width - 2, height - 2)
}

/// Generate a solvable layout, or fail after `max_attempts`
pub fn generate_layout<R: Rng>(
    tuning: &MapTuning,
    stamp: Option<&dyn StampImage>,
    rng: &mut R,
) -> Result<GeneratedLayout> {
    let (width, height) = (tuning.width, tuning.height);
    if width < MIN_MAP_SIZE || height < MIN_MAP_SIZE {
        return Err(ArenaError::MapTooSmall {
            width,
            height,
            min: MIN_MAP_SIZE,
        });
    }
    if let Some(image) = stamp {
        let (image_width, image_height) = image.dimensions();
        if image_width as i64 > width as i64 || image_height as i64 > height as i64 {
            return Err(ArenaError::StampTooLarge {
                image_width,
                image_height,
                map_width: width,
                map_height: height,
            });
        }
    }

    let entry = entry_marker();
    let exit = exit_marker(width, height);
    let budget = (width * height) as u32;
    let mut grid = TileGrid::new(width, height, TileKind::Floor);
    let mut field = HeatMap::new(width, height);

    for attempt in 1..=tuning.max_attempts {
        grid.fill(TileKind::Floor);
        grid.stamp_border(TileKind::Wall);
        carve_worms(&mut grid, &tuning.worms, rng);
        if let Some(image) = stamp {
            stamp_image(&mut grid, image, rng);
        }
        carve_corner_rooms(&mut grid);

        propagate(&mut field, entry, budget, |c| grid.blocks_globally(c));
        if !field.is_reachable(exit) {
            log::debug!("Layout attempt {attempt} has no entry-exit path, retrying");
            continue;
        }

        let sealed = seal_unreachable(&mut grid, &field);
        collapse_to_open_map(&mut field);
        log::info!(
            "Generated {width}x{height} map in {attempt} attempt(s), sealed {sealed} pocket tile(s)"
        );
        return Ok(GeneratedLayout {
            grid,
            open_map: field,
            entry,
            exit,
            attempts: attempt,
        });
    }

    Err(ArenaError::GenerationExhausted {
        attempts: tuning.max_attempts,
    })
}

/// Random-walk carving for up to three worm families
pub fn carve_worms<R: Rng>(grid: &mut TileGrid, worms: &[WormConfig], rng: &mut R) {
    if grid.width() < 3 || grid.height() < 3 {
        return;
    }
    for family in worms.iter().take(MAX_WORM_FAMILIES) {
        for _ in 0..family.count {
            let mut pos = IVec2::new(
                rng.random_range(1..grid.width() - 1),
                rng.random_range(1..grid.height() - 1),
            );
            grid.set_kind(pos, family.kind);

            for _ in 0..family.steps {
                let next = pos + NEIGHBOURS[rng.random_range(0..NEIGHBOURS.len())];
                // Steps off the interior are dropped; the walk stays put
                if grid.is_interior(next) {
                    pos = next;
                    grid.set_kind(pos, family.kind);
                }
            }
        }
    }
}

/// Stamp a bitmap onto the interior, pixel (x, y) onto tile (x, y).
///
/// Opaque pixels always apply, translucent ones apply with probability
/// alpha / 255, transparent ones and unknown colors are skipped.
pub fn stamp_image<R: Rng>(grid: &mut TileGrid, image: &dyn StampImage, rng: &mut R) {
    let (image_width, image_height) = image.dimensions();
    for y in 0..image_height {
        for x in 0..image_width {
            let coord = IVec2::new(x as i32, y as i32);
            if !grid.is_interior(coord) {
                continue;
            }
            let [r, g, b, a] = image.pixel(x, y);
            if a == 0 {
                continue;
            }
            let Some(kind) = TileKind::from_stamp_color([r, g, b]) else {
                continue;
            };
            if a == u8::MAX || rng.random_bool(a as f64 / 255.0) {
                grid.set_kind(coord, kind);
            }
        }
    }
}

/// Open the entry and exit rooms, each with its L-shaped bunker
pub fn carve_corner_rooms(grid: &mut TileGrid) {
    let (w, h) = (grid.width(), grid.height());
    for mirrored in [false, true] {
        // Exit room is the entry room rotated half a turn
        let to_map = |local: IVec2| {
            if mirrored {
                IVec2::new(w - 1 - local.x, h - 1 - local.y)
            } else {
                local
            }
        };
        for ly in 1..=ROOM_SIZE {
            for lx in 1..=ROOM_SIZE {
                grid.set_kind(to_map(IVec2::new(lx, ly)), TileKind::Floor);
            }
        }
        let bunker = ROOM_SIZE + 1;
        for i in 3..=bunker {
            grid.set_kind(to_map(IVec2::new(bunker, i)), TileKind::Wall);
            grid.set_kind(to_map(IVec2::new(i, bunker)), TileKind::Wall);
        }
    }
}

/// Wall off interior open tiles the solvability field never reached
fn seal_unreachable(grid: &mut TileGrid, field: &HeatMap) -> usize {
    let mut sealed = 0;
    for tile in grid.tiles_mut() {
        let coord = tile.coord();
        let def = tile.def();
        let interior =
            coord.x > 0 && coord.y > 0 && coord.x < field.width() - 1 && coord.y < field.height() - 1;
        if interior && !field.is_reachable(coord) && tile.kind() != TileKind::Wall && !def.water {
            tile.set_kind(TileKind::Wall);
            sealed += 1;
        }
    }
    sealed
}

/// Collapse a distance field to 0 (reached) / 1 (unreached). The buffer is
/// kept for minimap and fog rendering instead of allocating another.
pub(crate) fn collapse_to_open_map(field: &mut HeatMap) {
    for index in 0..field.len() {
        let reached = field.get_index(index) != super::heat_map::UNREACHABLE;
        field.set_index(index, if reached { 0.0 } else { 1.0 });
    }
}

/// Pick enemy spawn points by rejection sampling.
///
/// A spot must be passable for the species and at least `spawn_exclusion`
/// tiles (Chebyshev) from both corner markers. Enemies that find no spot
/// within `spawn_tries` are skipped.
pub fn pick_enemy_spawns<R: Rng>(
    grid: &TileGrid,
    entry: IVec2,
    exit: IVec2,
    tuning: &MapTuning,
    rng: &mut R,
) -> Vec<(Species, Vec2)> {
    let mut spawns: Vec<(Species, Vec2)> = Vec::new();
    let mut taken: Vec<IVec2> = Vec::new();
    let chebyshev = |a: IVec2, b: IVec2| {
        let d = (a - b).abs();
        d.x.max(d.y)
    };

    for (species, count) in tuning.enemies.per_species() {
        let traversal = Traversal {
            can_swim: species.can_swim(),
        };
        for _ in 0..count {
            let spot = (0..tuning.spawn_tries).find_map(|_| {
                let coord = IVec2::new(
                    rng.random_range(1..grid.width() - 1),
                    rng.random_range(1..grid.height() - 1),
                );
                let tile = grid.tile_at(coord)?;
                let ok = !tile.blocks(traversal)
                    && chebyshev(coord, entry) >= tuning.spawn_exclusion
                    && chebyshev(coord, exit) >= tuning.spawn_exclusion
                    && !taken.contains(&coord);
                ok.then_some(coord)
            });

            match spot {
                Some(coord) => {
                    taken.push(coord);
                    spawns.push((species, tile_center(coord)));
                }
                None => log::warn!("No spawn spot found for {}, skipping", species.name()),
            }
        }
    }
    spawns
}
