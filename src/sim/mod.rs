//! Frame-stepped simulation
//!
//! All gameplay logic lives here:
//! - Seeded RNG only (one `Pcg32` per map)
//! - Stable iteration order (registry bucket order)
//! - No backend dependencies; rendering and audio go through traits

pub mod behavior;
pub mod camera;
pub mod collision;
pub mod entity;
pub mod heat_map;
pub mod map;
pub mod mapgen;
pub mod pathfind;
pub mod raycast;
pub mod registry;
pub mod tick;
pub mod tile;

pub use behavior::{Behavior, HitReaction, behavior};
pub use camera::Camera;
pub use collision::{CollisionResult, disc_box, disc_disc, discs_overlap, point_in_disc};
pub use entity::{
    AiState, Entity, EntityFlags, Explosion, Faction, Species, create_entity, create_entity_named,
};
pub use heat_map::{HeatMap, UNREACHABLE};
pub use map::{Fade, GameEvent, Map};
pub use mapgen::{GeneratedLayout, StampImage, generate_layout};
pub use pathfind::{extract_path, propagate};
pub use raycast::{RayHit, cast_ray};
pub use registry::{EntityId, Registry, SlotList};
pub use tick::{TickInput, tick};
pub use tile::{Tile, TileDef, TileGrid, TileKind, Traversal};
