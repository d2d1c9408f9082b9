//! Zodiac Arena - tile-map simulation core of a top-down arcade shooter
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (tiles, pathfinding, entities, pipeline)
//! - `render`: Triangle-list rendering glue over a backend trait
//! - `audio`: Logical sound ids and the sink the host plays them through
//! - `tuning`: Data-driven game balance
//! - `error`: Fatal content/configuration errors

pub mod audio;
pub mod error;
pub mod render;
pub mod sim;
pub mod tuning;

pub use error::{ArenaError, Result};
pub use tuning::Tuning;

use glam::{IVec2, Vec2};

/// Game configuration constants
pub mod consts {
    /// Nominal frame step (60 Hz)
    pub const FRAME_DT: f32 = 1.0 / 60.0;
    /// Smallest map that still fits both corner rooms
    pub const MIN_MAP_SIZE: i32 = 16;
    /// Side of the open square carved at each corner room
    pub const ROOM_SIZE: i32 = 5;
    /// Distance used to disable a raycast axis (added to the max distance)
    pub const RAY_AXIS_DISABLED: f32 = 1.0;
}

/// Normalize an angle in degrees to [-180, 180)
#[inline]
pub fn normalize_degrees(mut angle: f32) -> f32 {
    while angle >= 180.0 {
        angle -= 360.0;
    }
    while angle < -180.0 {
        angle += 360.0;
    }
    angle
}

/// Unit vector for a heading in degrees (0 = +x, 90 = +y)
#[inline]
pub fn heading_to_vector(degrees: f32) -> Vec2 {
    Vec2::from_angle(degrees.to_radians())
}

/// Heading in degrees of a vector
#[inline]
pub fn vector_to_heading(v: Vec2) -> f32 {
    v.y.atan2(v.x).to_degrees()
}

/// Absolute angle between two vectors, in degrees [0, 180]
pub fn angle_between(a: Vec2, b: Vec2) -> f32 {
    if a.length_squared() == 0.0 || b.length_squared() == 0.0 {
        return 0.0;
    }
    normalize_degrees(vector_to_heading(b) - vector_to_heading(a)).abs()
}

/// Turn `current` toward `target` (degrees) by at most `max_step`
pub fn turn_toward(current: f32, target: f32, max_step: f32) -> f32 {
    let delta = normalize_degrees(target - current);
    let step = delta.clamp(-max_step, max_step);
    normalize_degrees(current + step)
}

/// Tile coordinate containing a world position
#[inline]
pub fn tile_of(pos: Vec2) -> IVec2 {
    pos.floor().as_ivec2()
}

/// World-space center of a tile
#[inline]
pub fn tile_center(coord: IVec2) -> Vec2 {
    coord.as_vec2() + Vec2::splat(0.5)
}
