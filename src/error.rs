//! Error types for fatal content and configuration problems.
//!
//! Per-frame simulation never fails: out-of-bounds lookups and actions on
//! dead entities are no-ops. These variants are the conditions the host is
//! expected to treat as unrecoverable.

use thiserror::Error;

/// Result type alias using [`ArenaError`].
pub type Result<T> = std::result::Result<T, ArenaError>;

/// Top-level error type for the arena core.
#[derive(Debug, Error)]
pub enum ArenaError {
    /// No solvable layout was produced within the attempt budget.
    #[error("Map generation failed: no solvable layout after {attempts} attempts")]
    GenerationExhausted {
        /// Number of layouts tried.
        attempts: u32,
    },

    /// The entity factory was asked for a type it does not know.
    #[error("Unknown entity type: {0}")]
    UnknownEntityType(String),

    /// A stamping image does not fit on the map.
    #[error(
        "Stamp image {image_width}x{image_height} exceeds map size {map_width}x{map_height}"
    )]
    StampTooLarge {
        /// Image width in pixels.
        image_width: u32,
        /// Image height in pixels.
        image_height: u32,
        /// Map width in tiles.
        map_width: i32,
        /// Map height in tiles.
        map_height: i32,
    },

    /// Map dimensions cannot hold both corner rooms.
    #[error("Map {width}x{height} is smaller than the {min}x{min} minimum")]
    MapTooSmall {
        /// Requested width.
        width: i32,
        /// Requested height.
        height: i32,
        /// Minimum side length.
        min: i32,
    },

    /// Tuning JSON could not be parsed.
    #[error("Invalid tuning data: {0}")]
    Config(#[from] serde_json::Error),
}
