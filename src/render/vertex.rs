//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Textured, tinted 2D vertex in world units
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, u: f32, v: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            uv: [u, v],
            color,
        }
    }

    /// Untextured vertex (samples the atlas' white texel)
    pub const fn solid(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self::new(x, y, 0.0, 0.0, color)
    }

    /// Raw bytes for uploading a vertex list
    pub fn as_bytes(vertices: &[Vertex]) -> &[u8] {
        bytemuck::cast_slice(vertices)
    }
}

/// Colors for non-textured elements
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [0.02, 0.02, 0.05, 1.0];
    pub const LASER: [f32; 4] = [1.0, 0.15, 0.1, 0.8];
    pub const EXPLOSION: [f32; 4] = [1.0, 0.6, 0.2, 1.0];
    pub const FADE: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    pub const SEALED: [f32; 4] = [0.0, 0.0, 0.0, 0.35];
}
