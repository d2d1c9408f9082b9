//! Shape generation for 2D primitives
//!
//! Builders append triangle-list vertices to a caller-owned buffer so a
//! whole layer can be submitted with one draw call.

use glam::Vec2;
use std::f32::consts::TAU;

use super::vertex::Vertex;

/// Axis-aligned textured quad over `[min, max]`; `uv` is (u0, v0, u1, v1)
pub fn quad(min: Vec2, max: Vec2, uv: [f32; 4], color: [f32; 4], out: &mut Vec<Vertex>) {
    let [u0, v0, u1, v1] = uv;
    let a = Vertex::new(min.x, min.y, u0, v0, color);
    let b = Vertex::new(max.x, min.y, u1, v0, color);
    let c = Vertex::new(max.x, max.y, u1, v1, color);
    let d = Vertex::new(min.x, max.y, u0, v1, color);
    out.extend_from_slice(&[a, b, c, a, c, d]);
}

/// Textured quad of half-size `half` rotated by `degrees` around `center`
pub fn rotated_quad(
    center: Vec2,
    half: Vec2,
    degrees: f32,
    uv: [f32; 4],
    color: [f32; 4],
    out: &mut Vec<Vertex>,
) {
    let [u0, v0, u1, v1] = uv;
    let rot = Vec2::from_angle(degrees.to_radians());
    let corner = |x: f32, y: f32, u: f32, v: f32| {
        let p = center + rot.rotate(Vec2::new(x, y));
        Vertex::new(p.x, p.y, u, v, color)
    };
    let a = corner(-half.x, -half.y, u0, v0);
    let b = corner(half.x, -half.y, u1, v0);
    let c = corner(half.x, half.y, u1, v1);
    let d = corner(-half.x, half.y, u0, v1);
    out.extend_from_slice(&[a, b, c, a, c, d]);
}

/// Untextured segment of the given width
pub fn line(from: Vec2, to: Vec2, width: f32, color: [f32; 4], out: &mut Vec<Vertex>) {
    let dir = (to - from).normalize_or_zero();
    if dir == Vec2::ZERO {
        return;
    }
    // Perpendicular for width
    let perp = Vec2::new(-dir.y, dir.x) * (width * 0.5);

    let a = from + perp;
    let b = from - perp;
    let c = to + perp;
    let d = to - perp;
    out.extend_from_slice(&[
        Vertex::solid(a.x, a.y, color),
        Vertex::solid(b.x, b.y, color),
        Vertex::solid(c.x, c.y, color),
        Vertex::solid(c.x, c.y, color),
        Vertex::solid(b.x, b.y, color),
        Vertex::solid(d.x, d.y, color),
    ]);
}

/// Filled circle as a triangle fan
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32, out: &mut Vec<Vertex>) {
    out.reserve((segments * 3) as usize);
    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * TAU;
        let theta2 = ((i + 1) as f32 / segments as f32) * TAU;
        let p1 = center + Vec2::from_angle(theta1) * radius;
        let p2 = center + Vec2::from_angle(theta2) * radius;

        // Triangle from center to edge
        out.push(Vertex::solid(center.x, center.y, color));
        out.push(Vertex::solid(p1.x, p1.y, color));
        out.push(Vertex::solid(p2.x, p2.y, color));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quad_covers_bounds() {
        let mut out = Vec::new();
        quad(Vec2::ZERO, Vec2::ONE, [0.0, 0.0, 1.0, 1.0], [1.0; 4], &mut out);
        assert_eq!(out.len(), 6);
        assert!(out.iter().any(|v| v.position == [1.0, 1.0] && v.uv == [1.0, 1.0]));
    }

    #[test]
    fn test_rotated_quad_quarter_turn() {
        let mut out = Vec::new();
        rotated_quad(Vec2::ZERO, Vec2::new(2.0, 1.0), 90.0, [0.0; 4], [1.0; 4], &mut out);
        // Long axis now runs along y
        let max_y = out.iter().map(|v| v.position[1]).fold(f32::MIN, f32::max);
        let max_x = out.iter().map(|v| v.position[0]).fold(f32::MIN, f32::max);
        assert!((max_y - 2.0).abs() < 1e-5);
        assert!((max_x - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_degenerate_line_emits_nothing() {
        let mut out = Vec::new();
        line(Vec2::ONE, Vec2::ONE, 0.1, [1.0; 4], &mut out);
        assert!(out.is_empty());
        line(Vec2::ZERO, Vec2::X, 0.2, [1.0; 4], &mut out);
        assert_eq!(out.len(), 6);
    }

    #[test]
    fn test_circle_vertex_count() {
        let mut out = Vec::new();
        circle(Vec2::ZERO, 1.0, [1.0; 4], 12, &mut out);
        assert_eq!(out.len(), 36);
    }
}
