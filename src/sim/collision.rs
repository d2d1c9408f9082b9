//! Disc collision and push-out
//!
//! Entities collide as discs; tiles are unit boxes. These helpers report the
//! contact and the normal to push along, and leave applying the push to the
//! pipeline.

use glam::Vec2;

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether the shapes overlap
    pub hit: bool,
    /// Contact point on the other shape's surface
    pub point: Vec2,
    /// Unit normal pointing from the other shape toward the disc
    pub normal: Vec2,
    /// Overlap depth along `normal`
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vec2::ZERO,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// True when two discs overlap
#[inline]
pub fn discs_overlap(a: Vec2, a_radius: f32, b: Vec2, b_radius: f32) -> bool {
    let reach = a_radius + b_radius;
    a.distance_squared(b) < reach * reach
}

#[inline]
pub fn point_in_disc(point: Vec2, center: Vec2, radius: f32) -> bool {
    point.distance_squared(center) <= radius * radius
}

/// Collision of disc `a` against disc `b`; the normal points from `b` to `a`.
///
/// Coincident centers separate along +x so the push is never NaN.
pub fn disc_disc(a: Vec2, a_radius: f32, b: Vec2, b_radius: f32) -> CollisionResult {
    if !discs_overlap(a, a_radius, b, b_radius) {
        return CollisionResult::miss();
    }

    let offset = a - b;
    let dist = offset.length();
    let normal = if dist > 1e-6 { offset / dist } else { Vec2::X };

    CollisionResult {
        hit: true,
        point: b + normal * b_radius,
        normal,
        penetration: a_radius + b_radius - dist,
    }
}

/// Collision of a disc against an axis-aligned box `[min, max]`; the normal
/// points from the box toward the disc.
pub fn disc_box(center: Vec2, radius: f32, min: Vec2, max: Vec2) -> CollisionResult {
    let closest = center.clamp(min, max);
    let offset = center - closest;
    let dist_sq = offset.length_squared();

    if dist_sq > 1e-12 {
        if dist_sq >= radius * radius {
            return CollisionResult::miss();
        }
        let dist = dist_sq.sqrt();
        return CollisionResult {
            hit: true,
            point: closest,
            normal: offset / dist,
            penetration: radius - dist,
        };
    }

    // Center inside the box: leave through the nearest face
    let to_min = center - min;
    let to_max = max - center;
    let faces = [
        (to_min.x, Vec2::NEG_X),
        (to_max.x, Vec2::X),
        (to_min.y, Vec2::NEG_Y),
        (to_max.y, Vec2::Y),
    ];
    let (depth, normal) = faces
        .into_iter()
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .unwrap_or((0.0, Vec2::X));

    CollisionResult {
        hit: true,
        point: center + normal * depth,
        normal,
        penetration: depth + radius,
    }
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disc_disc_overlap() {
        let result = disc_disc(Vec2::new(1.5, 0.0), 1.0, Vec2::ZERO, 1.0);
        assert!(result.hit);
        assert_eq!(result.normal, Vec2::X);
        assert!((result.penetration - 0.5).abs() < 1e-6);

        let miss = disc_disc(Vec2::new(3.0, 0.0), 1.0, Vec2::ZERO, 1.0);
        assert!(!miss.hit);
    }

    #[test]
    fn test_disc_disc_coincident_centers() {
        let result = disc_disc(Vec2::ONE, 0.5, Vec2::ONE, 0.5);
        assert!(result.hit);
        assert_eq!(result.normal, Vec2::X);
        assert!((result.penetration - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_disc_box_side_contact() {
        // Disc left of a unit box at (2,0)-(3,1), overlapping by 0.1
        let result = disc_box(Vec2::new(1.7, 0.5), 0.4, Vec2::new(2.0, 0.0), Vec2::new(3.0, 1.0));
        assert!(result.hit);
        assert_eq!(result.normal, Vec2::NEG_X);
        assert!((result.penetration - 0.1).abs() < 1e-5);
    }

    #[test]
    fn test_disc_box_corner_miss() {
        // Near a corner but outside the rounded reach
        let result = disc_box(Vec2::new(1.7, -0.3), 0.4, Vec2::new(2.0, 0.0), Vec2::new(3.0, 1.0));
        assert!(!result.hit);
    }

    #[test]
    fn test_disc_box_center_inside() {
        let result = disc_box(Vec2::new(2.1, 0.5), 0.3, Vec2::new(2.0, 0.0), Vec2::new(3.0, 1.0));
        assert!(result.hit);
        assert_eq!(result.normal, Vec2::NEG_X);
        assert!((result.penetration - 0.4).abs() < 1e-5);
    }

    #[test]
    fn test_reflect_velocity() {
        // Moving right, hits vertical wall (normal pointing left)
        let velocity = Vec2::new(100.0, 0.0);
        let normal = Vec2::new(-1.0, 0.0);

        let reflected = reflect_velocity(velocity, normal);
        assert!((reflected.x - (-100.0)).abs() < 0.001);
        assert!(reflected.y.abs() < 0.001);
    }

    #[test]
    fn test_point_in_disc() {
        assert!(point_in_disc(Vec2::new(0.5, 0.0), Vec2::ZERO, 0.5));
        assert!(!point_in_disc(Vec2::new(0.6, 0.0), Vec2::ZERO, 0.5));
    }
}
