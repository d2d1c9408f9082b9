//! Tile-traversal raycasting
//!
//! Grid DDA: the ray steps from tile to tile, always crossing whichever grid
//! line (vertical or horizontal) is nearer, and stops on the first solid tile
//! or once it has travelled `max_distance`.

use glam::{IVec2, Vec2};

use crate::consts::RAY_AXIS_DISABLED;
use crate::tile_of;

/// Outcome of a raycast
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Whether a solid tile stopped the ray
    pub hit: bool,
    /// Impact point, or the ray's end point on a miss
    pub point: Vec2,
    /// Distance travelled to `point`
    pub distance: f32,
    /// Unit surface normal on impact, zero on a miss
    pub normal: Vec2,
    /// Tile that stopped the ray
    pub tile: Option<IVec2>,
}

impl RayHit {
    fn miss(origin: Vec2, direction: Vec2, max_distance: f32) -> Self {
        Self {
            hit: false,
            point: origin + direction * max_distance,
            distance: max_distance,
            normal: Vec2::ZERO,
            tile: None,
        }
    }
}

/// Forward distance to the first grid-line crossing and the per-crossing
/// increment along one axis
#[inline]
fn axis_setup(origin: f32, cell: i32, dir: f32, max_distance: f32) -> (f32, f32, i32) {
    if dir > 0.0 {
        ((cell as f32 + 1.0 - origin) / dir, 1.0 / dir, 1)
    } else if dir < 0.0 {
        ((origin - cell as f32) / -dir, -1.0 / dir, -1)
    } else {
        (max_distance + RAY_AXIS_DISABLED, 0.0, 0)
    }
}

/// Cast a ray through the tile grid.
///
/// `direction` must be normalized. `is_solid` decides which tiles stop the
/// ray. A ray that starts inside a solid tile impacts at distance zero with a
/// normal pointing back along the ray.
pub fn cast_ray<F>(origin: Vec2, direction: Vec2, max_distance: f32, is_solid: F) -> RayHit
where
    F: Fn(IVec2) -> bool,
{
    let mut cell = tile_of(origin);

    if is_solid(cell) {
        return RayHit {
            hit: true,
            point: origin,
            distance: 0.0,
            normal: -direction,
            tile: Some(cell),
        };
    }

    let (mut next_x, delta_x, step_x) = axis_setup(origin.x, cell.x, direction.x, max_distance);
    let (mut next_y, delta_y, step_y) = axis_setup(origin.y, cell.y, direction.y, max_distance);

    loop {
        let (distance, normal) = if next_x < next_y {
            let d = next_x;
            cell.x += step_x;
            next_x += delta_x;
            (d, Vec2::new(-step_x as f32, 0.0))
        } else {
            let d = next_y;
            cell.y += step_y;
            next_y += delta_y;
            (d, Vec2::new(0.0, -step_y as f32))
        };

        if distance > max_distance {
            return RayHit::miss(origin, direction, max_distance);
        }

        if is_solid(cell) {
            return RayHit {
                hit: true,
                point: origin + direction * distance,
                distance,
                normal,
                tile: Some(cell),
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn single_wall(wall: IVec2) -> impl Fn(IVec2) -> bool {
        move |c| c == wall
    }

    #[test]
    fn test_open_ray_reaches_endpoint() {
        let origin = Vec2::new(5.5, 5.5);
        let dir = Vec2::new(1.0, 1.0).normalize();
        let hit = cast_ray(origin, dir, 3.0, |_| false);

        assert!(!hit.hit);
        assert!((hit.point - (origin + dir * 3.0)).length() < 1e-4);
        assert_eq!(hit.distance, 3.0);
    }

    #[test]
    fn test_adjacent_wall_hits_immediately() {
        let origin = Vec2::new(1.999, 1.5);
        let hit = cast_ray(origin, Vec2::X, 10.0, single_wall(IVec2::new(2, 1)));

        assert!(hit.hit);
        assert!(hit.distance < 0.01);
        assert_eq!(hit.normal, Vec2::new(-1.0, 0.0));
        assert_eq!(hit.tile, Some(IVec2::new(2, 1)));
    }

    #[test]
    fn test_start_inside_solid() {
        let origin = Vec2::new(2.5, 1.5);
        let dir = Vec2::new(0.0, -1.0);
        let hit = cast_ray(origin, dir, 10.0, single_wall(IVec2::new(2, 1)));

        assert!(hit.hit);
        assert_eq!(hit.distance, 0.0);
        assert_eq!(hit.point, origin);
        assert_eq!(hit.normal, Vec2::new(0.0, 1.0));
    }

    #[test]
    fn test_hit_normal_on_vertical_travel() {
        // Moving down (+y) into a wall three tiles below
        let origin = Vec2::new(4.5, 1.5);
        let hit = cast_ray(origin, Vec2::Y, 10.0, single_wall(IVec2::new(4, 4)));

        assert!(hit.hit);
        assert!((hit.distance - 2.5).abs() < 1e-5);
        assert!((hit.point - Vec2::new(4.5, 4.0)).length() < 1e-5);
        assert_eq!(hit.normal, Vec2::new(0.0, -1.0));
    }

    #[test]
    fn test_wall_beyond_range_is_missed() {
        let origin = Vec2::new(0.5, 0.5);
        let hit = cast_ray(origin, Vec2::X, 2.0, single_wall(IVec2::new(5, 0)));
        assert!(!hit.hit);
        assert!((hit.point - Vec2::new(2.5, 0.5)).length() < 1e-5);
    }

    #[test]
    fn test_diagonal_hits_corner_tile() {
        let origin = Vec2::new(0.5, 0.5);
        let dir = Vec2::new(1.0, 1.0).normalize();
        let hit = cast_ray(origin, dir, 10.0, single_wall(IVec2::new(3, 3)));
        assert!(hit.hit);
        assert_eq!(hit.tile, Some(IVec2::new(3, 3)));
    }

    proptest! {
        #[test]
        fn prop_unobstructed_ray_ends_at_origin_plus_length(
            ox in -50.0f32..50.0,
            oy in -50.0f32..50.0,
            angle in 0.0f32..360.0,
            length in 0.0f32..40.0,
        ) {
            let origin = Vec2::new(ox, oy);
            let dir = crate::heading_to_vector(angle);
            let hit = cast_ray(origin, dir, length, |_| false);

            prop_assert!(!hit.hit);
            prop_assert!((hit.point - (origin + dir * length)).length() < 1e-3);
        }
    }
}
