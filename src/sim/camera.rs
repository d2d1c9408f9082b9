//! Orthographic follow camera with screen shake

use glam::Vec2;
use rand::Rng;

/// Camera view over the map
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Point the camera follows (before shake)
    pub focus: Vec2,
    pub half_extents: Vec2,
    /// Random offset applied this frame
    pub shake_offset: Vec2,
    view_min: Vec2,
    view_max: Vec2,
}

impl Camera {
    pub fn new(focus: Vec2, half_extents: Vec2) -> Self {
        Self {
            focus,
            half_extents,
            shake_offset: Vec2::ZERO,
            view_min: focus - half_extents,
            view_max: focus + half_extents,
        }
    }

    /// Recenter on `focus`, jitter by `shake` world units and clamp the view
    /// rectangle to `[0, map_size]`
    pub fn update<R: Rng>(&mut self, focus: Vec2, shake: f32, map_size: Vec2, rng: &mut R) {
        self.focus = focus;
        self.shake_offset = if shake > 0.0 {
            let angle = rng.random_range(0.0..std::f32::consts::TAU);
            Vec2::from_angle(angle) * shake * rng.random_range(0.0..=1.0f32)
        } else {
            Vec2::ZERO
        };

        let center = focus + self.shake_offset;
        let mut min = center - self.half_extents;
        let size = self.half_extents * 2.0;

        for axis in 0..2 {
            if size[axis] >= map_size[axis] {
                // View wider than the map: center it
                min[axis] = (map_size[axis] - size[axis]) * 0.5;
            } else {
                min[axis] = min[axis].clamp(0.0, map_size[axis] - size[axis]);
            }
        }

        self.view_min = min;
        self.view_max = min + size;
    }

    /// Visible rectangle as (min, max)
    pub fn view_rect(&self) -> (Vec2, Vec2) {
        (self.view_min, self.view_max)
    }

    pub fn view_center(&self) -> Vec2 {
        (self.view_min + self.view_max) * 0.5
    }
}
