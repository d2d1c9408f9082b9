//! Rendering glue
//!
//! The core never talks to a GPU. It builds triangle lists and hands them to
//! a [`Renderer`] backend in layers: tiles, entities, lasers, explosions and
//! the fade overlay.

pub mod shapes;
pub mod vertex;

use glam::{IVec2, Vec2};

pub use vertex::{Vertex, colors};

use crate::sim::{Map, Species, behavior};

/// Textures the core binds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureId {
    /// Tile atlas
    Tiles,
    /// Species sprite atlas
    Sprites,
    /// Plain white, for untextured shapes
    White,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendMode {
    Alpha,
    Additive,
}

/// Backend the host implements
pub trait Renderer {
    fn clear(&mut self, color: [f32; 4]);
    /// Orthographic view over the world rectangle `[min, max]`
    fn begin_camera(&mut self, min: Vec2, max: Vec2);
    fn end_camera(&mut self);
    fn bind_texture(&mut self, texture: TextureId);
    fn set_blend(&mut self, mode: BlendMode);
    fn draw_triangles(&mut self, vertices: &[Vertex]);
}

const EXPLOSION_SEGMENTS: u32 = 16;

/// Submit one frame of the map
pub fn render_map(map: &Map, renderer: &mut impl Renderer) {
    let (view_min, view_max) = map.camera.view_rect();
    let mut batch: Vec<Vertex> = Vec::new();

    renderer.clear(colors::BACKGROUND);
    renderer.begin_camera(view_min, view_max);
    renderer.set_blend(BlendMode::Alpha);

    // Tiles in view, sealed pockets shaded
    let first = view_min.floor().as_ivec2().max(IVec2::ZERO);
    let last = view_max.ceil().as_ivec2();
    for tile in map.grid.tiles() {
        let c = tile.coord();
        if c.x < first.x || c.y < first.y || c.x > last.x || c.y > last.y {
            continue;
        }
        let def = tile.def();
        let mut tint = def.tint;
        if def.destructible && def.max_health > 0 {
            let wear = tile.health as f32 / def.max_health as f32;
            tint[0] *= 0.6 + 0.4 * wear;
            tint[1] *= 0.6 + 0.4 * wear;
            tint[2] *= 0.6 + 0.4 * wear;
        }
        let (min, max) = tile.bounds();
        shapes::quad(min, max, def.uv, tint, &mut batch);
    }
    flush(renderer, TextureId::Tiles, &mut batch);

    for c in sealed_tiles(map, first, last) {
        let min = c.as_vec2();
        shapes::quad(min, min + Vec2::ONE, [0.0; 4], colors::SEALED, &mut batch);
    }
    flush(renderer, TextureId::White, &mut batch);

    for (_, entity) in map.registry.iter() {
        if entity.is_alive() {
            (behavior(entity.species).render)(entity, &mut batch);
        }
    }
    flush(renderer, TextureId::Sprites, &mut batch);

    renderer.set_blend(BlendMode::Additive);
    for turret in map.registry.of_species(Species::Scorpio) {
        if let (true, Some(end)) = (turret.is_alive(), turret.laser_end) {
            shapes::line(turret.pos, end, 0.05, colors::LASER, &mut batch);
        }
    }
    for explosion in map.explosions.iter() {
        let t = explosion.progress();
        let mut color = colors::EXPLOSION;
        color[3] = 1.0 - t;
        shapes::circle(
            explosion.pos,
            explosion.radius * (0.5 + 0.5 * t),
            color,
            EXPLOSION_SEGMENTS,
            &mut batch,
        );
    }
    flush(renderer, TextureId::White, &mut batch);

    let alpha = map.fade.overlay_alpha(map.tuning.fade.duration);
    if alpha > 0.0 {
        renderer.set_blend(BlendMode::Alpha);
        let mut color = colors::FADE;
        color[3] = alpha;
        shapes::quad(view_min, view_max, [0.0; 4], color, &mut batch);
        flush(renderer, TextureId::White, &mut batch);
    }

    renderer.end_camera();
}

/// Open interior tiles in view that the entry can never reach
fn sealed_tiles(map: &Map, first: IVec2, last: IVec2) -> impl Iterator<Item = IVec2> + '_ {
    map.grid
        .tiles()
        .map(|t| t.coord())
        .filter(move |c| c.x >= first.x && c.y >= first.y && c.x <= last.x && c.y <= last.y)
        .filter(move |c| map.grid.is_interior(*c))
        .filter(move |c| map.open_map.get(*c) != 0.0 && !map.grid.blocks_sight(*c))
}

fn flush(renderer: &mut impl Renderer, texture: TextureId, batch: &mut Vec<Vertex>) {
    if batch.is_empty() {
        return;
    }
    renderer.bind_texture(texture);
    renderer.draw_triangles(batch);
    batch.clear();
}
