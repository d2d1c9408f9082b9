//! Species behavior table
//!
//! Every species shares the [`Entity`] record; what differs is looked up
//! here as a row of plain function pointers (update, hit reaction, death,
//! render). The pipeline lifts an entity out of the registry before calling
//! into its row, so a behavior gets the entity and the rest of the map as
//! two separate mutable borrows.

use glam::Vec2;
use rand::Rng;

use super::collision::{discs_overlap, reflect_velocity};
use super::entity::{AiState, Entity, Species, create_entity};
use super::heat_map::HeatMap;
use super::map::{GameEvent, Map};
use super::pathfind::{extract_path, propagate};
use super::registry::EntityId;
use crate::audio::SoundEffect;
use crate::render::{Vertex, shapes};
use crate::{angle_between, tile_center, tile_of, turn_toward, vector_to_heading};

/// How an actor answered a projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitReaction {
    /// Took the damage; the projectile is spent
    Damaged,
    /// Swallowed the projectile without harm
    Absorbed,
    /// Sent the projectile back; it now belongs to the actor's faction
    Reflected,
}

pub type UpdateFn = fn(&mut Entity, EntityId, &mut Map, f32);
pub type HitFn = fn(&mut Entity, &mut Entity, &mut Map) -> HitReaction;
pub type DeathFn = fn(&Entity, &mut Map);
pub type RenderFn = fn(&Entity, &mut Vec<Vertex>);

/// Capability row for one species
#[derive(Clone, Copy)]
pub struct Behavior {
    pub update: UpdateFn,
    /// Actor hit by a projectile: (actor, projectile, map)
    pub on_hit: HitFn,
    pub on_death: DeathFn,
    pub render: RenderFn,
}

const PLAYER: Behavior = Behavior {
    update: update_player,
    on_hit: hit_take_damage,
    on_death: death_player,
    render: render_player,
};

const BULLET: Behavior = Behavior {
    update: update_bullet,
    on_hit: hit_take_damage,
    on_death: death_quiet,
    render: render_bullet,
};

const SCORPIO: Behavior = Behavior {
    update: update_scorpio,
    on_hit: hit_take_damage,
    on_death: death_enemy,
    render: render_scorpio,
};

const LEO: Behavior = Behavior {
    update: update_leo,
    on_hit: hit_take_damage,
    on_death: death_enemy,
    render: render_enemy,
};

const ARIES: Behavior = Behavior {
    update: update_ranged,
    on_hit: hit_aries,
    on_death: death_enemy,
    render: render_enemy,
};

const CAPRICORN: Behavior = Behavior {
    update: update_ranged,
    on_hit: hit_capricorn,
    on_death: death_enemy,
    render: render_enemy,
};

/// Behavior row for a species
pub fn behavior(species: Species) -> &'static Behavior {
    match species {
        Species::Player => &PLAYER,
        Species::Bullet => &BULLET,
        Species::Scorpio => &SCORPIO,
        Species::Leo => &LEO,
        Species::Aries => &ARIES,
        Species::Capricorn => &CAPRICORN,
    }
}

/// Subtract health and run the death hook the first time it hits zero
pub fn apply_damage(entity: &mut Entity, amount: f32, map: &mut Map) {
    if !entity.is_alive() {
        return;
    }
    entity.health -= amount;
    if entity.health <= 0.0 {
        kill(entity, map);
    }
}

/// Mark for the sweep and run the species death hook
pub fn kill(entity: &mut Entity, map: &mut Map) {
    if entity.garbage {
        return;
    }
    entity.garbage = true;
    (behavior(entity.species).on_death)(entity, map);
}

/// Damage an entity that is still filed in the registry
pub fn damage_entity(map: &mut Map, id: EntityId, amount: f32) {
    let Some(mut target) = map.registry.take(id) else {
        return;
    };
    apply_damage(&mut target, amount, map);
    map.registry.restore(id, target);
}

fn tick_reload(entity: &mut Entity, dt: f32) {
    entity.reload = (entity.reload - dt).max(0.0);
}

/// Queue a bullet leaving the shooter's muzzle along its facing
fn fire_bullet(shooter: &Entity, map: &mut Map, sound: SoundEffect) {
    let muzzle = shooter.pos + shooter.facing() * (shooter.physics_radius + map.tuning.bullet.radius);
    let mut bullet = create_entity(Species::Bullet, muzzle, shooter.orientation, &map.tuning);
    bullet.faction = shooter.faction;
    map.queue_spawn(bullet);
    map.play(sound);
}

/// Whether `target` lies inside the shooter's aperture cone
fn in_aperture(shooter: &Entity, target: Vec2, aperture: f32) -> bool {
    angle_between(shooter.facing(), target - shooter.pos) <= aperture * 0.5
}

// --- updates ---

fn update_player(player: &mut Entity, _id: EntityId, map: &mut Map, dt: f32) {
    tick_reload(player, dt);
    if map.fade.is_active() {
        player.vel = Vec2::ZERO;
        return;
    }

    let tuning = map.tuning.player.clone();
    let input = map.input.clone();
    player.vel = input.move_dir.normalize_or_zero() * tuning.speed;
    player.pos += player.vel * dt;
    player.orientation = crate::normalize_degrees(input.aim_deg);

    if input.fire && player.reload <= 0.0 {
        fire_bullet(player, map, SoundEffect::PlayerShoot);
        player.reload = tuning.reload;
    }
}

fn update_bullet(bullet: &mut Entity, _id: EntityId, map: &mut Map, dt: f32) {
    bullet.lifetime -= dt;
    if bullet.lifetime <= 0.0 {
        bullet.garbage = true;
        return;
    }

    let motion = bullet.vel * dt;
    let length = motion.length();
    if length <= 0.0 {
        return;
    }

    let ray = map.cast_ray(bullet.pos, motion / length, length);
    if !ray.hit {
        bullet.pos = ray.point;
        return;
    }

    bullet.pos = ray.point;
    bullet.garbage = true;
    if let Some(coord) = ray.tile {
        let damage = map.tuning.bullet.tile_damage;
        if let Some(tile) = map.grid.tile_at_mut(coord) {
            tile.damage(damage);
        }
    }
    map.spawn_explosion(ray.point, bullet.cosmetic_radius);
    map.play(SoundEffect::WallHit);
}

fn update_scorpio(turret: &mut Entity, _id: EntityId, map: &mut Map, dt: f32) {
    tick_reload(turret, dt);
    let tuning = map.tuning.scorpio.clone();
    let sighted = turret.ai.as_ref().is_some_and(|ai| ai.has_sight);

    if let (true, Some(target)) = (sighted, map.player_pos()) {
        let heading = vector_to_heading(target - turret.pos);
        turret.orientation = turn_toward(turret.orientation, heading, tuning.turn_rate * dt);

        if turret.reload <= 0.0 && in_aperture(turret, target, tuning.aperture) {
            fire_bullet(turret, map, SoundEffect::EnemyShoot);
            turret.reload = tuning.reload;
        }
    }

    let laser = map.cast_ray(turret.pos, turret.facing(), tuning.laser_range);
    turret.laser_end = Some(laser.point);
}

fn update_leo(leo: &mut Entity, _id: EntityId, map: &mut Map, dt: f32) {
    tick_reload(leo, dt);
    navigate(leo, map, dt, true);

    let Some(player_id) = map.player else {
        return;
    };
    let Some(player) = map.registry.get(player_id).filter(|p| p.is_alive()) else {
        return;
    };
    // Contact plus a small reach margin so separation never keeps them apart
    let reach = leo.physics_radius * 0.25;
    if leo.reload <= 0.0 && discs_overlap(leo.pos, leo.physics_radius + reach, player.pos, player.physics_radius) {
        let damage = leo.damage;
        leo.reload = map.tuning.leo.reload;
        map.play(SoundEffect::Bite);
        damage_entity(map, player_id, damage);
    }
}

/// Aries and Capricorn: pursue, keep facing a sighted player, fire in aperture
fn update_ranged(enemy: &mut Entity, _id: EntityId, map: &mut Map, dt: f32) {
    tick_reload(enemy, dt);
    let sighted = enemy.ai.as_ref().is_some_and(|ai| ai.has_sight);
    navigate(enemy, map, dt, !sighted);

    let (true, Some(target)) = (sighted, map.player_pos()) else {
        return;
    };
    let tuning = map.tuning.actor(enemy.species).clone();
    let heading = vector_to_heading(target - enemy.pos);
    enemy.orientation = turn_toward(enemy.orientation, heading, tuning.turn_rate * dt);

    if enemy.reload <= 0.0 && in_aperture(enemy, target, tuning.aperture) {
        fire_bullet(enemy, map, SoundEffect::EnemyShoot);
        enemy.reload = tuning.reload;
    }
}

// --- pursuit / wander ---

/// Shared state machine: Pursuing follows a path to the target, Wandering
/// picks random reachable targets whenever its path runs out.
fn navigate(entity: &mut Entity, map: &mut Map, dt: f32, face_movement: bool) {
    let Some(mut ai) = entity.ai.take() else {
        return;
    };

    if ai.pursuing {
        if entity.pos.distance(ai.target) <= entity.physics_radius {
            ai.pursuing = false;
            ai.path.clear();
            ai.last_target = None;
        } else if ai.last_target.map(tile_of) != Some(tile_of(ai.target)) && !plan_path(entity, &mut ai, map) {
            log::debug!("{} lost its route to the target", entity.species.name());
            ai.pursuing = false;
        }
    } else if ai.path.is_empty() {
        pick_wander_target(entity, &mut ai, map);
    }

    steer(entity, &mut ai, map, dt, face_movement);
    entity.ai = Some(ai);
}

/// Recompute the entity's distance field and path toward `ai.target`
fn plan_path(entity: &Entity, ai: &mut AiState, map: &Map) -> bool {
    refresh_field(entity, ai, map);
    route_to_target(ai)
}

/// Flood the cached field from the entity's tile
fn refresh_field(entity: &Entity, ai: &mut AiState, map: &Map) {
    let (width, height) = (map.grid.width(), map.grid.height());
    let mut field = ai
        .field
        .take()
        .filter(|f| f.width() == width && f.height() == height)
        .unwrap_or_else(|| HeatMap::new(width, height));

    let solid = map.entity_solidity(entity.traversal());
    propagate(&mut field, tile_of(entity.pos), map.tuning.ai.path_cost_budget, solid);
    ai.field = Some(field);
}

/// Rebuild the waypoint queue from the cached field
fn route_to_target(ai: &mut AiState) -> bool {
    let route = ai
        .field
        .as_ref()
        .and_then(|field| extract_path(field, tile_of(ai.target)));
    ai.last_target = Some(ai.target);

    ai.path.clear();
    match route {
        Some(tiles) => {
            // First tile is the one we stand on
            ai.path.extend(tiles.into_iter().skip(1).map(tile_center));
            if let Some(last) = ai.path.back_mut() {
                *last = ai.target;
            }
            true
        }
        None => false,
    }
}

const WANDER_TRIES: usize = 16;

/// Try random open tiles against a single flood from the entity's tile
fn pick_wander_target(entity: &Entity, ai: &mut AiState, map: &mut Map) {
    let traversal = entity.traversal();
    let (width, height) = (map.grid.width(), map.grid.height());
    if width < 3 || height < 3 {
        return;
    }
    let mut flooded = false;
    for _ in 0..WANDER_TRIES {
        let coord = glam::IVec2::new(
            map.rng.random_range(1..width - 1),
            map.rng.random_range(1..height - 1),
        );
        let open = map.open_map.get(coord) == 0.0;
        let passable = map.tile_at(coord).is_some_and(|t| !t.blocks(traversal));
        if !open || !passable {
            continue;
        }
        if !flooded {
            refresh_field(entity, ai, map);
            flooded = true;
        }
        ai.target = tile_center(coord);
        if route_to_target(ai) {
            return;
        }
    }
}

/// Move toward the next waypoint, consuming at most one per frame
fn steer(entity: &mut Entity, ai: &mut AiState, map: &Map, dt: f32, face_movement: bool) {
    let tuning = map.tuning.actor(entity.species);
    let waypoint = match ai.path.front() {
        Some(point) => *point,
        None if ai.pursuing => ai.target,
        None => {
            entity.vel = Vec2::ZERO;
            return;
        }
    };

    let offset = waypoint - entity.pos;
    let distance = offset.length();
    if distance <= map.tuning.ai.arrival_radius {
        ai.path.pop_front();
        entity.vel = Vec2::ZERO;
        return;
    }

    let direction = offset / distance;
    entity.vel = direction * tuning.speed;
    entity.pos += direction * (tuning.speed * dt).min(distance);
    if face_movement {
        entity.orientation = turn_toward(
            entity.orientation,
            vector_to_heading(direction),
            tuning.turn_rate * dt,
        );
    }
}

// --- hit reactions ---

fn hit_take_damage(actor: &mut Entity, bullet: &mut Entity, map: &mut Map) -> HitReaction {
    map.play(SoundEffect::Hit);
    if actor.species == Species::Player {
        map.add_shake(bullet.damage * 0.5);
    }
    apply_damage(actor, bullet.damage, map);
    HitReaction::Damaged
}

/// Bullets striking the front arc bounce back under Aries' control
fn hit_aries(aries: &mut Entity, bullet: &mut Entity, map: &mut Map) -> HitReaction {
    let aperture = map.tuning.aries.aperture;
    if !in_aperture(aries, bullet.pos, aperture) {
        return hit_take_damage(aries, bullet, map);
    }

    let normal = (bullet.pos - aries.pos).normalize_or(aries.facing());
    bullet.vel = reflect_velocity(bullet.vel, normal);
    if bullet.vel.dot(normal) <= 0.0 {
        // Grazing or resting bullets leave straight off the shield
        bullet.vel = normal * map.tuning.bullet.speed;
    }
    bullet.orientation = vector_to_heading(bullet.vel);
    bullet.pos = aries.pos + normal * (aries.physics_radius + bullet.physics_radius);
    bullet.faction = aries.faction;
    bullet.lifetime = map.tuning.bullet.lifetime;
    map.play(SoundEffect::Reflect);
    HitReaction::Reflected
}

/// Underwater Capricorns swallow bullets
fn hit_capricorn(capricorn: &mut Entity, bullet: &mut Entity, map: &mut Map) -> HitReaction {
    let submerged = map.tile_at_pos(capricorn.pos).is_some_and(|t| t.def().water);
    if submerged {
        map.play(SoundEffect::Absorb);
        return HitReaction::Absorbed;
    }
    hit_take_damage(capricorn, bullet, map)
}

// --- deaths ---

fn death_quiet(_entity: &Entity, _map: &mut Map) {}

fn death_enemy(entity: &Entity, map: &mut Map) {
    let tuning = map.tuning.explosion.clone();
    map.spawn_explosion(entity.pos, tuning.radius);
    map.add_shake(tuning.death_shake);
    map.play(SoundEffect::Explosion);
    map.emit(GameEvent::ActorKilled {
        species: entity.species,
        pos: entity.pos,
    });
    log::debug!("{} destroyed at {}", entity.species.name(), entity.pos);
}

fn death_player(entity: &Entity, map: &mut Map) {
    let tuning = map.tuning.explosion.clone();
    map.spawn_explosion(entity.pos, tuning.radius * 2.0);
    map.add_shake(tuning.death_shake * 2.0);
    map.play(SoundEffect::PlayerDeath);
    map.emit(GameEvent::ActorKilled {
        species: entity.species,
        pos: entity.pos,
    });
    map.emit(GameEvent::PlayerDied);
    log::info!("Player died at {}", entity.pos);
}

// --- render hooks ---

/// Sprite atlas cells (u0, v0, u1, v1) per species
fn sprite_uv(species: Species) -> [f32; 4] {
    let column = match species {
        Species::Player => 0.0,
        Species::Bullet => 1.0,
        Species::Scorpio => 2.0,
        Species::Leo => 3.0,
        Species::Aries => 4.0,
        Species::Capricorn => 5.0,
    };
    let cell = 1.0 / 8.0;
    [column * cell, 0.5, (column + 1.0) * cell, 0.5 + cell]
}

fn body_color(entity: &Entity) -> [f32; 4] {
    let health = if entity.max_health > 0.0 {
        (entity.health / entity.max_health).clamp(0.0, 1.0)
    } else {
        1.0
    };
    // Fade toward red as health drops
    [1.0, 0.4 + 0.6 * health, 0.4 + 0.6 * health, 1.0]
}

fn render_player(entity: &Entity, out: &mut Vec<Vertex>) {
    let half = Vec2::splat(entity.cosmetic_radius * entity.scale);
    shapes::rotated_quad(
        entity.pos,
        half,
        entity.orientation,
        sprite_uv(entity.species),
        body_color(entity),
        out,
    );
}

fn render_bullet(entity: &Entity, out: &mut Vec<Vertex>) {
    let half = Vec2::splat(entity.cosmetic_radius);
    shapes::rotated_quad(
        entity.pos,
        half,
        entity.orientation,
        sprite_uv(entity.species),
        [1.0, 1.0, 1.0, 1.0],
        out,
    );
}

fn render_enemy(entity: &Entity, out: &mut Vec<Vertex>) {
    let half = Vec2::splat(entity.cosmetic_radius);
    shapes::rotated_quad(
        entity.pos,
        half,
        entity.orientation,
        sprite_uv(entity.species),
        body_color(entity),
        out,
    );
}

fn render_scorpio(entity: &Entity, out: &mut Vec<Vertex>) {
    render_enemy(entity, out);
    // Barrel
    let tip = entity.pos + entity.facing() * entity.cosmetic_radius * 1.2;
    shapes::line(entity.pos, tip, 0.08, [0.2, 0.2, 0.2, 1.0], out);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::Faction;
    use crate::sim::tile::{TileGrid, TileKind};
    use crate::tuning::Tuning;
    use glam::IVec2;

    fn arena(size: i32) -> Map {
        let mut grid = TileGrid::new(size, size, TileKind::Floor);
        grid.stamp_border(TileKind::Wall);
        Map::from_grid(
            Tuning::default(),
            grid,
            IVec2::ONE,
            IVec2::splat(size - 2),
            5,
        )
    }

    #[test]
    fn test_table_covers_every_species() {
        for species in Species::ALL {
            let row = behavior(species);
            let _ = (row.update, row.on_hit, row.on_death, row.render);
        }
    }

    #[test]
    fn test_player_fires_once_per_reload() {
        let mut map = arena(16);
        map.input.fire = true;
        map.input.aim_deg = 0.0;
        let mut player = create_entity(Species::Player, Vec2::splat(4.5), 0.0, &map.tuning);

        update_player(&mut player, EntityId(0), &mut map, 0.01);
        update_player(&mut player, EntityId(0), &mut map, 0.01);
        assert_eq!(map.pending_len(), 1);

        let ids = map.flush_pending();
        let bullet = map.registry.get(ids[0]).unwrap();
        assert_eq!(bullet.faction, Faction::Good);
        assert!(bullet.pos.x > player.pos.x);
    }

    #[test]
    fn test_player_frozen_during_fade() {
        let mut map = arena(16);
        map.fade.fading_out = true;
        map.input.move_dir = Vec2::X;
        map.input.fire = true;
        let mut player = create_entity(Species::Player, Vec2::splat(4.5), 0.0, &map.tuning);
        update_player(&mut player, EntityId(0), &mut map, 0.1);
        assert_eq!(player.pos, Vec2::splat(4.5));
        assert_eq!(map.pending_len(), 0);
    }

    #[test]
    fn test_bullet_damages_crate_and_despawns() {
        let mut map = arena(16);
        map.grid.set_kind(IVec2::new(6, 4), TileKind::Crate);
        let mut bullet = create_entity(Species::Bullet, Vec2::new(5.8, 4.5), 0.0, &map.tuning);

        update_bullet(&mut bullet, EntityId(0), &mut map, 0.1);
        assert!(bullet.garbage);
        assert!((bullet.pos.x - 6.0).abs() < 1e-4);
        assert_eq!(map.tile_at(IVec2::new(6, 4)).unwrap().health, 2);
        assert_eq!(map.explosions.count(), 1);
    }

    #[test]
    fn test_bullet_flies_over_water_and_expires() {
        let mut map = arena(16);
        map.grid.set_kind(IVec2::new(5, 4), TileKind::Water);
        let mut bullet = create_entity(Species::Bullet, Vec2::new(4.5, 4.5), 0.0, &map.tuning);
        update_bullet(&mut bullet, EntityId(0), &mut map, 0.1);
        assert!(!bullet.garbage);
        assert!(bullet.pos.x > 5.5);

        bullet.lifetime = 0.05;
        update_bullet(&mut bullet, EntityId(0), &mut map, 0.1);
        assert!(bullet.garbage);
    }

    #[test]
    fn test_aries_reflects_frontal_bullet() {
        let mut map = arena(16);
        let mut aries = create_entity(Species::Aries, Vec2::splat(6.5), 0.0, &map.tuning);
        // Bullet coming in from the right, straight at Aries' face
        let mut bullet = create_entity(Species::Bullet, Vec2::new(6.8, 6.5), 180.0, &map.tuning);
        bullet.faction = Faction::Good;

        let reaction = hit_aries(&mut aries, &mut bullet, &mut map);
        assert_eq!(reaction, HitReaction::Reflected);
        assert_eq!(bullet.faction, Faction::Evil);
        assert!(bullet.vel.x > 0.0);
        assert_eq!(aries.health, aries.max_health);
    }

    #[test]
    fn test_aries_takes_damage_from_behind() {
        let mut map = arena(16);
        let mut aries = create_entity(Species::Aries, Vec2::splat(6.5), 0.0, &map.tuning);
        let mut bullet = create_entity(Species::Bullet, Vec2::new(6.2, 6.5), 0.0, &map.tuning);
        bullet.faction = Faction::Good;

        let reaction = hit_aries(&mut aries, &mut bullet, &mut map);
        assert_eq!(reaction, HitReaction::Damaged);
        assert_eq!(bullet.faction, Faction::Good);
        assert!(aries.health < aries.max_health);
    }

    #[test]
    fn test_capricorn_absorbs_only_in_water() {
        let mut map = arena(16);
        map.grid.set_kind(IVec2::new(6, 6), TileKind::Water);
        let mut bullet = create_entity(Species::Bullet, Vec2::splat(6.5), 0.0, &map.tuning);

        let mut swimmer = create_entity(Species::Capricorn, Vec2::splat(6.5), 0.0, &map.tuning);
        assert_eq!(hit_capricorn(&mut swimmer, &mut bullet, &mut map), HitReaction::Absorbed);
        assert_eq!(swimmer.health, swimmer.max_health);

        let mut ashore = create_entity(Species::Capricorn, Vec2::splat(8.5), 0.0, &map.tuning);
        assert_eq!(hit_capricorn(&mut ashore, &mut bullet, &mut map), HitReaction::Damaged);
        assert!(ashore.health < ashore.max_health);
    }

    #[test]
    fn test_death_hook_runs_once() {
        let mut map = arena(16);
        let mut leo = create_entity(Species::Leo, Vec2::splat(6.5), 0.0, &map.tuning);
        apply_damage(&mut leo, 100.0, &mut map);
        apply_damage(&mut leo, 100.0, &mut map);
        assert!(leo.garbage);
        let kills = map
            .events()
            .iter()
            .filter(|e| matches!(e, GameEvent::ActorKilled { .. }))
            .count();
        assert_eq!(kills, 1);
        assert!(map.screen_shake > 0.0);
    }

    #[test]
    fn test_pursuit_walks_path_around_wall() {
        let mut map = arena(16);
        // Wall between the chaser and its target, open at the bottom
        for y in 1..10 {
            map.grid.set_kind(IVec2::new(7, y), TileKind::Wall);
        }
        let mut leo = create_entity(Species::Leo, tile_center(IVec2::new(4, 4)), 0.0, &map.tuning);
        let target = tile_center(IVec2::new(10, 4));
        if let Some(ai) = leo.ai.as_mut() {
            ai.pursuing = true;
            ai.target = target;
        }

        for _ in 0..600 {
            navigate(&mut leo, &mut map, 1.0 / 60.0, true);
            let ai = leo.ai.as_ref().unwrap();
            if !ai.pursuing {
                break;
            }
            assert!(!map.grid.blocks_sight(tile_of(leo.pos)), "walked into a wall");
        }

        let ai = leo.ai.as_ref().unwrap();
        assert!(!ai.pursuing);
        assert!(ai.path.is_empty());
        assert!(leo.pos.distance(target) <= leo.physics_radius);
    }

    #[test]
    fn test_unreachable_target_stops_pursuit() {
        let mut map = arena(16);
        // Box in the target tile
        for d in [IVec2::X, IVec2::NEG_X, IVec2::Y, IVec2::NEG_Y] {
            map.grid.set_kind(IVec2::new(10, 10) + d, TileKind::Wall);
        }
        let mut leo = create_entity(Species::Leo, tile_center(IVec2::new(3, 3)), 0.0, &map.tuning);
        if let Some(ai) = leo.ai.as_mut() {
            ai.pursuing = true;
            ai.target = tile_center(IVec2::new(10, 10));
        }
        navigate(&mut leo, &mut map, 1.0 / 60.0, true);
        assert!(!leo.ai.as_ref().unwrap().pursuing);
    }

    #[test]
    fn test_wander_picks_reachable_target() {
        let mut map = arena(16);
        let mut leo = create_entity(Species::Leo, tile_center(IVec2::new(5, 5)), 0.0, &map.tuning);
        navigate(&mut leo, &mut map, 1.0 / 60.0, true);

        let ai = leo.ai.as_ref().unwrap();
        assert!(!ai.pursuing);
        assert!(map.grid.is_interior(tile_of(ai.target)));
        assert!(ai.field.is_some());
    }

    #[test]
    fn test_wander_routes_from_one_flood_of_own_tile() {
        let mut map = arena(16);
        // Wall column cuts the arena; the far side stays open in the open map
        for y in 1..15 {
            map.grid.set_kind(IVec2::new(8, y), TileKind::Wall);
        }
        let start = IVec2::new(3, 5);
        let mut leo = create_entity(Species::Leo, tile_center(start), 0.0, &map.tuning);
        for _ in 0..8 {
            leo.ai.as_mut().unwrap().path.clear();
            navigate(&mut leo, &mut map, 0.0, true);

            let ai = leo.ai.as_ref().unwrap();
            let field = ai.field.as_ref().unwrap();
            assert_eq!(field.get(start), 0.0);
            if let Some(last) = ai.path.back() {
                assert_eq!(*last, ai.target);
                assert!(tile_of(ai.target).x < 8);
            }
        }
    }

    #[test]
    fn test_leo_bites_player_in_contact() {
        let mut map = arena(16);
        let player_id = map.spawn_player(Vec2::new(5.0, 5.5), 0.0);
        let mut leo = create_entity(Species::Leo, Vec2::new(5.6, 5.5), 180.0, &map.tuning);
        leo.ai = None;

        update_leo(&mut leo, EntityId(99), &mut map, 0.01);
        let player = map.registry.get(player_id).unwrap();
        assert_eq!(player.health, player.max_health - map.tuning.leo.melee_damage);
        assert!(leo.reload > 0.0);
    }

    #[test]
    fn test_scorpio_tracks_laser_end() {
        let mut map = arena(16);
        let mut turret = create_entity(Species::Scorpio, Vec2::new(4.5, 4.5), 0.0, &map.tuning);
        update_scorpio(&mut turret, EntityId(0), &mut map, 0.01);
        let end = turret.laser_end.unwrap();
        // Border wall at x = 15
        assert!((end.x - 15.0).abs() < 1e-4);
        assert!((end.y - 4.5).abs() < 1e-4);
    }

    #[test]
    fn test_render_hooks_emit_triangles() {
        let tuning = Tuning::default();
        for species in Species::ALL {
            let entity = create_entity(species, Vec2::splat(3.0), 30.0, &tuning);
            let mut out = Vec::new();
            (behavior(species).render)(&entity, &mut out);
            assert!(!out.is_empty());
            assert_eq!(out.len() % 3, 0);
        }
    }
}
