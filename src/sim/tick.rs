//! Frame simulation pipeline
//!
//! Stages run in a fixed order and each finishes before the next begins:
//! fade, perception and updates, entity separation, wall separation,
//! projectile hits, tile decay, garbage sweep, exit check, camera.

use glam::{IVec2, Vec2};

use super::behavior::{HitReaction, behavior};
use super::collision::{disc_box, disc_disc, discs_overlap};
use super::entity::{Faction, Species};
use super::map::{GameEvent, Map};
use super::registry::EntityId;
use crate::audio::SoundEffect;
use crate::tile_center;

/// Host input for one frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Desired movement direction (normalized by the player update)
    pub move_dir: Vec2,
    /// Aim heading in degrees
    pub aim_deg: f32,
    /// Fire held this frame
    pub fire: bool,
}

/// Advance the map by one frame
pub fn tick(map: &mut Map, input: &TickInput, dt: f32) {
    map.input = input.clone();

    update_fade(map, dt);
    update_perception(map, dt);
    update_entities(map, dt);
    separate_entities(map);
    separate_from_walls(map);
    resolve_projectile_hits(map);
    decay_tiles(map);
    sweep_garbage(map);
    check_exit(map);
    update_camera(map);
}

/// Stage 1: scale and spin the player through level transitions
fn update_fade(map: &mut Map, dt: f32) {
    if !map.fade.is_active() {
        return;
    }
    let duration = map.tuning.fade.duration.max(f32::EPSILON);
    let spin = map.tuning.fade.spin_deg_per_sec;
    map.fade.timer += dt;
    let t = (map.fade.timer / duration).min(1.0);

    if let Some(player) = map.player.and_then(|id| map.registry.get_mut(id)) {
        if map.fade.fading_in {
            player.scale = t;
            player.orientation = crate::normalize_degrees(player.orientation + spin * (1.0 - t) * dt);
        } else {
            player.scale = 1.0 - t;
            player.orientation = crate::normalize_degrees(player.orientation + spin * dt);
        }
    }

    if t < 1.0 {
        return;
    }
    if map.fade.fading_out {
        map.fade.fading_out = false;
        map.level_complete = true;
        map.emit(GameEvent::LevelComplete);
        log::info!("Level complete");
    } else {
        map.fade.fading_in = false;
        if let Some(player) = map.player.and_then(|id| map.registry.get_mut(id)) {
            player.scale = 1.0;
        }
    }
    map.fade.timer = 0.0;
}

/// Stage 2a: line of sight to the player drives pursuit
fn update_perception(map: &mut Map, dt: f32) {
    map.discovery_cooldown = (map.discovery_cooldown - dt).max(0.0);
    let target = map.player_pos();

    for id in map.registry.actor_ids(Faction::Evil) {
        let Some(enemy) = map.registry.get(id) else {
            continue;
        };
        if !enemy.is_alive() || enemy.ai.is_none() {
            continue;
        }
        let sees = target.is_some_and(|t| map.has_line_of_sight(enemy.pos, t));
        let species = enemy.species;

        let mut announce = false;
        if let Some(ai) = map.registry.get_mut(id).and_then(|e| e.ai.as_mut()) {
            match (sees, target) {
                (true, Some(player_pos)) => {
                    if !ai.has_sight {
                        ai.has_sight = true;
                        ai.pursuing = true;
                        announce = true;
                    }
                    ai.target = player_pos;
                }
                _ => {
                    if ai.has_sight {
                        ai.has_sight = false;
                        if species == Species::Leo {
                            ai.pursuing = false;
                            ai.path.clear();
                        }
                    }
                }
            }
        }

        if announce && map.discovery_cooldown <= 0.0 {
            map.discovery_cooldown = map.tuning.ai.discovery_cooldown;
            map.emit(GameEvent::Discovered { by: id });
            map.play(SoundEffect::Alert);
        }
    }
}

/// Stage 2b: per-species updates, then deferred spawns, then explosions
fn update_entities(map: &mut Map, dt: f32) {
    for id in map.registry.ids() {
        let Some(mut entity) = map.registry.take(id) else {
            continue;
        };
        if entity.is_alive() {
            (behavior(entity.species).update)(&mut entity, id, map, dt);
        }
        map.registry.restore(id, entity);
    }
    map.flush_pending();

    for explosion in map.explosions.iter_mut() {
        explosion.update(dt);
    }
}

/// Whether the player is exempt from separation this frame
fn skips_separation(map: &Map, id: EntityId) -> bool {
    map.no_clip && map.player == Some(id)
}

/// Stage 3: push overlapping entity pairs apart
fn separate_entities(map: &mut Map) {
    let ids: Vec<EntityId> = map
        .registry
        .iter()
        .filter(|(id, e)| e.is_alive() && !skips_separation(map, *id))
        .map(|(id, _)| id)
        .collect();

    for (i, &a_id) in ids.iter().enumerate() {
        for &b_id in &ids[i + 1..] {
            let (Some(a), Some(b)) = (map.registry.get(a_id), map.registry.get(b_id)) else {
                continue;
            };
            let a_moves = b.flags.pushes_entities && a.flags.pushed_by_entities;
            let b_moves = a.flags.pushes_entities && b.flags.pushed_by_entities;
            if !a_moves && !b_moves {
                continue;
            }
            let contact = disc_disc(a.pos, a.physics_radius, b.pos, b.physics_radius);
            if !contact.hit {
                continue;
            }

            // Normal points from b toward a
            let push = contact.normal * contact.penetration;
            let (a_push, b_push) = match (a_moves, b_moves) {
                (true, true) => (push * 0.5, -push * 0.5),
                (true, false) => (push, Vec2::ZERO),
                _ => (Vec2::ZERO, -push),
            };
            if let Some(a) = map.registry.get_mut(a_id) {
                a.pos += a_push;
            }
            if let Some(b) = map.registry.get_mut(b_id) {
                b.pos += b_push;
            }
        }
    }
}

const NEIGHBOUR_TILES: [IVec2; 8] = [
    IVec2::new(1, 0),
    IVec2::new(-1, 0),
    IVec2::new(0, -1),
    IVec2::new(0, 1),
    IVec2::new(1, -1),
    IVec2::new(-1, -1),
    IVec2::new(1, 1),
    IVec2::new(-1, 1),
];

/// Stage 4: push wall-collidable entities out of the 8 surrounding tiles
fn separate_from_walls(map: &mut Map) {
    let turrets = map.turret_tiles();

    for id in map.registry.ids() {
        if skips_separation(map, id) {
            continue;
        }
        let Some(entity) = map.registry.get(id) else {
            continue;
        };
        if !entity.is_alive() || !entity.flags.pushed_by_walls {
            continue;
        }

        let traversal = entity.traversal();
        let radius = entity.physics_radius;
        let mut pos = entity.pos;
        let center = crate::tile_of(pos);
        for offset in NEIGHBOUR_TILES {
            let coord = center + offset;
            if !map.blocks_entity(traversal, coord, &turrets) {
                continue;
            }
            let min = coord.as_vec2();
            let contact = disc_box(pos, radius, min, min + Vec2::ONE);
            if contact.hit {
                pos += contact.normal * contact.penetration;
            }
        }

        if let Some(entity) = map.registry.get_mut(id) {
            entity.pos = pos;
        }
    }
}

/// Stage 5: each projectile hits at most one opposing actor per frame
fn resolve_projectile_hits(map: &mut Map) {
    let rounds: Vec<(Vec<EntityId>, Vec<EntityId>)> = [Faction::Good, Faction::Evil, Faction::Neutral]
        .into_iter()
        .filter_map(|faction| {
            let opponent = faction.opponent()?;
            Some((
                map.registry.projectile_ids(faction),
                map.registry.actor_ids(opponent),
            ))
        })
        .collect();

    for (projectiles, actors) in rounds {
        for &bullet_id in &projectiles {
            for &actor_id in &actors {
                let (Some(bullet), Some(actor)) =
                    (map.registry.get(bullet_id), map.registry.get(actor_id))
                else {
                    continue;
                };
                if !bullet.is_alive() || !actor.is_alive() || !actor.flags.hit_by_bullets {
                    continue;
                }
                if !discs_overlap(bullet.pos, bullet.physics_radius, actor.pos, actor.physics_radius) {
                    continue;
                }

                let (Some(mut bullet), Some(mut actor)) =
                    (map.registry.take(bullet_id), map.registry.take(actor_id))
                else {
                    continue;
                };
                let faction_before = bullet.faction;
                let reaction = (behavior(actor.species).on_hit)(&mut actor, &mut bullet, map);
                map.emit(GameEvent::ActorHit {
                    target: actor_id,
                    projectile: bullet_id,
                });
                if reaction != HitReaction::Reflected {
                    bullet.garbage = true;
                }
                let refile = bullet.faction != faction_before;
                map.registry.restore(actor_id, actor);
                map.registry.restore(bullet_id, bullet);
                if refile {
                    map.registry.refile(bullet_id);
                }
                break;
            }
        }
    }
}

/// Stage 6: destroyed tiles become their successor kind
fn decay_tiles(map: &mut Map) {
    let destroyed: Vec<IVec2> = map
        .grid
        .tiles_mut()
        .filter_map(|tile| tile.decay().then(|| tile.coord()))
        .collect();
    for coord in destroyed {
        map.emit(GameEvent::TileDestroyed { coord });
        map.play(SoundEffect::TileBreak);
    }
}

/// Stage 7: drop garbage entities and expired explosions
fn sweep_garbage(map: &mut Map) {
    for id in map.registry.ids() {
        let Some(entity) = map.registry.get(id) else {
            continue;
        };
        let dead_actor = entity.flags.is_actor && entity.health <= 0.0;
        if !entity.garbage && !dead_actor {
            continue;
        }
        if !entity.garbage {
            // Health zeroed outside the damage path; the death was never announced
            if let Some(mut entity) = map.registry.take(id) {
                super::behavior::kill(&mut entity, map);
                map.registry.restore(id, entity);
            }
        }
        map.registry.remove(id);
        if map.player == Some(id) {
            map.player = None;
        }
    }
    map.explosions.sweep(|x| x.garbage);
}

/// Stage 8: a living player on the exit starts the fade-out
fn check_exit(map: &mut Map) {
    if map.fade.fading_out || map.level_complete {
        return;
    }
    let exit = tile_center(map.exit);
    let range = map.tuning.fade.exit_pickup_range;
    if map.player_pos().is_some_and(|p| p.distance(exit) <= range) {
        map.begin_exit();
    }
}

/// Stage 9: follow the player (or where it died) and decay shake
fn update_camera(map: &mut Map) {
    if let Some(pos) = map.player_pos() {
        map.last_player_pos = pos;
    }
    let shake = if map.tuning.camera.screen_shake {
        map.screen_shake * map.tuning.camera.shake_scale
    } else {
        0.0
    };
    let focus = map.last_player_pos;
    let size = map.grid.size();
    map.camera.update(focus, shake, size, &mut map.rng);

    map.screen_shake *= map.tuning.camera.shake_decay;
    if map.screen_shake < 0.01 {
        map.screen_shake = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::FRAME_DT;
    use crate::sim::entity::create_entity;
    use crate::sim::tile::{TileGrid, TileKind};
    use crate::tuning::{EnemyCounts, Tuning};

    fn arena(size: i32) -> Map {
        let mut grid = TileGrid::new(size, size, TileKind::Floor);
        grid.stamp_border(TileKind::Wall);
        Map::from_grid(Tuning::default(), grid, IVec2::ONE, IVec2::splat(size - 2), 9)
    }

    fn hit_count(map: &Map, target: EntityId) -> usize {
        map.events()
            .iter()
            .filter(|e| matches!(e, GameEvent::ActorHit { target: t, .. } if *t == target))
            .count()
    }

    fn parked_bullet(map: &Map, pos: Vec2, faction: Faction) -> crate::sim::entity::Entity {
        let mut bullet = create_entity(Species::Bullet, pos, 0.0, &map.tuning);
        bullet.vel = Vec2::ZERO;
        bullet.faction = faction;
        bullet
    }

    fn sturdy_turret(map: &mut Map, pos: Vec2) -> EntityId {
        let mut turret = create_entity(Species::Scorpio, pos, 0.0, &map.tuning);
        turret.health = 100.0;
        turret.max_health = 100.0;
        map.spawn(turret)
    }

    #[test]
    fn test_single_bullet_delivers_one_hit() {
        let mut map = arena(16);
        let pos = tile_center(IVec2::new(6, 6));
        let turret = sturdy_turret(&mut map, pos);
        let bullet = map.spawn(parked_bullet(&map, pos, Faction::Good));

        tick(&mut map, &TickInput::default(), FRAME_DT);

        assert_eq!(hit_count(&map, turret), 1);
        assert!(map.registry.get(bullet).is_none());
        assert_eq!(map.registry.get(turret).unwrap().health, 99.0);
    }

    #[test]
    fn test_overlapping_bullets_each_deliver_a_hit() {
        let mut map = arena(16);
        let pos = tile_center(IVec2::new(6, 6));
        let turret = sturdy_turret(&mut map, pos);
        for i in 0..4 {
            let offset = Vec2::new(0.05 * i as f32, 0.0);
            map.spawn(parked_bullet(&map, pos + offset, Faction::Good));
        }

        tick(&mut map, &TickInput::default(), FRAME_DT);

        assert_eq!(hit_count(&map, turret), 4);
        assert_eq!(map.registry.get(turret).unwrap().health, 96.0);
        assert_eq!(map.registry.len(), 1);
    }

    #[test]
    fn test_same_faction_bullets_do_not_hit() {
        let mut map = arena(16);
        let pos = tile_center(IVec2::new(6, 6));
        let turret = sturdy_turret(&mut map, pos);
        let bullet = map.spawn(parked_bullet(&map, pos, Faction::Evil));

        tick(&mut map, &TickInput::default(), FRAME_DT);

        assert_eq!(hit_count(&map, turret), 0);
        assert!(map.registry.get(bullet).is_some());
    }

    #[test]
    fn test_reflected_bullet_survives_and_changes_buckets() {
        let mut map = arena(16);
        let aries_pos = tile_center(IVec2::new(6, 6));
        let mut aries = create_entity(Species::Aries, aries_pos, 0.0, &map.tuning);
        aries.ai = None;
        map.spawn(aries);
        let bullet = map.spawn(parked_bullet(&map, aries_pos + Vec2::new(0.3, 0.0), Faction::Good));

        tick(&mut map, &TickInput::default(), FRAME_DT);

        let reflected = map.registry.get(bullet).unwrap();
        assert_eq!(reflected.faction, Faction::Evil);
        assert!(map.registry.projectile_ids(Faction::Evil).contains(&bullet));
        assert!(!map.registry.projectile_ids(Faction::Good).contains(&bullet));
        assert!(map.registry.is_filed_consistently(bullet));
    }

    #[test]
    fn test_dead_actor_swept_and_player_cleared() {
        let mut map = arena(16);
        let player = map.spawn_player(tile_center(IVec2::new(3, 3)), 0.0);
        map.registry.get_mut(player).unwrap().health = 1.0;
        map.spawn(parked_bullet(&map, tile_center(IVec2::new(3, 3)), Faction::Evil));

        tick(&mut map, &TickInput::default(), FRAME_DT);

        assert!(map.player.is_none());
        assert!(map.registry.is_empty());
        assert!(!map.player_alive());
        assert!(map.events().contains(&GameEvent::PlayerDied));
        // Camera freezes on the last known position
        assert_eq!(map.last_player_pos, tile_center(IVec2::new(3, 3)));
    }

    #[test]
    fn test_zeroed_health_is_swept_with_death_hook() {
        let mut map = arena(16);
        let leo = create_entity(Species::Leo, tile_center(IVec2::new(8, 8)), 0.0, &map.tuning);
        let id = map.spawn(leo);
        map.registry.get_mut(id).unwrap().health = 0.0;

        tick(&mut map, &TickInput::default(), FRAME_DT);

        assert!(map.registry.get(id).is_none());
        assert!(
            map.events()
                .iter()
                .any(|e| matches!(e, GameEvent::ActorKilled { species: Species::Leo, .. }))
        );
    }

    #[test]
    fn test_explosions_expire() {
        let mut map = arena(16);
        map.spawn_explosion(Vec2::splat(4.0), 0.5);
        let frames = (map.tuning.explosion.lifetime / FRAME_DT).ceil() as usize + 1;
        for _ in 0..frames {
            tick(&mut map, &TickInput::default(), FRAME_DT);
        }
        assert_eq!(map.explosions.count(), 0);
    }

    #[test]
    fn test_destroyed_crate_decays_once() {
        let mut map = arena(16);
        let coord = IVec2::new(5, 5);
        map.grid.set_kind(coord, TileKind::Crate);
        map.grid.tile_at_mut(coord).unwrap().damage(10);

        tick(&mut map, &TickInput::default(), FRAME_DT);
        assert_eq!(map.grid.kind_at(coord), Some(TileKind::Rubble));
        assert!(map.events().contains(&GameEvent::TileDestroyed { coord }));

        let _ = map.drain_events();
        tick(&mut map, &TickInput::default(), FRAME_DT);
        assert!(!map.events().contains(&GameEvent::TileDestroyed { coord }));
    }

    #[test]
    fn test_pairwise_push_symmetric() {
        let mut map = arena(16);
        let mut a = create_entity(Species::Leo, Vec2::new(6.0, 6.5), 0.0, &map.tuning);
        let mut b = create_entity(Species::Leo, Vec2::new(6.4, 6.5), 0.0, &map.tuning);
        a.ai = None;
        b.ai = None;
        let a = map.spawn(a);
        let b = map.spawn(b);

        tick(&mut map, &TickInput::default(), FRAME_DT);

        let a = map.registry.get(a).unwrap().pos;
        let b = map.registry.get(b).unwrap().pos;
        assert!((b.x - a.x - 0.7).abs() < 1e-4);
        assert!((a.x + b.x - 12.4).abs() < 1e-4);
    }

    #[test]
    fn test_pairwise_push_one_sided_against_turret() {
        let mut map = arena(16);
        let turret = sturdy_turret(&mut map, Vec2::new(6.5, 6.5));
        let mut leo = create_entity(Species::Leo, Vec2::new(6.5, 7.0), 0.0, &map.tuning);
        leo.ai = None;
        let leo = map.spawn(leo);

        tick(&mut map, &TickInput::default(), FRAME_DT);

        assert_eq!(map.registry.get(turret).unwrap().pos, Vec2::new(6.5, 6.5));
        let leo = map.registry.get(leo).unwrap();
        assert!(leo.pos.distance(Vec2::new(6.5, 6.5)) >= 0.8 - 1e-4);
    }

    #[test]
    fn test_wall_push_out() {
        let mut map = arena(16);
        map.grid.set_kind(IVec2::new(7, 6), TileKind::Wall);
        let mut leo = create_entity(Species::Leo, Vec2::new(6.8, 6.5), 0.0, &map.tuning);
        leo.ai = None;
        let id = map.spawn(leo);

        tick(&mut map, &TickInput::default(), FRAME_DT);

        let leo = map.registry.get(id).unwrap();
        assert!((leo.pos.x - (7.0 - leo.physics_radius)).abs() < 1e-4);
    }

    #[test]
    fn test_water_pushes_walkers_but_not_swimmers() {
        let mut map = arena(16);
        map.grid.set_kind(IVec2::new(7, 6), TileKind::Water);
        let mut leo = create_entity(Species::Leo, Vec2::new(6.8, 6.5), 0.0, &map.tuning);
        let mut capricorn = create_entity(Species::Capricorn, Vec2::new(6.8, 9.5), 0.0, &map.tuning);
        map.grid.set_kind(IVec2::new(7, 9), TileKind::Water);
        leo.ai = None;
        capricorn.ai = None;
        let leo = map.spawn(leo);
        let capricorn = map.spawn(capricorn);

        tick(&mut map, &TickInput::default(), FRAME_DT);

        assert!(map.registry.get(leo).unwrap().pos.x < 6.8);
        assert_eq!(map.registry.get(capricorn).unwrap().pos.x, 6.8);
    }

    #[test]
    fn test_no_clip_player_ignores_walls() {
        let mut map = arena(16);
        map.grid.set_kind(IVec2::new(7, 6), TileKind::Wall);
        let player = map.spawn_player(Vec2::new(6.8, 6.5), 0.0);
        map.no_clip = true;

        tick(&mut map, &TickInput::default(), FRAME_DT);

        assert_eq!(map.registry.get(player).unwrap().pos, Vec2::new(6.8, 6.5));
    }

    #[test]
    fn test_discovery_announced_once_per_cooldown() {
        let mut map = arena(16);
        map.spawn_player(tile_center(IVec2::new(3, 3)), 0.0);
        for x in [8, 10] {
            let mut turret = create_entity(Species::Scorpio, tile_center(IVec2::new(x, 3)), 180.0, &map.tuning);
            turret.reload = 100.0;
            map.spawn(turret);
        }

        tick(&mut map, &TickInput::default(), FRAME_DT);
        let discovered = map
            .events()
            .iter()
            .filter(|e| matches!(e, GameEvent::Discovered { .. }))
            .count();
        assert_eq!(discovered, 1);
        assert!(map.discovery_cooldown > 0.0);

        for (_, e) in map.registry.iter() {
            if let Some(ai) = &e.ai {
                assert!(ai.has_sight && ai.pursuing);
            }
        }

        // Still in sight: no new episode
        let _ = map.drain_events();
        tick(&mut map, &TickInput::default(), FRAME_DT);
        assert!(!map.events().iter().any(|e| matches!(e, GameEvent::Discovered { .. })));
    }

    #[test]
    fn test_leo_drops_pursuit_on_sight_loss() {
        let mut map = arena(16);
        map.spawn_player(tile_center(IVec2::new(3, 3)), 0.0);
        let mut aries = create_entity(Species::Aries, tile_center(IVec2::new(9, 3)), 0.0, &map.tuning);
        aries.reload = 100.0;
        let aries = map.spawn(aries);
        let leo = map.spawn(create_entity(Species::Leo, tile_center(IVec2::new(9, 5)), 0.0, &map.tuning));

        tick(&mut map, &TickInput::default(), FRAME_DT);
        // Wall the player in
        for d in [IVec2::X, IVec2::NEG_X, IVec2::Y, IVec2::NEG_Y, IVec2::ONE, IVec2::NEG_ONE] {
            map.grid.set_kind(IVec2::new(3, 3) + d, TileKind::Wall);
        }
        map.grid.set_kind(IVec2::new(4, 2), TileKind::Wall);
        map.grid.set_kind(IVec2::new(2, 4), TileKind::Wall);

        tick(&mut map, &TickInput::default(), FRAME_DT);

        let leo_ai = map.registry.get(leo).unwrap().ai.clone().unwrap();
        assert!(!leo_ai.has_sight && !leo_ai.pursuing);
        let aries_ai = map.registry.get(aries).unwrap().ai.clone().unwrap();
        assert!(!aries_ai.has_sight);
        assert!(aries_ai.pursuing);
    }

    #[test]
    fn test_exit_starts_fade_and_completes_level() {
        let mut map = arena(16);
        map.spawn_player(tile_center(map.exit), 0.0);

        tick(&mut map, &TickInput::default(), FRAME_DT);
        assert!(map.fade.fading_out);
        assert!(map.events().contains(&GameEvent::ExitReached));

        let frames = (map.tuning.fade.duration / FRAME_DT).ceil() as usize + 1;
        for _ in 0..frames {
            tick(&mut map, &TickInput::default(), FRAME_DT);
        }
        assert!(map.level_complete);
        assert!(!map.fade.fading_out);
        assert!(map.events().contains(&GameEvent::LevelComplete));
        let exits = map
            .events()
            .iter()
            .filter(|e| **e == GameEvent::ExitReached)
            .count();
        assert_eq!(exits, 1);
    }

    #[test]
    fn test_fade_in_grows_player() {
        let mut map = arena(16);
        let player = map.spawn_player(tile_center(IVec2::new(3, 3)), 0.0);
        map.fade.fading_in = true;

        tick(&mut map, &TickInput::default(), FRAME_DT);
        let scale = map.registry.get(player).unwrap().scale;
        assert!(scale > 0.0 && scale < 0.1);

        let frames = (map.tuning.fade.duration / FRAME_DT).ceil() as usize + 1;
        for _ in 0..frames {
            tick(&mut map, &TickInput::default(), FRAME_DT);
        }
        assert!(!map.fade.fading_in);
        assert_eq!(map.registry.get(player).unwrap().scale, 1.0);
    }

    #[test]
    fn test_screen_shake_decays_to_zero() {
        let mut map = arena(16);
        map.add_shake(1.0);
        tick(&mut map, &TickInput::default(), FRAME_DT);
        assert!((map.screen_shake - 0.9).abs() < 1e-5);
        for _ in 0..100 {
            tick(&mut map, &TickInput::default(), FRAME_DT);
        }
        assert_eq!(map.screen_shake, 0.0);
    }

    #[test]
    fn test_player_moves_and_camera_follows() {
        let mut map = arena(40);
        let player = map.spawn_player(tile_center(IVec2::new(20, 20)), 0.0);
        let input = TickInput {
            move_dir: Vec2::X,
            ..Default::default()
        };
        for _ in 0..30 {
            tick(&mut map, &input, FRAME_DT);
        }
        let pos = map.registry.get(player).unwrap().pos;
        assert!(pos.x > 22.0);
        assert!(map.camera.view_center().distance(pos) < 1e-3);
    }

    #[test]
    fn test_generated_level_runs_for_a_while() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut map = Map::generate(Tuning::default(), 17).unwrap();
        let input = TickInput {
            move_dir: Vec2::new(1.0, 1.0),
            aim_deg: 45.0,
            fire: true,
        };
        for _ in 0..600 {
            tick(&mut map, &input, FRAME_DT);
            for (id, _) in map.registry.iter() {
                assert!(map.registry.is_filed_consistently(id));
            }
        }
        for (_, e) in map.registry.iter() {
            assert!(e.pos.is_finite());
        }
    }

    #[test]
    fn test_empty_level_has_only_player() {
        let mut tuning = Tuning::default();
        tuning.map.enemies = EnemyCounts::none();
        let mut map = Map::generate(tuning, 2).unwrap();
        tick(&mut map, &TickInput::default(), FRAME_DT);
        assert_eq!(map.registry.len(), 1);
        assert!(map.player_alive());
    }
}
