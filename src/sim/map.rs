//! The map: tile grid, entity registry and per-map simulation context
//!
//! Everything the pipeline stages and species behaviors share lives here as
//! explicit fields (sight distance, camera, shake, RNG), so no stage keeps
//! state of its own between frames.

use glam::{IVec2, Vec2};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::camera::Camera;
use super::entity::{Entity, Explosion, Species, create_entity};
use super::heat_map::HeatMap;
use super::mapgen::{self, StampImage};
use super::pathfind::propagate;
use super::raycast::{RayHit, cast_ray};
use super::registry::{EntityId, Registry, SlotList};
use super::tick::TickInput;
use super::tile::{Tile, TileGrid, Traversal};
use crate::audio::{AudioSink, SoundEffect};
use crate::error::Result;
use crate::tuning::Tuning;
use crate::{tile_center, tile_of};

/// Gameplay notifications drained by the host once per frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// An enemy acquired the player outside the discovery cooldown
    Discovered { by: EntityId },
    /// A projectile struck an actor (one per hit reaction)
    ActorHit { target: EntityId, projectile: EntityId },
    ActorKilled { species: Species, pos: Vec2 },
    TileDestroyed { coord: IVec2 },
    /// Player stepped onto the exit; fade-out started
    ExitReached,
    /// Fade-out finished; the host should load the next level
    LevelComplete,
    PlayerDied,
}

/// Level transition state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fade {
    pub timer: f32,
    pub fading_in: bool,
    pub fading_out: bool,
}

impl Fade {
    pub fn is_active(&self) -> bool {
        self.fading_in || self.fading_out
    }

    /// Overlay darkness in [0, 1]
    pub fn overlay_alpha(&self, duration: f32) -> f32 {
        let t = if duration > 0.0 {
            (self.timer / duration).clamp(0.0, 1.0)
        } else {
            1.0
        };
        if self.fading_in {
            1.0 - t
        } else if self.fading_out {
            t
        } else {
            0.0
        }
    }
}

/// A generated level and everything living on it
#[derive(Debug, Clone)]
pub struct Map {
    pub tuning: Tuning,
    pub grid: TileGrid,
    /// 0 = reachable from the entry, 1 = sealed
    pub open_map: HeatMap,
    pub registry: Registry,
    pub explosions: SlotList<Explosion>,
    /// Cleared when the player is swept
    pub player: Option<EntityId>,
    pub entry: IVec2,
    pub exit: IVec2,
    pub fade: Fade,
    pub screen_shake: f32,
    pub camera: Camera,
    /// Seconds until another discovery may be announced
    pub discovery_cooldown: f32,
    /// Debug switch: the player ignores entity and wall separation
    pub no_clip: bool,
    pub level_complete: bool,
    /// Input for the frame being simulated
    pub input: TickInput,
    /// Camera focus while the player is dead
    pub last_player_pos: Vec2,
    pub rng: Pcg32,
    /// Spawns made during the update stage, inserted after it
    pending: Vec<Entity>,
    events: Vec<GameEvent>,
    sounds: Vec<SoundEffect>,
}

impl Map {
    /// Generate a level with the player in the entry room and enemies spawned
    pub fn generate(tuning: Tuning, seed: u64) -> Result<Self> {
        Self::generate_with_stamp(tuning, None, seed)
    }

    /// Same as [`Map::generate`] with an image stamped onto each attempt
    pub fn generate_with_stamp(
        tuning: Tuning,
        stamp: Option<&dyn StampImage>,
        seed: u64,
    ) -> Result<Self> {
        let mut rng = Pcg32::seed_from_u64(seed);
        let layout = mapgen::generate_layout(&tuning.map, stamp, &mut rng)?;
        let spawns =
            mapgen::pick_enemy_spawns(&layout.grid, layout.entry, layout.exit, &tuning.map, &mut rng);

        let mut map = Self::assemble(tuning, layout.grid, layout.open_map, layout.entry, layout.exit, rng);
        for (species, pos) in spawns {
            let orientation = map.rng.random_range(0.0..360.0f32);
            let enemy = create_entity(species, pos, orientation, &map.tuning);
            map.spawn(enemy);
        }
        // Face the far corner
        map.spawn_player(tile_center(map.entry), 45.0);
        map.fade.fading_in = true;

        log::info!(
            "Level ready (seed {seed}): {} entities, exit at {}",
            map.registry.len(),
            map.exit
        );
        Ok(map)
    }

    /// Wrap an existing grid without spawning anything
    pub fn from_grid(tuning: Tuning, grid: TileGrid, entry: IVec2, exit: IVec2, seed: u64) -> Self {
        let mut open_map = HeatMap::new(grid.width(), grid.height());
        let budget = (grid.width() * grid.height()).max(0) as u32;
        propagate(&mut open_map, entry, budget, |c| grid.blocks_globally(c));
        mapgen::collapse_to_open_map(&mut open_map);
        Self::assemble(tuning, grid, open_map, entry, exit, Pcg32::seed_from_u64(seed))
    }

    fn assemble(
        tuning: Tuning,
        grid: TileGrid,
        open_map: HeatMap,
        entry: IVec2,
        exit: IVec2,
        rng: Pcg32,
    ) -> Self {
        let start = tile_center(entry);
        let camera = Camera::new(
            start,
            Vec2::new(tuning.camera.half_width, tuning.camera.half_height),
        );
        Self {
            tuning,
            grid,
            open_map,
            registry: Registry::new(),
            explosions: SlotList::new(),
            player: None,
            entry,
            exit,
            fade: Fade::default(),
            screen_shake: 0.0,
            camera,
            discovery_cooldown: 0.0,
            no_clip: false,
            level_complete: false,
            input: TickInput::default(),
            last_player_pos: start,
            rng,
            pending: Vec::new(),
            events: Vec::new(),
            sounds: Vec::new(),
        }
    }

    // --- spawning ---

    /// Insert an entity right away
    pub fn spawn(&mut self, entity: Entity) -> EntityId {
        self.registry.insert(entity)
    }

    /// Defer an insertion until the current stage finishes
    pub fn queue_spawn(&mut self, entity: Entity) {
        self.pending.push(entity);
    }

    /// Insert every deferred spawn
    pub fn flush_pending(&mut self) -> Vec<EntityId> {
        let pending = std::mem::take(&mut self.pending);
        pending.into_iter().map(|e| self.registry.insert(e)).collect()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn spawn_player(&mut self, pos: Vec2, orientation: f32) -> EntityId {
        let player = create_entity(Species::Player, pos, orientation, &self.tuning);
        let id = self.registry.insert(player);
        self.player = Some(id);
        self.last_player_pos = pos;
        id
    }

    pub fn spawn_explosion(&mut self, pos: Vec2, radius: f32) {
        let lifetime = self.tuning.explosion.lifetime;
        self.explosions.insert(Explosion::new(pos, radius, lifetime));
    }

    // --- queries ---

    pub fn player_entity(&self) -> Option<&Entity> {
        self.player.and_then(|id| self.registry.get(id))
    }

    pub fn player_alive(&self) -> bool {
        self.player_entity().is_some_and(Entity::is_alive)
    }

    /// Position of the living player
    pub fn player_pos(&self) -> Option<Vec2> {
        self.player_entity().filter(|p| p.is_alive()).map(|p| p.pos)
    }

    pub fn tile_at(&self, coord: IVec2) -> Option<&Tile> {
        self.grid.tile_at(coord)
    }

    pub fn tile_at_pos(&self, pos: Vec2) -> Option<&Tile> {
        self.grid.tile_at_pos(pos)
    }

    /// Whether a world point lies in a solid tile (off-grid counts as solid)
    pub fn is_point_solid(&self, pos: Vec2) -> bool {
        self.grid.blocks_sight(tile_of(pos))
    }

    /// Tiles under living Scorpio turrets
    pub fn turret_tiles(&self) -> Vec<IVec2> {
        self.registry
            .of_species(Species::Scorpio)
            .filter(|e| e.is_alive())
            .map(|e| tile_of(e.pos))
            .collect()
    }

    /// Entity solidity against a precollected turret list.
    ///
    /// Turret occupancy is a one-off rule for Scorpio only, not a general
    /// occupancy index. Off-grid coordinates are not solid.
    pub fn blocks_entity(&self, traversal: Traversal, coord: IVec2, turrets: &[IVec2]) -> bool {
        match self.grid.tile_at(coord) {
            Some(tile) => tile.blocks(traversal) || (!traversal.can_swim && turrets.contains(&coord)),
            None => false,
        }
    }

    /// Solidity predicate for one entity, turret tiles collected once
    pub fn entity_solidity(&self, traversal: Traversal) -> impl Fn(IVec2) -> bool + '_ {
        let turrets = if traversal.can_swim {
            Vec::new()
        } else {
            self.turret_tiles()
        };
        move |coord| self.blocks_entity(traversal, coord, &turrets)
    }

    /// Sight/projectile ray: only solid tiles stop it, water is transparent
    pub fn cast_ray(&self, origin: Vec2, direction: Vec2, max_distance: f32) -> RayHit {
        cast_ray(origin, direction, max_distance, |c| self.grid.blocks_sight(c))
    }

    /// Clear sight line within the configured sight distance
    pub fn has_line_of_sight(&self, from: Vec2, to: Vec2) -> bool {
        let offset = to - from;
        let distance = offset.length();
        if distance > self.tuning.ai.sight_distance {
            return false;
        }
        if distance <= f32::EPSILON {
            return !self.is_point_solid(from);
        }
        !self.cast_ray(from, offset / distance, distance).hit
    }

    // --- events and effects ---

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn play(&mut self, sound: SoundEffect) {
        self.sounds.push(sound);
    }

    /// Hand queued sounds to the audio backend
    pub fn flush_sounds(&mut self, sink: &mut impl AudioSink) {
        for sound in self.sounds.drain(..) {
            sink.play(sound);
        }
    }

    pub fn add_shake(&mut self, amount: f32) {
        self.screen_shake += amount;
    }

    /// Start the exit transition (ignored while one is running)
    pub fn begin_exit(&mut self) {
        if self.fade.fading_out || self.level_complete {
            return;
        }
        self.fade = Fade {
            timer: 0.0,
            fading_in: false,
            fading_out: true,
        };
        self.emit(GameEvent::ExitReached);
        self.play(SoundEffect::LevelExit);
        log::info!("Player reached the exit");
    }
}
