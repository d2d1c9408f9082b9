//! Entity state shared by every species
//!
//! Species differences live in the capability table in `behavior.rs`; this
//! module holds the common record (transform, health, flags, AI state) and
//! the factory.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::heat_map::HeatMap;
use super::tile::Traversal;
use crate::error::{ArenaError, Result};
use crate::heading_to_vector;
use crate::tuning::Tuning;

/// Entity types known to the factory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Species {
    Player,
    Bullet,
    /// Stationary laser turret
    Scorpio,
    /// Melee chaser
    Leo,
    /// Ranged pursuer with a reflective front
    Aries,
    /// Ranged swimmer
    Capricorn,
}

impl Species {
    pub const COUNT: usize = 6;

    pub const ALL: [Species; Self::COUNT] = [
        Species::Player,
        Species::Bullet,
        Species::Scorpio,
        Species::Leo,
        Species::Aries,
        Species::Capricorn,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Species::Player => "player",
            Species::Bullet => "bullet",
            Species::Scorpio => "scorpio",
            Species::Leo => "leo",
            Species::Aries => "aries",
            Species::Capricorn => "capricorn",
        }
    }

    /// Case-insensitive lookup by type name
    pub fn from_name(name: &str) -> Result<Self> {
        let lower = name.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|s| s.name() == lower)
            .ok_or_else(|| ArenaError::UnknownEntityType(name.to_string()))
    }

    /// Enemy species that run the pursuit state machine
    pub fn is_enemy(self) -> bool {
        matches!(
            self,
            Species::Scorpio | Species::Leo | Species::Aries | Species::Capricorn
        )
    }

    pub fn can_swim(self) -> bool {
        matches!(self, Species::Capricorn)
    }
}

/// Allegiance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Faction {
    Good,
    Evil,
    Neutral,
}

impl Faction {
    pub const COUNT: usize = 3;

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Faction whose projectiles hurt this one, if any
    pub fn opponent(self) -> Option<Faction> {
        match self {
            Faction::Good => Some(Faction::Evil),
            Faction::Evil => Some(Faction::Good),
            Faction::Neutral => None,
        }
    }
}

/// Behavioral switches read by the pipeline stages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EntityFlags {
    pub is_actor: bool,
    pub is_projectile: bool,
    pub pushed_by_entities: bool,
    pub pushes_entities: bool,
    pub pushed_by_walls: bool,
    pub hit_by_bullets: bool,
    pub can_swim: bool,
}

/// Pursuit/wander memory for AI-driven species
#[derive(Debug, Clone, Default)]
pub struct AiState {
    pub pursuing: bool,
    pub has_sight: bool,
    /// Where the entity is heading (the player while pursuing)
    pub target: Vec2,
    /// Target the cached path was computed for
    pub last_target: Option<Vec2>,
    /// Remaining waypoints, next one at the front
    pub path: VecDeque<Vec2>,
    /// Distance field reused across path recomputations
    pub field: Option<HeatMap>,
}

/// A live simulation entity
#[derive(Debug, Clone)]
pub struct Entity {
    pub species: Species,
    pub faction: Faction,
    pub pos: Vec2,
    /// Degrees, 0 = +x
    pub orientation: f32,
    pub vel: Vec2,
    /// Degrees per second
    pub angular_vel: f32,
    pub physics_radius: f32,
    pub cosmetic_radius: f32,
    /// Visual scale used by level transitions
    pub scale: f32,
    pub health: f32,
    pub max_health: f32,
    pub flags: EntityFlags,
    /// Marked for the end-of-frame sweep
    pub garbage: bool,
    /// Counts down to the next shot or bite
    pub reload: f32,
    /// Seconds of flight left (projectiles)
    pub lifetime: f32,
    /// Damage dealt on hit (projectiles)
    pub damage: f32,
    /// Turret laser end point from the last update
    pub laser_end: Option<Vec2>,
    pub ai: Option<AiState>,
}

impl Entity {
    fn base(species: Species, faction: Faction, pos: Vec2, orientation: f32) -> Self {
        Self {
            species,
            faction,
            pos,
            orientation,
            vel: Vec2::ZERO,
            angular_vel: 0.0,
            physics_radius: 0.0,
            cosmetic_radius: 0.0,
            scale: 1.0,
            health: 1.0,
            max_health: 1.0,
            flags: EntityFlags::default(),
            garbage: false,
            reload: 0.0,
            lifetime: 0.0,
            damage: 0.0,
            laser_end: None,
            ai: None,
        }
    }

    /// Alive and not yet marked for removal
    #[inline]
    pub fn is_alive(&self) -> bool {
        !self.garbage && (!self.flags.is_actor || self.health > 0.0)
    }

    #[inline]
    pub fn traversal(&self) -> Traversal {
        Traversal {
            can_swim: self.flags.can_swim,
        }
    }

    /// Unit vector along the current orientation
    #[inline]
    pub fn facing(&self) -> Vec2 {
        heading_to_vector(self.orientation)
    }
}

/// Build an entity of `species` with its tuned defaults
pub fn create_entity(species: Species, pos: Vec2, orientation: f32, tuning: &Tuning) -> Entity {
    match species {
        Species::Bullet => {
            let t = &tuning.bullet;
            let mut e = Entity::base(species, Faction::Neutral, pos, orientation);
            e.physics_radius = t.radius;
            e.cosmetic_radius = t.radius * 2.0;
            e.vel = heading_to_vector(orientation) * t.speed;
            e.lifetime = t.lifetime;
            e.damage = t.damage;
            e.flags = EntityFlags {
                is_projectile: true,
                ..Default::default()
            };
            e
        }
        _ => {
            let t = tuning.actor(species);
            let faction = if species == Species::Player {
                Faction::Good
            } else {
                Faction::Evil
            };
            let stationary = species == Species::Scorpio;

            let mut e = Entity::base(species, faction, pos, orientation);
            e.physics_radius = t.physics_radius;
            e.cosmetic_radius = t.cosmetic_radius;
            e.health = t.health;
            e.max_health = t.health;
            e.damage = t.melee_damage;
            e.flags = EntityFlags {
                is_actor: true,
                is_projectile: false,
                pushed_by_entities: !stationary,
                pushes_entities: true,
                pushed_by_walls: !stationary,
                hit_by_bullets: true,
                can_swim: species.can_swim(),
            };
            if species.is_enemy() {
                e.ai = Some(AiState {
                    target: pos,
                    ..Default::default()
                });
            }
            e
        }
    }
}

/// Factory entry keyed by type name
pub fn create_entity_named(
    name: &str,
    pos: Vec2,
    orientation: f32,
    tuning: &Tuning,
) -> Result<Entity> {
    let species = Species::from_name(name)?;
    Ok(create_entity(species, pos, orientation, tuning))
}

/// Visual-only blast, bucketed apart from entities
#[derive(Debug, Clone, PartialEq)]
pub struct Explosion {
    pub pos: Vec2,
    pub radius: f32,
    pub age: f32,
    pub lifetime: f32,
    pub garbage: bool,
}

impl Explosion {
    pub fn new(pos: Vec2, radius: f32, lifetime: f32) -> Self {
        Self {
            pos,
            radius,
            age: 0.0,
            lifetime,
            garbage: false,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.age += dt;
        if self.age >= self.lifetime {
            self.garbage = true;
        }
    }

    /// 0 at spawn, 1 at expiry
    pub fn progress(&self) -> f32 {
        if self.lifetime <= 0.0 {
            1.0
        } else {
            (self.age / self.lifetime).clamp(0.0, 1.0)
        }
    }
}
