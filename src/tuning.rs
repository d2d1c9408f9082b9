//! Data-driven game balance
//!
//! Every tunable constant the simulation reads lives here. All structs use
//! `#[serde(default)]` and species tables are overlaid on their own
//! defaults, so a JSON document only needs the keys it overrides; anything
//! missing falls back to the compiled default.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Result;
use crate::sim::entity::Species;
use crate::sim::tile::TileKind;

/// One random-walk carving family
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WormConfig {
    /// Number of worms in this family
    pub count: u32,
    /// Random-walk steps per worm
    pub steps: u32,
    /// Tile kind painted along the walk
    pub kind: TileKind,
}

impl Default for WormConfig {
    fn default() -> Self {
        Self {
            count: 0,
            steps: 0,
            kind: TileKind::Wall,
        }
    }
}

/// Enemies spawned per species on a fresh map
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyCounts {
    pub scorpio: u32,
    pub leo: u32,
    pub aries: u32,
    pub capricorn: u32,
}

impl Default for EnemyCounts {
    fn default() -> Self {
        Self {
            scorpio: 3,
            leo: 5,
            aries: 3,
            capricorn: 2,
        }
    }
}

impl EnemyCounts {
    /// Counts in a fixed species order
    pub fn per_species(&self) -> [(Species, u32); 4] {
        [
            (Species::Scorpio, self.scorpio),
            (Species::Leo, self.leo),
            (Species::Aries, self.aries),
            (Species::Capricorn, self.capricorn),
        ]
    }

    pub fn none() -> Self {
        Self {
            scorpio: 0,
            leo: 0,
            aries: 0,
            capricorn: 0,
        }
    }
}

/// Map generation parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MapTuning {
    pub width: i32,
    pub height: i32,
    /// Up to three worm families; extra entries are ignored
    pub worms: Vec<WormConfig>,
    pub enemies: EnemyCounts,
    /// Layouts tried before generation is declared impossible
    pub max_attempts: u32,
    /// Chebyshev radius around entry/exit where enemies never spawn
    pub spawn_exclusion: i32,
    /// Rejection-sampling tries per enemy before it is skipped
    pub spawn_tries: u32,
}

impl Default for MapTuning {
    fn default() -> Self {
        Self {
            width: 48,
            height: 36,
            worms: vec![
                WormConfig {
                    count: 10,
                    steps: 30,
                    kind: TileKind::Wall,
                },
                WormConfig {
                    count: 3,
                    steps: 40,
                    kind: TileKind::Water,
                },
                WormConfig {
                    count: 8,
                    steps: 12,
                    kind: TileKind::Crate,
                },
            ],
            enemies: EnemyCounts::default(),
            max_attempts: 64,
            spawn_exclusion: 6,
            spawn_tries: 1000,
        }
    }
}

/// Perception and navigation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiTuning {
    /// Line of sight is denied outright beyond this distance
    pub sight_distance: f32,
    /// Highest cost the distance-field propagation reaches
    pub path_cost_budget: u32,
    /// Seconds after a discovery during which new discoveries stay silent
    pub discovery_cooldown: f32,
    /// Distance at which a waypoint counts as reached
    pub arrival_radius: f32,
}

impl Default for AiTuning {
    fn default() -> Self {
        Self {
            sight_distance: 12.0,
            path_cost_budget: 256,
            discovery_cooldown: 3.0,
            arrival_radius: 0.15,
        }
    }
}

/// Camera view and shake
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraTuning {
    pub half_width: f32,
    pub half_height: f32,
    /// Multiplicative shake decay per frame
    pub shake_decay: f32,
    /// World units of offset at full shake
    pub shake_scale: f32,
    pub screen_shake: bool,
}

impl Default for CameraTuning {
    fn default() -> Self {
        Self {
            half_width: 12.0,
            half_height: 8.0,
            shake_decay: 0.9,
            shake_scale: 0.5,
            screen_shake: true,
        }
    }
}

/// Level enter/exit transition
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FadeTuning {
    pub duration: f32,
    pub spin_deg_per_sec: f32,
    /// Player distance from the exit center that starts the fade-out
    pub exit_pickup_range: f32,
}

impl Default for FadeTuning {
    fn default() -> Self {
        Self {
            duration: 1.0,
            spin_deg_per_sec: 720.0,
            exit_pickup_range: 0.6,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BulletTuning {
    pub speed: f32,
    pub radius: f32,
    pub damage: f32,
    pub tile_damage: i32,
    pub lifetime: f32,
}

impl Default for BulletTuning {
    fn default() -> Self {
        Self {
            speed: 14.0,
            radius: 0.12,
            damage: 1.0,
            tile_damage: 1,
            lifetime: 2.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplosionTuning {
    pub lifetime: f32,
    pub radius: f32,
    /// Shake added when an actor dies
    pub death_shake: f32,
}

impl Default for ExplosionTuning {
    fn default() -> Self {
        Self {
            lifetime: 0.4,
            radius: 0.6,
            death_shake: 0.6,
        }
    }
}

/// Per-species actor parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ActorTuning {
    pub speed: f32,
    pub turn_rate: f32,
    pub physics_radius: f32,
    pub cosmetic_radius: f32,
    pub health: f32,
    /// Seconds between shots or bites
    pub reload: f32,
    /// Full cone (degrees) inside which the actor fires or reflects
    pub aperture: f32,
    pub melee_damage: f32,
    /// Laser reach for turrets
    pub laser_range: f32,
}

impl Default for ActorTuning {
    fn default() -> Self {
        Self {
            speed: 3.0,
            turn_rate: 360.0,
            physics_radius: 0.35,
            cosmetic_radius: 0.5,
            health: 3.0,
            reload: 1.0,
            aperture: 20.0,
            melee_damage: 0.0,
            laser_range: 0.0,
        }
    }
}

/// Keys present in a species override; the rest come from that species
#[derive(Debug, Default, Deserialize)]
struct ActorOverride {
    speed: Option<f32>,
    turn_rate: Option<f32>,
    physics_radius: Option<f32>,
    cosmetic_radius: Option<f32>,
    health: Option<f32>,
    reload: Option<f32>,
    aperture: Option<f32>,
    melee_damage: Option<f32>,
    laser_range: Option<f32>,
}

impl ActorOverride {
    fn apply(self, base: ActorTuning) -> ActorTuning {
        ActorTuning {
            speed: self.speed.unwrap_or(base.speed),
            turn_rate: self.turn_rate.unwrap_or(base.turn_rate),
            physics_radius: self.physics_radius.unwrap_or(base.physics_radius),
            cosmetic_radius: self.cosmetic_radius.unwrap_or(base.cosmetic_radius),
            health: self.health.unwrap_or(base.health),
            reload: self.reload.unwrap_or(base.reload),
            aperture: self.aperture.unwrap_or(base.aperture),
            melee_damage: self.melee_damage.unwrap_or(base.melee_damage),
            laser_range: self.laser_range.unwrap_or(base.laser_range),
        }
    }
}

fn overlay<'de, D: Deserializer<'de>>(
    deserializer: D,
    base: fn() -> ActorTuning,
) -> std::result::Result<ActorTuning, D::Error> {
    ActorOverride::deserialize(deserializer).map(|o| o.apply(base()))
}

fn player_overrides<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<ActorTuning, D::Error> {
    overlay(d, default_player)
}

fn scorpio_overrides<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<ActorTuning, D::Error> {
    overlay(d, default_scorpio)
}

fn leo_overrides<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<ActorTuning, D::Error> {
    overlay(d, default_leo)
}

fn aries_overrides<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<ActorTuning, D::Error> {
    overlay(d, default_aries)
}

fn capricorn_overrides<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<ActorTuning, D::Error> {
    overlay(d, default_capricorn)
}

/// Complete balance table
///
/// Species tables are overlaid on their own defaults, so an override for one
/// key leaves the species' other values intact.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub map: MapTuning,
    pub ai: AiTuning,
    pub camera: CameraTuning,
    pub fade: FadeTuning,
    pub bullet: BulletTuning,
    pub explosion: ExplosionTuning,
    #[serde(deserialize_with = "player_overrides")]
    pub player: ActorTuning,
    #[serde(deserialize_with = "scorpio_overrides")]
    pub scorpio: ActorTuning,
    #[serde(deserialize_with = "leo_overrides")]
    pub leo: ActorTuning,
    #[serde(deserialize_with = "aries_overrides")]
    pub aries: ActorTuning,
    #[serde(deserialize_with = "capricorn_overrides")]
    pub capricorn: ActorTuning,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            map: MapTuning::default(),
            ai: AiTuning::default(),
            camera: CameraTuning::default(),
            fade: FadeTuning::default(),
            bullet: BulletTuning::default(),
            explosion: ExplosionTuning::default(),
            player: default_player(),
            scorpio: default_scorpio(),
            leo: default_leo(),
            aries: default_aries(),
            capricorn: default_capricorn(),
        }
    }
}

fn default_player() -> ActorTuning {
    ActorTuning {
        speed: 5.0,
        turn_rate: 720.0,
        physics_radius: 0.3,
        cosmetic_radius: 0.45,
        health: 5.0,
        reload: 0.2,
        ..Default::default()
    }
}

fn default_scorpio() -> ActorTuning {
    ActorTuning {
        speed: 0.0,
        turn_rate: 90.0,
        physics_radius: 0.45,
        cosmetic_radius: 0.6,
        health: 6.0,
        reload: 1.5,
        aperture: 10.0,
        laser_range: 20.0,
        ..Default::default()
    }
}

fn default_leo() -> ActorTuning {
    ActorTuning {
        speed: 4.0,
        turn_rate: 540.0,
        physics_radius: 0.35,
        cosmetic_radius: 0.5,
        health: 3.0,
        reload: 0.8,
        melee_damage: 1.0,
        ..Default::default()
    }
}

fn default_aries() -> ActorTuning {
    ActorTuning {
        speed: 2.5,
        turn_rate: 180.0,
        physics_radius: 0.4,
        cosmetic_radius: 0.55,
        health: 4.0,
        reload: 1.2,
        aperture: 60.0,
        ..Default::default()
    }
}

fn default_capricorn() -> ActorTuning {
    ActorTuning {
        speed: 2.0,
        turn_rate: 240.0,
        physics_radius: 0.35,
        cosmetic_radius: 0.5,
        health: 3.0,
        reload: 2.0,
        aperture: 30.0,
        ..Default::default()
    }
}

impl Tuning {
    /// Parse tuning overrides from JSON; missing keys keep their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let tuning = serde_json::from_str(json)?;
        log::info!("Loaded tuning overrides");
        Ok(tuning)
    }

    /// Actor parameters for a species (bullets fall back to player values)
    pub fn actor(&self, species: Species) -> &ActorTuning {
        match species {
            Species::Player | Species::Bullet => &self.player,
            Species::Scorpio => &self.scorpio,
            Species::Leo => &self.leo,
            Species::Aries => &self.aries,
            Species::Capricorn => &self.capricorn,
        }
    }
}
