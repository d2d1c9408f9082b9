//! Logical sound effects
//!
//! The simulation never plays audio itself. It queues [`SoundEffect`] ids on
//! the map and the host drains them into whatever backend implements
//! [`AudioSink`].

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Player fires
    PlayerShoot,
    /// Enemy fires
    EnemyShoot,
    /// Bullet strikes an actor
    Hit,
    /// Aries bounces a bullet back
    Reflect,
    /// Capricorn swallows a bullet underwater
    Absorb,
    /// Bullet strikes a wall
    WallHit,
    /// Crate breaks
    TileBreak,
    /// Actor dies
    Explosion,
    /// Enemy spots the player
    Alert,
    /// Leo bites
    Bite,
    /// Player killed
    PlayerDeath,
    /// Player reached the exit
    LevelExit,
}

/// Backend that plays logical sounds
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect);
}

/// Sink that records what was played (headless hosts, tests)
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    pub played: Vec<SoundEffect>,
}

impl AudioSink for RecordingSink {
    fn play(&mut self, effect: SoundEffect) {
        self.played.push(effect);
    }
}
