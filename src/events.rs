//! Things that happened during one `tick`, for the frontend and for tests.

use crate::entities::{Archetype, Particle};
use crate::projectiles::Projectile;

#[derive(Clone, Debug, PartialEq)]
pub enum FrameEvent {
    EnemyKilled { archetype: Archetype, score: u32 },
    PlayerDamaged { amount: f32 },
    WaveSpawned { wave: usize, count: usize },
    FlightToggled { flying: bool },
    PlayerDefeated,
}

/// Frame-scoped side outputs collected while the systems run, merged into
/// the game state by `tick`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameOutput {
    pub particles: Vec<Particle>,
    pub projectiles: Vec<Projectile>,
    pub events: Vec<FrameEvent>,
}
