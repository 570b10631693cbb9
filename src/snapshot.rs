//! Read-only view of a `GameState` for renderers.
//!
//! The snapshot copies out only what a frontend draws, so a renderer never
//! needs to understand (or hold on to) simulation internals.

use crate::config::Variant;
use crate::entities::{AiState, Archetype, GameState, GameStatus, ParticleColor};
use crate::geometry::{Facing, Rect, Vec2};
use crate::projectiles::{Owner, Projectile};

/// Colour role of a body; the frontend maps these to its own palette.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tint {
    Player,
    PlayerBlocking,
    PlayerFlying,
    LightMelee,
    Ranged,
    HeavyMelee,
    Stunned,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BodyView {
    pub rect: Rect,
    pub tint: Tint,
    pub health_ratio: f32,
    pub facing: Facing,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ParticleView {
    pub pos: Vec2,
    pub radius: f32,
    pub color: ParticleColor,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BeamView {
    pub start: Vec2,
    pub end: Vec2,
    pub owner: Owner,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BoltView {
    pub rect: Rect,
    pub owner: Owner,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Hud {
    pub variant: Variant,
    pub health: f32,
    pub max_health: f32,
    pub energy: f32,
    pub max_energy: f32,
    pub combo: u32,
    pub flying: bool,
    pub score: u32,
    /// Waves spawned so far, out of the table length.
    pub wave: usize,
    pub waves_total: usize,
    pub enemies_alive: usize,
    pub game_over: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RenderSnapshot {
    /// World position of the viewport's top-left corner.
    pub camera: Vec2,
    pub viewport: Vec2,
    pub platforms: Vec<Rect>,
    pub hazards: Vec<Rect>,
    /// Player first, then enemies.
    pub bodies: Vec<BodyView>,
    pub particles: Vec<ParticleView>,
    pub beams: Vec<BeamView>,
    pub bolts: Vec<BoltView>,
    pub hud: Hud,
}

impl RenderSnapshot {
    pub fn capture(state: &GameState) -> Self {
        let p = &state.player;
        let player_tint = if p.blocking {
            Tint::PlayerBlocking
        } else if p.flying {
            Tint::PlayerFlying
        } else {
            Tint::Player
        };

        let mut bodies = Vec::with_capacity(state.enemies.len() + 1);
        bodies.push(BodyView {
            rect: p.body.rect(),
            tint: player_tint,
            health_ratio: p.body.health_ratio(),
            facing: p.body.facing,
        });
        bodies.extend(state.enemies.iter().map(|e| BodyView {
            rect: e.body.rect(),
            tint: match (e.state, e.archetype) {
                (AiState::Stunned, _) => Tint::Stunned,
                (_, Archetype::LightMelee) => Tint::LightMelee,
                (_, Archetype::Ranged) => Tint::Ranged,
                (_, Archetype::HeavyMelee) => Tint::HeavyMelee,
            },
            health_ratio: e.body.health_ratio(),
            facing: e.body.facing,
        }));

        let mut beams = Vec::new();
        let mut bolts = Vec::new();
        for projectile in state.projectiles.iter().filter(|p| p.alive()) {
            match projectile {
                Projectile::Ray(r) => beams.push(BeamView {
                    start: r.start,
                    end: r.end,
                    owner: r.owner,
                }),
                Projectile::Kinetic(k) => bolts.push(BoltView {
                    rect: k.rect(),
                    owner: k.owner,
                }),
            }
        }

        let (vw, vh) = state.tuning.camera.viewport;
        RenderSnapshot {
            camera: state.camera,
            viewport: Vec2::new(vw, vh),
            platforms: state.stage.platforms.clone(),
            hazards: state.stage.hazards.clone(),
            bodies,
            particles: state
                .particles
                .iter()
                .map(|pt| ParticleView {
                    pos: pt.pos,
                    radius: pt.radius,
                    color: pt.color,
                })
                .collect(),
            beams,
            bolts,
            hud: Hud {
                variant: state.variant,
                health: p.body.health,
                max_health: p.body.max_health,
                energy: p.energy,
                max_energy: p.max_energy,
                combo: p.combo,
                flying: p.flying,
                score: state.score,
                wave: state.director.next_wave,
                waves_total: state.tuning.waves.table.len(),
                enemies_alive: state.enemies.len(),
                game_over: state.status == GameStatus::GameOver,
            },
        }
    }
}
