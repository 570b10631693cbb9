//! All game entity types.  Pure data, no logic.
//!
//! Behaviour lives in the sibling modules (`body`, `player`, `enemy`,
//! `projectiles`, `particles`, `spawn`, `compute`).

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::config::{Tuning, Variant};
use crate::events::FrameEvent;
use crate::geometry::{Facing, Rect, Vec2};
use crate::projectiles::Projectile;

// ── Enums ─────────────────────────────────────────────────────────────────────

/// Fixed behaviour/stat profile assigned to an enemy at spawn time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Archetype {
    /// Ground chaser with a short, quick swing.
    LightMelee,
    /// Hovering shooter that keeps a stand-off distance.
    Ranged,
    /// Slow ground chaser with a long reach and heavy knockback.
    HeavyMelee,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AiState {
    Idle,
    Approach,
    Attack,
    Stunned,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParticleColor {
    White,
    Yellow,
    Orange,
    Red,
    Cyan,
}

// ── Entity base ───────────────────────────────────────────────────────────────

/// Physical and combat state shared by the player and every enemy.
///
/// The bounding box is always derived from `pos` + `size`; it is never stored.
#[derive(Clone, Debug, PartialEq)]
pub struct Body {
    /// Top-left corner.
    pub pos: Vec2,
    pub vel: Vec2,
    /// Width/height, fixed at creation.
    pub size: Vec2,
    pub health: f32,
    pub max_health: f32,
    /// Seconds of remaining invulnerability; incoming damage is ignored while > 0.
    pub invuln_timer: f32,
    pub on_ground: bool,
    pub facing: Facing,
    /// Set once when health reaches zero, never cleared.
    pub dead: bool,
}

// ── Player ────────────────────────────────────────────────────────────────────

/// Per-ability cooldowns in seconds (0 = ready).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Cooldowns {
    pub melee: f32,
    /// Lock-out after the ray drained energy to zero.
    pub ray: f32,
    pub dash: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub body: Body,
    pub energy: f32,
    pub max_energy: f32,
    /// Consecutive melee triggers inside the combo window.
    pub combo: u32,
    /// Seconds until the combo counter resets.
    pub combo_timer: f32,
    pub cooldowns: Cooldowns,
    pub flying: bool,
    pub blocking: bool,
    /// Continuous abilities active during the last update (for rendering).
    pub ray_active: bool,
    pub cone_active: bool,
}

// ── Enemy ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub body: Body,
    pub archetype: Archetype,
    pub state: AiState,
    /// Seconds spent in the current `state`.
    pub state_timer: f32,
    /// Melee swing or shot cooldown, depending on archetype.
    pub attack_cooldown: f32,
    /// While > 0 the AI makes no decisions; physics still runs.
    pub stun_timer: f32,
}

// ── Particles ─────────────────────────────────────────────────────────────────

/// Purely cosmetic; never collides, never affects gameplay.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Remaining seconds.
    pub life: f32,
    pub radius: f32,
    pub color: ParticleColor,
}

// ── Level geometry ────────────────────────────────────────────────────────────

/// Static level definition, immutable after `init_state`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    /// Solid platforms and walls.
    pub platforms: Vec<Rect>,
    /// Continuous-damage zones.
    pub hazards: Vec<Rect>,
    /// Top-left spawn points for ground enemies; flyers spawn above them.
    pub spawn_anchors: Vec<Vec2>,
    /// Player top-left at game start.
    pub player_spawn: Vec2,
    /// Kinetic projectiles leaving this box are discarded.
    pub bounds: Rect,
}

// ── Spawn director ────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct SpawnDirector {
    /// Seconds until the next wave.
    pub timer: f32,
    /// Index of the next wave-table entry.
    pub next_wave: usize,
    /// Set once the table is exhausted; no further spawns ever happen.
    pub exhausted: bool,
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The entire simulation state.  Cloneable so the pure update functions can
/// return a new copy without mutating the original.
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    pub variant: Variant,
    pub tuning: Rc<Tuning>,
    pub stage: Rc<Stage>,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    /// Rays and kinetic projectiles from both sides.
    pub projectiles: Vec<Projectile>,
    pub particles: Vec<Particle>,
    pub director: SpawnDirector,
    /// World position of the viewport's top-left corner.
    pub camera: Vec2,
    pub score: u32,
    pub status: GameStatus,
    pub frame: u64,
    /// What happened during the most recent `tick`.
    pub events: Vec<FrameEvent>,
}
