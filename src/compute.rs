//! The authoritative frame pass.
//!
//! `tick` takes an immutable reference to the current `GameState` (plus the
//! input snapshot, frame time and an RNG handle) and returns a brand-new
//! `GameState`.  Side effects are limited to the injected RNG.

use std::rc::Rc;

use rand::Rng;

use crate::body::apply_hazards;
use crate::config::{Tuning, Variant};
use crate::enemy::update_enemy;
use crate::entities::{Enemy, GameState, GameStatus, Particle, ParticleColor, Player, SpawnDirector, Stage};
use crate::events::{FrameEvent, FrameOutput};
use crate::geometry::{Rect, Vec2};
use crate::input::InputSource;
use crate::particles::{emit, update_particles, Burst};
use crate::player::{resolve_cone, resolve_melee, update_player};
use crate::projectiles::{channel_ray, release_channel, resolve_projectiles, Owner, Projectile};

// ── Constructors ──────────────────────────────────────────────────────────────

/// Fresh state for a variant using its built-in tuning and stage.
pub fn init_state(variant: Variant) -> GameState {
    init_state_with(
        variant,
        Rc::new(Tuning::for_variant(variant)),
        Rc::new(Stage::for_variant(variant)),
    )
}

/// Fresh state with explicit tuning and level geometry.
pub fn init_state_with(variant: Variant, tuning: Rc<Tuning>, stage: Rc<Stage>) -> GameState {
    let player = Player::new(stage.player_spawn, &tuning);
    let camera = camera_target(&player, &tuning);
    GameState {
        variant,
        director: SpawnDirector::new(tuning.waves.first_delay),
        tuning,
        stage,
        player,
        enemies: Vec::new(),
        projectiles: Vec::new(),
        particles: Vec::new(),
        camera,
        score: 0,
        status: GameStatus::Playing,
        frame: 0,
        events: Vec::new(),
    }
}

/// Throw everything away and start over with the same variant, tuning and stage.
pub fn reset(state: &GameState) -> GameState {
    log::info!("reset after {} frames, score {}", state.frame, state.score);
    init_state_with(state.variant, Rc::clone(&state.tuning), Rc::clone(&state.stage))
}

fn camera_target(player: &Player, tuning: &Tuning) -> Vec2 {
    let (w, h) = tuning.camera.viewport;
    player.body.center() - Vec2::new(w, h) * 0.5
}

// ── Per-frame tick (nearly pure, RNG is injected) ─────────────────────────────

/// Advance the simulation by one frame of `dt` seconds.  A game-over state is
/// terminal and comes back unchanged; only `reset` leaves it.
pub fn tick(state: &GameState, input: &impl InputSource, dt: f32, rng: &mut impl Rng) -> GameState {
    if state.status == GameStatus::GameOver {
        return state.clone();
    }
    let dt = if dt.is_finite() && dt >= 0.0 {
        dt
    } else {
        log::warn!("frame {}: invalid dt {}, treated as 0", state.frame, dt);
        0.0
    };

    let tuning = Rc::clone(&state.tuning);
    let stage = Rc::clone(&state.stage);
    let mut out = FrameOutput::default();
    let mut player = state.player.clone();
    let mut enemies = state.enemies.clone();
    let mut director = state.director.clone();

    // ── 1. Spawn director ────────────────────────────────────────────────────
    let spawned = director.update(dt, &tuning.waves, &tuning.enemies, &stage, rng);
    if !spawned.is_empty() {
        out.events.push(FrameEvent::WaveSpawned {
            wave: director.next_wave,
            count: spawned.len(),
        });
        enemies.extend(spawned);
    }

    // ── 2. Player, and the strikes it triggered ──────────────────────────────
    let actions = update_player(&mut player, input, &stage, &tuning, dt);
    if actions.toggled_flight {
        log::debug!("flight toggled: {}", player.flying);
        out.events.push(FrameEvent::FlightToggled { flying: player.flying });
    }
    if let Some(strike) = &actions.melee {
        resolve_melee(strike, &mut enemies, tuning.combat.strike_band, &mut out, rng);
    }
    if let Some(cone) = &actions.cone {
        resolve_cone(cone, &mut enemies, dt, &mut out, rng);
    }

    // ── 3. Enemy AI ──────────────────────────────────────────────────────────
    for enemy in enemies.iter_mut() {
        update_enemy(enemy, &mut player, &stage, &tuning, dt, &mut out, rng);
    }

    // ── 4. Projectiles ───────────────────────────────────────────────────────
    let mut projectiles = state.projectiles.clone();
    match actions.ray {
        Some(ray) => channel_ray(&mut projectiles, ray),
        None => release_channel(&mut projectiles, Owner::Player),
    }
    projectiles.append(&mut out.projectiles);
    resolve_projectiles(&mut projectiles, &mut player, &mut enemies, &stage, &tuning, dt, &mut out, rng);

    // ── 5. Hazards ───────────────────────────────────────────────────────────
    let h = &tuning.hazard;
    let health_before = player.body.health;
    if let Some((zone, outcome)) = apply_hazards(&mut player, &stage.hazards, h.dps, h.lift, dt) {
        if outcome.landed() {
            out.events.push(FrameEvent::PlayerDamaged {
                amount: health_before - player.body.health,
            });
        }
        spark(&mut out.particles, zone, h.spark_chance, rng);
    }
    for enemy in enemies.iter_mut() {
        if let Some((zone, _)) = apply_hazards(enemy, &stage.hazards, h.dps, h.lift, dt) {
            spark(&mut out.particles, zone, h.spark_chance, rng);
        }
    }

    // ── 6. Particles ─────────────────────────────────────────────────────────
    let mut particles = update_particles(&state.particles, dt);
    particles.append(&mut out.particles);

    // ── 7. Cull (fresh collections) ──────────────────────────────────────────
    let (dead, enemies): (Vec<Enemy>, Vec<Enemy>) = enemies.into_iter().partition(|e| e.body.dead);
    let mut score = state.score;
    for enemy in &dead {
        let points = tuning.enemies.get(enemy.archetype).score;
        score += points;
        emit(&mut particles, rng, enemy.body.center(), &Burst::death());
        out.events.push(FrameEvent::EnemyKilled {
            archetype: enemy.archetype,
            score: points,
        });
    }
    let projectiles: Vec<Projectile> = projectiles.into_iter().filter(Projectile::alive).collect();

    // ── 8. Camera ────────────────────────────────────────────────────────────
    let camera = state.camera + (camera_target(&player, &tuning) - state.camera) * tuning.camera.follow;

    // ── 9. Terminal condition ────────────────────────────────────────────────
    let status = if player.body.dead {
        log::info!("player defeated on frame {}, score {}", state.frame + 1, score);
        out.events.push(FrameEvent::PlayerDefeated);
        GameStatus::GameOver
    } else {
        GameStatus::Playing
    };

    log::trace!(
        "frame {} dt={:.4} enemies={} projectiles={} particles={}",
        state.frame + 1,
        dt,
        enemies.len(),
        projectiles.len(),
        particles.len()
    );

    GameState {
        player,
        enemies,
        projectiles,
        particles,
        director,
        camera,
        score,
        status,
        frame: state.frame + 1,
        events: out.events,
        ..state.clone()
    }
}

/// Occasional spark thrown up from the top edge of a hazard zone.
fn spark(particles: &mut Vec<Particle>, zone: Rect, chance: f64, rng: &mut impl Rng) {
    if !rng.gen_bool(chance) {
        return;
    }
    let at = Vec2::new(rng.gen_range(zone.left()..=zone.right()), zone.top());
    let vel = Vec2::new(rng.gen_range(-60.0..=60.0), rng.gen_range(-260.0..=-120.0));
    particles.push(Particle::new(at, vel, 0.3, ParticleColor::Yellow, rng.gen_range(2.0..=3.0)));
}
