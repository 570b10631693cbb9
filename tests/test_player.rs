use arena_brawler::config::Tuning;
use arena_brawler::entities::*;
use arena_brawler::events::FrameOutput;
use arena_brawler::geometry::{Facing, Rect, Vec2};
use arena_brawler::input::{Action, InputState};
use arena_brawler::player::*;

use rand::rngs::StdRng;
use rand::SeedableRng;

const DT: f32 = 1.0 / 60.0;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

/// Flat floor with its top at y = 640.
fn floor_stage() -> Stage {
    Stage {
        platforms: vec![Rect::new(-2000.0, 640.0, 5000.0, 160.0)],
        hazards: Vec::new(),
        spawn_anchors: Vec::new(),
        player_spawn: Vec2::new(100.0, 550.0),
        bounds: Rect::new(-5000.0, -5000.0, 10000.0, 10000.0),
    }
}

fn open_stage() -> Stage {
    Stage {
        platforms: Vec::new(),
        ..floor_stage()
    }
}

/// Player standing on the floor (one settling frame already run).
fn grounded_player(tuning: &Tuning, stage: &Stage) -> Player {
    let mut p = Player::new(stage.player_spawn, tuning);
    update_player(&mut p, &InputState::new(), stage, tuning, DT);
    assert!(p.body.on_ground);
    p
}

fn light_at(tuning: &Tuning, x: f32, y: f32) -> Enemy {
    Enemy::new(Archetype::LightMelee, Vec2::new(x, y), &tuning.enemies.light_melee, 1.0)
}

// ── Construction ──────────────────────────────────────────────────────────────

#[test]
fn new_player_is_full_and_ready() {
    let tuning = Tuning::default();
    let p = Player::new(Vec2::new(10.0, 20.0), &tuning);
    assert_eq!(p.body.pos, Vec2::new(10.0, 20.0));
    assert_eq!(p.body.size, Vec2::new(54.0, 90.0));
    assert_eq!(p.body.health, 1000.0);
    assert_eq!(p.energy, 300.0);
    assert_eq!(p.combo, 0);
    assert!(!p.flying);
    assert_eq!(p.cooldowns, Cooldowns::default());
}

#[test]
fn arena_player_starts_flying() {
    let tuning = Tuning::arena();
    assert!(Player::new(Vec2::ZERO, &tuning).flying);
}

#[test]
fn blocking_scales_incoming_damage() {
    let tuning = Tuning::default();
    let mut p = Player::new(Vec2::ZERO, &tuning);
    assert_eq!(p.mitigate(100.0, 0.35), 100.0);
    p.blocking = true;
    assert!(approx_eq(p.mitigate(100.0, 0.35), 35.0));
}

// ── Locomotion ────────────────────────────────────────────────────────────────

#[test]
fn jump_only_from_the_ground() {
    let tuning = Tuning::default();
    let stage = floor_stage();
    let mut p = grounded_player(&tuning, &stage);
    let jump = InputState::new().with_held(Action::Jump);

    update_player(&mut p, &jump, &stage, &tuning, DT);
    assert!(approx_eq(p.body.vel.y, -980.0 + 2200.0 * DT));
    assert!(!p.body.on_ground);

    // Holding jump in mid-air adds nothing but gravity
    let before = p.body.vel.y;
    update_player(&mut p, &jump, &stage, &tuning, DT);
    assert!(approx_eq(p.body.vel.y, before + 2200.0 * DT));
}

#[test]
fn facing_follows_horizontal_input() {
    let tuning = Tuning::default();
    let stage = floor_stage();
    let mut p = grounded_player(&tuning, &stage);
    update_player(&mut p, &InputState::new().with_held(Action::MoveLeft), &stage, &tuning, DT);
    assert_eq!(p.body.facing, Facing::Left);
    assert!(p.body.vel.x < 0.0);

    // No input keeps the last facing
    update_player(&mut p, &InputState::new(), &stage, &tuning, DT);
    assert_eq!(p.body.facing, Facing::Left);
}

#[test]
fn toggle_flight_zeroes_vertical_speed_and_skips_gravity() {
    let tuning = Tuning::default();
    let stage = open_stage();
    let mut p = Player::new(Vec2::ZERO, &tuning);
    p.body.vel.y = 300.0;

    let actions = update_player(&mut p, &InputState::new().with_pressed(Action::ToggleFlight), &stage, &tuning, DT);
    assert!(actions.toggled_flight);
    assert!(p.flying);
    assert_eq!(p.body.vel, Vec2::ZERO);

    update_player(&mut p, &InputState::new(), &stage, &tuning, DT);
    assert_eq!(p.body.vel, Vec2::ZERO);
}

#[test]
fn flight_speed_is_clamped_on_both_axes() {
    let tuning = Tuning::default();
    let stage = open_stage();
    let mut p = Player::new(Vec2::ZERO, &tuning);
    p.flying = true;
    let input = InputState::new().with_held(Action::MoveRight).with_held(Action::MoveDown);
    for _ in 0..240 {
        update_player(&mut p, &input, &stage, &tuning, DT);
        assert!(p.body.vel.x.abs() <= 800.0);
        assert!(p.body.vel.y.abs() <= 800.0);
    }
    assert!(p.body.vel.x > 700.0);
    assert!(p.body.vel.y > 700.0);
}

// ── Dash ──────────────────────────────────────────────────────────────────────

#[test]
fn dash_without_input_uses_facing() {
    let tuning = Tuning::default();
    let stage = open_stage();
    let mut p = Player::new(Vec2::ZERO, &tuning);
    p.body.facing = Facing::Left;

    let actions = update_player(&mut p, &InputState::new().with_pressed(Action::Dash), &stage, &tuning, DT);
    assert!(actions.dashed);
    assert_eq!(p.body.vel.x, -1100.0);
    assert_eq!(p.body.invuln_timer, 0.15);
    assert_eq!(p.cooldowns.dash, 0.6);
}

#[test]
fn flying_dash_without_input_uses_facing() {
    let tuning = Tuning::default();
    let stage = open_stage();
    let mut p = Player::new(Vec2::ZERO, &tuning);
    p.flying = true;

    update_player(&mut p, &InputState::new().with_pressed(Action::Dash), &stage, &tuning, DT);
    assert_eq!(p.body.vel, Vec2::new(1100.0, 0.0));
}

#[test]
fn flying_dash_follows_diagonal_input() {
    let tuning = Tuning::default();
    let stage = open_stage();
    let mut p = Player::new(Vec2::ZERO, &tuning);
    p.flying = true;
    let input = InputState::new()
        .with_pressed(Action::Dash)
        .with_held(Action::MoveRight)
        .with_held(Action::MoveUp);

    update_player(&mut p, &input, &stage, &tuning, DT);
    assert!(approx_eq(p.body.vel.length(), 1100.0));
    assert!(approx_eq(p.body.vel.x, -p.body.vel.y));
}

#[test]
fn dash_is_cooldown_gated() {
    let tuning = Tuning::default();
    let stage = open_stage();
    let mut p = Player::new(Vec2::ZERO, &tuning);
    let dash = InputState::new().with_pressed(Action::Dash);

    assert!(update_player(&mut p, &dash, &stage, &tuning, DT).dashed);
    assert!(!update_player(&mut p, &dash, &stage, &tuning, DT).dashed);
    for _ in 0..40 {
        update_player(&mut p, &InputState::new(), &stage, &tuning, DT);
    }
    assert!(update_player(&mut p, &dash, &stage, &tuning, DT).dashed);
}

// ── Melee combo ───────────────────────────────────────────────────────────────

#[test]
fn combo_scales_and_caps() {
    let tuning = Tuning::default();
    let stage = floor_stage();
    let mut p = grounded_player(&tuning, &stage);
    let melee = InputState::new().with_held(Action::Melee);

    let mut strikes = Vec::new();
    for _ in 0..4 {
        let actions = update_player(&mut p, &melee, &stage, &tuning, 0.3);
        strikes.push(actions.melee.expect("melee is off cooldown every 0.3s"));
    }
    assert_eq!(p.combo, 3);
    assert_eq!(strikes[0].damage, 150.0);
    assert_eq!(strikes[1].damage, 180.0);
    assert_eq!(strikes[2].damage, 210.0);
    assert_eq!(strikes[3].damage, 210.0); // capped
    assert!(strikes[2].reach > strikes[0].reach);
    assert!(strikes[2].knockback.x > strikes[0].knockback.x);
}

#[test]
fn melee_respects_cooldown() {
    let tuning = Tuning::default();
    let stage = floor_stage();
    let mut p = grounded_player(&tuning, &stage);
    let melee = InputState::new().with_held(Action::Melee);
    assert!(update_player(&mut p, &melee, &stage, &tuning, DT).melee.is_some());
    assert!(update_player(&mut p, &melee, &stage, &tuning, DT).melee.is_none());
}

#[test]
fn combo_expires_after_window() {
    let tuning = Tuning::default();
    let stage = floor_stage();
    let mut p = grounded_player(&tuning, &stage);
    update_player(&mut p, &InputState::new().with_held(Action::Melee), &stage, &tuning, DT);
    assert_eq!(p.combo, 1);
    update_player(&mut p, &InputState::new(), &stage, &tuning, 1.0);
    assert_eq!(p.combo, 0);
}

#[test]
fn melee_hits_enemies_in_front_only() {
    let tuning = Tuning::default();
    let mut rng = seeded_rng();
    let mut out = FrameOutput::default();
    let strike = MeleeStrike {
        origin: Vec2::new(100.0, 100.0),
        facing: Facing::Right,
        reach: 70.0,
        damage: 150.0,
        knockback: Vec2::new(440.0, -180.0),
        stun: 0.25,
    };
    // Centres at (134, 100) and (66, 100)
    let mut enemies = vec![light_at(&tuning, 110.0, 60.0), light_at(&tuning, 42.0, 60.0)];

    let hits = resolve_melee(&strike, &mut enemies, 60.0, &mut out, &mut rng);

    assert_eq!(hits, 1);
    assert_eq!(enemies[0].body.health, 100.0);
    assert_eq!(enemies[0].body.vel, Vec2::new(440.0, -180.0));
    assert_eq!(enemies[0].state, AiState::Stunned);
    assert_eq!(enemies[0].stun_timer, 0.25);
    assert_eq!(enemies[1].body.health, 250.0);
    assert_eq!(out.particles.len(), 12 + 10); // impact + swoosh
}

#[test]
fn melee_whiff_spawns_nothing() {
    let tuning = Tuning::default();
    let mut rng = seeded_rng();
    let mut out = FrameOutput::default();
    let strike = MeleeStrike {
        origin: Vec2::ZERO,
        facing: Facing::Left,
        reach: 70.0,
        damage: 150.0,
        knockback: Vec2::ZERO,
        stun: 0.25,
    };
    let mut enemies = vec![light_at(&tuning, 500.0, 0.0)];
    assert_eq!(resolve_melee(&strike, &mut enemies, 60.0, &mut out, &mut rng), 0);
    assert!(out.particles.is_empty());
}

// ── Ray and cone ──────────────────────────────────────────────────────────────

#[test]
fn ray_drains_energy_and_blocks_regen() {
    let tuning = Tuning::default();
    let stage = floor_stage();
    let mut p = grounded_player(&tuning, &stage);
    let actions = update_player(&mut p, &InputState::new().with_held(Action::Ray), &stage, &tuning, 0.5);

    let ray = actions.ray.expect("ray fires with energy left");
    assert!(p.ray_active);
    assert!(approx_eq(p.energy, 240.0));
    assert!(ray.channelled);
    assert!(ray.end.x > ray.start.x);
    assert!(ray.end.y < ray.start.y); // tilted slightly upward
    assert!(approx_eq(ray.start.distance(ray.end), 900.0));
}

#[test]
fn ray_drained_to_zero_locks_out() {
    let tuning = Tuning::default();
    let stage = floor_stage();
    let mut p = grounded_player(&tuning, &stage);
    p.energy = 1.0;
    let ray = InputState::new().with_held(Action::Ray);

    assert!(update_player(&mut p, &ray, &stage, &tuning, 0.1).ray.is_some());
    assert_eq!(p.energy, 0.0);
    assert_eq!(p.cooldowns.ray, 0.5);

    // Locked out, and energy stays in range
    assert!(update_player(&mut p, &ray, &stage, &tuning, 0.1).ray.is_none());
    assert!(p.energy >= 0.0);
}

#[test]
fn energy_regenerates_up_to_max() {
    let tuning = Tuning::default();
    let stage = floor_stage();
    let mut p = grounded_player(&tuning, &stage);
    p.energy = 290.0;
    update_player(&mut p, &InputState::new(), &stage, &tuning, 1.0);
    assert_eq!(p.energy, 300.0);
}

#[test]
fn cone_drains_and_produces_a_blast() {
    let tuning = Tuning::default();
    let stage = floor_stage();
    let mut p = grounded_player(&tuning, &stage);
    let actions = update_player(&mut p, &InputState::new().with_held(Action::Cone), &stage, &tuning, 0.5);
    let cone = actions.cone.expect("cone fires with energy left");
    assert!(approx_eq(p.energy, 255.0));
    assert!(approx_eq(cone.half_angle, 28.0_f32.to_radians()));
    assert_eq!(cone.facing, Facing::Right);
}

#[test]
fn cone_pushes_with_distance_falloff() {
    let tuning = Tuning::default();
    let mut rng = seeded_rng();
    let mut out = FrameOutput::default();
    let cone = ConeBlast {
        origin: Vec2::new(0.0, 0.0),
        facing: Facing::Right,
        half_angle: 28.0_f32.to_radians(),
        radius: 360.0,
        dps: 480.0,
        push: 600.0,
        push_base: 120.0,
        lift: 120.0,
        stun: 0.2,
    };
    // Centres at (90, 0), (-90, 0) behind, and (90, 200) outside the angle
    let mut enemies = vec![
        light_at(&tuning, 66.0, -40.0),
        light_at(&tuning, -114.0, -40.0),
        light_at(&tuning, 66.0, 160.0),
    ];

    let hits = resolve_cone(&cone, &mut enemies, 0.5, &mut out, &mut rng);

    assert_eq!(hits, 1);
    let force = 1.0 - 90.0 / 360.0;
    assert!(approx_eq(enemies[0].body.vel.x, 600.0 * force + 120.0));
    assert!(approx_eq(enemies[0].body.vel.y, -120.0 * force));
    assert!(approx_eq(enemies[0].body.health, 250.0 - 480.0 * force * 0.5));
    assert_eq!(enemies[0].state, AiState::Stunned);
    assert_eq!(enemies[1].body.health, 250.0);
    assert_eq!(enemies[2].body.health, 250.0);
    assert!(!out.particles.is_empty());
}
