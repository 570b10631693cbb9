use arena_brawler::body::*;
use arena_brawler::config::Tuning;
use arena_brawler::entities::*;
use arena_brawler::geometry::{Rect, Vec2};

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

fn make_body() -> Body {
    Body::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0), 100.0)
}

// ── take_damage ───────────────────────────────────────────────────────────────

#[test]
fn damage_subtracts_and_adds_knockback() {
    let mut b = make_body();
    let outcome = b.take_damage(30.0, Vec2::new(5.0, -2.0));
    assert_eq!(outcome, HitOutcome::Damaged);
    assert_eq!(b.health, 70.0);
    assert_eq!(b.vel, Vec2::new(5.0, -2.0));
    assert!(!b.dead);
}

#[test]
fn overkill_clamps_to_zero_and_kills_once() {
    let mut b = make_body();
    assert_eq!(b.take_damage(150.0, Vec2::ZERO), HitOutcome::Killed);
    assert_eq!(b.health, 0.0);
    assert!(b.dead);

    // Dead bodies ignore further hits entirely
    assert_eq!(b.take_damage(10.0, Vec2::new(100.0, 0.0)), HitOutcome::Ignored);
    assert_eq!(b.health, 0.0);
    assert_eq!(b.vel, Vec2::ZERO);
}

#[test]
fn negative_damage_never_exceeds_max() {
    let mut b = make_body();
    b.take_damage(-50.0, Vec2::ZERO);
    assert_eq!(b.health, 100.0);
}

#[test]
fn invulnerable_body_is_untouched() {
    let mut b = make_body();
    b.invuln_timer = 0.1;
    assert_eq!(b.take_damage(30.0, Vec2::new(50.0, 0.0)), HitOutcome::Ignored);
    assert_eq!(b.health, 100.0);
    assert_eq!(b.vel, Vec2::ZERO);
}

#[test]
fn invulnerability_wears_off() {
    let mut b = make_body();
    b.invuln_timer = 0.1;
    b.tick_invulnerability(0.25);
    assert_eq!(b.invuln_timer, 0.0);
    assert_eq!(b.take_damage(30.0, Vec2::ZERO), HitOutcome::Damaged);
}

#[test]
fn health_ratio_is_clamped() {
    let mut b = make_body();
    b.take_damage(25.0, Vec2::ZERO);
    assert!(approx_eq(b.health_ratio(), 0.75));
}

// ── move_and_collide ──────────────────────────────────────────────────────────

#[test]
fn horizontal_move_stops_at_wall_boundary() {
    let mut b = make_body();
    b.vel = Vec2::new(600.0, 30.0);
    let wall = Rect::new(15.0, -50.0, 10.0, 100.0);
    b.move_and_collide(1.0 / 60.0, &[wall]);

    assert_eq!(b.pos.x, 5.0); // wall.left - width
    assert_eq!(b.vel.x, 0.0);
    assert_eq!(b.vel.y, 30.0); // vertical velocity unaffected
}

#[test]
fn moving_left_snaps_to_right_edge() {
    let mut b = make_body();
    b.pos = Vec2::new(30.0, 0.0);
    b.vel = Vec2::new(-600.0, 0.0);
    let wall = Rect::new(0.0, -50.0, 25.0, 100.0);
    b.move_and_collide(1.0 / 60.0, &[wall]);
    assert_eq!(b.pos.x, 25.0);
    assert_eq!(b.vel.x, 0.0);
}

#[test]
fn falling_body_lands_on_floor() {
    let mut b = make_body();
    b.vel = Vec2::new(0.0, 600.0);
    let floor = Rect::new(-100.0, 15.0, 200.0, 20.0);
    b.move_and_collide(1.0 / 60.0, &[floor]);
    assert_eq!(b.pos.y, 5.0);
    assert_eq!(b.vel.y, 0.0);
    assert!(b.on_ground);
}

#[test]
fn head_bump_does_not_ground() {
    let mut b = make_body();
    b.pos = Vec2::new(0.0, 30.0);
    b.vel = Vec2::new(0.0, -600.0);
    let ceiling = Rect::new(-100.0, 0.0, 200.0, 25.0);
    b.move_and_collide(1.0 / 60.0, &[ceiling]);
    assert_eq!(b.pos.y, 25.0);
    assert_eq!(b.vel.y, 0.0);
    assert!(!b.on_ground);
}

#[test]
fn on_ground_resets_when_airborne() {
    let mut b = make_body();
    b.on_ground = true;
    b.vel = Vec2::new(0.0, -100.0);
    b.move_and_collide(1.0 / 60.0, &[]);
    assert!(!b.on_ground);
}

#[test]
fn diagonal_corner_resolves_x_before_y() {
    // X pass alone clears the block; the Y pass lands on its top.
    let mut b = make_body();
    b.vel = Vec2::new(600.0, 600.0);
    let block = Rect::new(15.0, 15.0, 20.0, 20.0);
    b.move_and_collide(1.0 / 60.0, &[block]);
    assert_eq!(b.pos.y, 5.0);
    assert!(b.on_ground);
    assert_eq!(b.vel.x, 600.0);
}

#[test]
fn gravity_accumulates() {
    let mut b = make_body();
    b.apply_gravity(0.5, 2000.0);
    assert_eq!(b.vel.y, 1000.0);
}

// ── Hazards ───────────────────────────────────────────────────────────────────

#[test]
fn hazard_damage_is_time_scaled() {
    let tuning = Tuning::default();
    let mut player = Player::new(Vec2::new(0.0, 0.0), &tuning);
    let hazards = [Rect::new(10.0, 80.0, 20.0, 20.0)];
    let hit = apply_hazards(&mut player, &hazards, 40.0, -20.0, 0.5);

    let (zone, outcome) = hit.expect("player overlaps the hazard");
    assert_eq!(zone, hazards[0]);
    assert_eq!(outcome, HitOutcome::Damaged);
    assert!(approx_eq(player.body.health, 980.0));
    assert_eq!(player.body.vel.y, -20.0);
}

#[test]
fn hazard_ignored_when_not_overlapping() {
    let tuning = Tuning::default();
    let mut player = Player::new(Vec2::new(0.0, 0.0), &tuning);
    let hazards = [Rect::new(500.0, 500.0, 20.0, 20.0)];
    assert!(apply_hazards(&mut player, &hazards, 40.0, -20.0, 0.5).is_none());
    assert_eq!(player.body.health, 1000.0);
}

#[test]
fn only_first_overlapping_hazard_applies() {
    let tuning = Tuning::default();
    let mut player = Player::new(Vec2::new(0.0, 0.0), &tuning);
    let hazards = [Rect::new(0.0, 0.0, 20.0, 20.0), Rect::new(10.0, 10.0, 20.0, 20.0)];
    apply_hazards(&mut player, &hazards, 40.0, 0.0, 1.0);
    assert!(approx_eq(player.body.health, 960.0));
}

#[test]
fn combatant_trait_reports_death() {
    let tuning = Tuning::default();
    let mut player = Player::new(Vec2::ZERO, &tuning);
    assert!(!player.is_dead());
    player.body_mut().take_damage(5000.0, Vec2::ZERO);
    assert!(player.is_dead());
    let hazards = [Rect::new(0.0, 0.0, 100.0, 100.0)];
    assert!(apply_hazards(&mut player, &hazards, 40.0, 0.0, 1.0).is_none());
}
