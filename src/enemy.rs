//! Enemy AI: a shared state-machine shell with one behaviour per archetype.

use rand::Rng;

use crate::config::{ArchetypeStats, Tuning};
use crate::entities::{AiState, Archetype, Body, Enemy, ParticleColor, Player, Stage};
use crate::events::{FrameEvent, FrameOutput};
use crate::geometry::{direction_or, in_frontal_reach, Facing, Vec2};
use crate::particles::{emit, Burst};
use crate::projectiles::{Kinetic, Owner, Projectile};

impl Enemy {
    pub fn new(archetype: Archetype, pos: Vec2, stats: &ArchetypeStats, attack_cooldown: f32) -> Self {
        Enemy {
            body: Body::new(pos, Vec2::new(stats.size.0, stats.size.1), stats.health),
            archetype,
            state: AiState::Idle,
            state_timer: 0.0,
            attack_cooldown,
            stun_timer: 0.0,
        }
    }

    /// Stuns only ever extend: the timer becomes the longer of the two.
    pub fn stun(&mut self, duration: f32) {
        self.stun_timer = self.stun_timer.max(duration);
        if self.stun_timer > 0.0 {
            self.set_state(AiState::Stunned);
        }
    }

    pub fn set_state(&mut self, state: AiState) {
        if self.state != state {
            self.state = state;
            self.state_timer = 0.0;
        }
    }
}

/// Advance one enemy a frame.  Swings land on the player directly; shots
/// and particles go to `out`.
#[allow(clippy::too_many_arguments)]
pub fn update_enemy(
    enemy: &mut Enemy,
    player: &mut Player,
    stage: &Stage,
    tuning: &Tuning,
    dt: f32,
    out: &mut FrameOutput,
    rng: &mut impl Rng,
) {
    if enemy.body.dead {
        return;
    }
    let stats = tuning.enemies.get(enemy.archetype);

    enemy.state_timer += dt;
    enemy.attack_cooldown = (enemy.attack_cooldown - dt).max(0.0);
    enemy.stun_timer = (enemy.stun_timer - dt).max(0.0);
    enemy.body.tick_invulnerability(dt);

    if enemy.stun_timer > 0.0 {
        enemy.set_state(AiState::Stunned);
        // Stunned flyers lose lift and drop like everything else.
        if stats.flies {
            enemy.body.vel *= stats.brake;
        }
        enemy.body.apply_gravity(dt, tuning.physics.gravity);
        enemy.body.move_and_collide(dt, &stage.platforms);
        return;
    }

    let to_player = player.body.center() - enemy.body.center();
    let dist = to_player.length();
    enemy.body.facing = Facing::from_x(to_player.x, enemy.body.facing);
    enemy.set_state(if dist > stats.aggro_range {
        AiState::Idle
    } else if dist > stats.attack_range {
        AiState::Approach
    } else {
        AiState::Attack
    });

    match enemy.archetype {
        Archetype::LightMelee | Archetype::HeavyMelee => {
            brawler(enemy, player, stats, stage, tuning, dt, out, rng)
        }
        Archetype::Ranged => gunner(enemy, player, stats, stage, dt, out),
    }
}

// ── Ground melee ──────────────────────────────────────────────────────────────

#[allow(clippy::too_many_arguments)]
fn brawler(
    enemy: &mut Enemy,
    player: &mut Player,
    stats: &ArchetypeStats,
    stage: &Stage,
    tuning: &Tuning,
    dt: f32,
    out: &mut FrameOutput,
    rng: &mut impl Rng,
) {
    let body = &mut enemy.body;
    if enemy.state == AiState::Approach {
        body.vel.x += body.facing.sign() * stats.speed * dt;
        body.vel.x *= stats.chase_damping;
    } else {
        body.vel.x *= stats.brake;
    }
    body.apply_gravity(dt, tuning.physics.gravity);
    body.move_and_collide(dt, &stage.platforms);

    if enemy.state == AiState::Attack && enemy.attack_cooldown == 0.0 && enemy.body.on_ground {
        enemy.attack_cooldown = stats.attack_cooldown;
        swing(&enemy.body, player, stats, tuning, out, rng);
    }
}

/// One melee swing against the player.  Blocking scales the damage down.
fn swing(
    body: &Body,
    player: &mut Player,
    stats: &ArchetypeStats,
    tuning: &Tuning,
    out: &mut FrameOutput,
    rng: &mut impl Rng,
) {
    let s = body.facing.sign();
    let origin = body.center() + Vec2::new(s * (body.size.x * 0.5 + tuning.combat.enemy_strike_offset), 0.0);
    let target = player.body.center();
    if !in_frontal_reach(origin, body.facing, target, stats.reach, tuning.combat.strike_band) {
        return;
    }

    let amount = player.mitigate(stats.damage, tuning.combat.block_multiplier);
    let knockback = Vec2::new(s * stats.knockback, stats.lift);
    if player.body.take_damage(amount, knockback).landed() {
        out.events.push(FrameEvent::PlayerDamaged { amount });
        let burst = Burst {
            count: 10,
            vx: -180.0..=180.0,
            vy: -220.0..=-20.0,
            life: 0.25,
            color: ParticleColor::Red,
            radius: 2.0..=3.0,
        };
        emit(&mut out.particles, rng, target, &burst);
    }
}

// ── Ranged flyer ──────────────────────────────────────────────────────────────

/// Hold a horizontal distance band around the player at hover height,
/// shooting whenever in range and off cooldown.
fn gunner(
    enemy: &mut Enemy,
    player: &Player,
    stats: &ArchetypeStats,
    stage: &Stage,
    dt: f32,
    out: &mut FrameOutput,
) {
    let body = &mut enemy.body;
    let center = body.center();
    let target = player.body.center();

    if enemy.state == AiState::Idle {
        body.vel *= stats.brake;
    } else {
        let toward = body.facing.sign();
        let gap = (target.x - center.x).abs();
        let (near, far) = stats.standoff;
        let want_x = if gap < near {
            -toward
        } else if gap > far {
            toward
        } else {
            0.0
        };
        let climb = (target.y - stats.hover_height) - center.y;
        let desired = Vec2::new(want_x * stats.speed, climb.clamp(-stats.speed, stats.speed));
        body.vel += (desired - body.vel) * (1.0 - stats.chase_damping);
    }
    body.move_and_collide(dt, &stage.platforms);

    if enemy.state == AiState::Attack && enemy.attack_cooldown == 0.0 {
        enemy.attack_cooldown = stats.attack_cooldown;
        let from = enemy.body.center();
        let dir = direction_or(target - from, enemy.body.facing.unit());
        out.projectiles.push(Projectile::Kinetic(Kinetic::new(
            from,
            dir * stats.projectile_speed,
            stats.projectile_size,
            stats.damage,
            dir * stats.knockback + Vec2::new(0.0, stats.lift),
            stats.projectile_lifetime,
            Owner::Enemy,
        )));
    }
}
