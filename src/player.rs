//! Player controller: locomotion, abilities, energy.
//!
//! `update_player` never touches enemies.  Strikes it triggers come back as
//! `PlayerActions` and are resolved later in the same frame by
//! `resolve_melee` / `resolve_cone` (and the projectile pass for the ray).

use rand::Rng;

use crate::config::Tuning;
use crate::entities::{Body, Cooldowns, Enemy, ParticleColor, Player, Stage};
use crate::events::FrameOutput;
use crate::geometry::{angle_between, direction_or, in_frontal_reach, Facing, Vec2};
use crate::input::{Action, InputSource};
use crate::particles::{emit, Burst};
use crate::projectiles::{Owner, Ray};

/// Mist particles per frame while the cone is held.
const CONE_MIST_PARTICLES: usize = 12;

/// Melee hit region produced on the frame melee triggers.  Consumed once.
#[derive(Clone, Debug, PartialEq)]
pub struct MeleeStrike {
    pub origin: Vec2,
    pub facing: Facing,
    pub reach: f32,
    pub damage: f32,
    pub knockback: Vec2,
    pub stun: f32,
}

/// Cone push for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct ConeBlast {
    pub origin: Vec2,
    pub facing: Facing,
    /// Radians.
    pub half_angle: f32,
    pub radius: f32,
    pub dps: f32,
    pub push: f32,
    pub push_base: f32,
    pub lift: f32,
    pub stun: f32,
}

/// Everything the player triggered this frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlayerActions {
    pub melee: Option<MeleeStrike>,
    pub ray: Option<Ray>,
    pub cone: Option<ConeBlast>,
    pub toggled_flight: bool,
    pub dashed: bool,
}

impl Player {
    pub fn new(spawn: Vec2, tuning: &Tuning) -> Self {
        let t = &tuning.player;
        Player {
            body: Body::new(spawn, Vec2::new(t.size.0, t.size.1), t.max_health),
            energy: t.max_energy,
            max_energy: t.max_energy,
            combo: 0,
            combo_timer: 0.0,
            cooldowns: Cooldowns::default(),
            flying: t.starts_flying,
            blocking: false,
            ray_active: false,
            cone_active: false,
        }
    }

    /// Damage actually taken from an incoming hit, after blocking.
    pub fn mitigate(&self, amount: f32, block_multiplier: f32) -> f32 {
        if self.blocking {
            amount * block_multiplier
        } else {
            amount
        }
    }

    pub fn toggle_flight(&mut self) {
        self.flying = !self.flying;
        if self.flying {
            self.body.vel.y = 0.0;
        }
    }

    fn tick_timers(&mut self, dt: f32) {
        self.cooldowns.melee = (self.cooldowns.melee - dt).max(0.0);
        self.cooldowns.ray = (self.cooldowns.ray - dt).max(0.0);
        self.cooldowns.dash = (self.cooldowns.dash - dt).max(0.0);
        self.combo_timer = (self.combo_timer - dt).max(0.0);
        if self.combo_timer == 0.0 {
            self.combo = 0;
        }
        self.body.tick_invulnerability(dt);
    }

    fn drain(&mut self, rate: f32, dt: f32) {
        self.energy = (self.energy - rate * dt).clamp(0.0, self.max_energy);
    }
}

/// Advance the player one frame from the input snapshot.
pub fn update_player(
    player: &mut Player,
    input: &impl InputSource,
    stage: &Stage,
    tuning: &Tuning,
    dt: f32,
) -> PlayerActions {
    let mut actions = PlayerActions::default();
    if player.body.dead {
        return actions;
    }

    player.tick_timers(dt);

    let axis = input.move_axis();
    player.body.facing = Facing::from_x(axis.x, player.body.facing);

    if input.pressed(Action::ToggleFlight) {
        player.toggle_flight();
        actions.toggled_flight = true;
    }

    if player.flying {
        fly(&mut player.body, axis, tuning, dt);
    } else {
        walk(&mut player.body, axis, input.held(Action::Jump), tuning, dt);
    }

    player.blocking = input.held(Action::Block);

    if input.held(Action::Melee) && player.cooldowns.melee == 0.0 {
        actions.melee = Some(trigger_melee(player, tuning));
    }

    player.ray_active =
        input.held(Action::Ray) && player.energy > 0.0 && player.cooldowns.ray == 0.0;
    if player.ray_active {
        player.drain(tuning.ray.drain, dt);
        if player.energy == 0.0 {
            player.cooldowns.ray = tuning.ray.lockout;
            log::debug!("ray drained energy, locked out for {}s", tuning.ray.lockout);
        }
        actions.ray = Some(aim_ray(player, tuning));
    }

    player.cone_active = input.held(Action::Cone) && player.energy > 0.0;
    if player.cone_active {
        player.drain(tuning.cone.drain, dt);
        actions.cone = Some(aim_cone(player, tuning));
    }

    if input.pressed(Action::Dash) && player.cooldowns.dash == 0.0 {
        dash(player, axis, tuning);
        actions.dashed = true;
    }

    player.body.move_and_collide(dt, &stage.platforms);

    if !player.ray_active && !player.cone_active {
        player.energy = (player.energy + tuning.player.energy_regen * dt).min(player.max_energy);
    }

    actions
}

// ── Locomotion ────────────────────────────────────────────────────────────────

fn walk(body: &mut Body, axis: Vec2, jump: bool, tuning: &Tuning, dt: f32) {
    body.vel.x += axis.x * tuning.player.speed * dt;
    body.vel.x *= if body.on_ground {
        tuning.physics.ground_friction
    } else {
        tuning.physics.air_friction
    };
    if jump && body.on_ground {
        body.vel.y = -tuning.player.jump_speed;
    }
    body.apply_gravity(dt, tuning.physics.gravity);
}

/// Steer toward `axis * max_fly_speed` at a bounded rate, no gravity.
fn fly(body: &mut Body, axis: Vec2, tuning: &Tuning, dt: f32) {
    let t = &tuning.player;
    let target = axis * t.max_fly_speed;
    let delta = target - body.vel;
    let step = (t.fly_accel * dt / (delta.length() + 1e-5)).clamp(0.0, 1.0);
    body.vel += delta * step;
    body.vel = body.vel.clamp(Vec2::splat(-t.max_fly_speed), Vec2::splat(t.max_fly_speed));
    body.vel *= t.fly_damping;
}

/// Snap velocity to dash speed along the input direction, or along facing
/// when there is no input.  Grounded dashes only override the horizontal axis.
fn dash(player: &mut Player, axis: Vec2, tuning: &Tuning) {
    let t = &tuning.player;
    let body = &mut player.body;
    if player.flying {
        body.vel = direction_or(axis, body.facing.unit()) * t.dash_speed;
    } else {
        let dir_x = if axis.x != 0.0 { axis.x.signum() } else { body.facing.sign() };
        body.vel.x = dir_x * t.dash_speed;
    }
    body.invuln_timer = body.invuln_timer.max(t.dash_invuln);
    player.cooldowns.dash = t.dash_cooldown;
}

// ── Abilities ─────────────────────────────────────────────────────────────────

fn trigger_melee(player: &mut Player, tuning: &Tuning) -> MeleeStrike {
    let t = &tuning.melee;
    player.combo = (player.combo + 1).min(t.combo_cap);
    player.combo_timer = t.combo_window;
    player.cooldowns.melee = t.cooldown;

    let c = player.combo as f32;
    let facing = player.body.facing;
    let origin = player.body.center()
        + Vec2::new(facing.sign() * (player.body.size.x * 0.5 + t.offset), 0.0);
    MeleeStrike {
        origin,
        facing,
        reach: t.reach + c * t.reach_per_combo,
        damage: t.damage + c * t.damage_per_combo,
        knockback: Vec2::new(facing.sign() * (t.knockback + c * t.knockback_per_combo), t.lift),
        stun: t.stun + c * t.stun_per_combo,
    }
}

fn aim_ray(player: &Player, tuning: &Tuning) -> Ray {
    let t = &tuning.ray;
    let facing = player.body.facing;
    let start = player.body.center() + Vec2::new(0.0, t.eye_offset);
    let dir = direction_or(Vec2::new(facing.sign(), t.tilt), facing.unit());
    Ray {
        start,
        end: start + dir * t.length,
        dps: t.dps,
        duration: t.duration,
        age: 0.0,
        knockback: Vec2::new(facing.sign() * t.knockback.0, t.knockback.1),
        owner: Owner::Player,
        channelled: true,
    }
}

fn aim_cone(player: &Player, tuning: &Tuning) -> ConeBlast {
    let t = &tuning.cone;
    let facing = player.body.facing;
    let origin = player.body.center()
        + Vec2::new(facing.sign() * (player.body.size.x * 0.5 + t.offset), -10.0);
    ConeBlast {
        origin,
        facing,
        half_angle: t.half_angle_deg.to_radians(),
        radius: t.radius,
        dps: t.dps,
        push: t.push,
        push_base: t.push_base,
        lift: t.lift,
        stun: t.stun,
    }
}

// ── Strike resolution ─────────────────────────────────────────────────────────

/// Apply a melee strike to every live enemy in front of it.  Every hit deals
/// damage and knockback and forces a stun.  Returns the number of hits.
pub fn resolve_melee(
    strike: &MeleeStrike,
    enemies: &mut [Enemy],
    band: f32,
    out: &mut FrameOutput,
    rng: &mut impl Rng,
) -> usize {
    let mut hits = 0;
    for enemy in enemies.iter_mut().filter(|e| !e.body.dead) {
        let center = enemy.body.center();
        if !in_frontal_reach(strike.origin, strike.facing, center, strike.reach, band) {
            continue;
        }
        enemy.body.take_damage(strike.damage, strike.knockback);
        enemy.stun(strike.stun);
        emit(&mut out.particles, rng, center, &Burst::impact(ParticleColor::Yellow, 12));
        hits += 1;
    }

    if hits > 0 {
        let s = strike.facing.sign();
        let swoosh = Burst {
            count: 10,
            vx: if s > 0.0 { 200.0..=320.0 } else { -320.0..=-200.0 },
            vy: -60.0..=60.0,
            life: 0.18,
            color: ParticleColor::White,
            radius: 2.0..=3.0,
        };
        emit(&mut out.particles, rng, strike.origin + Vec2::new(s * 20.0, 0.0), &swoosh);
    }
    hits
}

/// Push, stun and lightly damage every live enemy inside the cone.  Strength
/// falls off linearly to zero at the cone's radius.  Returns the number hit.
pub fn resolve_cone(
    cone: &ConeBlast,
    enemies: &mut [Enemy],
    dt: f32,
    out: &mut FrameOutput,
    rng: &mut impl Rng,
) -> usize {
    let forward = cone.facing.unit();
    let s = cone.facing.sign();
    let mut hits = 0;
    for enemy in enemies.iter_mut().filter(|e| !e.body.dead) {
        let v = enemy.body.center() - cone.origin;
        let dist = v.length();
        if dist == 0.0 || dist >= cone.radius {
            continue;
        }
        if angle_between(forward, v) >= cone.half_angle {
            continue;
        }
        let force = 1.0 - dist / cone.radius;
        enemy.body.vel += Vec2::new(s * (cone.push * force + cone.push_base), -cone.lift * force);
        enemy.stun(cone.stun);
        enemy.body.take_damage(cone.dps * force * dt, Vec2::ZERO);
        hits += 1;
    }

    let mist = Burst {
        count: CONE_MIST_PARTICLES,
        vx: if s > 0.0 { 300.0..=480.0 } else { -480.0..=-300.0 },
        vy: -40.0..=40.0,
        life: 0.25,
        color: ParticleColor::Cyan,
        radius: 2.0..=4.0,
    };
    emit(&mut out.particles, rng, cone.origin, &mist);
    hits
}
