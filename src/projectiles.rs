//! Rays and kinetic projectiles.
//!
//! A ray is an instant segment that pierces: it damages every opposing body it
//! crosses, every frame it is alive, scaled by frame time.  A kinetic
//! projectile travels at a fixed velocity and is spent on its first hit.

use rand::Rng;

use crate::config::Tuning;
use crate::entities::{Enemy, ParticleColor, Player, Stage};
use crate::events::{FrameEvent, FrameOutput};
use crate::geometry::{Rect, Vec2};
use crate::particles::{emit, Burst};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Owner {
    Player,
    Enemy,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Ray {
    pub start: Vec2,
    pub end: Vec2,
    pub dps: f32,
    /// Seconds the ray lives after it was (re)fired.
    pub duration: f32,
    pub age: f32,
    /// Applied to each body hit, every frame.
    pub knockback: Vec2,
    pub owner: Owner,
    /// Held beams are re-aimed each frame instead of stacking new rays.
    pub channelled: bool,
}

impl Ray {
    pub fn alive(&self) -> bool {
        self.age < self.duration
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Kinetic {
    /// Top-left corner.
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub damage: f32,
    pub knockback: Vec2,
    /// Remaining seconds.
    pub lifetime: f32,
    pub owner: Owner,
    pub alive: bool,
}

impl Kinetic {
    /// A projectile of `size` centred on `center`.
    pub fn new(
        center: Vec2,
        vel: Vec2,
        size: f32,
        damage: f32,
        knockback: Vec2,
        lifetime: f32,
        owner: Owner,
    ) -> Self {
        let size = Vec2::splat(size);
        Kinetic {
            pos: center - size * 0.5,
            vel,
            size,
            damage,
            knockback,
            lifetime,
            owner,
            alive: true,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Projectile {
    Ray(Ray),
    Kinetic(Kinetic),
}

impl Projectile {
    pub fn owner(&self) -> Owner {
        match self {
            Projectile::Ray(r) => r.owner,
            Projectile::Kinetic(k) => k.owner,
        }
    }

    pub fn alive(&self) -> bool {
        match self {
            Projectile::Ray(r) => r.alive(),
            Projectile::Kinetic(k) => k.alive,
        }
    }
}

/// Put a channelled ray in place: replace the owner's existing channelled ray
/// if there is one, otherwise append it.
pub fn channel_ray(projectiles: &mut Vec<Projectile>, ray: Ray) {
    let existing = projectiles.iter_mut().find(|p| match p {
        Projectile::Ray(r) => r.channelled && r.owner == ray.owner,
        Projectile::Kinetic(_) => false,
    });
    match existing {
        Some(slot) => *slot = Projectile::Ray(ray),
        None => projectiles.push(Projectile::Ray(ray)),
    }
}

/// Cut off the owner's channelled ray once it is no longer held.  It deals
/// no further damage and is culled at the end of the frame.
pub fn release_channel(projectiles: &mut [Projectile], owner: Owner) {
    for p in projectiles.iter_mut() {
        if let Projectile::Ray(r) = p {
            if r.channelled && r.owner == owner {
                r.age = r.age.max(r.duration);
            }
        }
    }
}

/// Advance every projectile one frame and apply its hits.
#[allow(clippy::too_many_arguments)]
pub fn resolve_projectiles(
    projectiles: &mut [Projectile],
    player: &mut Player,
    enemies: &mut [Enemy],
    stage: &Stage,
    tuning: &Tuning,
    dt: f32,
    out: &mut FrameOutput,
    rng: &mut impl Rng,
) {
    for projectile in projectiles.iter_mut() {
        match projectile {
            Projectile::Ray(ray) => resolve_ray(ray, player, enemies, tuning, dt, out),
            Projectile::Kinetic(k) => resolve_kinetic(k, player, enemies, stage, tuning, dt, out, rng),
        }
    }
}

fn resolve_ray(
    ray: &mut Ray,
    player: &mut Player,
    enemies: &mut [Enemy],
    tuning: &Tuning,
    dt: f32,
    out: &mut FrameOutput,
) {
    if ray.alive() {
        let amount = ray.dps * dt;
        match ray.owner {
            Owner::Player => {
                for enemy in enemies.iter_mut().filter(|e| !e.body.dead) {
                    if enemy.body.rect().intersects_segment(ray.start, ray.end) {
                        enemy.body.take_damage(amount, ray.knockback);
                    }
                }
            }
            Owner::Enemy => {
                if player.body.rect().intersects_segment(ray.start, ray.end) {
                    let amount = player.mitigate(amount, tuning.combat.block_multiplier);
                    if player.body.take_damage(amount, ray.knockback).landed() {
                        out.events.push(FrameEvent::PlayerDamaged { amount });
                    }
                }
            }
        }
    }
    ray.age += dt;
}

#[allow(clippy::too_many_arguments)]
fn resolve_kinetic(
    k: &mut Kinetic,
    player: &mut Player,
    enemies: &mut [Enemy],
    stage: &Stage,
    tuning: &Tuning,
    dt: f32,
    out: &mut FrameOutput,
    rng: &mut impl Rng,
) {
    if !k.alive {
        return;
    }
    k.pos += k.vel * dt;
    k.lifetime -= dt;
    let rect = k.rect();
    if k.lifetime <= 0.0
        || !rect.overlaps(&stage.bounds)
        || stage.platforms.iter().any(|p| rect.overlaps(p))
    {
        k.alive = false;
        return;
    }

    match k.owner {
        Owner::Player => {
            let target = enemies
                .iter_mut()
                .find(|e| !e.body.dead && e.body.rect().overlaps(&rect));
            if let Some(enemy) = target {
                enemy.body.take_damage(k.damage, k.knockback);
                emit(&mut out.particles, rng, enemy.body.center(), &Burst::impact(ParticleColor::Yellow, 8));
                k.alive = false;
            }
        }
        Owner::Enemy => {
            if !player.body.dead && player.body.rect().overlaps(&rect) {
                let amount = player.mitigate(k.damage, tuning.combat.block_multiplier);
                if player.body.take_damage(amount, k.knockback).landed() {
                    out.events.push(FrameEvent::PlayerDamaged { amount });
                    emit(&mut out.particles, rng, player.body.center(), &Burst::impact(ParticleColor::Red, 8));
                }
                k.alive = false;
            }
        }
    }
}
