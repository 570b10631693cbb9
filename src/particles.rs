//! Cosmetic particles: drift, drag, shrink, expire.

use std::ops::RangeInclusive;

use rand::Rng;

use crate::entities::{Particle, ParticleColor};
use crate::geometry::Vec2;

/// Velocity multiplier applied every update.
const DRAG: f32 = 0.98;
/// Radius lost per second.
const SHRINK_RATE: f32 = 40.0;

impl Particle {
    pub fn new(pos: Vec2, vel: Vec2, life: f32, color: ParticleColor, radius: f32) -> Self {
        Particle { pos, vel, life, radius, color }
    }

    pub fn update(&mut self, dt: f32) {
        self.life -= dt;
        self.pos += self.vel * dt;
        self.vel *= DRAG;
        self.radius = (self.radius - SHRINK_RATE * dt).max(0.0);
    }

    pub fn alive(&self) -> bool {
        self.life > 0.0 && self.radius > 0.0
    }
}

/// Shape of a burst: per-axis velocity ranges plus lifetime, colour, radius.
#[derive(Clone, Debug)]
pub struct Burst {
    pub count: usize,
    pub vx: RangeInclusive<f32>,
    pub vy: RangeInclusive<f32>,
    pub life: f32,
    pub color: ParticleColor,
    pub radius: RangeInclusive<f32>,
}

impl Burst {
    /// Sparks thrown up and out of a struck enemy.
    pub fn impact(color: ParticleColor, count: usize) -> Self {
        Burst {
            count,
            vx: -180.0..=180.0,
            vy: -220.0..=-60.0,
            life: 0.4,
            color,
            radius: 2.0..=4.0,
        }
    }

    /// Larger burst left behind by a dying enemy.
    pub fn death() -> Self {
        Burst {
            count: 14,
            vx: -220.0..=220.0,
            vy: -260.0..=-60.0,
            life: 0.5,
            color: ParticleColor::Orange,
            radius: 2.0..=4.0,
        }
    }
}

/// Push `burst.count` particles starting at `at` onto `out`.
pub fn emit(out: &mut Vec<Particle>, rng: &mut impl Rng, at: Vec2, burst: &Burst) {
    out.extend((0..burst.count).map(|_| {
        let vel = Vec2::new(rng.gen_range(burst.vx.clone()), rng.gen_range(burst.vy.clone()));
        let radius = rng.gen_range(burst.radius.clone());
        Particle::new(at, vel, burst.life, burst.color, radius)
    }));
}

/// Advance every particle and keep only the live ones (fresh collection).
pub fn update_particles(particles: &[Particle], dt: f32) -> Vec<Particle> {
    particles
        .iter()
        .cloned()
        .filter_map(|mut p| {
            p.update(dt);
            if p.alive() {
                Some(p)
            } else {
                None
            }
        })
        .collect()
}
