//! Entity base: movement, collision against static geometry, damage.
//!
//! Collision is a two-pass axis-separated resolve (X fully, then Y fully),
//! not a swept test.  Fast bodies can tunnel through thin geometry; the X→Y
//! order decides how corners resolve and must not change.

use crate::entities::{Body, Enemy, Player};
use crate::geometry::{Facing, Rect, Vec2};

/// Result of a damage attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitOutcome {
    /// Body was already dead or invulnerable; nothing changed.
    Ignored,
    Damaged,
    /// This hit took health to zero.  Reported exactly once per body.
    Killed,
}

impl HitOutcome {
    pub fn landed(self) -> bool {
        self != HitOutcome::Ignored
    }
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2, max_health: f32) -> Self {
        Body {
            pos,
            vel: Vec2::ZERO,
            size,
            health: max_health,
            max_health,
            invuln_timer: 0.0,
            on_ground: false,
            facing: Facing::Right,
            dead: false,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    pub fn health_ratio(&self) -> f32 {
        (self.health / self.max_health).clamp(0.0, 1.0)
    }

    pub fn apply_gravity(&mut self, dt: f32, gravity: f32) {
        self.vel.y += gravity * dt;
    }

    pub fn tick_invulnerability(&mut self, dt: f32) {
        self.invuln_timer = (self.invuln_timer - dt).max(0.0);
    }

    /// Integrate velocity and push the body out of every overlapping platform,
    /// horizontal axis first.  `on_ground` is true afterwards exactly when a
    /// downward move was stopped.
    pub fn move_and_collide(&mut self, dt: f32, platforms: &[Rect]) {
        self.pos.x += self.vel.x * dt;
        for p in platforms {
            if self.rect().overlaps(p) {
                if self.vel.x > 0.0 {
                    self.pos.x = p.left() - self.size.x;
                } else if self.vel.x < 0.0 {
                    self.pos.x = p.right();
                }
                self.vel.x = 0.0;
            }
        }

        self.pos.y += self.vel.y * dt;
        self.on_ground = false;
        for p in platforms {
            if self.rect().overlaps(p) {
                if self.vel.y > 0.0 {
                    self.pos.y = p.top() - self.size.y;
                    self.on_ground = true;
                } else if self.vel.y < 0.0 {
                    self.pos.y = p.bottom();
                }
                self.vel.y = 0.0;
            }
        }
    }

    /// Subtract `amount` (health clamped to `[0, max_health]`) and add
    /// `knockback` to velocity.  No-op when dead or invulnerable.
    pub fn take_damage(&mut self, amount: f32, knockback: Vec2) -> HitOutcome {
        if self.dead || self.invuln_timer > 0.0 {
            return HitOutcome::Ignored;
        }
        self.health = (self.health - amount).clamp(0.0, self.max_health);
        self.vel += knockback;
        if self.health <= 0.0 {
            self.dead = true;
            HitOutcome::Killed
        } else {
            HitOutcome::Damaged
        }
    }
}

/// Anything that owns a `Body` and can be hit.
pub trait Combatant {
    fn body(&self) -> &Body;
    fn body_mut(&mut self) -> &mut Body;

    fn is_dead(&self) -> bool {
        self.body().dead
    }
}

impl Combatant for Player {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}

impl Combatant for Enemy {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}

/// Time-scaled hazard damage from the first hazard the combatant overlaps.
/// Returns that hazard and the hit outcome, or `None` when it touches none.
pub fn apply_hazards<C: Combatant>(
    target: &mut C,
    hazards: &[Rect],
    dps: f32,
    lift: f32,
    dt: f32,
) -> Option<(Rect, HitOutcome)> {
    if target.is_dead() {
        return None;
    }
    let rect = target.body().rect();
    let zone = hazards.iter().find(|h| rect.overlaps(h)).copied()?;
    let outcome = target.body_mut().take_damage(dps * dt, Vec2::new(0.0, lift));
    Some((zone, outcome))
}
