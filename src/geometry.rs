//! 2D vector and rectangle helpers shared by every simulation module.
//!
//! Positions are top-left corners in world pixels, +y points down (screen
//! convention), so "up" is negative y.

pub use glam::Vec2;
use serde::{Deserialize, Serialize};

// ── Facing ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    /// −1.0 for left, +1.0 for right.
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    pub fn unit(self) -> Vec2 {
        Vec2::new(self.sign(), 0.0)
    }

    /// Facing implied by a horizontal component; keeps `current` when `x` is 0.
    pub fn from_x(x: f32, current: Facing) -> Facing {
        if x > 0.0 {
            Facing::Right
        } else if x < 0.0 {
            Facing::Left
        } else {
            current
        }
    }
}

// ── Vectors ───────────────────────────────────────────────────────────────────

/// Unit vector along `v`, or `fallback` when `v` has zero (or non-finite) length.
pub fn direction_or(v: Vec2, fallback: Vec2) -> Vec2 {
    v.normalize_or(fallback)
}

/// Angle in radians between two non-zero vectors, always in `[0, π]`.
pub fn angle_between(a: Vec2, b: Vec2) -> f32 {
    let denom = a.length() * b.length();
    if denom <= f32::EPSILON {
        return 0.0;
    }
    (a.dot(b) / denom).clamp(-1.0, 1.0).acos()
}

// ── Rect ──────────────────────────────────────────────────────────────────────

/// Axis-aligned rectangle: top-left corner plus width/height.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Rect { x, y, w, h }
    }

    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Rect::new(pos.x, pos.y, size.x, size.y)
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w * 0.5, self.y + self.h * 0.5)
    }

    /// Strict overlap: rectangles that only share an edge do not collide.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.left() && p.x <= self.right() && p.y >= self.top() && p.y <= self.bottom()
    }

    /// True when any part of the segment `a → b` lies inside or on the rectangle
    /// (Liang–Barsky clip).
    pub fn intersects_segment(&self, a: Vec2, b: Vec2) -> bool {
        let d = b - a;
        let mut t0 = 0.0_f32;
        let mut t1 = 1.0_f32;
        let edges = [
            (-d.x, a.x - self.left()),
            (d.x, self.right() - a.x),
            (-d.y, a.y - self.top()),
            (d.y, self.bottom() - a.y),
        ];
        for (p, q) in edges {
            if p == 0.0 {
                // Parallel to this edge pair: reject if outside the slab.
                if q < 0.0 {
                    return false;
                }
                continue;
            }
            let r = q / p;
            if p < 0.0 {
                if r > t1 {
                    return false;
                }
                t0 = t0.max(r);
            } else {
                if r < t0 {
                    return false;
                }
                t1 = t1.min(r);
            }
        }
        true
    }
}

// ── Frontal strike test ───────────────────────────────────────────────────────

/// The one hit predicate used by every melee swing.
///
/// `target` is hit when it lies in the half-plane in front of `origin`
/// (relative to `facing`), within `reach` of it, and within `band` vertically.
pub fn in_frontal_reach(origin: Vec2, facing: Facing, target: Vec2, reach: f32, band: f32) -> bool {
    let to = target - origin;
    to.x * facing.sign() >= 0.0 && to.length() <= reach && to.y.abs() < band
}
