//! Arcade physics substrate
//!
//! Axis-aligned rigid bodies with gravity, velocity, static solids and
//! overlap queries. Gameplay code reads the contact faces this module reports
//! and never moves bodies through walls itself.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::GRAVITY;

/// Extra vertical/horizontal slack when classifying which faces of two
/// overlapping bodies touch
pub const OVERLAP_BIAS: f32 = 4.0;

/// Axis-aligned rectangle (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    /// Rectangle from its top-left corner and size
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            max: Vec2::new(x + width, y + height),
        }
    }

    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Point containment, edges included
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Strict intersection (shared edges do not count)
    pub fn intersects(&self, other: &Rect) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

/// Which faces of a body are in contact
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faces {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl Faces {
    /// Add the faces set in `other`
    pub fn merge(&mut self, other: Faces) {
        self.up |= other.up;
        self.down |= other.down;
        self.left |= other.left;
        self.right |= other.right;
    }
}

/// How a body interacts with the level bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorldBounds {
    /// Free to leave the level in any direction
    Ignore,
    /// Clamped on all four sides
    Collide,
    /// Clamped left, right and top; can fall out of the bottom
    OpenBottom,
}

/// A dynamic body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    /// Centre position
    pub pos: Vec2,
    /// Centre position before the last step
    pub prev: Vec2,
    pub half: Vec2,
    pub vel: Vec2,
    /// Affected by gravity
    pub gravity: bool,
    /// Integrated at all (false = frozen in place)
    pub moves: bool,
    /// Takes part in solid collision and overlap queries
    pub collides: bool,
    /// Restitution per axis applied on solid/bounds contact
    pub bounce: Vec2,
    pub bounds: WorldBounds,
    /// Faces touching a solid or another body this step
    pub touching: Faces,
    /// Faces pressed against the level bounds this step
    pub blocked: Faces,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            prev: pos,
            half: size * 0.5,
            vel: Vec2::ZERO,
            gravity: true,
            moves: true,
            collides: true,
            bounce: Vec2::ZERO,
            bounds: WorldBounds::Collide,
            touching: Faces::default(),
            blocked: Faces::default(),
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::from_center(self.pos, self.half * 2.0)
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.half * 2.0
    }

    /// Movement over the last step
    #[inline]
    pub fn delta(&self) -> Vec2 {
        self.pos - self.prev
    }

    /// Standing on a solid or on the bottom of the level
    #[inline]
    pub fn on_ground(&self) -> bool {
        self.touching.down || self.blocked.down
    }

    /// Teleport, clearing motion and contacts
    pub fn place(&mut self, pos: Vec2) {
        self.pos = pos;
        self.prev = pos;
        self.vel = Vec2::ZERO;
        self.touching = Faces::default();
        self.blocked = Faces::default();
    }
}

/// Advance one body by `dt` seconds against static solids and the level
/// bounds. Returns the indices of the solids it collided with.
pub fn step(body: &mut Body, solids: &[Rect], bounds: Rect, dt: f32) -> Vec<usize> {
    body.touching = Faces::default();
    body.blocked = Faces::default();
    body.prev = body.pos;

    let mut hits = Vec::new();
    if !body.moves {
        return hits;
    }

    if body.gravity {
        body.vel.y += GRAVITY * dt;
    }

    // X axis first, resolved only against solids we were not already inside
    body.pos.x += body.vel.x * dt;
    if body.collides {
        for (i, solid) in solids.iter().enumerate() {
            if !body.rect().intersects(solid) {
                continue;
            }
            let before = Rect::from_center(Vec2::new(body.prev.x, body.pos.y), body.size());
            if before.intersects(solid) {
                continue;
            }
            if body.prev.x <= solid.center().x {
                body.pos.x = solid.min.x - body.half.x;
                body.touching.right = true;
            } else {
                body.pos.x = solid.max.x + body.half.x;
                body.touching.left = true;
            }
            body.vel.x = -body.vel.x * body.bounce.x;
            hits.push(i);
        }
    }

    body.pos.y += body.vel.y * dt;
    if body.collides {
        for (i, solid) in solids.iter().enumerate() {
            if !body.rect().intersects(solid) {
                continue;
            }
            let prev_top = body.prev.y - body.half.y;
            if prev_top >= solid.max.y {
                body.pos.y = solid.max.y + body.half.y;
                body.touching.up = true;
            } else {
                // Landing, or already sunk into the solid: push out on top
                body.pos.y = solid.min.y - body.half.y;
                body.touching.down = true;
            }
            body.vel.y = -body.vel.y * body.bounce.y;
            if !hits.contains(&i) {
                hits.push(i);
            }
        }
    }

    if body.bounds != WorldBounds::Ignore {
        clamp_to_bounds(body, bounds);
    }

    hits
}

fn clamp_to_bounds(body: &mut Body, bounds: Rect) {
    let r = body.rect();
    if r.min.x < bounds.min.x {
        body.pos.x = bounds.min.x + body.half.x;
        body.blocked.left = true;
        body.vel.x = -body.vel.x * body.bounce.x;
    } else if r.max.x > bounds.max.x {
        body.pos.x = bounds.max.x - body.half.x;
        body.blocked.right = true;
        body.vel.x = -body.vel.x * body.bounce.x;
    }
    if r.min.y < bounds.min.y {
        body.pos.y = bounds.min.y + body.half.y;
        body.blocked.up = true;
        body.vel.y = -body.vel.y * body.bounce.y;
    } else if r.max.y > bounds.max.y && body.bounds == WorldBounds::Collide {
        body.pos.y = bounds.max.y - body.half.y;
        body.blocked.down = true;
        body.vel.y = -body.vel.y * body.bounce.y;
    }
}

/// Contact faces for two overlapping bodies, `None` when they do not overlap.
///
/// Faces are classified from each body's movement over the last step: the body
/// that moved further down has its `down` face against the other's `up` face,
/// provided the vertical penetration is within the bias plus both deltas.
/// Horizontal faces follow the same rule.
pub fn contact(a: &Body, b: &Body) -> Option<(Faces, Faces)> {
    if !a.collides || !b.collides {
        return None;
    }
    let ra = a.rect();
    let rb = b.rect();
    if !ra.intersects(&rb) {
        return None;
    }

    let da = a.delta();
    let db = b.delta();
    let mut fa = Faces::default();
    let mut fb = Faces::default();

    let max_y = OVERLAP_BIAS + da.y.abs() + db.y.abs();
    if da.y > db.y {
        if ra.max.y - rb.min.y <= max_y {
            fa.down = true;
            fb.up = true;
        }
    } else if da.y < db.y && rb.max.y - ra.min.y <= max_y {
        fa.up = true;
        fb.down = true;
    }

    let max_x = OVERLAP_BIAS + da.x.abs() + db.x.abs();
    if da.x > db.x {
        if ra.max.x - rb.min.x <= max_x {
            fa.right = true;
            fb.left = true;
        }
    } else if da.x < db.x && rb.max.x - ra.min.x <= max_x {
        fa.left = true;
        fb.right = true;
    }

    Some((fa, fb))
}

/// Plain rectangle overlap between two live bodies
pub fn overlaps(a: &Body, b: &Body) -> bool {
    a.collides && b.collides && a.rect().intersects(&b.rect())
}
