//! Patrolling enemy agent
//!
//! Enemies walk until the player comes within the aggro radius, then steer
//! toward the player whenever the player is standing on something. A ground
//! probe just past the leading foot turns them around at platform edges, and
//! that reversal wins over the chase on the same tick.

use glam::Vec2;

use super::physics::{Body, Rect};
use crate::consts::{AGGRO_RADIUS, EDGE_PROBE_MARGIN, ENEMY_SIZE};
use crate::extent;

/// What the agent decided this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Steering {
    /// Player out of range; keep the current velocity
    Patrol,
    /// Heading toward the player (or holding course while the player is airborne)
    Chase,
    /// No ground ahead, turned around
    Reverse,
}

#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: u32,
    pub body: Body,
    is_fast: bool,
}

impl Enemy {
    /// Spawn walking left at the given tier speed
    pub fn new(id: u32, pos: Vec2, is_fast: bool, speed: f32) -> Self {
        let mut body = Body::new(pos, extent(ENEMY_SIZE));
        body.bounce.x = 1.0;
        body.vel.x = -speed;
        Self { id, body, is_fast }
    }

    pub fn is_fast(&self) -> bool {
        self.is_fast
    }

    /// Patrol direction follows the sign of the horizontal velocity
    pub fn facing_left(&self) -> bool {
        self.body.vel.x < 0.0
    }

    /// One AI decision
    pub fn think(
        &mut self,
        player_pos: Vec2,
        player_grounded: bool,
        speed: f32,
        platforms: &[Rect],
        level_width: f32,
    ) -> Steering {
        if self.body.pos.distance(player_pos) >= AGGRO_RADIUS {
            return Steering::Patrol;
        }

        if player_grounded {
            self.body.vel.x = if self.body.pos.x > player_pos.x {
                -speed
            } else {
                speed
            };
        }

        if self.body.on_ground() {
            if let Some(probe) = ground_probe(&self.body) {
                if !has_ground(probe, platforms, level_width) {
                    self.body.vel.x = -self.body.vel.x;
                    return Steering::Reverse;
                }
            }
        }
        Steering::Chase
    }
}

/// Point just past the leading foot in the direction of travel; `None` when standing still
pub fn ground_probe(body: &Body) -> Option<Vec2> {
    let vx = body.vel.x;
    if vx == 0.0 {
        return None;
    }
    let ahead = body.half.x + EDGE_PROBE_MARGIN;
    let x = if vx > 0.0 {
        body.pos.x + ahead
    } else {
        body.pos.x - ahead
    };
    Some(Vec2::new(x, body.pos.y + body.half.y + EDGE_PROBE_MARGIN))
}

/// Whether any platform holds the probe point. Outside the level never counts as ground.
pub fn has_ground(probe: Vec2, platforms: &[Rect], level_width: f32) -> bool {
    if probe.x < 0.0 || probe.x > level_width {
        return false;
    }
    platforms.iter().any(|p| p.contains(probe))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::level::{ground_strip, ledge};

    const WIDTH: f32 = 4000.0;

    fn standing_on(platform: &Rect, x: f32, vx: f32) -> Enemy {
        let y = platform.min.y - ENEMY_SIZE.1 / 2.0;
        let mut e = Enemy::new(1, Vec2::new(x, y), false, 50.0);
        e.body.vel.x = vx;
        e.body.touching.down = true;
        e
    }

    #[test]
    fn test_spawns_walking_left() {
        let e = Enemy::new(3, Vec2::new(500.0, 415.0), true, 100.0);
        assert_eq!(e.body.vel.x, -100.0);
        assert!(e.facing_left());
        assert!(e.is_fast());
    }

    #[test]
    fn test_out_of_range_keeps_velocity() {
        let ground = ground_strip(WIDTH);
        let mut e = standing_on(&ground, 2000.0, 50.0);
        let steering = e.think(Vec2::new(100.0, 430.0), true, 80.0, &[ground], WIDTH);
        assert_eq!(steering, Steering::Patrol);
        assert_eq!(e.body.vel.x, 50.0);
    }

    #[test]
    fn test_chases_grounded_player() {
        let ground = ground_strip(WIDTH);
        let mut e = standing_on(&ground, 1000.0, 50.0);
        let steering = e.think(Vec2::new(700.0, 430.0), true, 80.0, &[ground], WIDTH);
        assert_eq!(steering, Steering::Chase);
        assert_eq!(e.body.vel.x, -80.0);

        // Airborne player: hold course
        let steering = e.think(Vec2::new(1300.0, 300.0), false, 80.0, &[ground], WIDTH);
        assert_eq!(steering, Steering::Chase);
        assert_eq!(e.body.vel.x, -80.0);
    }

    #[test]
    fn test_edge_reversal_beats_chase() {
        let platform = ledge(600.0, 250.0, 3);
        // Right edge of the ledge is at x=648; leading foot probe lands past it
        let mut e = standing_on(&platform, 640.0, 50.0);
        let steering = e.think(Vec2::new(900.0, 430.0), true, 80.0, &[platform], WIDTH);
        assert_eq!(steering, Steering::Reverse);
        assert_eq!(e.body.vel.x, -80.0);
        assert!(e.facing_left());
    }

    #[test]
    fn test_no_reversal_mid_platform_or_in_air() {
        let platform = ledge(600.0, 250.0, 3);
        let mut e = standing_on(&platform, 600.0, 50.0);
        e.think(Vec2::new(900.0, 430.0), true, 80.0, &[platform], WIDTH);
        assert_eq!(e.body.vel.x, 80.0);

        let mut airborne = standing_on(&platform, 640.0, 50.0);
        airborne.body.touching.down = false;
        assert_eq!(
            airborne.think(Vec2::new(900.0, 430.0), true, 80.0, &[platform], WIDTH),
            Steering::Chase
        );
        assert_eq!(airborne.body.vel.x, 80.0);
    }

    #[test]
    fn test_probe_outside_level_is_not_ground() {
        let ground = ground_strip(WIDTH);
        assert!(!has_ground(Vec2::new(-1.0, 455.0), &[ground], WIDTH));
        assert!(!has_ground(Vec2::new(WIDTH + 1.0, 455.0), &[ground], WIDTH));
        assert!(has_ground(Vec2::new(10.0, 455.0), &[ground], WIDTH));

        let mut body = Body::new(Vec2::new(100.0, 435.0), extent(ENEMY_SIZE));
        assert!(ground_probe(&body).is_none());
        body.vel.x = -10.0;
        assert_eq!(ground_probe(&body), Some(Vec2::new(79.0, 455.0)));
    }
}
