//! Boss encounter
//!
//! Dormant -> Engaged follows camera visibility every tick (and back again
//! when the boss scrolls out of view). Defeated is terminal. Hits are rate
//! limited by a short hit-flash window whose expiry timer lives in the
//! session scheduler.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::events::{EventBus, GameEvent};
use super::physics::Body;
use crate::consts::{BOSS_BOUNCE, BOSS_MAX_HEALTH, BOSS_SIZE};
use crate::extent;

/// Tint shown during the hit-flash window
pub const TINT_HIT: u32 = 0xFF0000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossState {
    Dormant,
    Engaged,
    Defeated,
}

/// Outcome of a damage request
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BossHit {
    /// Flash window active or boss already defeated
    Ignored,
    /// Health reduced, flash window armed
    Hit { health: i32 },
    /// Health reached zero; the boss is gone and this is where it stood
    Defeated { at: Vec2 },
}

#[derive(Debug, Clone)]
pub struct Boss {
    pub body: Body,
    health: i32,
    state: BossState,
    hit_flash: bool,
    pub facing_left: bool,
    pub tint: Option<u32>,
}

impl Boss {
    pub fn new(pos: Vec2) -> Self {
        let mut body = Body::new(pos, extent(BOSS_SIZE));
        body.bounce = Vec2::splat(BOSS_BOUNCE);
        Self {
            body,
            health: BOSS_MAX_HEALTH,
            state: BossState::Dormant,
            hit_flash: false,
            facing_left: true,
            tint: None,
        }
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn state(&self) -> BossState {
        self.state
    }

    pub fn is_alive(&self) -> bool {
        self.state != BossState::Defeated
    }

    pub fn is_engaged(&self) -> bool {
        self.state == BossState::Engaged
    }

    pub fn in_hit_flash(&self) -> bool {
        self.hit_flash
    }

    /// Per-tick engagement check and steering.
    ///
    /// `visible` is whether the camera view contains the boss position.
    /// Transitions publish once; steering only happens toward a grounded player.
    pub fn update(
        &mut self,
        visible: bool,
        player_pos: Vec2,
        player_grounded: bool,
        speed: f32,
        events: &mut EventBus,
    ) {
        if !self.is_alive() {
            return;
        }

        if visible {
            if self.state == BossState::Dormant {
                self.state = BossState::Engaged;
                log::debug!("Boss engaged at {:?}", self.body.pos);
                events.publish(GameEvent::BossActive(true));
                events.publish(GameEvent::BossHealth(self.health));
            }
            if player_grounded {
                if self.body.pos.x > player_pos.x {
                    self.body.vel.x = -speed;
                    self.facing_left = true;
                } else {
                    self.body.vel.x = speed;
                    self.facing_left = false;
                }
            }
        } else {
            self.body.vel.x = 0.0;
            if self.state == BossState::Engaged {
                self.state = BossState::Dormant;
                events.publish(GameEvent::BossActive(false));
            }
        }
    }

    /// Apply damage unless the hit-flash window is open. The caller arms the
    /// window's expiry timer on `Hit` and spawns the key on `Defeated`.
    pub fn damage(&mut self, amount: i32, events: &mut EventBus) -> BossHit {
        if !self.is_alive() || self.hit_flash {
            return BossHit::Ignored;
        }

        self.health -= amount;
        events.publish(GameEvent::BossHealth(self.health));
        self.tint = Some(TINT_HIT);
        self.hit_flash = true;

        if self.health <= 0 {
            self.state = BossState::Defeated;
            self.body.collides = false;
            self.body.moves = false;
            self.body.vel = Vec2::ZERO;
            log::info!("Boss defeated at {:?}", self.body.pos);
            return BossHit::Defeated { at: self.body.pos };
        }
        BossHit::Hit {
            health: self.health,
        }
    }

    /// Close the hit-flash window. No-op once defeated.
    pub fn clear_flash(&mut self) {
        if !self.is_alive() {
            return;
        }
        self.hit_flash = false;
        self.tint = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boss() -> Boss {
        Boss::new(Vec2::new(3800.0, 350.0))
    }

    #[test]
    fn test_engagement_is_edge_triggered() {
        let mut bus = EventBus::new();
        let log = bus.record();
        let mut b = boss();
        let player = Vec2::new(3500.0, 430.0);

        b.update(true, player, true, 125.0, &mut bus);
        b.update(true, player, true, 125.0, &mut bus);
        assert!(b.is_engaged());
        assert_eq!(b.body.vel.x, -125.0);
        assert!(b.facing_left);
        assert_eq!(
            *log.borrow(),
            vec![GameEvent::BossActive(true), GameEvent::BossHealth(6)]
        );

        log.borrow_mut().clear();
        b.update(false, player, true, 125.0, &mut bus);
        b.update(false, player, true, 125.0, &mut bus);
        assert_eq!(b.state(), BossState::Dormant);
        assert_eq!(b.body.vel.x, 0.0);
        assert_eq!(*log.borrow(), vec![GameEvent::BossActive(false)]);
    }

    #[test]
    fn test_steers_only_toward_grounded_player() {
        let mut bus = EventBus::new();
        let mut b = boss();
        b.update(true, Vec2::new(3900.0, 300.0), false, 125.0, &mut bus);
        assert_eq!(b.body.vel.x, 0.0);
        b.update(true, Vec2::new(3900.0, 430.0), true, 125.0, &mut bus);
        assert_eq!(b.body.vel.x, 125.0);
        assert!(!b.facing_left);
    }

    #[test]
    fn test_hit_flash_caps_damage_rate() {
        let mut bus = EventBus::new();
        let mut b = boss();
        assert_eq!(b.damage(1, &mut bus), BossHit::Hit { health: 5 });
        assert!(b.in_hit_flash());
        assert_eq!(b.tint, Some(TINT_HIT));
        assert_eq!(b.damage(1, &mut bus), BossHit::Ignored);
        assert_eq!(b.health(), 5);

        b.clear_flash();
        assert_eq!(b.tint, None);
        assert_eq!(b.damage(3, &mut bus), BossHit::Hit { health: 2 });
    }

    #[test]
    fn test_defeat_is_terminal() {
        let mut bus = EventBus::new();
        let log = bus.record();
        let mut b = boss();
        b.damage(3, &mut bus);
        b.clear_flash();
        b.damage(2, &mut bus);
        b.clear_flash();
        let hit = b.damage(3, &mut bus);
        assert_eq!(hit, BossHit::Defeated { at: Vec2::new(3800.0, 350.0) });
        assert_eq!(b.health(), -2);
        assert!(!b.is_alive());
        assert!(!b.body.collides);

        log.borrow_mut().clear();
        b.clear_flash();
        assert_eq!(b.damage(1, &mut bus), BossHit::Ignored);
        b.update(true, Vec2::ZERO, true, 125.0, &mut bus);
        assert!(log.borrow().is_empty());
        assert_eq!(b.state(), BossState::Defeated);
    }
}
