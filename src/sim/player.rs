//! Player controller
//!
//! Movement, double jump, health, power meter and the two transient buffs
//! (post-hit invincibility flicker and super-power mode). Every counter change
//! is published on the bus in the same call that makes it.

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::events::{EventBus, GameEvent};
use super::physics::{Body, WorldBounds};
use super::tween::{Repeat, Tween};
use crate::consts::*;
use crate::extent;

/// Tint applied when health runs out
pub const TINT_DEAD: u32 = 0xFF0000;
/// Tint applied while super-powered
pub const TINT_SUPER: u32 = 0x00FFFF;

/// Logical inputs for one tick. `left`/`right` are held, `jump`/`power` are
/// "pressed this tick" edges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Controls {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub power: bool,
}

impl Controls {
    /// Per-signal logical OR of two input sources
    pub fn merge(self, other: Controls) -> Controls {
        Controls {
            left: self.left || other.left,
            right: self.right || other.right,
            jump: self.jump || other.jump,
            power: self.power || other.power,
        }
    }
}

/// Animation the renderer should play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerAnim {
    Idle,
    Walk,
    Jump,
}

/// The player-controlled cat
#[derive(Debug, Clone)]
pub struct Player {
    pub body: Body,
    jumps_used: u8,
    health: u8,
    treat_count: u32,
    power_charge: u8,
    super_powered: bool,
    invincible: bool,
    dead: bool,
    /// On-screen control overlay: held directions plus edges queued for next tick
    virtual_input: Controls,
    flicker: Option<Tween>,

    // Presentation state
    pub facing_left: bool,
    pub anim: PlayerAnim,
    /// Rotation in degrees
    pub angle: f32,
    pub alpha: f32,
    pub tint: Option<u32>,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        let mut body = Body::new(pos, extent(PLAYER_SIZE));
        body.bounds = WorldBounds::OpenBottom;
        Self {
            body,
            jumps_used: 0,
            health: MAX_HEALTH,
            treat_count: 0,
            power_charge: 0,
            super_powered: false,
            invincible: false,
            dead: false,
            virtual_input: Controls::default(),
            flicker: None,
            facing_left: false,
            anim: PlayerAnim::Idle,
            angle: 0.0,
            alpha: 1.0,
            tint: None,
        }
    }

    pub fn health(&self) -> u8 {
        self.health
    }

    pub fn treat_count(&self) -> u32 {
        self.treat_count
    }

    pub fn power_charge(&self) -> u8 {
        self.power_charge
    }

    pub fn jumps_used(&self) -> u8 {
        self.jumps_used
    }

    pub fn is_super_powered(&self) -> bool {
        self.super_powered
    }

    pub fn is_invincible(&self) -> bool {
        self.invincible
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn pos(&self) -> Vec2 {
        self.body.pos
    }

    pub fn on_ground(&self) -> bool {
        self.body.on_ground()
    }

    pub fn set_virtual_left(&mut self, down: bool) {
        self.virtual_input.left = down;
    }

    pub fn set_virtual_right(&mut self, down: bool) {
        self.virtual_input.right = down;
    }

    /// Queue a jump edge from the overlay; consumed by the next tick
    pub fn virtual_jump(&mut self) {
        self.virtual_input.jump = true;
    }

    /// Queue a power edge from the overlay; consumed by the next tick
    pub fn virtual_power(&mut self) {
        self.virtual_input.power = true;
    }

    /// Merge physical input with the overlay, consuming queued overlay edges
    pub fn take_controls(&mut self, physical: Controls) -> Controls {
        let merged = physical.merge(self.virtual_input);
        self.virtual_input.jump = false;
        self.virtual_input.power = false;
        merged
    }

    /// Apply one tick of movement and jump input
    pub fn update(&mut self, controls: &Controls) {
        if self.dead {
            return;
        }

        let grounded = self.body.on_ground();
        if grounded {
            self.jumps_used = 0;
        }

        if controls.left {
            self.body.vel.x = -PLAYER_RUN_SPEED;
            self.facing_left = true;
        } else if controls.right {
            self.body.vel.x = PLAYER_RUN_SPEED;
            self.facing_left = false;
        } else {
            self.body.vel.x = 0.0;
        }

        self.anim = if !grounded {
            PlayerAnim::Jump
        } else if controls.left || controls.right {
            PlayerAnim::Walk
        } else {
            PlayerAnim::Idle
        };

        if controls.jump {
            self.try_jump();
        }

        if self.super_powered {
            self.angle = (self.angle + SUPER_SPIN_DEG) % 360.0;
        } else {
            self.angle = 0.0;
        }
    }

    /// Jump if the budget allows. Grounded jump plus one mid-air jump.
    pub fn try_jump(&mut self) -> bool {
        if self.dead || self.jumps_used >= MAX_JUMPS {
            return false;
        }
        self.body.vel.y = PLAYER_JUMP_VELOCITY;
        self.jumps_used += 1;
        true
    }

    /// Advance the flicker animation; ends invincibility when it completes
    pub fn advance_effects(&mut self, dt: Duration) {
        if let Some(flicker) = self.flicker.as_mut() {
            let done = flicker.advance(dt);
            self.alpha = flicker.value();
            if done {
                self.flicker = None;
                self.invincible = false;
                self.alpha = 1.0;
            }
        }
    }

    /// Lose one health unless immune. Returns true if health was lost.
    pub fn take_damage(&mut self, events: &mut EventBus) -> bool {
        if self.dead || self.invincible || self.super_powered {
            return false;
        }

        self.health = self.health.saturating_sub(1);
        events.publish(GameEvent::HealthChanged(self.health));

        if self.health == 0 {
            self.die(events);
        } else {
            self.start_flicker();
        }
        true
    }

    fn die(&mut self, events: &mut EventBus) {
        self.dead = true;
        self.tint = Some(TINT_DEAD);
        self.body.vel = Vec2::new(0.0, DEATH_HOP_VELOCITY);
        self.body.collides = false;
        self.flicker = None;
        self.invincible = false;
        self.alpha = 1.0;
        log::info!("Player died at {:?}", self.body.pos);
        events.publish(GameEvent::Died);
    }

    fn start_flicker(&mut self) {
        self.invincible = true;
        let cycles = FLICKER_HALF_PERIODS / 2;
        self.flicker = Some(
            Tween::new(1.0, 0.5, Duration::from_millis(FLICKER_HALF_PERIOD_MS))
                .yoyo()
                .repeat(Repeat::Times(cycles.saturating_sub(1))),
        );
    }

    /// Add one power charge, capped
    pub fn increment_power(&mut self, events: &mut EventBus) {
        if self.dead || self.power_charge >= MAX_POWER {
            return;
        }
        self.power_charge += 1;
        events.publish(GameEvent::PowerChanged(self.power_charge));
    }

    /// Enter super-power mode if the meter is full. The caller owns the
    /// expiry timer. Returns true on activation.
    pub fn activate_super_power(&mut self, events: &mut EventBus) -> bool {
        if self.dead || self.super_powered || self.power_charge < MAX_POWER {
            return false;
        }
        self.super_powered = true;
        events.publish(GameEvent::PowerActive(true));
        self.power_charge = 0;
        events.publish(GameEvent::PowerChanged(0));
        self.tint = Some(TINT_SUPER);
        true
    }

    /// Leave super-power mode and clear its effects
    pub fn end_super_power(&mut self, events: &mut EventBus) {
        if !self.super_powered {
            return;
        }
        self.super_powered = false;
        events.publish(GameEvent::PowerActive(false));
        if !self.dead {
            self.tint = None;
        }
        self.angle = 0.0;
    }

    /// Collect a treat: heal one (capped) and count it
    pub fn get_treat(&mut self, events: &mut EventBus) {
        if self.dead {
            return;
        }
        if self.health < MAX_HEALTH {
            self.health += 1;
            events.publish(GameEvent::HealthChanged(self.health));
        }
        self.treat_count += 1;
        events.publish(GameEvent::TreatsChanged(self.treat_count));
    }

    /// Upward bounce after stomping something
    pub fn bounce(&mut self, vy: f32) {
        self.body.vel.y = vy;
    }

    /// Push away from a point horizontally and up
    pub fn knockback_from(&mut self, from_x: f32) {
        let (kx, ky) = KNOCKBACK_VELOCITY;
        self.body.vel.x = if self.body.pos.x < from_x { -kx } else { kx };
        self.body.vel.y = ky;
    }
}
