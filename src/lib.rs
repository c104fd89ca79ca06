//! Gucci's Adventure - a side-scrolling platformer simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics substrate, player, enemies, boss, level sessions)
//! - `persistence`: Progression store (highest unlocked level)
//! - `hud`: Presentation bridge model driven by gameplay events
//! - `settings`: Player preferences
//! - `game`: Menu / level-select driver that owns sessions

pub mod game;
pub mod hud;
pub mod persistence;
pub mod settings;
pub mod sim;

pub use game::{Game, GameError, Screen};
pub use hud::HudState;
pub use persistence::{MemoryStore, ProgressionStore, StoreError};
pub use settings::{Settings, TouchControls};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, the rate the gameplay numbers were tuned at)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// World height; also the fall-out threshold for the player's centre
    pub const WORLD_HEIGHT: f32 = 600.0;
    /// Downward acceleration (units/s²)
    pub const GRAVITY: f32 = 600.0;

    /// Camera viewport
    pub const VIEW_WIDTH: f32 = 800.0;
    pub const VIEW_HEIGHT: f32 = 600.0;
    pub const CAMERA_LERP: f32 = 0.05;

    /// Player
    pub const PLAYER_SIZE: (f32, f32) = (32.0, 40.0);
    pub const PLAYER_SPAWN: (f32, f32) = (100.0, 400.0);
    pub const PLAYER_RUN_SPEED: f32 = 200.0;
    pub const PLAYER_JUMP_VELOCITY: f32 = -400.0;
    pub const MAX_JUMPS: u8 = 2;
    pub const MAX_HEALTH: u8 = 5;
    pub const MAX_POWER: u8 = 5;
    /// Super-power duration (ms)
    pub const SUPER_POWER_MS: u64 = 5000;
    /// Degrees added to the player's rotation per tick while super-powered
    pub const SUPER_SPIN_DEG: f32 = 20.0;
    /// Invincibility flicker: half-period (ms) and number of half-periods (600 ms total)
    pub const FLICKER_HALF_PERIOD_MS: u64 = 100;
    pub const FLICKER_HALF_PERIODS: u32 = 6;
    pub const DEATH_HOP_VELOCITY: f32 = -300.0;

    /// Enemies
    pub const ENEMY_SIZE: (f32, f32) = (32.0, 30.0);
    pub const AGGRO_RADIUS: f32 = 800.0;
    /// Distance past the leading edge / feet where the ground probe is taken
    pub const EDGE_PROBE_MARGIN: f32 = 5.0;
    pub const ENEMY_SPAWN_INTERVAL_MS: u64 = 5000;
    pub const STOMP_BOUNCE_VELOCITY: f32 = -300.0;

    /// Boss
    pub const BOSS_SIZE: (f32, f32) = (64.0, 64.0);
    pub const BOSS_MAX_HEALTH: i32 = 6;
    pub const BOSS_BOUNCE: f32 = 0.2;
    pub const BOSS_HIT_FLASH_MS: u64 = 500;
    pub const BOSS_STOMP_BOUNCE_VELOCITY: f32 = -400.0;
    /// Super-powered contact applies these two hits in sequence every overlap tick
    pub const SUPER_HIT_DAMAGE: i32 = 3;
    pub const SUPER_FOLLOWUP_DAMAGE: i32 = 1;
    pub const KNOCKBACK_VELOCITY: (f32, f32) = (300.0, -200.0);

    /// Key, goal and collectibles
    pub const KEY_SIZE: (f32, f32) = (16.0, 8.0);
    pub const KEY_LAUNCH_VELOCITY: f32 = -350.0;
    pub const CAGE_SIZE: (f32, f32) = (48.0, 48.0);
    pub const GOAL_SIZE: (f32, f32) = (32.0, 40.0);
    pub const TREAT_SIZE: (f32, f32) = (16.0, 16.0);

    /// Level flow (ms)
    pub const NEXT_LEVEL_DELAY_MS: u64 = 3000;
    pub const EXIT_CONFIRM_DELAY_MS: u64 = 500;

    /// Platforms
    pub const TILE: f32 = 32.0;
    pub const GROUND_TOP: f32 = 450.0;
}

/// Construct a `Vec2` from a `(w, h)` size constant
#[inline]
pub fn extent(size: (f32, f32)) -> Vec2 {
    Vec2::new(size.0, size.1)
}
