//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod boss;
pub mod camera;
pub mod enemy;
pub mod events;
pub mod level;
pub mod physics;
pub mod player;
pub mod session;
pub mod timer;
pub mod tween;

pub use boss::{Boss, BossHit, BossState};
pub use camera::Camera;
pub use enemy::{Enemy, Steering};
pub use events::{EventBus, GameEvent, SubscriberId};
pub use level::{LEVEL_COUNT, LEVELS, LevelConfig, level};
pub use physics::{Body, Faces, Rect, WorldBounds};
pub use player::{Controls, Player, PlayerAnim};
pub use session::{LevelSession, SessionPhase, TickInput, Transition};
pub use timer::{Scheduler, TimerId, TimerKind};
pub use tween::{Repeat, Tween};
