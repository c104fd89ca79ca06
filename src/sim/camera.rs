//! Follow camera
//!
//! Only gameplay-relevant camera state lives here: the world-space view
//! rectangle decides boss engagement.

use glam::Vec2;

use super::physics::Rect;
use crate::consts::{CAMERA_LERP, VIEW_HEIGHT, VIEW_WIDTH};

#[derive(Debug, Clone)]
pub struct Camera {
    /// Top-left of the view in world space
    pub scroll: Vec2,
    size: Vec2,
    bounds: Rect,
    following: bool,
}

impl Camera {
    pub fn new(bounds: Rect) -> Self {
        Self {
            scroll: bounds.min,
            size: Vec2::new(VIEW_WIDTH, VIEW_HEIGHT),
            bounds,
            following: true,
        }
    }

    /// Ease toward centring `target`, clamped to the level
    pub fn follow(&mut self, target: Vec2) {
        if !self.following {
            return;
        }
        let desired = target - self.size * 0.5;
        self.scroll += (desired - self.scroll) * CAMERA_LERP;
        self.clamp();
    }

    pub fn stop_follow(&mut self) {
        self.following = false;
    }

    pub fn is_following(&self) -> bool {
        self.following
    }

    fn clamp(&mut self) {
        let max = (self.bounds.max - self.size).max(self.bounds.min);
        self.scroll = self.scroll.clamp(self.bounds.min, max);
    }

    /// World-space rectangle currently on screen
    pub fn view(&self) -> Rect {
        Rect::new(self.scroll.x, self.scroll.y, self.size.x, self.size.y)
    }

    pub fn sees(&self, point: Vec2) -> bool {
        self.view().contains(point)
    }
}
