//! Headless HUD model
//!
//! Mirrors what the on-screen HUD shows, driven only by gameplay events. A
//! renderer reads this; the simulation never reads it back.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::consts::{BOSS_MAX_HEALTH, MAX_HEALTH, MAX_POWER};
use crate::settings::Settings;
use crate::sim::events::{EventBus, GameEvent, SubscriberId};
use crate::sim::tween::{Repeat, Tween};

/// Full width of the power and boss bars
pub const BAR_WIDTH: f32 = 100.0;
pub const POWER_COLOR: u32 = 0x00FFFF;
pub const POWER_ACTIVE_COLOR: u32 = 0x00FF00;
/// Power bar pulse: alpha 1 -> 0 -> 1, forever
pub const POWER_PULSE_MS: u64 = 200;

#[derive(Debug, Clone)]
pub struct HudState {
    health: u8,
    treats: u32,
    power: u8,
    power_active: bool,
    boss_visible: bool,
    boss_health: i32,
    level_label: String,
    pulse: Option<Tween>,
    pulse_enabled: bool,
    boss_bar_enabled: bool,
}

impl HudState {
    pub fn new(settings: &Settings) -> Self {
        Self {
            health: MAX_HEALTH,
            treats: 0,
            power: 0,
            power_active: false,
            boss_visible: false,
            boss_health: BOSS_MAX_HEALTH,
            level_label: String::new(),
            pulse: None,
            pulse_enabled: settings.effective_power_pulse(),
            boss_bar_enabled: settings.boss_bar,
        }
    }

    /// Subscribe a shared HUD to `bus`
    pub fn attach(settings: &Settings, bus: &mut EventBus) -> (Rc<RefCell<HudState>>, SubscriberId) {
        let hud = Rc::new(RefCell::new(HudState::new(settings)));
        let sink = Rc::clone(&hud);
        let id = bus.subscribe(move |event| sink.borrow_mut().apply(event));
        (hud, id)
    }

    pub fn apply(&mut self, event: &GameEvent) {
        match event {
            GameEvent::HealthChanged(h) => self.health = (*h).min(MAX_HEALTH),
            GameEvent::TreatsChanged(n) => self.treats = *n,
            GameEvent::PowerChanged(p) => self.set_power(*p),
            GameEvent::PowerActive(active) => self.power_active = *active,
            GameEvent::BossActive(visible) => {
                self.boss_visible = *visible;
                if *visible {
                    self.boss_health = BOSS_MAX_HEALTH;
                }
            }
            GameEvent::BossHealth(h) => self.boss_health = *h,
            GameEvent::LevelStarted { name, .. } => self.level_label = name.clone(),
            GameEvent::Died
            | GameEvent::LevelCompleted { .. }
            | GameEvent::GameCompleted => {}
        }
    }

    fn set_power(&mut self, power: u8) {
        self.power = power;
        if power >= MAX_POWER {
            if self.pulse.is_none() && self.pulse_enabled {
                self.pulse = Some(
                    Tween::new(1.0, 0.0, Duration::from_millis(POWER_PULSE_MS))
                        .yoyo()
                        .repeat(Repeat::Forever),
                );
            }
        } else {
            self.pulse = None;
        }
    }

    /// Advance HUD animations
    pub fn advance(&mut self, dt: Duration) {
        if let Some(pulse) = self.pulse.as_mut() {
            pulse.advance(dt);
        }
    }

    /// Visibility of each of the five health pips
    pub fn health_bars(&self) -> [bool; MAX_HEALTH as usize] {
        std::array::from_fn(|i| i < usize::from(self.health))
    }

    pub fn treats_text(&self) -> String {
        format!("Treats: {}", self.treats)
    }

    pub fn power_bar_width(&self) -> f32 {
        f32::from(self.power.min(MAX_POWER)) / f32::from(MAX_POWER) * BAR_WIDTH
    }

    pub fn power_bar_alpha(&self) -> f32 {
        self.pulse.as_ref().map_or(1.0, Tween::value)
    }

    pub fn power_bar_color(&self) -> u32 {
        if self.power_active {
            POWER_ACTIVE_COLOR
        } else {
            POWER_COLOR
        }
    }

    pub fn is_pulsing(&self) -> bool {
        self.pulse.is_some()
    }

    pub fn boss_bar_visible(&self) -> bool {
        self.boss_bar_enabled && self.boss_visible
    }

    pub fn boss_bar_width(&self) -> f32 {
        (self.boss_health as f32 / BOSS_MAX_HEALTH as f32).max(0.0) * BAR_WIDTH
    }

    pub fn level_label(&self) -> &str {
        &self.level_label
    }

    /// Whether the virtual control overlay is on screen
    pub fn show_touch_controls(settings: &Settings, touch_device: bool) -> bool {
        settings.touch_controls.visible(touch_device)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracks_counters_from_events() {
        let mut bus = EventBus::new();
        let (hud, _) = HudState::attach(&Settings::default(), &mut bus);

        bus.publish(GameEvent::HealthChanged(3));
        bus.publish(GameEvent::TreatsChanged(7));
        bus.publish(GameEvent::PowerChanged(2));

        let hud = hud.borrow();
        assert_eq!(hud.health_bars(), [true, true, true, false, false]);
        assert_eq!(hud.treats_text(), "Treats: 7");
        assert_eq!(hud.power_bar_width(), 40.0);
        assert_eq!(hud.power_bar_color(), POWER_COLOR);
    }

    #[test]
    fn test_full_meter_pulses_until_spent() {
        let mut hud = HudState::new(&Settings::default());
        hud.apply(&GameEvent::PowerChanged(5));
        assert!(hud.is_pulsing());
        hud.advance(Duration::from_millis(100));
        assert!((hud.power_bar_alpha() - 0.5).abs() < 1e-4);

        hud.apply(&GameEvent::PowerActive(true));
        hud.apply(&GameEvent::PowerChanged(0));
        assert!(!hud.is_pulsing());
        assert_eq!(hud.power_bar_alpha(), 1.0);
        assert_eq!(hud.power_bar_width(), 0.0);
        assert_eq!(hud.power_bar_color(), POWER_ACTIVE_COLOR);
    }

    #[test]
    fn test_reduced_motion_suppresses_pulse() {
        let settings = Settings {
            reduced_motion: true,
            ..Default::default()
        };
        let mut hud = HudState::new(&settings);
        hud.apply(&GameEvent::PowerChanged(5));
        assert!(!hud.is_pulsing());
        assert_eq!(hud.power_bar_alpha(), 1.0);
    }

    #[test]
    fn test_boss_bar() {
        let mut hud = HudState::new(&Settings::default());
        assert!(!hud.boss_bar_visible());

        hud.apply(&GameEvent::BossActive(true));
        hud.apply(&GameEvent::BossHealth(3));
        assert!(hud.boss_bar_visible());
        assert_eq!(hud.boss_bar_width(), 50.0);

        hud.apply(&GameEvent::BossHealth(-2));
        assert_eq!(hud.boss_bar_width(), 0.0);

        hud.apply(&GameEvent::BossActive(false));
        assert!(!hud.boss_bar_visible());
        hud.apply(&GameEvent::BossActive(true));
        assert_eq!(hud.boss_bar_width(), BAR_WIDTH);
    }

    #[test]
    fn test_touch_overlay_follows_setting() {
        let mut settings = Settings::default();
        assert!(HudState::show_touch_controls(&settings, true));
        assert!(!HudState::show_touch_controls(&settings, false));
        settings.touch_controls = crate::TouchControls::Always;
        assert!(HudState::show_touch_controls(&settings, false));
    }
}
