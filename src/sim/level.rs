//! Level configuration table and platform layouts
//!
//! Every level is data plus a layout function. The session looks a level up
//! by number and never branches on which level it is.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::Serialize;

use super::physics::Rect;
use crate::consts::{GROUND_TOP, TILE, WORLD_HEIGHT};

/// Platform layout strategy: ground strip plus elevated platforms
pub type LayoutFn = fn(&LevelConfig, &mut Pcg32) -> Vec<Rect>;

/// Per-level tunables
#[derive(Debug, Clone, Serialize)]
pub struct LevelConfig {
    pub number: u8,
    pub name: &'static str,
    pub width: f32,
    /// Background colour (0xRRGGBB)
    pub background: u32,
    pub boss_speed: f32,
    pub enemy_speed_normal: f32,
    pub enemy_speed_fast: f32,
    /// Level started after this one is completed
    pub next: Option<u8>,
    #[serde(skip)]
    pub layout: LayoutFn,
}

impl LevelConfig {
    /// Build this level's platform set
    pub fn platforms(&self, rng: &mut Pcg32) -> Vec<Rect> {
        (self.layout)(self, rng)
    }

    /// Walkable speed for an enemy of the given tier
    pub fn enemy_speed(&self, is_fast: bool) -> f32 {
        if is_fast {
            self.enemy_speed_fast
        } else {
            self.enemy_speed_normal
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, WORLD_HEIGHT)
    }

    pub fn is_final(&self) -> bool {
        self.next.is_none()
    }
}

/// Number of playable levels
pub const LEVEL_COUNT: u8 = 5;

pub static LEVELS: [LevelConfig; LEVEL_COUNT as usize] = [
    LevelConfig {
        number: 1,
        name: "LEVEL 1",
        width: 4000.0,
        background: 0x87CEEB,
        boss_speed: 125.0,
        enemy_speed_normal: 50.0,
        enemy_speed_fast: 100.0,
        next: Some(2),
        layout: layout_meadow,
    },
    LevelConfig {
        number: 2,
        name: "LEVEL 2",
        width: 4000.0,
        background: 0xFF94F6,
        boss_speed: 150.0,
        enemy_speed_normal: 80.0,
        enemy_speed_fast: 150.0,
        next: Some(3),
        layout: layout_heights,
    },
    LevelConfig {
        number: 3,
        name: "LEVEL 3",
        width: 4000.0,
        background: 0x90EE90,
        boss_speed: 175.0,
        enemy_speed_normal: 100.0,
        enemy_speed_fast: 180.0,
        next: Some(4),
        layout: layout_vertical,
    },
    LevelConfig {
        number: 4,
        name: "LEVEL 4",
        width: 4000.0,
        background: 0xFFA07A,
        boss_speed: 200.0,
        enemy_speed_normal: 120.0,
        enemy_speed_fast: 200.0,
        next: Some(5),
        layout: layout_scattered,
    },
    LevelConfig {
        number: 5,
        name: "LEVEL 5",
        width: 4000.0,
        background: 0xD8BFD8,
        boss_speed: 225.0,
        enemy_speed_normal: 150.0,
        enemy_speed_fast: 250.0,
        next: None,
        layout: layout_gaps,
    },
];

/// Look up a level by its 1-based number
pub fn level(number: u8) -> Option<&'static LevelConfig> {
    LEVELS.iter().find(|l| l.number == number)
}

/// Full-width ground strip at the bottom of the level
pub fn ground_strip(width: f32) -> Rect {
    Rect::new(0.0, GROUND_TOP, width, WORLD_HEIGHT - GROUND_TOP)
}

/// Elevated platform `tiles` wide, centred on (x, y)
pub fn ledge(x: f32, y: f32, tiles: u32) -> Rect {
    Rect::from_center(Vec2::new(x, y), Vec2::new(tiles as f32 * TILE, TILE))
}

fn starter_ledges(platforms: &mut Vec<Rect>) {
    platforms.push(ledge(300.0, 350.0, 3));
    platforms.push(ledge(600.0, 250.0, 3));
    platforms.push(ledge(900.0, 350.0, 3));
}

fn layout_meadow(config: &LevelConfig, rng: &mut Pcg32) -> Vec<Rect> {
    let mut platforms = vec![ground_strip(config.width)];
    starter_ledges(&mut platforms);
    let mut x = 1200.0;
    while x < config.width - 200.0 {
        let y = rng.random_range(250..=400) as f32;
        platforms.push(ledge(x, y, 3));
        x += 500.0;
    }
    platforms
}

fn layout_heights(config: &LevelConfig, rng: &mut Pcg32) -> Vec<Rect> {
    let mut platforms = vec![ground_strip(config.width)];
    starter_ledges(&mut platforms);
    platforms.push(ledge(1100.0, 150.0, 3));
    platforms.push(ledge(1500.0, 450.0, 3));
    let mut x = 1200.0;
    while x < config.width - 200.0 {
        let y = rng.random_range(150..=400) as f32;
        platforms.push(ledge(x, y, 3));
        x += 300.0;
    }
    platforms
}

fn layout_vertical(config: &LevelConfig, rng: &mut Pcg32) -> Vec<Rect> {
    let mut platforms = vec![ground_strip(config.width)];
    let mut x = 300.0;
    while x < config.width - 200.0 {
        let y = rng.random_range(100..=500) as f32;
        platforms.push(ledge(x, y, 2));
        x += 250.0;
    }
    platforms
}

fn layout_scattered(config: &LevelConfig, rng: &mut Pcg32) -> Vec<Rect> {
    let mut platforms = vec![ground_strip(config.width)];
    let mut x = 300.0;
    while x < config.width - 200.0 {
        let y = rng.random_range(200..=450) as f32;
        let tiles = rng.random_range(2..=4);
        platforms.push(ledge(x, y, tiles));
        x += rng.random_range(200..=400) as f32;
    }
    platforms
}

fn layout_gaps(config: &LevelConfig, rng: &mut Pcg32) -> Vec<Rect> {
    let mut platforms = vec![ground_strip(config.width)];
    let mut x = 300.0;
    while x < config.width - 200.0 {
        let y = rng.random_range(150..=450) as f32;
        platforms.push(ledge(x, y, 2));
        x += rng.random_range(300..=500) as f32;
    }
    platforms
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_level_table_is_chained() {
        for (i, config) in LEVELS.iter().enumerate() {
            assert_eq!(config.number as usize, i + 1);
            assert_eq!(level(config.number).map(|l| l.number), Some(config.number));
        }
        assert_eq!(level(1).and_then(|l| l.next), Some(2));
        assert!(level(5).is_some_and(|l| l.is_final()));
        assert!(level(0).is_none());
        assert!(level(6).is_none());
    }

    #[test]
    fn test_every_layout_starts_with_ground_strip() {
        for config in &LEVELS {
            let mut rng = Pcg32::seed_from_u64(7);
            let platforms = config.platforms(&mut rng);
            assert_eq!(platforms[0], ground_strip(config.width));
            assert!(platforms.len() > 5, "{} has too few platforms", config.name);
            for p in &platforms[1..] {
                assert!(p.center().x < config.width - 200.0);
                assert_eq!(p.height(), TILE);
            }
        }
    }

    #[test]
    fn test_layout_is_deterministic_per_seed() {
        let config = level(4).unwrap();
        let a = config.platforms(&mut Pcg32::seed_from_u64(42));
        let b = config.platforms(&mut Pcg32::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_fixed_ledges_on_first_level() {
        let platforms = level(1).unwrap().platforms(&mut Pcg32::seed_from_u64(1));
        assert_eq!(platforms[1], Rect::new(252.0, 334.0, 96.0, 32.0));
        assert_eq!(platforms[2].center(), Vec2::new(600.0, 250.0));
    }
}
