//! Level session
//!
//! One playthrough of one level: world setup, the per-tick update, the
//! collision policy between the player and everything else, and the
//! restart / game-over / level-complete lifecycle. Every timer the session
//! schedules lives in its own [`Scheduler`] and is voided on restart.
//!
//! Tick order:
//! 1. Fire due timers
//! 2. Confirm and debug input
//! 3. Player input
//! 4. Physics for every body
//! 5. Camera, fall-out check
//! 6. Boss and enemy AI
//! 7. Overlaps: treats, enemies, boss, key, goal
//! 8. Player effects (flicker)

use std::time::Duration;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::boss::{Boss, BossHit};
use super::camera::Camera;
use super::enemy::Enemy;
use super::events::{EventBus, GameEvent};
use super::level::LevelConfig;
use super::physics::{self, Body, Rect};
use super::player::{Controls, Player};
use super::timer::{Scheduler, TimerKind};
use crate::consts::*;
use crate::extent;
use crate::persistence::{self, ProgressionStore};

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    /// Jump pressed this tick
    pub jump: bool,
    /// Super-power activation pressed this tick
    pub power: bool,
    /// Restart after game over, leave the victory screen
    pub confirm: bool,
    /// Finish the level as if the goal was reached (debug/testing)
    pub skip_level: bool,
}

impl TickInput {
    fn controls(&self) -> Controls {
        Controls {
            left: self.left,
            right: self.right,
            jump: self.jump,
            power: self.power,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    Playing,
    /// Player ran out of health; waiting for confirm to restart
    GameOver,
    /// Goal reached; next level starts after a delay
    LevelComplete,
    /// Final goal reached; confirm returns to the menu once armed
    GameComplete { exit_armed: bool },
}

/// Request for whoever owns the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    NextLevel(u8),
    ReturnToMenu,
}

#[derive(Debug)]
pub struct LevelSession {
    config: &'static LevelConfig,
    seed: u64,
    attempt: u32,
    rng: Pcg32,

    platforms: Vec<Rect>,
    player: Player,
    enemies: Vec<Enemy>,
    next_enemy_id: u32,
    treats: Vec<Body>,
    boss: Boss,
    key: Body,
    key_dropped: bool,
    has_key: bool,
    cage: Option<Rect>,
    goal: Body,
    goal_armed: bool,

    camera: Camera,
    scheduler: Scheduler,
    phase: SessionPhase,
    physics_paused: bool,
    /// Centre-screen texts, oldest first
    messages: Vec<String>,
    transition: Option<Transition>,

    bus: EventBus,
    store: Box<dyn ProgressionStore>,
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn boss_spawn(config: &LevelConfig) -> Vec2 {
    Vec2::new(config.width - 200.0, 350.0)
}

fn goal_spawn(config: &LevelConfig) -> Vec2 {
    Vec2::new(config.width - 100.0, 420.0)
}

fn hidden_key(pos: Vec2) -> Body {
    let mut key = Body::new(pos, extent(KEY_SIZE));
    key.moves = false;
    key.collides = false;
    key
}

fn static_body(pos: Vec2, size: (f32, f32)) -> Body {
    let mut body = Body::new(pos, extent(size));
    body.gravity = false;
    body.moves = false;
    body
}

impl LevelSession {
    /// Set up `config` and publish the starting snapshot
    pub fn new(
        config: &'static LevelConfig,
        seed: u64,
        bus: EventBus,
        store: Box<dyn ProgressionStore>,
    ) -> Self {
        let spawn = Vec2::new(PLAYER_SPAWN.0, PLAYER_SPAWN.1);
        let mut session = Self {
            config,
            seed,
            attempt: 0,
            rng: Pcg32::seed_from_u64(seed),
            platforms: Vec::new(),
            player: Player::new(spawn),
            enemies: Vec::new(),
            next_enemy_id: 0,
            treats: Vec::new(),
            boss: Boss::new(boss_spawn(config)),
            key: hidden_key(boss_spawn(config)),
            key_dropped: false,
            has_key: false,
            cage: None,
            goal: static_body(goal_spawn(config), GOAL_SIZE),
            goal_armed: false,
            camera: Camera::new(config.bounds()),
            scheduler: Scheduler::new(),
            phase: SessionPhase::Playing,
            physics_paused: false,
            messages: Vec::new(),
            transition: None,
            bus,
            store,
        };
        session.start();
        session
    }

    /// Build (or rebuild) the world for the current attempt
    fn start(&mut self) {
        let config = self.config;
        self.scheduler.clear();
        self.rng = Pcg32::seed_from_u64(self.seed.wrapping_add(u64::from(self.attempt)));

        self.platforms = config.platforms(&mut self.rng);
        self.player = Player::new(Vec2::new(PLAYER_SPAWN.0, PLAYER_SPAWN.1));
        self.enemies.clear();
        self.next_enemy_id = 0;
        self.spawn_initial_enemies();
        self.spawn_treats();

        self.boss = Boss::new(boss_spawn(config));
        self.key = hidden_key(boss_spawn(config));
        self.key_dropped = false;
        self.has_key = false;
        self.cage = Some(Rect::from_center(goal_spawn(config), extent(CAGE_SIZE)));
        self.goal = static_body(goal_spawn(config), GOAL_SIZE);
        self.goal_armed = false;

        self.camera = Camera::new(config.bounds());
        self.phase = SessionPhase::Playing;
        self.physics_paused = false;
        self.messages.clear();
        self.transition = None;

        self.scheduler
            .every(ms(ENEMY_SPAWN_INTERVAL_MS), TimerKind::SpawnEnemy);

        log::info!(
            "Starting {} (seed {}, attempt {}): {} platforms, {} enemies, {} treats",
            config.name,
            self.seed,
            self.attempt,
            self.platforms.len(),
            self.enemies.len(),
            self.treats.len()
        );

        self.bus.publish(GameEvent::LevelStarted {
            level: config.number,
            name: config.name.to_string(),
        });
        self.bus.publish(GameEvent::HealthChanged(self.player.health()));
        self.bus.publish(GameEvent::TreatsChanged(0));
        self.bus.publish(GameEvent::PowerChanged(0));
        self.bus.publish(GameEvent::PowerActive(false));
        self.bus.publish(GameEvent::BossActive(false));
    }

    /// Tear the attempt down and start the level again from scratch
    pub fn restart(&mut self) {
        self.attempt += 1;
        log::info!("Restarting {} (attempt {})", self.config.name, self.attempt);
        self.start();
    }

    fn spawn_initial_enemies(&mut self) {
        let mut xs = vec![400.0, 700.0, 1000.0];
        let mut x = 1300.0;
        while x < self.config.width - 500.0 {
            xs.push(x + self.rng.random_range(-50..=50) as f32);
            x += 400.0;
        }
        for x in xs {
            self.spawn_enemy_at(Vec2::new(x, 415.0));
        }
    }

    fn spawn_enemy_at(&mut self, pos: Vec2) {
        let is_fast = self.rng.random_bool(0.5);
        let id = self.next_enemy_id;
        self.next_enemy_id += 1;
        let speed = self.config.enemy_speed(is_fast);
        self.enemies.push(Enemy::new(id, pos, is_fast, speed));
        log::debug!("Enemy {} spawned at {:?} (fast: {})", id, pos, is_fast);
    }

    /// Repeating spawn: on a random platform, or anywhere along the ground
    fn spawn_timed_enemy(&mut self) {
        if self.platforms.is_empty() {
            return;
        }
        let p = self.platforms[self.rng.random_range(0..self.platforms.len())];
        let pos = if p.width() > 400.0 {
            let max_x = (self.config.width - 500.0).max(300.0) as i32;
            Vec2::new(self.rng.random_range(300..=max_x) as f32, 400.0)
        } else {
            let c = p.center();
            Vec2::new(c.x, c.y - 50.0)
        };
        self.spawn_enemy_at(pos);
    }

    fn spawn_treats(&mut self) {
        self.treats.clear();
        let mut x = 300.0;
        while x < self.config.width - 500.0 {
            if self.rng.random_range(0..=10) <= 3 {
                let y = self.rng.random_range(200..=350) as f32;
                self.treats.push(static_body(Vec2::new(x, y), TREAT_SIZE));
            }
            x += 150.0;
        }
    }

    /// Advance the session by one fixed timestep
    pub fn tick(&mut self, input: &TickInput, dt: f32) {
        let step = Duration::from_secs_f32(dt);

        for kind in self.scheduler.advance(step) {
            self.fire(kind);
        }

        match self.phase {
            SessionPhase::GameOver if input.confirm => {
                self.restart();
                return;
            }
            SessionPhase::GameComplete { exit_armed: true } if input.confirm => {
                if self.transition.is_none() {
                    log::info!("Leaving victory screen");
                }
                self.transition = Some(Transition::ReturnToMenu);
            }
            _ => {}
        }

        if input.skip_level && self.phase == SessionPhase::Playing {
            self.complete_level();
            return;
        }

        if self.physics_paused {
            return;
        }

        let controls = self.player.take_controls(input.controls());
        self.player.update(&controls);
        if controls.power {
            self.activate_power();
        }

        self.step_bodies(dt);
        self.camera.follow(self.player.pos());

        if self.player.pos().y > WORLD_HEIGHT && self.phase == SessionPhase::Playing {
            log::info!("Player fell out of {}", self.config.name);
            self.restart();
            return;
        }

        self.update_ai();
        self.resolve_overlaps();
        self.player.advance_effects(step);
    }

    /// Timers fire here, at the tick boundary, and check liveness first
    fn fire(&mut self, kind: TimerKind) {
        log::trace!("Timer fired: {:?}", kind);
        match kind {
            TimerKind::SpawnEnemy => {
                if self.phase == SessionPhase::Playing {
                    self.spawn_timed_enemy();
                }
            }
            TimerKind::EndSuperPower => self.player.end_super_power(&mut self.bus),
            TimerKind::ClearBossFlash => self.boss.clear_flash(),
            TimerKind::AdvanceLevel => {
                if self.phase == SessionPhase::LevelComplete {
                    self.transition = self.config.next.map(Transition::NextLevel);
                }
            }
            TimerKind::ArmExitConfirm => {
                if let SessionPhase::GameComplete { exit_armed } = &mut self.phase {
                    *exit_armed = true;
                }
            }
        }
    }

    fn activate_power(&mut self) {
        if self.player.activate_super_power(&mut self.bus) {
            self.scheduler
                .after(ms(SUPER_POWER_MS), TimerKind::EndSuperPower);
            log::debug!("Super power active for {} ms", SUPER_POWER_MS);
        }
    }

    fn step_bodies(&mut self, dt: f32) {
        let bounds = self.config.bounds();

        // The cage only blocks the player
        let cage_index = self.platforms.len();
        let mut solids = self.platforms.clone();
        solids.extend(self.cage);
        let hits = physics::step(&mut self.player.body, &solids, bounds, dt);

        for enemy in &mut self.enemies {
            physics::step(&mut enemy.body, &self.platforms, bounds, dt);
        }
        physics::step(&mut self.boss.body, &self.platforms, bounds, dt);
        physics::step(&mut self.key, &self.platforms, bounds, dt);

        if self.cage.is_some() && hits.contains(&cage_index) {
            self.touch_cage();
        }
    }

    fn update_ai(&mut self) {
        let player_pos = self.player.pos();
        let grounded = self.player.on_ground();

        let visible = self.camera.sees(self.boss.body.pos);
        self.boss.update(
            visible,
            player_pos,
            grounded,
            self.config.boss_speed,
            &mut self.bus,
        );

        if self.phase != SessionPhase::Playing {
            return;
        }
        for enemy in &mut self.enemies {
            let speed = self.config.enemy_speed(enemy.is_fast());
            enemy.think(
                player_pos,
                grounded,
                speed,
                &self.platforms,
                self.config.width,
            );
        }
    }

    fn resolve_overlaps(&mut self) {
        self.collect_treats();
        self.resolve_enemy_contacts();
        self.resolve_boss_contact();
        self.collect_key();

        if self.player.is_dead() && self.phase == SessionPhase::Playing {
            self.game_over();
        }

        if self.goal_armed
            && self.phase == SessionPhase::Playing
            && physics::overlaps(&self.player.body, &self.goal)
        {
            self.complete_level();
        }
    }

    fn collect_treats(&mut self) {
        let before = self.treats.len();
        let player = &self.player.body;
        self.treats.retain(|t| !physics::overlaps(player, t));
        for _ in self.treats.len()..before {
            self.player.get_treat(&mut self.bus);
        }
    }

    fn resolve_enemy_contacts(&mut self) {
        let mut i = 0;
        while i < self.enemies.len() {
            let Some((player_faces, enemy_faces)) =
                physics::contact(&self.player.body, &self.enemies[i].body)
            else {
                i += 1;
                continue;
            };
            self.player.body.touching.merge(player_faces);
            self.enemies[i].body.touching.merge(enemy_faces);

            if self.player.is_super_powered() {
                let enemy = self.enemies.remove(i);
                log::debug!("Enemy {} flattened by super power", enemy.id);
                continue;
            }

            if player_faces.down && enemy_faces.up {
                let enemy = self.enemies.remove(i);
                log::debug!("Enemy {} stomped", enemy.id);
                self.player.increment_power(&mut self.bus);
                self.player.bounce(STOMP_BOUNCE_VELOCITY);
                continue;
            }

            self.player.take_damage(&mut self.bus);
            i += 1;
        }
    }

    fn resolve_boss_contact(&mut self) {
        if !self.boss.is_alive() || self.boss.health() <= 0 {
            return;
        }
        let Some((player_faces, boss_faces)) =
            physics::contact(&self.player.body, &self.boss.body)
        else {
            return;
        };
        self.player.body.touching.merge(player_faces);
        self.boss.body.touching.merge(boss_faces);
        let boss_x = self.boss.body.pos.x;

        if self.player.is_super_powered() {
            // Two hits per contact tick; the flash window swallows the second
            self.damage_boss(SUPER_HIT_DAMAGE);
            self.damage_boss(SUPER_FOLLOWUP_DAMAGE);
            self.player.knockback_from(boss_x);
        } else if player_faces.down && boss_faces.up {
            self.damage_boss(1);
            self.player.bounce(BOSS_STOMP_BOUNCE_VELOCITY);
        } else {
            self.player.take_damage(&mut self.bus);
            self.player.knockback_from(boss_x);
        }
    }

    /// Hit the boss. Arms the flash expiry on a hit and drops the key on defeat.
    pub fn damage_boss(&mut self, amount: i32) -> BossHit {
        let hit = self.boss.damage(amount, &mut self.bus);
        match hit {
            BossHit::Hit { .. } => {
                self.scheduler
                    .after(ms(BOSS_HIT_FLASH_MS), TimerKind::ClearBossFlash);
            }
            BossHit::Defeated { at } => self.drop_key(at),
            BossHit::Ignored => {}
        }
        hit
    }

    fn drop_key(&mut self, at: Vec2) {
        if self.key_dropped {
            return;
        }
        self.key_dropped = true;
        self.key.place(at);
        self.key.moves = true;
        self.key.collides = true;
        self.key.vel.y = KEY_LAUNCH_VELOCITY;
        log::info!("Key dropped at {:?}", at);
    }

    fn collect_key(&mut self) {
        if !physics::overlaps(&self.player.body, &self.key) {
            return;
        }
        self.key.collides = false;
        self.key.moves = false;
        self.has_key = true;
        log::info!("Key collected");
    }

    fn touch_cage(&mut self) {
        if !self.has_key {
            return;
        }
        self.cage = None;
        self.goal_armed = true;
        log::info!("Cage opened");
    }

    fn game_over(&mut self) {
        self.phase = SessionPhase::GameOver;
        self.camera.stop_follow();
        self.messages.push("GAME OVER".to_string());
        log::info!("Game over on {} (attempt {})", self.config.name, self.attempt);
    }

    fn complete_level(&mut self) {
        let config = self.config;
        self.physics_paused = true;
        self.messages.push(format!("{} COMPLETE!", config.name));
        log::info!("{} complete", config.name);

        if let Err(e) = persistence::record_completion(self.store.as_mut(), config.number) {
            log::warn!("Could not save progress: {}", e);
        }
        self.bus.publish(GameEvent::LevelCompleted {
            level: config.number,
            next: config.next,
        });

        if config.next.is_some() {
            self.phase = SessionPhase::LevelComplete;
            self.scheduler
                .after(ms(NEXT_LEVEL_DELAY_MS), TimerKind::AdvanceLevel);
        } else {
            self.phase = SessionPhase::GameComplete { exit_armed: false };
            self.messages.push("YOU WON THE GAME!".to_string());
            self.messages.push("Click anywhere to Exit".to_string());
            self.scheduler
                .after(ms(EXIT_CONFIRM_DELAY_MS), TimerKind::ArmExitConfirm);
            self.bus.publish(GameEvent::GameCompleted);
        }
    }

    // Virtual input overlay (on-screen controls)

    pub fn set_player_move_left(&mut self, down: bool) {
        self.player.set_virtual_left(down);
    }

    pub fn set_player_move_right(&mut self, down: bool) {
        self.player.set_virtual_right(down);
    }

    pub fn player_jump(&mut self) {
        self.player.virtual_jump();
    }

    pub fn player_power(&mut self) {
        self.player.virtual_power();
    }

    /// Pending transition request, if any. Taking it clears it.
    pub fn take_transition(&mut self) -> Option<Transition> {
        self.transition.take()
    }

    /// Give back the bus and store when the session ends
    pub fn into_parts(self) -> (EventBus, Box<dyn ProgressionStore>) {
        (self.bus, self.store)
    }

    pub fn config(&self) -> &'static LevelConfig {
        self.config
    }

    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == SessionPhase::GameOver
    }

    pub fn has_key(&self) -> bool {
        self.has_key
    }

    pub fn boss_health(&self) -> i32 {
        self.boss.health()
    }

    pub fn boss_engaged(&self) -> bool {
        self.boss.is_engaged()
    }

    pub fn physics_paused(&self) -> bool {
        self.physics_paused
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn treats(&self) -> &[Body] {
        &self.treats
    }

    pub fn boss(&self) -> &Boss {
        &self.boss
    }

    /// The key once dropped and until collected
    pub fn key(&self) -> Option<&Body> {
        self.key.collides.then_some(&self.key)
    }

    pub fn cage(&self) -> Option<Rect> {
        self.cage
    }

    pub fn goal(&self) -> &Body {
        &self.goal
    }

    pub fn platforms(&self) -> &[Rect] {
        &self.platforms
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn bus_mut(&mut self) -> &mut EventBus {
        &mut self.bus
    }

    pub fn store(&self) -> &dyn ProgressionStore {
        self.store.as_ref()
    }
}
