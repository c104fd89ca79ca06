//! Top-level game driver
//!
//! Owns the event bus and the progression store between sessions, shows the
//! level-select menu, and applies the transitions a session asks for after
//! the tick that asked.

use thiserror::Error;

use crate::persistence::{MemoryStore, ProgressionStore};
use crate::sim::events::EventBus;
use crate::sim::level::{LEVEL_COUNT, LEVELS, level};
use crate::sim::session::{LevelSession, TickInput, Transition};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("there is no level {0}")]
    UnknownLevel(u8),
    #[error("level {level} is locked (highest unlocked is {unlocked})")]
    Locked { level: u8, unlocked: u8 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Menu,
    Playing { level: u8 },
}

/// One entry on the level-select screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelButton {
    pub number: u8,
    pub name: &'static str,
    pub locked: bool,
}

#[derive(Debug)]
enum Mode {
    Menu {
        bus: EventBus,
        store: Box<dyn ProgressionStore>,
    },
    Playing(Box<LevelSession>),
}

#[derive(Debug)]
pub struct Game {
    seed: u64,
    mode: Mode,
}

impl Game {
    pub fn new(seed: u64, bus: EventBus, store: Box<dyn ProgressionStore>) -> Self {
        log::info!("Highest unlocked level: {}", store.unlocked_level());
        Self {
            seed,
            mode: Mode::Menu { bus, store },
        }
    }

    pub fn screen(&self) -> Screen {
        match &self.mode {
            Mode::Menu { .. } => Screen::Menu,
            Mode::Playing(session) => Screen::Playing {
                level: session.config().number,
            },
        }
    }

    pub fn store(&self) -> &dyn ProgressionStore {
        match &self.mode {
            Mode::Menu { store, .. } => store.as_ref(),
            Mode::Playing(session) => session.store(),
        }
    }

    pub fn bus_mut(&mut self) -> &mut EventBus {
        match &mut self.mode {
            Mode::Menu { bus, .. } => bus,
            Mode::Playing(session) => session.bus_mut(),
        }
    }

    pub fn session(&self) -> Option<&LevelSession> {
        match &self.mode {
            Mode::Playing(session) => Some(session.as_ref()),
            Mode::Menu { .. } => None,
        }
    }

    pub fn session_mut(&mut self) -> Option<&mut LevelSession> {
        match &mut self.mode {
            Mode::Playing(session) => Some(session.as_mut()),
            Mode::Menu { .. } => None,
        }
    }

    pub fn unlocked_level(&self) -> u8 {
        self.store().unlocked_level()
    }

    /// Level-select entries, 1..=5
    pub fn menu(&self) -> Vec<LevelButton> {
        let unlocked = self.unlocked_level();
        LEVELS
            .iter()
            .map(|l| LevelButton {
                number: l.number,
                name: l.name,
                locked: l.number > unlocked,
            })
            .collect()
    }

    /// "Play": start the highest unlocked level
    pub fn play(&mut self) -> Result<(), GameError> {
        // Finishing the last level stores one past it
        let target = self.unlocked_level().clamp(1, LEVEL_COUNT);
        self.select_level(target)
    }

    /// Start a level from the menu
    pub fn select_level(&mut self, number: u8) -> Result<(), GameError> {
        if level(number).is_none() {
            return Err(GameError::UnknownLevel(number));
        }
        let unlocked = self.unlocked_level();
        if number > unlocked {
            return Err(GameError::Locked {
                level: number,
                unlocked,
            });
        }
        self.start_level(number)
    }

    fn start_level(&mut self, number: u8) -> Result<(), GameError> {
        let config = level(number).ok_or(GameError::UnknownLevel(number))?;
        let (bus, store) = self.take_parts();
        let seed = self.seed.wrapping_add(u64::from(number) << 16);
        self.mode = Mode::Playing(Box::new(LevelSession::new(config, seed, bus, store)));
        Ok(())
    }

    /// Tear down the running session, if any, and show the menu
    pub fn quit_to_menu(&mut self) {
        if let Mode::Playing(session) = &self.mode {
            log::info!("Leaving {} for the menu", session.config().name);
        }
        let (bus, store) = self.take_parts();
        self.mode = Mode::Menu { bus, store };
    }

    fn take_parts(&mut self) -> (EventBus, Box<dyn ProgressionStore>) {
        let placeholder = Mode::Menu {
            bus: EventBus::new(),
            store: Box::new(MemoryStore::new()),
        };
        match std::mem::replace(&mut self.mode, placeholder) {
            Mode::Menu { bus, store } => (bus, store),
            Mode::Playing(session) => session.into_parts(),
        }
    }

    /// Advance the running session and apply any transition it requested
    pub fn tick(&mut self, input: &TickInput, dt: f32) {
        let transition = match &mut self.mode {
            Mode::Playing(session) => {
                session.tick(input, dt);
                session.take_transition()
            }
            Mode::Menu { .. } => None,
        };

        match transition {
            Some(Transition::NextLevel(next)) => {
                if let Err(e) = self.start_level(next) {
                    log::warn!("Could not start level {}: {}", next, e);
                    self.quit_to_menu();
                }
            }
            Some(Transition::ReturnToMenu) => self.quit_to_menu(),
            None => {}
        }
    }
}
