//! Gucci's Adventure entry point
//!
//! Native builds run the simulation headless with an autopilot at the fixed
//! timestep and print every gameplay event as one JSON line on stdout.
//!
//! Usage: gucci-adventure [--level N] [--seed S] [--seconds T]
//!                        [--progress PATH] [--settings PATH]
//!        gucci-adventure --help

#[cfg(not(target_arch = "wasm32"))]
use clap::Parser;

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::cell::RefCell;
    use std::path::PathBuf;
    use std::rc::Rc;
    use std::time::Duration;

    use clap::Parser;
    use gucci_adventure::consts::*;
    use gucci_adventure::persistence::{JsonFileStore, MemoryStore, ProgressionStore};
    use gucci_adventure::sim::{EventBus, LevelSession, SessionPhase, TickInput};
    use gucci_adventure::{Game, HudState, Screen, Settings};

    /// Render-free frame rate the runner pretends to have
    const FRAME_DT: f32 = 1.0 / 30.0;

    /// Headless Gucci's Adventure runner
    #[derive(Debug, Parser)]
    #[command(name = "gucci-adventure")]
    #[command(about = "Run the platformer simulation headless with an autopilot")]
    pub struct Args {
        /// Level to start on (defaults to the highest unlocked level)
        #[arg(long)]
        level: Option<u8>,
        /// World seed
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Simulated seconds to run before stopping
        #[arg(long, default_value_t = 120.0)]
        seconds: f32,
        /// JSON file holding the highest unlocked level
        #[arg(long)]
        progress: Option<PathBuf>,
        /// JSON settings file
        #[arg(long)]
        settings: Option<PathBuf>,
    }

    /// Runs right, hops over anything in the way, fires the power when full
    fn autopilot(session: &LevelSession) -> TickInput {
        let player = session.player();
        let pos = player.pos();
        let threat_ahead = session
            .enemies()
            .iter()
            .map(|e| e.body.pos)
            .chain(session.boss().is_alive().then_some(session.boss().body.pos))
            .any(|p| p.x > pos.x && p.x - pos.x < 90.0 && (p.y - pos.y).abs() < 60.0);

        TickInput {
            right: true,
            jump: player.on_ground() && threat_ahead,
            power: player.power_charge() == MAX_POWER,
            confirm: matches!(
                session.phase(),
                SessionPhase::GameOver | SessionPhase::GameComplete { exit_armed: true }
            ),
            ..Default::default()
        }
    }

    struct Runner {
        game: Game,
        hud: Rc<RefCell<HudState>>,
        accumulator: f32,
        ticks: u64,
    }

    impl Runner {
        /// Run simulation ticks for one frame
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = self.game.session().map(autopilot).unwrap_or_default();
                self.game.tick(&input, SIM_DT);
                self.hud
                    .borrow_mut()
                    .advance(Duration::from_secs_f32(SIM_DT));
                self.accumulator -= SIM_DT;
                substeps += 1;
                self.ticks += 1;
            }
        }
    }

    pub fn run(args: Args) -> Result<(), String> {
        let settings = match &args.settings {
            Some(path) => Settings::load_from(path),
            None => Settings::default(),
        };
        let store: Box<dyn ProgressionStore> = match &args.progress {
            Some(path) => Box::new(JsonFileStore::open(path)),
            None => Box::new(MemoryStore::new()),
        };

        let mut bus = EventBus::new();
        bus.subscribe(|event| match serde_json::to_string(event) {
            Ok(line) => println!("{line}"),
            Err(e) => log::warn!("Could not encode {}: {}", event.name(), e),
        });
        let (hud, _) = HudState::attach(&settings, &mut bus);

        let mut game = Game::new(args.seed, bus, store);
        let started = match args.level {
            Some(n) => game.select_level(n),
            None => game.play(),
        };
        started.map_err(|e| e.to_string())?;

        let mut runner = Runner {
            game,
            hud,
            accumulator: 0.0,
            ticks: 0,
        };
        let frames = (args.seconds / FRAME_DT).ceil() as u64;
        for _ in 0..frames {
            runner.update(FRAME_DT);
            if runner.game.screen() == Screen::Menu {
                log::info!("Back at the menu after {} ticks", runner.ticks);
                break;
            }
        }

        let hud = runner.hud.borrow();
        log::info!(
            "Stopped after {} ticks on {:?}: {} health pips, {}, unlocked level {}",
            runner.ticks,
            runner.game.screen(),
            hud.health_bars().iter().filter(|v| **v).count(),
            hud.treats_text(),
            runner.game.unlocked_level()
        );
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Gucci's Adventure (native, headless) starting...");

    let args = native::Args::parse();
    if let Err(e) = native::run(args) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser build drives the library from its own frame loop
}
