//! Marble Sky entry point
//!
//! Runs a headless session on the in-memory host: a shaky virtual hand
//! tilts the level, the demo taps to start each run, and every game event
//! is logged. High scores persist between sessions.
//!
//! Usage: `marble-sky [save-dir] [seconds]`

use std::env;
use std::process::ExitCode;

use marble_sky::audio::AudioManager;
use marble_sky::consts::{MAX_SUBSTEPS, SIM_DT};
use marble_sky::persistence::{PersistenceError, SaveDir};
use marble_sky::platform::{MemoryScene, WobbleTilt};
use marble_sky::sim::{GameController, GameEvent, GamePhase, SetupError};

const DEFAULT_SAVE_DIR: &str = "marble-sky-data";
const DEFAULT_SECONDS: f32 = 90.0;
/// Host frame length; each frame runs whole `SIM_DT` substeps
const FRAME_DT: f32 = 1.0 / 30.0;
/// How long the demo waits on the tap screen before tapping
const TAP_DELAY: f32 = 1.0;

type Controller = GameController<MemoryScene, WobbleTilt, AudioManager>;

/// Game instance holding the controller and loop bookkeeping
struct Game {
    controller: Controller,
    save: SaveDir,
    accumulator: f32,
    waiting: f32,
    runs: u32,
}

impl Game {
    fn new(save: SaveDir, seed: u64) -> Result<Self, SetupError> {
        let settings = save.load_settings();
        if !save.settings_path().exists() {
            // Leave an editable copy of the defaults behind
            if let Err(err) = save.save_settings(&settings) {
                log::warn!("{err}");
            }
        }
        let tuning = save.load_tuning();
        let audio = AudioManager::from_settings(&settings);
        // Slightly forward of rest so the marble heads down the track
        let tilt = WobbleTilt::new(seed, 0.0, -0.65);

        let mut controller =
            GameController::new(MemoryScene::demo_level(), tilt, audio, settings, tuning)?;
        controller.load_high_scores(save.load_highscores());

        Ok(Self {
            controller,
            save,
            accumulator: 0.0,
            waiting: 0.0,
            runs: 0,
        })
    }

    /// Run simulation substeps for one host frame
    fn update(&mut self, dt: f32) -> Result<(), PersistenceError> {
        let dt = dt.min(0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.step(SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }

        self.log_events();

        if self.controller.take_high_scores_dirty() {
            self.save.save_highscores(self.controller.high_scores())?;
        }
        Ok(())
    }

    /// Frame hook, then physics, then contacts: the order a render loop
    /// delivers them
    fn step(&mut self, dt: f32) {
        if self.controller.phase() == GamePhase::TapToPlay {
            self.waiting += dt;
            if self.waiting >= TAP_DELAY {
                self.waiting = 0.0;
                self.runs += 1;
                self.controller.on_tap();
            }
        }

        self.controller.on_frame_tick(dt);

        let contacts = self.controller.scene_mut().step(dt);
        for contact in contacts {
            self.controller.on_contact(contact);
        }
    }

    fn log_events(&mut self) {
        for event in self.controller.drain_events() {
            match event {
                GameEvent::PhaseChanged { to, .. } => {
                    log::info!("[{:>6.2}s] {}", self.now(), self.controller.hud_text());
                    if to == GamePhase::Playing {
                        log::info!("Run {} started", self.runs);
                    }
                }
                GameEvent::PearlCollected { node, score } => {
                    log::info!("[{:>6.2}s] Pearl {:?} collected, score {}", self.now(), node, score);
                }
                GameEvent::PearlRespawned { node } => {
                    log::debug!("[{:>6.2}s] Pearl {:?} back", self.now(), node);
                }
                GameEvent::Bumped { node, category } => {
                    log::debug!("[{:>6.2}s] Bumped {:?} {:?}", self.now(), category, node);
                }
                GameEvent::NewHighScore { score, rank } => {
                    log::info!("New high score {} at rank {}", score, rank);
                }
            }
        }
    }

    fn now(&self) -> f64 {
        self.controller.scheduler().now()
    }
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Marble Sky (headless) starting...");

    let mut args = env::args().skip(1);
    let save = SaveDir::new(args.next().unwrap_or_else(|| DEFAULT_SAVE_DIR.to_string()));
    let seconds = args
        .next()
        .and_then(|s| s.parse::<f32>().ok())
        .unwrap_or(DEFAULT_SECONDS);

    let seed = marble_sky::highscores::now_millis() as u64;
    let mut game = match Game::new(save, seed) {
        Ok(game) => game,
        Err(err) => {
            log::error!("Scene setup failed: {err}");
            return ExitCode::FAILURE;
        }
    };

    let frames = (seconds / FRAME_DT).ceil() as u32;
    for _ in 0..frames {
        if let Err(err) = game.update(FRAME_DT) {
            log::warn!("{err}");
        }
    }

    let state = game.controller.state();
    log::info!(
        "Session over after {} runs: last {}, best {}",
        game.runs,
        state.last_score,
        state.best_score
    );
    if let Some(top) = game.controller.high_scores().entries.first() {
        log::info!("Top score {} in {:.1}s", top.score, top.run_secs);
    }

    ExitCode::SUCCESS
}
