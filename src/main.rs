//! Terminal Tetris runner (default binary).
//!
//! Loads the config, wires the session to the terminal, the score file and
//! the log file, and runs the fixed-tick loop.

use std::{
    fs::OpenOptions,
    path::{Path, PathBuf},
    sync::Mutex,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use tracing::{error, info, warn, Level};
use tracing_subscriber::prelude::*;

use denso_tetris::core::{GameMode, GameSnapshot, Session};
use denso_tetris::input::{Command, InputEvent, InputHandler, KeyMap};
use denso_tetris::store::ScoreStore;
use denso_tetris::term::{EventFeed, FrameBuffer, GameView, Hud, ScoreLine, TerminalRenderer, Viewport};
use denso_tetris::types::TICK_MS;
use denso_tetris::AppConfig;

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
#[value(rename_all = "kebab-case")]
enum ModeArg {
    Endless,
    Victory,
}

impl From<ModeArg> for GameMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Endless => GameMode::Endless,
            ModeArg::Victory => GameMode::Victory,
        }
    }
}

#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    #[arg(long, default_value = "denso-tetris.json", help = "Path to the JSON config file")]
    config: PathBuf,

    #[arg(long, help = "Player name recorded with scores")]
    player: Option<String>,

    #[arg(long, help = "Seed for the piece randomizer (random when omitted)")]
    seed: Option<u64>,

    #[arg(long, help = "Starting level")]
    start_level: Option<u32>,

    #[arg(long, value_enum, help = "Endless play or play to the victory level")]
    mode: Option<ModeArg>,

    #[arg(long, help = "Path to the score file")]
    scores: Option<PathBuf>,

    #[arg(long, help = "Path to the log file")]
    log: Option<PathBuf>,

    #[arg(short = 'v', long, action = clap::ArgAction::Count, help = "Increase log verbosity (-v = DEBUG, -vv = TRACE)")]
    verbose: u8,
}

impl Cli {
    fn apply(&self, config: &mut AppConfig) {
        if let Some(player) = &self.player {
            config.player = player.clone();
        }
        if let Some(level) = self.start_level {
            config.game.start_level = level;
        }
        if let Some(mode) = self.mode {
            config.game.mode = mode.into();
        }
        if let Some(path) = &self.scores {
            config.scores_path = path.clone();
        }
        if let Some(path) = &self.log {
            config.log_path = path.clone();
        }
    }

    fn level(&self) -> Level {
        match self.verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }
}

fn init_logging(path: &Path, level: Level) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    // The terminal belongs to the game; logs go to the file only.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(level))
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = AppConfig::load(&cli.config)?;
    cli.apply(&mut config);

    init_logging(&config.log_path, cli.level())?;
    let keymap = config.controls.resolve().context("invalid key bindings")?;

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = App::new(config, keymap, cli.seed).run(&mut term);

    // Always try to restore terminal state.
    let _ = term.exit();
    if let Err(e) = &result {
        error!(error = %e, "exited with error");
    }
    result
}

struct App {
    config: AppConfig,
    keymap: KeyMap,
    fixed_seed: Option<u64>,
    session: Session,
    input: InputHandler,
    feed: EventFeed,
    store: ScoreStore,
    top_scores: Vec<ScoreLine>,
    personal_best: Option<u32>,
}

impl App {
    fn new(config: AppConfig, keymap: KeyMap, fixed_seed: Option<u64>) -> Self {
        let session = Session::new(
            config.game.clone(),
            config.player.clone(),
            fixed_seed.unwrap_or_else(rand::random),
        );
        let store = ScoreStore::open(config.scores_path.clone());

        let mut app = Self {
            config,
            keymap,
            fixed_seed,
            session,
            input: InputHandler::new(),
            feed: EventFeed::new(),
            store,
            top_scores: Vec::new(),
            personal_best: None,
        };
        app.refresh_leaderboard();
        app
    }

    fn run(&mut self, term: &mut TerminalRenderer) -> Result<()> {
        info!(keyboard_enhanced = term.keyboard_enhanced(), "terminal ready");

        let view = GameView::default();
        let mut snap = GameSnapshot::default();
        let mut fb = FrameBuffer::new(0, 0);

        let tick_duration = Duration::from_millis(TICK_MS as u64);
        let mut last_tick = Instant::now();

        loop {
            let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
            self.session.snapshot_into(&mut snap);
            let hud = Hud {
                player: &self.config.player,
                feed: Some(&self.feed),
                personal_best: self.personal_best,
                top_scores: &self.top_scores,
            };
            view.render_into_with_hud(&snap, &hud, Viewport::new(w, h), &mut fb);
            term.present(&mut fb)?;

            // Input with timeout until next tick.
            let timeout = tick_duration
                .checked_sub(last_tick.elapsed())
                .unwrap_or(Duration::ZERO);

            if event::poll(timeout)? {
                match event::read()? {
                    Event::Key(key) => {
                        if !self.handle_key(key) {
                            return Ok(());
                        }
                    }
                    Event::Resize(..) => term.invalidate(),
                    _ => {}
                }
            }

            if last_tick.elapsed() >= tick_duration {
                last_tick = Instant::now();
                self.tick(TICK_MS);
            }
        }
    }

    /// Returns `false` when the player quits.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        let Some(command) = self.keymap.lookup(&key) else {
            return true;
        };

        match (command, key.kind) {
            (Command::Quit, KeyEventKind::Press) => return false,
            (Command::Restart, KeyEventKind::Press) => self.restart(),
            // Auto-repeat only matters for held movement.
            (Command::Game(action), KeyEventKind::Repeat) if !action.is_holdable() => {}
            (Command::Game(action), KeyEventKind::Press | KeyEventKind::Repeat) => {
                if let Some(event) = self.input.key_down(action) {
                    self.apply(event);
                }
            }
            (Command::Game(action), KeyEventKind::Release) => {
                if let Some(event) = self.input.key_up(action) {
                    self.apply(event);
                }
            }
            _ => {}
        }
        true
    }

    fn apply(&mut self, event: InputEvent) {
        match event {
            InputEvent::Press(action) => {
                self.session.press(action);
            }
            InputEvent::Release(action) => self.session.release(action),
        }
    }

    fn tick(&mut self, dt_ms: u32) {
        for event in self.input.update(dt_ms) {
            self.apply(event);
        }
        self.session.update(dt_ms);
        self.session.dispatch_events(&mut self.feed);
        self.feed.update(dt_ms);

        if self.session.report_summary(&mut self.store) {
            self.refresh_leaderboard();
        }
    }

    fn restart(&mut self) {
        let seed = self.fixed_seed.unwrap_or_else(rand::random);
        if !self.session.state().is_finished() {
            info!(score = self.session.score(), "session abandoned");
        }
        self.session = Session::new(self.config.game.clone(), self.config.player.clone(), seed);
        self.input.reset();
        self.feed.clear();
    }

    fn refresh_leaderboard(&mut self) {
        match self.store.top_scores(self.config.leaderboard_size) {
            Ok(records) => {
                self.top_scores = records
                    .into_iter()
                    .map(|r| ScoreLine {
                        player: r.player,
                        score: r.score,
                    })
                    .collect();
            }
            Err(e) => warn!(error = %e, "failed to load leaderboard"),
        }
        match self.store.best_for(&self.config.player) {
            Ok(best) => self.personal_best = best.map(|r| r.score),
            Err(e) => warn!(error = %e, "failed to load personal best"),
        }
    }
}
