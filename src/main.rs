pub mod ui;

use oche::{
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    controls::Action,
    export::{ResultRecord, ResultsLog},
    leaderboard::{Leaderboard, LeaderboardEntry, LeaderboardKey},
    runtime::{CrosstermEventSource, FixedTicker, Runner, TrainerEvent},
    session::{Session, SessionConfig, SessionEvent},
    store::{KeyValueStore, MemoryStore, SqliteStore},
    targets::{EndOption, GameMode},
};

use crate::ui::screen::current_screen;
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    style::Color,
    Frame, Terminal,
};
use anyhow::{anyhow, Context};
use std::{
    fs::{self, File, OpenOptions},
    io::{self, stdin, Write},
    path::{Path, PathBuf},
    sync::Mutex,
    time::{Duration, Instant},
};
use tracing::{info, warn, Level};

/// How long the target panel stays highlighted after a submit or skip
const FLASH_DURATION: Duration = Duration::from_millis(300);

/// Longest name accepted at the leaderboard prompt
const MAX_NAME_LEN: usize = 20;

/// darts practice trainer with per-target statistics and a local leaderboard
#[derive(Parser, Debug, Clone, Default)]
#[clap(
    version,
    about,
    long_about = "A darts practice trainer: record hits and misses against each segment in turn, watch your per-target hit rates, and compete against your own best sessions on a local leaderboard."
)]
pub struct Cli {
    /// ring to practise (defaults to the last one used)
    #[clap(short = 'm', long, value_enum)]
    mode: Option<GameMode>,

    /// where the session ends (defaults to the last one used)
    #[clap(short = 'e', long = "end", value_enum)]
    end_option: Option<EndOption>,

    /// multiplier skip mode: doubles and trebles jump ahead by two or three targets
    #[clap(short = 's', long, num_args = 0..=1, default_missing_value = "true")]
    skip: Option<bool>,

    /// don't ring the terminal bell when a round is submitted
    #[clap(long)]
    no_sound: bool,

    /// print the leaderboard for the chosen mode and exit
    #[clap(short = 'l', long)]
    leaderboard: bool,

    /// write debug-level detail to the log file
    #[clap(short = 'v', long)]
    verbose: bool,
}

impl Cli {
    /// Overlay explicitly given options on the stored defaults
    fn resolve(&self, stored: &Config) -> Config {
        Config {
            mode: self.mode.unwrap_or(stored.mode),
            end_option: self.end_option.unwrap_or(stored.end_option),
            skip_mode: self.skip.unwrap_or(stored.skip_mode),
            sound: stored.sound && !self.no_sound,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Training,
    NamePrompt,
    Leaderboard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    Submit,
    Skip,
}

impl FlashKind {
    pub fn color(&self) -> Color {
        match self {
            FlashKind::Submit => Color::Rgb(0x21, 0x96, 0xf3),
            FlashKind::Skip => Color::Rgb(0x80, 0x00, 0x80),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Flash {
    pub kind: FlashKind,
    pub until: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExitType {
    Continue,
    Quit,
}

pub struct App {
    pub config: Config,
    pub session: Session,
    pub state: AppState,
    pub leaderboard: Leaderboard<Box<dyn KeyValueStore>>,
    /// Entries for the current session's key, refreshed on load and submit
    pub board: Vec<LeaderboardEntry>,
    pub name_input: String,
    pub flash: Option<Flash>,
    pub bell_pending: bool,
    results_log: Option<ResultsLog>,
}

impl App {
    pub fn new(
        config: Config,
        store: Box<dyn KeyValueStore>,
        results_log: Option<ResultsLog>,
    ) -> Self {
        let session = Session::new(config.session_config());
        let leaderboard = Leaderboard::new(store);
        let board = leaderboard.load(LeaderboardKey::from(session.config()));

        Self {
            config,
            session,
            state: AppState::Training,
            leaderboard,
            board,
            name_input: String::new(),
            flash: None,
            bell_pending: false,
            results_log,
        }
    }

    pub fn leaderboard_key(&self) -> LeaderboardKey {
        LeaderboardKey::from(self.session.config())
    }

    pub fn reset(&mut self) {
        self.session = Session::new(self.config.session_config());
        self.board = self.leaderboard.load(self.leaderboard_key());
        self.state = AppState::Training;
        self.name_input.clear();
        self.flash = None;
        info!(config = ?self.session.config(), "new session");
    }

    fn handle_key(&mut self, key: KeyEvent) -> ExitType {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return ExitType::Quit;
        }

        match self.state {
            AppState::Training => {
                let multiplier_enabled = self.session.rules().multiplier_enabled;
                if let Some(action) = Action::from_key(key.code, multiplier_enabled) {
                    action.apply(&mut self.session);
                } else {
                    match key.code {
                        KeyCode::Esc | KeyCode::Char('q') => return ExitType::Quit,
                        KeyCode::Char('l') => {
                            self.board = self.leaderboard.load(self.leaderboard_key());
                            self.state = AppState::Leaderboard;
                        }
                        KeyCode::Char('b') => {
                            self.config.sound = !self.config.sound;
                        }
                        KeyCode::Char('n') => self.reset(),
                        _ => {}
                    }
                }
            }
            AppState::NamePrompt => match key.code {
                KeyCode::Esc => self.state = AppState::Training,
                KeyCode::Enter => self.submit_name(),
                KeyCode::Backspace => {
                    self.name_input.pop();
                }
                KeyCode::Char(c) if self.name_input.chars().count() < MAX_NAME_LEN => {
                    self.name_input.push(c);
                }
                _ => {}
            },
            AppState::Leaderboard => match key.code {
                KeyCode::Char('q') => return ExitType::Quit,
                KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('l') => {
                    self.state = AppState::Training;
                }
                KeyCode::Char('n') => self.reset(),
                _ => {}
            },
        }

        self.apply_events(Instant::now());
        ExitType::Continue
    }

    /// React to what the last operation did to the session
    fn apply_events(&mut self, now: Instant) {
        for event in self.session.take_events() {
            match event {
                SessionEvent::RoundSubmitted { .. } => {
                    self.start_flash(FlashKind::Submit, now);
                    if self.config.sound {
                        self.bell_pending = true;
                    }
                }
                SessionEvent::TargetSkipped(_) => self.start_flash(FlashKind::Skip, now),
                SessionEvent::Completed { darts_thrown } => {
                    info!(darts_thrown, "session complete");
                    self.log_result();
                    self.name_input.clear();
                    self.state = AppState::NamePrompt;
                }
                SessionEvent::ThrowRecorded(_) | SessionEvent::Undone => {}
            }
        }
    }

    fn start_flash(&mut self, kind: FlashKind, now: Instant) {
        self.flash = Some(Flash {
            kind,
            until: now + FLASH_DURATION,
        });
    }

    /// Expire the flash. Returns true if the screen needs redrawing.
    fn on_tick(&mut self, now: Instant) -> bool {
        match self.flash {
            Some(flash) if now >= flash.until => {
                self.flash = None;
                true
            }
            _ => false,
        }
    }

    fn log_result(&self) {
        let Some(log) = &self.results_log else {
            return;
        };
        if let Err(e) = log.append(&ResultRecord::from_session(&self.session)) {
            warn!(path = %log.path().display(), error = %e, "could not append to results log");
        }
    }

    fn submit_name(&mut self) {
        let name = self.name_input.trim().to_string();
        if name.is_empty() {
            return;
        }
        let key = self.leaderboard_key();
        match self
            .leaderboard
            .submit(&name, self.session.darts_thrown(), key)
        {
            Ok(entries) => self.board = entries,
            Err(e) => warn!(key = %key, error = %e, "could not save leaderboard entry"),
        }
        self.name_input.clear();
        self.state = AppState::Leaderboard;
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    // Logging is optional; say so before the TUI takes over the terminal
    if let Err(e) = init_tracing(AppDirs::log_path(), cli.verbose) {
        eprintln!("oche: logging disabled: {e:#}");
    }

    let config_store = FileConfigStore::new();
    let config = cli.resolve(&config_store.load());
    if let Err(e) = config_store.save(&config) {
        warn!(path = %config_store.path().display(), error = %e, "could not save config");
    }

    let store: Box<dyn KeyValueStore> = match SqliteStore::open_default() {
        Ok(store) => Box::new(store),
        Err(e) => {
            warn!(error = %e, "leaderboard database unavailable, keeping scores in memory");
            Box::new(MemoryStore::new())
        }
    };

    if cli.leaderboard {
        let session_config = config.session_config();
        let entries = Leaderboard::new(store).load(LeaderboardKey::from(&session_config));
        print_leaderboard(&mut io::stdout().lock(), &session_config, &entries)?;
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config, store, ResultsLog::new());
    let res = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = config_store.save(&app.config) {
        warn!(path = %config_store.path().display(), error = %e, "could not save config");
    }

    res
}

/// Send traces to the log file; the terminal belongs to the TUI
fn init_tracing(path: Option<PathBuf>, verbose: bool) -> anyhow::Result<()> {
    let path = path.context("no state directory for the log file")?;
    let file = open_log_file(&path)
        .with_context(|| format!("cannot open log file {}", path.display()))?;

    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(level)
        .try_init()
        .map_err(|e| anyhow!(e))
        .context("cannot install the log subscriber")
}

fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

fn print_leaderboard<W: Write>(
    out: &mut W,
    config: &SessionConfig,
    entries: &[LeaderboardEntry],
) -> io::Result<()> {
    writeln!(
        out,
        "{} leaderboard, {}",
        config.title(),
        config.end_option.describe(config.mode)
    )?;
    if entries.is_empty() {
        writeln!(out, "  no scores yet")?;
    }
    for (pos, entry) in entries.iter().enumerate() {
        writeln!(
            out,
            "{:>3}. {:<width$} {:>4} darts",
            pos + 1,
            entry.name,
            entry.darts_thrown,
            width = MAX_NAME_LEN
        )?;
    }
    Ok(())
}

fn start_tui<B: Backend + Write>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> anyhow::Result<()> {
    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());

    terminal.draw(|f| ui(app, f))?;

    loop {
        match runner.step() {
            TrainerEvent::Tick => {
                if app.on_tick(Instant::now()) {
                    terminal.draw(|f| ui(app, f))?;
                }
            }
            TrainerEvent::Resize => {
                terminal.draw(|f| ui(app, f))?;
            }
            TrainerEvent::Key(key) => {
                if app.handle_key(key) == ExitType::Quit {
                    break;
                }
                if std::mem::take(&mut app.bell_pending) {
                    let backend = terminal.backend_mut();
                    backend.write_all(b"\x07")?;
                    Write::flush(backend)?;
                }
                terminal.draw(|f| ui(app, f))?;
            }
        }
    }

    Ok(())
}

fn ui(app: &App, f: &mut Frame) {
    current_screen(&app.state).render(app, f);
}
