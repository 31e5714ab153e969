use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    fs::File,
    io::{self, stdin},
    path::{Path, PathBuf},
    time::SystemTime,
};

use typemaster::{
    app::{App, KeyOutcome, View},
    config::{Config, ConfigStore, FileConfigStore, TIMER_LIMITS},
    content::{ContentTables, Difficulty},
    runtime::{AppEvent, CrosstermEventSource, FixedTicker, Runner},
    store::SessionStore,
};

/// terminal typing practice: timed tests, row lessons and a falling-word game
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Terminal typing practice with timed tests, keyboard-row lessons, a falling-word game and a local history of every session."
)]
pub struct Cli {
    /// seconds per typing test (15, 30, 60 or 120)
    #[clap(short = 's', long, value_parser = parse_duration)]
    duration: Option<u32>,

    /// difficulty of the test text
    #[clap(short = 'd', long, value_enum)]
    difficulty: Option<Difficulty>,

    /// difficulty of the falling-word game
    #[clap(short = 'g', long, value_enum)]
    game_difficulty: Option<Difficulty>,

    /// view to open on
    #[clap(long, value_enum)]
    view: Option<View>,

    /// session history database to use instead of the default one
    #[clap(long, value_name = "FILE")]
    db: Option<PathBuf>,

    /// write the session history as CSV to PATH ("-" for stdout) and exit
    #[clap(long, value_name = "PATH")]
    export: Option<PathBuf>,
}

fn parse_duration(s: &str) -> Result<u32, String> {
    let secs: u32 = s.parse().map_err(|_| format!("`{s}` is not a number"))?;
    if TIMER_LIMITS.contains(&secs) {
        Ok(secs)
    } else {
        Err(format!("duration must be one of {TIMER_LIMITS:?}"))
    }
}

impl Cli {
    /// Command-line flags win over the saved settings
    fn apply(&self, mut config: Config) -> Config {
        if let Some(secs) = self.duration {
            config.test_duration_secs = secs;
        }
        if let Some(difficulty) = self.difficulty {
            config.test_difficulty = difficulty;
        }
        if let Some(difficulty) = self.game_difficulty {
            config.game_difficulty = difficulty;
        }
        config
    }

    fn open_store(&self) -> rusqlite::Result<SessionStore> {
        match &self.db {
            Some(path) => SessionStore::open(path),
            None => SessionStore::open_default(),
        }
    }
}

fn export(store: &SessionStore, path: &Path) -> Result<usize, Box<dyn Error>> {
    if path == Path::new("-") {
        store.export_csv(io::stdout().lock())
    } else {
        store.export_csv(File::create(path)?)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if let Some(path) = &cli.export {
        let store = cli.open_store()?;
        let written = export(&store, path)?;
        if path != Path::new("-") {
            eprintln!("exported {written} sessions to {}", path.display());
        }
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let config_store = FileConfigStore::new();
    let config = cli.apply(config_store.load());
    let content = ContentTables::embedded()?;
    // history is optional; sessions just go unrecorded without it
    let store = cli.open_store().ok();

    let mut app = App::new(config, content, store).with_config_store(Box::new(config_store));
    if let Some(view) = cli.view {
        app.switch_view(view);
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());

    loop {
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;

        match runner.step() {
            AppEvent::Key(key) => {
                if app.handle_key(key, SystemTime::now()) == KeyOutcome::Quit {
                    break;
                }
            }
            AppEvent::Resize | AppEvent::Tick => {}
        }

        app.poll(SystemTime::now());
    }

    Ok(())
}
