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
    io::{self, stdin},
    path::PathBuf,
    sync::Arc,
    time::Duration,
};
use tracing::{info, warn};
use transit_pass::{
    clock::SystemClock,
    config::{Config, ConfigStore, FileConfigStore, Presentation},
    logging,
    runtime::{CrosstermEventSource, Runner},
    ui, App, PassCatalog, PassType,
};

/// How long the loop waits for an event before checking for quit
const POLL_RATE_MS: u64 = 250;

/// terminal transit pass with a live clock and expiry
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Pick a fare, activate it, and show the operator a pass with a live clock and its computed expiry."
)]
pub struct Cli {
    /// pass selected at startup
    #[clap(short = 'p', long, value_enum)]
    pass: Option<PassType>,

    /// passes offered for selection
    #[clap(short = 'c', long, value_enum)]
    catalog: Option<PassCatalog>,

    /// draw the active pass over the selection screen or instead of it
    #[clap(long, value_enum)]
    presentation: Option<Presentation>,

    /// IANA time zone for the clock and expiry, e.g. America/Detroit (default: local)
    #[clap(short = 'z', long)]
    timezone: Option<String>,

    /// live clock refresh interval in milliseconds
    #[clap(long)]
    tick_ms: Option<u64>,

    /// config file to read instead of the default location
    #[clap(long)]
    config: Option<PathBuf>,

    /// write the effective settings back to the config file
    #[clap(long)]
    save_config: bool,

    /// log file (default: the user state directory)
    #[clap(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    /// Flags given on the command line win over the config file
    fn apply(&self, config: &mut Config) {
        if let Some(pass) = self.pass {
            config.default_pass = pass;
        }
        if let Some(catalog) = self.catalog {
            config.catalog = catalog;
        }
        if let Some(presentation) = self.presentation {
            config.presentation = presentation;
        }
        if let Some(tz) = &self.timezone {
            config.timezone = Some(tz.clone());
        }
        if let Some(ms) = self.tick_ms {
            config.tick_interval_ms = ms;
        }
    }

    fn config_store(&self) -> FileConfigStore {
        self.config
            .as_ref()
            .map(FileConfigStore::with_path)
            .unwrap_or_default()
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    if let Some(path) = cli.log_file.clone().or_else(logging::default_log_path) {
        // logging is best effort; the pass works without it
        let _ = logging::init(&path);
    }

    let store = cli.config_store();
    let mut config = store.load();
    cli.apply(&mut config);
    if cli.save_config {
        if let Err(e) = store.save(&config) {
            warn!(error = %e, path = %store.path().display(), "could not save config");
        }
    }
    info!(
        pass = %config.default_pass,
        catalog = ?config.catalog,
        presentation = ?config.presentation,
        tick_ms = config.tick_interval_ms,
        "starting"
    );

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, config);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    config: Config,
) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        Duration::from_millis(POLL_RATE_MS),
    );
    let mut app = App::new(config, Arc::new(SystemClock), runner.sender());
    info!(timezone = %app.zone.label(), "display zone");

    terminal.draw(|f| ui::draw(&app, f))?;

    while !app.should_quit() {
        if let Some(event) = runner.step() {
            if app.on_event(event) && !app.should_quit() {
                terminal.draw(|f| ui::draw(&app, f))?;
            }
        }
    }

    info!("exiting");
    Ok(())
}
