mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use learneng::{
    app::{Action, App},
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    content::{BundledContent, Content, ContentSource, FileContentSource},
    runtime::{AppEvent, CrosstermEventSource, FixedTicker, Runner},
    submit::{CsvLogSubmitter, JsonReportSubmitter, ResultsSubmitter},
    EngineOptions, Section, TypingMetricsEngine,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    fs,
    io::{self, stdin},
    path::PathBuf,
    sync::Mutex,
    time::Duration,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// typing assessment for english learners: words, sentences, paragraphs
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Takes you through a typing assessment section by section and reports WPM, accuracy, time and consistency for each."
)]
pub struct Cli {
    /// JSON file with the words, sentences and paragraphs to type
    #[clap(short = 'c', long)]
    content: Option<PathBuf>,

    /// bundled content pack to use when no content file is given
    #[clap(short = 'p', long)]
    pack: Option<String>,

    /// sections to take, in assessment order (comma separated)
    #[clap(short = 's', long, value_enum, value_delimiter = ',')]
    sections: Option<Vec<Section>>,

    /// milliseconds between wpm samples
    #[clap(short = 't', long)]
    tick_ms: Option<u64>,

    /// also write the final report as JSON to this path
    #[clap(short = 'o', long)]
    report: Option<PathBuf>,

    /// don't append results to the csv log
    #[clap(long)]
    no_log: bool,

    /// print how many items each section has and exit
    #[clap(long)]
    check: bool,

    /// use this config file instead of the default location
    #[clap(long)]
    config: Option<PathBuf>,
}

impl Cli {
    fn apply(&self, mut cfg: Config) -> Config {
        if let Some(pack) = &self.pack {
            cfg.content_pack = pack.clone();
        }
        if let Some(sections) = &self.sections {
            cfg.sections = sections.clone();
        }
        if let Some(tick_ms) = self.tick_ms {
            cfg.tick_interval_ms = tick_ms;
        }
        if self.no_log {
            cfg.results_log = false;
        }
        cfg
    }

    fn load_content(&self, cfg: &Config) -> learneng::Result<Content> {
        match &self.content {
            Some(path) => FileContentSource::new(path).load(),
            None => BundledContent::new(cfg.content_pack.clone()).load(),
        }
    }
}

fn init_logging() {
    let path = AppDirs::log_path();
    if let Some(parent) = path.parent() {
        if fs::create_dir_all(parent).is_err() {
            return;
        }
    }
    let Ok(file) = fs::OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("learneng=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging();

    let store = match &cli.config {
        Some(path) => FileConfigStore::with_path(path),
        None => FileConfigStore::new(),
    };
    let cfg = cli.apply(store.load());
    let content = cli.load_content(&cfg)?;

    if cli.check {
        for section in Section::ordered(&cfg.sections) {
            println!("{}: {}", section, content.items(section).len());
        }
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let mut submitters: Vec<Box<dyn ResultsSubmitter>> = vec![];
    if cfg.results_log {
        submitters.push(Box::new(CsvLogSubmitter::new(AppDirs::results_log_path())));
    }
    if let Some(path) = &cli.report {
        submitters.push(Box::new(JsonReportSubmitter::new(path)));
    }

    let engine = TypingMetricsEngine::new(&content, EngineOptions::from(&cfg));
    let mut app = App::new(engine, submitters);
    info!(sections = ?app.engine.sections(), "starting assessment");

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app, cfg.tick_interval_ms);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    tick_ms: u64,
) -> Result<(), Box<dyn Error>> {
    let tick = Duration::from_millis(tick_ms.max(1));
    let mut runner = Runner::new(CrosstermEventSource::new(), FixedTicker::new(tick));
    let tick_secs = tick.as_secs_f64();

    loop {
        terminal.draw(|f| {
            f.render_widget(ui::View { app: &*app, tick_secs }, f.area());
        })?;

        match runner.step() {
            AppEvent::Tick => app.on_tick(),
            AppEvent::Resize => {}
            AppEvent::Key(key) => {
                if app.on_key(key) == Action::Quit {
                    break;
                }
            }
        }
    }

    Ok(())
}
