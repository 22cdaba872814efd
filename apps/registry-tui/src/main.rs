use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use registry_core::logging::ActivityLogger;
use registry_core::{
    Coordinator, FilePhotoSource, Platform, SharedConnectivity, SimulatedGps, SystemClock,
    load_config,
};
use registry_tui::{app::App, ui};
use std::fs::File;
use std::io::{self, Stdout};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc::unbounded_channel;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser, Debug, Clone)]
#[command(version, about = "Blue Carbon Registry field data capture", long_about = None)]
struct Args {
    /// Path to a JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Start with the network switched off (toggle with F2)
    #[arg(long)]
    offline: bool,

    /// Write diagnostics to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Directory for the JSONL activity log
    #[arg(long)]
    activity_dir: Option<PathBuf>,

    /// Seed for the simulated GPS
    #[arg(long)]
    seed: Option<u64>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(path) = &args.log_file {
        setup_logging(args.debug, path)?;
    }

    let config = load_config(args.config.as_deref())
        .await
        .context("Failed to load configuration")?;

    let network = SharedConnectivity::new(!(args.offline || config.start_offline));
    let gps = match args.seed {
        Some(seed) => SimulatedGps::seeded(config.gps, seed),
        None => SimulatedGps::new(config.gps),
    }
    .context("Invalid GPS bounds")?;
    let platform = Platform {
        clock: Arc::new(SystemClock),
        connectivity: Arc::new(network.clone()),
        gps: Box::new(gps),
    };

    let (tx, rx) = unbounded_channel();
    let coordinator = Coordinator::new(config, platform, tx);
    let mut app = App::new(coordinator, rx, network, Arc::new(FilePhotoSource));
    if let Some(dir) = &args.activity_dir {
        let logger = ActivityLogger::new(dir)
            .await
            .with_context(|| format!("Failed to open activity log in {}", dir.display()))?;
        info!("Activity log: {}", logger.path().display());
        app = app.with_activity_logger(logger);
    }

    // Setup Terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app).await;

    // Restore Terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{:?}", err);
    }

    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if key.code == KeyCode::Char('c')
                        && key.modifiers.contains(KeyModifiers::CONTROL)
                    {
                        app.should_quit = true;
                    } else {
                        app.handle_input(key.code).await;
                    }
                }
            }
        }

        app.on_tick().await;

        if app.should_quit {
            return Ok(());
        }
    }
}

fn setup_logging(debug: bool, path: &Path) -> Result<()> {
    let filter = if debug {
        EnvFilter::new("info,registry_tui=debug,registry_core=debug")
    } else {
        EnvFilter::new("warn,registry_tui=info,registry_core=info")
    };
    let file = File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;

    fmt::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
    Ok(())
}
