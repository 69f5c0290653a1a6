//! cursorfx entry point
//!
//! Runs the cursor effect over a small portfolio page drawn in the terminal.

mod graphics;
mod scene;
mod widget;

use anyhow::{ensure, Context, Result};
use clap::Parser;
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute};
use cursorfx::{ConfigFile, ConfigOverrides, EffectConfig, Preset};
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::graphics::CellMetrics;
use crate::widget::{Action, PortfolioWidget};

/// Command-line arguments for cursorfx
#[derive(Parser, Debug)]
#[command(name = "cursorfx")]
#[command(version, about = "Pointer-following cursor with hover magnification", long_about = None)]
pub struct Args {
    /// Section preset (hover scale and targets)
    #[arg(short, long, value_enum, env = "CURSORFX_PRESET")]
    pub preset: Option<Preset>,

    /// Configuration file path
    #[arg(short, long, env = "CURSORFX_CONFIG")]
    pub config: Option<PathBuf>,

    /// Fraction of the remaining distance covered per frame
    #[arg(long)]
    pub lerp_factor: Option<f64>,

    /// Cursor scale over hover targets
    #[arg(long)]
    pub hover_scale: Option<f64>,

    /// Half the cursor size, in pixels
    #[arg(long)]
    pub center_offset: Option<f64>,

    /// Frames per second
    #[arg(long, default_value = "60", value_parser = clap::value_parser!(u32).range(1..=240))]
    pub fps: u32,

    /// Pixel width of one terminal cell
    #[arg(long, default_value = "8")]
    pub cell_width: f64,

    /// Pixel height of one terminal cell
    #[arg(long, default_value = "16")]
    pub cell_height: f64,

    /// Treat the terminal as a touch screen
    #[arg(long)]
    pub touch: bool,

    /// Ignore targets added or removed after start
    #[arg(long)]
    pub no_observe: bool,

    /// Verbose logging (can be specified multiple times)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Write logs to file (the terminal is used for drawing)
    #[arg(long, env = "CURSORFX_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    pub print_config: bool,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            lerp_factor: self.lerp_factor,
            hover_scale: self.hover_scale,
            center_offset: self.center_offset,
            observe_mutations: self.no_observe.then_some(false),
            ..ConfigOverrides::default()
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = init_logging(&args)?;
    info!("cursorfx v{}", env!("CARGO_PKG_VERSION"));

    let file = args
        .config
        .as_ref()
        .map(|path| {
            ConfigFile::load(path)
                .with_context(|| format!("failed to load config {}", path.display()))
        })
        .transpose()?;
    let preset = Preset::select(args.preset, file.as_ref());
    let config = EffectConfig::resolve(args.preset, file.as_ref(), &args.overrides())?;
    tracing::debug!("Config: {:?}", config);

    if args.print_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    ensure!(
        args.cell_width > 0.0 && args.cell_height > 0.0,
        "cell size must be positive, got {}x{}",
        args.cell_width,
        args.cell_height
    );
    let metrics = CellMetrics {
        width: args.cell_width,
        height: args.cell_height,
    };

    let size = terminal_size()?;
    let mut widget = PortfolioWidget::new(config, preset, metrics, size, args.touch)?;
    info!(preset = preset.title(), cols = size.0, rows = size.1, "starting");

    let guard = TerminalGuard::enter().context("failed to set up the terminal")?;
    let result = run(&mut widget, args.fps);
    drop(guard);

    widget.shutdown();
    result
}

fn init_logging(args: &Args) -> Result<Option<WorkerGuard>> {
    let Some(path) = &args.log_file else {
        return Ok(None);
    };

    let log_level = match args.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!("cursorfx={log_level},warn"))
    });

    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    let (writer, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(writer).with_ansi(false))
        .init();
    info!("Logging to file: {}", path.display());

    Ok(Some(guard))
}

fn terminal_size() -> Result<(u16, u16)> {
    match termsize::get() {
        Some(size) => Ok((size.cols, size.rows)),
        None => terminal::size().context("failed to query the terminal size"),
    }
}

/// Raw mode, alternate screen and mouse capture for as long as it lives
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        // restores whatever was set up if a later step fails
        let guard = TerminalGuard;
        execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture, cursor::Hide)?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), cursor::Show, DisableMouseCapture, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

/// Handles input until the next frame deadline, then runs a frame and
/// repaints
fn run(widget: &mut PortfolioWidget, fps: u32) -> Result<()> {
    let frame = Duration::from_secs_f64(1.0 / fps as f64);
    let mut out = io::BufWriter::new(io::stdout());
    let mut deadline = Instant::now();

    loop {
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() || !event::poll(remaining)? {
                break;
            }
            if widget.event(&event::read()?) == Action::Quit {
                return Ok(());
            }
        }

        widget.frame();
        widget.paint(&mut out)?;

        deadline += frame;
        let now = Instant::now();
        if deadline < now {
            deadline = now;
        }
    }
}
