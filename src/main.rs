// ApiLog - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. Configuration loading and logging initialisation
// 3. Loading the log file (fatal on failure)
// 4. The interactive shell over stdin/stdout

use apilog::app::shell::Shell;
use apilog::app::store::RecordStore;
use apilog::platform::config::{self, ColorMode, PlatformPaths};
use apilog::ui::panels;
use apilog::ui::theme::{Theme, Tone};
use apilog::util::error::{ApiLogError, Result as ApiResult};
use apilog::util::{self, constants};
use clap::Parser;
use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};

/// API Log Viewer - interactive viewer for mixed-format API logs.
///
/// Loads a log file whose lines may be JSON, framework-style or free text,
/// then lets you summarise, filter, inspect, edit and export the entries.
#[derive(Parser, Debug)]
#[command(name = "apilog", version, about)]
struct Cli {
    /// Log file to open.
    path: PathBuf,

    /// Configuration file (defaults to config.toml in the platform config directory).
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,

    /// Disable coloured output.
    #[arg(long = "no-color")]
    no_color: bool,

    /// Default number of entries shown by `list`.
    #[arg(short = 'n', long = "limit", value_parser = clap::value_parser!(u64).range(
        constants::MIN_LIST_LIMIT as u64..=constants::ABSOLUTE_MAX_LIST_LIMIT as u64
    ))]
    limit: Option<u64>,
}

fn main() {
    let cli = Cli::parse();

    // Config comes first so its logging settings apply from the start.
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PlatformPaths::resolve().config_file());
    let (app_config, config_warnings) = config::load_config(&config_path);

    util::logging::init(
        cli.debug,
        app_config.log_level.as_deref(),
        app_config.log_file.as_deref(),
    );

    tracing::info!(
        version = constants::APP_VERSION,
        debug = cli.debug,
        config = %config_path.display(),
        "ApiLog starting"
    );

    for warning in config_warnings.into_iter().map(ApiLogError::from) {
        tracing::warn!(error = %warning, "Configuration warning; using defaults");
        eprintln!("Warning: {warning}");
    }

    let color = !cli.no_color
        && match app_config.color {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => io::stdout().is_terminal(),
        };
    colored::control::set_override(color);
    let theme = Theme::new(color);

    let list_limit = cli
        .limit
        .map(|n| n as usize)
        .unwrap_or(app_config.list_limit);

    if let Err(e) = run(&cli.path, theme, list_limit) {
        tracing::error!(error = %e, "Terminal I/O failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// Load the file and hand it to the shell. A load failure exits the
/// process; terminal I/O failures are returned.
fn run(path: &Path, theme: Theme, list_limit: usize) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    writeln!(out, "{}", panels::help::banner(&theme))?;
    writeln!(
        out,
        "{}",
        theme.paint(&format!("Loading log file: {}", path.display()), Tone::Cyan)
    )?;

    let store = match open_store(path) {
        Ok(store) => {
            let count = store.total_len();
            writeln!(out, "{}\n", theme.success(&format!("Loaded {count} log entries")))?;
            store
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to load log file");
            writeln!(out, "{}", theme.error(&e.to_string()))?;
            out.flush()?;
            std::process::exit(1);
        }
    };

    writeln!(out, "{}", panels::summary::render(&store.summary(), &theme))?;

    let stdin = io::stdin();
    let mut shell = Shell::new(store, stdin.lock(), out, theme, list_limit);
    shell.run()
}

fn open_store(path: &Path) -> ApiResult<RecordStore> {
    let mut store = RecordStore::new();
    store.load_file(path)?;
    Ok(store)
}
