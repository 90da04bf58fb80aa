//! Laptop Picker - Main entry point
//!
//! Interactive questionnaire and admin console, plus a headless `rank`
//! command that prints the same ranking the results screen shows.

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use laptop_picker::cli::{Cli, Commands};
use laptop_picker::config::{AppConfig, tab_from_key};
use laptop_picker::pricing::find_price_range;
use laptop_picker::questionnaire::{QuestionnaireController, SelectionKind, WizardStep};
use laptop_picker::types::AdminTab;
use laptop_picker::ui::results::price_text;
use laptop_picker::{App, AppMode, DataGateway, LaptopResultItem, MemoryGateway, Repository, RestGateway};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::fs::OpenOptions;
use std::io::stdout;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize tracing.
///
/// The TUI owns the terminal, so interactive runs log only to `--log-file`.
/// Headless commands log warnings to stderr. `RUST_LOG` overrides the level.
fn init_logging(log_file: Option<&Path>, headless: bool) -> Result<()> {
    let default_level = if headless { "warn" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file: {}", path.display()))?;
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
                .init();
        }
        None if headless => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
                .init();
        }
        None => {}
    }
    Ok(())
}

/// Main application entry point
fn main() -> Result<()> {
    let cli = Cli::parse();
    let headless = matches!(
        cli.command,
        Some(Commands::Rank { .. }) | Some(Commands::CheckConfig { .. })
    );
    init_logging(cli.log_file.as_deref(), headless)?;
    info!("Laptop Picker v{} starting up", env!("CARGO_PKG_VERSION"));

    match &cli.command {
        Some(Commands::CheckConfig { path }) => check_config(path),
        Some(Commands::Rank {
            category,
            budget,
            limit,
            json,
        }) => {
            let config = AppConfig::load(cli.config.as_deref())?;
            let repository = Repository::new(build_gateway(&cli, &config)?);
            run_rank(repository, category.as_deref(), budget, *limit, *json)
        }
        Some(Commands::Admin { tab }) => {
            let tab = tab
                .as_deref()
                .map(|key| {
                    tab_from_key(key).with_context(|| {
                        format!("Unknown admin tab '{}' (expected cpus, gpus, programs or laptops)", key)
                    })
                })
                .transpose()?;
            run_tui(&cli, AppMode::Admin, tab)
        }
        Some(Commands::Wizard) | None => run_tui(&cli, AppMode::Wizard, None),
    }
}

/// Fixtures when `--fixtures` is given, otherwise the configured backend.
fn build_gateway(cli: &Cli, config: &AppConfig) -> Result<Arc<dyn DataGateway>> {
    if let Some(path) = &cli.fixtures {
        info!("Using fixtures from {}", path.display());
        return Ok(Arc::new(MemoryGateway::from_snapshot_file(path)?));
    }
    config.validate_backend()?;
    let gateway = RestGateway::new(config.rest_gateway_config())
        .context("Failed to create the backend client")?;
    info!("Using backend {}", config.backend.url);
    Ok(Arc::new(gateway))
}

fn check_config(path: &Path) -> Result<()> {
    info!("Validating configuration file: {}", path.display());
    let result = AppConfig::load_from_file(path).and_then(|config| config.validate());
    match result {
        Ok(()) => {
            println!("✓ Configuration file is valid: {}", path.display());
            Ok(())
        }
        Err(e) => {
            error!("Configuration validation failed: {:#}", e);
            eprintln!("✗ Configuration validation failed: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Run the TUI until the user quits
fn run_tui(cli: &Cli, mode: AppMode, tab: Option<AdminTab>) -> Result<()> {
    let config = AppConfig::load(cli.config.as_deref())?;
    config.validate_admin()?;
    let repository = Repository::new(build_gateway(cli, &config)?);

    debug!("Initializing terminal for TUI mode");
    enable_raw_mode().context("Failed to enable raw mode")?;
    crossterm::execute!(stdout(), EnterAlternateScreen).context("Failed to enter alternate screen")?;

    let result = (|| -> Result<()> {
        let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))
            .context("Failed to create terminal")?;
        let mut app = App::new(repository, &config.admin_settings(), mode);
        app.start(tab);
        app.run(&mut terminal)
    })();

    // Always restore the terminal, even if the app failed
    let _ = disable_raw_mode();
    let _ = crossterm::execute!(stdout(), LeaveAlternateScreen);

    if let Err(e) = &result {
        error!("TUI exited with error: {:#}", e);
    }
    result
}

/// Rank laptops headlessly and print them
fn run_rank(
    repository: Repository,
    category: Option<&str>,
    budget: &str,
    limit: Option<usize>,
    json: bool,
) -> Result<()> {
    let range = find_price_range(budget)
        .with_context(|| format!("Unknown budget '{}' (expected p1 to p5)", budget))?;

    let mut controller = QuestionnaireController::new(repository);
    controller.load().context("Failed to load questionnaire data")?;

    if let Some(key) = category {
        let id = controller
            .find_category(key)
            .map(|c| c.id.to_string())
            .with_context(|| format!("Unknown category '{}'", key))?;
        controller.select(WizardStep::Category, &id, SelectionKind::Radio, None)?;
    }
    controller.select(WizardStep::Budget, range.id, SelectionKind::Radio, None)?;

    let results = controller.results();
    let shown = &results[..limit.unwrap_or(results.len()).min(results.len())];

    if json {
        println!("{}", serde_json::to_string_pretty(shown)?);
        return Ok(());
    }

    let usage = controller
        .selected_category()
        .map(|c| c.label())
        .unwrap_or_else(|| "any".to_string());
    println!(
        "{} laptops for {} at {} (showing {})",
        results.len(),
        usage,
        range.label,
        shown.len()
    );
    for (rank, item) in shown.iter().enumerate() {
        println!("{}", rank_line(rank + 1, item));
    }
    Ok(())
}

fn rank_line(rank: usize, item: &LaptopResultItem) -> String {
    format!(
        "{:>3}. {:>3}%  {:<40} {:>14}  {}",
        rank,
        item.score,
        item.name,
        price_text(item),
        item.specs.cpu_name.as_deref().unwrap_or("-")
    )
}
