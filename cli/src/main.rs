//! CLI entrypoint for confab
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use confab_application::{ChatBackend, CommandBus, EventBus};
use confab_infrastructure::{
    ConfigLoader, DemoChatBackend, FileConfig, InMemoryEventBus, TokioCommandBus,
};
use confab_presentation::{Cli, LayoutConfig, ThemeName, TuiApp, TuiSettings};
use std::fs;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        for line in ConfigLoader::describe_sources() {
            println!("{}", line);
        }
        return Ok(());
    }

    // Held until exit so buffered log lines are flushed
    let _log_guard = init_logging(&cli)?;
    info!("Starting confab");

    // === Configuration ===
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).map_err(|e| anyhow!(e.to_string()))?
    };
    config.validate().context("invalid configuration")?;

    let theme_name = cli.theme.as_deref().unwrap_or(&config.tui.theme);
    let theme: ThemeName = theme_name.parse().map_err(|e: String| anyhow!(e))?;
    let settings = tui_settings(&config, theme);

    // === Dependency Injection ===
    let backend_bus = Arc::new(InMemoryEventBus::new());
    let command_bus: Arc<dyn CommandBus> = Arc::new(TokioCommandBus::new());
    let bus: Arc<dyn EventBus> = backend_bus.clone();
    let chat: Arc<dyn ChatBackend> = Arc::new(DemoChatBackend::new(Arc::clone(&bus)));
    let policy = Arc::new(config.tools.clone());

    let mut app = TuiApp::new(settings, bus, command_bus, policy, chat);
    app.run().await?;
    drop(app);

    backend_bus.shutdown().await;
    info!(dropped = backend_bus.dropped_count(), "confab exited");
    Ok(())
}

/// Log to a file; the terminal belongs to the UI.
fn init_logging(cli: &Cli) -> Result<WorkerGuard> {
    let path = cli.log_file();
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| ".".into());
    fs::create_dir_all(&dir)
        .with_context(|| format!("cannot create log directory {}", dir.display()))?;
    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow!("log file path has no file name: {}", path.display()))?;

    let appender = tracing_appender::rolling::never(&dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    // RUST_LOG wins over -v flags
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(writer)
        .init();

    Ok(guard)
}

fn tui_settings(config: &FileConfig, theme: ThemeName) -> TuiSettings {
    let tui = &config.tui;
    TuiSettings {
        layout: LayoutConfig {
            input_height: tui.input_height,
            status_height: tui.status_height,
            conversation_weight: tui.conversation_weight,
            auxiliary_weight: tui.auxiliary_weight,
            zoomed_conversation_weight: tui.zoomed_conversation_weight,
            zoomed_auxiliary_weight: tui.zoomed_auxiliary_weight,
            ..LayoutConfig::default()
        },
        theme,
        tick_rate: Duration::from_millis(tui.tick_rate_ms),
    }
}
