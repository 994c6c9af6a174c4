use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor::Show,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Write};
use std::sync::Arc;
use tracing::{error, info};

mod cli;

use cli::{Cli, Commands, FavoriteCommands};
use pinpoint::{
    config::{Config, GeocoderBackend},
    favorites::FavoritesStore,
    geocoding::{build_geocoder, location_name},
    models::parse_coordinate_input,
    storage::{JsonFileStore, MemoryStore, SharedStore},
    tui::App,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if cli.offline {
        config.geocoder.backend = GeocoderBackend::Offline;
    }
    config.validate()?;

    init_logging(&config, cli.is_tui())?;

    let store: SharedStore = if cli.ephemeral {
        info!("Using in-memory preferences");
        Arc::new(MemoryStore::new())
    } else {
        Arc::new(JsonFileStore::open(&config.prefs_path).with_context(|| {
            format!("Cannot open preferences at {}", config.prefs_path.display())
        })?)
    };

    match cli.command.unwrap_or(Commands::Tui) {
        Commands::Tui => {
            info!("Launching TUI interface");

            match run_tui(config, store).await {
                Ok(_) => info!("TUI exited successfully"),
                Err(e) => {
                    error!("TUI failed: {}", e);
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Locate { lat, lng } => {
            let coordinate = match parse_coordinate_input(&lat, &lng) {
                Ok(coordinate) => coordinate,
                Err(e) => {
                    eprintln!("{}", e);
                    std::process::exit(2);
                }
            };

            let geocoder = build_geocoder(&config)?;
            let name = location_name(geocoder.as_ref(), coordinate).await;
            println!("{}", coordinate);
            println!("📍 {}", name);
        }

        Commands::Favorites { subcommand } => {
            let mut favorites = FavoritesStore::open(store);

            match subcommand {
                FavoriteCommands::List => {
                    if favorites.is_empty() {
                        println!("You haven't saved any locations yet.");
                    } else {
                        println!("{:<32} {:>12} {:>12}", "Name", "Latitude", "Longitude");
                        println!("{}", "-".repeat(58));
                        for entry in favorites.entries() {
                            println!(
                                "{:<32} {:>12} {:>12}",
                                entry.name, entry.coordinate.latitude, entry.coordinate.longitude
                            );
                        }
                        println!();
                        println!("Total: {} favorite locations", favorites.len());
                    }
                }
                FavoriteCommands::Add { name, lat, lng } => {
                    let coordinate = match parse_coordinate_input(&lat, &lng) {
                        Ok(coordinate) => coordinate,
                        Err(e) => {
                            eprintln!("{}", e);
                            std::process::exit(2);
                        }
                    };

                    match favorites.put(&name, coordinate) {
                        Ok(()) => println!("Saved '{}' at {}", name, coordinate),
                        Err(e) => {
                            eprintln!("Failed to save '{}': {}", name, e);
                            std::process::exit(1);
                        }
                    }
                }
                FavoriteCommands::Remove { name } => match favorites.remove(&name) {
                    Ok(true) => println!("Removed '{}'", name),
                    Ok(false) => println!("No favorite named '{}'", name),
                    Err(e) => {
                        eprintln!("Failed to remove '{}': {}", name, e);
                        std::process::exit(1);
                    }
                },
            }
        }
    }

    Ok(())
}

/// Log to a file in TUI mode so the display is not disturbed; otherwise
/// to both stderr and the file
fn init_logging(config: &Config, tui: bool) -> Result<()> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

    // Set default log level to INFO if not specified
    let filter = || {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pinpoint=info"))
    };

    let directory = config
        .log_file
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| std::path::Path::new("."));
    let file_name = config
        .log_file
        .file_name()
        .context("Log file path has no file name")?;
    let file_appender = tracing_appender::rolling::never(directory, file_name);

    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_filter(filter());

    let stderr_layer = (!tui).then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_filter(filter())
    });

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .init();

    Ok(())
}

/// Raw mode plus the alternate screen. Dropping the guard restores the
/// terminal, including when setup fails halfway.
struct TerminalGuard<W: Write> {
    out: W,
}

impl<W: Write> TerminalGuard<W> {
    fn enter(out: W) -> io::Result<Self> {
        enable_raw_mode()?;
        let mut guard = Self { out };
        execute!(guard.out, EnterAlternateScreen)?;
        Ok(guard)
    }
}

impl<W: Write> Drop for TerminalGuard<W> {
    fn drop(&mut self) {
        if let Err(e) = disable_raw_mode() {
            error!("Failed to disable raw mode: {}", e);
        }
        if let Err(e) = execute!(self.out, LeaveAlternateScreen, Show) {
            error!("Failed to leave alternate screen: {}", e);
        }
    }
}

/// Set up the terminal, run the app, and always restore the terminal
async fn run_tui(config: Config, store: SharedStore) -> Result<()> {
    let geocoder = build_geocoder(&config)?;
    let mut app = App::new(config, store, geocoder);

    // Declared before the terminal so it is dropped after it
    let _guard = TerminalGuard::enter(io::stdout())?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    app.run(&mut terminal).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_guard_restores_on_drop() {
        let mut out = Vec::new();
        drop(TerminalGuard { out: &mut out });

        let written = String::from_utf8_lossy(&out);
        assert!(written.contains("\x1b[?1049l"), "{:?}", written);
        assert!(written.contains("\x1b[?25h"), "{:?}", written);
    }
}
