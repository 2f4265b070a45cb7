//! apod - NASA Astronomy Picture of the Day
//!
//! `apod serve` runs the caching proxy, `apod view` runs the terminal viewer
//! against it.

use std::io;
use std::panic;
use std::process;
use std::time::Duration;

use chrono::Local;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_subscriber::EnvFilter;

use apod::app::App;
use apod::cli::{Cli, Command, ServeArgs, ViewArgs};
use apod::config::{ServerConfig, ViewerConfig};
use apod::data::ApodServerClient;
use apod::loader::{try_recv, LoadHandle};
use apod::server::run_server;
use apod::ui;

/// Sets up a panic hook that restores the terminal before printing the panic message.
/// This ensures the terminal is usable even if the application panics.
fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Attempt to restore the terminal
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        // Call the original panic hook
        original_hook(panic_info);
    }));
}

async fn serve(args: ServeArgs) -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match ServerConfig::from_args(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(2);
        }
    };

    run_server(config).await?;
    Ok(())
}

async fn view(args: ViewArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = match ViewerConfig::from_args(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(2);
        }
    };

    // Set up panic hook to restore terminal on crash
    setup_panic_hook();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut loads = LoadHandle::new(ApodServerClient::new(config.server_url));
    let mut app = App::default();
    app.load_for_date(args.date);

    // Main event loop
    loop {
        for request in app.take_pending_loads() {
            loads.spawn(request);
        }
        while let Some(message) = try_recv(&mut loads) {
            app.apply_load(message);
        }

        // The selector's upper bound follows the wall clock across midnight
        app.today = Local::now().date_naive();

        terminal.draw(|f| ui::render(f, &app))?;

        // Poll for keyboard events with 100ms timeout
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve(args) => serve(args).await,
        Command::View(args) => view(args).await,
    }
}
