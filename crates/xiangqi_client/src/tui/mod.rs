//! Terminal UI for the Xiangqi client.

mod app;
mod board_view;
mod input;
mod ui;

pub use app::App;
pub use board_view::BoardView;
pub use input::{Action, action_for, move_cursor};

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::Duration;
use tracing::{error, info, instrument};

use crate::config::ClientConfig;
use crate::driver::{ClientEvent, Driver};
use crate::engine::HttpRulesEngine;

/// Runs the terminal client until the user quits.
pub async fn run_tui(config: ClientConfig) -> Result<()> {
    // Log to a file so output does not corrupt the terminal UI
    let log_file = std::fs::File::create(config.log_file())?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .try_init();

    info!(server_url = %config.server_url(), "Starting Xiangqi client");

    let engine = Arc::new(HttpRulesEngine::from_config(&config)?);
    let (driver, mut event_rx) = Driver::new(engine, config.announce_delay());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, App::new(driver), &mut event_rx).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!(error = ?err, "Event loop error");
    }
    res
}

/// Single event loop: draw, drain driver events, then poll the terminal.
#[instrument(skip_all)]
async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    mut app: App,
    event_rx: &mut mpsc::UnboundedReceiver<ClientEvent>,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, &mut app))?;

        while let Ok(event) = event_rx.try_recv() {
            app.handle_client_event(event);
        }

        if event::poll(Duration::from_millis(50))? {
            app.handle_terminal_event(event::read()?);
        }

        if app.should_quit() {
            return Ok(());
        }

        // Let spawned requests make progress between polls
        tokio::task::yield_now().await;
    }
}
