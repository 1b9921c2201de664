//! Anisette Picker - Actor-based server selection screen
//!
//! Architecture:
//! - UI Layer (Ratatui) - synchronous terminal rendering
//! - App Layer - central state machine processing events
//! - Network Layer (Tokio) - async server list fetching

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use tracing_subscriber::EnvFilter;

use anisette_picker::constants::LOG_FILE;
use anisette_picker::messages::ui_events::key_to_ui_event;
use anisette_picker::storage::app_dir;
use anisette_picker::{
    ui, AppActor, AppState, FileCredentialStore, FileSettings, NetworkActor, NetworkCommand,
    NetworkResponse, RenderState, UiEvent,
};

/// Terminal cleanup guard
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dir = app_dir();
    std::fs::create_dir_all(&dir)?;

    // Initialize logging to file
    let file_appender = tracing_appender::rolling::never(&dir, LOG_FILE);
    let (non_blocking, _log_guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();

    let settings = FileSettings::open(&dir);
    tracing::info!(path = %settings.path().display(), "Loaded settings");
    let credentials = FileCredentialStore::new(dir.join("credentials"));

    // Reset notifies the host that provisioning must be redone
    let reset_requested = Arc::new(AtomicBool::new(false));
    let reset_flag = Arc::clone(&reset_requested);
    let on_reset = Box::new(move || {
        tracing::warn!("Anisette data reset; provisioning will run again on next use");
        reset_flag.store(true, Ordering::SeqCst);
    });

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create channels
    let (ui_tx, ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let (net_cmd_tx, net_cmd_rx) = mpsc::unbounded_channel::<NetworkCommand>();
    let (net_resp_tx, net_resp_rx) = mpsc::unbounded_channel::<NetworkResponse>();
    let (render_tx, mut render_rx) = mpsc::unbounded_channel::<RenderState>();

    // Spawn network actor
    let network_actor = NetworkActor::new(net_resp_tx);
    tokio::spawn(network_actor.run(net_cmd_rx));

    // Spawn app actor
    let state = AppState::new(Box::new(settings));
    let app_actor = AppActor::new(state, Box::new(credentials), on_reset, net_cmd_tx, render_tx);
    let app_handle = tokio::spawn(app_actor.run(ui_rx, net_resp_rx));

    // Run UI loop until the app actor dismisses the screen
    run_ui_loop(&mut terminal, ui_tx, &mut render_rx).await?;
    app_handle.await?;

    drop(guard);
    if reset_requested.load(Ordering::SeqCst) {
        eprintln!("adi.pb reset. Sign in again to re-provision this device.");
    }

    Ok(())
}

/// Run the synchronous UI rendering loop
async fn run_ui_loop(
    terminal: &mut Terminal<impl Backend>,
    ui_tx: mpsc::UnboundedSender<UiEvent>,
    render_rx: &mut mpsc::UnboundedReceiver<RenderState>,
) -> anyhow::Result<()> {
    let mut current_state = RenderState::default();

    loop {
        // Check for state updates (non-blocking)
        loop {
            match render_rx.try_recv() {
                Ok(state) => current_state = state,
                Err(TryRecvError::Empty) => break,
                // App actor finished: the screen was dismissed
                Err(TryRecvError::Disconnected) => return Ok(()),
            }
        }

        terminal.draw(|f| ui::draw_ui(f, &current_state))?;

        // Poll for events with timeout
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Some(event) = key_to_ui_event(
                    key,
                    current_state.active_panel,
                    current_state.input_mode,
                    current_state.show_help,
                    current_state.show_reset_confirm,
                ) {
                    let _ = ui_tx.send(event);
                }
            }
        }

        tokio::task::yield_now().await;
    }
}
