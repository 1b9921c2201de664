//! App actor - message loop processing UI events and network responses

use tokio::sync::mpsc;

use crate::app::state::AppState;
use crate::constants::ADI_ENTRY;
use crate::credentials::CredentialStore;
use crate::messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};

/// Failure-notification callback invoked by the reset action
pub type ResetCallback = Box<dyn FnMut() + Send>;

/// App actor that processes UI events and network responses
pub struct AppActor {
    state: AppState,
    credentials: Box<dyn CredentialStore>,
    on_reset: ResetCallback,
    clear_credentials: bool,
    network_tx: mpsc::UnboundedSender<NetworkCommand>,
    render_tx: mpsc::UnboundedSender<RenderState>,
}

impl AppActor {
    pub fn new(
        state: AppState,
        credentials: Box<dyn CredentialStore>,
        on_reset: ResetCallback,
        network_tx: mpsc::UnboundedSender<NetworkCommand>,
        render_tx: mpsc::UnboundedSender<RenderState>,
    ) -> Self {
        AppActor {
            state,
            credentials,
            on_reset,
            // Debug builds keep their provisioning data across resets
            clear_credentials: !cfg!(debug_assertions),
            network_tx,
            render_tx,
        }
    }

    /// Override whether the reset action touches the credential store
    pub fn clear_credentials(mut self, enabled: bool) -> Self {
        self.clear_credentials = enabled;
        self
    }

    /// Run the actor message loop until the screen is dismissed
    pub async fn run(
        mut self,
        mut ui_rx: mpsc::UnboundedReceiver<UiEvent>,
        mut net_rx: mpsc::UnboundedReceiver<NetworkResponse>,
    ) {
        // Opening the screen loads the list
        let initial = self.state.refresh();
        self.dispatch(initial);
        let _ = self.render_tx.send(self.state.to_render_state());

        loop {
            tokio::select! {
                Some(event) = ui_rx.recv() => {
                    if self.handle_ui_event(event) {
                        let _ = self.network_tx.send(NetworkCommand::Shutdown);
                        break;
                    }
                    let _ = self.render_tx.send(self.state.to_render_state());
                }
                Some(response) = net_rx.recv() => {
                    self.state.handle_response(response);
                    let _ = self.render_tx.send(self.state.to_render_state());
                }
                else => break,
            }
        }
    }

    fn dispatch(&self, cmd: Option<NetworkCommand>) {
        if let Some(cmd) = cmd {
            let _ = self.network_tx.send(cmd);
        }
    }

    /// Handle a UI event, returns true if the screen should be dismissed
    fn handle_ui_event(&mut self, event: UiEvent) -> bool {
        match event {
            UiEvent::NextPanel => self.state.next_panel(),
            UiEvent::PrevPanel => self.state.prev_panel(),

            UiEvent::StartEditing => self.state.start_editing(),
            UiEvent::StopEditing => self.state.stop_editing(),
            UiEvent::CursorLeft => self.state.move_cursor_left(),
            UiEvent::CursorRight => self.state.move_cursor_right(),
            UiEvent::CursorHome => self.state.move_cursor_home(),
            UiEvent::CursorEnd => self.state.move_cursor_end(),
            UiEvent::CharInput(c) => {
                let cmd = self.state.enter_char(c);
                self.dispatch(cmd);
            }
            UiEvent::Backspace => {
                let cmd = self.state.delete_char();
                self.dispatch(cmd);
            }
            UiEvent::Delete => {
                let cmd = self.state.delete_char_forward();
                self.dispatch(cmd);
            }

            UiEvent::HighlightNext => self.state.highlight_next(),
            UiEvent::HighlightPrev => self.state.highlight_prev(),
            UiEvent::SelectHighlighted => self.state.select_highlighted(),

            UiEvent::Refresh => {
                let cmd = self.state.refresh();
                self.dispatch(cmd);
            }
            UiEvent::CancelRefresh => {
                let cmd = self.state.cancel_refresh();
                self.dispatch(cmd);
            }

            UiEvent::RequestReset => self.state.request_reset(),
            UiEvent::CancelReset => self.state.cancel_reset(),
            UiEvent::ConfirmReset => {
                self.state.cancel_reset();
                self.reset_anisette_data();
                return true;
            }

            UiEvent::ToggleHelp => self.state.toggle_help(),
            UiEvent::CloseHelp => self.state.close_help(),

            UiEvent::Back => return true,
        }

        false
    }

    /// Clear the provisioning blob, then notify the host
    fn reset_anisette_data(&mut self) {
        if self.clear_credentials {
            match self.credentials.clear(ADI_ENTRY) {
                Ok(true) => tracing::info!(entry = ADI_ENTRY, "Cleared credential entry"),
                Ok(false) => tracing::info!(entry = ADI_ENTRY, "Credential entry already absent"),
                Err(e) => tracing::error!(entry = ADI_ENTRY, error = %e, "Failed to clear credential entry"),
            }
        } else {
            tracing::info!(entry = ADI_ENTRY, "Debug build: leaving credential entry in place");
        }
        (self.on_reset)();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::FileCredentialStore;
    use crate::models::Server;
    use crate::storage::{MemorySettings, SettingKey};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tempfile::tempdir;
    use tokio::task::JoinHandle;

    const SOURCE: &str = "https://example.test/servers.json";

    struct Harness {
        ui_tx: mpsc::UnboundedSender<UiEvent>,
        net_tx: mpsc::UnboundedSender<NetworkResponse>,
        cmd_rx: mpsc::UnboundedReceiver<NetworkCommand>,
        render_rx: mpsc::UnboundedReceiver<RenderState>,
        resets: Arc<AtomicUsize>,
        handle: JoinHandle<()>,
    }

    fn start(settings: MemorySettings, credentials: FileCredentialStore, clear: bool) -> Harness {
        let (ui_tx, ui_rx) = mpsc::unbounded_channel();
        let (net_tx, net_rx) = mpsc::unbounded_channel();
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (render_tx, render_rx) = mpsc::unbounded_channel();
        let resets = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&resets);

        let actor = AppActor::new(
            AppState::new(Box::new(settings)),
            Box::new(credentials),
            Box::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
            cmd_tx,
            render_tx,
        )
        .clear_credentials(clear);

        let handle = tokio::spawn(actor.run(ui_rx, net_rx));
        Harness { ui_tx, net_tx, cmd_rx, render_rx, resets, handle }
    }

    async fn next_fetch(rx: &mut mpsc::UnboundedReceiver<NetworkCommand>) -> (u64, String) {
        match rx.recv().await {
            Some(NetworkCommand::FetchServerList { id, url }) => (id, url),
            other => panic!("expected fetch, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_opening_screen_fetches_and_renders() {
        let settings = MemorySettings::new().with(SettingKey::ServerListSource, SOURCE);
        let dir = tempdir().unwrap();
        let mut h = start(settings, FileCredentialStore::new(dir.path()), false);

        let (id, url) = next_fetch(&mut h.cmd_rx).await;
        assert_eq!(url, SOURCE);

        h.net_tx
            .send(NetworkResponse::ServerList { id, servers: vec![Server::new("A", "1.2.3.4")] })
            .unwrap();

        let mut last = None;
        while let Some(state) = h.render_rx.recv().await {
            let loaded = !state.servers.is_empty();
            last = Some(state);
            if loaded {
                break;
            }
        }
        assert_eq!(last.unwrap().servers, vec![Server::new("A", "1.2.3.4")]);

        h.ui_tx.send(UiEvent::Back).unwrap();
        h.handle.await.unwrap();
        assert!(matches!(h.cmd_rx.recv().await, Some(NetworkCommand::Shutdown)));
        assert_eq!(h.resets.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_reset_clears_entry_notifies_and_dismisses() {
        let dir = tempdir().unwrap();
        let credentials = FileCredentialStore::new(dir.path().join("credentials"));
        credentials.store(ADI_ENTRY, b"blob").unwrap();
        let entry = credentials.dir().join(ADI_ENTRY);

        let settings = MemorySettings::new();
        let h = start(settings.clone(), credentials, true);
        h.ui_tx.send(UiEvent::RequestReset).unwrap();
        h.ui_tx.send(UiEvent::ConfirmReset).unwrap();
        h.handle.await.unwrap();

        assert!(!entry.exists());
        assert_eq!(h.resets.load(Ordering::SeqCst), 1);
        assert!(settings.writes().is_empty());
    }

    #[tokio::test]
    async fn test_reset_skips_store_when_clearing_disabled() {
        let dir = tempdir().unwrap();
        let credentials = FileCredentialStore::new(dir.path());
        credentials.store(ADI_ENTRY, b"blob").unwrap();

        let h = start(MemorySettings::new(), credentials, false);
        h.ui_tx.send(UiEvent::ConfirmReset).unwrap();
        h.handle.await.unwrap();

        assert!(dir.path().join(ADI_ENTRY).exists());
        assert_eq!(h.resets.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_editing_source_dispatches_one_fetch_per_edit() {
        let settings = MemorySettings::new().with(SettingKey::ServerListSource, "https://example.test/list");
        let dir = tempdir().unwrap();
        let mut h = start(settings.clone(), FileCredentialStore::new(dir.path()), false);
        let _initial = next_fetch(&mut h.cmd_rx).await;

        h.ui_tx.send(UiEvent::StartEditing).unwrap();
        h.ui_tx.send(UiEvent::CharInput('s')).unwrap();
        let (_, url) = next_fetch(&mut h.cmd_rx).await;
        assert_eq!(url, "https://example.test/lists");

        h.ui_tx.send(UiEvent::Back).unwrap();
        h.handle.await.unwrap();
        assert!(matches!(h.cmd_rx.recv().await, Some(NetworkCommand::Shutdown)));
        assert_eq!(
            settings.writes(),
            vec![(SettingKey::ServerListSource, "https://example.test/lists".to_string())]
        );
    }
}
