//! Command handlers - business logic for processing UI events

use crate::app::AppState;
use crate::messages::ui_events::{InputMode, Panel};
use crate::messages::{NetworkCommand, NetworkResponse};
use crate::models::LoadStatus;
use crate::network::client::parse_source_url;
use crate::storage::SettingKey;

impl AppState {
    // ========================
    // Navigation
    // ========================

    pub fn next_panel(&mut self) {
        self.input_mode = InputMode::Normal;
        self.active_panel = self.active_panel.next();
    }

    pub fn prev_panel(&mut self) {
        self.input_mode = InputMode::Normal;
        self.active_panel = self.active_panel.prev();
    }

    // ========================
    // Source URL editing
    // ========================

    pub fn start_editing(&mut self) {
        self.active_panel = Panel::Source;
        self.input_mode = InputMode::Editing;
        self.cursor_position = self.source_url.len();
    }

    pub fn stop_editing(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn move_cursor_left(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position = self.source_url[..self.cursor_position]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
        }
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_position < self.source_url.len() {
            self.cursor_position = self.source_url[self.cursor_position..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor_position + i)
                .unwrap_or(self.source_url.len());
        }
    }

    pub fn move_cursor_home(&mut self) {
        self.cursor_position = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.cursor_position = self.source_url.len();
    }

    /// Insert a character at the cursor; commits and refetches
    pub fn enter_char(&mut self, c: char) -> Option<NetworkCommand> {
        if self.cursor_position > self.source_url.len() {
            return None;
        }
        self.source_url.insert(self.cursor_position, c);
        self.cursor_position += c.len_utf8();
        self.source_changed()
    }

    /// Delete the character before the cursor; commits and refetches
    pub fn delete_char(&mut self) -> Option<NetworkCommand> {
        if self.cursor_position == 0 {
            return None;
        }
        let prev_pos = self.source_url[..self.cursor_position]
            .char_indices()
            .last()
            .map(|(i, _)| i)
            .unwrap_or(0);
        self.source_url.remove(prev_pos);
        self.cursor_position = prev_pos;
        self.source_changed()
    }

    /// Delete the character under the cursor; commits and refetches
    pub fn delete_char_forward(&mut self) -> Option<NetworkCommand> {
        if self.cursor_position >= self.source_url.len() {
            return None;
        }
        self.source_url.remove(self.cursor_position);
        self.source_changed()
    }

    /// Every edit is persisted and triggers a fetch, no debounce
    fn source_changed(&mut self) -> Option<NetworkCommand> {
        let value = self.source_url.clone();
        self.persist(SettingKey::ServerListSource, &value);
        self.refresh()
    }

    // ========================
    // Fetching
    // ========================

    /// Issue a fetch for the current source URL. Invalid URLs are a no-op.
    /// A new fetch supersedes the pending one.
    pub fn refresh(&mut self) -> Option<NetworkCommand> {
        let Some(url) = parse_source_url(&self.source_url) else {
            tracing::debug!(source = %self.source_url, "Skipping refresh for invalid source URL");
            return None;
        };

        let id = self.next_id();
        self.pending_request_id = Some(id);
        self.load_status = LoadStatus::Loading;

        Some(NetworkCommand::FetchServerList {
            id,
            url: url.to_string(),
        })
    }

    /// Cancel the pending fetch
    pub fn cancel_refresh(&mut self) -> Option<NetworkCommand> {
        self.pending_request_id.map(NetworkCommand::CancelRequest)
    }

    // ========================
    // Response handling
    // ========================

    pub fn handle_response(&mut self, response: NetworkResponse) {
        let id = response.id();
        if self.pending_request_id != Some(id) {
            tracing::debug!(id, pending = ?self.pending_request_id, "Ignoring stale response");
            return;
        }
        self.pending_request_id = None;

        match response {
            NetworkResponse::ServerList { servers, .. } => {
                self.load_status = LoadStatus::Loaded {
                    count: servers.len(),
                    at: chrono::Local::now(),
                };
                self.servers = servers;
                self.highlighted = self.selected_index().unwrap_or(0);
            }
            NetworkResponse::FetchFailed { error, .. } => {
                tracing::warn!(id, source = %self.source_url, error = %error, "Server list fetch failed");
                self.load_status = LoadStatus::Failed(error.to_string());
            }
            NetworkResponse::Cancelled { .. } => {
                self.load_status = LoadStatus::Cancelled;
            }
        }
    }

    // ========================
    // Server selection
    // ========================

    pub fn highlight_next(&mut self) {
        if !self.servers.is_empty() {
            self.highlighted = (self.highlighted + 1) % self.servers.len();
        }
    }

    pub fn highlight_prev(&mut self) {
        if !self.servers.is_empty() {
            self.highlighted = self
                .highlighted
                .checked_sub(1)
                .unwrap_or(self.servers.len() - 1);
        }
    }

    /// Index of the persisted selection within the current list
    pub fn selected_index(&self) -> Option<usize> {
        let selected = self.selected_address.as_deref()?;
        self.servers.iter().position(|s| s.address == selected)
    }

    /// Select the highlighted server and persist its address
    pub fn select_highlighted(&mut self) {
        let Some(address) = self.servers.get(self.highlighted).map(|s| s.address.clone()) else {
            return;
        };
        if self.selected_address.as_deref() == Some(address.as_str()) {
            return;
        }
        tracing::info!(address = %address, "Selected Anisette server");
        self.persist(SettingKey::SelectedServer, &address);
        self.selected_address = Some(address);
    }

    fn persist(&mut self, key: SettingKey, value: &str) {
        match self.settings.set(key, value) {
            Ok(()) => self.notice = None,
            Err(e) => {
                tracing::error!(key = key.as_str(), error = %e, "Failed to persist setting");
                self.notice = Some(format!("Could not save {}: {}", key.as_str(), e));
            }
        }
    }

    // ========================
    // Popups
    // ========================

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn close_help(&mut self) {
        self.show_help = false;
    }

    pub fn request_reset(&mut self) {
        self.show_reset_confirm = true;
    }

    pub fn cancel_reset(&mut self) {
        self.show_reset_confirm = false;
    }
}
