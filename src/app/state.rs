//! App state - pure data structure, persistence goes through the settings store

use crate::constants::DEFAULT_SERVER_LIST_URL;
use crate::messages::ui_events::{InputMode, Panel};
use crate::messages::RenderState;
use crate::models::{LoadStatus, Server};
use crate::network::client::parse_source_url;
use crate::storage::{SettingKey, SettingsStore};

/// Main application state
pub struct AppState {
    // Source field
    pub source_url: String,
    pub cursor_position: usize,

    // Server list
    pub servers: Vec<Server>,
    pub selected_address: Option<String>,
    pub highlighted: usize,
    pub load_status: LoadStatus,

    // Request tracking
    pub next_request_id: u64,
    pub pending_request_id: Option<u64>,

    // UI state
    pub active_panel: Panel,
    pub input_mode: InputMode,
    pub notice: Option<String>,

    // Popups
    pub show_help: bool,
    pub show_reset_confirm: bool,

    // Persisted settings
    pub(crate) settings: Box<dyn SettingsStore>,
}

impl AppState {
    /// Build the state from persisted settings
    pub fn new(settings: Box<dyn SettingsStore>) -> Self {
        let source_url = settings
            .get(SettingKey::ServerListSource)
            .unwrap_or_else(|| String::from(DEFAULT_SERVER_LIST_URL));
        let selected_address = settings
            .get(SettingKey::SelectedServer)
            .filter(|address| !address.is_empty());

        AppState {
            cursor_position: source_url.len(),
            source_url,
            servers: Vec::new(),
            selected_address,
            highlighted: 0,
            load_status: LoadStatus::Idle,
            next_request_id: 1,
            pending_request_id: None,
            active_panel: Panel::Servers,
            input_mode: InputMode::Normal,
            notice: None,
            show_help: false,
            show_reset_confirm: false,
            settings,
        }
    }

    /// Generate a unique request ID
    pub fn next_id(&mut self) -> u64 {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id
    }

    /// Convert state to RenderState for UI
    pub fn to_render_state(&self) -> RenderState {
        RenderState {
            source_url: self.source_url.clone(),
            source_valid: parse_source_url(&self.source_url).is_some(),
            cursor_position: self.cursor_position,
            servers: self.servers.clone(),
            selected_address: self.selected_address.clone(),
            highlighted: self.highlighted,
            load_status: self.load_status.clone(),
            active_panel: self.active_panel,
            input_mode: self.input_mode,
            notice: self.notice.clone(),
            show_help: self.show_help,
            show_reset_confirm: self.show_reset_confirm,
        }
    }
}
