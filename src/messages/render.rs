//! Render state - data structure sent from App layer to UI for rendering

use crate::messages::ui_events::{InputMode, Panel};
use crate::models::{LoadStatus, Server};

/// Complete state needed by the UI to render
#[derive(Debug, Clone, Default)]
pub struct RenderState {
    // Source field
    pub source_url: String,
    pub source_valid: bool,
    pub cursor_position: usize,

    // Server list
    pub servers: Vec<Server>,
    pub selected_address: Option<String>,
    pub highlighted: usize,
    pub load_status: LoadStatus,

    // UI state
    pub active_panel: Panel,
    pub input_mode: InputMode,

    /// One-line notice for the status bar (persistence errors and the like)
    pub notice: Option<String>,

    // Popups
    pub show_help: bool,
    pub show_reset_confirm: bool,
}

impl RenderState {
    /// Whether the row at `index` is the persisted selection
    pub fn is_selected(&self, index: usize) -> bool {
        match (self.servers.get(index), &self.selected_address) {
            (Some(server), Some(selected)) => &server.address == selected,
            _ => false,
        }
    }
}
