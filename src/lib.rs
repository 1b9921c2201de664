//! # Anisette Picker
//!
//! A terminal screen for choosing which Anisette server to use.
//!
//! ## Features
//! - Fetches the server list from a configurable source URL
//! - Persists the selected server and the source URL
//! - Resets the stored `adi.pb` provisioning blob
//!
//! ## Architecture
//! Actor-based with channels:
//! - UI Layer (Ratatui) - synchronous
//! - App Layer (State machine)
//! - Network Layer (Tokio runtime)

pub mod constants;
pub mod models;
pub mod storage;
pub mod credentials;
pub mod ui;
pub mod messages;
pub mod app;
pub mod network;

// Re-export commonly used types
pub use models::{LoadStatus, Server, ServerListResponse};
pub use storage::{FileSettings, MemorySettings, SettingKey, SettingsStore};
pub use credentials::{CredentialStore, FileCredentialStore};
pub use messages::{UiEvent, NetworkCommand, NetworkResponse, RenderState};
pub use app::{AppState, AppActor, ResetCallback};
pub use network::{FetchError, NetworkActor};
