//! Application constants
//!
//! Centralized location for magic strings and configuration defaults.

/// Built-in endpoint serving the public Anisette server list
pub const DEFAULT_SERVER_LIST_URL: &str = "https://servers.sidestore.io/servers.json";

/// Application name
pub const APP_NAME: &str = "Anisette Picker";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Directory name used under the platform config dir
pub const APP_DIR_NAME: &str = "anisette-picker";

/// Settings file inside the app directory
pub const SETTINGS_FILE: &str = "settings.yaml";

/// Log file inside the app directory
pub const LOG_FILE: &str = "anisette-picker.log";

/// Credential entry cleared by the reset action
pub const ADI_ENTRY: &str = "adi.pb";

/// Request timeout for server list fetches, in seconds
pub const FETCH_TIMEOUT_SECS: u64 = 30;
