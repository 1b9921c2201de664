use serde::{Deserialize, Serialize};

/// A single Anisette server entry from the remote list
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Server {
    pub name: String,
    pub address: String,
}

impl Server {
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Server {
            name: name.into(),
            address: address.into(),
        }
    }
}

/// Wire envelope returned by the server list endpoint
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ServerListResponse {
    pub servers: Vec<Server>,
}

/// Load status of the server list, shown alongside it
#[derive(Clone, Debug, PartialEq, Default)]
pub enum LoadStatus {
    /// No fetch has completed or been issued yet
    #[default]
    Idle,
    Loading,
    Loaded {
        count: usize,
        at: chrono::DateTime<chrono::Local>,
    },
    Failed(String),
    Cancelled,
}

impl LoadStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadStatus::Loading)
    }

    /// Short label for titles and the status bar
    pub fn label(&self) -> String {
        match self {
            LoadStatus::Idle => String::from("not loaded"),
            LoadStatus::Loading => String::from("loading..."),
            LoadStatus::Loaded { count, at } => {
                format!("{} servers, updated {}", count, at.format("%H:%M:%S"))
            }
            LoadStatus::Failed(message) => format!("failed: {}", message),
            LoadStatus::Cancelled => String::from("refresh cancelled"),
        }
    }
}
