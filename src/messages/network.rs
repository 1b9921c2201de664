//! Network messages - communication between App and Network layers

use crate::models::Server;
use crate::network::client::FetchError;

/// Commands sent from App layer to Network layer
#[derive(Debug, Clone)]
pub enum NetworkCommand {
    /// Fetch and decode the server list. Supersedes any fetch still in flight.
    FetchServerList {
        id: u64,
        url: String,
    },
    /// Cancel a pending fetch
    CancelRequest(u64),
    /// Shutdown the network actor
    Shutdown,
}

/// Responses sent from Network layer to App layer
#[derive(Debug, Clone)]
pub enum NetworkResponse {
    /// Server list fetched and decoded
    ServerList {
        id: u64,
        servers: Vec<Server>,
    },
    /// Transport, status or decode failure
    FetchFailed {
        id: u64,
        error: FetchError,
    },
    /// Fetch was cancelled before completing
    Cancelled {
        id: u64,
    },
}

impl NetworkResponse {
    /// Get the request ID from the response
    pub fn id(&self) -> u64 {
        match self {
            NetworkResponse::ServerList { id, .. } => *id,
            NetworkResponse::FetchFailed { id, .. } => *id,
            NetworkResponse::Cancelled { id } => *id,
        }
    }
}
