//! Network actor - runs server list fetches in the Tokio runtime

use std::collections::HashMap;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinSet;

use crate::messages::{NetworkCommand, NetworkResponse};
use crate::network::client::{create_client, fetch_server_list, parse_source_url, FetchError};

/// Tracks an in-flight fetch for cancellation
struct ActiveRequest {
    cancel_tx: oneshot::Sender<()>,
}

/// Network actor that processes fetch commands
pub struct NetworkActor {
    client: reqwest::Client,
    response_tx: mpsc::UnboundedSender<NetworkResponse>,
    active_requests: JoinSet<()>,
    cancel_handles: HashMap<u64, ActiveRequest>,
}

impl NetworkActor {
    pub fn new(response_tx: mpsc::UnboundedSender<NetworkResponse>) -> Self {
        Self::with_client(create_client(), response_tx)
    }

    pub fn with_client(
        client: reqwest::Client,
        response_tx: mpsc::UnboundedSender<NetworkResponse>,
    ) -> Self {
        NetworkActor {
            client,
            response_tx,
            active_requests: JoinSet::new(),
            cancel_handles: HashMap::new(),
        }
    }

    /// Run the network actor message loop
    pub async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<NetworkCommand>) {
        loop {
            tokio::select! {
                biased;

                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(NetworkCommand::FetchServerList { id, url }) => {
                            self.supersede();
                            self.spawn_fetch(id, url);
                        }

                        Some(NetworkCommand::CancelRequest(id)) => {
                            if let Some(active) = self.cancel_handles.remove(&id) {
                                tracing::info!(id, "Cancelling fetch");
                                let _ = active.cancel_tx.send(());
                                let _ = self.response_tx.send(NetworkResponse::Cancelled { id });
                            }
                        }

                        Some(NetworkCommand::Shutdown) => {
                            self.supersede();
                            break;
                        }

                        None => break,
                    }
                }

                // Clean up completed tasks
                Some(_result) = self.active_requests.join_next() => {}
            }
        }
    }

    /// Cancel every fetch still in flight; only the newest request may land
    fn supersede(&mut self) {
        for (id, active) in self.cancel_handles.drain() {
            if active.cancel_tx.send(()).is_ok() {
                tracing::debug!(id, "Superseded in-flight fetch");
            }
        }
    }

    fn spawn_fetch(&mut self, id: u64, url: String) {
        let (cancel_tx, cancel_rx) = oneshot::channel();
        self.cancel_handles.insert(id, ActiveRequest { cancel_tx });

        let response_tx = self.response_tx.clone();
        let client = self.client.clone();

        self.active_requests.spawn(async move {
            let Some(parsed) = parse_source_url(&url) else {
                let _ = response_tx.send(NetworkResponse::FetchFailed {
                    id,
                    error: FetchError::Transport(format!("invalid URL: {}", url)),
                });
                return;
            };

            tracing::info!(id, url = %parsed, "Fetching server list");
            tokio::select! {
                biased;

                _ = cancel_rx => {}
                result = fetch_server_list(&client, parsed) => {
                    let response = match result {
                        Ok(servers) => {
                            tracing::info!(id, count = servers.len(), "Server list fetched");
                            NetworkResponse::ServerList { id, servers }
                        }
                        Err(error) => NetworkResponse::FetchFailed { id, error },
                    };
                    let _ = response_tx.send(response);
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Server;
    use httpmock::prelude::*;
    use std::time::Duration;

    fn spawn_actor() -> (
        mpsc::UnboundedSender<NetworkCommand>,
        mpsc::UnboundedReceiver<NetworkResponse>,
    ) {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (resp_tx, resp_rx) = mpsc::unbounded_channel();
        tokio::spawn(NetworkActor::new(resp_tx).run(cmd_rx));
        (cmd_tx, resp_rx)
    }

    #[tokio::test]
    async fn test_fetch_round_trip_through_actor() {
        let server = MockServer::start_async().await;
        server.mock_async(|when, then| {
            when.method(GET).path("/servers.json");
            then.status(200)
                .body(r#"{"servers":[{"name":"A","address":"1.2.3.4"}]}"#);
        }).await;

        let (cmd_tx, mut resp_rx) = spawn_actor();
        cmd_tx
            .send(NetworkCommand::FetchServerList { id: 7, url: server.url("/servers.json") })
            .unwrap();

        match resp_rx.recv().await.unwrap() {
            NetworkResponse::ServerList { id, servers } => {
                assert_eq!(id, 7);
                assert_eq!(servers, vec![Server::new("A", "1.2.3.4")]);
            }
            other => panic!("unexpected response: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_newer_fetch_supersedes_older() {
        let server = MockServer::start_async().await;
        server.mock_async(|when, then| {
            when.method(GET).path("/slow.json");
            then.status(200)
                .delay(Duration::from_millis(500))
                .body(r#"{"servers":[{"name":"Slow","address":"slow"}]}"#);
        }).await;
        server.mock_async(|when, then| {
            when.method(GET).path("/fast.json");
            then.status(200)
                .body(r#"{"servers":[{"name":"Fast","address":"fast"}]}"#);
        }).await;

        let (cmd_tx, mut resp_rx) = spawn_actor();
        cmd_tx
            .send(NetworkCommand::FetchServerList { id: 1, url: server.url("/slow.json") })
            .unwrap();
        cmd_tx
            .send(NetworkCommand::FetchServerList { id: 2, url: server.url("/fast.json") })
            .unwrap();

        let first = resp_rx.recv().await.unwrap();
        assert_eq!(first.id(), 2);

        // The superseded fetch never reports back
        let late = tokio::time::timeout(Duration::from_millis(800), resp_rx.recv()).await;
        assert!(late.is_err());
    }

    #[tokio::test]
    async fn test_cancel_request_reports_cancelled() {
        let server = MockServer::start_async().await;
        server.mock_async(|when, then| {
            when.method(GET).path("/slow.json");
            then.status(200).delay(Duration::from_millis(500)).body(r#"{"servers":[]}"#);
        }).await;

        let (cmd_tx, mut resp_rx) = spawn_actor();
        cmd_tx
            .send(NetworkCommand::FetchServerList { id: 3, url: server.url("/slow.json") })
            .unwrap();
        cmd_tx.send(NetworkCommand::CancelRequest(3)).unwrap();

        assert!(matches!(
            resp_rx.recv().await.unwrap(),
            NetworkResponse::Cancelled { id: 3 }
        ));
    }
}
