//! HTTP client wrapper - fetches and decodes the server list

use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::constants::{APP_NAME, APP_VERSION, FETCH_TIMEOUT_SECS};
use crate::models::{Server, ServerListResponse};

/// Why a server list fetch produced no list
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("HTTP {0}")]
    Status(u16),
    #[error("invalid server list: {0}")]
    Decode(String),
}

/// Parse a source URL, accepting only absolute http(s) URLs
pub fn parse_source_url(input: &str) -> Option<Url> {
    let url = Url::parse(input.trim()).ok()?;
    match url.scheme() {
        "http" | "https" if url.has_host() => Some(url),
        _ => None,
    }
}

/// Decode a response body into the ordered server list
pub fn decode_server_list(body: &[u8]) -> Result<Vec<Server>, FetchError> {
    serde_json::from_slice::<ServerListResponse>(body)
        .map(|list| list.servers)
        .map_err(|e| FetchError::Decode(e.to_string()))
}

/// GET the list at `url` and decode it
pub async fn fetch_server_list(client: &reqwest::Client, url: Url) -> Result<Vec<Server>, FetchError> {
    let resp = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            FetchError::Transport(format!("timed out after {}s", FETCH_TIMEOUT_SECS))
        } else if e.is_connect() {
            FetchError::Transport(format!("connection failed: {}", e))
        } else {
            FetchError::Transport(e.to_string())
        }
    })?;

    let status = resp.status();
    if !status.is_success() {
        return Err(FetchError::Status(status.as_u16()));
    }

    let body = resp
        .bytes()
        .await
        .map_err(|e| FetchError::Transport(format!("error reading body: {}", e)))?;
    decode_server_list(&body)
}

/// Create an HTTP client with default configuration
pub fn create_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
        .user_agent(format!("{}/{}", APP_NAME.replace(' ', "-"), APP_VERSION))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[test]
    fn test_parse_source_url() {
        assert!(parse_source_url("https://example.test/servers.json").is_some());
        assert!(parse_source_url("  http://10.0.0.1:8080/list ").is_some());
        assert!(parse_source_url("").is_none());
        assert!(parse_source_url("servers.json").is_none());
        assert!(parse_source_url("ftp://example.test/servers.json").is_none());
        assert!(parse_source_url("https://").is_none());
    }

    #[test]
    fn test_decode_preserves_order() {
        let body = br#"{"servers":[
            {"name":"B","address":"https://b.test"},
            {"name":"A","address":"https://a.test"}
        ]}"#;
        let servers = decode_server_list(body).unwrap();
        assert_eq!(
            servers,
            vec![Server::new("B", "https://b.test"), Server::new("A", "https://a.test")]
        );
    }

    #[test]
    fn test_decode_rejects_non_json() {
        let err = decode_server_list(br#""not json""#).unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
        assert!(matches!(decode_server_list(b"not json"), Err(FetchError::Decode(_))));
    }

    #[tokio::test]
    async fn test_fetch_server_list() {
        let server = MockServer::start_async().await;
        let mock = server.mock_async(|when, then| {
            when.method(GET).path("/servers.json");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"servers":[{"name":"A","address":"1.2.3.4"}]}"#);
        }).await;

        let url = parse_source_url(&server.url("/servers.json")).unwrap();
        let servers = fetch_server_list(&create_client(), url).await.unwrap();

        mock.assert_async().await;
        assert_eq!(servers, vec![Server::new("A", "1.2.3.4")]);
    }

    #[tokio::test]
    async fn test_fetch_reports_http_status() {
        let server = MockServer::start_async().await;
        server.mock_async(|when, then| {
            when.method(GET).path("/missing.json");
            then.status(404);
        }).await;

        let url = parse_source_url(&server.url("/missing.json")).unwrap();
        let err = fetch_server_list(&create_client(), url).await.unwrap_err();
        assert_eq!(err, FetchError::Status(404));
    }

    #[tokio::test]
    async fn test_fetch_reports_decode_failure() {
        let server = MockServer::start_async().await;
        server.mock_async(|when, then| {
            when.method(GET).path("/servers.json");
            then.status(200).body("not json");
        }).await;

        let url = parse_source_url(&server.url("/servers.json")).unwrap();
        let err = fetch_server_list(&create_client(), url).await.unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }
}
