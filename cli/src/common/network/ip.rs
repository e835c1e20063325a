//! # Public IP Lookup
//!
//! File: cli/src/common/network/ip.rs
//!
//! Helpful votes are de-duplicated per client, and from the command line the
//! only stable client identity is the public address. The lookup is best
//! effort: any failure yields `"unknown"` and the vote still goes through.
//!
use crate::core::error::{Result, SupportError};
use anyhow::bail;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

/// Voter identity used when the address cannot be determined.
pub const UNKNOWN_IP: &str = "unknown";

#[derive(Debug, Deserialize)]
struct IpResponse {
    ip: String,
}

/// # Lookup Public IP (`lookup_public_ip`)
///
/// Asks `url` (an ipify-compatible endpoint returning `{"ip": ".."}`) for the
/// caller's public address. Never fails; see module docs.
pub async fn lookup_public_ip(client: &Client, url: &str) -> String {
    match fetch_ip(client, url).await {
        Ok(ip) => {
            debug!("Public IP resolved to {}", ip);
            ip
        }
        Err(e) => {
            warn!("Public IP lookup via {} failed: {:#}", url, e);
            UNKNOWN_IP.to_string()
        }
    }
}

async fn fetch_ip(client: &Client, url: &str) -> Result<String> {
    let response = client.get(url).send().await.map_err(SupportError::from)?;
    if !response.status().is_success() {
        bail!("IP lookup returned status {}", response.status());
    }
    let body: IpResponse = response.json().await.map_err(SupportError::from)?;
    let ip = body.ip.trim();
    if ip.is_empty() {
        bail!("IP lookup returned an empty address");
    }
    Ok(ip.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn returns_ip_from_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "ip": "203.0.113.7" })))
            .mount(&server)
            .await;

        let ip = lookup_public_ip(&Client::new(), &server.uri()).await;
        assert_eq!(ip, "203.0.113.7");
    }

    #[tokio::test]
    async fn falls_back_on_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        assert_eq!(lookup_public_ip(&Client::new(), &server.uri()).await, UNKNOWN_IP);
    }

    #[tokio::test]
    async fn falls_back_on_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        assert_eq!(lookup_public_ip(&Client::new(), &server.uri()).await, UNKNOWN_IP);
    }

    #[tokio::test]
    async fn falls_back_when_unreachable() {
        // Port 9 (discard) on localhost is not expected to serve HTTP.
        let ip = lookup_public_ip(&Client::new(), "http://127.0.0.1:9/").await;
        assert_eq!(ip, UNKNOWN_IP);
    }
}
