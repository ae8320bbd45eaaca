//! Randomness source collaborator.
//!
//! The `randomNumber` tool draws entropy from a public drand beacon. The
//! beacon is reached over HTTP and treated as unreliable: every failure mode
//! is reported as a [`RandomnessError`] and the caller decides how to degrade.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, instrument};

use super::config::RandomnessConfig;

/// Errors that can occur while fetching randomness.
#[derive(Debug, Error)]
pub enum RandomnessError {
    /// The HTTP request failed (connect, timeout, body read).
    #[error("Request failed: {0}")]
    Request(String),

    /// The beacon answered with a non-success status.
    #[error("Unexpected status: {0}")]
    Status(u16),

    /// The response body was not a beacon document.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Source of hex-encoded entropy.
#[async_trait]
pub trait RandomnessSource: Send + Sync {
    /// Fetch the latest randomness as a hex string.
    async fn fetch_hex(&self) -> Result<String, RandomnessError>;
}

/// Subset of a drand beacon response.
#[derive(Debug, Deserialize)]
struct Beacon {
    round: u64,
    randomness: String,
}

/// Client for the drand HTTP API.
#[derive(Debug, Clone)]
pub struct DrandClient {
    client: reqwest::Client,
    url: String,
}

impl DrandClient {
    /// Build a client from configuration.
    pub fn new(config: &RandomnessConfig) -> Result<Self, RandomnessError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RandomnessError::Request(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: config.url.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl RandomnessSource for DrandClient {
    #[instrument(skip(self), fields(url = %self.url))]
    async fn fetch_hex(&self) -> Result<String, RandomnessError> {
        let response = self.client.get(&self.url).send().await.map_err(|e| {
            if e.is_timeout() {
                RandomnessError::Request("Request timed out".to_string())
            } else if e.is_connect() {
                RandomnessError::Request("Connection failed".to_string())
            } else {
                RandomnessError::Request(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RandomnessError::Status(status.as_u16()));
        }

        let beacon: Beacon = response
            .json()
            .await
            .map_err(|e| RandomnessError::InvalidResponse(e.to_string()))?;

        debug!("Fetched drand round {}", beacon.round);
        Ok(beacon.randomness)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_beacon_deserialization() {
        let json = r#"{
            "round": 4242,
            "randomness": "a1b2c3d4e5f60718293a4b5c6d7e8f90a1b2c3d4e5f60718293a4b5c6d7e8f90",
            "signature": "ff",
            "previous_signature": "ee"
        }"#;
        let beacon: Beacon = serde_json::from_str(json).unwrap();
        assert_eq!(beacon.round, 4242);
        assert_eq!(beacon.randomness.len(), 64);
    }

    #[test]
    fn test_client_uses_configured_url() {
        let config = RandomnessConfig {
            url: "http://localhost:1/public/latest".to_string(),
            timeout_secs: 1,
        };
        let client = DrandClient::new(&config).unwrap();
        assert_eq!(client.url(), "http://localhost:1/public/latest");
    }

    #[tokio::test]
    async fn test_unreachable_beacon_is_an_error() {
        let config = RandomnessConfig {
            url: "http://127.0.0.1:9/public/latest".to_string(),
            timeout_secs: 1,
        };
        let client = DrandClient::new(&config).unwrap();
        assert!(matches!(
            client.fetch_hex().await,
            Err(RandomnessError::Request(_))
        ));
    }
}
