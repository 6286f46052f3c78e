//! Read-only transport to the node's query API.

use crate::config::ClientConfig;
use crate::error::NetworkError;
use crate::types::{BalanceResponse, DataEntry};
use async_trait::async_trait;
use lottery_types::{Address, AssetId};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// Queries against the game account's on-chain state.
///
/// Balances are returned in minor units; scaling is the caller's concern.
#[async_trait]
pub trait QueryApi: Send + Sync {
    /// Fetch one data entry of the game account.
    async fn get_entry(&self, key: &str) -> Result<DataEntry, NetworkError>;

    /// Fetch every data entry of the game account.
    async fn get_all_entries(&self) -> Result<Vec<DataEntry>, NetworkError>;

    /// Native coin balance of `address`.
    async fn native_balance(&self, address: &Address) -> Result<u64, NetworkError>;

    /// Balance of `asset_id` held by `address`.
    async fn token_balance(&self, address: &Address, asset_id: &AssetId)
        -> Result<u64, NetworkError>;
}

/// HTTP implementation of [`QueryApi`].
#[derive(Debug, Clone)]
pub struct RemoteStoreClient {
    config: ClientConfig,
    http: reqwest::Client,
}

impl RemoteStoreClient {
    /// Create a client for the configured node and game account.
    pub fn new(config: ClientConfig) -> Result<Self, NetworkError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(|source| NetworkError::Request {
            url: config.node_url.clone(),
            source,
        })?;
        Ok(Self { config, http })
    }

    /// The client's configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> Result<T, NetworkError> {
        debug!(url = %url, "GET");

        let response = match self.http.get(&url).send().await {
            Ok(response) => response,
            Err(source) => {
                warn!(url = %url, error = %source, "Query request failed");
                return Err(NetworkError::Request { url, source });
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = status.as_u16(), "Query returned error status");
            return Err(NetworkError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let body = match response.bytes().await {
            Ok(body) => body,
            Err(source) => return Err(NetworkError::Request { url, source }),
        };

        serde_json::from_slice(&body).map_err(|e| NetworkError::Malformed {
            url,
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl QueryApi for RemoteStoreClient {
    async fn get_entry(&self, key: &str) -> Result<DataEntry, NetworkError> {
        self.get_json(self.config.entry_url(key)).await
    }

    async fn get_all_entries(&self) -> Result<Vec<DataEntry>, NetworkError> {
        self.get_json(self.config.entries_url()).await
    }

    async fn native_balance(&self, address: &Address) -> Result<u64, NetworkError> {
        let response: BalanceResponse = self
            .get_json(self.config.native_balance_url(address))
            .await?;
        Ok(response.balance)
    }

    async fn token_balance(
        &self,
        address: &Address,
        asset_id: &AssetId,
    ) -> Result<u64, NetworkError> {
        let response: BalanceResponse = self
            .get_json(self.config.token_balance_url(address, asset_id.as_str()))
            .await?;
        Ok(response.balance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_unreachable_node_is_network_error() {
        // Port 9 (discard) on localhost is not serving HTTP.
        let config = ClientConfig::new(Address::new("3PGame"))
            .with_node_url("http://127.0.0.1:9")
            .with_request_timeout(Duration::from_millis(500));
        let client = RemoteStoreClient::new(config).unwrap();

        let err = client.get_entry("round").await.unwrap_err();
        assert!(matches!(err, NetworkError::Request { .. }));
        assert_eq!(err.url(), "http://127.0.0.1:9/addresses/data/3PGame/round");
    }
}
