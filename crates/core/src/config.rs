//! Game client configuration.

use crate::transaction::{InvokeTransaction, Payment};
use lottery_client::ClientConfig;
use lottery_types::{Address, Asset, AssetId, CellIndex, NetworkCode};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Errors loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("poll_interval_ms must be at least {}", MIN_POLL_INTERVAL.as_millis())]
    PollInterval,
}

/// Shortest delay between reconciliation passes.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// An asset's on-chain identifier and decimal scale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetConfig {
    pub id: AssetId,
    pub decimals: u32,
}

/// Fee attached to every purchase transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeConfig {
    pub asset_id: AssetId,
    /// Fee in display units, as the wallet expects it.
    pub tokens: String,
}

/// Configuration for a game client.
///
/// Every field defaults to the mainnet deployment, so a TOML file only
/// needs to name what differs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LotteryConfig {
    /// Base URL of the node's REST API.
    pub node_url: String,

    /// Account holding the game's data and funds.
    pub game_address: Address,

    /// Network the wallet must be connected to.
    pub expected_network: NetworkCode,

    /// Delay between reconciliation passes.
    pub poll_interval_ms: u64,

    /// Per-request timeout. Unset waits indefinitely.
    pub request_timeout_ms: Option<u64>,

    /// The chain's native coin.
    pub native_asset: AssetConfig,

    /// The community token.
    pub token_asset: AssetConfig,

    /// Purchase transaction fee.
    pub fee: FeeConfig,

    /// Discard fetched cells whose round is lower than the one already held.
    ///
    /// Off by default: the node is authoritative, but a lagging node can
    /// serve older data.
    pub reject_round_regression: bool,

    /// Block explorer base URL.
    pub explorer_url: String,
}

impl Default for LotteryConfig {
    fn default() -> Self {
        Self {
            node_url: lottery_client::config::DEFAULT_NODE_URL.to_string(),
            game_address: Address::new("3PA7R1CDJXWbzwKRTL98LQXn9Crb5XdHoHH"),
            expected_network: NetworkCode::MAINNET,
            poll_interval_ms: 1000,
            request_timeout_ms: None,
            native_asset: AssetConfig {
                id: AssetId::native(),
                decimals: 8,
            },
            token_asset: AssetConfig {
                id: AssetId::new("DHgwrRvVyqJsepd32YbBqUeDH4GJ1N984X8QoekjgH8J"),
                decimals: 2,
            },
            fee: FeeConfig {
                asset_id: AssetId::native(),
                tokens: "0.005".to_string(),
            },
            reject_round_regression: false,
            explorer_url: "https://wavesexplorer.com".to_string(),
        }
    }
}

impl LotteryConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        if Duration::from_millis(config.poll_interval_ms) < MIN_POLL_INTERVAL {
            return Err(ConfigError::PollInterval);
        }
        Ok(config)
    }

    /// Load a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Set the node URL.
    pub fn with_node_url(mut self, node_url: impl Into<String>) -> Self {
        self.node_url = node_url.into();
        self
    }

    /// Set the game account.
    pub fn with_game_address(mut self, game_address: Address) -> Self {
        self.game_address = game_address;
        self
    }

    /// Set the expected wallet network.
    pub fn with_expected_network(mut self, network: NetworkCode) -> Self {
        self.expected_network = network;
        self
    }

    /// Set the reconciliation interval, raised to [`MIN_POLL_INTERVAL`]
    /// if shorter.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval_ms = interval.max(MIN_POLL_INTERVAL).as_millis() as u64;
        self
    }

    /// Set the per-request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_ms = Some(timeout.as_millis() as u64);
        self
    }

    /// Enable or disable rejection of round regressions.
    pub fn with_reject_round_regression(mut self, reject: bool) -> Self {
        self.reject_round_regression = reject;
        self
    }

    /// Delay between reconciliation passes, never below [`MIN_POLL_INTERVAL`].
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms).max(MIN_POLL_INTERVAL)
    }

    /// Configuration of a payment asset.
    pub fn asset(&self, asset: Asset) -> &AssetConfig {
        match asset {
            Asset::Native => &self.native_asset,
            Asset::Token => &self.token_asset,
        }
    }

    /// Query client configuration.
    pub fn client_config(&self) -> ClientConfig {
        let config =
            ClientConfig::new(self.game_address.clone()).with_node_url(self.node_url.clone());
        match self.request_timeout_ms {
            Some(ms) => config.with_request_timeout(Duration::from_millis(ms)),
            None => config,
        }
    }

    /// Parameters for buying `cell` with one unit of `asset`.
    pub fn buy_transaction(&self, cell: CellIndex, asset: Asset) -> InvokeTransaction {
        let fee = Payment {
            asset_id: self.fee.asset_id.clone(),
            tokens: self.fee.tokens.clone(),
        };
        InvokeTransaction::buy(
            self.game_address.clone(),
            cell,
            self.asset(asset).id.clone(),
            fee,
        )
    }

    /// Explorer page of an address.
    pub fn explorer_address_url(&self, address: &Address) -> String {
        format!(
            "{}/address/{}",
            self.explorer_url.trim_end_matches('/'),
            address
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::EngineConfig;

    #[test]
    fn test_defaults_match_mainnet_deployment() {
        let config = LotteryConfig::default();
        assert_eq!(config.poll_interval(), Duration::from_secs(1));
        assert_eq!(config.expected_network, NetworkCode::MAINNET);
        assert_eq!(config.asset(Asset::Native).id.as_str(), "WAVES");
        assert_eq!(config.asset(Asset::Native).decimals, 8);
        assert_eq!(config.asset(Asset::Token).decimals, 2);
        assert!(config.client_config().request_timeout.is_none());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = LotteryConfig::from_toml_str(
            r#"
            node_url = "https://testnodes.wavesnodes.com"
            game_address = "3MGame"
            expected_network = "T"
            poll_interval_ms = 2500
            request_timeout_ms = 3000

            [token_asset]
            id = "TokenId"
            decimals = 4
            "#,
        )
        .unwrap();

        assert_eq!(config.game_address, Address::new("3MGame"));
        assert_eq!(config.expected_network, NetworkCode::TESTNET);
        assert_eq!(config.poll_interval(), Duration::from_millis(2500));
        assert_eq!(config.token_asset.id.as_str(), "TokenId");
        assert_eq!(config.native_asset.decimals, 8);
        assert_eq!(config.fee.tokens, "0.005");
        assert_eq!(
            config.client_config().request_timeout,
            Some(Duration::from_secs(3))
        );
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            LotteryConfig::from_toml_str("poll_interval_ms = \"soon\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_zero_poll_interval() {
        assert!(matches!(
            LotteryConfig::from_toml_str("poll_interval_ms = 0"),
            Err(ConfigError::PollInterval)
        ));

        let config = LotteryConfig::default().with_poll_interval(Duration::ZERO);
        assert_eq!(config.poll_interval(), MIN_POLL_INTERVAL);

        let mut config = LotteryConfig::default();
        config.poll_interval_ms = 0;
        assert_eq!(config.poll_interval(), MIN_POLL_INTERVAL);
        assert_eq!(EngineConfig::from(&config).poll_interval, MIN_POLL_INTERVAL);
    }

    #[test]
    fn test_explorer_url() {
        let config = LotteryConfig::default();
        assert_eq!(
            config.explorer_address_url(&Address::new("3PX")),
            "https://wavesexplorer.com/address/3PX"
        );
    }

    #[test]
    fn test_buy_transaction_uses_configured_assets() {
        let config = LotteryConfig::default();
        let cell = CellIndex::new(7).unwrap();

        let tx = config.buy_transaction(cell, Asset::Token);
        assert_eq!(tx.data.dapp, config.game_address);
        assert_eq!(tx.data.payment[0].asset_id, config.token_asset.id);
        assert_eq!(tx.data.fee.asset_id.as_str(), "WAVES");

        let tx = config.buy_transaction(cell, Asset::Native);
        assert_eq!(tx.data.payment[0].asset_id.as_str(), "WAVES");
    }
}
