//! Client configuration.

use lottery_types::Address;
use std::time::Duration;

/// Default public mainnet node.
pub const DEFAULT_NODE_URL: &str = "https://nodes.wavesplatform.com";

/// Configuration for the query client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the node's REST API.
    pub node_url: String,

    /// Account whose data storage and balances are queried.
    pub game_address: Address,

    /// Per-request timeout. `None` waits indefinitely.
    pub request_timeout: Option<Duration>,
}

impl ClientConfig {
    /// Create a config for a game account on the default node.
    pub fn new(game_address: Address) -> Self {
        Self {
            node_url: DEFAULT_NODE_URL.to_string(),
            game_address,
            request_timeout: None,
        }
    }

    /// Set the node URL.
    pub fn with_node_url(mut self, node_url: impl Into<String>) -> Self {
        self.node_url = node_url.into();
        self
    }

    /// Set the per-request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    fn base(&self) -> &str {
        self.node_url.trim_end_matches('/')
    }

    /// URL of a single data entry of the game account.
    pub fn entry_url(&self, key: &str) -> String {
        format!("{}/addresses/data/{}/{}", self.base(), self.game_address, key)
    }

    /// URL of the game account's full data listing.
    pub fn entries_url(&self) -> String {
        format!("{}/addresses/data/{}", self.base(), self.game_address)
    }

    /// URL of an address's native balance.
    pub fn native_balance_url(&self, address: &Address) -> String {
        format!("{}/addresses/balance/{}", self.base(), address)
    }

    /// URL of an address's balance of a given asset.
    pub fn token_balance_url(&self, address: &Address, asset_id: &str) -> String {
        format!("{}/assets/balance/{}/{}", self.base(), address, asset_id)
    }
}
