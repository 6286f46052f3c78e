use async_trait::async_trait;
use lottery_client::{DataEntry, NetworkError, QueryApi};
use lottery_types::{Address, AssetId};
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashSet};
use std::time::Duration;

/// Request kinds that can be made to fail.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FailPoint {
    /// `get_entry` for this key.
    Entry(String),
    /// `get_all_entries`.
    Listing,
    /// `native_balance`.
    NativeBalance,
    /// `token_balance`.
    TokenBalance,
}

#[derive(Debug, Default)]
struct Inner {
    entries: BTreeMap<String, DataEntry>,
    native_balance: u64,
    token_balance: u64,
    failures: HashSet<FailPoint>,
    delay: Option<Duration>,
    calls: Vec<String>,
}

/// In-memory game account storage.
#[derive(Debug, Default)]
pub struct FakeQueryApi {
    inner: Mutex<Inner>,
}

impl FakeQueryApi {
    /// Storage holding only `round` and `lastWin`, as a fresh game does.
    pub fn new() -> Self {
        let api = Self::default();
        api.set_round(1);
        api.set_last_win("0_none");
        api
    }

    pub fn set_round(&self, round: i64) {
        self.set_entry(DataEntry::integer("round", round));
    }

    pub fn set_last_win(&self, value: &str) {
        self.set_entry(DataEntry::text("lastWin", value));
    }

    pub fn set_cell(&self, index: usize, value: &str) {
        self.set_entry(DataEntry::text(index.to_string(), value));
    }

    pub fn set_entry(&self, entry: DataEntry) {
        self.inner.lock().entries.insert(entry.key.clone(), entry);
    }

    pub fn remove_entry(&self, key: &str) {
        self.inner.lock().entries.remove(key);
    }

    /// Balances in minor units.
    pub fn set_balances(&self, native: u64, token: u64) {
        let mut inner = self.inner.lock();
        inner.native_balance = native;
        inner.token_balance = token;
    }

    pub fn fail(&self, point: FailPoint) {
        self.inner.lock().failures.insert(point);
    }

    pub fn recover(&self, point: &FailPoint) {
        self.inner.lock().failures.remove(point);
    }

    /// Sleep this long before answering each request.
    pub fn set_delay(&self, delay: Duration) {
        self.inner.lock().delay = Some(delay);
    }

    /// Requests made so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.inner.lock().calls.clone()
    }

    async fn enter(&self, call: String, point: FailPoint) -> Result<(), NetworkError> {
        let (delay, failing) = {
            let mut inner = self.inner.lock();
            inner.calls.push(call.clone());
            (inner.delay, inner.failures.contains(&point))
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if failing {
            return Err(NetworkError::Status {
                url: format!("fake://{}", call),
                status: 503,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl QueryApi for FakeQueryApi {
    async fn get_entry(&self, key: &str) -> Result<DataEntry, NetworkError> {
        self.enter(format!("entry/{}", key), FailPoint::Entry(key.to_string()))
            .await?;
        self.inner
            .lock()
            .entries
            .get(key)
            .cloned()
            .ok_or_else(|| NetworkError::Status {
                url: format!("fake://entry/{}", key),
                status: 404,
            })
    }

    async fn get_all_entries(&self) -> Result<Vec<DataEntry>, NetworkError> {
        self.enter("entries".to_string(), FailPoint::Listing).await?;
        Ok(self.inner.lock().entries.values().cloned().collect())
    }

    async fn native_balance(&self, _address: &Address) -> Result<u64, NetworkError> {
        self.enter("balance/native".to_string(), FailPoint::NativeBalance)
            .await?;
        Ok(self.inner.lock().native_balance)
    }

    async fn token_balance(
        &self,
        _address: &Address,
        _asset_id: &AssetId,
    ) -> Result<u64, NetworkError> {
        self.enter("balance/token".to_string(), FailPoint::TokenBalance)
            .await?;
        Ok(self.inner.lock().token_balance)
    }
}
