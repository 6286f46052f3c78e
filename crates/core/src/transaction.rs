//! Invoke-script transaction parameters handed to the wallet.

use crate::wallet::WalletError;
use lottery_types::{Address, AssetId, CellIndex};
use serde::{Deserialize, Serialize};

/// Transaction type code of an invoke-script call.
pub const INVOKE_SCRIPT_TYPE: u8 = 16;

/// Name of the contract's purchase function.
pub const BUY_FUNCTION: &str = "buy";

/// An amount of an asset in display units, as the wallet expects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    #[serde(rename = "assetId")]
    pub asset_id: AssetId,
    pub tokens: String,
}

/// Typed argument of a contract call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum CallArg {
    Integer(i64),
    String(String),
    Boolean(bool),
}

/// Contract function call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Call {
    pub function: String,
    pub args: Vec<CallArg>,
}

/// Body of an invoke-script transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvokeData {
    pub fee: Payment,
    #[serde(rename = "dApp")]
    pub dapp: Address,
    pub call: Call,
    pub payment: Vec<Payment>,
}

/// Parameters of an invoke-script transaction, ready for signing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvokeTransaction {
    #[serde(rename = "type")]
    pub tx_type: u8,
    pub data: InvokeData,
}

impl InvokeTransaction {
    /// Purchase `cell` on `game`, paying exactly one unit of `asset_id`.
    pub fn buy(game: Address, cell: CellIndex, asset_id: AssetId, fee: Payment) -> Self {
        Self {
            tx_type: INVOKE_SCRIPT_TYPE,
            data: InvokeData {
                fee,
                dapp: game,
                call: Call {
                    function: BUY_FUNCTION.to_string(),
                    args: vec![CallArg::Integer(cell.get() as i64)],
                },
                payment: vec![Payment {
                    asset_id,
                    tokens: "1".to_string(),
                }],
            },
        }
    }
}

/// A transaction the wallet reports as signed and broadcast.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmittedTransaction {
    /// Transaction id, when the wallet's JSON carries one.
    pub id: Option<String>,
    /// The signed transaction as returned by the wallet.
    pub raw: serde_json::Value,
}

impl SubmittedTransaction {
    /// Parse the wallet's signed transaction JSON.
    pub fn parse(json: &str) -> Result<Self, WalletError> {
        let raw: serde_json::Value = serde_json::from_str(json)
            .map_err(|e| WalletError::MalformedResponse(e.to_string()))?;
        let id = raw.get("id").and_then(|id| id.as_str()).map(str::to_string);
        Ok(Self { id, raw })
    }
}
