use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A transaction as returned by the ledger, re-exposed verbatim on the wire.
///
/// Serialized camelCase to match the RPC JSON schema (`blockTime`,
/// `preBalances`, `accountKeys`, ...).
#[derive(Clone, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    /// Unix timestamp of the block containing this transaction
    pub block_time: Option<i64>,
    /// Slot number in which the transaction was processed
    pub slot: u64,
    /// Status metadata, including pre/post balances
    pub meta: Option<TransactionMeta>,
    /// The transaction body
    pub transaction: TransactionBody,
}

/// Status metadata attached to a processed transaction.
///
/// `pre_balances` and `post_balances` are index-correspondent with the
/// message's `account_keys`; the ledger guarantees equal lengths.
#[derive(Clone, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TransactionMeta {
    /// Error description when the transaction failed on-chain
    pub err: Option<String>,
    /// Transaction fee in lamports
    pub fee: u64,
    /// Account balances before execution, in lamports
    pub pre_balances: Vec<u64>,
    /// Account balances after execution, in lamports
    pub post_balances: Vec<u64>,
}

#[derive(Clone, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TransactionBody {
    pub message: TransactionMessage,
    /// Signature strings; the first entry is the canonical transaction id
    pub signatures: Vec<String>,
}

#[derive(Clone, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TransactionMessage {
    /// Account identifiers referenced by the transaction; position 0 is the
    /// fee payer
    pub account_keys: Vec<String>,
    pub recent_blockhash: String,
}

impl TransactionRecord {
    /// The canonical transaction identifier, used as the pagination cursor.
    pub fn primary_signature(&self) -> Option<&str> {
        self.transaction.signatures.first().map(String::as_str)
    }

    /// Block time as a UTC datetime, when the ledger reported one.
    pub fn block_datetime(&self) -> Option<DateTime<Utc>> {
        self.block_time
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
    }
}
