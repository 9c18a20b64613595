use chrono::NaiveDate;
use solana_sdk::native_token::LAMPORTS_PER_SOL;

use super::models::TransactionRecord;

/// Render-time filter over an accumulated transaction list.
///
/// Every bound is optional; an unset bound leaves that side of the window
/// open. An entirely unset filter passes every record unchanged.
#[derive(Clone, Debug, Default)]
pub struct TransactionFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
}

/// Index of `pub_key` within the transaction's account keys, when present.
pub fn account_index(record: &TransactionRecord, pub_key: &str) -> Option<usize> {
    record
        .transaction
        .message
        .account_keys
        .iter()
        .position(|key| key == pub_key)
}

/// Signed balance change of `pub_key` across the transaction, in SOL.
///
/// `None` when the key does not participate in the transaction or the record
/// carries no meta; callers treat such records as a distinct case instead of
/// indexing the balance arrays blindly.
pub fn signed_amount(record: &TransactionRecord, pub_key: &str) -> Option<f64> {
    let meta = record.meta.as_ref()?;
    let index = account_index(record, pub_key)?;
    let pre = *meta.pre_balances.get(index)? as i128;
    let post = *meta.post_balances.get(index)? as i128;
    Some((post - pre) as f64 / LAMPORTS_PER_SOL as f64)
}

impl TransactionFilter {
    /// Whether `record` falls inside the date window and, for `pub_key`,
    /// inside the signed amount window.
    ///
    /// Records without a block time are excluded once a date bound is set.
    /// Records in which `pub_key` does not participate are skipped once an
    /// amount bound is set.
    pub fn matches(&self, record: &TransactionRecord, pub_key: &str) -> bool {
        if self.start_date.is_some() || self.end_date.is_some() {
            let Some(date) = record.block_datetime().map(|dt| dt.date_naive()) else {
                return false;
            };
            if self.start_date.is_some_and(|start| date < start) {
                return false;
            }
            if self.end_date.is_some_and(|end| date > end) {
                return false;
            }
        }

        if self.min_amount.is_none() && self.max_amount.is_none() {
            return true;
        }
        let Some(amount) = signed_amount(record, pub_key) else {
            return false;
        };
        if self.min_amount.is_some_and(|min| amount < min) {
            return false;
        }
        if self.max_amount.is_some_and(|max| amount > max) {
            return false;
        }
        true
    }
}
