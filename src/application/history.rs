use crate::domain::errors::HistoryError;
use crate::domain::models::TransactionRecord;
use crate::infrastructure::bc_client::BcClient;
use solana_sdk::{pubkey::Pubkey, signature::Signature};
use std::str::FromStr;
use typed_builder::TypedBuilder;

/// Page size used when a request does not specify one.
pub const DEFAULT_PAGE_LIMIT: usize = 10;

/// Fetches transaction history pages from the ledger.
#[derive(Clone, TypedBuilder)]
pub struct HistoryService<C> {
    bc_client: C,
}

impl<C> HistoryService<C>
where
    C: BcClient + Send + Sync,
{
    /// Transactions for `pub_key`, newest-first, at most `limit` entries,
    /// ending strictly before the `before` cursor when supplied.
    ///
    /// Signatures are resolved first, then each transaction body is fetched
    /// sequentially in signature order. Any failure aborts the whole page;
    /// partial results are never returned.
    pub async fn fetch_history(
        &self,
        pub_key: &str,
        limit: usize,
        before: Option<&str>,
    ) -> Result<Vec<TransactionRecord>, HistoryError> {
        let address = Pubkey::from_str(pub_key)
            .map_err(|_| HistoryError::InvalidPubKey(pub_key.to_string()))?;
        let before = match before {
            Some(cursor) => Some(
                Signature::from_str(cursor)
                    .map_err(|_| HistoryError::InvalidCursor(cursor.to_string()))?,
            ),
            None => None,
        };

        let signatures = self
            .bc_client
            .get_signatures_for_address(&address, limit, before)
            .await?;
        tracing::debug!("Resolved {} signatures for {}", signatures.len(), pub_key);

        let mut transactions = Vec::with_capacity(signatures.len());
        for signature in &signatures {
            transactions.push(self.bc_client.get_transaction(signature).await?);
        }

        Ok(transactions)
    }
}
