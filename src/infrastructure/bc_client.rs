use crate::domain::{errors::BcClientError, models::TransactionRecord};
#[cfg(test)]
use mockall::automock;
use solana_sdk::{pubkey::Pubkey, signature::Signature};

/// A trait representing a blockchain client for reading transaction history
/// from the Solana network.
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait BcClient {
    /// Retrieves signatures of transactions involving `address`, newest-first.
    ///
    /// # Arguments
    ///
    /// * `address` - The account to look up.
    /// * `limit` - Maximum number of signatures to return.
    /// * `before` - When supplied, only signatures strictly older than this
    ///   one are returned (exclusive pagination bound).
    ///
    /// # Returns
    ///
    /// * `Result<Vec<String>, BcClientError>` - At most `limit` signature
    ///   strings if successful, or an error if the operation fails.
    async fn get_signatures_for_address(
        &self,
        address: &Pubkey,
        limit: usize,
        before: Option<Signature>,
    ) -> Result<Vec<String>, BcClientError>;

    /// Retrieves the full transaction record behind a signature.
    ///
    /// # Returns
    ///
    /// * `Result<TransactionRecord, BcClientError>` - The transaction if
    ///   successful, or an error if the operation fails.
    async fn get_transaction(&self, signature: &str) -> Result<TransactionRecord, BcClientError>;
}
