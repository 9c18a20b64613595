use solana_client::{
    nonblocking::rpc_client::RpcClient, rpc_client::GetConfirmedSignaturesForAddress2Config,
    rpc_config::RpcTransactionConfig,
};
use solana_sdk::{commitment_config::CommitmentConfig, pubkey::Pubkey, signature::Signature};
use solana_transaction_status::{
    EncodedConfirmedTransactionWithStatusMeta, EncodedTransaction, UiMessage,
    UiTransactionEncoding,
};
use std::str::FromStr;
use std::sync::Arc;

use crate::domain::{
    errors::BcClientError,
    models::{TransactionBody, TransactionMessage, TransactionMeta, TransactionRecord},
};

use super::bc_client::BcClient;

/// A client for reading transaction history from the Solana blockchain.
#[derive(Clone)]
pub struct SolanaClient {
    rpc_client: Arc<RpcClient>,
}

impl SolanaClient {
    /// Creates a new `SolanaClient` instance from the given RPC URL.
    ///
    /// # Arguments
    ///
    /// * `rpc_url` - The URL of the Solana RPC endpoint.
    ///
    /// # Returns
    ///
    /// A new `SolanaClient` instance.
    pub fn from_url(rpc_url: &str) -> Self {
        Self {
            rpc_client: Arc::new(RpcClient::new_with_commitment(
                rpc_url.to_string(),
                CommitmentConfig::confirmed(),
            )),
        }
    }
}

#[async_trait::async_trait]
impl BcClient for SolanaClient {
    async fn get_signatures_for_address(
        &self,
        address: &Pubkey,
        limit: usize,
        before: Option<Signature>,
    ) -> Result<Vec<String>, BcClientError> {
        let config = GetConfirmedSignaturesForAddress2Config {
            before,
            until: None,
            limit: Some(limit),
            commitment: Some(CommitmentConfig::confirmed()),
        };

        let signatures = self
            .rpc_client
            .get_signatures_for_address_with_config(address, config)
            .await
            .map_err(|e| BcClientError::FailedToGetSignatures(e.to_string()))?;

        Ok(signatures
            .into_iter()
            .map(|info| info.signature)
            .collect())
    }

    async fn get_transaction(&self, signature: &str) -> Result<TransactionRecord, BcClientError> {
        let parsed = Signature::from_str(signature).map_err(|e| {
            BcClientError::FailedToGetTransaction(signature.to_string(), e.to_string())
        })?;

        let transaction = self
            .rpc_client
            .get_transaction_with_config(
                &parsed,
                RpcTransactionConfig {
                    encoding: Some(UiTransactionEncoding::Json),
                    commitment: Some(CommitmentConfig::confirmed()),
                    max_supported_transaction_version: Some(0),
                },
            )
            .await
            .map_err(|e| {
                BcClientError::FailedToGetTransaction(signature.to_string(), e.to_string())
            })?;

        into_record(signature, transaction)
    }
}

/// Maps the RPC's encoded transaction into the wire model the API re-exposes.
fn into_record(
    signature: &str,
    confirmed: EncodedConfirmedTransactionWithStatusMeta,
) -> Result<TransactionRecord, BcClientError> {
    let EncodedTransaction::Json(ui_transaction) = confirmed.transaction.transaction else {
        return Err(BcClientError::UnsupportedEncoding(signature.to_string()));
    };
    let UiMessage::Raw(message) = ui_transaction.message else {
        return Err(BcClientError::UnsupportedEncoding(signature.to_string()));
    };

    let meta = confirmed.transaction.meta.map(|meta| TransactionMeta {
        err: meta.err.map(|e| e.to_string()),
        fee: meta.fee,
        pre_balances: meta.pre_balances,
        post_balances: meta.post_balances,
    });

    Ok(TransactionRecord {
        block_time: confirmed.block_time,
        slot: confirmed.slot,
        meta,
        transaction: TransactionBody {
            message: TransactionMessage {
                account_keys: message.account_keys,
                recent_blockhash: message.recent_blockhash,
            },
            signatures: ui_transaction.signatures,
        },
    })
}
