use super::history::HistoryService;
use crate::domain::errors::HistoryError;
use crate::domain::models::TransactionRecord;
use crate::infrastructure::bc_client::BcClient;
use crate::infrastructure::solana_client::SolanaClient;
#[cfg(test)]
use mockall::automock;

/// Application surface the API route and the list view call into.
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait Application {
    /// One page of transaction history for `pub_key`, newest-first, ending
    /// strictly before the `before` cursor when supplied.
    async fn transaction_history<'a>(
        &self,
        pub_key: &str,
        limit: usize,
        before: Option<&'a str>,
    ) -> Result<Vec<TransactionRecord>, HistoryError>;
}

#[derive(Clone)]
pub struct App<C> {
    history: HistoryService<C>,
}

impl App<SolanaClient> {
    pub fn from_rpc_url(rpc_url: &str) -> Self {
        Self::new(SolanaClient::from_url(rpc_url))
    }
}

impl<C> App<C> {
    pub fn new(bc_client: C) -> Self {
        Self {
            history: HistoryService::builder().bc_client(bc_client).build(),
        }
    }
}

#[async_trait::async_trait]
impl<C> Application for App<C>
where
    C: BcClient + Send + Sync + 'static,
{
    async fn transaction_history<'a>(
        &self,
        pub_key: &str,
        limit: usize,
        before: Option<&'a str>,
    ) -> Result<Vec<TransactionRecord>, HistoryError> {
        tracing::info!(
            "Getting transaction history for {} (limit {}, before {:?})",
            pub_key,
            limit,
            before
        );
        self.history.fetch_history(pub_key, limit, before).await
    }
}
