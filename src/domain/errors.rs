use thiserror::Error;

#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("Invalid public key: {0}")]
    InvalidPubKey(String),
    #[error("Invalid pagination cursor: {0}")]
    InvalidCursor(String),
    #[error("Blockchain client failure")]
    BcClient(#[from] BcClientError),
}

#[derive(Error, Debug)]
pub enum BcClientError {
    #[error("Failed to get signatures for address: {0}")]
    FailedToGetSignatures(String),
    #[error("Failed to get transaction {0}: {1}")]
    FailedToGetTransaction(String, String),
    #[error("Unsupported encoding for transaction {0}")]
    UnsupportedEncoding(String),
}
