pub mod bc_client;
pub mod solana_client;
