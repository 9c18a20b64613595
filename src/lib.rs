//! Solana transaction history service.
//!
//! A REST proxy over the Solana RPC client (`/api/transactions`) paired with
//! the deterministic state machine behind a paginated, filterable
//! transaction list view.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod service;
