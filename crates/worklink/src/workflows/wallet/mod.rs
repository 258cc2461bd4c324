//! Per-user wallet ledger: a single running balance with credit/debit
//! operations. No per-transaction ledger is kept; the running balance is the
//! only state.

pub mod domain;
pub mod ledger;
pub mod repository;
pub mod router;

pub use domain::{Wallet, WalletOperation, DEFAULT_CURRENCY};
pub use ledger::{LedgerError, WalletLedger};
pub use repository::{RepositoryError, WalletRepository};
pub use router::wallet_router;
