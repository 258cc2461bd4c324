use super::domain::Wallet;
use crate::workflows::ids::UserId;

/// Storage abstraction for wallets.
///
/// Balance mutations go through `swap_balance`, a compare-and-swap on the
/// previously observed balance, so concurrent debits cannot both succeed off
/// the same read. Lost updates surface as [`RepositoryError::Conflict`] and
/// the ledger retries.
pub trait WalletRepository: Send + Sync {
    fn fetch(&self, user_id: &UserId) -> Result<Option<Wallet>, RepositoryError>;

    /// Create the wallet; fails with [`RepositoryError::Conflict`] when one
    /// already exists for the user.
    fn insert(&self, wallet: Wallet) -> Result<Wallet, RepositoryError>;

    /// Replace the balance only if it still equals `expected`.
    fn swap_balance(
        &self,
        user_id: &UserId,
        expected: i64,
        new: i64,
    ) -> Result<Wallet, RepositoryError>;
}

/// Error enumeration for wallet storage failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("wallet state changed concurrently")]
    Conflict,
    #[error("wallet not found")]
    NotFound,
    #[error("wallet storage unavailable: {0}")]
    Unavailable(String),
}
