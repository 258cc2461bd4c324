use std::sync::Arc;

use super::domain::{Wallet, WalletOperation};
use super::repository::{RepositoryError, WalletRepository};
use crate::workflows::ids::UserId;

/// Bounded retries for the balance compare-and-swap before giving up.
const MAX_SWAP_ATTEMPTS: usize = 5;

/// Service applying credit/debit operations to per-user wallets.
pub struct WalletLedger<W> {
    repository: Arc<W>,
    currency: String,
}

impl<W> WalletLedger<W>
where
    W: WalletRepository + 'static,
{
    pub fn new(repository: Arc<W>, currency: impl Into<String>) -> Self {
        Self {
            repository,
            currency: currency.into(),
        }
    }

    /// Return the user's wallet, creating a zero-balance one on first
    /// access. A create that loses the race to a concurrent creator falls
    /// back to the winner's row.
    pub fn get_or_create(&self, user_id: &UserId) -> Result<Wallet, LedgerError> {
        if let Some(wallet) = self.repository.fetch(user_id)? {
            return Ok(wallet);
        }

        let fresh = Wallet {
            user_id: user_id.clone(),
            balance: 0,
            currency: self.currency.clone(),
        };
        match self.repository.insert(fresh) {
            Ok(wallet) => Ok(wallet),
            Err(RepositoryError::Conflict) => self
                .repository
                .fetch(user_id)?
                .ok_or_else(|| LedgerError::Unavailable("wallet lost after create race".into())),
            Err(other) => Err(other.into()),
        }
    }

    /// Apply a credit or debit of `amount` minor units.
    ///
    /// A debit that would take the balance negative fails with
    /// [`LedgerError::InsufficientBalance`] and leaves the stored balance
    /// unchanged. The mutation is a compare-and-swap on the observed
    /// balance, retried on conflict, so concurrent applies serialize rather
    /// than losing updates.
    pub fn apply(
        &self,
        user_id: &UserId,
        amount: i64,
        operation: WalletOperation,
    ) -> Result<Wallet, LedgerError> {
        if amount <= 0 {
            return Err(LedgerError::Validation("amount must be positive"));
        }

        for _ in 0..MAX_SWAP_ATTEMPTS {
            let wallet = self.get_or_create(user_id)?;
            // Debits cannot overflow: the stored balance is never negative,
            // so `balance - amount` stays above `i64::MIN`.
            let new_balance = match operation {
                WalletOperation::Credit => wallet
                    .balance
                    .checked_add(amount)
                    .ok_or(LedgerError::Validation("credit would overflow the balance"))?,
                WalletOperation::Debit => wallet.balance - amount,
            };
            if new_balance < 0 {
                return Err(LedgerError::InsufficientBalance {
                    balance: wallet.balance,
                    requested: amount,
                });
            }

            match self
                .repository
                .swap_balance(user_id, wallet.balance, new_balance)
            {
                Ok(updated) => return Ok(updated),
                Err(RepositoryError::Conflict) => continue,
                Err(other) => return Err(other.into()),
            }
        }

        Err(LedgerError::Unavailable(
            "wallet busy: balance swap retries exhausted".to_string(),
        ))
    }
}

/// Error raised by the wallet ledger. Each variant maps to a stable wire
/// code via [`LedgerError::code`].
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("{0}")]
    Validation(&'static str),
    #[error("insufficient balance: have {balance}, requested {requested}")]
    InsufficientBalance { balance: i64, requested: i64 },
    #[error("wallet not found")]
    NotFound,
    #[error("wallet storage unavailable: {0}")]
    Unavailable(String),
}

impl LedgerError {
    pub fn code(&self) -> &'static str {
        match self {
            LedgerError::Validation(_) => "VALIDATION_ERROR",
            LedgerError::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            LedgerError::NotFound => "NOT_FOUND",
            LedgerError::Unavailable(_) => "UNAVAILABLE",
        }
    }
}

impl From<RepositoryError> for LedgerError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::NotFound => LedgerError::NotFound,
            RepositoryError::Conflict => {
                LedgerError::Unavailable("wallet state changed concurrently".to_string())
            }
            RepositoryError::Unavailable(reason) => LedgerError::Unavailable(reason),
        }
    }
}
