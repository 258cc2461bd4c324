use serde::{Deserialize, Serialize};

use crate::workflows::ids::UserId;

/// Currency new wallets open with unless configured otherwise.
pub const DEFAULT_CURRENCY: &str = "OMR";

/// One wallet per user, created lazily on first access, never deleted.
/// Invariant: the balance never goes negative through a successful apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    pub user_id: UserId,
    /// Balance in minor currency units.
    pub balance: i64,
    pub currency: String,
}

/// Direction of a balance mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WalletOperation {
    #[serde(rename = "CREDIT")]
    Credit,
    #[serde(rename = "DEBIT")]
    Debit,
}

impl WalletOperation {
    pub const fn label(self) -> &'static str {
        match self {
            WalletOperation::Credit => "CREDIT",
            WalletOperation::Debit => "DEBIT",
        }
    }
}
