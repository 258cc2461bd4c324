//! Append-only notification side channel.
//!
//! Workflow operations push notifications after their primary write has
//! committed. Delivery is best-effort: a failing sink is logged by the caller
//! and never rolls back or fails the primary operation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::UserId;

/// Categories of user-facing notifications emitted by the workflows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationKind {
    #[serde(rename = "SHORTLISTED")]
    Shortlisted,
    #[serde(rename = "FLIGHT_TICKET_UPLOADED")]
    FlightTicketUploaded,
}

impl NotificationKind {
    pub const fn label(self) -> &'static str {
        match self {
            NotificationKind::Shortlisted => "SHORTLISTED",
            NotificationKind::FlightTicketUploaded => "FLIGHT_TICKET_UPLOADED",
        }
    }
}

/// A single user-facing message. Never mutated once pushed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub user_id: UserId,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

/// Outbound sink so workflows can be exercised against in-memory fakes.
pub trait NotificationSink: Send + Sync {
    fn push(&self, notification: Notification) -> Result<(), NotificationError>;
}

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("notification channel unavailable: {0}")]
    Unavailable(String),
}
