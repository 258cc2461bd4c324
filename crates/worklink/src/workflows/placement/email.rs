//! Outbound email boundary for contract dispatch.

/// A single outbound message with a binary attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
    pub attachment_name: String,
    pub attachment: Vec<u8>,
}

/// Trait describing the outbound email transport (SMTP provider adapter).
pub trait EmailGateway: Send + Sync {
    fn send(&self, message: EmailMessage) -> Result<(), EmailError>;
}

#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    #[error("email transport failed: {0}")]
    Transport(String),
}
