//! Error types for the sync core
//!
//! Only the push channel has failure modes worth naming; cache
//! operations cannot fail. None of these errors cross the public API:
//! the client absorbs them into state transitions and log lines.

use thiserror::Error;

// == Channel Error Enum ==
/// Failures internal to the push channel.
#[derive(Error, Debug)]
pub enum ChannelError {
    /// The transport could not be established
    #[error("transport connect failed: {0}")]
    Connect(String),

    /// An outbound frame could not be handed to the transport
    #[error("transport send failed: {0}")]
    Send(String),

    /// An inbound frame was not valid JSON
    #[error("malformed frame: {0}")]
    Malformed(#[from] serde_json::Error),

    /// An inbound frame parsed but did not match the envelope shape
    #[error("invalid frame: {0}")]
    InvalidFrame(String),
}

// == Result Type Alias ==
/// Convenience Result type for channel internals.
pub type Result<T> = std::result::Result<T, ChannelError>;
