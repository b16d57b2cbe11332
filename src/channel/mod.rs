//! Push Channel Module
//!
//! The client side of the persistent push connection: wire messages,
//! reconnect backoff, the transport seam, and the connection state
//! machine itself.

pub mod backoff;
pub mod client;
pub mod message;
pub mod transport;

pub use backoff::{ReconnectPolicy, MAX_ATTEMPTS};
pub use client::{ConnectionState, Identity, PushClient, HEARTBEAT_INTERVAL};
pub use message::{ClientMessage, PushMessage};
pub use transport::{endpoint_url, Transport, TransportPipe, WsTransport};
