//! Live data-synchronization core for the exam platform.
//!
//! Keeps many browser sessions' cached views coherent with server-side
//! mutations: a multi-domain TTL cache on one side, a persistent push
//! channel on the other, and a router mapping inbound push messages to
//! cache invalidations in between.

pub mod cache;
pub mod channel;
pub mod config;
pub mod error;
pub mod router;
pub mod tasks;

pub use cache::{Domain, DomainCache};
pub use channel::{ConnectionState, Identity, PushClient, WsTransport};
pub use config::Config;
pub use error::ChannelError;
pub use router::UpdateRouter;
pub use tasks::spawn_sweep_task;
