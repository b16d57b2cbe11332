//! Configuration Module
//!
//! Loads sync-core settings from environment variables with sensible
//! defaults.

use std::env;

use crate::channel::Identity;

/// Sync core configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Host (and port) of the push channel server
    pub channel_host: String,
    /// Whether to use the secure transport variant (wss)
    pub channel_secure: bool,
    /// Interval between cache sweep runs, in seconds
    pub sweep_interval: u64,
    /// Authenticated user id; no channel is opened without one
    pub user_id: Option<String>,
    /// Role of the authenticated user
    pub user_role: String,
}

impl Config {
    /// Creates a new Config from environment variables.
    ///
    /// # Environment Variables
    /// - `CHANNEL_HOST` - push server host:port (default: localhost:8080)
    /// - `CHANNEL_SECURE` - use wss when "true" (default: false)
    /// - `SWEEP_INTERVAL` - sweep frequency in seconds (default: 300)
    /// - `USER_ID` - session user id (no default; anonymous without it)
    /// - `USER_ROLE` - session role (default: student)
    pub fn from_env() -> Self {
        Self {
            channel_host: env::var("CHANNEL_HOST")
                .unwrap_or_else(|_| "localhost:8080".to_string()),
            channel_secure: env::var("CHANNEL_SECURE")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
            sweep_interval: env::var("SWEEP_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(300),
            user_id: env::var("USER_ID").ok().filter(|v| !v.is_empty()),
            user_role: env::var("USER_ROLE").unwrap_or_else(|_| "student".to_string()),
        }
    }

    /// The session identity, if one is configured. Anonymous sessions
    /// get no push channel.
    pub fn identity(&self) -> Option<Identity> {
        self.user_id.as_ref().map(|user_id| Identity {
            user_id: user_id.clone(),
            role: self.user_role.clone(),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            channel_host: "localhost:8080".to_string(),
            channel_secure: false,
            sweep_interval: 300,
            user_id: None,
            user_role: "student".to_string(),
        }
    }
}
