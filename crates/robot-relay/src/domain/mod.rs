//! Domain layer for robot-relay.
//!
//! The relay deliberately has almost no domain: it never interprets
//! commands, only rebroadcasts them. What remains is configuration.

pub mod config;

pub use config::RelayConfig;
