//! Relay configuration.
//!
//! [`RelayConfig`] is a plain struct populated from CLI arguments in
//! `main.rs` (or from defaults in tests); no environment reads or I/O happen
//! here, which keeps the server embeddable in integration tests on an
//! ephemeral port.

use std::net::SocketAddr;

/// All runtime configuration for the relay server.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// The address and port the WebSocket listener binds to.
    ///
    /// Defaults to the IPv6 wildcard so controllers can reach the relay over
    /// v6 or, on dual-stack hosts, v4. Tests bind `127.0.0.1:0` and read the
    /// ephemeral port back from the listener.
    pub bind_addr: SocketAddr,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            // Known-valid literal; parse cannot fail.
            bind_addr: "[::]:8765".parse().unwrap(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
