//! Link state and channel contracts
//!
//! The exchange loops are written against these traits so the BLE-backed
//! channels and the test mocks drive identical code. The traits mirror the
//! transport primitives: a notification/write-event source, a write/notify
//! sink, and a liveness probe checked at each cycle boundary.

use core::fmt;

use async_trait::async_trait;

use crate::Result;

// ----------------------------------------------------------------------------
// Connection State
// ----------------------------------------------------------------------------

/// Role-independent connection lifecycle.
///
/// `DiscoveryFailed` is terminal and only reachable on the central; the
/// peripheral cycles back through `Discovering` (advertising) forever.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Idle,
    Discovering,
    Connecting,
    Connected,
    Disconnected,
    DiscoveryFailed,
}

impl ConnectionState {
    /// Whether the session can make no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::DiscoveryFailed)
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Discovering => "discovering",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Disconnected => "disconnected",
            Self::DiscoveryFailed => "discovery-failed",
        };
        f.write_str(name)
    }
}

// ----------------------------------------------------------------------------
// Channel Contracts
// ----------------------------------------------------------------------------

/// Source of inbound payloads from the peer.
#[async_trait]
pub trait InboundChannel: Send {
    /// Wait for the next payload. Errors surface the transport's own
    /// timeout/failure reporting and are treated by the loops as a
    /// recoverable per-cycle condition.
    async fn recv(&mut self) -> Result<Vec<u8>>;

    /// Drain one already-arrived payload without suspending.
    fn try_recv(&mut self) -> Option<Vec<u8>>;
}

/// Sink for outbound payloads to the peer.
#[async_trait]
pub trait OutboundChannel: Send {
    async fn send(&mut self, payload: &[u8]) -> Result<()>;
}

/// Liveness probe for the underlying connection.
#[async_trait]
pub trait LinkMonitor: Send + Sync {
    async fn is_connected(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_discovery_failure_is_terminal() {
        assert!(ConnectionState::DiscoveryFailed.is_terminal());
        assert!(!ConnectionState::Disconnected.is_terminal());
        assert!(!ConnectionState::Connected.is_terminal());
    }

    #[test]
    fn state_names_are_log_friendly() {
        assert_eq!(ConnectionState::DiscoveryFailed.to_string(), "discovery-failed");
        assert_eq!(ConnectionState::Discovering.to_string(), "discovering");
    }
}
