//! Disconnection monitor port.
//!
//! A sampled, non-blocking view of whether the remote peer is still there.
//! The signal may lag the real state of the connection; it lets a run stop
//! early and is not a correctness mechanism.

use tokio_util::sync::CancellationToken;

/// Reports peer liveness as best known by the transport.
#[cfg_attr(test, mockall::automock)]
pub trait DisconnectionMonitor: Send + Sync {
    /// `false` once the transport knows the peer is gone. Must not block.
    fn is_connected(&self) -> bool;
}

/// Monitor for local runs where there is no remote peer.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysConnected;

impl DisconnectionMonitor for AlwaysConnected {
    fn is_connected(&self) -> bool {
        true
    }
}

/// Monitor backed by a cancellation token.
///
/// Cancelling the token marks the peer as gone.
#[derive(Debug, Clone, Default)]
pub struct TokenMonitor {
    token: CancellationToken,
}

impl TokenMonitor {
    pub fn new(token: CancellationToken) -> Self {
        Self { token }
    }

    /// The underlying token.
    pub const fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Mark the peer as disconnected.
    pub fn disconnect(&self) {
        self.token.cancel();
    }
}

impl DisconnectionMonitor for TokenMonitor {
    fn is_connected(&self) -> bool {
        !self.token.is_cancelled()
    }
}
