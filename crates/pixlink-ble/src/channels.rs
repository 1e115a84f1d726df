//! Channel adapters shared by both roles

use async_trait::async_trait;
use pixlink_core::{InboundChannel, LinkError};
use tokio::sync::mpsc;

/// Inbound payloads bridged from a platform event stream into an mpsc
/// queue by a background task.
///
/// Both roles use this shape: the central bridges its notification stream,
/// the peripheral bridges GATT write events. When the bridge task ends the
/// queue closes and `recv` reports the link as lost.
pub struct BridgedInbound {
    payloads: mpsc::UnboundedReceiver<Vec<u8>>,
}

impl BridgedInbound {
    pub(crate) fn new(payloads: mpsc::UnboundedReceiver<Vec<u8>>) -> Self {
        Self { payloads }
    }
}

#[async_trait]
impl InboundChannel for BridgedInbound {
    async fn recv(&mut self) -> pixlink_core::Result<Vec<u8>> {
        self.payloads.recv().await.ok_or(LinkError::ConnectionLost)
    }

    fn try_recv(&mut self) -> Option<Vec<u8>> {
        self.payloads.try_recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn drains_queued_payloads_without_blocking() {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut inbound = BridgedInbound::new(rx);
        tx.send(vec![1, 2, 3, 4]).unwrap();
        tx.send(vec![5, 6, 7, 8]).unwrap();

        assert_eq!(inbound.recv().await.unwrap(), vec![1, 2, 3, 4]);
        assert_eq!(inbound.try_recv(), Some(vec![5, 6, 7, 8]));
        assert_eq!(inbound.try_recv(), None);
    }

    #[tokio::test]
    async fn closed_bridge_reports_link_loss() {
        let (tx, rx) = mpsc::unbounded_channel::<Vec<u8>>();
        let mut inbound = BridgedInbound::new(rx);
        drop(tx);
        assert!(matches!(
            inbound.recv().await,
            Err(LinkError::ConnectionLost)
        ));
    }
}
