//! Central link session: scan, match, connect
//!
//! The central runs one bounded discovery scan per acquisition attempt,
//! matches the configured device name exactly, connects with a bounded
//! timeout, and hands the exchange loop a pair of channel endpoints plus a
//! liveness monitor. Discovery is one-shot: a fresh scan is started for
//! every attempt.

use std::time::Duration;

use async_trait::async_trait;
use btleplug::api::{
    Central, CentralEvent, Characteristic, Manager as _, Peripheral as _, ScanFilter, WriteType,
};
use btleplug::platform::{Adapter, Manager, Peripheral};
use futures::{Stream, StreamExt};
use pixlink_core::{ConnectionState, LinkError, LinkMonitor, OutboundChannel, Result};
use tokio::sync::mpsc;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::channels::BridgedInbound;
use crate::config::LinkConfig;
use crate::error::BleLinkError;
use crate::protocol::{
    CENTRAL_TX_CHARACTERISTIC_UUID, LINK_SERVICE_UUID, PERIPHERAL_TX_CHARACTERISTIC_UUID,
};

// ----------------------------------------------------------------------------
// Session
// ----------------------------------------------------------------------------

/// Central-role connection state machine.
pub struct CentralSession {
    config: LinkConfig,
    adapter: Adapter,
    state: ConnectionState,
}

impl CentralSession {
    /// Initialize the first available BLE adapter.
    pub async fn new(config: LinkConfig) -> Result<Self> {
        let manager = Manager::new().await.map_err(BleLinkError::from)?;
        let adapters = manager.adapters().await.map_err(BleLinkError::from)?;
        let adapter = adapters
            .into_iter()
            .next()
            .ok_or(BleLinkError::AdapterNotAvailable)?;
        info!("BLE adapter initialized");
        Ok(Self {
            config,
            adapter,
            state: ConnectionState::Idle,
        })
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Record link loss observed by the exchange loop.
    pub fn mark_disconnected(&mut self) {
        self.set_state(ConnectionState::Disconnected);
    }

    fn set_state(&mut self, next: ConnectionState) {
        debug!(from = %self.state, to = %next, "central session state");
        self.state = next;
    }

    /// Run one full discovery + connection attempt.
    pub async fn acquire(&mut self) -> Result<CentralLink> {
        let peripheral = self.discover().await?;
        self.connect(peripheral).await
    }

    /// Scan until the target name appears or the window elapses.
    async fn discover(&mut self) -> Result<Peripheral> {
        self.set_state(ConnectionState::Discovering);

        let events = self.adapter.events().await.map_err(BleLinkError::from)?;
        let filter = ScanFilter {
            services: vec![LINK_SERVICE_UUID],
        };
        self.adapter
            .start_scan(filter)
            .await
            .map_err(|err| BleLinkError::ScanFailed(err.to_string()))?;
        debug!(
            duration_ms = self.config.scan_duration.as_millis() as u64,
            interval_us = self.config.scan_interval.as_micros() as u64,
            window_us = self.config.scan_window.as_micros() as u64,
            "scan started"
        );

        let adapter = self.adapter.clone();
        let candidates = events.filter_map(|event| {
            let adapter = adapter.clone();
            async move {
                let id = match event {
                    CentralEvent::DeviceDiscovered(id) | CentralEvent::DeviceUpdated(id) => id,
                    _ => return None,
                };
                let peripheral = adapter.peripheral(&id).await.ok()?;
                let name = peripheral.properties().await.ok()??.local_name?;
                Some((name, peripheral))
            }
        });
        let candidates = Box::pin(candidates);

        let target = self.config.device_name.clone();
        let found = first_match(candidates, self.config.scan_duration, |(name, _)| {
            *name == target
        })
        .await;

        if let Err(err) = self.adapter.stop_scan().await {
            debug!(%err, "failed to stop scan");
        }

        match found {
            Some((name, peripheral)) => {
                info!(%name, "matched advertised peripheral");
                Ok(peripheral)
            }
            None => {
                self.set_state(ConnectionState::DiscoveryFailed);
                warn!(%target, "discovery window elapsed without a match");
                Err(LinkError::DiscoveryTimeout { target })
            }
        }
    }

    /// Connect to a discovered peripheral and set up the exchange channels.
    async fn connect(&mut self, peripheral: Peripheral) -> Result<CentralLink> {
        self.set_state(ConnectionState::Connecting);

        match timeout(self.config.connection_timeout, peripheral.connect()).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                self.set_state(ConnectionState::Idle);
                return Err(LinkError::ConnectionFailed(err.to_string()));
            }
            Err(_) => {
                self.set_state(ConnectionState::Idle);
                return Err(LinkError::ConnectionTimeout);
            }
        }

        peripheral
            .discover_services()
            .await
            .map_err(|err| BleLinkError::ServiceDiscoveryFailed(err.to_string()))?;

        let characteristics = peripheral.characteristics();
        let inbound_char = characteristics
            .iter()
            .find(|c| c.uuid == PERIPHERAL_TX_CHARACTERISTIC_UUID)
            .cloned()
            .ok_or(BleLinkError::CharacteristicNotFound {
                uuid: PERIPHERAL_TX_CHARACTERISTIC_UUID,
            })?;
        let outbound_char = characteristics
            .iter()
            .find(|c| c.uuid == CENTRAL_TX_CHARACTERISTIC_UUID)
            .cloned()
            .ok_or(BleLinkError::CharacteristicNotFound {
                uuid: CENTRAL_TX_CHARACTERISTIC_UUID,
            })?;

        peripheral
            .subscribe(&inbound_char)
            .await
            .map_err(|err| BleLinkError::SubscriptionFailed(err.to_string()))?;
        let mut notifications = peripheral
            .notifications()
            .await
            .map_err(|err| BleLinkError::SubscriptionFailed(err.to_string()))?;

        // Bridge notifications into a queue the exchange loop can drain;
        // the queue closing doubles as the link-loss signal.
        let (payload_tx, payload_rx) = mpsc::unbounded_channel();
        tokio::spawn(async move {
            while let Some(notification) = notifications.next().await {
                if notification.uuid != PERIPHERAL_TX_CHARACTERISTIC_UUID {
                    continue;
                }
                if payload_tx.send(notification.value).is_err() {
                    break;
                }
            }
            debug!("notification bridge ended");
        });

        self.set_state(ConnectionState::Connected);
        info!("connected to peripheral");
        Ok(CentralLink {
            monitor: CentralMonitor {
                peripheral: peripheral.clone(),
            },
            inbound: BridgedInbound::new(payload_rx),
            outbound: CharacteristicOutbound {
                peripheral,
                characteristic: outbound_char,
            },
        })
    }
}

/// First stream item satisfying `matches`, or `None` once `window`
/// elapses. The stream is consumed lazily and abandoned on the first hit.
async fn first_match<S, T, F>(mut events: S, window: Duration, mut matches: F) -> Option<T>
where
    S: Stream<Item = T> + Unpin,
    F: FnMut(&T) -> bool,
{
    let scan = async {
        while let Some(item) = events.next().await {
            if matches(&item) {
                return Some(item);
            }
        }
        None
    };
    timeout(window, scan).await.unwrap_or(None)
}

// ----------------------------------------------------------------------------
// Channel Endpoints
// ----------------------------------------------------------------------------

/// A live central-side link: liveness monitor plus the two channel
/// endpoints consumed by the exchange loop.
pub struct CentralLink {
    pub monitor: CentralMonitor,
    pub inbound: BridgedInbound,
    pub outbound: CharacteristicOutbound,
}

/// Liveness probe backed by the platform connection state.
pub struct CentralMonitor {
    peripheral: Peripheral,
}

#[async_trait]
impl LinkMonitor for CentralMonitor {
    async fn is_connected(&self) -> bool {
        self.peripheral.is_connected().await.unwrap_or(false)
    }
}

/// Write sink for the central→peripheral characteristic.
pub struct CharacteristicOutbound {
    peripheral: Peripheral,
    characteristic: Characteristic,
}

#[async_trait]
impl OutboundChannel for CharacteristicOutbound {
    async fn send(&mut self, payload: &[u8]) -> Result<()> {
        self.peripheral
            .write(&self.characteristic, payload, WriteType::WithoutResponse)
            .await
            .map_err(|err| LinkError::WriteFailed(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    #[tokio::test(start_paused = true)]
    async fn window_elapses_when_no_advertisement_matches() {
        // No matching advertisement ever arrives; the window must bound
        // the wait and no connection attempt follows a None result.
        let events = stream::pending::<(String, u8)>();
        let found = first_match(events, Duration::from_millis(5000), |_| true).await;
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn first_matching_name_short_circuits_the_scan() {
        let events = stream::iter([
            ("SomeOtherDevice".to_string(), 1u8),
            ("PixlinkPanel".to_string(), 2),
            ("PixlinkPanel".to_string(), 3),
        ]);
        let found = first_match(events, Duration::from_secs(5), |(name, _)| {
            name == "PixlinkPanel"
        })
        .await;
        assert_eq!(found, Some(("PixlinkPanel".to_string(), 2)));
    }

    #[tokio::test]
    async fn exact_equality_rejects_prefixed_names() {
        let events = stream::iter([("PixlinkPanel2".to_string(), 1u8)]);
        let found = first_match(events, Duration::from_millis(10), |(name, _)| {
            name == "PixlinkPanel"
        })
        .await;
        assert!(found.is_none());
    }
}
