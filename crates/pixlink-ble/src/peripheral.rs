//! Peripheral link session: advertise, accept, serve
//!
//! The peripheral registers the pixlink GATT service with BlueZ, starts
//! advertising, and suspends until a central subscribes to the notify
//! characteristic; that subscription is the connection signal. Writes
//! from the central arrive over a characteristic I/O socket and are
//! bridged into the inbound queue; the notify socket is the outbound push
//! endpoint. BlueZ is Linux-only, so this module is too; the CLI reports
//! the limitation on other platforms.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use bluer::adv::Advertisement;
use bluer::gatt::local::{
    characteristic_control, Application, ApplicationHandle, Characteristic,
    CharacteristicControl, CharacteristicControlEvent, CharacteristicNotify,
    CharacteristicNotifyMethod, CharacteristicWrite, CharacteristicWriteMethod, Service,
};
use bluer::gatt::{CharacteristicReader, CharacteristicWriter};
use futures::StreamExt;
use pixlink_core::{ConnectionState, LinkError, LinkMonitor, OutboundChannel, Result};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::channels::BridgedInbound;
use crate::config::LinkConfig;
use crate::error::BleLinkError;
use crate::protocol::{
    CENTRAL_TX_CHARACTERISTIC_UUID, LINK_SERVICE_UUID, PERIPHERAL_TX_CHARACTERISTIC_UUID,
};

// ----------------------------------------------------------------------------
// Session
// ----------------------------------------------------------------------------

/// Peripheral-role connection state machine.
///
/// Never terminal: after link loss the caller advertises again, forever.
pub struct PeripheralSession {
    config: LinkConfig,
    _session: bluer::Session,
    adapter: bluer::Adapter,
    state: ConnectionState,
}

impl PeripheralSession {
    /// Initialize the default BlueZ adapter, powering it on if needed.
    pub async fn new(config: LinkConfig) -> Result<Self> {
        let session = bluer::Session::new()
            .await
            .map_err(|err| BleLinkError::AdapterUnusable(err.to_string()))?;
        let adapter = session
            .default_adapter()
            .await
            .map_err(|err| BleLinkError::AdapterUnusable(err.to_string()))?;
        if !adapter.is_powered().await.unwrap_or(false) {
            adapter
                .set_powered(true)
                .await
                .map_err(|err| BleLinkError::AdapterUnusable(err.to_string()))?;
        }
        info!(adapter = %adapter.name(), "BLE adapter ready for advertising");
        Ok(Self {
            config,
            _session: session,
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
        debug!(from = %self.state, to = %next, "peripheral session state");
        self.state = next;
    }

    /// Register the GATT service, advertise, and suspend until a central
    /// connects. Each call serves a fresh registration; dropping the
    /// returned link tears it down again.
    pub async fn advertise(&mut self) -> Result<PeripheralLink> {
        self.set_state(ConnectionState::Discovering);

        let (notify_control, notify_handle) = characteristic_control();
        let (write_control, write_handle) = characteristic_control();

        let app = Application {
            services: vec![Service {
                uuid: LINK_SERVICE_UUID,
                primary: true,
                characteristics: vec![
                    Characteristic {
                        uuid: PERIPHERAL_TX_CHARACTERISTIC_UUID,
                        notify: Some(CharacteristicNotify {
                            notify: true,
                            method: CharacteristicNotifyMethod::Io,
                            ..Default::default()
                        }),
                        control_handle: notify_handle,
                        ..Default::default()
                    },
                    Characteristic {
                        uuid: CENTRAL_TX_CHARACTERISTIC_UUID,
                        write: Some(CharacteristicWrite {
                            write: true,
                            write_without_response: true,
                            method: CharacteristicWriteMethod::Io,
                            ..Default::default()
                        }),
                        control_handle: write_handle,
                        ..Default::default()
                    },
                ],
                ..Default::default()
            }],
            ..Default::default()
        };
        let gatt_handle = self
            .adapter
            .serve_gatt_application(app)
            .await
            .map_err(|err| BleLinkError::GattRegistrationFailed(err.to_string()))?;

        let advertisement = Advertisement {
            advertisement_type: bluer::adv::Type::Peripheral,
            service_uuids: [LINK_SERVICE_UUID].into_iter().collect(),
            local_name: Some(self.config.device_name.clone()),
            min_interval: Some(self.config.advertise_interval),
            max_interval: Some(self.config.advertise_interval),
            discoverable: Some(true),
            ..Default::default()
        };
        let adv_handle = self
            .adapter
            .advertise(advertisement)
            .await
            .map_err(|err| BleLinkError::AdvertisingFailed(err.to_string()))?;
        info!(name = %self.config.device_name, "advertising, waiting for a central");

        // The central enabling notifications is the connection signal.
        tokio::pin!(notify_control);
        let notifier = loop {
            match notify_control.next().await {
                Some(CharacteristicControlEvent::Notify(writer)) => break writer,
                Some(CharacteristicControlEvent::Write(_)) => {}
                None => {
                    return Err(BleLinkError::GattRegistrationFailed(
                        "characteristic control closed".into(),
                    )
                    .into())
                }
            }
        };
        info!(mtu = notifier.mtu(), "central subscribed");

        // One central per link; advertising restarts with the next call.
        drop(adv_handle);

        let connected = Arc::new(AtomicBool::new(true));
        let (payload_tx, payload_rx) = mpsc::unbounded_channel();
        tokio::spawn(run_write_bridge(
            write_control,
            payload_tx,
            connected.clone(),
        ));

        self.set_state(ConnectionState::Connected);
        Ok(PeripheralLink {
            monitor: SubscriptionMonitor {
                connected: connected.clone(),
            },
            inbound: BridgedInbound::new(payload_rx),
            outbound: NotifyOutbound {
                writer: notifier,
                connected,
            },
            _gatt: gatt_handle,
        })
    }
}

// ----------------------------------------------------------------------------
// Write Bridge
// ----------------------------------------------------------------------------

/// Forward central writes from the characteristic I/O socket into the
/// inbound queue. Socket end-of-stream means the central went away.
async fn run_write_bridge(
    write_control: CharacteristicControl,
    payload_tx: mpsc::UnboundedSender<Vec<u8>>,
    connected: Arc<AtomicBool>,
) {
    tokio::pin!(write_control);
    let mut reader: Option<CharacteristicReader> = None;
    let mut buf: Vec<u8> = Vec::new();
    loop {
        tokio::select! {
            event = write_control.next() => match event {
                Some(CharacteristicControlEvent::Write(request)) => {
                    debug!(mtu = request.mtu(), "central opened write channel");
                    buf = vec![0u8; request.mtu()];
                    match request.accept() {
                        Ok(accepted) => reader = Some(accepted),
                        Err(err) => debug!(%err, "failed to accept write request"),
                    }
                }
                Some(CharacteristicControlEvent::Notify(_)) => {}
                None => break,
            },
            payload = recv_payload(&mut reader, &mut buf) => match payload {
                Some(payload) => {
                    if payload_tx.send(payload).is_err() {
                        break;
                    }
                }
                None => break,
            },
        }
    }
    connected.store(false, Ordering::SeqCst);
    debug!("write bridge ended");
}

/// One message from the write socket, or `None` on end-of-stream/error.
/// Pends forever until the central has opened the socket.
async fn recv_payload(reader: &mut Option<CharacteristicReader>, buf: &mut Vec<u8>) -> Option<Vec<u8>> {
    match reader.as_mut() {
        Some(reader) => match reader.read(buf.as_mut_slice()).await {
            Ok(0) => None,
            Ok(n) => Some(buf[..n].to_vec()),
            Err(err) => {
                debug!(%err, "characteristic read failed");
                None
            }
        },
        None => std::future::pending().await,
    }
}

// ----------------------------------------------------------------------------
// Channel Endpoints
// ----------------------------------------------------------------------------

/// A live peripheral-side link. Dropping it unregisters the GATT service.
pub struct PeripheralLink {
    pub monitor: SubscriptionMonitor,
    pub inbound: BridgedInbound,
    pub outbound: NotifyOutbound,
    _gatt: ApplicationHandle,
}

/// Liveness probe fed by the bridge task and the notify socket.
pub struct SubscriptionMonitor {
    connected: Arc<AtomicBool>,
}

#[async_trait]
impl LinkMonitor for SubscriptionMonitor {
    async fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}

/// Push sink for the peripheral→central notify characteristic.
pub struct NotifyOutbound {
    writer: CharacteristicWriter,
    connected: Arc<AtomicBool>,
}

#[async_trait]
impl OutboundChannel for NotifyOutbound {
    async fn send(&mut self, payload: &[u8]) -> Result<()> {
        match self.writer.write_all(payload).await {
            Ok(()) => Ok(()),
            Err(err) => {
                self.connected.store(false, Ordering::SeqCst);
                Err(LinkError::WriteFailed(err.to_string()))
            }
        }
    }
}
