//! Bluetooth Low Energy link sessions for pixlink
//!
//! This crate connects the transport-free exchange machinery in
//! `pixlink-core` to real radios:
//!
//! - [`protocol`] - service/characteristic UUIDs and the advertised name
//! - [`config`] - link configuration shared by both roles
//! - [`error`] - BLE-specific error types
//! - [`channels`] - channel adapters bridging platform streams
//! - [`central`] - scan → connect session on `btleplug`
//! - [`peripheral`] - advertise → accept session on `bluer` (Linux)
//!
//! ## Roles
//!
//! The central runs one bounded discovery scan per attempt and matches the
//! peripheral's advertised name exactly; discovery timeout is its only
//! terminal failure. The peripheral advertises until a central subscribes
//! and is designed to re-advertise after every link loss, forever. Both
//! hand the exchange loop a monitor plus inbound/outbound endpoints
//! implementing the `pixlink-core` channel traits.

// ----------------------------------------------------------------------------
// Module Declarations
// ----------------------------------------------------------------------------

pub mod central;
pub mod channels;
pub mod config;
pub mod error;
#[cfg(target_os = "linux")]
pub mod peripheral;
pub mod protocol;

// ----------------------------------------------------------------------------
// Public API
// ----------------------------------------------------------------------------

pub use central::{CentralLink, CentralMonitor, CentralSession, CharacteristicOutbound};
pub use channels::BridgedInbound;
pub use config::LinkConfig;
pub use error::BleLinkError;
#[cfg(target_os = "linux")]
pub use peripheral::{NotifyOutbound, PeripheralLink, PeripheralSession, SubscriptionMonitor};
pub use protocol::{
    CENTRAL_TX_CHARACTERISTIC_UUID, DEFAULT_DEVICE_NAME, LINK_SERVICE_UUID,
    PERIPHERAL_TX_CHARACTERISTIC_UUID,
};

// Re-export the core traits the channel endpoints implement.
pub use pixlink_core::{InboundChannel, LinkMonitor, OutboundChannel};
