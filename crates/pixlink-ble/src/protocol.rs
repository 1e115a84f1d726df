//! BLE protocol constants for the pixlink link
//!
//! Both roles agree on these identifiers at build time. Directions are
//! named from the peripheral's point of view: the peripheral pushes its
//! pattern on the TX characteristic and receives the central's reply on
//! the RX characteristic.

use uuid::Uuid;

// ----------------------------------------------------------------------------
// Service and Characteristic UUIDs
// ----------------------------------------------------------------------------

/// Pixlink GATT service UUID.
pub const LINK_SERVICE_UUID: Uuid = Uuid::from_u128(0x12345678_1234_5678_1234_56789abcdef0);

/// Peripheral→central characteristic (notify).
pub const PERIPHERAL_TX_CHARACTERISTIC_UUID: Uuid =
    Uuid::from_u128(0x12345678_1234_5678_1234_56789abcdef1);

/// Central→peripheral characteristic (write).
pub const CENTRAL_TX_CHARACTERISTIC_UUID: Uuid =
    Uuid::from_u128(0x12345678_1234_5678_1234_56789abcdef2);

/// Default advertised device name; the central matches it by exact string
/// equality.
pub const DEFAULT_DEVICE_NAME: &str = "PixlinkPanel";
