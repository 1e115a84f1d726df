//! Error types for the BLE link

use pixlink_core::LinkError;
use thiserror::Error;
use uuid::Uuid;

// ----------------------------------------------------------------------------
// Error Types
// ----------------------------------------------------------------------------

/// Errors specific to the BLE transport layer.
#[derive(Error, Debug)]
pub enum BleLinkError {
    #[error("no BLE adapter available")]
    AdapterNotAvailable,

    #[error("BLE adapter unusable: {0}")]
    AdapterUnusable(String),

    #[error("failed to start scan: {0}")]
    ScanFailed(String),

    #[error("characteristic not found: {uuid}")]
    CharacteristicNotFound { uuid: Uuid },

    #[error("failed to discover services: {0}")]
    ServiceDiscoveryFailed(String),

    #[error("failed to subscribe to notifications: {0}")]
    SubscriptionFailed(String),

    #[error("GATT service registration failed: {0}")]
    GattRegistrationFailed(String),

    #[error("failed to start advertising: {0}")]
    AdvertisingFailed(String),

    #[error(transparent)]
    Backend(#[from] btleplug::Error),
}

impl From<BleLinkError> for LinkError {
    fn from(err: BleLinkError) -> Self {
        match err {
            BleLinkError::CharacteristicNotFound { .. }
            | BleLinkError::ServiceDiscoveryFailed(_)
            | BleLinkError::SubscriptionFailed(_) => LinkError::ConnectionFailed(err.to_string()),
            _ => LinkError::TransportUnavailable(err.to_string()),
        }
    }
}
