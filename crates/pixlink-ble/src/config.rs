//! Link configuration

use std::time::Duration;

use pixlink_core::ExchangeTiming;
use serde::{Deserialize, Serialize};

use crate::protocol::DEFAULT_DEVICE_NAME;

// ----------------------------------------------------------------------------
// Configuration
// ----------------------------------------------------------------------------

/// Configuration shared by both link roles.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// Advertised device name; matched exactly during discovery.
    pub device_name: String,
    /// Number of pixels in the matrix.
    pub matrix_size: usize,
    /// Bounded duration of one discovery scan.
    pub scan_duration: Duration,
    /// Requested scan interval. Radio timing is ultimately owned by the
    /// platform BLE stack; the value is reported at scan start.
    pub scan_interval: Duration,
    /// Requested scan window; see `scan_interval`.
    pub scan_window: Duration,
    /// Maximum time to wait for connection establishment.
    pub connection_timeout: Duration,
    /// Advertising interval for the peripheral role.
    pub advertise_interval: Duration,
    /// Delay between full exchange cycles.
    pub exchange_interval: Duration,
    /// Pacing gap between single-entry notifications.
    pub notify_gap: Duration,
    /// Delay after a failed read before the next cycle.
    pub recovery_delay: Duration,
    /// Poll cadence of the update watcher task.
    pub watcher_interval: Duration,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            device_name: DEFAULT_DEVICE_NAME.to_string(),
            matrix_size: 64,
            scan_duration: Duration::from_millis(5000),
            scan_interval: Duration::from_micros(30_000),
            scan_window: Duration::from_micros(30_000),
            connection_timeout: Duration::from_millis(2000),
            advertise_interval: Duration::from_millis(500),
            exchange_interval: Duration::from_millis(500),
            notify_gap: Duration::from_millis(10),
            recovery_delay: Duration::from_millis(500),
            watcher_interval: Duration::from_millis(100),
        }
    }
}

impl LinkConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the advertised/matched device name.
    pub fn with_device_name(mut self, name: impl Into<String>) -> Self {
        self.device_name = name.into();
        self
    }

    /// Set the matrix size.
    pub fn with_matrix_size(mut self, size: usize) -> Self {
        self.matrix_size = size;
        self
    }

    /// Set the discovery scan duration.
    pub fn with_scan_duration(mut self, duration: Duration) -> Self {
        self.scan_duration = duration;
        self
    }

    /// Set the connection timeout.
    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    /// Set the exchange cadence.
    pub fn with_exchange_interval(mut self, interval: Duration) -> Self {
        self.exchange_interval = interval;
        self
    }

    /// The exchange-loop cadence parameters.
    pub fn timing(&self) -> ExchangeTiming {
        ExchangeTiming {
            cycle_interval: self.exchange_interval,
            notify_gap: self.notify_gap,
            recovery_delay: self.recovery_delay,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_protocol() {
        let config = LinkConfig::default();
        assert_eq!(config.device_name, DEFAULT_DEVICE_NAME);
        assert_eq!(config.matrix_size, 64);
        assert_eq!(config.scan_duration, Duration::from_millis(5000));
        assert_eq!(config.connection_timeout, Duration::from_millis(2000));
    }

    #[test]
    fn builder_overrides_stick() {
        let config = LinkConfig::new()
            .with_device_name("bench-panel")
            .with_matrix_size(16)
            .with_scan_duration(Duration::from_secs(1));
        assert_eq!(config.device_name, "bench-panel");
        assert_eq!(config.matrix_size, 16);
        assert_eq!(config.scan_duration, Duration::from_secs(1));
    }

    #[test]
    fn timing_mirrors_the_cadence_fields() {
        let config = LinkConfig::new().with_exchange_interval(Duration::from_millis(250));
        let timing = config.timing();
        assert_eq!(timing.cycle_interval, Duration::from_millis(250));
        assert_eq!(timing.notify_gap, config.notify_gap);
        assert_eq!(timing.recovery_delay, config.recovery_delay);
    }
}
