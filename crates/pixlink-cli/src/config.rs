//! CLI configuration loading
//!
//! Settings come from an optional TOML file plus command-line overrides;
//! everything not mentioned falls back to protocol defaults.

use pixlink_ble::LinkConfig;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Complete configuration for the pixlink CLI application.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Link configuration shared by both roles.
    pub link: LinkConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load_from_file(path: &str) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_protocol_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [link]
            device_name = "bench-panel"
            matrix_size = 16
            "#,
        )
        .unwrap();
        assert_eq!(config.link.device_name, "bench-panel");
        assert_eq!(config.link.matrix_size, 16);
        assert_eq!(config.link.exchange_interval, LinkConfig::default().exchange_interval);
    }

    #[test]
    fn empty_input_is_all_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.link.device_name, LinkConfig::default().device_name);
    }
}
