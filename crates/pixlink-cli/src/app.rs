//! Role supervision
//!
//! Session-layer policy ends here: the central treats a discovery timeout
//! as terminal and rediscovers after any other failure or link loss; the
//! peripheral loops back to advertising unconditionally. Both roles run a
//! startup display self-check and share one watcher task reacting to
//! freshly received packets outside the exchange cadence.

use std::time::Duration;

use pixlink_ble::{CentralLink, CentralSession};
use pixlink_core::{
    display_self_check, run_central_exchange, run_watcher, LinkError, MatrixFrame, StaticReply,
    UpdateSlot,
};
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::error::Result;

const SELF_CHECK_HOLD: Duration = Duration::from_millis(500);

/// Width of the peripheral's rotating pattern window.
#[cfg(target_os = "linux")]
const PATTERN_WINDOW: usize = 8;

// ----------------------------------------------------------------------------
// Central
// ----------------------------------------------------------------------------

pub async fn run_central(config: AppConfig) -> Result<()> {
    let link_config = config.link;
    let timing = link_config.timing();

    let mut sink = MatrixFrame::new(link_config.matrix_size);
    display_self_check(&mut sink, SELF_CHECK_HOLD).await;

    let (updates, update_reader) = UpdateSlot::new();
    tokio::spawn(run_watcher(
        update_reader,
        link_config.watcher_interval,
        |packet| info!(entries = packet.len(), "new data from peripheral"),
    ));

    let mut pattern = StaticReply::default();
    let mut session = CentralSession::new(link_config).await?;
    loop {
        let link = match session.acquire().await {
            Ok(link) => link,
            Err(err @ LinkError::DiscoveryTimeout { .. }) => {
                // The only terminal outcome for the central role.
                return Err(err.into());
            }
            Err(err) => {
                warn!(%err, "connection attempt failed, rediscovering");
                continue;
            }
        };

        let CentralLink {
            monitor,
            mut inbound,
            mut outbound,
        } = link;
        run_central_exchange(
            &monitor,
            &mut inbound,
            &mut outbound,
            &mut sink,
            &mut pattern,
            &updates,
            &timing,
        )
        .await;
        session.mark_disconnected();
        warn!("link lost, restarting discovery");
    }
}

// ----------------------------------------------------------------------------
// Peripheral
// ----------------------------------------------------------------------------

#[cfg(target_os = "linux")]
pub async fn run_peripheral(config: AppConfig) -> Result<()> {
    use pixlink_ble::PeripheralSession;
    use pixlink_core::{run_peripheral_exchange, RotatingWindow};

    let link_config = config.link;
    let timing = link_config.timing();

    let mut sink = MatrixFrame::new(link_config.matrix_size);
    display_self_check(&mut sink, SELF_CHECK_HOLD).await;

    let (updates, update_reader) = UpdateSlot::new();
    tokio::spawn(run_watcher(
        update_reader,
        link_config.watcher_interval,
        |packet| info!(entries = packet.len(), "new data from central"),
    ));

    let mut pattern = RotatingWindow::new(link_config.matrix_size, PATTERN_WINDOW);
    let retry_delay = link_config.recovery_delay;
    let mut session = PeripheralSession::new(link_config).await?;
    loop {
        let mut link = match session.advertise().await {
            Ok(link) => link,
            Err(err) => {
                warn!(%err, "advertising failed, retrying");
                tokio::time::sleep(retry_delay).await;
                continue;
            }
        };

        run_peripheral_exchange(
            &link.monitor,
            &mut link.inbound,
            &mut link.outbound,
            &mut sink,
            &mut pattern,
            &updates,
            &timing,
        )
        .await;
        session.mark_disconnected();
        warn!("link lost, advertising again");
    }
}

#[cfg(not(target_os = "linux"))]
pub async fn run_peripheral(_config: AppConfig) -> Result<()> {
    Err(crate::error::CliError::Config(
        "the peripheral role requires BlueZ and is only available on Linux".into(),
    ))
}
