//! Duplex exchange loops
//!
//! One loop per role, each driving a connected session until link loss on
//! a fixed cadence. Per-cycle I/O failures are contained here: a write
//! failure ends the cycle early, a read failure costs a recovery delay,
//! and only the liveness check at the cycle boundary exits the loop.

use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, info, trace, warn};

use crate::codec::PixelCodec;
use crate::frame::{apply_packet, PixelSink};
use crate::link::{InboundChannel, LinkMonitor, OutboundChannel};
use crate::pattern::FramePattern;
use crate::slot::SlotWriter;

// ----------------------------------------------------------------------------
// Timing
// ----------------------------------------------------------------------------

/// Cadence parameters for one exchange loop.
#[derive(Debug, Clone)]
pub struct ExchangeTiming {
    /// Delay between full exchange cycles.
    pub cycle_interval: Duration,
    /// Gap between single-entry notifications on the peripheral.
    pub notify_gap: Duration,
    /// Delay after a failed read before the next cycle.
    pub recovery_delay: Duration,
}

impl Default for ExchangeTiming {
    fn default() -> Self {
        Self {
            cycle_interval: Duration::from_millis(500),
            notify_gap: Duration::from_millis(10),
            recovery_delay: Duration::from_millis(500),
        }
    }
}

// ----------------------------------------------------------------------------
// Central Loop
// ----------------------------------------------------------------------------

/// Drive the central side of a connected link until loss.
///
/// Per cycle: drain the inbound channel, decode, apply to the sink with
/// clear-then-overwrite semantics, publish to the update slot, then reply
/// with the pattern's next frame.
pub async fn run_central_exchange<L, I, O, S, P>(
    link: &L,
    inbound: &mut I,
    outbound: &mut O,
    sink: &mut S,
    pattern: &mut P,
    updates: &SlotWriter,
    timing: &ExchangeTiming,
) where
    L: LinkMonitor,
    I: InboundChannel,
    O: OutboundChannel,
    S: PixelSink + ?Sized,
    P: FramePattern,
{
    info!("entering central exchange loop");
    loop {
        if !link.is_connected().await {
            info!("link lost, leaving exchange loop");
            return;
        }

        let first = match inbound.recv().await {
            Ok(payload) => payload,
            Err(err) => {
                warn!(%err, "inbound read failed");
                sleep(timing.recovery_delay).await;
                continue;
            }
        };

        // Gather the rest of a notification burst before applying, so the
        // peripheral's fragmented single-entry packets land as one frame.
        let mut entries = PixelCodec::decode(&first);
        while let Some(more) = inbound.try_recv() {
            entries.extend(PixelCodec::decode(&more));
        }

        if entries.is_empty() {
            debug!(payload = %hex::encode(&first), "empty payload, skipping");
            sleep(timing.cycle_interval).await;
            continue;
        }

        trace!(count = entries.len(), "applying received entries");
        apply_packet(sink, &entries);
        updates.publish(entries);

        let reply = pattern.next_frame();
        let encoded = PixelCodec::encode(&reply);
        match outbound.send(&encoded).await {
            Ok(()) => debug!(count = reply.len(), "sent reply"),
            Err(err) => warn!(%err, "reply write failed"),
        }

        sleep(timing.cycle_interval).await;
    }
}

// ----------------------------------------------------------------------------
// Peripheral Loop
// ----------------------------------------------------------------------------

/// Drive the peripheral side of a connected link until loss.
///
/// Per cycle: push the pattern frame as paced single-entry notifications,
/// suspend until the central writes, then decode and apply.
pub async fn run_peripheral_exchange<L, I, O, S, P>(
    link: &L,
    inbound: &mut I,
    outbound: &mut O,
    sink: &mut S,
    pattern: &mut P,
    updates: &SlotWriter,
    timing: &ExchangeTiming,
) where
    L: LinkMonitor,
    I: InboundChannel,
    O: OutboundChannel,
    S: PixelSink + ?Sized,
    P: FramePattern,
{
    info!("entering peripheral exchange loop");
    loop {
        if !link.is_connected().await {
            info!("link lost, leaving exchange loop");
            return;
        }

        // The MTU keeps per-message payloads small: one entry per
        // notification, paced so the central's queue keeps up.
        let frame = pattern.next_frame();
        for entry in &frame {
            let chunk = PixelCodec::encode(core::slice::from_ref(entry));
            if let Err(err) = outbound.send(&chunk).await {
                warn!(%err, %entry, "notify failed");
            }
            sleep(timing.notify_gap).await;
        }
        debug!(count = frame.len(), "pushed pattern frame");

        let payload = match inbound.recv().await {
            Ok(payload) => payload,
            Err(err) => {
                warn!(%err, "inbound read failed");
                sleep(timing.recovery_delay).await;
                continue;
            }
        };

        let entries = PixelCodec::decode(&payload);
        trace!(
            count = entries.len(),
            payload = %hex::encode(&payload),
            "received from central"
        );
        apply_packet(sink, &entries);
        if !entries.is_empty() {
            updates.publish(entries);
        }

        sleep(timing.cycle_interval).await;
    }
}
