//! Update watcher task
//!
//! Polls the shared slot on its own short cadence, decoupling "react to
//! new data" from the exchange loop's link cadence. The poll here is a
//! genuine pacing requirement; inbound link data itself is event-driven.

use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};

use crate::slot::SlotReader;
use crate::types::Entry;

/// Run the watcher until the task is dropped.
///
/// Each pending packet is consumed exactly once and handed to `on_update`;
/// empty polls are no-ops.
pub async fn run_watcher<F>(reader: SlotReader, poll_interval: Duration, mut on_update: F)
where
    F: FnMut(Vec<Entry>),
{
    let mut ticker = interval(poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        if let Some(packet) = reader.take() {
            tracing::debug!(entries = packet.len(), "watcher consumed update");
            on_update(packet);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::slot::UpdateSlot;
    use crate::types::{Entry, Rgb};

    #[tokio::test(start_paused = true)]
    async fn watcher_consumes_each_publish_once() {
        let (writer, reader) = UpdateSlot::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let task = tokio::spawn(run_watcher(
            reader,
            Duration::from_millis(100),
            move |packet| sink.lock().unwrap().push(packet),
        ));

        writer.publish(vec![Entry::new(1, Rgb::new(4, 5, 6))]);
        tokio::time::sleep(Duration::from_millis(350)).await;

        let consumed = seen.lock().unwrap().clone();
        assert_eq!(consumed, vec![vec![Entry::new(1, Rgb::new(4, 5, 6))]]);
        task.abort();
    }
}
