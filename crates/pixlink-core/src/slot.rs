//! Shared update slot
//!
//! A capacity-one, overwrite-on-full cell connecting the exchange loop to
//! the optional watcher task. The writer/reader split is the ownership
//! contract: `UpdateSlot::new` hands out exactly one non-`Clone` handle per
//! side, so single-producer/single-consumer holds by construction rather
//! than by convention.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::types::Entry;

type Shared = Arc<Mutex<Option<Vec<Entry>>>>;

fn guard(shared: &Shared) -> MutexGuard<'_, Option<Vec<Entry>>> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Factory for the writer/reader handle pair.
pub struct UpdateSlot;

impl UpdateSlot {
    /// Create an empty slot and split it into its two handles.
    pub fn new() -> (SlotWriter, SlotReader) {
        let shared: Shared = Arc::new(Mutex::new(None));
        (
            SlotWriter {
                shared: shared.clone(),
            },
            SlotReader { shared },
        )
    }
}

/// Producer handle; held by the exchange loop.
#[derive(Debug)]
pub struct SlotWriter {
    shared: Shared,
}

impl SlotWriter {
    /// Publish a freshly decoded packet, replacing any unconsumed one.
    pub fn publish(&self, packet: Vec<Entry>) {
        *guard(&self.shared) = Some(packet);
    }
}

/// Consumer handle; held by the watcher task.
#[derive(Debug)]
pub struct SlotReader {
    shared: Shared,
}

impl SlotReader {
    /// Consume the pending packet, leaving the slot empty.
    ///
    /// Read-then-clear in one atomic step; a packet published while the
    /// reader is between polls is never lost, only superseded.
    pub fn take(&self) -> Option<Vec<Entry>> {
        guard(&self.shared).take()
    }

    /// Whether nothing is pending.
    pub fn is_empty(&self) -> bool {
        guard(&self.shared).is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Entry, Rgb};

    fn packet(idx: u8) -> Vec<Entry> {
        vec![Entry::new(idx, Rgb::new(1, 2, 3))]
    }

    #[test]
    fn take_consumes_exactly_once() {
        let (writer, reader) = UpdateSlot::new();
        writer.publish(packet(5));
        assert_eq!(reader.take(), Some(packet(5)));
        assert_eq!(reader.take(), None);
        assert!(reader.is_empty());
    }

    #[test]
    fn second_publish_overwrites_unconsumed_packet() {
        let (writer, reader) = UpdateSlot::new();
        writer.publish(packet(1));
        writer.publish(packet(2));
        assert_eq!(reader.take(), Some(packet(2)));
        assert_eq!(reader.take(), None);
    }
}
