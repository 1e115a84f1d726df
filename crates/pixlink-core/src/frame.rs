//! Pixel sink abstraction and the in-memory matrix frame
//!
//! `PixelSink` is the seam between the exchange loop and whatever drives
//! the physical LEDs; `MatrixFrame` is the stock implementation, holding a
//! staged buffer plus the last committed frame so callers can observe what
//! a display would actually be showing.

use std::time::Duration;

use crate::types::{Entry, Rgb};

// ----------------------------------------------------------------------------
// Sink Contract
// ----------------------------------------------------------------------------

/// Staged pixel output.
///
/// `clear` resets every staged slot to off, `set` stages one pixel, and
/// `commit` flushes the staged state to the display. The exchange loop
/// always clears before applying a packet and commits once per cycle.
pub trait PixelSink {
    /// Number of pixel slots.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reset all staged slots to the off state.
    fn clear(&mut self);

    /// Stage one pixel. `idx` is guaranteed in-range by the caller.
    fn set(&mut self, idx: usize, color: Rgb);

    /// Flush staged state to the display.
    fn commit(&mut self);
}

// ----------------------------------------------------------------------------
// In-memory Frame
// ----------------------------------------------------------------------------

/// In-memory matrix frame with staged/committed double buffering.
#[derive(Debug, Clone)]
pub struct MatrixFrame {
    staged: Vec<Rgb>,
    committed: Vec<Rgb>,
}

impl MatrixFrame {
    /// Create a frame with `size` pixels, all off.
    pub fn new(size: usize) -> Self {
        Self {
            staged: vec![Rgb::OFF; size],
            committed: vec![Rgb::OFF; size],
        }
    }

    /// The last committed frame.
    pub fn pixels(&self) -> &[Rgb] {
        &self.committed
    }

    /// One committed pixel, if in range.
    pub fn pixel(&self, idx: usize) -> Option<Rgb> {
        self.committed.get(idx).copied()
    }
}

impl PixelSink for MatrixFrame {
    fn len(&self) -> usize {
        self.staged.len()
    }

    fn clear(&mut self) {
        self.staged.fill(Rgb::OFF);
    }

    fn set(&mut self, idx: usize, color: Rgb) {
        self.staged[idx] = color;
    }

    fn commit(&mut self) {
        self.committed.copy_from_slice(&self.staged);
    }
}

// ----------------------------------------------------------------------------
// Packet Application
// ----------------------------------------------------------------------------

/// Apply one decoded packet with clear-then-overwrite semantics.
///
/// The whole matrix is reset first, so indices absent from the packet go
/// dark. Entries whose index falls outside the sink are dropped silently;
/// they do not fail the packet. The sink is committed exactly once.
pub fn apply_packet<S: PixelSink + ?Sized>(sink: &mut S, entries: &[Entry]) {
    sink.clear();
    let size = sink.len();
    let mut dropped = 0usize;
    for entry in entries {
        let idx = usize::from(entry.idx);
        if idx < size {
            sink.set(idx, entry.color);
        } else {
            dropped += 1;
        }
    }
    if dropped > 0 {
        tracing::debug!(dropped, "dropped out-of-range entries");
    }
    sink.commit();
}

/// Brief startup self-check: light pixel 0, hold, then blank again.
pub async fn display_self_check<S: PixelSink + ?Sized>(sink: &mut S, hold: Duration) {
    if sink.is_empty() {
        return;
    }
    sink.clear();
    sink.set(0, Rgb::new(100, 100, 100));
    sink.commit();
    tokio::time::sleep(hold).await;
    sink.clear();
    sink.commit();
    tokio::time::sleep(hold).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commit_is_what_the_display_sees() {
        let mut frame = MatrixFrame::new(4);
        frame.set(1, Rgb::new(9, 9, 9));
        assert_eq!(frame.pixel(1), Some(Rgb::OFF));
        frame.commit();
        assert_eq!(frame.pixel(1), Some(Rgb::new(9, 9, 9)));
    }

    #[test]
    fn apply_clears_absent_indices() {
        let mut frame = MatrixFrame::new(8);
        apply_packet(&mut frame, &[Entry::new(3, Rgb::new(1, 1, 1))]);
        apply_packet(&mut frame, &[Entry::new(5, Rgb::new(2, 2, 2))]);
        assert_eq!(frame.pixel(3), Some(Rgb::OFF));
        assert_eq!(frame.pixel(5), Some(Rgb::new(2, 2, 2)));
    }

    #[test]
    fn apply_drops_out_of_range_silently() {
        let mut frame = MatrixFrame::new(8);
        apply_packet(
            &mut frame,
            &[
                Entry::new(200, Rgb::new(7, 7, 7)),
                Entry::new(2, Rgb::new(3, 3, 3)),
            ],
        );
        assert_eq!(frame.pixel(2), Some(Rgb::new(3, 3, 3)));
        assert!(frame.pixels().iter().filter(|c| !c.is_off()).count() == 1);
    }

    #[test]
    fn last_write_to_an_index_wins() {
        let mut frame = MatrixFrame::new(4);
        apply_packet(
            &mut frame,
            &[
                Entry::new(0, Rgb::new(1, 0, 0)),
                Entry::new(0, Rgb::new(0, 1, 0)),
            ],
        );
        assert_eq!(frame.pixel(0), Some(Rgb::new(0, 1, 0)));
    }
}
