//! Outbound frame patterns
//!
//! Each role emits an application-defined pattern every exchange cycle.
//! The trait keeps the exchange loop ignorant of what is being drawn.

use smallvec::SmallVec;

use crate::types::{Entry, Rgb};

/// One cycle's worth of outbound entries.
pub type Frame = SmallVec<[Entry; 8]>;

/// Produces the outbound entry sequence for each exchange cycle.
pub trait FramePattern {
    fn next_frame(&mut self) -> Frame;
}

// ----------------------------------------------------------------------------
// Static Reply
// ----------------------------------------------------------------------------

/// A fixed set of entries, emitted unchanged every cycle.
///
/// The default is the central's reply pattern: every other pixel of the
/// first row at a dim white.
#[derive(Debug, Clone)]
pub struct StaticReply {
    entries: Frame,
}

impl StaticReply {
    pub fn new(entries: impl IntoIterator<Item = Entry>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }
}

impl Default for StaticReply {
    fn default() -> Self {
        let dim = Rgb::new(100, 100, 100);
        Self::new([0u8, 2, 4, 6].into_iter().map(|idx| Entry::new(idx, dim)))
    }
}

impl FramePattern for StaticReply {
    fn next_frame(&mut self) -> Frame {
        self.entries.clone()
    }
}

// ----------------------------------------------------------------------------
// Rotating Window
// ----------------------------------------------------------------------------

/// A window of consecutive indices that walks around the matrix, shifting
/// hue as it goes. The peripheral's default pattern.
#[derive(Debug, Clone)]
pub struct RotatingWindow {
    matrix_size: usize,
    window: usize,
    count: u16,
}

impl RotatingWindow {
    pub fn new(matrix_size: usize, window: usize) -> Self {
        Self {
            matrix_size: matrix_size.max(1),
            window,
            count: 0,
        }
    }
}

impl FramePattern for RotatingWindow {
    fn next_frame(&mut self) -> Frame {
        let shade = Rgb::clamped(i32::from(self.count) * 10, 100, 100);
        let start = usize::from(self.count);
        let frame = (0..self.window)
            .map(|i| Entry::masked((start + i) % self.matrix_size, shade))
            .collect();
        self.count = (self.count + 1) & 0x7FFF;
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_reply_repeats() {
        let mut pattern = StaticReply::default();
        let first = pattern.next_frame();
        assert_eq!(first.len(), 4);
        assert_eq!(first[1].idx, 2);
        assert_eq!(pattern.next_frame(), first);
    }

    #[test]
    fn rotating_window_advances_and_wraps_indices() {
        let mut pattern = RotatingWindow::new(8, 3);
        let first = pattern.next_frame();
        assert_eq!(
            first.iter().map(|e| e.idx).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
        // advance to the matrix boundary
        for _ in 0..6 {
            pattern.next_frame();
        }
        let wrapped = pattern.next_frame();
        assert_eq!(
            wrapped.iter().map(|e| e.idx).collect::<Vec<_>>(),
            vec![7, 0, 1]
        );
    }

    #[test]
    fn shade_saturates_instead_of_wrapping() {
        let mut pattern = RotatingWindow::new(64, 1);
        pattern.count = 100;
        let frame = pattern.next_frame();
        assert_eq!(frame[0].color, Rgb::new(255, 100, 100));
    }

    #[test]
    fn counter_wraps_at_limit() {
        let mut pattern = RotatingWindow::new(64, 1);
        pattern.count = 0x7FFF;
        pattern.next_frame();
        assert_eq!(pattern.count, 0);
    }
}
