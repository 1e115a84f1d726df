//! Pixlink core protocol implementation
//!
//! This crate provides the wire codec, pixel frame, shared update slot,
//! and the duplex exchange loops for the pixlink LED-matrix link. It knows
//! nothing about any concrete radio: the loops are written against the
//! channel traits in [`link`], which the BLE crate implements and the test
//! suite mocks.

// ----------------------------------------------------------------------------
// Module Declarations
// ----------------------------------------------------------------------------

pub mod codec;
pub mod exchange;
pub mod frame;
pub mod link;
pub mod pattern;
pub mod slot;
pub mod types;
pub mod watcher;

// ----------------------------------------------------------------------------
// Public API
// ----------------------------------------------------------------------------

pub use codec::{PixelCodec, ENTRY_WIRE_SIZE};
pub use exchange::{run_central_exchange, run_peripheral_exchange, ExchangeTiming};
pub use frame::{apply_packet, display_self_check, MatrixFrame, PixelSink};
pub use link::{ConnectionState, InboundChannel, LinkMonitor, OutboundChannel};
pub use pattern::{Frame, FramePattern, RotatingWindow, StaticReply};
pub use slot::{SlotReader, SlotWriter, UpdateSlot};
pub use types::{Entry, Rgb};
pub use watcher::run_watcher;

// ----------------------------------------------------------------------------
// Error Types
// ----------------------------------------------------------------------------

/// Core error types for the pixlink link.
///
/// Malformed payloads are deliberately absent: wrong-length packets and
/// out-of-range indices are handled by silent truncation/drop, never
/// surfaced as errors.
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    #[error("discovery window elapsed without finding `{target}`")]
    DiscoveryTimeout { target: String },

    #[error("connection attempt timed out")]
    ConnectionTimeout,

    #[error("connection attempt failed: {0}")]
    ConnectionFailed(String),

    #[error("link lost")]
    ConnectionLost,

    #[error("read failed: {0}")]
    ReadFailed(String),

    #[error("write failed: {0}")]
    WriteFailed(String),

    #[error("transport unavailable: {0}")]
    TransportUnavailable(String),
}

pub type Result<T> = core::result::Result<T, LinkError>;
