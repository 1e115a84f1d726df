//! Fixed-record wire codec
//!
//! The wire form of a packet is a flat concatenation of 4-byte records
//! `{idx, r, g, b}` in transmission order. There is no length prefix, no
//! checksum, and no version byte; the record boundary is purely `len / 4`.
//! This is the only schema accepted on the wire.

use crate::types::{Entry, Rgb};

/// Width of one encoded entry in bytes.
pub const ENTRY_WIRE_SIZE: usize = 4;

/// Encoder/decoder for pixel-update packets.
pub struct PixelCodec;

impl PixelCodec {
    /// Encode entries into their wire form.
    ///
    /// Empty input yields empty output. Pure and deterministic; the
    /// mask/clamp invariants are guaranteed by the `Entry` field types.
    pub fn encode(entries: &[Entry]) -> Vec<u8> {
        let mut out = Vec::with_capacity(entries.len() * ENTRY_WIRE_SIZE);
        for entry in entries {
            out.push(entry.idx);
            out.push(entry.color.r);
            out.push(entry.color.g);
            out.push(entry.color.b);
        }
        out
    }

    /// Decode a payload into entries.
    ///
    /// Trailing bytes that do not fill a whole record are dropped
    /// silently; malformed input is never an error. Empty or
    /// sub-record-length input decodes to an empty sequence.
    pub fn decode(data: &[u8]) -> Vec<Entry> {
        data.chunks_exact(ENTRY_WIRE_SIZE)
            .map(|rec| Entry::new(rec[0], Rgb::new(rec[1], rec[2], rec[3])))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_round_trip() {
        assert_eq!(PixelCodec::encode(&[]), Vec::<u8>::new());
        assert_eq!(PixelCodec::decode(b""), Vec::new());
    }

    #[test]
    fn single_entry_layout() {
        let bytes = PixelCodec::encode(&[Entry::new(7, Rgb::new(1, 2, 3))]);
        assert_eq!(bytes, vec![7, 1, 2, 3]);
    }

    #[test]
    fn clamped_input_encodes_like_exact_input() {
        let clamped = PixelCodec::encode(&[Entry::new(1, Rgb::clamped(-5, 300, 10))]);
        let exact = PixelCodec::encode(&[Entry::new(1, Rgb::new(0, 255, 10))]);
        assert_eq!(clamped, exact);
    }

    #[test]
    fn trailing_bytes_are_dropped() {
        let entries = PixelCodec::decode(&[4, 10, 20, 30, 0xEE]);
        assert_eq!(entries, vec![Entry::new(4, Rgb::new(10, 20, 30))]);
    }

    #[test]
    fn sub_record_input_decodes_empty() {
        assert!(PixelCodec::decode(&[1, 2, 3]).is_empty());
    }

    #[test]
    fn multi_entry_round_trip() {
        let entries = vec![
            Entry::new(0, Rgb::new(100, 100, 100)),
            Entry::new(63, Rgb::new(0, 0, 255)),
            Entry::new(255, Rgb::OFF),
        ];
        assert_eq!(PixelCodec::decode(&PixelCodec::encode(&entries)), entries);
    }
}
