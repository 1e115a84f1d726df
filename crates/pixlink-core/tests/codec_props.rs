//! Property tests for the wire codec

use pixlink_core::{Entry, PixelCodec, Rgb, ENTRY_WIRE_SIZE};
use proptest::prelude::*;

fn entry_strategy() -> impl Strategy<Value = Entry> {
    (any::<u8>(), any::<u8>(), any::<u8>(), any::<u8>())
        .prop_map(|(idx, r, g, b)| Entry::new(idx, Rgb::new(r, g, b)))
}

proptest! {
    #[test]
    fn encode_decode_round_trips(entries in proptest::collection::vec(entry_strategy(), 0..64)) {
        let encoded = PixelCodec::encode(&entries);
        prop_assert_eq!(encoded.len(), entries.len() * ENTRY_WIRE_SIZE);
        prop_assert_eq!(PixelCodec::decode(&encoded), entries);
    }

    #[test]
    fn decode_accepts_arbitrary_bytes(data in proptest::collection::vec(any::<u8>(), 0..256)) {
        // Never an error: the trailing partial record is simply dropped.
        let entries = PixelCodec::decode(&data);
        prop_assert_eq!(entries.len(), data.len() / ENTRY_WIRE_SIZE);
    }
}
