//! Base32 round-trip and canonical-form properties

use glkit::codec::base32::{decode, encode};
use glkit::codec::Base32;
use proptest::prelude::*;

const ENGINES: [Base32; 4] = [
    Base32::STANDARD,
    Base32::STANDARD_NO_PAD,
    Base32::HEX,
    Base32::HEX_NO_PAD,
];

proptest! {
    #[test]
    fn decode_inverts_encode(data in proptest::collection::vec(any::<u8>(), 0..256)) {
        for engine in ENGINES {
            let encoded = engine.encode(&data);
            prop_assert_eq!(encoded.len(), engine.encoded_len(data.len()));
            prop_assert_eq!(engine.decode(&encoded).unwrap(), data.clone());
        }
    }

    #[test]
    fn text_round_trips(text in "\\PC{0,64}") {
        let encoded = Base32::STANDARD.encode_str(&text);
        prop_assert_eq!(Base32::STANDARD.decode_str(&encoded).unwrap(), text);
    }

    #[test]
    fn decoding_ignores_case_and_padding(data in proptest::collection::vec(any::<u8>(), 0..64)) {
        let encoded = encode(&data);
        let lower = encoded.to_ascii_lowercase();
        let unpadded = encoded.trim_end_matches('=');
        prop_assert_eq!(decode(&lower).unwrap(), data.clone());
        prop_assert_eq!(decode(unpadded).unwrap(), data);
    }

    #[test]
    fn padded_output_is_whole_blocks(data in proptest::collection::vec(any::<u8>(), 0..64)) {
        let encoded = encode(&data);
        prop_assert_eq!(encoded.len() % 8, 0);
        prop_assert!(encoded.bytes().all(|b| b.is_ascii_uppercase() || (b'2'..=b'7').contains(&b) || b == b'='));
    }
}
