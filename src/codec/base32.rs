//! RFC 4648 Base32.
//!
//! Two alphabets are provided: the standard one (`A-Z2-7`) and the extended-hex
//! one (`0-9A-V`), each with and without `=` padding. Decoding is case-insensitive,
//! accepts input with or without trailing padding, and rejects non-canonical
//! trailing bits.

use crate::error::CodecError;

const STANDARD_ALPHABET: &[u8; 32] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";
const HEX_ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHIJKLMNOPQRSTUV";
const PAD: u8 = b'=';
const INVALID: u8 = 0xff;

const fn decode_table(alphabet: &[u8; 32]) -> [u8; 256] {
    let mut table = [INVALID; 256];
    let mut i = 0;
    while i < 32 {
        let ch = alphabet[i];
        table[ch as usize] = i as u8;
        table[ch.to_ascii_lowercase() as usize] = i as u8;
        i += 1;
    }
    table
}

const STANDARD_TABLE: [u8; 256] = decode_table(STANDARD_ALPHABET);
const HEX_TABLE: [u8; 256] = decode_table(HEX_ALPHABET);

/// A Base32 engine: alphabet plus padding policy
#[derive(Debug, Clone, Copy)]
pub struct Base32 {
    alphabet: &'static [u8; 32],
    table: &'static [u8; 256],
    padding: bool,
}

impl Base32 {
    pub const STANDARD: Base32 = Base32 {
        alphabet: STANDARD_ALPHABET,
        table: &STANDARD_TABLE,
        padding: true,
    };

    pub const STANDARD_NO_PAD: Base32 = Base32 {
        alphabet: STANDARD_ALPHABET,
        table: &STANDARD_TABLE,
        padding: false,
    };

    pub const HEX: Base32 = Base32 {
        alphabet: HEX_ALPHABET,
        table: &HEX_TABLE,
        padding: true,
    };

    pub const HEX_NO_PAD: Base32 = Base32 {
        alphabet: HEX_ALPHABET,
        table: &HEX_TABLE,
        padding: false,
    };

    /// Length of the encoding of `len` bytes.
    pub fn encoded_len(&self, len: usize) -> usize {
        if self.padding {
            len.div_ceil(5) * 8
        } else {
            (len * 8).div_ceil(5)
        }
    }

    pub fn encode(&self, data: &[u8]) -> String {
        let mut out = String::with_capacity(self.encoded_len(data.len()));
        let mut buffer: u32 = 0;
        let mut bits: u32 = 0;

        for &byte in data {
            buffer = (buffer << 8) | u32::from(byte);
            bits += 8;
            while bits >= 5 {
                bits -= 5;
                let index = (buffer >> bits) & 0x1f;
                out.push(self.alphabet[index as usize] as char);
            }
            buffer &= (1 << bits) - 1;
        }
        if bits > 0 {
            let index = (buffer << (5 - bits)) & 0x1f;
            out.push(self.alphabet[index as usize] as char);
        }
        if self.padding {
            while out.len() % 8 != 0 {
                out.push(PAD as char);
            }
        }
        out
    }

    pub fn encode_str(&self, text: &str) -> String {
        self.encode(text.as_bytes())
    }

    pub fn decode(&self, encoded: &str) -> Result<Vec<u8>, CodecError> {
        let input = encoded.as_bytes();

        let significant = match input.iter().position(|&b| b == PAD) {
            Some(first_pad) => {
                if let Some(offset) = input[first_pad..].iter().position(|&b| b != PAD) {
                    return Err(CodecError::MisplacedPadding(first_pad + offset));
                }
                first_pad
            }
            None => input.len(),
        };

        // 1, 3 and 6 trailing symbols cannot encode whole bytes.
        if matches!(significant % 8, 1 | 3 | 6) {
            return Err(CodecError::InvalidLength(significant));
        }

        let mut out = Vec::with_capacity(significant * 5 / 8);
        let mut buffer: u32 = 0;
        let mut bits: u32 = 0;

        for (position, &byte) in input[..significant].iter().enumerate() {
            let value = self.table[byte as usize];
            if value == INVALID {
                return Err(CodecError::InvalidCharacter {
                    ch: encoded[position..].chars().next().unwrap_or('\u{fffd}'),
                    position,
                });
            }
            buffer = (buffer << 5) | u32::from(value);
            bits += 5;
            if bits >= 8 {
                bits -= 8;
                out.push((buffer >> bits) as u8);
                buffer &= (1 << bits) - 1;
            }
        }

        if buffer != 0 {
            return Err(CodecError::TrailingBits);
        }
        Ok(out)
    }

    pub fn decode_str(&self, encoded: &str) -> Result<String, CodecError> {
        String::from_utf8(self.decode(encoded)?).map_err(|_| CodecError::InvalidUtf8)
    }
}

/// Standard alphabet with padding.
pub fn encode(data: &[u8]) -> String {
    Base32::STANDARD.encode(data)
}

/// Standard alphabet, padding optional.
pub fn decode(encoded: &str) -> Result<Vec<u8>, CodecError> {
    Base32::STANDARD.decode(encoded)
}
