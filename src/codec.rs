//! Binary-to-text codecs.

pub mod base32;

pub use base32::Base32;
