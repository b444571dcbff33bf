//! Property-based tests for codec and collection laws

mod base32;
mod collections;
