//! # irid-crypto
//!
//! Cryptographic helpers for the Iridescia ABI toolkit.
//!
//! - Keccak-256 hashing (function selectors)
//! - EIP-55 checksummed address rendering and validation

#![warn(missing_docs)]
#![warn(clippy::all)]

mod checksum;
mod hash;

pub use checksum::{is_valid_checksum, to_checksum_address};
pub use hash::keccak256;
