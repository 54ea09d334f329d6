//! # irid-primitives
//!
//! Primitive types shared by the Iridescia ABI toolkit.
//!
//! This crate provides the fixed-size byte types that the ABI word codec
//! reads and writes, plus a re-export of the 256-bit unsigned integer.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod address;
mod hash;

pub use address::{Address, AddressError};
pub use hash::H256;

// Re-export primitive-types for U256
pub use primitive_types::U256;

/// Size of one ABI word in bytes
pub const WORD_SIZE: usize = 32;

/// Raw 32-byte ABI word
pub type Word = [u8; WORD_SIZE];
