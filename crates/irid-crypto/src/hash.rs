//! Keccak-256 hashing

use irid_primitives::H256;
use sha3::{Digest, Keccak256};

/// Compute Keccak-256 hash of the input data
pub fn keccak256(data: &[u8]) -> H256 {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    let result = hasher.finalize();
    H256::from_bytes(result.into())
}
