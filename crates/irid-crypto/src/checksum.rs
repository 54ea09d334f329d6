//! EIP-55 mixed-case address checksums

use irid_primitives::Address;

use crate::keccak256;

/// Render an address in EIP-55 checksummed form
pub fn to_checksum_address(address: &Address) -> String {
    let lower = hex::encode(address.as_bytes());
    let hash = keccak256(lower.as_bytes());

    let mut result = String::with_capacity(42);
    result.push_str("0x");

    for (i, c) in lower.chars().enumerate() {
        let byte = hash.as_bytes()[i / 2];
        let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0f };
        if c.is_ascii_alphabetic() && nibble >= 8 {
            result.push(c.to_ascii_uppercase());
        } else {
            result.push(c);
        }
    }

    result
}

/// Check an address string against its EIP-55 checksum.
///
/// Single-case input carries no checksum and is accepted as long as it parses.
pub fn is_valid_checksum(text: &str) -> bool {
    let digits = text.strip_prefix("0x").unwrap_or(text);
    let Ok(address) = Address::from_hex(digits) else {
        return false;
    };

    let has_lower = digits.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = digits.chars().any(|c| c.is_ascii_uppercase());
    if !(has_lower && has_upper) {
        return true;
    }

    to_checksum_address(&address)[2..] == *digits
}

#[cfg(test)]
mod tests {
    use super::*;

    // Vectors from EIP-55
    const CHECKSUMMED: [&str; 4] = [
        "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
        "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
        "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB",
        "0xD1220A0cf47c7B9Be7A2E6BA89F429762e7b9aDb",
    ];

    #[test]
    fn test_to_checksum_address_vectors() {
        for expected in CHECKSUMMED {
            let address = Address::from_hex(expected).unwrap();
            assert_eq!(to_checksum_address(&address), expected);
        }
    }

    #[test]
    fn test_to_checksum_address_known_wallet() {
        let address = Address::from_hex("0xd8da6bf26964af9d7eed9e03e53415d37aa96045").unwrap();
        assert_eq!(
            to_checksum_address(&address),
            "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045"
        );
    }

    #[test]
    fn test_is_valid_checksum() {
        for text in CHECKSUMMED {
            assert!(is_valid_checksum(text));
        }
        // Single-case input is not checksummed
        assert!(is_valid_checksum("0x52908400098527886e0f7030069857d2e4169ee7"));
        assert!(is_valid_checksum("0x52908400098527886E0F7030069857D2E4169EE7"));
    }

    #[test]
    fn test_is_valid_checksum_rejects_bad_case() {
        // Last letter flipped
        assert!(!is_valid_checksum("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAeD"));
        assert!(!is_valid_checksum("0x1234"));
    }
}
