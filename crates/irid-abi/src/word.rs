//! Single-word scalar codec
//!
//! Numeric types and addresses are right-aligned in their word; fixed-size
//! byte strings are left-aligned. Decoding is strict: any bit outside the
//! declared width must be zero (or a correct sign extension for `int<N>`).

use irid_primitives::{Address, Word, U256, WORD_SIZE};

use crate::types::{I256, Token, TypeDescriptor};
use crate::AbiError;

/// Encode a single-word value
pub fn encode_scalar(desc: &TypeDescriptor, token: &Token) -> Result<Word, AbiError> {
    check_width(desc)?;
    let mut word: Word = [0u8; WORD_SIZE];

    match (desc, token) {
        (TypeDescriptor::Uint(bits), Token::Uint(value)) => {
            if value.bits() > *bits {
                return Err(AbiError::Range(format!("{} does not fit in uint{}", value, bits)));
            }
            value.to_big_endian(&mut word);
        }
        (TypeDescriptor::Int(bits), Token::Int(value)) => {
            if !fits_int(value, *bits) {
                return Err(AbiError::Range(format!("{} does not fit in int{}", value, bits)));
            }
            let raw = if value.negative {
                twos_complement(value.abs)
            } else {
                value.abs
            };
            raw.to_big_endian(&mut word);
        }
        (TypeDescriptor::Address, Token::Address(addr)) => {
            word[12..].copy_from_slice(addr.as_bytes());
        }
        (TypeDescriptor::Bool, Token::Bool(b)) => {
            word[31] = u8::from(*b);
        }
        (TypeDescriptor::FixedBytes(size), Token::FixedBytes(data)) => {
            if data.len() != *size {
                return Err(AbiError::InvalidType(format!(
                    "bytes{} expects exactly {} bytes, got {}",
                    size,
                    size,
                    data.len()
                )));
            }
            word[..data.len()].copy_from_slice(data);
        }
        _ => return Err(mismatch(desc, token)),
    }

    Ok(word)
}

/// Decode a single-word value
pub fn decode_scalar(desc: &TypeDescriptor, word: &Word) -> Result<Token, AbiError> {
    check_width(desc)?;
    match desc {
        TypeDescriptor::Uint(bits) => {
            let value = U256::from_big_endian(word);
            if value.bits() > *bits {
                return Err(AbiError::Range(format!(
                    "word 0x{} exceeds uint{}",
                    hex::encode(word),
                    bits
                )));
            }
            Ok(Token::Uint(value))
        }
        TypeDescriptor::Int(bits) => {
            let raw = U256::from_big_endian(word);
            let negative = word[0] & 0x80 != 0;
            let abs = if negative { twos_complement(raw) } else { raw };
            let value = I256::new(abs, negative);
            if !fits_int(&value, *bits) {
                return Err(AbiError::Range(format!(
                    "word 0x{} is not a sign-extended int{}",
                    hex::encode(word),
                    bits
                )));
            }
            Ok(Token::Int(value))
        }
        TypeDescriptor::Address => {
            if word[..12].iter().any(|b| *b != 0) {
                return Err(AbiError::Range(format!(
                    "word 0x{} has non-zero address padding",
                    hex::encode(word)
                )));
            }
            let mut bytes = [0u8; 20];
            bytes.copy_from_slice(&word[12..]);
            Ok(Token::Address(Address::from_bytes(bytes)))
        }
        TypeDescriptor::Bool => {
            if word[..31].iter().any(|b| *b != 0) || word[31] > 1 {
                return Err(AbiError::InvalidBool(hex::encode(word)));
            }
            Ok(Token::Bool(word[31] == 1))
        }
        TypeDescriptor::FixedBytes(size) => {
            if word[*size..].iter().any(|b| *b != 0) {
                return Err(AbiError::Range(format!(
                    "word 0x{} has non-zero bytes{} padding",
                    hex::encode(word),
                    size
                )));
            }
            Ok(Token::FixedBytes(word[..*size].to_vec()))
        }
        other => Err(AbiError::InvalidType(format!(
            "{} does not fit in a single word",
            other
        ))),
    }
}

/// Reject hand-built descriptors the grammar would never produce
fn check_width(desc: &TypeDescriptor) -> Result<(), AbiError> {
    let valid = match desc {
        TypeDescriptor::Uint(bits) | TypeDescriptor::Int(bits) => {
            (8..=256).contains(bits) && bits % 8 == 0
        }
        TypeDescriptor::FixedBytes(size) => (1..=32).contains(size),
        _ => true,
    };
    if valid {
        Ok(())
    } else {
        Err(AbiError::InvalidType(format!("{}: unsupported width", desc)))
    }
}

/// Check `-2^(bits-1) <= value < 2^(bits-1)`
fn fits_int(value: &I256, bits: usize) -> bool {
    let limit = U256::one() << (bits - 1);
    if value.negative {
        value.abs <= limit
    } else {
        value.abs < limit
    }
}

/// Two's complement negation over the full 256 bits
fn twos_complement(value: U256) -> U256 {
    (!value).overflowing_add(U256::one()).0
}

fn mismatch(desc: &TypeDescriptor, token: &Token) -> AbiError {
    if desc.is_scalar() {
        AbiError::InvalidType(format!("expected {} value, got {}", desc, token.kind()))
    } else {
        AbiError::InvalidType(format!("{} does not fit in a single word", desc))
    }
}
