//! Coercion of raw text values into typed tokens

use irid_crypto::is_valid_checksum;
use irid_primitives::{Address, U256};

use crate::parser::split_list;
use crate::types::{I256, Token, TypeDescriptor};
use crate::AbiError;

/// Convert one raw text value to a token of the given type.
///
/// Range checks against the declared bit width happen at encode time.
pub fn coerce_value(ty: &TypeDescriptor, raw: &str) -> Result<Token, AbiError> {
    coerce(ty, raw, false)
}

fn coerce(ty: &TypeDescriptor, raw: &str, nested: bool) -> Result<Token, AbiError> {
    let text = if nested { unquote(raw.trim()) } else { raw.to_string() };

    match ty {
        // Top-level strings are taken verbatim, whitespace included
        TypeDescriptor::String => Ok(Token::String(text)),
        TypeDescriptor::Uint(_) => {
            let text = text.trim();
            if text.starts_with('-') {
                return Err(AbiError::Range(format!("{} is negative, {} is unsigned", text, ty)));
            }
            Ok(Token::Uint(parse_magnitude(text, ty)?))
        }
        TypeDescriptor::Int(_) => {
            let text = text.trim();
            let (negative, digits) = match text.strip_prefix('-') {
                Some(rest) => (true, rest),
                None => (false, text),
            };
            Ok(Token::Int(I256::new(parse_magnitude(digits, ty)?, negative)))
        }
        TypeDescriptor::Address => parse_address(text.trim()).map(Token::Address),
        TypeDescriptor::Bool => match text.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Ok(Token::Bool(true)),
            "false" | "0" => Ok(Token::Bool(false)),
            other => Err(AbiError::InvalidType(format!("{:?} is not a bool", other))),
        },
        TypeDescriptor::FixedBytes(size) => {
            let data = parse_hex_value(text.trim(), ty)?;
            if data.len() != *size {
                return Err(AbiError::InvalidType(format!(
                    "{} expects exactly {} bytes, got {}",
                    ty,
                    size,
                    data.len()
                )));
            }
            Ok(Token::FixedBytes(data))
        }
        TypeDescriptor::Bytes => parse_hex_value(text.trim(), ty).map(Token::Bytes),
        TypeDescriptor::Array(inner) => {
            let items = list_items(&text, ty)?;
            let tokens = coerce_all(inner, &items)?;
            Ok(Token::Array(tokens))
        }
        TypeDescriptor::FixedArray(inner, size) => {
            let items = list_items(&text, ty)?;
            if items.len() != *size {
                return Err(AbiError::InvalidType(format!(
                    "{} expects {} elements, got {}",
                    ty,
                    size,
                    items.len()
                )));
            }
            Ok(Token::FixedArray(coerce_all(inner, &items)?))
        }
        TypeDescriptor::Tuple(params) => {
            let items = list_items(&text, ty)?;
            if items.len() != params.len() {
                return Err(AbiError::InvalidType(format!(
                    "{} expects {} components, got {}",
                    ty,
                    params.len(),
                    items.len()
                )));
            }
            let tokens = params
                .iter()
                .zip(&items)
                .map(|(param, item)| coerce(&param.ty, item, true))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Token::Tuple(tokens))
        }
    }
}

fn coerce_all(inner: &TypeDescriptor, items: &[&str]) -> Result<Vec<Token>, AbiError> {
    items.iter().map(|item| coerce(inner, item, true)).collect()
}

/// Items of a `[a,b]` or `(a,b)` list
fn list_items<'a>(text: &'a str, ty: &TypeDescriptor) -> Result<Vec<&'a str>, AbiError> {
    let text = text.trim();
    let inner = text
        .strip_prefix('[')
        .and_then(|t| t.strip_suffix(']'))
        .or_else(|| text.strip_prefix('(').and_then(|t| t.strip_suffix(')')))
        .ok_or_else(|| {
            AbiError::InvalidType(format!("{} expects a bracketed list, got {:?}", ty, text))
        })?;
    split_list(inner).map_err(|e| AbiError::InvalidType(format!("{}: {}", ty, e)))
}

/// Decimal or `0x`-hex non-negative integer
fn parse_magnitude(text: &str, ty: &TypeDescriptor) -> Result<U256, AbiError> {
    let not_a_number = || AbiError::InvalidType(format!("{:?} is not a valid {} value", text, ty));
    let too_large = || AbiError::Range(format!("{} does not fit in 256 bits", text));

    if let Some(digits) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(not_a_number());
        }
        let significant = digits.trim_start_matches('0');
        if significant.len() > 64 {
            return Err(too_large());
        }
        let padded = format!("{:0>64}", significant);
        let bytes = hex::decode(padded).map_err(|_| not_a_number())?;
        return Ok(U256::from_big_endian(&bytes));
    }

    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(not_a_number());
    }
    // Digits are validated, so the only remaining failure is overflow
    U256::from_dec_str(text).map_err(|_| too_large())
}

fn parse_address(text: &str) -> Result<Address, AbiError> {
    let digits = text
        .strip_prefix("0x")
        .filter(|d| d.len() == 40 && d.bytes().all(|b| b.is_ascii_hexdigit()))
        .ok_or_else(|| {
            AbiError::InvalidType(format!("{:?} is not a 0x-prefixed 20-byte address", text))
        })?;
    if !is_valid_checksum(text) {
        return Err(AbiError::InvalidType(format!("{} has an invalid EIP-55 checksum", text)));
    }
    Address::from_hex(digits).map_err(|e| AbiError::InvalidType(e.to_string()))
}

fn parse_hex_value(text: &str, ty: &TypeDescriptor) -> Result<Vec<u8>, AbiError> {
    let digits = text
        .strip_prefix("0x")
        .ok_or_else(|| AbiError::InvalidType(format!("{} expects 0x-prefixed hex, got {:?}", ty, text)))?;
    hex::decode(digits).map_err(|e| AbiError::InvalidType(format!("{}: {}", ty, e)))
}

/// Strip one layer of double quotes, resolving `\"` and `\\`
fn unquote(text: &str) -> String {
    let Some(inner) = text
        .strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .filter(|_| text.len() >= 2)
    else {
        return text.to_string();
    };

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}
