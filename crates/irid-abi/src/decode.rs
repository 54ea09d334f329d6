//! ABI decoding

use std::iter;

use irid_primitives::{Word, U256, WORD_SIZE};

use crate::types::{Token, TypeDescriptor};
use crate::word::decode_scalar;
use crate::AbiError;

/// Decode a parameter block produced by the head/tail layout.
///
/// Trailing bytes after the last referenced word are ignored.
pub fn decode_parameters(types: &[TypeDescriptor], data: &[u8]) -> Result<Vec<Token>, AbiError> {
    decode_params(types.iter(), data, 0)
}

/// Decode a sequence of values whose head starts at `base`.
///
/// Dynamic offsets are relative to `base`.
pub(crate) fn decode_params<'a, I>(types: I, data: &[u8], base: usize) -> Result<Vec<Token>, AbiError>
where
    I: IntoIterator<Item = &'a TypeDescriptor>,
{
    let mut budget = Budget::for_input(data);
    decode_sequence(types, data, base, &mut budget)
}

/// Cap on the words a single decode may produce, proportional to the input.
///
/// Aliased offsets let nested dynamic arrays reuse the same child, so the
/// output is otherwise unbounded by the input length.
struct Budget {
    remaining: usize,
    limit: usize,
}

impl Budget {
    /// Extra allowance for inputs too small to be worth counting
    const SLACK: usize = 1024;

    fn for_input(data: &[u8]) -> Self {
        let limit = data.len().saturating_add(Self::SLACK);
        Self {
            remaining: limit,
            limit,
        }
    }

    fn spend(&mut self, words: usize) -> Result<(), AbiError> {
        self.remaining = self.remaining.checked_sub(words).ok_or_else(|| {
            AbiError::InvalidType(format!(
                "decoded output exceeds {} words; offsets alias the same data",
                self.limit
            ))
        })?;
        Ok(())
    }
}

fn decode_sequence<'a, I>(
    types: I,
    data: &[u8],
    base: usize,
    budget: &mut Budget,
) -> Result<Vec<Token>, AbiError>
where
    I: IntoIterator<Item = &'a TypeDescriptor>,
{
    let mut tokens = Vec::new();
    let mut head = base;

    for param_type in types {
        if param_type.is_dynamic() {
            let offset = read_usize(data, head)?;
            let start = base
                .checked_add(offset)
                .ok_or_else(|| truncated(usize::MAX, data))?;
            tokens.push(decode_value(param_type, data, start, budget)?);
            head = head.saturating_add(WORD_SIZE);
        } else {
            tokens.push(decode_value(param_type, data, head, budget)?);
            head = head.saturating_add(param_type.checked_head_size()?);
        }
    }

    Ok(tokens)
}

/// Decode one value whose encoding starts at `pos`
fn decode_value(
    param_type: &TypeDescriptor,
    data: &[u8],
    pos: usize,
    budget: &mut Budget,
) -> Result<Token, AbiError> {
    budget.spend(1)?;
    match param_type {
        TypeDescriptor::Bytes => {
            let bytes = read_bytes(data, pos)?;
            budget.spend(bytes.len().div_ceil(WORD_SIZE))?;
            Ok(Token::Bytes(bytes.to_vec()))
        }
        TypeDescriptor::String => {
            let bytes = read_bytes(data, pos)?;
            budget.spend(bytes.len().div_ceil(WORD_SIZE))?;
            let s = String::from_utf8(bytes.to_vec())
                .map_err(|e| AbiError::InvalidType(format!("string is not valid UTF-8: {}", e)))?;
            Ok(Token::String(s))
        }
        TypeDescriptor::Array(inner) => {
            let len = read_usize(data, pos)?;
            let start = pos.saturating_add(WORD_SIZE);
            check_element_count(data, start, len, inner)?;
            let tokens = decode_sequence(iter::repeat(inner.as_ref()).take(len), data, start, budget)?;
            Ok(Token::Array(tokens))
        }
        TypeDescriptor::FixedArray(inner, size) => {
            let tokens = decode_sequence(iter::repeat(inner.as_ref()).take(*size), data, pos, budget)?;
            Ok(Token::FixedArray(tokens))
        }
        TypeDescriptor::Tuple(params) => {
            let tokens = decode_sequence(params.iter().map(|p| &p.ty), data, pos, budget)?;
            Ok(Token::Tuple(tokens))
        }
        scalar => decode_scalar(scalar, &read_word(data, pos)?),
    }
}

/// Bound an untrusted length word by the bytes actually present
fn check_element_count(
    data: &[u8],
    start: usize,
    len: usize,
    inner: &TypeDescriptor,
) -> Result<(), AbiError> {
    let needed = match inner.checked_head_size()? {
        0 if len <= data.len() => start,
        0 => usize::MAX,
        size => len
            .checked_mul(size)
            .and_then(|n| n.checked_add(start))
            .unwrap_or(usize::MAX),
    };
    check_length(data, needed)
}

/// Length-prefixed payload starting at `pos`
fn read_bytes(data: &[u8], pos: usize) -> Result<&[u8], AbiError> {
    let len = read_usize(data, pos)?;
    let start = pos.saturating_add(WORD_SIZE);
    let end = start
        .checked_add(len)
        .ok_or_else(|| truncated(usize::MAX, data))?;
    check_length(data, end)?;
    Ok(&data[start..end])
}

fn read_word(data: &[u8], pos: usize) -> Result<Word, AbiError> {
    let end = pos
        .checked_add(WORD_SIZE)
        .ok_or_else(|| truncated(usize::MAX, data))?;
    check_length(data, end)?;
    let mut word = [0u8; WORD_SIZE];
    word.copy_from_slice(&data[pos..end]);
    Ok(word)
}

/// Offset or length word; anything beyond `usize` cannot point inside `data`
fn read_usize(data: &[u8], pos: usize) -> Result<usize, AbiError> {
    let value = U256::from_big_endian(&read_word(data, pos)?);
    if value > U256::from(usize::MAX) {
        return Err(truncated(usize::MAX, data));
    }
    Ok(value.as_usize())
}

/// Check that data has at least `required` bytes
fn check_length(data: &[u8], required: usize) -> Result<(), AbiError> {
    if data.len() < required {
        return Err(truncated(required, data));
    }
    Ok(())
}

fn truncated(needed: usize, data: &[u8]) -> AbiError {
    AbiError::TruncatedData {
        needed,
        available: data.len(),
    }
}
