//! ABI encoding

use irid_primitives::{U256, WORD_SIZE};

use crate::types::{Token, TypeDescriptor};
use crate::word::encode_scalar;
use crate::AbiError;

/// Encode a parameter list using the head/tail layout
pub fn encode_parameters(types: &[TypeDescriptor], tokens: &[Token]) -> Result<Vec<u8>, AbiError> {
    if types.len() != tokens.len() {
        return Err(AbiError::Arity {
            expected: types.len(),
            got: tokens.len(),
        });
    }
    let pairs: Vec<_> = types.iter().zip(tokens).collect();
    encode_params(&pairs)
}

/// Encode (type, value) pairs as one parameter block.
///
/// Offsets written into the head are relative to the start of this block.
pub(crate) fn encode_params(pairs: &[(&TypeDescriptor, &Token)]) -> Result<Vec<u8>, AbiError> {
    encode_block(pairs, |_, e| e)
}

/// [`encode_params`] with a hook that adds context to the failing position
pub(crate) fn encode_block<F>(pairs: &[(&TypeDescriptor, &Token)], context: F) -> Result<Vec<u8>, AbiError>
where
    F: Fn(usize, AbiError) -> AbiError,
{
    // Calculate head size (fixed part)
    let mut head_size = 0usize;
    for (index, (param_type, _)) in pairs.iter().enumerate() {
        head_size = param_type
            .checked_head_size()
            .and_then(|size| {
                head_size
                    .checked_add(size)
                    .ok_or_else(|| AbiError::InvalidType("parameter block head size overflows".into()))
            })
            .map_err(|e| context(index, e))?;
    }

    let mut head = Vec::new();
    let mut tail = Vec::new();

    for (index, (param_type, token)) in pairs.iter().enumerate() {
        let encoded = encode_token(param_type, token).map_err(|e| context(index, e))?;
        if param_type.is_dynamic() {
            let offset = head_size + tail.len();
            head.extend(encode_u256(U256::from(offset)));
            tail.extend(encoded);
        } else {
            head.extend(encoded);
        }
    }

    head.extend(tail);
    Ok(head)
}

/// Encode a single token: in place for static types, tail content for dynamic ones
fn encode_token(param_type: &TypeDescriptor, token: &Token) -> Result<Vec<u8>, AbiError> {
    match (param_type, token) {
        (TypeDescriptor::Bytes, Token::Bytes(data)) => Ok(encode_bytes(data)),
        (TypeDescriptor::String, Token::String(s)) => Ok(encode_bytes(s.as_bytes())),
        (TypeDescriptor::Array(inner), Token::Array(items)) => {
            let mut result = encode_u256(U256::from(items.len())).to_vec();
            let pairs: Vec<_> = items.iter().map(|item| (inner.as_ref(), item)).collect();
            result.extend(encode_params(&pairs)?);
            Ok(result)
        }
        (TypeDescriptor::FixedArray(inner, size), Token::FixedArray(items)) => {
            if items.len() != *size {
                return Err(AbiError::InvalidType(format!(
                    "{} expects {} elements, got {}",
                    param_type,
                    size,
                    items.len()
                )));
            }
            let pairs: Vec<_> = items.iter().map(|item| (inner.as_ref(), item)).collect();
            encode_params(&pairs)
        }
        (TypeDescriptor::Tuple(params), Token::Tuple(items)) => {
            if items.len() != params.len() {
                return Err(AbiError::InvalidType(format!(
                    "{} expects {} components, got {}",
                    param_type,
                    params.len(),
                    items.len()
                )));
            }
            let pairs: Vec<_> = params.iter().map(|p| &p.ty).zip(items).collect();
            encode_params(&pairs)
        }
        _ if param_type.is_scalar() => Ok(encode_scalar(param_type, token)?.to_vec()),
        _ => Err(AbiError::InvalidType(format!(
            "expected {} value, got {}",
            param_type,
            token.kind()
        ))),
    }
}

fn encode_u256(value: U256) -> [u8; WORD_SIZE] {
    let mut bytes = [0u8; WORD_SIZE];
    value.to_big_endian(&mut bytes);
    bytes
}

/// Length word followed by the payload, zero-padded to a word boundary
fn encode_bytes(data: &[u8]) -> Vec<u8> {
    let mut result = encode_u256(U256::from(data.len())).to_vec();

    let padded_len = data.len().div_ceil(WORD_SIZE) * WORD_SIZE;
    let mut padded = vec![0u8; padded_len];
    padded[..data.len()].copy_from_slice(data);
    result.extend(padded);

    result
}
