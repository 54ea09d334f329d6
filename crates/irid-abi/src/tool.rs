//! Decode and encode entry points used by front ends

use serde::Serialize;

use crate::coerce::coerce_value;
use crate::document::AbiDocument;
use crate::encode::encode_block;
use crate::parser::parse_signature;
use crate::selector::{canonical_signature, compute_selector, resolve_by_selector, selector_hex, Selector};
use crate::types::{Param, Token};
use crate::AbiError;

/// Result of decoding calldata against an ABI
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedCall {
    /// Name of the matched function
    pub function_name: String,
    /// Canonical signature of the matched function
    pub signature: String,
    /// Lowercase `0x`-prefixed selector
    pub selector_hex: String,
    /// Decoded arguments in declared order
    pub parameters: Vec<DecodedParameter>,
    /// Non-fatal notices, such as other entries sharing the selector
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// One decoded argument
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedParameter {
    /// Declared name, possibly empty
    pub name: String,
    /// Canonical type string
    pub type_string: String,
    /// Decoded value
    pub value: Token,
}

/// Encode request built from a signature and one raw text value per input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeRequest {
    /// Function signature, e.g. `transfer(address,uint256)`
    pub signature: String,
    /// Raw text values, one per input
    pub values: Vec<String>,
}

/// Result of an encode request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedCall {
    /// Canonical signature the selector was computed from
    pub signature: String,
    /// Lowercase `0x`-prefixed selector
    pub selector_hex: String,
    /// Lowercase `0x`-prefixed calldata
    pub calldata: String,
    /// Calldata length in bytes
    pub byte_length: usize,
}

impl EncodeRequest {
    /// Create a new encode request
    pub fn new<S: AsRef<str>>(signature: impl Into<String>, values: &[S]) -> Self {
        Self {
            signature: signature.into(),
            values: values.iter().map(|v| v.as_ref().to_string()).collect(),
        }
    }

    /// Parse, coerce and encode. Nothing is produced unless every step succeeds.
    pub fn execute(&self) -> Result<EncodedCall, AbiError> {
        let (name, inputs) = parse_signature(&self.signature)?;
        if self.values.len() != inputs.len() {
            return Err(AbiError::Arity {
                expected: inputs.len(),
                got: self.values.len(),
            });
        }

        let params: Vec<Param> = inputs.into_iter().map(Param::unnamed).collect();
        let tokens = params
            .iter()
            .zip(&self.values)
            .enumerate()
            .map(|(index, (param, raw))| {
                coerce_value(&param.ty, raw).map_err(|e| e.at_parameter(index, param.label()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let selector = compute_selector(&name, params.iter().map(|p| &p.ty));
        let mut calldata = selector.to_vec();
        calldata.extend(encode_top_level(&params, &tokens)?);

        tracing::debug!(
            selector = %selector_hex(&selector),
            bytes = calldata.len(),
            "encoded call"
        );

        Ok(EncodedCall {
            signature: canonical_signature(&name, params.iter().map(|p| &p.ty)),
            selector_hex: selector_hex(&selector),
            calldata: format!("0x{}", hex::encode(&calldata)),
            byte_length: calldata.len(),
        })
    }
}

/// Encode `signature` with raw text values, returning `0x`-prefixed calldata
pub fn encode<S: AsRef<str>>(signature: &str, raw_values: &[S]) -> Result<String, AbiError> {
    EncodeRequest::new(signature, raw_values)
        .execute()
        .map(|call| call.calldata)
}

/// Decode `0x`-prefixed calldata against a JSON ABI document
pub fn decode(calldata_hex: &str, abi_json: &str) -> Result<DecodedCall, AbiError> {
    let calldata = parse_calldata_hex(calldata_hex)?;
    let document = AbiDocument::from_json(abi_json)?;
    decode_calldata(&calldata, &document)
}

/// Decode raw calldata bytes against an already-parsed document
pub fn decode_calldata(calldata: &[u8], document: &AbiDocument) -> Result<DecodedCall, AbiError> {
    if calldata.len() < 4 {
        return Err(AbiError::TruncatedData {
            needed: 4,
            available: calldata.len(),
        });
    }

    let mut selector: Selector = [0u8; 4];
    selector.copy_from_slice(&calldata[..4]);
    let selector_text = selector_hex(&selector);
    tracing::debug!(selector = %selector_text, bytes = calldata.len(), "decoding calldata");

    let resolution = resolve_by_selector(&selector, document)
        .ok_or_else(|| AbiError::SelectorMismatch(selector_text.clone()))?;
    let entry = resolution.entry;

    let warnings: Vec<String> = resolution
        .shadowed
        .iter()
        .map(|other| {
            format!(
                "selector {} is also declared by {}; decoded as the first match {}",
                selector_text,
                other.signature(),
                entry.signature()
            )
        })
        .collect();
    for warning in &warnings {
        tracing::warn!("{}", warning);
    }

    let values = entry.decode_input(&calldata[4..])?;
    let parameters = entry
        .inputs
        .iter()
        .zip(values)
        .map(|(param, value)| DecodedParameter {
            name: param.name.clone(),
            type_string: param.ty.to_string(),
            value,
        })
        .collect();

    Ok(DecodedCall {
        function_name: entry.name.clone(),
        signature: entry.signature(),
        selector_hex: selector_text,
        parameters,
        warnings,
    })
}

/// Strict `0x`-prefixed, even-length hex
pub fn parse_calldata_hex(text: &str) -> Result<Vec<u8>, AbiError> {
    let text = text.trim();
    let digits = text
        .strip_prefix("0x")
        .ok_or_else(|| AbiError::InvalidHex("calldata must start with 0x".into()))?;
    hex::decode(digits).map_err(|e| AbiError::InvalidHex(e.to_string()))
}

fn encode_top_level(params: &[Param], tokens: &[Token]) -> Result<Vec<u8>, AbiError> {
    let pairs: Vec<_> = params.iter().map(|p| &p.ty).zip(tokens).collect();
    encode_block(&pairs, |index, e| e.at_parameter(index, params[index].label()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_calldata_hex() {
        assert_eq!(parse_calldata_hex("0x").unwrap(), Vec::<u8>::new());
        assert_eq!(parse_calldata_hex(" 0xA9059cbb\n").unwrap(), vec![0xa9, 0x05, 0x9c, 0xbb]);
        for bad in ["a9059cbb", "0xa9059cb", "0xzz", "0X00"] {
            assert!(
                matches!(parse_calldata_hex(bad), Err(AbiError::InvalidHex(_))),
                "{} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_encode_request_reports_selector_and_length() {
        let call = EncodeRequest::new("balanceOf(address)", &["0x0000000000000000000000000000000000000000"])
            .execute()
            .unwrap();
        assert_eq!(call.signature, "balanceOf(address)");
        assert_eq!(call.selector_hex, "0x70a08231");
        assert_eq!(call.byte_length, 36);
        assert_eq!(call.calldata.len(), 2 + 36 * 2);
    }

    #[test]
    fn test_encode_error_names_parameter() {
        let err = encode("set(uint8,uint8)", &["1", "300"]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "parameter 1 (uint8): value out of range: 300 does not fit in uint8"
        );
    }
}
