//! ABI JSON documents

use serde::Deserialize;
use serde_json::Value;

use crate::decode::decode_params;
use crate::parser::{parse_param, ParamSpec};
use crate::selector::{canonical_signature, compute_selector, Selector};
use crate::types::{Param, Token};
use crate::AbiError;

/// Raw entry as found in a JSON ABI array
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEntry {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    inputs: Vec<ParamSpec>,
    #[serde(default)]
    outputs: Vec<ParamSpec>,
    #[serde(default)]
    state_mutability: Option<String>,
}

/// One function of an ABI document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionEntry {
    /// Function name
    pub name: String,
    /// Input parameters
    pub inputs: Vec<Param>,
    /// Output parameters
    pub outputs: Vec<Param>,
    /// `view`, `pure`, `payable` or `nonpayable` when declared
    pub state_mutability: Option<String>,
    selector: Selector,
}

impl FunctionEntry {
    /// Create a function entry; the selector is derived from name and inputs
    pub fn new(name: impl Into<String>, inputs: Vec<Param>, outputs: Vec<Param>) -> Self {
        let name = name.into();
        let selector = compute_selector(&name, inputs.iter().map(|p| &p.ty));
        Self {
            name,
            inputs,
            outputs,
            state_mutability: None,
            selector,
        }
    }

    /// Function selector (4 bytes)
    pub fn selector(&self) -> Selector {
        self.selector
    }

    /// Canonical signature (e.g., "transfer(address,uint256)")
    pub fn signature(&self) -> String {
        canonical_signature(&self.name, self.inputs.iter().map(|p| &p.ty))
    }

    /// Decode call arguments (calldata without the selector)
    pub fn decode_input(&self, data: &[u8]) -> Result<Vec<Token>, AbiError> {
        decode_params(self.inputs.iter().map(|p| &p.ty), data, 0)
    }

    /// Decode function return data
    pub fn decode_output(&self, data: &[u8]) -> Result<Vec<Token>, AbiError> {
        decode_params(self.outputs.iter().map(|p| &p.ty), data, 0)
    }
}

/// Parsed ABI document holding its function entries in declared order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbiDocument {
    functions: Vec<FunctionEntry>,
}

impl AbiDocument {
    /// Parse a JSON ABI: a bare array, or an artifact object with an `abi` array
    pub fn from_json(text: &str) -> Result<Self, AbiError> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(value)
    }

    /// Build from an already-parsed JSON value
    pub fn from_value(value: Value) -> Result<Self, AbiError> {
        let entries = match value {
            Value::Array(entries) => entries,
            Value::Object(mut object) => match object.remove("abi") {
                Some(Value::Array(entries)) => entries,
                _ => {
                    return Err(AbiError::InvalidAbi(
                        "expected a JSON array or an object with an \"abi\" array".into(),
                    ))
                }
            },
            _ => return Err(AbiError::InvalidAbi("expected a JSON array".into())),
        };

        let mut functions = Vec::new();
        for (index, entry) in entries.into_iter().enumerate() {
            let raw: RawEntry = serde_json::from_value(entry)
                .map_err(|e| AbiError::InvalidAbi(format!("entry {}: {}", index, e)))?;
            if let Some(function) = function_from_raw(index, raw)? {
                functions.push(function);
            }
        }

        if functions.is_empty() {
            return Err(AbiError::InvalidAbi("no function entries".into()));
        }

        Ok(Self { functions })
    }

    /// Function entries in declared order
    pub fn functions(&self) -> &[FunctionEntry] {
        &self.functions
    }

    /// First function with the given name
    pub fn function(&self, name: &str) -> Option<&FunctionEntry> {
        self.functions.iter().find(|f| f.name == name)
    }
}

/// `None` for entries that are not callable functions
fn function_from_raw(index: usize, raw: RawEntry) -> Result<Option<FunctionEntry>, AbiError> {
    // Entries without a type are functions
    if raw.kind.as_deref().is_some_and(|kind| kind != "function") {
        return Ok(None);
    }

    let name = raw
        .name
        .filter(|name| !name.is_empty())
        .ok_or_else(|| AbiError::InvalidAbi(format!("entry {}: function without a name", index)))?;

    let parse_all = |specs: &[ParamSpec]| {
        specs
            .iter()
            .map(parse_param)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| AbiError::InvalidAbi(format!("function {}: {}", name, e)))
    };
    let inputs = parse_all(&raw.inputs)?;
    let outputs = parse_all(&raw.outputs)?;

    let mut function = FunctionEntry::new(name.clone(), inputs, outputs);
    function.state_mutability = raw.state_mutability;
    Ok(Some(function))
}
