//! ABI encode/decode commands

use std::path::Path;

use clap::Subcommand;
use irid_abi::{decode, selector_from_signature, selector_hex, DecodedCall, EncodeRequest};

use crate::{output::Output, CliError};

/// ABI subcommands
#[derive(Debug, Subcommand)]
pub enum AbiCommand {
    /// Decode calldata against a JSON ABI
    Decode {
        /// 0x-prefixed calldata
        calldata: String,
        /// ABI file path, or inline ABI JSON
        #[arg(long)]
        abi: String,
    },
    /// Encode calldata from a signature and one value per input
    Encode {
        /// Function signature, e.g. "transfer(address,uint256)"
        signature: String,
        /// Argument values; arrays and tuples use [a,b] and (a,b)
        #[arg(allow_hyphen_values = true)]
        values: Vec<String>,
    },
    /// Compute the 4-byte selector of a signature
    Selector {
        /// Function signature
        signature: String,
    },
}

impl AbiCommand {
    pub fn execute(self, json: bool) -> Result<(), CliError> {
        match self {
            AbiCommand::Decode { calldata, abi } => decode_calldata(&calldata, &abi, json),
            AbiCommand::Encode { signature, values } => encode_call(&signature, &values, json),
            AbiCommand::Selector { signature } => show_selector(&signature, json),
        }
    }
}

fn decode_calldata(calldata: &str, abi: &str, json: bool) -> Result<(), CliError> {
    let abi_json = read_abi(abi)?;
    let call = decode(calldata, &abi_json)?;

    Output::from_serialize(json, &call)?
        .message(&format_call(&call))
        .print();

    Ok(())
}

fn encode_call(signature: &str, values: &[String], json: bool) -> Result<(), CliError> {
    let call = EncodeRequest::new(signature, values).execute()?;

    Output::from_serialize(json, &call)?
        .message(&format!(
            "{}\nSelector: {} ({})\nLength: {} bytes",
            call.calldata, call.selector_hex, call.signature, call.byte_length
        ))
        .print();

    Ok(())
}

fn show_selector(signature: &str, json: bool) -> Result<(), CliError> {
    let (canonical, selector) = selector_from_signature(signature)?;
    let selector = selector_hex(&selector);

    Output::new(json)
        .field("signature", &canonical)
        .field("selectorHex", &selector)
        .message(&format!("{}  {}", selector, canonical))
        .print();

    Ok(())
}

/// An existing file path is read, anything else is taken as inline JSON
fn read_abi(abi: &str) -> Result<String, CliError> {
    let path = Path::new(abi);
    if path.is_file() {
        tracing::debug!(path = %path.display(), "reading ABI file");
        Ok(std::fs::read_to_string(path)?)
    } else {
        Ok(abi.to_string())
    }
}

fn format_call(call: &DecodedCall) -> String {
    let mut lines = vec![
        format!("Function: {}", call.signature),
        format!("Selector: {}", call.selector_hex),
    ];
    for (i, param) in call.parameters.iter().enumerate() {
        let name = if param.name.is_empty() { "_" } else { param.name.as_str() };
        lines.push(format!("  [{}] {} ({}): {}", i, name, param.type_string, param.value));
    }
    for warning in &call.warnings {
        lines.push(format!("Warning: {}", warning));
    }
    lines.join("\n")
}
