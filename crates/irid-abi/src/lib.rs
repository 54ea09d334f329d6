//! # irid-abi
//!
//! Solidity ABI calldata transcoding for the Iridescia dashboard.
//!
//! This crate provides:
//! - Parsing type strings and JSON ABI parameters into [`TypeDescriptor`]s
//! - Single-word scalar encoding and decoding
//! - Head/tail encoding and decoding of parameter lists
//! - Function selector computation and lookup
//! - The [`decode`] and [`encode`] entry points front ends call
//!
//! Every operation is a pure function of its inputs.
//!
//! # Example
//!
//! ```rust
//! use irid_abi::{decode, encode};
//!
//! let calldata = encode(
//!     "transfer(address,uint256)",
//!     &["0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045", "1000000000000000000"],
//! )
//! .unwrap();
//! assert!(calldata.starts_with("0xa9059cbb"));
//!
//! let abi = r#"[{"name":"transfer","type":"function",
//!     "inputs":[{"name":"to","type":"address"},{"name":"amount","type":"uint256"}],
//!     "outputs":[{"name":"","type":"bool"}]}]"#;
//! let call = decode(&calldata, abi).unwrap();
//! assert_eq!(call.function_name, "transfer");
//! assert_eq!(call.parameters[1].value.to_string(), "1000000000000000000");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod coerce;
mod decode;
mod document;
mod encode;
mod error;
mod parser;
mod selector;
mod tool;
mod types;
mod word;

pub use coerce::coerce_value;
pub use decode::decode_parameters;
pub use document::{AbiDocument, FunctionEntry};
pub use encode::encode_parameters;
pub use error::AbiError;
pub use parser::{parse_param, parse_signature, parse_type, ParamSpec};
pub use selector::{
    canonical_signature, compute_selector, resolve_by_selector, selector_from_signature,
    selector_hex, Resolution, Selector,
};
pub use tool::{
    decode, decode_calldata, encode, parse_calldata_hex, DecodedCall, DecodedParameter,
    EncodeRequest, EncodedCall,
};
pub use types::{I256, Param, Token, TypeDescriptor};
pub use word::{decode_scalar, encode_scalar};
