//! ABI type and value definitions

use std::fmt;

use irid_crypto::to_checksum_address;
use irid_primitives::{Address, U256, WORD_SIZE};
use serde::{Serialize, Serializer};

use crate::AbiError;

/// Solidity parameter type, parsed once and then dispatched on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDescriptor {
    /// Unsigned integer with bit width (8, 16, ..., 256)
    Uint(usize),
    /// Signed integer with bit width
    Int(usize),
    /// Address
    Address,
    /// Boolean
    Bool,
    /// Fixed-size bytes (size 1-32)
    FixedBytes(usize),
    /// Dynamic bytes
    Bytes,
    /// UTF-8 string
    String,
    /// Dynamic array
    Array(Box<TypeDescriptor>),
    /// Fixed-size array
    FixedArray(Box<TypeDescriptor>, usize),
    /// Tuple (struct)
    Tuple(Vec<Param>),
}

/// Named slot in a parameter list or tuple
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    /// Parameter name, empty when unnamed
    pub name: String,
    /// Parameter type
    pub ty: TypeDescriptor,
}

impl Param {
    /// Create a named parameter
    pub fn new(name: impl Into<String>, ty: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }

    /// Create an unnamed parameter
    pub fn unnamed(ty: TypeDescriptor) -> Self {
        Self::new(String::new(), ty)
    }

    /// Name for messages: the declared name, or the canonical type when unnamed
    pub fn label(&self) -> String {
        if self.name.is_empty() {
            self.ty.to_string()
        } else {
            self.name.clone()
        }
    }
}

impl TypeDescriptor {
    /// Check if this type is dynamic (variable length)
    pub fn is_dynamic(&self) -> bool {
        match self {
            TypeDescriptor::Bytes | TypeDescriptor::String | TypeDescriptor::Array(_) => true,
            TypeDescriptor::FixedArray(inner, _) => inner.is_dynamic(),
            TypeDescriptor::Tuple(params) => params.iter().any(|p| p.ty.is_dynamic()),
            _ => false,
        }
    }

    /// Check if a value of this type occupies exactly one word
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            TypeDescriptor::Uint(_)
                | TypeDescriptor::Int(_)
                | TypeDescriptor::Address
                | TypeDescriptor::Bool
                | TypeDescriptor::FixedBytes(_)
        )
    }

    /// Bytes this type occupies in the head of an enclosing parameter block,
    /// or `None` when the size overflows `usize`
    pub fn head_size(&self) -> Option<usize> {
        match self {
            TypeDescriptor::FixedArray(inner, size) if !inner.is_dynamic() => {
                inner.head_size()?.checked_mul(*size)
            }
            TypeDescriptor::Tuple(params) if !self.is_dynamic() => params
                .iter()
                .try_fold(0usize, |total, p| total.checked_add(p.ty.head_size()?)),
            _ => Some(WORD_SIZE),
        }
    }

    /// [`head_size`](Self::head_size) as an `InvalidType` error on overflow
    pub(crate) fn checked_head_size(&self) -> Result<usize, AbiError> {
        self.head_size()
            .ok_or_else(|| AbiError::InvalidType(format!("{}: head size overflows", self)))
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Uint(bits) => write!(f, "uint{}", bits),
            TypeDescriptor::Int(bits) => write!(f, "int{}", bits),
            TypeDescriptor::Address => f.write_str("address"),
            TypeDescriptor::Bool => f.write_str("bool"),
            TypeDescriptor::FixedBytes(size) => write!(f, "bytes{}", size),
            TypeDescriptor::Bytes => f.write_str("bytes"),
            TypeDescriptor::String => f.write_str("string"),
            TypeDescriptor::Array(inner) => write!(f, "{}[]", inner),
            TypeDescriptor::FixedArray(inner, size) => write!(f, "{}[{}]", inner, size),
            TypeDescriptor::Tuple(params) => {
                f.write_str("(")?;
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", param.ty)?;
                }
                f.write_str(")")
            }
        }
    }
}

/// Signed 256-bit integer in sign-magnitude form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct I256 {
    /// Absolute value
    pub abs: U256,
    /// Sign (true if negative)
    pub negative: bool,
}

impl I256 {
    /// Create a new I256. Zero is never negative.
    pub fn new(abs: U256, negative: bool) -> Self {
        Self {
            abs,
            negative: negative && !abs.is_zero(),
        }
    }

    /// Create from i128
    pub fn from_i128(value: i128) -> Self {
        Self::new(U256::from(value.unsigned_abs()), value < 0)
    }

    /// Check if zero
    pub fn is_zero(&self) -> bool {
        self.abs.is_zero()
    }
}

impl fmt::Display for I256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            write!(f, "-{}", self.abs)
        } else {
            write!(f, "{}", self.abs)
        }
    }
}

/// Decoded or to-be-encoded ABI value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Address (20 bytes)
    Address(Address),
    /// Unsigned integer (8-256 bits)
    Uint(U256),
    /// Signed integer (8-256 bits)
    Int(I256),
    /// Boolean
    Bool(bool),
    /// Fixed-size bytes (1-32)
    FixedBytes(Vec<u8>),
    /// Dynamic bytes
    Bytes(Vec<u8>),
    /// UTF-8 string
    String(String),
    /// Dynamic array
    Array(Vec<Token>),
    /// Fixed-size array
    FixedArray(Vec<Token>),
    /// Tuple (struct)
    Tuple(Vec<Token>),
}

impl Token {
    /// Short name of the value family, used in mismatch messages
    pub fn kind(&self) -> &'static str {
        match self {
            Token::Address(_) => "address",
            Token::Uint(_) => "uint",
            Token::Int(_) => "int",
            Token::Bool(_) => "bool",
            Token::FixedBytes(_) => "fixed bytes",
            Token::Bytes(_) => "bytes",
            Token::String(_) => "string",
            Token::Array(_) => "array",
            Token::FixedArray(_) => "fixed array",
            Token::Tuple(_) => "tuple",
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Address(addr) => f.write_str(&to_checksum_address(addr)),
            Token::Uint(value) => write!(f, "{}", value),
            Token::Int(value) => write!(f, "{}", value),
            Token::Bool(b) => write!(f, "{}", b),
            Token::FixedBytes(data) | Token::Bytes(data) => write!(f, "0x{}", hex::encode(data)),
            Token::String(s) => f.write_str(s),
            Token::Array(items) | Token::FixedArray(items) => write_list(f, "[", items, "]"),
            Token::Tuple(items) => write_list(f, "(", items, ")"),
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, open: &str, items: &[Token], close: &str) -> fmt::Result {
    f.write_str(open)?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        match item {
            Token::String(s) => write!(f, "{:?}", s)?,
            other => write!(f, "{}", other)?,
        }
    }
    f.write_str(close)
}

impl Serialize for Token {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Token::Address(addr) => serializer.serialize_str(&to_checksum_address(addr)),
            Token::Uint(value) => serializer.collect_str(value),
            Token::Int(value) => serializer.collect_str(value),
            Token::Bool(b) => serializer.serialize_bool(*b),
            Token::FixedBytes(data) | Token::Bytes(data) => {
                serializer.serialize_str(&format!("0x{}", hex::encode(data)))
            }
            Token::String(s) => serializer.serialize_str(s),
            Token::Array(items) | Token::FixedArray(items) | Token::Tuple(items) => {
                serializer.collect_seq(items)
            }
        }
    }
}
