//! Type grammar and signature parsing

use serde::{Deserialize, Serialize};

use crate::types::{Param, TypeDescriptor};
use crate::AbiError;

/// Structured parameter as it appears in an ABI JSON document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParamSpec {
    /// Parameter name
    #[serde(default)]
    pub name: String,
    /// Type string, `tuple` based for structs
    #[serde(rename = "type")]
    pub ty: String,
    /// Tuple components
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components: Option<Vec<ParamSpec>>,
    /// Compiler-level type name, ignored for encoding
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal_type: Option<String>,
}

/// Parse a canonical type string (e.g., "uint256", "(address,bytes)[2]")
pub fn parse_type(s: &str) -> Result<TypeDescriptor, AbiError> {
    let s = s.trim();
    let (base, suffixes) = split_array_suffixes(s)?;
    let base = parse_base(base.trim_end(), s)?;
    let descriptor = apply_suffixes(base, suffixes);
    descriptor.checked_head_size()?;
    Ok(descriptor)
}

/// Parse a structured JSON parameter into a named descriptor
pub fn parse_param(spec: &ParamSpec) -> Result<Param, AbiError> {
    let ty = spec.ty.trim();

    let descriptor = match ty.strip_prefix("tuple") {
        Some(rest) if rest.is_empty() || rest.starts_with('[') => {
            let components = spec.components.as_ref().ok_or_else(|| {
                AbiError::InvalidType(format!("{}: tuple without components", ty))
            })?;
            let params = components
                .iter()
                .map(parse_param)
                .collect::<Result<Vec<_>, _>>()?;
            let (base, suffixes) = split_array_suffixes(ty)?;
            if base != "tuple" {
                return Err(AbiError::InvalidType(ty.to_string()));
            }
            apply_suffixes(TypeDescriptor::Tuple(params), suffixes)
        }
        _ => parse_type(ty)?,
    };
    descriptor.checked_head_size()?;

    Ok(Param::new(spec.name.clone(), descriptor))
}

/// Split a `name(type,...)` signature into its name and input types.
///
/// A trailing `returns (...)` clause is ignored.
pub fn parse_signature(signature: &str) -> Result<(String, Vec<TypeDescriptor>), AbiError> {
    let sig = signature.trim();
    let invalid = || AbiError::InvalidSignature(sig.to_string());

    let open = sig.find('(').ok_or_else(invalid)?;
    let name = sig[..open].trim();
    if !is_identifier(name) {
        return Err(invalid());
    }

    let close = matching_paren(sig, open).ok_or_else(invalid)?;
    let rest = sig[close + 1..].trim();
    if !rest.is_empty() && !rest.starts_with("returns") {
        return Err(invalid());
    }

    let inputs = split_list(&sig[open + 1..close])
        .map_err(|_| invalid())?
        .into_iter()
        .map(parse_type)
        .collect::<Result<Vec<_>, _>>()?;

    Ok((name.to_string(), inputs))
}

fn parse_base(base: &str, full: &str) -> Result<TypeDescriptor, AbiError> {
    let invalid = || AbiError::InvalidType(full.to_string());

    if let Some(inner) = base.strip_prefix('(') {
        let inner = inner.strip_suffix(')').ok_or_else(invalid)?;
        let params = split_list(inner)
            .map_err(|_| invalid())?
            .into_iter()
            .map(|item| parse_type(item).map(Param::unnamed))
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(TypeDescriptor::Tuple(params));
    }

    match base {
        "address" => return Ok(TypeDescriptor::Address),
        "bool" => return Ok(TypeDescriptor::Bool),
        "string" => return Ok(TypeDescriptor::String),
        "bytes" => return Ok(TypeDescriptor::Bytes),
        _ => {}
    }

    // uint<N> / int<N>
    for (prefix, signed) in [("uint", false), ("int", true)] {
        if let Some(rest) = base.strip_prefix(prefix) {
            let bits = if rest.is_empty() {
                256
            } else {
                parse_size(rest).ok_or_else(invalid)?
            };
            if bits == 0 || bits > 256 || bits % 8 != 0 {
                return Err(AbiError::InvalidType(format!(
                    "{}: bit width must be a multiple of 8 between 8 and 256",
                    full
                )));
            }
            return Ok(if signed {
                TypeDescriptor::Int(bits)
            } else {
                TypeDescriptor::Uint(bits)
            });
        }
    }

    // bytes<N>
    if let Some(rest) = base.strip_prefix("bytes") {
        let size = parse_size(rest).ok_or_else(invalid)?;
        if !(1..=32).contains(&size) {
            return Err(AbiError::InvalidType(format!(
                "{}: fixed bytes length must be between 1 and 32",
                full
            )));
        }
        return Ok(TypeDescriptor::FixedBytes(size));
    }

    Err(invalid())
}

/// Digits without a leading zero
fn parse_size(s: &str) -> Option<usize> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) || (s.len() > 1 && s.starts_with('0')) {
        return None;
    }
    s.parse().ok()
}

/// Peel `[k]`/`[]` suffixes off the end, returning them innermost first
fn split_array_suffixes(s: &str) -> Result<(&str, Vec<Option<usize>>), AbiError> {
    let mut base = s;
    let mut suffixes = Vec::new();

    while let Some(without_close) = base.strip_suffix(']') {
        let open = without_close
            .rfind('[')
            .ok_or_else(|| AbiError::InvalidType(s.to_string()))?;
        let digits = &without_close[open + 1..];
        let suffix = if digits.is_empty() {
            None
        } else {
            Some(
                digits
                    .parse::<usize>()
                    .ok()
                    .filter(|_| digits.bytes().all(|b| b.is_ascii_digit()))
                    .ok_or_else(|| AbiError::InvalidType(s.to_string()))?,
            )
        };
        suffixes.push(suffix);
        base = &without_close[..open];
    }

    suffixes.reverse();
    Ok((base, suffixes))
}

fn apply_suffixes(base: TypeDescriptor, suffixes: Vec<Option<usize>>) -> TypeDescriptor {
    suffixes.into_iter().fold(base, |inner, suffix| match suffix {
        None => TypeDescriptor::Array(Box::new(inner)),
        Some(size) => TypeDescriptor::FixedArray(Box::new(inner), size),
    })
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

fn matching_paren(s: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in s.char_indices().skip_while(|(i, _)| *i < open) {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Split a comma-separated list on top-level commas.
///
/// Brackets and parentheses nest; double-quoted sections (with `\` escapes)
/// are opaque. An empty or all-whitespace input yields no items.
pub(crate) fn split_list(inner: &str) -> Result<Vec<&str>, String> {
    if inner.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut items = Vec::new();
    let mut stack: Vec<char> = Vec::new();
    let mut in_quotes = false;
    let mut escaped = false;
    let mut start = 0;

    for (i, c) in inner.char_indices() {
        if in_quotes {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_quotes = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_quotes = true,
            '(' => stack.push(')'),
            '[' => stack.push(']'),
            ')' | ']' => {
                if stack.pop() != Some(c) {
                    return Err(format!("unbalanced '{}' in {}", c, inner));
                }
            }
            ',' if stack.is_empty() => {
                items.push(inner[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }

    if in_quotes || !stack.is_empty() {
        return Err(format!("unterminated list: {}", inner));
    }
    items.push(inner[start..].trim());
    Ok(items)
}
