//! Function selectors and selector lookup

use irid_crypto::keccak256;

use crate::document::{AbiDocument, FunctionEntry};
use crate::parser::parse_signature;
use crate::types::TypeDescriptor;
use crate::AbiError;

/// 4-byte function selector
pub type Selector = [u8; 4];

/// Canonical signature string, e.g. `transfer(address,uint256)`
pub fn canonical_signature<'a, I>(name: &str, inputs: I) -> String
where
    I: IntoIterator<Item = &'a TypeDescriptor>,
{
    let types: Vec<String> = inputs.into_iter().map(|ty| ty.to_string()).collect();
    format!("{}({})", name, types.join(","))
}

/// Compute function selector (first 4 bytes of keccak256 of the canonical signature)
pub fn compute_selector<'a, I>(name: &str, inputs: I) -> Selector
where
    I: IntoIterator<Item = &'a TypeDescriptor>,
{
    selector_of(&canonical_signature(name, inputs))
}

/// Normalize a signature written by hand and compute its selector.
///
/// Returns the canonical signature alongside the selector, so `uint` and
/// `uint256` spellings yield identical results.
pub fn selector_from_signature(signature: &str) -> Result<(String, Selector), AbiError> {
    let (name, inputs) = parse_signature(signature)?;
    let canonical = canonical_signature(&name, &inputs);
    let selector = selector_of(&canonical);
    Ok((canonical, selector))
}

/// Lowercase `0x`-prefixed selector
pub fn selector_hex(selector: &Selector) -> String {
    format!("0x{}", hex::encode(selector))
}

fn selector_of(canonical: &str) -> Selector {
    let hash = keccak256(canonical.as_bytes());
    let mut selector = [0u8; 4];
    selector.copy_from_slice(&hash.as_bytes()[..4]);
    selector
}

/// Outcome of a selector lookup
#[derive(Debug, Clone)]
pub struct Resolution<'a> {
    /// First matching entry in document order
    pub entry: &'a FunctionEntry,
    /// Later entries sharing the same selector
    pub shadowed: Vec<&'a FunctionEntry>,
}

impl Resolution<'_> {
    /// Check if more than one entry matched
    pub fn is_ambiguous(&self) -> bool {
        !self.shadowed.is_empty()
    }
}

/// Find the entry whose computed selector matches.
///
/// Collisions are legal; the first entry in declared order wins and the rest
/// are reported in [`Resolution::shadowed`].
pub fn resolve_by_selector<'a>(
    selector: &Selector,
    document: &'a AbiDocument,
) -> Option<Resolution<'a>> {
    let mut matches = document
        .functions()
        .iter()
        .filter(|entry| entry.selector() == *selector);

    let entry = matches.next()?;
    Some(Resolution {
        entry,
        shadowed: matches.collect(),
    })
}
