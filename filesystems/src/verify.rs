// Completeness verification against an expected list of file identifiers

use crate::families::fat::fat16::Inventory;

/// Split a completeness list into identifiers. Tokens are separated by any
/// whitespace and keep their order; duplicates are kept.
pub fn parse_completeness_list(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationReport {
    pub expected: usize,
    pub missing: Vec<String>,
}

impl VerificationReport {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

pub fn verify_completeness(inventory: &Inventory, expected: &[String]) -> VerificationReport {
    VerificationReport {
        expected: expected.len(),
        missing: inventory.missing_from(expected),
    }
}
