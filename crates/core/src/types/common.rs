//! Shared traits and utilities for the domain models

/// Trait for types that can validate themselves
pub trait Validator {
    /// Validates the instance and returns errors if invalid
    fn validate(&self) -> Result<(), Vec<String>>;

    /// Returns true if the instance is valid
    fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

/// Splits a `;`-delimited list of names into trimmed, non-empty parts
///
/// Author and publisher fields store multiple names in a single string
/// separated by `;`. Whitespace around each name is insignificant.
pub fn split_names(text: &str) -> Vec<String> {
    text.split(';')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

/// Joins names back into the canonical `"; "`-delimited form
///
/// `join_names(&split_names(x))` yields the normalized form of `x`.
pub fn join_names(names: &[String]) -> String {
    names.join("; ")
}
