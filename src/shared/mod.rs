//! Shared layer - response types, constants and validation helpers

pub mod constants;
pub mod types;
pub mod validation;

#[cfg(test)]
pub mod test_helpers;
