use lazy_static::lazy_static;
use regex::Regex;

use crate::core::error::{AppError, Result};

lazy_static! {
    /// Regex for phone numbers used as citizen document ids
    /// Optional leading '+', then 7 to 15 digits
    /// - Valid: "+923001234567", "03001234567"
    /// - Invalid: "123", "+92 300 1234567", "phone"
    pub static ref PHONE_REGEX: Regex = Regex::new(r"^\+?[0-9]{7,15}$").unwrap();

    /// Regex for department colors
    /// - Valid: "#22c55e", "#FFF"
    /// - Invalid: "22c55e", "#22c55", "green"
    pub static ref HEX_COLOR_REGEX: Regex =
        Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").unwrap();
}

/// Trim a required text field, rejecting it when nothing is left
pub fn require_non_empty(value: &str, label: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{} cannot be empty", label)));
    }
    Ok(trimmed.to_string())
}

/// Trim an optional text field, mapping blank values to `None`
pub fn trim_to_option(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_regex() {
        assert!(PHONE_REGEX.is_match("+923001234567"));
        assert!(PHONE_REGEX.is_match("03001234567"));
        assert!(!PHONE_REGEX.is_match("123"));
        assert!(!PHONE_REGEX.is_match("+92 300 1234567"));
        assert!(!PHONE_REGEX.is_match(""));
    }

    #[test]
    fn test_hex_color_regex() {
        assert!(HEX_COLOR_REGEX.is_match("#22c55e"));
        assert!(HEX_COLOR_REGEX.is_match("#FFF"));
        assert!(!HEX_COLOR_REGEX.is_match("22c55e"));
        assert!(!HEX_COLOR_REGEX.is_match("#22c55"));
        assert!(!HEX_COLOR_REGEX.is_match("green"));
    }

    #[test]
    fn test_require_non_empty() {
        assert_eq!(require_non_empty("  Leak  ", "Title").unwrap(), "Leak");
        let err = require_non_empty("   ", "Title").unwrap_err();
        assert!(matches!(err, AppError::Validation(ref msg) if msg == "Title cannot be empty"));
    }

    #[test]
    fn test_trim_to_option() {
        assert_eq!(trim_to_option(Some(" 0300 ")), Some("0300".to_string()));
        assert_eq!(trim_to_option(Some("   ")), None);
        assert_eq!(trim_to_option(None), None);
    }
}
