//! Free-text normalization shared by the request types.

/// Trim, mapping blank input to `None`.
pub fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Whether `value` is empty once trimmed.
pub fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional() {
        assert_eq!(optional(Some("  ana ".into())), Some("ana".to_string()));
        assert_eq!(optional(Some("   ".into())), None);
        assert_eq!(optional(None), None);
        assert!(is_blank(Some(" \t")));
        assert!(!is_blank(Some("x")));
    }
}
