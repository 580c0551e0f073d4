use crate::error::{AbookError, AbookResult};

/// Validates that a string is not blank (empty or whitespace-only).
/// Returns the trimmed string on success.
pub fn non_blank(value: &str, field: &str) -> AbookResult<String> {
    let trimmed = value.trim().to_string();
    if trimmed.is_empty() {
        Err(AbookError::BlankField {
            field: field.to_string(),
        })
    } else {
        Ok(trimmed)
    }
}

/// Trims an optional string, returning None if blank.
pub fn trim_optional(value: Option<&str>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_blank_returns_trimmed_value() {
        assert_eq!(non_blank("  张三  ", "name").unwrap(), "张三");
    }

    #[test]
    fn non_blank_keeps_interior_whitespace() {
        assert_eq!(non_blank("Alice Smith", "name").unwrap(), "Alice Smith");
    }

    #[test]
    fn non_blank_rejects_empty_and_whitespace() {
        assert!(non_blank("", "name").is_err());
        assert!(non_blank("   ", "name").is_err());
    }

    #[test]
    fn non_blank_names_the_field_in_the_error() {
        let err = non_blank(" ", "value").unwrap_err();
        assert_eq!(err.to_string(), "value cannot be blank");
    }

    #[test]
    fn trim_optional_drops_blank_input() {
        assert_eq!(trim_optional(Some("  工作  ")), Some("工作".to_string()));
        assert_eq!(trim_optional(Some("   ")), None);
        assert_eq!(trim_optional(None), None);
    }
}
