pub mod ip;
pub mod url_validator;

/// 短链接名称允许的最大长度
pub const MAX_LINK_NAME_LENGTH: usize = 512;

/// 名称只允许 `[a-zA-Z0-9_-]`，且非空、不超过最大长度
pub fn is_valid_link_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= MAX_LINK_NAME_LENGTH
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_link_names() {
        assert!(is_valid_link_name("abc123"));
        assert!(is_valid_link_name("my-link_2"));
        assert!(is_valid_link_name(&"a".repeat(MAX_LINK_NAME_LENGTH)));
    }

    #[test]
    fn test_invalid_link_names() {
        assert!(!is_valid_link_name(""));
        assert!(!is_valid_link_name("has space"));
        assert!(!is_valid_link_name("slash/inside"));
        assert!(!is_valid_link_name("ümlaut"));
        assert!(!is_valid_link_name(&"a".repeat(MAX_LINK_NAME_LENGTH + 1)));
    }
}
