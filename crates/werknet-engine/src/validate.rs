//! Field validation. All rules operate on already-trimmed input; lengths
//! count characters, not bytes.

use crate::error::{EngineError, Result};

pub fn require_non_empty(value: &str, field: &'static str) -> Result<()> {
    if value.is_empty() {
        return Err(EngineError::Empty { field });
    }
    Ok(())
}

pub fn require_max_len(value: &str, field: &'static str, max: usize) -> Result<()> {
    if value.chars().count() > max {
        return Err(EngineError::TooLong { field, max });
    }
    Ok(())
}

/// Structural email check: `local@domain.tld`, no stray dots, TLD of at
/// least two characters.
pub fn require_email(email: &str) -> Result<()> {
    let (local, domain) = email.split_once('@').ok_or(EngineError::InvalidEmail)?;

    if local.is_empty() || local.len() > 64 {
        return Err(EngineError::InvalidEmail);
    }
    if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
        return Err(EngineError::InvalidEmail);
    }

    if domain.is_empty() || !domain.contains('.') {
        return Err(EngineError::InvalidEmail);
    }
    if domain.starts_with('.') || domain.ends_with('.') || domain.contains("..") {
        return Err(EngineError::InvalidEmail);
    }

    let tld = domain.rsplit('.').next().unwrap_or("");
    if tld.len() < 2 {
        return Err(EngineError::InvalidEmail);
    }

    Ok(())
}

/// Normalize a slug: lowercase, spaces to dashes, collapse consecutive
/// dashes, strip leading/trailing dashes.
pub fn normalize_slug(raw: &str) -> String {
    let mut slug = raw.trim().to_lowercase().replace(' ', "-");
    while slug.contains("--") {
        slug = slug.replace("--", "-");
    }
    slug.trim_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_length() {
        assert!(require_non_empty("x", "Name").is_ok());
        assert!(matches!(
            require_non_empty("", "Name").unwrap_err(),
            EngineError::Empty { field: "Name" }
        ));
        assert!(require_max_len("abc", "Name", 3).is_ok());
        assert!(require_max_len("abcd", "Name", 3).is_err());
    }

    #[test]
    fn length_counts_characters() {
        // four characters, more than four bytes
        assert!(require_max_len("éééé", "Name", 4).is_ok());
    }

    #[test]
    fn email_accepts_plain_addresses() {
        for ok in ["alice@a.test", "a.b@sub.domain.nl", "x+tag@shop.co"] {
            assert!(require_email(ok).is_ok(), "{ok}");
        }
    }

    #[test]
    fn email_rejects_malformed() {
        for bad in [
            "no-at-sign",
            "@domain.nl",
            "local@",
            "local@nodot",
            ".dot@a.nl",
            "dot.@a.nl",
            "do..t@a.nl",
            "a@.leading.nl",
            "a@trailing.nl.",
            "a@doub..le.nl",
            "a@tld.x",
        ] {
            assert!(require_email(bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn slug_normalization() {
        assert_eq!(normalize_slug("Alpha Signs"), "alpha-signs");
        assert_eq!(normalize_slug("  --Already-Kebab--  "), "already-kebab");
        assert_eq!(normalize_slug("a    b"), "a-b");
        assert_eq!(normalize_slug("---"), "");
    }
}
