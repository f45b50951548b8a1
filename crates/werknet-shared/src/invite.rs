use rand::Rng;

use crate::error::SharedError;

/// Unambiguous charset for invite codes (no 0/O/1/I).
pub const ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Number of code characters, excluding dashes.
pub const CODE_CHARS: usize = 16;

/// Characters per dash-separated group.
const GROUP: usize = 4;

/// Generate a random code in canonical `XXXX-XXXX-XXXX-XXXX` form.
///
/// Uniqueness is the caller's concern; the code space is 32^16, so the
/// expected number of rejection-sampling retries is effectively zero.
pub fn generate<R: Rng>(rng: &mut R) -> String {
    let mut code = String::with_capacity(CODE_CHARS + 3);
    for i in 0..CODE_CHARS {
        if i > 0 && i % GROUP == 0 {
            code.push('-');
        }
        let idx = rng.gen_range(0..ALPHABET.len());
        code.push(ALPHABET[idx] as char);
    }
    code
}

/// Canonicalize a user-submitted code: trim, uppercase, accept input with or
/// without dashes, and re-insert dashes at the group boundaries.
pub fn canonicalize(raw: &str) -> Result<String, SharedError> {
    let compact: String = raw
        .trim()
        .chars()
        .filter(|c| *c != '-')
        .map(|c| c.to_ascii_uppercase())
        .collect();

    if compact.len() != CODE_CHARS {
        return Err(SharedError::InvalidInviteCode);
    }
    if !compact.bytes().all(|b| ALPHABET.contains(&b)) {
        return Err(SharedError::InvalidInviteCode);
    }

    let mut code = String::with_capacity(CODE_CHARS + 3);
    for (i, c) in compact.chars().enumerate() {
        if i > 0 && i % GROUP == 0 {
            code.push('-');
        }
        code.push(c);
    }
    Ok(code)
}

/// Check that a code is already in canonical `XXXX-XXXX-XXXX-XXXX` form.
pub fn is_canonical(code: &str) -> bool {
    let parts: Vec<&str> = code.split('-').collect();
    parts.len() == 4
        && parts
            .iter()
            .all(|p| p.len() == GROUP && p.bytes().all(|b| ALPHABET.contains(&b)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_codes_are_canonical() {
        let mut rng = rand::thread_rng();
        for _ in 0..100 {
            let code = generate(&mut rng);
            assert!(is_canonical(&code), "bad code: {code}");
            assert_eq!(canonicalize(&code).unwrap(), code);
        }
    }

    #[test]
    fn canonicalize_accepts_dashless_lowercase() {
        let code = canonicalize("abcdefghjklmnpqr").unwrap();
        assert_eq!(code, "ABCD-EFGH-JKLM-NPQR");
    }

    #[test]
    fn canonicalize_accepts_surrounding_whitespace() {
        let code = canonicalize("  ABCD-EFGH-JKLM-NPQR  ").unwrap();
        assert_eq!(code, "ABCD-EFGH-JKLM-NPQR");
    }

    #[test]
    fn canonicalize_rejects_ambiguous_chars() {
        // 0, O, 1 and I are excluded from the alphabet
        assert!(canonicalize("ABCD-EFGH-JKLM-NP0R").is_err());
        assert!(canonicalize("ABCD-EFGH-JKLM-NPOR").is_err());
        assert!(canonicalize("ABCD-EFGH-JKLM-NP1R").is_err());
        assert!(canonicalize("ABCD-EFGH-JKLM-NPIR").is_err());
    }

    #[test]
    fn canonicalize_rejects_wrong_length() {
        assert!(canonicalize("ABCD-EFGH-JKLM").is_err());
        assert!(canonicalize("ABCD-EFGH-JKLM-NPQR-STUV").is_err());
        assert!(canonicalize("").is_err());
    }
}
