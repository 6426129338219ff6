/*
 * Responsibility
 * - Constant-time string equality for credential checks
 * - Exposed on its own so custom authorizers can build on it
 */
use subtle::{Choice, ConstantTimeEq};

/// Compare two strings for equality in constant time.
///
/// Both inputs are copied into zero-filled buffers sized from `a`'s byte length,
/// then compared with `subtle`. The result also requires equal byte lengths, so
/// `b` being a prefix or an extension of `a` never matches.
///
/// Running time depends on the lengths only, never on where the inputs differ.
pub fn safe_compare(a: &str, b: &str) -> bool {
    ct_compare(a, b).into()
}

/// Same as [`safe_compare`], but returns a [`Choice`] so callers can keep
/// combining results without branching.
pub fn ct_compare(a: &str, b: &str) -> Choice {
    let a = a.as_bytes();
    let b = b.as_bytes();
    let len = a.len();

    let mut left = vec![0u8; len];
    let mut right = vec![0u8; len];
    left.copy_from_slice(a);
    // b shorter: tail stays zero, b longer: truncated to len
    let n = b.len().min(len);
    right[..n].copy_from_slice(&b[..n]);

    let bytes_match = left.as_slice().ct_eq(right.as_slice());
    let len_match = (a.len() as u64).ct_eq(&(b.len() as u64));

    bytes_match & len_match
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_strings_match() {
        for s in ["", "a", "Admin", "secret1234", "pässwörd", "🔑 key"] {
            assert!(safe_compare(s, s), "{s:?} should equal itself");
        }
    }

    #[test]
    fn empty_strings_match() {
        assert!(safe_compare("", ""));
    }

    #[test]
    fn extension_does_not_match() {
        assert!(!safe_compare("secret", "secretx"));
        assert!(!safe_compare("", "x"));
    }

    #[test]
    fn prefix_does_not_match() {
        assert!(!safe_compare("secret1234", "secret"));
        assert!(!safe_compare("x", ""));
    }

    #[test]
    fn same_length_different_bytes_do_not_match() {
        assert!(!safe_compare("secret", "secreT"));
        assert!(!safe_compare("aaaa", "baaa"));
    }

    #[test]
    fn zero_padding_is_not_confused_with_nul_bytes() {
        // b shorter than a leaves zeros in the buffer; the length check must still fail
        assert!(!safe_compare("ab\0", "ab"));
        assert!(!safe_compare("ab", "ab\0"));
    }

    #[test]
    fn unicode_is_compared_by_bytes() {
        // same char count, different byte length
        assert!(!safe_compare("é", "e"));
        assert!(!safe_compare("e", "é"));
    }

    #[test]
    fn choice_composes_like_bool() {
        let both = ct_compare("user", "user") & ct_compare("pass", "pass");
        assert!(bool::from(both));

        let one = ct_compare("user", "user") & ct_compare("pass", "nope");
        assert!(!bool::from(one));
    }
}
