use sha2::{Digest, Sha256};
use std::fmt::Write;

/// One-way digest of a credential string: SHA-256 rendered as uppercase
/// hexadecimal with no separators. Deterministic, so stored hashes are
/// compared byte-for-byte against the hash of a login attempt.
pub fn sha256_hex_upper(input: &str) -> String {
    let digest = Sha256::digest(input.as_bytes());
    let mut out = String::with_capacity(digest.len() * 2);
    for byte in digest {
        // uppercase hex, no separators
        let _ = write!(out, "{byte:02X}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_digest() {
        assert_eq!(
            sha256_hex_upper(""),
            "E3B0C44298FC1C149AFBF4C8996FB92427AE41E4649B934CA495991B7852B855"
        );
    }

    #[test]
    fn known_vector() {
        assert_eq!(
            sha256_hex_upper("abc"),
            "BA7816BF8F01CFEA414140DE5DAE2223B00361A396177A9CB410FF61F20015AD"
        );
    }

    #[test]
    fn deterministic() {
        assert_eq!(sha256_hex_upper("secret"), sha256_hex_upper("secret"));
        assert_ne!(sha256_hex_upper("secret"), sha256_hex_upper("Secret"));
    }
}
