//! Credential hashing shared by the server's login path and the seed
//! tooling. Only the digest is ever persisted.

use std::fmt::Write;

use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 digest of the input.
#[must_use]
pub fn sha256_hex(input: &str) -> String {
    let digest = Sha256::digest(input.as_bytes());
    let mut out = String::with_capacity(digest.len() * 2);
    for byte in digest {
        let _ = write!(out, "{byte:02x}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_matches_known_vector() {
        // sha256("abc")
        assert_eq!(
            sha256_hex("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn digest_is_stable_and_hex_lowercase() {
        let d = sha256_hex("moonlight2024");
        assert_eq!(d.len(), 64);
        assert_eq!(d, d.to_lowercase());
        assert_eq!(d, sha256_hex("moonlight2024"));
    }
}
