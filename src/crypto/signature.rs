//! Keyed-hash integrity signatures for injectable ciphertext.
//!
//! Signatures are HMAC-SHA256 over the exact transmitted ciphertext text,
//! computed before any decryption. Callers must sign and verify the same
//! representation that goes over the wire.

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Compute an HMAC-SHA256 signature, returned as lowercase hex.
pub fn sign(content: &[u8], secret: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts keys of any length");
    mac.update(content);
    hex::encode(mac.finalize().into_bytes())
}

/// Verify an HMAC-SHA256 signature in constant time.
///
/// Malformed hex or a length mismatch yields `false`, not an error.
pub fn verify(content: &[u8], secret: &str, signature: &str) -> bool {
    let Ok(claimed) = hex::decode(signature.trim()) else {
        return false;
    };

    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts keys of any length");
    mac.update(content);
    let expected = mac.finalize().into_bytes();

    if claimed.len() != expected.len() {
        return false;
    }
    expected.ct_eq(claimed.as_slice()).into()
}

/// SHA-256 hash of content as lowercase hex.
pub fn sha256_hex(content: &[u8]) -> String {
    hex::encode(Sha256::digest(content))
}

/// Check content against an expected SHA-256 hex hash in constant time.
pub fn verify_sha256_hex(content: &[u8], expected_hex: &str) -> bool {
    let Ok(expected) = hex::decode(expected_hex.trim()) else {
        return false;
    };
    let computed = Sha256::digest(content);
    if expected.len() != computed.len() {
        return false;
    }
    computed.as_slice().ct_eq(expected.as_slice()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_verify_roundtrip() {
        let sig = sign(b"ciphertext bytes", "secret");
        assert!(verify(b"ciphertext bytes", "secret", &sig));
    }

    #[test]
    fn test_verify_rejects_different_content() {
        let sig = sign(b"original", "secret");
        assert!(!verify(b"tampered", "secret", &sig));
    }

    #[test]
    fn test_verify_rejects_different_secret() {
        let sig = sign(b"content", "secret-a");
        assert!(!verify(b"content", "secret-b", &sig));
    }

    #[test]
    fn test_verify_rejects_malformed_hex() {
        assert!(!verify(b"content", "secret", "zz-not-hex"));
    }

    #[test]
    fn test_verify_rejects_truncated_signature() {
        let sig = sign(b"content", "secret");
        assert!(!verify(b"content", "secret", &sig[..32]));
    }

    #[test]
    fn test_signature_is_hex_sha256_sized() {
        let sig = sign(b"content", "secret");
        assert_eq!(sig.len(), 64);
        assert!(sig.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_sha256_hex_known_vector() {
        // SHA-256 of the empty string
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_verify_sha256_hex() {
        let hash = sha256_hex(b"payload");
        assert!(verify_sha256_hex(b"payload", &hash));
        assert!(!verify_sha256_hex(b"other", &hash));
        assert!(!verify_sha256_hex(b"payload", "not hex"));
    }
}
