//! Symmetric encryption of injectable payloads.
//!
//! AES-256-CBC with a SHA-256 normalized key. Wire format is
//! `base64( iv || "::" || base64(ciphertext) )` — the inner ciphertext is
//! itself base64 text, the IV is raw bytes. Decryption is all-or-nothing;
//! no error path ever exposes partial plaintext.

use crate::DevpayrError;
use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use base64::{engine::general_purpose::STANDARD, Engine};
use rand::{rngs::OsRng, RngCore};
use sha2::{Digest, Sha256};

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// AES block size; also the IV length.
pub const IV_LEN: usize = 16;

/// Byte sequence separating the IV from the ciphertext inside the token.
const SEPARATOR: &[u8] = b"::";

/// Normalize an arbitrary-length secret to a 256-bit key.
///
/// The secret is never used as key material directly.
fn derive_key(secret: &str) -> [u8; 32] {
    Sha256::digest(secret.as_bytes()).into()
}

/// Encrypt plaintext into the DevPayr token format.
///
/// Generates a fresh random IV per call, so two encryptions of the same
/// plaintext produce different tokens.
pub fn encrypt(plaintext: &[u8], secret: &str) -> String {
    let key = derive_key(secret);
    let mut iv = [0u8; IV_LEN];
    OsRng.fill_bytes(&mut iv);

    let ciphertext =
        Aes256CbcEnc::new(&key.into(), &iv.into()).encrypt_padded_vec_mut::<Pkcs7>(plaintext);
    let inner = STANDARD.encode(ciphertext);

    let mut wire = Vec::with_capacity(IV_LEN + SEPARATOR.len() + inner.len());
    wire.extend_from_slice(&iv);
    wire.extend_from_slice(SEPARATOR);
    wire.extend_from_slice(inner.as_bytes());

    STANDARD.encode(wire)
}

/// Decrypt a DevPayr token back to plaintext.
///
/// # Errors
/// - `DecodeError` — malformed base64 (outer or inner) or missing/empty
///   `"::"` separator, or an IV of the wrong length
/// - `DecryptionError` — cipher failure (wrong key, corrupt data,
///   padding mismatch)
pub fn decrypt(token: &str, secret: &str) -> Result<Vec<u8>, DevpayrError> {
    let decoded = STANDARD
        .decode(token.trim())
        .map_err(|e| DevpayrError::DecodeError(format!("invalid base64 token: {e}")))?;

    // Split on the FIRST separator occurrence.
    let sep_pos = decoded
        .windows(SEPARATOR.len())
        .position(|w| w == SEPARATOR)
        .ok_or_else(|| {
            DevpayrError::DecodeError("invalid token format, expected 'iv::ciphertext'".to_string())
        })?;

    let iv_bytes = &decoded[..sep_pos];
    let inner = &decoded[sep_pos + SEPARATOR.len()..];
    if iv_bytes.is_empty() || inner.is_empty() {
        return Err(DevpayrError::DecodeError(
            "invalid token format, expected 'iv::ciphertext'".to_string(),
        ));
    }

    let iv: [u8; IV_LEN] = iv_bytes.try_into().map_err(|_| {
        DevpayrError::DecodeError(format!("IV must be {IV_LEN} bytes, got {}", iv_bytes.len()))
    })?;

    let ciphertext = STANDARD
        .decode(inner)
        .map_err(|e| DevpayrError::DecodeError(format!("invalid base64 ciphertext: {e}")))?;

    let key = derive_key(secret);
    Aes256CbcDec::new(&key.into(), &iv.into())
        .decrypt_padded_vec_mut::<Pkcs7>(&ciphertext)
        .map_err(|_| DevpayrError::DecryptionError)
}
