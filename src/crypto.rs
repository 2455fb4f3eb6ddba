//! Key derivation and authenticated encryption primitives.
//!
//! Two building blocks, each a pure function over its inputs: [`derive_key`]
//! turns a password and a salt into symmetric key material via scrypt, and
//! [`encrypt`]/[`decrypt`] wrap that key material around AES-256-GCM. Neither
//! function retains state between calls; envelope framing (algorithm tags,
//! base64, the on-disk shape) lives in [`crate::store`].

use crate::error::{Result, StashError};
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use rand::RngCore;
use scrypt::{scrypt, Params};
use zeroize::Zeroizing;

/// scrypt cost parameter (2^20 iterations).
pub const SCRYPT_LOG_N: u8 = 20;
/// scrypt block size.
pub const SCRYPT_R: u32 = 8;
/// scrypt parallelization factor.
pub const SCRYPT_P: u32 = 1;

/// Length in bytes of the per-store random salt.
pub const SALT_LEN: usize = 16;
/// Length in bytes of the derived symmetric key (AES-256).
pub const KEY_LEN: usize = 32;
/// Length in bytes of the AES-GCM nonce.
pub const NONCE_LEN: usize = 12;

/// A derived 32-byte key, zeroized on drop.
pub type Key = Zeroizing<[u8; KEY_LEN]>;

/// Generate a fresh random salt for a new store or a password change.
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);
    salt
}

/// Derive a 32-byte AES-256 key from a password and salt via scrypt.
///
/// Parameters are fixed (N=2^20, r=8, p=1) so every store is derived the
/// same way regardless of when it was created; only the salt varies.
pub fn derive_key(password: &str, salt: &[u8]) -> Result<Key> {
    let params = Params::new(SCRYPT_LOG_N, SCRYPT_R, SCRYPT_P, KEY_LEN)
        .map_err(|e| StashError::Internal(format!("invalid scrypt params: {e}")))?;

    let mut out = Zeroizing::new([0u8; KEY_LEN]);
    scrypt(password.as_bytes(), salt, &params, out.as_mut())
        .map_err(|e| StashError::Internal(format!("scrypt key derivation failed: {e}")))?;
    Ok(out)
}

/// Encrypt `plaintext` under `key`, returning a fresh random nonce alongside
/// the ciphertext (which includes the GCM authentication tag).
pub fn encrypt(plaintext: &[u8], key: &Key) -> Result<([u8; NONCE_LEN], Vec<u8>)> {
    let cipher = Aes256Gcm::new_from_slice(key.as_slice())
        .map_err(|e| StashError::Internal(format!("invalid key length: {e}")))?;

    let mut nonce_bytes = [0u8; NONCE_LEN];
    rand::thread_rng().fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext)
        .map_err(|e| StashError::Internal(format!("encryption failed: {e}")))?;

    Ok((nonce_bytes, ciphertext))
}

/// Decrypt `ciphertext` under `key` and `nonce`.
///
/// Fails uniformly on wrong key, tampered ciphertext, or tampered nonce —
/// AES-GCM authentication does not distinguish these cases, and neither do we.
pub fn decrypt(ciphertext: &[u8], key: &Key, nonce: &[u8; NONCE_LEN]) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new_from_slice(key.as_slice())
        .map_err(|e| StashError::Internal(format!("invalid key length: {e}")))?;
    let nonce = Nonce::from_slice(nonce);

    cipher
        .decrypt(nonce, ciphertext)
        .map_err(|_| StashError::WrongPassword)
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose, Engine as _};

    #[test]
    fn derive_key_is_deterministic() {
        let salt = generate_salt();
        let a = derive_key("correct-horse-battery-staple", &salt).unwrap();
        let b = derive_key("correct-horse-battery-staple", &salt).unwrap();
        assert_eq!(*a, *b);
    }

    #[test]
    fn derive_key_differs_on_password_or_salt() {
        let salt_a = generate_salt();
        let salt_b = generate_salt();
        let k1 = derive_key("password-one", &salt_a).unwrap();
        let k2 = derive_key("password-two", &salt_a).unwrap();
        let k3 = derive_key("password-one", &salt_b).unwrap();
        assert_ne!(*k1, *k2);
        assert_ne!(*k1, *k3);
    }

    #[test]
    fn encrypt_decrypt_roundtrip() {
        let salt = generate_salt();
        let key = derive_key("hunter2", &salt).unwrap();
        let plaintext = b"{\"my-token\":\"secret-value\"}";

        let (nonce, ciphertext) = encrypt(plaintext, &key).unwrap();
        let decrypted = decrypt(&ciphertext, &key, &nonce).unwrap();

        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn two_encryptions_differ() {
        let salt = generate_salt();
        let key = derive_key("hunter2", &salt).unwrap();
        let (nonce_a, ct_a) = encrypt(b"same plaintext", &key).unwrap();
        let (nonce_b, ct_b) = encrypt(b"same plaintext", &key).unwrap();
        assert_ne!(nonce_a, nonce_b);
        assert_ne!(ct_a, ct_b);
    }

    #[test]
    fn tampered_ciphertext_is_rejected() {
        let salt = generate_salt();
        let key = derive_key("hunter2", &salt).unwrap();
        let (nonce, mut ciphertext) = encrypt(b"payload", &key).unwrap();
        let last = ciphertext.len() - 1;
        ciphertext[last] ^= 0xFF;
        assert!(decrypt(&ciphertext, &key, &nonce).is_err());
    }

    #[test]
    fn wrong_key_is_rejected() {
        let salt = generate_salt();
        let key = derive_key("hunter2", &salt).unwrap();
        let other_key = derive_key("not-hunter2", &salt).unwrap();
        let (nonce, ciphertext) = encrypt(b"payload", &key).unwrap();
        assert!(decrypt(&ciphertext, &other_key, &nonce).is_err());
    }

    /// Known-vector check: a fixed key/nonce/ciphertext triple must decrypt to
    /// the expected JSON payload, pinning the AES-256-GCM wiring independent
    /// of the scrypt derivation step.
    #[test]
    fn known_vector_decrypts() {
        let key_bytes: [u8; KEY_LEN] = general_purpose::STANDARD
            .decode("GIKHS4/BTgb8u3rM4VECH8dApZlcQfhcpm/UAzY3m0s=")
            .unwrap()
            .try_into()
            .unwrap();
        let key: Key = Zeroizing::new(key_bytes);

        let nonce: [u8; NONCE_LEN] = general_purpose::STANDARD
            .decode("HO9U3SqTuiDfNFaP")
            .unwrap()
            .try_into()
            .unwrap();

        let ciphertext = general_purpose::STANDARD
            .decode("YkabsB3Xkj7XwhjRC6DgrujBLXkXQc4gZi3BXRdwNRdvb2k9RH3j9eQ2Gqw=")
            .unwrap();

        let plaintext = decrypt(&ciphertext, &key, &nonce).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&plaintext).unwrap();
        assert_eq!(value["my-token"], "secret-value");
    }
}
