//! On-disk envelope format and atomic read/write of the encrypted store file.

use crate::crypto::{NONCE_LEN, SALT_LEN};
use crate::error::{Result, StashError};
use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::Path;

#[cfg(unix)]
use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

#[derive(Debug, Serialize, Deserialize)]
struct KdfSection {
    algorithm: String,
    salt: String,
    n: u32,
    r: u32,
    p: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct EncryptionSection {
    algorithm: String,
    nonce: String,
    ciphertext: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    kdf: KdfSection,
    encryption: EncryptionSection,
}

/// The raw material of an envelope: the salt used to derive the key, plus
/// the nonce and ciphertext produced by [`crate::crypto::encrypt`].
pub struct EnvelopeData {
    pub salt: [u8; SALT_LEN],
    pub nonce: [u8; NONCE_LEN],
    pub ciphertext: Vec<u8>,
}

/// Read and parse the envelope at `path`. Fails with [`StashError::NotInitialized`]
/// if the file does not exist, or [`StashError::Corrupted`] if it cannot be parsed.
pub fn read(path: &Path) -> Result<EnvelopeData> {
    if !path.exists() {
        return Err(StashError::NotInitialized);
    }

    let content = fs::read_to_string(path)?;
    let envelope: Envelope = serde_json::from_str(&content)
        .map_err(|e| StashError::Corrupted(format!("malformed envelope: {e}")))?;

    if envelope.kdf.algorithm != "scrypt" {
        return Err(StashError::Corrupted(format!(
            "unsupported kdf algorithm: {}",
            envelope.kdf.algorithm
        )));
    }
    if envelope.encryption.algorithm != "aes-256-gcm" {
        return Err(StashError::Corrupted(format!(
            "unsupported encryption algorithm: {}",
            envelope.encryption.algorithm
        )));
    }

    let salt = decode_fixed::<SALT_LEN>(&envelope.kdf.salt, "salt")?;
    let nonce = decode_fixed::<NONCE_LEN>(&envelope.encryption.nonce, "nonce")?;
    let ciphertext = general_purpose::STANDARD
        .decode(&envelope.encryption.ciphertext)
        .map_err(|e| StashError::Corrupted(format!("malformed ciphertext: {e}")))?;

    Ok(EnvelopeData {
        salt,
        nonce,
        ciphertext,
    })
}

fn decode_fixed<const N: usize>(encoded: &str, field: &str) -> Result<[u8; N]> {
    let bytes = general_purpose::STANDARD
        .decode(encoded)
        .map_err(|e| StashError::Corrupted(format!("malformed {field}: {e}")))?;
    bytes
        .try_into()
        .map_err(|_| StashError::Corrupted(format!("unexpected {field} length")))
}

/// Write the envelope atomically: render to a sibling temp file opened with
/// owner-only permissions, then rename over `path`. The parent directory is
/// expected to already exist with mode 0700 (see [`crate::stash::Stash::init`]).
pub fn write(path: &Path, data: &EnvelopeData) -> Result<()> {
    let envelope = Envelope {
        kdf: KdfSection {
            algorithm: "scrypt".to_string(),
            salt: general_purpose::STANDARD.encode(data.salt),
            n: 1u32 << crate::crypto::SCRYPT_LOG_N,
            r: crate::crypto::SCRYPT_R,
            p: crate::crypto::SCRYPT_P,
        },
        encryption: EncryptionSection {
            algorithm: "aes-256-gcm".to_string(),
            nonce: general_purpose::STANDARD.encode(data.nonce),
            ciphertext: general_purpose::STANDARD.encode(&data.ciphertext),
        },
    };

    let rendered = serde_json::to_string_pretty(&envelope)
        .map_err(|e| StashError::Internal(format!("failed to serialize envelope: {e}")))?;

    let tmp_path = path.with_extension("tmp");

    #[cfg(unix)]
    {
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(&tmp_path)?;
        file.write_all(rendered.as_bytes())?;
        file.sync_all()?;
    }

    #[cfg(not(unix))]
    {
        fs::write(&tmp_path, rendered.as_bytes())?;
    }

    fs::rename(&tmp_path, path)?;

    #[cfg(unix)]
    {
        let mut perms = fs::metadata(path)?.permissions();
        perms.set_mode(0o600);
        fs::set_permissions(path, perms)?;
    }

    Ok(())
}

/// Ensure `dir` exists with mode 0700, creating it (and parents) if needed.
pub fn ensure_data_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }

    #[cfg(unix)]
    {
        let mut perms = fs::metadata(dir)?.permissions();
        perms.set_mode(0o700);
        fs::set_permissions(dir, perms)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample() -> EnvelopeData {
        EnvelopeData {
            salt: [7u8; SALT_LEN],
            nonce: [9u8; NONCE_LEN],
            ciphertext: vec![1, 2, 3, 4, 5],
        }
    }

    #[test]
    fn write_then_read_roundtrips() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stash.json");

        let data = sample();
        write(&path, &data).unwrap();

        let read_back = read(&path).unwrap();
        assert_eq!(read_back.salt, data.salt);
        assert_eq!(read_back.nonce, data.nonce);
        assert_eq!(read_back.ciphertext, data.ciphertext);
    }

    #[test]
    fn missing_file_is_not_initialized() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stash.json");
        assert!(matches!(read(&path), Err(StashError::NotInitialized)));
    }

    #[test]
    #[cfg(unix)]
    fn write_sets_owner_only_permissions() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stash.json");
        write(&path, &sample()).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn corrupted_envelope_is_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stash.json");
        fs::write(&path, b"not json").unwrap();
        assert!(matches!(read(&path), Err(StashError::Corrupted(_))));
    }
}
