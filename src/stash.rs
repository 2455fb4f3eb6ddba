//! The stash engine: the in-memory secret table gated by lock/unlock.
//!
//! Modeled as a tagged enum rather than three nullable fields, so "locked"
//! and "unlocked" are distinct types at compile time instead of a runtime
//! convention that the key, salt, and secrets are all present or all absent
//! together.

use crate::crypto::{self, Key};
use crate::error::{Result, StashError};
use crate::store::{self, EnvelopeData};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use zeroize::Zeroize;

enum StashState {
    Locked,
    Unlocked {
        key: Key,
        salt: [u8; crypto::SALT_LEN],
        secrets: BTreeMap<String, String>,
    },
}

/// The stash engine. Owns the path to the on-disk envelope and the current
/// lock state; one instance is created per daemon process.
pub struct Stash {
    path: PathBuf,
    state: StashState,
}

impl Stash {
    /// Open a stash bound to the envelope at `path`. Does not touch disk;
    /// the stash starts locked regardless of whether `path` exists yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Stash {
            path: path.into(),
            state: StashState::Locked,
        }
    }

    pub fn is_unlocked(&self) -> bool {
        matches!(self.state, StashState::Unlocked { .. })
    }

    /// Create a new, empty store protected by `password`.
    ///
    /// Fails with [`StashError::AlreadyInitialized`] if an envelope already
    /// exists, or [`StashError::EmptyPassword`] if `password` is empty.
    /// Does not change the in-memory lock state.
    pub fn init(&self, password: &str) -> Result<()> {
        if self.path.exists() {
            return Err(StashError::AlreadyInitialized);
        }
        if password.is_empty() {
            return Err(StashError::EmptyPassword);
        }

        if let Some(parent) = self.path.parent() {
            store::ensure_data_dir(parent)?;
        }

        let salt = crypto::generate_salt();
        let key = crypto::derive_key(password, &salt)?;
        let plaintext = serde_json::to_vec(&BTreeMap::<String, String>::new())
            .map_err(|e| StashError::Internal(format!("failed to serialize secrets: {e}")))?;
        let (nonce, ciphertext) = crypto::encrypt(&plaintext, &key)?;

        store::write(
            &self.path,
            &EnvelopeData {
                salt,
                nonce,
                ciphertext,
            },
        )
    }

    /// Re-encrypt the entire store under a freshly derived key from `new_password`.
    ///
    /// Does not require the stash to be unlocked; it reads and rewrites the
    /// envelope directly. Does not alter the in-memory lock state (a caller
    /// that wants a consistent unlocked view afterwards should `unlock` again).
    pub fn change_password(&self, old_password: &str, new_password: &str) -> Result<()> {
        if new_password.is_empty() {
            return Err(StashError::EmptyPassword);
        }

        let envelope = store::read(&self.path)?;
        let old_key = crypto::derive_key(old_password, &envelope.salt)?;
        let plaintext = crypto::decrypt(&envelope.ciphertext, &old_key, &envelope.nonce)?;

        let new_salt = crypto::generate_salt();
        let new_key = crypto::derive_key(new_password, &new_salt)?;
        let (nonce, ciphertext) = crypto::encrypt(&plaintext, &new_key)?;

        store::write(
            &self.path,
            &EnvelopeData {
                salt: new_salt,
                nonce,
                ciphertext,
            },
        )
    }

    /// Decrypt the store with `password` and populate the in-memory secret table.
    pub fn unlock(&mut self, password: &str) -> Result<()> {
        let envelope = store::read(&self.path)?;
        let key = crypto::derive_key(password, &envelope.salt)?;
        let plaintext = crypto::decrypt(&envelope.ciphertext, &key, &envelope.nonce)?;

        let secrets: BTreeMap<String, String> = serde_json::from_slice(&plaintext)
            .map_err(|e| StashError::Corrupted(format!("decrypted payload is not valid: {e}")))?;

        self.state = StashState::Unlocked {
            key,
            salt: envelope.salt,
            secrets,
        };
        Ok(())
    }

    /// Clear the in-memory secret table. Idempotent; zeroizes key material.
    pub fn lock(&mut self) {
        if let StashState::Unlocked {
            mut key,
            mut salt,
            mut secrets,
        } = std::mem::replace(&mut self.state, StashState::Locked)
        {
            key.zeroize();
            salt.zeroize();
            for value in secrets.values_mut() {
                value.zeroize();
            }
            secrets.clear();
        }
    }

    fn unlocked(&self) -> Result<(&Key, &BTreeMap<String, String>)> {
        match &self.state {
            StashState::Unlocked { key, secrets, .. } => Ok((key, secrets)),
            StashState::Locked => Err(StashError::Locked),
        }
    }

    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let (_, secrets) = self.unlocked()?;
        Ok(secrets.get(key).cloned())
    }

    pub fn list_keys(&self, filter: Option<&str>) -> Result<Vec<String>> {
        let (_, secrets) = self.unlocked()?;
        Ok(secrets
            .keys()
            .filter(|k| filter.map_or(true, |f| k.contains(f)))
            .cloned()
            .collect())
    }

    pub fn add(&mut self, key: &str, value: &str) -> Result<()> {
        if key.is_empty() {
            return Err(StashError::EmptyKey);
        }
        if value.is_empty() {
            return Err(StashError::EmptyValue);
        }
        let (_, secrets) = self.unlocked()?;
        let mut secrets = secrets.clone();
        secrets.insert(key.to_string(), value.to_string());
        self.replace_secrets(secrets)
    }

    /// Returns whether `key` was present.
    pub fn delete(&mut self, key: &str) -> Result<bool> {
        let (_, secrets) = self.unlocked()?;
        let mut secrets = secrets.clone();
        let existed = secrets.remove(key).is_some();
        if existed {
            self.replace_secrets(secrets)?;
        }
        Ok(existed)
    }

    pub fn rename(&mut self, key: &str, new_key: &str) -> Result<()> {
        let (_, secrets) = self.unlocked()?;
        let mut secrets = secrets.clone();
        let value = secrets
            .remove(key)
            .ok_or_else(|| StashError::NotFound(key.to_string()))?;
        secrets.insert(new_key.to_string(), value);
        self.replace_secrets(secrets)
    }

    /// Re-encrypt and persist `secrets` under the cached key with a fresh
    /// nonce, then adopt it as the new in-memory table.
    fn replace_secrets(&mut self, secrets: BTreeMap<String, String>) -> Result<()> {
        let (key, salt) = match &self.state {
            StashState::Unlocked { key, salt, .. } => (key.clone(), *salt),
            StashState::Locked => return Err(StashError::Locked),
        };

        let plaintext = serde_json::to_vec(&secrets)
            .map_err(|e| StashError::Internal(format!("failed to serialize secrets: {e}")))?;
        let (nonce, ciphertext) = crypto::encrypt(&plaintext, &key)?;

        store::write(
            &self.path,
            &EnvelopeData {
                salt,
                nonce,
                ciphertext,
            },
        )?;

        self.state = StashState::Unlocked { key, salt, secrets };
        Ok(())
    }

    pub fn envelope_path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn stash_at(dir: &Path) -> Stash {
        Stash::new(dir.join("stash.json"))
    }

    #[test]
    fn init_then_unlock_starts_empty() {
        let dir = tempdir().unwrap();
        let mut stash = stash_at(dir.path());
        stash.init("hunter2").unwrap();
        stash.unlock("hunter2").unwrap();
        assert!(stash.is_unlocked());
        assert_eq!(stash.list_keys(None).unwrap(), Vec::<String>::new());
    }

    #[test]
    fn double_init_fails() {
        let dir = tempdir().unwrap();
        let stash = stash_at(dir.path());
        stash.init("hunter2").unwrap();
        assert!(matches!(stash.init("hunter2"), Err(StashError::AlreadyInitialized)));
    }

    #[test]
    fn add_persists_across_lock() {
        let dir = tempdir().unwrap();
        let mut stash = stash_at(dir.path());
        stash.init("hunter2").unwrap();
        stash.unlock("hunter2").unwrap();
        stash.add("api-token", "abc123").unwrap();
        stash.lock();
        assert!(!stash.is_unlocked());

        stash.unlock("hunter2").unwrap();
        assert_eq!(stash.get("api-token").unwrap(), Some("abc123".to_string()));
    }

    #[test]
    fn crud_on_locked_stash_fails() {
        let dir = tempdir().unwrap();
        let stash = stash_at(dir.path());
        stash.init("hunter2").unwrap();
        assert!(matches!(stash.get("k"), Err(StashError::Locked)));
    }

    #[test]
    fn change_password_rotates_key() {
        let dir = tempdir().unwrap();
        let mut stash = stash_at(dir.path());
        stash.init("old-pw").unwrap();
        stash.unlock("old-pw").unwrap();
        stash.add("k", "v").unwrap();
        stash.lock();

        stash.change_password("old-pw", "new-pw").unwrap();

        assert!(matches!(stash.unlock("old-pw"), Err(StashError::WrongPassword)));
        stash.unlock("new-pw").unwrap();
        assert_eq!(stash.get("k").unwrap(), Some("v".to_string()));
    }

    #[test]
    fn rename_moves_value_and_overwrites_destination() {
        let dir = tempdir().unwrap();
        let mut stash = stash_at(dir.path());
        stash.init("pw").unwrap();
        stash.unlock("pw").unwrap();
        stash.add("a", "1").unwrap();
        stash.add("b", "existing").unwrap();

        stash.rename("a", "b").unwrap();

        assert!(matches!(stash.get("a"), Ok(None)));
        assert_eq!(stash.get("b").unwrap(), Some("1".to_string()));
    }

    #[test]
    fn rename_missing_key_fails() {
        let dir = tempdir().unwrap();
        let mut stash = stash_at(dir.path());
        stash.init("pw").unwrap();
        stash.unlock("pw").unwrap();
        assert!(matches!(stash.rename("missing", "b"), Err(StashError::NotFound(_))));
    }

    #[test]
    fn list_keys_filters_by_substring() {
        let dir = tempdir().unwrap();
        let mut stash = stash_at(dir.path());
        stash.init("pw").unwrap();
        stash.unlock("pw").unwrap();
        stash.add("github-token", "a").unwrap();
        stash.add("gitlab-token", "b").unwrap();
        stash.add("aws-key", "c").unwrap();

        let mut git_keys = stash.list_keys(Some("git")).unwrap();
        git_keys.sort();
        assert_eq!(git_keys, vec!["github-token".to_string(), "gitlab-token".to_string()]);
    }
}
