//!
//! The credentials channel (`spec.md` §1 Out of scope, §4.10): the
//! external collaborator that resolves a credentials ID to the master key
//! material used to encrypt/decrypt a vault's envelope.
//!
//! Only the trait seam and a minimal in-memory implementation live here.
//! Real credential storage (OS keychain, HSM, password prompt) is an
//! application concern, the same way the teacher keeps `PublicKey`
//! resolution behind a trait rather than owning key storage itself.

use std::collections::HashMap;

use crate::error::VaultError;

/// Resolves a credentials ID to master key bytes.
pub trait CredentialsChannel: Send + Sync {
    fn master_key(&self, credentials_id: &str) -> Result<Vec<u8>, VaultError>;
}

/// A `CredentialsChannel` backed by an in-process map. Useful for tests and
/// for callers that already hold key material and just need it threaded
/// through the trait seam.
#[derive(Debug, Default, Clone)]
pub struct InMemoryCredentials {
    keys: HashMap<String, Vec<u8>>,
}

impl InMemoryCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, credentials_id: impl Into<String>, key: impl Into<Vec<u8>>) {
        self.keys.insert(credentials_id.into(), key.into());
    }
}

impl CredentialsChannel for InMemoryCredentials {
    fn master_key(&self, credentials_id: &str) -> Result<Vec<u8>, VaultError> {
        self.keys
            .get(credentials_id)
            .cloned()
            .ok_or_else(|| VaultError::Other(format!("no credentials registered for id {credentials_id:?}")))
    }
}
