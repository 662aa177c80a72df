//!
//! The envelope codec (`spec.md` §4.10, §6): frames a history with a
//! signature prefix, compression, and symmetric encryption for on-disk
//! persistence, and reverses the framing on load.
//!
//! Per `spec.md` §9 REDESIGN FLAGS ("global environment registry... re-
//! architect as an explicit `FormatEnv` context"), there is no process-wide
//! registry here: [`FormatEnv`] bundles the compressor and cipher as
//! trait objects a caller constructs explicitly, the same shape as the
//! teacher assembling a default `PlaceholderCryptoProvider` in
//! `Kernel::new_with_default_crypto` rather than reaching for a singleton.

use std::io::{Read, Write};
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chacha20poly1305::aead::{Aead, AeadCore, KeyInit, OsRng};
use chacha20poly1305::{ChaCha20Poly1305, Key, Nonce};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

use crate::credentials::CredentialsChannel;
use crate::error::VaultError;

/// The fixed envelope signature (`spec.md` §4.10, §6): declares the
/// envelope version so legacy or foreign content is rejected cleanly
/// before any decryption is attempted.
pub const SIGNATURE_PREFIX: &str = "vfe1:";

/// Compresses/decompresses the history text (`compression/v1/*` in
/// `spec.md` §4.10/§6, preserved here as the trait method names so the
/// wire-level contract stays discoverable even though the *mechanism* for
/// supplying an implementation is now an explicit argument).
pub trait Compressor: Send + Sync {
    fn compress_text(&self, text: &str) -> Result<Vec<u8>, VaultError>;
    fn decompress_text(&self, bytes: &[u8]) -> Result<String, VaultError>;
}

/// Encrypts/decrypts the compressed payload under a master key
/// (`crypto/v1/*` in `spec.md` §4.10/§6).
pub trait Cipher: Send + Sync {
    fn encrypt_text(&self, plaintext: &[u8], key: &[u8]) -> Result<Vec<u8>, VaultError>;
    fn decrypt_text(&self, ciphertext: &[u8], key: &[u8]) -> Result<Vec<u8>, VaultError>;
}

/// Gzip via `flate2`, the default `Compressor`.
#[derive(Debug, Default, Clone, Copy)]
pub struct GzipCompressor;

impl Compressor for GzipCompressor {
    fn compress_text(&self, text: &str) -> Result<Vec<u8>, VaultError> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder
            .write_all(text.as_bytes())
            .map_err(|e| VaultError::Other(format!("gzip compression failed: {e}")))?;
        encoder.finish().map_err(|e| VaultError::Other(format!("gzip compression failed: {e}")))
    }

    fn decompress_text(&self, bytes: &[u8]) -> Result<String, VaultError> {
        let mut decoder = GzDecoder::new(bytes);
        let mut out = String::new();
        decoder.read_to_string(&mut out).map_err(|_| VaultError::DecompressionFailed)?;
        Ok(out)
    }
}

/// ChaCha20-Poly1305 via the `chacha20poly1305` crate, the default
/// `Cipher`. The 12-byte nonce is generated fresh per encryption and
/// prepended to the ciphertext; the master key material (of whatever
/// length the credentials channel supplies) is stretched to the cipher's
/// required 32 bytes with `blake3`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ChaChaCipher;

const NONCE_LEN: usize = 12;

impl ChaChaCipher {
    fn derive_key(key_material: &[u8]) -> Key {
        *Key::from_slice(blake3::hash(key_material).as_bytes())
    }
}

impl Cipher for ChaChaCipher {
    fn encrypt_text(&self, plaintext: &[u8], key: &[u8]) -> Result<Vec<u8>, VaultError> {
        let cipher = ChaCha20Poly1305::new(&Self::derive_key(key));
        let nonce = ChaCha20Poly1305::generate_nonce(&mut OsRng);
        let mut ciphertext = cipher
            .encrypt(&nonce, plaintext)
            .map_err(|_| VaultError::Other("encryption failed".to_string()))?;
        let mut out = nonce.to_vec();
        out.append(&mut ciphertext);
        Ok(out)
    }

    fn decrypt_text(&self, ciphertext: &[u8], key: &[u8]) -> Result<Vec<u8>, VaultError> {
        if ciphertext.len() < NONCE_LEN {
            return Err(VaultError::DecryptionFailed);
        }
        let (nonce_bytes, body) = ciphertext.split_at(NONCE_LEN);
        let nonce = Nonce::from_slice(nonce_bytes);
        let cipher = ChaCha20Poly1305::new(&Self::derive_key(key));
        cipher.decrypt(nonce, body).map_err(|_| VaultError::DecryptionFailed)
    }
}

/// The explicit context bundling the injectable compression and encryption
/// primitives (`spec.md` §9 "Global environment registry" redesign).
#[derive(Clone)]
pub struct FormatEnv {
    compressor: Arc<dyn Compressor>,
    cipher: Arc<dyn Cipher>,
}

impl FormatEnv {
    pub fn new(compressor: Arc<dyn Compressor>, cipher: Arc<dyn Cipher>) -> Self {
        Self { compressor, cipher }
    }

    /// Assembles the default gzip + ChaCha20-Poly1305 environment.
    pub fn with_defaults() -> Self {
        Self::new(Arc::new(GzipCompressor), Arc::new(ChaChaCipher))
    }
}

/// Does `envelope` begin with [`SIGNATURE_PREFIX`]?
pub fn has_valid_signature(envelope: &str) -> bool {
    envelope.starts_with(SIGNATURE_PREFIX)
}

/// Removes the signature prefix, if present.
pub fn strip_signature(envelope: &str) -> Option<&str> {
    envelope.strip_prefix(SIGNATURE_PREFIX)
}

/// Encode pipeline (`spec.md` §4.10): join with `\n` → compress → encrypt
/// under the master key resolved from `credentials_id` → base64 → prepend
/// the signature.
pub fn encode_history(
    history: &[String],
    credentials_id: &str,
    credentials: &dyn CredentialsChannel,
    env: &FormatEnv,
) -> Result<String, VaultError> {
    let joined = history.join("\n");
    let compressed = env.compressor.compress_text(&joined)?;
    let master_key = credentials.master_key(credentials_id)?;
    let ciphertext = env.cipher.encrypt_text(&compressed, &master_key)?;
    tracing::debug!(lines = history.len(), "encoded vault history into envelope");
    Ok(format!("{SIGNATURE_PREFIX}{}", BASE64.encode(ciphertext)))
}

/// Decode pipeline (`spec.md` §4.10): verify signature → strip → decrypt →
/// if nonempty, decompress → split on `\n`.
///
/// A decrypted-but-empty buffer is treated as [`VaultError::DecryptionFailed`]
/// (`spec.md` §4.10: "DecryptionFailed (includes empty-after-decrypt)").
/// A legitimate empty history still carries nonzero compressed framing
/// bytes, so zero bytes out of decryption means the key or ciphertext was
/// wrong, not that the vault is empty.
pub fn decode_history(
    envelope: &str,
    credentials_id: &str,
    credentials: &dyn CredentialsChannel,
    env: &FormatEnv,
) -> Result<Vec<String>, VaultError> {
    let stripped = strip_signature(envelope).ok_or_else(|| {
        tracing::warn!("rejected envelope with invalid signature");
        VaultError::InvalidSignature
    })?;

    // The signature already matched here; a body that isn't valid base64
    // is a corrupt or foreign payload, not a signature mismatch.
    let ciphertext = BASE64.decode(stripped).map_err(|_| VaultError::DecryptionFailed)?;
    let master_key = credentials.master_key(credentials_id)?;
    let decrypted = env.cipher.decrypt_text(&ciphertext, &master_key)?;
    if decrypted.is_empty() {
        return Err(VaultError::DecryptionFailed);
    }

    let decompressed = env.compressor.decompress_text(&decrypted)?;
    if decompressed.is_empty() {
        return Ok(Vec::new());
    }
    Ok(decompressed.split('\n').map(str::to_string).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::InMemoryCredentials;

    fn credentials() -> InMemoryCredentials {
        let mut credentials = InMemoryCredentials::new();
        credentials.insert("default", b"correct horse battery staple".to_vec());
        credentials
    }

    #[test]
    fn round_trips_a_history_through_the_envelope() {
        let env = FormatEnv::with_defaults();
        let credentials = credentials();
        let history = vec!["fmt a".to_string(), "aid 22222222-2222-2222-2222-222222222222".to_string()];

        let encoded = encode_history(&history, "default", &credentials, &env).unwrap();
        assert!(has_valid_signature(&encoded));

        let decoded = decode_history(&encoded, "default", &credentials, &env).unwrap();
        assert_eq!(decoded, history);
    }

    #[test]
    fn round_trips_an_empty_history() {
        let env = FormatEnv::with_defaults();
        let credentials = credentials();
        let encoded = encode_history(&[], "default", &credentials, &env).unwrap();
        let decoded = decode_history(&encoded, "default", &credentials, &env).unwrap();
        assert!(decoded.is_empty());
    }

    #[test]
    fn rejects_an_envelope_without_a_valid_signature() {
        let env = FormatEnv::with_defaults();
        let credentials = credentials();
        let err = decode_history("not-a-real-envelope", "default", &credentials, &env).unwrap_err();
        assert!(matches!(err, VaultError::InvalidSignature));
    }

    #[test]
    fn a_valid_signature_with_a_non_base64_body_is_a_decryption_failure_not_a_signature_failure() {
        let env = FormatEnv::with_defaults();
        let credentials = credentials();
        let envelope = format!("{SIGNATURE_PREFIX}not valid base64 at all!!");
        let err = decode_history(&envelope, "default", &credentials, &env).unwrap_err();
        assert!(matches!(err, VaultError::DecryptionFailed));
    }

    #[test]
    fn rejects_decryption_under_the_wrong_key() {
        let env = FormatEnv::with_defaults();
        let mut credentials = credentials();
        let history = vec!["cmm hello".to_string()];
        let encoded = encode_history(&history, "default", &credentials, &env).unwrap();

        credentials.insert("default", b"a different key entirely".to_vec());
        let err = decode_history(&encoded, "default", &credentials, &env).unwrap_err();
        assert!(matches!(err, VaultError::DecryptionFailed));
    }
}
