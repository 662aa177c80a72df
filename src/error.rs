//!
//! Error types for the vault format engine.

use crate::command::ShortKey;
use uuid::Uuid;

/// Errors surfaced by executors (`spec.md` §4.5) before they are wrapped
/// with the failing command's short key by the history executor.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExecutorError {
    #[error("group {0} already exists")]
    DuplicateGroup(Uuid),
    #[error("entry {0} already exists")]
    DuplicateEntry(Uuid),
    #[error("group {0} not found")]
    GroupNotFound(Uuid),
    #[error("entry {0} not found")]
    EntryNotFound(Uuid),
    #[error("cannot move group {0} beneath its own descendant")]
    CyclicMove(Uuid),
}

/// Errors surfaced by the engine as a whole (`spec.md` §6, §7).
#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    /// Mutation attempted against a read-only history executor.
    #[error("history executor is read-only")]
    ReadOnly,

    /// A line does not match the command grammar (`spec.md` §4.4, §6).
    #[error("invalid command line: {0:?}")]
    InvalidCommand(String),

    /// A line's short key has no entry in the command manifest.
    #[error("unknown command short key: {0:?}")]
    UnknownCommand(String),

    /// An executor rejected a command; `key` is the failing short key.
    #[error("command {key} failed: {source}")]
    CommandExecutionError {
        key: &'static str,
        #[source]
        source: ExecutorError,
    },

    /// The envelope's signature prefix did not match a known format tag.
    #[error("invalid envelope signature")]
    InvalidSignature,

    /// Decryption failed, including the case where decryption produced an
    /// empty buffer (`spec.md` §4.10: "DecryptionFailed (includes
    /// empty-after-decrypt)").
    #[error("failed to decrypt vault envelope")]
    DecryptionFailed,

    /// Decompression of the decrypted payload failed, or the decompressed
    /// bytes were not valid UTF-8.
    #[error("failed to decompress vault payload")]
    DecompressionFailed,

    /// Catch-all for collaborator failures (compression, encryption,
    /// credentials lookup) that don't have a dedicated variant above.
    /// Mirrors the teacher's `KernelError::Other(String)` escape hatch.
    #[error("vault engine error: {0}")]
    Other(String),
}

impl ShortKey {
    pub(crate) fn wrap(self, source: ExecutorError) -> VaultError {
        VaultError::CommandExecutionError {
            key: self.code(),
            source,
        }
    }
}
