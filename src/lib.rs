#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![deny(deprecated)]

//!
//! A vault format engine: a hierarchical, encrypted secrets database
//! represented as an append-only log of textual commands.
//!
//! A vault's persistent form is a signed, compressed, encrypted envelope
//! wrapping a newline-delimited history of mutation records. Replaying
//! history from an empty state deterministically reconstructs an
//! in-memory dataset of nested groups, entries, their properties, and
//! their attributes. Merge across divergent histories is log-based.
//!
//! The credentials object, the symmetric cipher, the text compressor, UUID
//! generation, the higher-level application object graph, storage
//! back-ends, and any UI/CLI are external collaborators; this crate
//! defines the trait seams they plug into ([`credentials::CredentialsChannel`],
//! [`envelope::Compressor`], [`envelope::Cipher`]) and default
//! implementations of the latter two, but does not implement the former.

pub mod command;
pub mod config;
pub mod credentials;
pub mod dataset;
pub mod describe;
pub mod envelope;
pub mod error;
pub mod executor;
pub mod history;
pub mod merge;
pub mod share;
pub mod types;

pub use config::EngineOptions;
pub use dataset::{EntryNode, GroupNode, Vault};
pub use error::{ExecutorError, VaultError};
pub use history::Westley;
