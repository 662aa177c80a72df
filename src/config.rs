//!
//! Engine tunables. The crate is a library, not a CLI or service, so there
//! is no config-file loader here. Behavior is configured through explicit
//! constructor arguments, the same way the teacher configures a `Kernel`
//! by passing collaborators directly rather than reading from an
//! environment or a `config`/`clap` dependency.

/// Tunable constants for [`crate::history::Westley`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    /// Minimum history length before [`crate::history::Westley::can_be_flattened`]
    /// reports true (`spec.md` §4.9: "e.g. ≥ 100").
    pub flatten_threshold: usize,
    /// Number of random bytes base64-encoded into each auto-inserted `pad`
    /// command's argument (`spec.md` §3 invariant 4, §4.6).
    pub pad_token_bytes: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self { flatten_threshold: 100, pad_token_bytes: 16 }
    }
}
