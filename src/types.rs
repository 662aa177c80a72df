//! Shared identifier types used throughout the engine.
//!
//! UUID generation itself is out of scope (`spec.md` §1, Non-goals). This
//! module only names the types callers and executors pass around. Group and
//! entry identifiers are `Uuid`; the vault identifier is a plain `String`
//! since `aid` accepts whatever token a caller supplies (external
//! collaborators decide what a "vault UUID" actually looks like).

use uuid::Uuid;

pub type GroupId = Uuid;
pub type EntryId = Uuid;
pub type ShareId = Uuid;
pub type VaultId = String;

/// The wire token for the pseudo-root group (`spec.md` §3, §6 grammar).
pub const ROOT_TOKEN: &str = "0";

/// Renders a group's parent for wire encoding: `None` (the pseudo-root) is
/// the literal token `"0"`, anything else is the child group's UUID.
pub fn parent_token(parent: Option<GroupId>) -> String {
    match parent {
        Some(id) => id.to_string(),
        None => ROOT_TOKEN.to_string(),
    }
}

/// Parses a wire parent token back into `None` (root) or a concrete group id.
pub fn parse_parent_token(token: &str) -> Option<Option<GroupId>> {
    if token == ROOT_TOKEN {
        Some(None)
    } else {
        Uuid::parse_str(token).ok().map(Some)
    }
}
