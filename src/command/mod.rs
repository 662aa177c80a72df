//!
//! Command grammar: the manifest of wire short-keys, the argument codec,
//! the tokenizer, the builder, and the closed `Command` variant set
//! (`spec.md` §4.1–§4.4).
//!
//! The source this crate was distilled from keys executors by a dynamic
//! string-to-function map. `spec.md` §9 REDESIGN FLAGS calls for a
//! compile-time-closed match instead, so `ShortKey` and `Command` are both
//! closed enums: adding a command means extending these matches, and the
//! compiler will point at every site that needs updating.

pub mod builder;
pub mod codec;
pub mod manifest;
pub mod parse;
pub mod tokenizer;

pub use builder::build_line;
pub use parse::{parse_line, ParsedLine};

use crate::types::{EntryId, GroupId};

/// The three-letter wire short-key of a command (`spec.md` §4.1).
///
/// `Sem`/`Dem` are kept distinct from `Sep`/`Dep` here because the wire
/// form genuinely differs (and the merge preprocessor's destructive-key
/// table, `spec.md` §4.8, names `dem` as its own entry). The alias is
/// resolved once, in `parse::parse_line`, down to the same [`Command`]
/// variant as the non-deprecated key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShortKey {
    Aid,
    Cmm,
    Fmt,
    Cgr,
    Dgr,
    Mgr,
    Tgr,
    Sga,
    Dga,
    Cen,
    Den,
    Men,
    Sep,
    Dep,
    Sea,
    Dea,
    Sem,
    Dem,
    Saa,
    Daa,
    Pad,
}

impl ShortKey {
    /// All wire keys, in manifest-table order (`spec.md` §4.1).
    pub const ALL: &'static [ShortKey] = &[
        ShortKey::Aid,
        ShortKey::Cmm,
        ShortKey::Fmt,
        ShortKey::Cgr,
        ShortKey::Dgr,
        ShortKey::Mgr,
        ShortKey::Tgr,
        ShortKey::Sga,
        ShortKey::Dga,
        ShortKey::Cen,
        ShortKey::Den,
        ShortKey::Men,
        ShortKey::Sep,
        ShortKey::Dep,
        ShortKey::Sea,
        ShortKey::Dea,
        ShortKey::Sem,
        ShortKey::Dem,
        ShortKey::Saa,
        ShortKey::Daa,
        ShortKey::Pad,
    ];

    pub fn code(self) -> &'static str {
        match self {
            ShortKey::Aid => "aid",
            ShortKey::Cmm => "cmm",
            ShortKey::Fmt => "fmt",
            ShortKey::Cgr => "cgr",
            ShortKey::Dgr => "dgr",
            ShortKey::Mgr => "mgr",
            ShortKey::Tgr => "tgr",
            ShortKey::Sga => "sga",
            ShortKey::Dga => "dga",
            ShortKey::Cen => "cen",
            ShortKey::Den => "den",
            ShortKey::Men => "men",
            ShortKey::Sep => "sep",
            ShortKey::Dep => "dep",
            ShortKey::Sea => "sea",
            ShortKey::Dea => "dea",
            ShortKey::Sem => "sem",
            ShortKey::Dem => "dem",
            ShortKey::Saa => "saa",
            ShortKey::Daa => "daa",
            ShortKey::Pad => "pad",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.code() == code)
    }

    /// Whether this key's semantics remove a group, entry, attribute, or
    /// property (`spec.md` §4.8, GLOSSARY "Destructive command").
    pub fn is_destructive(self) -> bool {
        matches!(
            self,
            ShortKey::Den
                | ShortKey::Dgr
                | ShortKey::Dea
                | ShortKey::Dep
                | ShortKey::Dem
                | ShortKey::Dga
                | ShortKey::Daa
        )
    }
}

impl std::fmt::Display for ShortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// A fully decoded command, ready for dispatch to an executor
/// (`spec.md` §4.5). Legacy `sem`/`dem` aliases have already been folded
/// into the property-targeting variants by the time a `Command` exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SetVaultId { vault_id: String },
    Comment { text: String },
    SetFormat { tag: String },
    CreateGroup { parent: Option<GroupId>, id: GroupId },
    DeleteGroup { id: GroupId },
    MoveGroup { id: GroupId, new_parent: Option<GroupId> },
    SetGroupTitle { id: GroupId, title: String },
    SetGroupAttribute { id: GroupId, key: String, value: String },
    DeleteGroupAttribute { id: GroupId, key: String },
    CreateEntry { group: GroupId, id: EntryId },
    DeleteEntry { id: EntryId },
    MoveEntry { id: EntryId, new_group: GroupId },
    SetEntryProperty { id: EntryId, key: String, value: String },
    DeleteEntryProperty { id: EntryId, key: String },
    SetEntryAttribute { id: EntryId, key: String, value: String },
    DeleteEntryAttribute { id: EntryId, key: String },
    SetVaultAttribute { key: String, value: String },
    DeleteVaultAttribute { key: String },
    Pad { token: String },
}

impl Command {
    /// The wire short-key a freshly-built line for this command would use.
    /// (Never `Sem`/`Dem`; those are recognised on parse only.)
    pub fn short_key(&self) -> ShortKey {
        match self {
            Command::SetVaultId { .. } => ShortKey::Aid,
            Command::Comment { .. } => ShortKey::Cmm,
            Command::SetFormat { .. } => ShortKey::Fmt,
            Command::CreateGroup { .. } => ShortKey::Cgr,
            Command::DeleteGroup { .. } => ShortKey::Dgr,
            Command::MoveGroup { .. } => ShortKey::Mgr,
            Command::SetGroupTitle { .. } => ShortKey::Tgr,
            Command::SetGroupAttribute { .. } => ShortKey::Sga,
            Command::DeleteGroupAttribute { .. } => ShortKey::Dga,
            Command::CreateEntry { .. } => ShortKey::Cen,
            Command::DeleteEntry { .. } => ShortKey::Den,
            Command::MoveEntry { .. } => ShortKey::Men,
            Command::SetEntryProperty { .. } => ShortKey::Sep,
            Command::DeleteEntryProperty { .. } => ShortKey::Dep,
            Command::SetEntryAttribute { .. } => ShortKey::Sea,
            Command::DeleteEntryAttribute { .. } => ShortKey::Dea,
            Command::SetVaultAttribute { .. } => ShortKey::Saa,
            Command::DeleteVaultAttribute { .. } => ShortKey::Daa,
            Command::Pad { .. } => ShortKey::Pad,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_short_key_round_trips_through_its_code() {
        for key in ShortKey::ALL {
            assert_eq!(ShortKey::from_code(key.code()), Some(*key));
        }
    }

    #[test]
    fn unknown_code_is_rejected() {
        assert_eq!(ShortKey::from_code("xyz"), None);
    }

    #[test]
    fn destructive_keys_match_glossary() {
        let destructive: Vec<&str> = ShortKey::ALL
            .iter()
            .copied()
            .filter(|k| k.is_destructive())
            .map(ShortKey::code)
            .collect();
        assert_eq!(destructive, vec!["dgr", "dga", "den", "dep", "dea", "dem", "daa"]);
        // Order follows `ShortKey::ALL`'s declaration order, not the
        // `spec.md` §4.8 prose order; both name the same seven keys.
    }
}
