//!
//! The describe generator (`spec.md` §4.11): given a dataset subtree, emits
//! the command sequence that would reconstruct it from an empty dataset
//! (with the subtree's parent already present).

use crate::command::builder::build_line;
use crate::command::Command;
use crate::dataset::Vault;
use crate::types::GroupId;

/// Describes the subtree rooted at `group_id`: a `cgr` line for the group
/// itself, a `tgr` line if its title is non-empty, `sga` lines for its
/// attributes, a `cen`/`sep`/`sea` sequence per entry, then the same
/// recursively for each child group.
pub fn describe_group(vault: &Vault, group_id: GroupId) -> Vec<String> {
    let mut lines = Vec::new();
    describe_group_into(vault, group_id, &mut lines);
    lines
}

fn describe_group_into(vault: &Vault, group_id: GroupId, lines: &mut Vec<String>) {
    let Some(group) = vault.group(group_id) else { return };

    lines.push(build_line(&Command::CreateGroup { parent: group.parent, id: group.id }));

    if !group.title.is_empty() {
        lines.push(build_line(&Command::SetGroupTitle { id: group.id, title: group.title.clone() }));
    }
    for (key, value) in &group.attributes {
        lines.push(build_line(&Command::SetGroupAttribute {
            id: group.id,
            key: key.clone(),
            value: value.clone(),
        }));
    }

    for entry in vault.children_entries(group_id) {
        lines.push(build_line(&Command::CreateEntry { group: group_id, id: entry.id }));
        for (key, value) in &entry.properties {
            lines.push(build_line(&Command::SetEntryProperty {
                id: entry.id,
                key: key.clone(),
                value: value.clone(),
            }));
        }
        for (key, value) in &entry.attributes {
            lines.push(build_line(&Command::SetEntryAttribute {
                id: entry.id,
                key: key.clone(),
                value: value.clone(),
            }));
        }
    }

    for child in vault.children_groups(Some(group_id)) {
        describe_group_into(vault, child.id, lines);
    }
}

/// Describes an entire vault: `fmt`/`aid` are the flattener's job to
/// prepend (`spec.md` §4.9), so this emits vault attributes followed by
/// every top-level group's subtree, in creation order.
///
/// `spec.md` §4.11 only documents the group-subtree case; a vault can also
/// carry attributes of its own (`spec.md` §3), and describing only groups
/// would silently drop them, breaking `replay(describe(D)) == D` the
/// moment any vault attribute is set.
pub fn describe_dataset(vault: &Vault) -> Vec<String> {
    let mut lines = Vec::new();
    for (key, value) in &vault.attributes {
        lines.push(build_line(&Command::SetVaultAttribute { key: key.clone(), value: value.clone() }));
    }
    for group in vault.children_groups(None) {
        describe_group_into(vault, group.id, &mut lines);
    }
    lines
}
