//!
//! Executors apply a single decoded [`Command`] to a [`Vault`] dataset
//! (`spec.md` §4.5). Each function validates referential integrity before
//! mutating, leaving the dataset untouched on error.

use crate::command::Command;
use crate::dataset::{EntryNode, GroupNode, Vault};
use crate::error::ExecutorError;
use crate::types::{EntryId, GroupId, ShareId};
use std::collections::BTreeMap;

/// Per-command execution options (`spec.md` §4.5). Threaded through every
/// executor for interface fidelity, even though no executor in this crate
/// currently consults `share`. Dataset mutation does not depend on which
/// share a command arrived through, only `history`'s line bookkeeping does.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecOptions {
    pub share: Option<ShareId>,
}

/// Applies `command` to `vault`, returning the [`ExecutorError`] the
/// matching per-command function reports on a referential-integrity
/// violation.
pub fn apply(vault: &mut Vault, _options: ExecOptions, command: &Command) -> Result<(), ExecutorError> {
    match command {
        Command::SetVaultId { vault_id } => {
            vault.id = vault_id.clone();
            Ok(())
        }
        Command::Comment { .. } | Command::Pad { .. } => Ok(()),
        Command::SetFormat { tag } => {
            vault.format = Some(tag.clone());
            Ok(())
        }
        Command::CreateGroup { parent, id } => create_group(vault, *parent, *id),
        Command::DeleteGroup { id } => delete_group(vault, *id),
        Command::MoveGroup { id, new_parent } => move_group(vault, *id, *new_parent),
        Command::SetGroupTitle { id, title } => set_group_title(vault, *id, title),
        Command::SetGroupAttribute { id, key, value } => set_group_attribute(vault, *id, key, value),
        Command::DeleteGroupAttribute { id, key } => delete_group_attribute(vault, *id, key),
        Command::CreateEntry { group, id } => create_entry(vault, *group, *id),
        Command::DeleteEntry { id } => delete_entry(vault, *id),
        Command::MoveEntry { id, new_group } => move_entry(vault, *id, *new_group),
        Command::SetEntryProperty { id, key, value } => set_entry_property(vault, *id, key, value),
        Command::DeleteEntryProperty { id, key } => delete_entry_property(vault, *id, key),
        Command::SetEntryAttribute { id, key, value } => set_entry_attribute(vault, *id, key, value),
        Command::DeleteEntryAttribute { id, key } => delete_entry_attribute(vault, *id, key),
        Command::SetVaultAttribute { key, value } => {
            vault.attributes.insert(key.clone(), value.clone());
            Ok(())
        }
        Command::DeleteVaultAttribute { key } => {
            vault.attributes.remove(key);
            Ok(())
        }
    }
}

fn create_group(vault: &mut Vault, parent: Option<GroupId>, id: GroupId) -> Result<(), ExecutorError> {
    if vault.contains_group(id) {
        return Err(ExecutorError::DuplicateGroup(id));
    }
    if let Some(parent_id) = parent {
        if !vault.contains_group(parent_id) {
            return Err(ExecutorError::GroupNotFound(parent_id));
        }
    }
    vault.insert_group(GroupNode { id, parent, title: String::new(), attributes: BTreeMap::new() });
    Ok(())
}

fn delete_group(vault: &mut Vault, id: GroupId) -> Result<(), ExecutorError> {
    if !vault.contains_group(id) {
        return Err(ExecutorError::GroupNotFound(id));
    }
    vault.remove_group_recursive(id);
    Ok(())
}

fn move_group(vault: &mut Vault, id: GroupId, new_parent: Option<GroupId>) -> Result<(), ExecutorError> {
    if !vault.contains_group(id) {
        return Err(ExecutorError::GroupNotFound(id));
    }
    if let Some(parent_id) = new_parent {
        if !vault.contains_group(parent_id) {
            return Err(ExecutorError::GroupNotFound(parent_id));
        }
        if vault.is_ancestor_of(id, parent_id) {
            return Err(ExecutorError::CyclicMove(id));
        }
    }
    vault.group_mut(id).expect("checked above").parent = new_parent;
    Ok(())
}

fn set_group_title(vault: &mut Vault, id: GroupId, title: &str) -> Result<(), ExecutorError> {
    let group = vault.group_mut(id).ok_or(ExecutorError::GroupNotFound(id))?;
    group.title = title.to_string();
    Ok(())
}

fn set_group_attribute(vault: &mut Vault, id: GroupId, key: &str, value: &str) -> Result<(), ExecutorError> {
    let group = vault.group_mut(id).ok_or(ExecutorError::GroupNotFound(id))?;
    group.attributes.insert(key.to_string(), value.to_string());
    Ok(())
}

fn delete_group_attribute(vault: &mut Vault, id: GroupId, key: &str) -> Result<(), ExecutorError> {
    let group = vault.group_mut(id).ok_or(ExecutorError::GroupNotFound(id))?;
    group.attributes.remove(key);
    Ok(())
}

fn create_entry(vault: &mut Vault, group: GroupId, id: EntryId) -> Result<(), ExecutorError> {
    if vault.contains_entry(id) {
        return Err(ExecutorError::DuplicateEntry(id));
    }
    if !vault.contains_group(group) {
        return Err(ExecutorError::GroupNotFound(group));
    }
    vault.insert_entry(EntryNode { id, parent: group, properties: BTreeMap::new(), attributes: BTreeMap::new() });
    Ok(())
}

fn delete_entry(vault: &mut Vault, id: EntryId) -> Result<(), ExecutorError> {
    if !vault.contains_entry(id) {
        return Err(ExecutorError::EntryNotFound(id));
    }
    vault.remove_entry(id);
    Ok(())
}

fn move_entry(vault: &mut Vault, id: EntryId, new_group: GroupId) -> Result<(), ExecutorError> {
    if !vault.contains_entry(id) {
        return Err(ExecutorError::EntryNotFound(id));
    }
    if !vault.contains_group(new_group) {
        return Err(ExecutorError::GroupNotFound(new_group));
    }
    vault.entry_mut(id).expect("checked above").parent = new_group;
    Ok(())
}

fn set_entry_property(vault: &mut Vault, id: EntryId, key: &str, value: &str) -> Result<(), ExecutorError> {
    let entry = vault.entry_mut(id).ok_or(ExecutorError::EntryNotFound(id))?;
    entry.properties.insert(key.to_string(), value.to_string());
    Ok(())
}

fn delete_entry_property(vault: &mut Vault, id: EntryId, key: &str) -> Result<(), ExecutorError> {
    let entry = vault.entry_mut(id).ok_or(ExecutorError::EntryNotFound(id))?;
    entry.properties.remove(key);
    Ok(())
}

fn set_entry_attribute(vault: &mut Vault, id: EntryId, key: &str, value: &str) -> Result<(), ExecutorError> {
    let entry = vault.entry_mut(id).ok_or(ExecutorError::EntryNotFound(id))?;
    entry.attributes.insert(key.to_string(), value.to_string());
    Ok(())
}

fn delete_entry_attribute(vault: &mut Vault, id: EntryId, key: &str) -> Result<(), ExecutorError> {
    let entry = vault.entry_mut(id).ok_or(ExecutorError::EntryNotFound(id))?;
    entry.attributes.remove(key);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn creating_a_duplicate_group_errors() {
        let mut vault = Vault::new();
        let id = Uuid::new_v4();
        apply(&mut vault, ExecOptions::default(), &Command::CreateGroup { parent: None, id }).unwrap();
        let err = apply(&mut vault, ExecOptions::default(), &Command::CreateGroup { parent: None, id }).unwrap_err();
        assert_eq!(err, ExecutorError::DuplicateGroup(id));
    }

    #[test]
    fn creating_a_group_under_an_unknown_parent_errors() {
        let mut vault = Vault::new();
        let parent = Uuid::new_v4();
        let id = Uuid::new_v4();
        let err = apply(&mut vault, ExecOptions::default(), &Command::CreateGroup { parent: Some(parent), id }).unwrap_err();
        assert_eq!(err, ExecutorError::GroupNotFound(parent));
    }

    #[test]
    fn deleting_a_group_recursively_removes_descendants_and_entries() {
        let mut vault = Vault::new();
        let parent = Uuid::new_v4();
        let child = Uuid::new_v4();
        let entry = Uuid::new_v4();
        apply(&mut vault, ExecOptions::default(), &Command::CreateGroup { parent: None, id: parent }).unwrap();
        apply(&mut vault, ExecOptions::default(), &Command::CreateGroup { parent: Some(parent), id: child }).unwrap();
        apply(&mut vault, ExecOptions::default(), &Command::CreateEntry { group: child, id: entry }).unwrap();

        apply(&mut vault, ExecOptions::default(), &Command::DeleteGroup { id: parent }).unwrap();
        assert!(!vault.contains_group(parent));
        assert!(!vault.contains_group(child));
        assert!(!vault.contains_entry(entry));
    }

    #[test]
    fn moving_a_group_beneath_its_own_descendant_is_rejected() {
        let mut vault = Vault::new();
        let parent = Uuid::new_v4();
        let child = Uuid::new_v4();
        apply(&mut vault, ExecOptions::default(), &Command::CreateGroup { parent: None, id: parent }).unwrap();
        apply(&mut vault, ExecOptions::default(), &Command::CreateGroup { parent: Some(parent), id: child }).unwrap();

        let err = apply(&mut vault, ExecOptions::default(), &Command::MoveGroup { id: parent, new_parent: Some(child) }).unwrap_err();
        assert_eq!(err, ExecutorError::CyclicMove(parent));
    }

    #[test]
    fn moving_a_group_under_itself_is_rejected() {
        let mut vault = Vault::new();
        let id = Uuid::new_v4();
        apply(&mut vault, ExecOptions::default(), &Command::CreateGroup { parent: None, id }).unwrap();
        let err = apply(&mut vault, ExecOptions::default(), &Command::MoveGroup { id, new_parent: Some(id) }).unwrap_err();
        assert_eq!(err, ExecutorError::CyclicMove(id));
    }

    #[test]
    fn setting_a_property_on_an_unknown_entry_errors() {
        let mut vault = Vault::new();
        let id = Uuid::new_v4();
        let err =
            apply(&mut vault, ExecOptions::default(), &Command::SetEntryProperty { id, key: "x".into(), value: "y".into() }).unwrap_err();
        assert_eq!(err, ExecutorError::EntryNotFound(id));
    }

    #[test]
    fn vault_attributes_apply_directly() {
        let mut vault = Vault::new();
        apply(&mut vault, ExecOptions::default(), &Command::SetVaultAttribute { key: "theme".into(), value: "dark".into() }).unwrap();
        assert_eq!(vault.attributes.get("theme"), Some(&"dark".to_string()));
        apply(&mut vault, ExecOptions::default(), &Command::DeleteVaultAttribute { key: "theme".into() }).unwrap();
        assert!(!vault.attributes.contains_key("theme"));
    }
}
