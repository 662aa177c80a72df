//!
//! The in-memory vault dataset (`spec.md` §3): a mapping of vault-level
//! metadata to an arena of groups and entries.
//!
//! Groups and entries are stored in arenas keyed by id rather than as
//! owned, nested `Vec<Group>`/`Vec<Entry>` fields, the teacher's own
//! "cyclic tree references" re-architecture note (`spec.md` §9) applied
//! here: stable ids plus a `parent` pointer per node, with sibling order
//! reconstructed from a creation-order list instead of relying on tree
//! ownership.

use std::collections::BTreeMap;
use std::collections::HashMap;

use crate::types::{EntryId, GroupId, VaultId};

/// A single group node. `parent == None` means the group is a direct child
/// of the pseudo-root `0`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GroupNode {
    pub id: GroupId,
    pub parent: Option<GroupId>,
    pub title: String,
    pub attributes: BTreeMap<String, String>,
}

/// A single entry node, always owned by exactly one group.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct EntryNode {
    pub id: EntryId,
    pub parent: GroupId,
    pub properties: BTreeMap<String, String>,
    pub attributes: BTreeMap<String, String>,
}

/// The dataset materialised by replaying a vault's history (`spec.md` §3).
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct Vault {
    pub id: VaultId,
    pub format: Option<String>,
    pub attributes: BTreeMap<String, String>,
    groups: HashMap<GroupId, GroupNode>,
    entries: HashMap<EntryId, EntryNode>,
    /// Creation order of groups, used to reconstruct deterministic sibling
    /// ordering without owning a nested tree.
    group_order: Vec<GroupId>,
    entry_order: Vec<EntryId>,
}

/// Structural equality up to *flat* creation order (`spec.md` §8:
/// "structural equality up to ordering within sibling sets where order is
/// declared irrelevant"). `group_order`/`entry_order` record the order
/// every group/entry was created across the whole vault, not per parent;
/// two datasets built by different command sequences can disagree on that
/// flat order while still agreeing on every parent's sibling order (e.g.
/// [`crate::describe::describe_group`] walks depth-first, so it finishes a
/// group's whole subtree (interleaving a sibling's children in between)
/// before moving to that group's next sibling). So equality compares the
/// `groups`/`entries` maps directly, then compares sibling order
/// per-parent rather than the raw flat vectors.
impl PartialEq for Vault {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.format == other.format
            && self.attributes == other.attributes
            && self.groups == other.groups
            && self.entries == other.entries
            && self.group_sibling_order() == other.group_sibling_order()
            && self.entry_sibling_order() == other.entry_sibling_order()
    }
}

impl Eq for Vault {}

impl Vault {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty() && self.entries.is_empty() && self.attributes.is_empty()
    }

    pub fn group(&self, id: GroupId) -> Option<&GroupNode> {
        self.groups.get(&id)
    }

    pub fn group_mut(&mut self, id: GroupId) -> Option<&mut GroupNode> {
        self.groups.get_mut(&id)
    }

    pub fn entry(&self, id: EntryId) -> Option<&EntryNode> {
        self.entries.get(&id)
    }

    pub fn entry_mut(&mut self, id: EntryId) -> Option<&mut EntryNode> {
        self.entries.get_mut(&id)
    }

    pub fn contains_group(&self, id: GroupId) -> bool {
        self.groups.contains_key(&id)
    }

    pub fn contains_entry(&self, id: EntryId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Groups whose parent is `parent`, in creation order.
    pub fn children_groups(&self, parent: Option<GroupId>) -> Vec<&GroupNode> {
        self.group_order
            .iter()
            .filter_map(|id| self.groups.get(id))
            .filter(|g| g.parent == parent)
            .collect()
    }

    /// Entries owned by `group`, in creation order.
    pub fn children_entries(&self, group: GroupId) -> Vec<&EntryNode> {
        self.entry_order
            .iter()
            .filter_map(|id| self.entries.get(id))
            .filter(|e| e.parent == group)
            .collect()
    }

    /// All groups in the vault, in creation order (`spec.md` §6 `getAllGroups`).
    pub fn all_groups(&self) -> Vec<&GroupNode> {
        self.group_order.iter().filter_map(|id| self.groups.get(id)).collect()
    }

    /// All entries in the vault, in creation order (`spec.md` §6 `getAllEntries`).
    pub fn all_entries(&self) -> Vec<&EntryNode> {
        self.entry_order.iter().filter_map(|id| self.entries.get(id)).collect()
    }

    /// Per-parent sibling order of every group, derived from the flat
    /// creation-order vector. Used only for [`PartialEq`]: two vaults
    /// built by different command sequences can disagree on the flat
    /// `group_order` while still agreeing on every parent's sibling order.
    fn group_sibling_order(&self) -> HashMap<Option<GroupId>, Vec<GroupId>> {
        let mut by_parent: HashMap<Option<GroupId>, Vec<GroupId>> = HashMap::new();
        for id in &self.group_order {
            if let Some(group) = self.groups.get(id) {
                by_parent.entry(group.parent).or_default().push(*id);
            }
        }
        by_parent
    }

    /// Per-group sibling order of every entry, the entry analogue of
    /// [`Vault::group_sibling_order`].
    fn entry_sibling_order(&self) -> HashMap<GroupId, Vec<EntryId>> {
        let mut by_parent: HashMap<GroupId, Vec<EntryId>> = HashMap::new();
        for id in &self.entry_order {
            if let Some(entry) = self.entries.get(id) {
                by_parent.entry(entry.parent).or_default().push(*id);
            }
        }
        by_parent
    }

    pub(crate) fn insert_group(&mut self, node: GroupNode) {
        self.group_order.push(node.id);
        self.groups.insert(node.id, node);
    }

    pub(crate) fn insert_entry(&mut self, node: EntryNode) {
        self.entry_order.push(node.id);
        self.entries.insert(node.id, node);
    }

    /// Is `ancestor` an ancestor of (or equal to) `id`, walking parent
    /// pointers? Used by the move-group executor's cycle check.
    pub(crate) fn is_ancestor_of(&self, ancestor: GroupId, id: GroupId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.groups.get(&current).and_then(|g| g.parent);
        }
        false
    }

    /// Recursively removes `id` and every descendant group/entry from the
    /// arena. Returns the removed group ids (unused by callers today, kept
    /// for symmetry with the entry-removal helper and for tests).
    pub(crate) fn remove_group_recursive(&mut self, id: GroupId) -> Vec<GroupId> {
        let mut to_remove = vec![id];
        let mut frontier = vec![id];
        while let Some(current) = frontier.pop() {
            for child in self.children_groups(Some(current)) {
                to_remove.push(child.id);
                frontier.push(child.id);
            }
        }

        for group_id in &to_remove {
            let owned_entries: Vec<EntryId> = self.children_entries(*group_id).iter().map(|e| e.id).collect();
            for entry_id in owned_entries {
                self.remove_entry(entry_id);
            }
        }

        for group_id in &to_remove {
            self.groups.remove(group_id);
        }
        self.group_order.retain(|g| !to_remove.contains(g));

        to_remove
    }

    pub(crate) fn remove_entry(&mut self, id: EntryId) {
        self.entries.remove(&id);
        self.entry_order.retain(|e| *e != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn fresh_vault_is_empty() {
        assert!(Vault::new().is_empty());
    }

    #[test]
    fn children_groups_preserve_creation_order() {
        let mut vault = Vault::new();
        let ids: Vec<GroupId> = (0..3).map(|_| Uuid::new_v4()).collect();
        for id in &ids {
            vault.insert_group(GroupNode {
                id: *id,
                parent: None,
                title: String::new(),
                attributes: BTreeMap::new(),
            });
        }
        let children: Vec<GroupId> = vault.children_groups(None).iter().map(|g| g.id).collect();
        assert_eq!(children, ids);
    }

    #[test]
    fn remove_group_recursive_drops_descendants_and_entries() {
        let mut vault = Vault::new();
        let root_child = Uuid::new_v4();
        let grandchild = Uuid::new_v4();
        let entry_id = Uuid::new_v4();
        vault.insert_group(GroupNode { id: root_child, parent: None, title: String::new(), attributes: BTreeMap::new() });
        vault.insert_group(GroupNode { id: grandchild, parent: Some(root_child), title: String::new(), attributes: BTreeMap::new() });
        vault.insert_entry(EntryNode { id: entry_id, parent: grandchild, properties: BTreeMap::new(), attributes: BTreeMap::new() });

        let removed = vault.remove_group_recursive(root_child);
        assert_eq!(removed.len(), 2);
        assert!(!vault.contains_group(root_child));
        assert!(!vault.contains_group(grandchild));
        assert!(!vault.contains_entry(entry_id));
    }

    #[test]
    fn equality_ignores_flat_creation_order_but_keeps_sibling_order() {
        // Top-level A, top-level B, then A's child C: flat creation order
        // is [A, B, C]. A depth-first describe/replay of that same tree
        // instead creates [A, C, B] (A's whole subtree before B), a
        // different flat order with identical per-parent sibling order.
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();

        let mut flat_order = Vault::new();
        flat_order.insert_group(GroupNode { id: a, parent: None, title: String::new(), attributes: BTreeMap::new() });
        flat_order.insert_group(GroupNode { id: b, parent: None, title: String::new(), attributes: BTreeMap::new() });
        flat_order.insert_group(GroupNode { id: c, parent: Some(a), title: String::new(), attributes: BTreeMap::new() });

        let mut depth_first_order = Vault::new();
        depth_first_order.insert_group(GroupNode { id: a, parent: None, title: String::new(), attributes: BTreeMap::new() });
        depth_first_order.insert_group(GroupNode { id: c, parent: Some(a), title: String::new(), attributes: BTreeMap::new() });
        depth_first_order.insert_group(GroupNode { id: b, parent: None, title: String::new(), attributes: BTreeMap::new() });

        assert_eq!(flat_order, depth_first_order);
    }

    #[test]
    fn equality_rejects_a_genuine_sibling_order_difference() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        let mut first = Vault::new();
        first.insert_group(GroupNode { id: a, parent: None, title: String::new(), attributes: BTreeMap::new() });
        first.insert_group(GroupNode { id: b, parent: None, title: String::new(), attributes: BTreeMap::new() });

        let mut swapped = Vault::new();
        swapped.insert_group(GroupNode { id: b, parent: None, title: String::new(), attributes: BTreeMap::new() });
        swapped.insert_group(GroupNode { id: a, parent: None, title: String::new(), attributes: BTreeMap::new() });

        assert_ne!(first, swapped);
    }

    #[test]
    fn is_ancestor_of_detects_self_and_descendants() {
        let mut vault = Vault::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        vault.insert_group(GroupNode { id: a, parent: None, title: String::new(), attributes: BTreeMap::new() });
        vault.insert_group(GroupNode { id: b, parent: Some(a), title: String::new(), attributes: BTreeMap::new() });

        assert!(vault.is_ancestor_of(a, a));
        assert!(vault.is_ancestor_of(a, b));
        assert!(!vault.is_ancestor_of(b, a));
    }
}
