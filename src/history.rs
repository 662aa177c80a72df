//!
//! The history executor (`spec.md` §4.6), named "Westley" after the
//! component's working name in the source this crate reimplements: owns a
//! dataset and its append-only history, validates and dispatches commands,
//! and maintains the dirty/read-only bookkeeping the rest of the engine
//! depends on.

use base64::Engine;
use rand_core::{OsRng, RngCore};

use crate::command::{self, Command, ShortKey};
use crate::config::EngineOptions;
use crate::dataset::Vault;
use crate::describe::describe_dataset;
use crate::error::VaultError;
use crate::executor::{self, ExecOptions};
use crate::share::strip_share_prefix;
use crate::types::{EntryId, GroupId, VaultId};

type Subscriber = Box<dyn Fn(&[String]) + Send + Sync>;

/// Owns a [`Vault`] plus the history that reconstructs it (`spec.md` §4.6).
pub struct Westley {
    dataset: Vault,
    history: Vec<String>,
    dirty: bool,
    read_only: bool,
    options: EngineOptions,
    subscribers: Vec<Subscriber>,
}

impl Westley {
    /// A fresh executor over an empty dataset.
    pub fn new(options: EngineOptions) -> Self {
        Self {
            dataset: Vault::new(),
            history: Vec::new(),
            dirty: false,
            read_only: false,
            options,
            subscribers: Vec::new(),
        }
    }

    /// Rebuilds an executor by replaying an already-finalised history
    /// (the load path, `spec.md` §2 data flow). Unlike [`Westley::execute`],
    /// this does not append an auto-`pad`, does not mark the result dirty,
    /// and does not notify subscribers. Those side effects belong to
    /// newly authored batches, not to reconstructing state that already
    /// exists on disk. A corrupt line aborts the replay (`spec.md` §7).
    pub fn from_history(lines: &[String], options: EngineOptions) -> Result<Self, VaultError> {
        let mut dataset = Vault::new();
        for line in lines {
            apply_line(&mut dataset, line)?;
        }
        Ok(Self {
            dataset,
            history: lines.to_vec(),
            dirty: false,
            read_only: false,
            options,
            subscribers: Vec::new(),
        })
    }

    /// Marks this executor read-only (`spec.md` §5, §7): every subsequent
    /// mutation rejects with [`VaultError::ReadOnly`]. Intended for
    /// snapshots and for histories undergoing merge-preprocessing.
    pub fn into_read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn dataset(&self) -> &Vault {
        &self.dataset
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Registers a callback invoked once per successful [`Westley::execute`]
    /// call with the full history so far (`spec.md` §9: event emitter
    /// re-architected as explicit subscriber callbacks, never ambient
    /// inheritance from an emitter base).
    pub fn subscribe(&mut self, callback: impl Fn(&[String]) + Send + Sync + 'static) {
        self.subscribers.push(Box::new(callback));
    }

    /// Executes one or more command lines as a single batch (`spec.md`
    /// §4.6). Rejects immediately with [`VaultError::ReadOnly`] if this
    /// executor is read-only.
    ///
    /// Commands apply and append to history in the given order. If a
    /// command fails, execution stops there: the dataset keeps whatever
    /// mutations earlier commands in the batch already made, and the
    /// failing and remaining commands are not appended to history. This
    /// crate does not snapshot-restore on mid-batch failure (`spec.md` §9
    /// "Destructive-rollback ambiguity"). Callers wanting atomicity must
    /// snapshot `history().len()` and `dataset()` themselves beforehand.
    ///
    /// An empty batch (`lines` is `&[]`) is a no-op: it does not mutate the
    /// dataset, append an auto-`pad`, set `dirty`, or notify subscribers.
    pub fn execute(&mut self, lines: &[&str]) -> Result<(), VaultError> {
        if self.read_only {
            return Err(VaultError::ReadOnly);
        }
        if lines.is_empty() {
            return Ok(());
        }

        let mut last_was_pad = false;
        for line in lines {
            let short_key = apply_line(&mut self.dataset, line)?;
            self.history.push(line.to_string());
            self.dirty = true;
            last_was_pad = short_key == ShortKey::Pad;
        }

        if !last_was_pad {
            let pad_line = command::builder::build_line(&Command::Pad { token: random_pad_token(&self.options) });
            apply_line(&mut self.dataset, &pad_line)?;
            self.history.push(pad_line);
        }

        tracing::debug!(batch_len = lines.len(), history_len = self.history.len(), "executed command batch");
        self.notify();
        Ok(())
    }

    /// Resets the dataset and history to empty and clears the dirty flag.
    /// Indistinguishable afterward from a freshly constructed executor
    /// with the same options (`spec.md` §8).
    pub fn clear(&mut self) {
        self.dataset = Vault::new();
        self.history.clear();
        self.dirty = false;
    }

    /// True once the history is long enough and the dataset is non-empty
    /// (`spec.md` §4.9). A caller-facing advisory gate; [`Westley::flatten`]
    /// does not itself require this to be true.
    pub fn can_be_flattened(&self) -> bool {
        self.history.len() >= self.options.flatten_threshold && !self.dataset.is_empty()
    }

    /// Replaces the history with a minimal equivalent built from
    /// [`describe_dataset`], prefixed with `fmt`/`aid` (`spec.md` §4.9).
    /// The dataset itself is unchanged.
    pub fn flatten(&mut self) {
        let mut flattened = Vec::new();
        if let Some(format) = &self.dataset.format {
            flattened.push(command::builder::build_line(&Command::SetFormat { tag: format.clone() }));
        }
        if !self.dataset.id.is_empty() {
            flattened.push(command::builder::build_line(&Command::SetVaultId { vault_id: self.dataset.id.clone() }));
        }
        flattened.extend(describe_dataset(&self.dataset));

        tracing::debug!(old_len = self.history.len(), new_len = flattened.len(), "flattened history");
        self.history = flattened;
    }

    /// Alias for [`Westley::flatten`] matching the collaborator surface
    /// name in `spec.md` §6.
    pub fn optimise(&mut self) {
        self.flatten();
    }

    pub fn vault_id(&self) -> &VaultId {
        &self.dataset.id
    }

    pub fn all_groups(&self) -> Vec<&crate::dataset::GroupNode> {
        self.dataset.all_groups()
    }

    pub fn all_entries(&self) -> Vec<&crate::dataset::EntryNode> {
        self.dataset.all_entries()
    }

    pub fn create_group(&mut self, parent: Option<GroupId>, id: GroupId) -> Result<(), VaultError> {
        self.run_one(Command::CreateGroup { parent, id })
    }

    pub fn delete_group(&mut self, id: GroupId) -> Result<(), VaultError> {
        self.run_one(Command::DeleteGroup { id })
    }

    pub fn move_group(&mut self, id: GroupId, new_parent: Option<GroupId>) -> Result<(), VaultError> {
        self.run_one(Command::MoveGroup { id, new_parent })
    }

    pub fn set_group_title(&mut self, id: GroupId, title: impl Into<String>) -> Result<(), VaultError> {
        self.run_one(Command::SetGroupTitle { id, title: title.into() })
    }

    pub fn set_group_attribute(
        &mut self,
        id: GroupId,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), VaultError> {
        self.run_one(Command::SetGroupAttribute { id, key: key.into(), value: value.into() })
    }

    pub fn delete_group_attribute(&mut self, id: GroupId, key: impl Into<String>) -> Result<(), VaultError> {
        self.run_one(Command::DeleteGroupAttribute { id, key: key.into() })
    }

    pub fn create_entry(&mut self, group: GroupId, id: EntryId) -> Result<(), VaultError> {
        self.run_one(Command::CreateEntry { group, id })
    }

    pub fn delete_entry(&mut self, id: EntryId) -> Result<(), VaultError> {
        self.run_one(Command::DeleteEntry { id })
    }

    pub fn move_entry(&mut self, id: EntryId, new_group: GroupId) -> Result<(), VaultError> {
        self.run_one(Command::MoveEntry { id, new_group })
    }

    pub fn set_entry_property(
        &mut self,
        id: EntryId,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), VaultError> {
        self.run_one(Command::SetEntryProperty { id, key: key.into(), value: value.into() })
    }

    pub fn delete_entry_property(&mut self, id: EntryId, key: impl Into<String>) -> Result<(), VaultError> {
        self.run_one(Command::DeleteEntryProperty { id, key: key.into() })
    }

    pub fn set_entry_attribute(
        &mut self,
        id: EntryId,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), VaultError> {
        self.run_one(Command::SetEntryAttribute { id, key: key.into(), value: value.into() })
    }

    pub fn delete_entry_attribute(&mut self, id: EntryId, key: impl Into<String>) -> Result<(), VaultError> {
        self.run_one(Command::DeleteEntryAttribute { id, key: key.into() })
    }

    pub fn set_vault_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) -> Result<(), VaultError> {
        self.run_one(Command::SetVaultAttribute { key: key.into(), value: value.into() })
    }

    pub fn delete_vault_attribute(&mut self, key: impl Into<String>) -> Result<(), VaultError> {
        self.run_one(Command::DeleteVaultAttribute { key: key.into() })
    }

    fn run_one(&mut self, command: Command) -> Result<(), VaultError> {
        let line = command::builder::build_line(&command);
        self.execute(&[&line])
    }

    fn notify(&self) {
        for subscriber in &self.subscribers {
            subscriber(&self.history);
        }
    }
}

fn apply_line(dataset: &mut Vault, line: &str) -> Result<ShortKey, VaultError> {
    let (share, command_part) = match strip_share_prefix(line) {
        Some((share_id, rest)) => (Some(share_id), rest),
        None => (None, line),
    };

    let parsed = command::parse::parse_line(command_part)?;
    executor::apply(dataset, ExecOptions { share }, &parsed.command).map_err(|e| parsed.short_key.wrap(e))?;
    Ok(parsed.short_key)
}

fn random_pad_token(options: &EngineOptions) -> String {
    let mut bytes = vec![0u8; options.pad_token_bytes];
    OsRng.fill_bytes(&mut bytes);
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn create_group_at_root_appends_a_pad_and_marks_dirty() {
        let mut westley = Westley::new(EngineOptions::default());
        let id = Uuid::new_v4();
        westley.execute(&[&format!("cgr 0 {id}")]).unwrap();

        assert!(westley.dataset().contains_group(id));
        assert!(westley.is_dirty());
        assert_eq!(westley.history().len(), 2);
        assert!(westley.history()[1].starts_with("pad "));
    }

    #[test]
    fn a_batch_already_ending_in_pad_gets_no_second_pad() {
        let mut westley = Westley::new(EngineOptions::default());
        let id = Uuid::new_v4();
        westley.execute(&[&format!("cgr 0 {id}"), "pad AAAA"]).unwrap();
        assert_eq!(westley.history().len(), 2);
        assert_eq!(westley.history()[1], "pad AAAA");
    }

    #[test]
    fn an_empty_batch_is_a_no_op() {
        let mut westley = Westley::new(EngineOptions::default());
        westley.execute(&[]).unwrap();
        assert!(westley.history().is_empty());
        assert!(!westley.is_dirty());
        assert!(westley.dataset().is_empty());
    }

    #[test]
    fn read_only_executor_rejects_every_mutation() {
        let mut westley = Westley::new(EngineOptions::default()).into_read_only();
        let err = westley.execute(&["cmm hi"]).unwrap_err();
        assert!(matches!(err, VaultError::ReadOnly));
    }

    #[test]
    fn a_failing_command_leaves_history_unchanged() {
        let mut westley = Westley::new(EngineOptions::default());
        let err = westley.execute(&["cen 00000000-0000-0000-0000-000000000000 11111111-1111-1111-1111-111111111111"]);
        assert!(err.is_err());
        assert!(westley.history().is_empty());
    }

    #[test]
    fn clear_returns_to_a_fresh_state() {
        let mut westley = Westley::new(EngineOptions::default());
        westley.execute(&[&format!("cgr 0 {}", Uuid::new_v4())]).unwrap();
        westley.clear();
        assert!(westley.history().is_empty());
        assert!(!westley.is_dirty());
        assert!(westley.dataset().is_empty());
    }

    #[test]
    fn subscribers_fire_once_per_execute_call() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = Arc::clone(&count);
        let mut westley = Westley::new(EngineOptions::default());
        westley.subscribe(move |_| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });

        westley.execute(&[&format!("cgr 0 {}", Uuid::new_v4()), "cmm hello", "cmm world"]).unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn flatten_preserves_dataset_state_and_shrinks_or_holds_history() {
        let mut westley = Westley::new(EngineOptions::default());
        let group = Uuid::new_v4();
        westley.execute(&[&format!("cgr 0 {group}")]).unwrap();
        for i in 0..20 {
            westley.execute(&[&format!("sga {group} k{i} v{i}")]).unwrap();
        }
        let before_len = westley.history().len();
        let before_dataset = westley.dataset().clone();

        westley.flatten();

        assert_eq!(*westley.dataset(), before_dataset);
        assert!(westley.history().len() <= before_len);
    }

    #[test]
    fn flatten_without_an_aid_omits_the_aid_line_and_replays_cleanly() {
        let mut westley = Westley::new(EngineOptions::default());
        westley.execute(&[&format!("cgr 0 {}", Uuid::new_v4())]).unwrap();

        westley.flatten();

        assert!(westley.history().iter().all(|line| !line.starts_with("aid ")));
        Westley::from_history(westley.history(), EngineOptions::default()).unwrap();
    }

    #[test]
    fn legacy_meta_alias_routes_to_the_property_map() {
        let mut westley = Westley::new(EngineOptions::default());
        let entry = Uuid::new_v4();
        let group = Uuid::new_v4();
        westley.execute(&[&format!("cgr 0 {group}"), &format!("cen {group} {entry}")]).unwrap();
        westley.execute(&[&format!("sem {entry} note hi")]).unwrap();

        assert_eq!(westley.dataset().entry(entry).unwrap().properties.get("note"), Some(&"hi".to_string()));
    }

    #[test]
    fn from_history_replays_without_touching_dirty_or_appending_pad() {
        let id = Uuid::new_v4();
        let lines = vec![format!("cgr 0 {id}")];
        let westley = Westley::from_history(&lines, EngineOptions::default()).unwrap();

        assert!(westley.dataset().contains_group(id));
        assert!(!westley.is_dirty());
        assert_eq!(westley.history(), lines.as_slice());
    }

    #[test]
    fn share_prefixed_lines_mutate_the_dataset_and_keep_their_prefix_in_history() {
        let mut westley = Westley::new(EngineOptions::default());
        let group = Uuid::new_v4();
        let entry = Uuid::new_v4();
        let share = Uuid::new_v4();
        westley.execute(&[&format!("cgr 0 {group}")]).unwrap();
        westley.execute(&[&format!("${share} cen {group} {entry}")]).unwrap();

        assert!(westley.dataset().contains_entry(entry));
        assert!(westley.history().iter().any(|line| line.starts_with(&format!("${share} cen"))));
    }
}
