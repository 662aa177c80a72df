//!
//! The command builder (`spec.md` §4.3): renders a [`Command`] back into
//! its wire line, applying argument encoding per the manifest.

use super::codec::encode_argument;
use super::manifest::arg_specs;
use super::{Command, ShortKey};
use crate::types::parent_token;

/// Renders `command` as a wire line: short key, one space, then its
/// arguments in manifest order, each encoded per its [`ArgSpec`].
///
/// [`ArgSpec`]: super::manifest::ArgSpec
pub fn build_line(command: &Command) -> String {
    let key = command.short_key();
    let args = raw_args(command);
    let specs = arg_specs(key);
    debug_assert_eq!(args.len(), specs.len(), "argument arity must match the manifest for {key}");

    let mut line = key.code().to_string();
    for (arg, spec) in args.iter().zip(specs) {
        line.push(' ');
        if spec.encode {
            line.push_str(&encode_argument(arg));
        } else {
            line.push_str(arg);
        }
    }
    line
}

/// The unencoded argument values for `command`, in manifest order.
fn raw_args(command: &Command) -> Vec<String> {
    match command {
        Command::SetVaultId { vault_id } => vec![vault_id.clone()],
        Command::Comment { text } => vec![text.clone()],
        Command::SetFormat { tag } => vec![tag.clone()],
        Command::CreateGroup { parent, id } => vec![parent_token(*parent), id.to_string()],
        Command::DeleteGroup { id } => vec![id.to_string()],
        Command::MoveGroup { id, new_parent } => vec![id.to_string(), parent_token(*new_parent)],
        Command::SetGroupTitle { id, title } => vec![id.to_string(), title.clone()],
        Command::SetGroupAttribute { id, key, value } => vec![id.to_string(), key.clone(), value.clone()],
        Command::DeleteGroupAttribute { id, key } => vec![id.to_string(), key.clone()],
        Command::CreateEntry { group, id } => vec![group.to_string(), id.to_string()],
        Command::DeleteEntry { id } => vec![id.to_string()],
        Command::MoveEntry { id, new_group } => vec![id.to_string(), new_group.to_string()],
        Command::SetEntryProperty { id, key, value } => vec![id.to_string(), key.clone(), value.clone()],
        Command::DeleteEntryProperty { id, key } => vec![id.to_string(), key.clone()],
        Command::SetEntryAttribute { id, key, value } => vec![id.to_string(), key.clone(), value.clone()],
        Command::DeleteEntryAttribute { id, key } => vec![id.to_string(), key.clone()],
        Command::SetVaultAttribute { key, value } => vec![key.clone(), value.clone()],
        Command::DeleteVaultAttribute { key } => vec![key.clone()],
        Command::Pad { token } => vec![token.clone()],
    }
}
