//!
//! The command parser (`spec.md` §4.5): ties the tokenizer, manifest, and
//! argument codec together into a single decoded [`Command`].

use uuid::Uuid;

use super::codec::decode_argument;
use super::manifest::arg_specs;
use super::tokenizer::tokenize;
use super::{Command, ShortKey};
use crate::error::VaultError;
use crate::types::parse_parent_token;

/// A line decoded down to its wire short key and the [`Command`] it denotes.
///
/// `short_key` is kept alongside `command` because `sem`/`dem` lines parse
/// to the same [`Command`] variant as `sep`/`dep` but must still be
/// recognised as the legacy wire key by callers that care (the merge
/// preprocessor's destructive-key table, `spec.md` §4.8).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    pub short_key: ShortKey,
    pub command: Command,
}

/// Parses one wire line into a [`ParsedLine`].
pub fn parse_line(line: &str) -> Result<ParsedLine, VaultError> {
    let (code, tokens) = tokenize(line)?;
    let short_key = ShortKey::from_code(code).ok_or_else(|| VaultError::UnknownCommand(code.to_string()))?;

    let specs = arg_specs(short_key);
    if tokens.len() != specs.len() {
        return Err(VaultError::InvalidCommand(line.to_string()));
    }

    let mut args = Vec::with_capacity(tokens.len());
    for token in &tokens {
        args.push(decode_argument(token)?);
    }

    let command = build_command(short_key, &args, line)?;
    Ok(ParsedLine { short_key, command })
}

fn uuid_arg(value: &str, line: &str) -> Result<Uuid, VaultError> {
    Uuid::parse_str(value).map_err(|_| VaultError::InvalidCommand(line.to_string()))
}

fn parent_arg(value: &str, line: &str) -> Result<Option<Uuid>, VaultError> {
    parse_parent_token(value).ok_or_else(|| VaultError::InvalidCommand(line.to_string()))
}

fn build_command(key: ShortKey, args: &[String], line: &str) -> Result<Command, VaultError> {
    Ok(match key {
        ShortKey::Aid => Command::SetVaultId { vault_id: args[0].clone() },
        ShortKey::Cmm => Command::Comment { text: args[0].clone() },
        ShortKey::Fmt => Command::SetFormat { tag: args[0].clone() },
        ShortKey::Cgr => Command::CreateGroup {
            parent: parent_arg(&args[0], line)?,
            id: uuid_arg(&args[1], line)?,
        },
        ShortKey::Dgr => Command::DeleteGroup { id: uuid_arg(&args[0], line)? },
        ShortKey::Mgr => Command::MoveGroup {
            id: uuid_arg(&args[0], line)?,
            new_parent: parent_arg(&args[1], line)?,
        },
        ShortKey::Tgr => Command::SetGroupTitle { id: uuid_arg(&args[0], line)?, title: args[1].clone() },
        ShortKey::Sga => Command::SetGroupAttribute {
            id: uuid_arg(&args[0], line)?,
            key: args[1].clone(),
            value: args[2].clone(),
        },
        ShortKey::Dga => Command::DeleteGroupAttribute { id: uuid_arg(&args[0], line)?, key: args[1].clone() },
        ShortKey::Cen => Command::CreateEntry { group: uuid_arg(&args[0], line)?, id: uuid_arg(&args[1], line)? },
        ShortKey::Den => Command::DeleteEntry { id: uuid_arg(&args[0], line)? },
        ShortKey::Men => Command::MoveEntry { id: uuid_arg(&args[0], line)?, new_group: uuid_arg(&args[1], line)? },
        ShortKey::Sep | ShortKey::Sem => Command::SetEntryProperty {
            id: uuid_arg(&args[0], line)?,
            key: args[1].clone(),
            value: args[2].clone(),
        },
        ShortKey::Dep | ShortKey::Dem => {
            Command::DeleteEntryProperty { id: uuid_arg(&args[0], line)?, key: args[1].clone() }
        }
        ShortKey::Sea => Command::SetEntryAttribute {
            id: uuid_arg(&args[0], line)?,
            key: args[1].clone(),
            value: args[2].clone(),
        },
        ShortKey::Dea => Command::DeleteEntryAttribute { id: uuid_arg(&args[0], line)?, key: args[1].clone() },
        ShortKey::Saa => Command::SetVaultAttribute { key: args[0].clone(), value: args[1].clone() },
        ShortKey::Daa => Command::DeleteVaultAttribute { key: args[0].clone() },
        ShortKey::Pad => Command::Pad { token: args[0].clone() },
    })
}
