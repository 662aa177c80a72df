//!
//! The share demultiplexer (`spec.md` §4.7): partitions a history into a
//! base history and one history per share ID, based on the `$<uuid> ` line
//! prefix.

use std::collections::HashMap;

use uuid::Uuid;

use crate::types::ShareId;

/// The wire prefix marking a line as belonging to a share (`spec.md` §3,
/// §6 grammar: `share-prefix = "$" uuid SP`).
const SHARE_SIGIL: char = '$';

/// The result of demultiplexing a history: lines with no share prefix, and
/// one ordered bucket per share ID encountered, each order-preserving.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShareSplit {
    pub base: Vec<String>,
    pub shares: HashMap<ShareId, Vec<String>>,
}

/// Splits `history` into `base` and per-share buckets, stripping the share
/// prefix from lines that carry one.
pub fn demultiplex(history: &[String]) -> ShareSplit {
    let mut split = ShareSplit::default();
    for line in history {
        match strip_share_prefix(line) {
            Some((share_id, rest)) => split.shares.entry(share_id).or_default().push(rest.to_string()),
            None => split.base.push(line.clone()),
        }
    }
    split
}

/// If `line` begins with `$<uuid> `, returns the share id and the
/// remainder of the line with the prefix removed. Otherwise `None`.
pub fn strip_share_prefix(line: &str) -> Option<(Uuid, &str)> {
    let rest = line.strip_prefix(SHARE_SIGIL)?;
    let space = rest.find(' ')?;
    let (uuid_str, tail) = rest.split_at(space);
    let share_id = Uuid::parse_str(uuid_str).ok()?;
    Some((share_id, &tail[1..]))
}
