//!
//! The merge preprocessor (`spec.md` §4.8): strips destructive commands
//! from a history prior to merging it with a divergent history, so that
//! concatenation-then-replay keeps the union of creations and last-writer
//! sets instead of re-applying deletes the other side never saw.

use crate::command::parse::parse_line;
use crate::share::strip_share_prefix;

/// Returns a copy of `history` with every destructive command removed.
///
/// A line that fails to parse is kept as-is. Rejecting it is replay's job
/// (`spec.md` §7: "a corrupt line aborts replay rather than skipping
/// silently"), not this preprocessor's.
pub fn strip_destructive(history: &[String]) -> Vec<String> {
    history
        .iter()
        .filter(|line| !is_destructive_line(line))
        .cloned()
        .collect()
}

/// A line is destructive if, once its share prefix (if any) is stripped,
/// its short key is destructive (`spec.md` §4.8). Share-scoped lines
/// (`spec.md` §3/§6) carry a `$<uuid> ` prefix that the tokenizer's "three
/// lowercase letters" check would otherwise reject outright, which would
/// wrongly keep every share-scoped destructive command instead of
/// stripping it.
fn is_destructive_line(line: &str) -> bool {
    let command_part = match strip_share_prefix(line) {
        Some((_, rest)) => rest,
        None => line,
    };
    match parse_line(command_part) {
        Ok(parsed) => parsed.short_key.is_destructive(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn removes_destructive_commands_and_keeps_the_rest() {
        let g1 = Uuid::new_v4();
        let e1 = Uuid::new_v4();
        let history = vec![
            format!("cgr 0 {g1}"),
            format!("cen {g1} {e1}"),
            format!("dep {e1} password"),
            format!("den {e1}"),
            format!("dgr {g1}"),
        ];

        let stripped = strip_destructive(&history);
        assert_eq!(stripped, vec![format!("cgr 0 {g1}"), format!("cen {g1} {e1}")]);
    }

    #[test]
    fn preserves_order_sensitive_non_destructive_commands() {
        let g1 = Uuid::new_v4();
        let g2 = Uuid::new_v4();
        let history = vec![format!("cgr 0 {g1}"), format!("cgr 0 {g2}"), format!("mgr {g1} {g2}")];
        assert_eq!(strip_destructive(&history), history);
    }

    #[test]
    fn stripping_is_idempotent() {
        let g1 = Uuid::new_v4();
        let e1 = Uuid::new_v4();
        let history = vec![format!("cgr 0 {g1}"), format!("cen {g1} {e1}"), format!("den {e1}")];
        let once = strip_destructive(&history);
        let twice = strip_destructive(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn unparseable_lines_pass_through_unchanged() {
        let history = vec!["not a valid line at all".to_string()];
        assert_eq!(strip_destructive(&history), history);
    }

    #[test]
    fn share_scoped_destructive_commands_are_stripped_too() {
        let share = Uuid::new_v4();
        let g1 = Uuid::new_v4();
        let e1 = Uuid::new_v4();
        let history = vec![
            format!("cgr 0 {g1}"),
            format!("cen {g1} {e1}"),
            format!("${share} dep {e1} password"),
            format!("${share} den {e1}"),
            format!("${share} dgr {g1}"),
        ];

        let stripped = strip_destructive(&history);
        assert_eq!(stripped, vec![format!("cgr 0 {g1}"), format!("cen {g1} {e1}")]);
    }
}
