//!
//! The command manifest (`spec.md` §4.1): for each short key, the ordered
//! argument descriptors, each flagged with whether its value is subject to
//! argument encoding.

use super::ShortKey;

/// One argument's wire encoding policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgSpec {
    pub encode: bool,
}

const PLAIN: ArgSpec = ArgSpec { encode: false };
const ENCODED: ArgSpec = ArgSpec { encode: true };

/// Returns the ordered argument descriptors for `key`, as declared in the
/// `spec.md` §4.1 manifest table.
pub fn arg_specs(key: ShortKey) -> &'static [ArgSpec] {
    match key {
        ShortKey::Aid => &[PLAIN],
        ShortKey::Cmm => &[PLAIN],
        ShortKey::Fmt => &[PLAIN],
        ShortKey::Cgr => &[PLAIN, PLAIN],
        ShortKey::Dgr => &[PLAIN],
        ShortKey::Mgr => &[PLAIN, PLAIN],
        ShortKey::Tgr => &[PLAIN, ENCODED],
        ShortKey::Sga => &[PLAIN, PLAIN, ENCODED],
        ShortKey::Dga => &[PLAIN, PLAIN],
        ShortKey::Cen => &[PLAIN, PLAIN],
        ShortKey::Den => &[PLAIN],
        ShortKey::Men => &[PLAIN, PLAIN],
        ShortKey::Sep => &[PLAIN, PLAIN, ENCODED],
        ShortKey::Dep => &[PLAIN, PLAIN],
        ShortKey::Sea => &[PLAIN, PLAIN, ENCODED],
        ShortKey::Dea => &[PLAIN, PLAIN],
        // sem/dem mirror sep/dep's arity and encoding exactly; only the
        // wire key differs.
        ShortKey::Sem => &[PLAIN, PLAIN, ENCODED],
        ShortKey::Dem => &[PLAIN, PLAIN],
        ShortKey::Saa => &[PLAIN, ENCODED],
        ShortKey::Daa => &[PLAIN],
        ShortKey::Pad => &[PLAIN],
    }
}
