#![no_main]

// Harness: history_replay. Replaying an arbitrary, possibly-corrupt line
// sequence through `Westley::from_history` must either succeed or return
// an error; it must never panic (`spec.md` §7: "a corrupt line aborts
// replay rather than skipping silently").

use libfuzzer_sys::fuzz_target;
use vault_format_core::history::Westley;
use vault_format_core::EngineOptions;

fuzz_target!(|lines: Vec<String>| {
    let _ = Westley::from_history(&lines, EngineOptions::default());
});
