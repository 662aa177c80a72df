#![no_main]

// Harness: envelope_roundtrip. The envelope codec must never panic on
// attacker-controlled on-disk bytes, and an envelope this crate itself
// produced must always decode back to the history that produced it.

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use vault_format_core::credentials::InMemoryCredentials;
use vault_format_core::envelope::{decode_history, encode_history, FormatEnv};

#[derive(Arbitrary, Debug)]
struct Input {
    raw_envelope: String,
    history_lines: Vec<String>,
    key: Vec<u8>,
}

fuzz_target!(|input: Input| {
    let env = FormatEnv::with_defaults();
    let mut credentials = InMemoryCredentials::new();
    credentials.insert("default", input.key.clone());

    // Arbitrary bytes masquerading as an envelope must never panic,
    // whatever error kind they produce.
    let _ = decode_history(&input.raw_envelope, "default", &credentials, &env);

    // A freshly encoded envelope must always decode back to its input.
    if let Ok(encoded) = encode_history(&input.history_lines, "default", &credentials, &env) {
        let decoded = decode_history(&encoded, "default", &credentials, &env)
            .expect("an envelope this crate just produced must decode");
        // Joined-text equality, not vector equality: a single all-empty-line
        // history and the empty history both serialise to an empty payload
        // and are indistinguishable on the wire, by construction.
        assert_eq!(decoded.join("\n"), input.history_lines.join("\n"));
    }
});
