//!
//! The argument codec (`spec.md` §4.2): a reversible transport encoding for
//! argument values that may contain whitespace or quotes.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::error::VaultError;

/// Wraps `value` in the encoded envelope: double quotes around a base64
/// transport of the raw bytes.
pub fn encode_argument(value: &str) -> String {
    format!("\"{}\"", BASE64.encode(value.as_bytes()))
}

/// A token is "encoded" iff it is wrapped in a matching pair of double
/// quotes (`spec.md` §4.2).
pub fn is_encoded(token: &str) -> bool {
    token.len() >= 2 && token.starts_with('"') && token.ends_with('"')
}

/// Decodes `token` if it matches the encoded envelope; otherwise passes it
/// through unchanged, so legacy unencoded values replay without
/// corruption (`spec.md` §4.2, §9 "Argument encoding detection").
pub fn decode_argument(token: &str) -> Result<String, VaultError> {
    if !is_encoded(token) {
        return Ok(token.to_string());
    }
    let inner = &token[1..token.len() - 1];
    let bytes = BASE64
        .decode(inner)
        .map_err(|e| VaultError::Other(format!("malformed encoded argument: {e}")))?;
    String::from_utf8(bytes).map_err(|e| VaultError::Other(format!("encoded argument is not valid utf-8: {e}")))
}
