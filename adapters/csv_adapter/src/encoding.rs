//! Body encoding for the `message` column.
//!
//! Bodies use `application/x-www-form-urlencoded` byte serialization: ASCII
//! alphanumerics and `*-._` are kept, a space becomes `+`, and every other
//! byte of the UTF-8 text becomes `%XX` with uppercase hex. The encoded form
//! never contains a comma, a line break, or a non-ASCII byte.

use percent_encoding::percent_decode_str;
use std::str::Utf8Error;

/// Percent-encodes a message body for a single CSV field.
pub fn encode_body(body: &str) -> String {
    form_urlencoded::byte_serialize(body.as_bytes()).collect()
}

/// Reverses [`encode_body`].
///
/// Fails only if the decoded bytes are not valid UTF-8, which cannot happen
/// for output of `encode_body`.
pub fn decode_body(encoded: &str) -> Result<String, Utf8Error> {
    // A literal '+' is always written as %2B, so every '+' here is a space.
    let spaced = encoded.replace('+', " ");
    let decoded = percent_decode_str(&spaced).decode_utf8()?;
    Ok(decoded.into_owned())
}
