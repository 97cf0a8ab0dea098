// src/trust/codec.rs

//! Transport encoding for trusted roots
//!
//! `encode` is plain standard base64. `decode` reverses it and returns the
//! canonical form of the document: object keys sorted, one-space
//! indentation. Two roots that differ only in formatting decode to the same
//! bytes.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Indentation used for canonical root documents
const CANONICAL_INDENT: &[u8] = b" ";

/// Encode raw root bytes into a transport string
pub fn encode(root: &[u8]) -> String {
    BASE64.encode(root)
}

/// Decode a transport string into canonical root bytes
pub fn decode(transport: &str) -> Result<Vec<u8>> {
    let raw = BASE64
        .decode(transport)
        .map_err(|e| Error::DecodeError(format!("not valid base64: {e}")))?;
    canonicalize(&raw)
}

/// Re-serialize a JSON document in canonical form
pub fn canonicalize(document: &[u8]) -> Result<Vec<u8>> {
    let value: Value = serde_json::from_slice(document)
        .map_err(|e| Error::DecodeError(format!("not valid JSON: {e}")))?;

    let mut out = Vec::with_capacity(document.len());
    let mut serializer =
        Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(CANONICAL_INDENT));
    sort_keys(value)
        .serialize(&mut serializer)
        .map_err(|e| Error::DecodeError(format!("failed to re-serialize root: {e}")))?;

    Ok(out)
}

/// Rebuild every object with its keys in lexicographic order
///
/// `serde_json::Map` only sorts when the `preserve_order` feature is off,
/// and any crate in the build can turn it on.
fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            let mut sorted = Map::new();
            for (key, value) in entries {
                sorted.insert(key, sort_keys(value));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode() {
        assert_eq!(encode(b"123"), "MTIz");
        assert_eq!(encode(b""), "");
    }

    #[test]
    fn test_decode_canonicalizes() {
        let transport = encode(br#"{"b":1,"a":[1,2],"c":{"z":null,"y":"s"}}"#);
        let decoded = decode(&transport).unwrap();
        let expected = "{\n \"a\": [\n  1,\n  2\n ],\n \"b\": 1,\n \"c\": {\n  \"y\": \"s\",\n  \"z\": null\n }\n}";
        assert_eq!(String::from_utf8(decoded).unwrap(), expected);
    }

    #[test]
    fn test_formatting_differences_decode_identically() {
        let compact = encode(br#"{"signed":{"version":1},"signatures":[]}"#);
        let spaced = encode(b"{\n    \"signatures\" : [ ],\n    \"signed\" : { \"version\" : 1 }\n}\n");
        assert_eq!(decode(&compact).unwrap(), decode(&spaced).unwrap());
    }

    #[test]
    fn test_canonicalize_is_idempotent() {
        let once = canonicalize(br#"{"k":[{"b":2,"a":1}]}"#).unwrap();
        let twice = canonicalize(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_decode_rejects_invalid_base64() {
        let err = decode("not base64!!").unwrap_err();
        assert!(matches!(err, Error::DecodeError(_)));
    }

    #[test]
    fn test_decode_rejects_non_json() {
        let err = decode(&encode(b"123 not json")).unwrap_err();
        assert!(matches!(err, Error::DecodeError(_)));
    }
}
