//! Value encoding for stored payloads.
//!
//! Every value is stored as its JSON text, strings included, so a read
//! returns exactly what was written. Decoding is strict: a payload that is
//! not valid JSON is reported instead of being handed back as raw text.

use crate::error::CacheResult;
use serde::Serialize;
use serde_json::Value;

/// Encodes a value into the text stored in Redis.
pub fn encode<T: Serialize + ?Sized>(value: &T) -> CacheResult<String> {
    Ok(serde_json::to_string(value)?)
}

/// Decodes a stored payload.
pub fn decode(raw: &str) -> CacheResult<Value> {
    Ok(serde_json::from_str(raw)?)
}
