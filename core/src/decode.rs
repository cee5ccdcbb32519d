//! Turning raw agent events into plain text.
//!
//! Decoding never fails: undecodable bytes become replacement characters and
//! a payload that is not a useful JSON envelope is passed through as prose.

use std::borrow::Cow;

use serde_json::Value;

use crate::event::{DecodedFragment, RawEvent};

/// Envelope keys tried in priority order when a payload is a JSON object.
pub const ENVELOPE_TEXT_KEYS: [&str; 5] = ["text", "content", "message", "output", "outputText"];

/// Decode payload bytes as UTF-8, replacing invalid sequences with U+FFFD.
pub fn decode_payload(payload: Option<&[u8]>) -> Cow<'_, str> {
    match payload {
        Some(bytes) if !bytes.is_empty() => String::from_utf8_lossy(bytes),
        _ => Cow::Borrowed(""),
    }
}

/// Extract the text field of a JSON envelope, if the payload is one.
///
/// Returns `None` when the text is not a JSON object or none of
/// [`ENVELOPE_TEXT_KEYS`] holds a non-blank string. The matched value is
/// returned as-is; nested JSON inside it is not unwrapped again.
pub fn unwrap_json_envelope(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if !trimmed.starts_with('{') {
        return None;
    }
    let Ok(Value::Object(object)) = serde_json::from_str::<Value>(trimmed) else {
        return None;
    };
    ENVELOPE_TEXT_KEYS.iter().find_map(|key| match object.get(*key) {
        Some(Value::String(value)) if !value.trim().is_empty() => Some(value.clone()),
        _ => None,
    })
}

/// Decoded text of a payload: the envelope text when present, else the raw text.
pub fn payload_text(payload: Option<&[u8]>) -> String {
    let decoded = decode_payload(payload);
    unwrap_json_envelope(&decoded).unwrap_or_else(|| decoded.into_owned())
}

/// Decode one event.
///
/// Returns `None` for kinds that never contribute text. Their payload is
/// still decoded and logged so traces stay observable.
pub fn decode_event(event: &RawEvent) -> Option<DecodedFragment> {
    let text = payload_text(event.payload.as_deref());
    if !event.event_kind().contributes_text() {
        tracing::trace!(kind = %event.kind, text = %text, "dropping non-text agent event");
        return None;
    }
    Some(DecodedFragment { text })
}
