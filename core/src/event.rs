use serde_json::Value;

use crate::error::TransportError;

/// Event kind that carries answer text.
pub const KIND_CHUNK: &str = "chunk";
/// Event kind emitted once the agent has finished its answer.
pub const KIND_FINAL_RESPONSE: &str = "finalResponse";

/// Classification of a raw event kind tag.
///
/// Kinds are free-form strings on the wire. Only `chunk` and `finalResponse`
/// carry answer text; everything else (trace, metadata, error markers) is
/// observed but never aggregated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    Chunk,
    FinalResponse,
    Other(String),
}

impl EventKind {
    pub fn parse(kind: &str) -> Self {
        match kind {
            KIND_CHUNK => Self::Chunk,
            KIND_FINAL_RESPONSE => Self::FinalResponse,
            other => Self::Other(other.to_string()),
        }
    }

    /// Whether events of this kind contribute text to the aggregate.
    pub fn contributes_text(&self) -> bool {
        matches!(self, Self::Chunk | Self::FinalResponse)
    }
}

/// One unit emitted by the agent transport. Consumed once by the decoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEvent {
    pub kind: String,
    pub payload: Option<Vec<u8>>,
}

impl RawEvent {
    pub fn new(kind: impl Into<String>, payload: Option<Vec<u8>>) -> Self {
        Self {
            kind: kind.into(),
            payload,
        }
    }

    /// Convenience constructor for a `chunk` event carrying UTF-8 text.
    pub fn chunk(text: impl Into<String>) -> Self {
        Self::new(KIND_CHUNK, Some(text.into().into_bytes()))
    }

    pub fn event_kind(&self) -> EventKind {
        EventKind::parse(&self.kind)
    }

    /// Read the transport's JSON envelope: `{"<kind>": {"bytes": ...}}`.
    ///
    /// `bytes` may be a string (taken as UTF-8 text) or an array of byte
    /// values. A missing or null `bytes` field yields an event without
    /// payload, which the aggregator skips. When an envelope carries several
    /// keys, the first text-carrying kind wins, else the first key.
    pub fn from_json(value: &Value) -> Result<Self, TransportError> {
        let object = value.as_object().ok_or_else(|| {
            TransportError::Malformed("event envelope must be a JSON object".to_string())
        })?;
        let (kind, body) = object
            .iter()
            .find(|(kind, _)| EventKind::parse(kind).contributes_text())
            .or_else(|| object.iter().next())
            .ok_or_else(|| TransportError::Malformed("event envelope is empty".to_string()))?;
        if object.len() > 1 {
            tracing::debug!(kind = %kind, keys = object.len(), "multi-key event envelope");
        }

        let payload = match body.get("bytes") {
            None | Some(Value::Null) => None,
            Some(Value::String(text)) => Some(text.as_bytes().to_vec()),
            Some(Value::Array(items)) => Some(byte_array(kind, items)?),
            Some(other) => {
                return Err(TransportError::Malformed(format!(
                    "event '{kind}' has unsupported bytes value: {other}"
                )));
            }
        };

        Ok(Self::new(kind.clone(), payload))
    }

    /// Parse one line of newline-delimited JSON events.
    pub fn from_json_line(line: &str) -> Result<Self, TransportError> {
        let value: Value = serde_json::from_str(line)
            .map_err(|e| TransportError::Malformed(format!("invalid event JSON: {e}")))?;
        Self::from_json(&value)
    }
}

fn byte_array(kind: &str, items: &[Value]) -> Result<Vec<u8>, TransportError> {
    items
        .iter()
        .map(|item| {
            item.as_u64()
                .and_then(|n| u8::try_from(n).ok())
                .ok_or_else(|| {
                    TransportError::Malformed(format!(
                        "event '{kind}' has a non-byte value in bytes array: {item}"
                    ))
                })
        })
        .collect()
}

/// Plain-text contents of one contributing event after decode and unwrap.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DecodedFragment {
    pub text: String,
}

impl DecodedFragment {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}
