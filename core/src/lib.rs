//! Text core of the relay: decode agent event streams, detect refusals,
//! classify intent, and normalize answers into a required section layout.

pub mod aggregate;
pub mod decode;
pub mod error;
pub mod event;
pub mod intent;
pub mod normalize;
pub mod presets;
pub mod refusal;
pub mod transport;

pub use aggregate::{
    EMPTY_STREAM_SENTINEL, FragmentStream, NO_TEXT_SENTINEL, aggregate, collect, stream,
};
pub use decode::decode_event;
pub use error::{ConfigError, TransportError};
pub use event::{DecodedFragment, EventKind, RawEvent};
pub use intent::is_analysis_intent;
pub use normalize::{NormalizedDocument, PLACEHOLDER, Section, normalize_sections};
pub use presets::SectionPreset;
pub use refusal::{clarification_reply, detect_refusal};
pub use transport::{AgentTransport, DEFAULT_SESSION_ID, EventSource};
