use futures::future::BoxFuture;
use futures::stream::BoxStream;

use crate::error::TransportError;
use crate::event::RawEvent;

/// Default session identifier when the caller supplies none.
pub const DEFAULT_SESSION_ID: &str = "default-session";

/// Events of one agent invocation. Dropping it releases the underlying
/// connection.
pub type EventSource = BoxStream<'static, Result<RawEvent, TransportError>>;

/// The agent invocation seam.
///
/// Implementations own whatever client handle they need; callers pass the
/// transport explicitly instead of reaching for a process-wide client.
/// Returning `Ok(None)` means the agent accepted the request but produced
/// no event stream.
pub trait AgentTransport: Send + Sync {
    fn invoke<'a>(
        &'a self,
        input: &'a str,
        session_id: &'a str,
    ) -> BoxFuture<'a, Result<Option<EventSource>, TransportError>>;
}

/// Resolve an optional, possibly blank session id.
pub fn session_or_default(session_id: Option<&str>) -> &str {
    session_id
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .unwrap_or(DEFAULT_SESSION_ID)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_session_ids_fall_back_to_default() {
        assert_eq!(session_or_default(None), DEFAULT_SESSION_ID);
        assert_eq!(session_or_default(Some("  ")), DEFAULT_SESSION_ID);
        assert_eq!(session_or_default(Some("abc")), "abc");
    }
}
