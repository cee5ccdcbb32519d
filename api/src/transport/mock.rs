use futures::StreamExt;
use futures::future::BoxFuture;
use futures::stream;
use relay_core::{AgentTransport, EventSource, RawEvent, TransportError};

const MOCK_PREFIX: &str = "[MOCK_AGENT]";
const MOCK_ECHO_CHARS: usize = 200;
const MOCK_STREAM_PREFIX: &str = "[MOCK_AGENT_STREAM]";
const MOCK_STREAM_ECHO_CHARS: usize = 100;

/// Offline agent for local development: echoes the start of the input back,
/// one word per chunk event.
pub struct MockTransport;

impl MockTransport {
    pub fn reply_for(input: &str) -> String {
        echo(MOCK_PREFIX, input, MOCK_ECHO_CHARS)
    }

    /// Streaming mode marks its echo differently and keeps it shorter.
    pub fn stream_reply_for(input: &str) -> String {
        echo(MOCK_STREAM_PREFIX, input, MOCK_STREAM_ECHO_CHARS)
    }

    /// Event source for the streaming endpoint in mock mode.
    pub fn stream_events(input: &str) -> EventSource {
        word_events(&Self::stream_reply_for(input))
    }
}

fn echo(prefix: &str, input: &str, limit: usize) -> String {
    let echoed: String = input.chars().take(limit).collect();
    format!("{prefix} {echoed}")
}

fn word_events(reply: &str) -> EventSource {
    let events: Vec<Result<RawEvent, TransportError>> = reply
        .split_whitespace()
        .map(|word| Ok(RawEvent::chunk(format!("{word} "))))
        .collect();
    stream::iter(events).boxed()
}

impl AgentTransport for MockTransport {
    fn invoke<'a>(
        &'a self,
        input: &'a str,
        session_id: &'a str,
    ) -> BoxFuture<'a, Result<Option<EventSource>, TransportError>> {
        tracing::debug!(session_id, "mock agent invoked");
        let events = word_events(&Self::reply_for(input));
        Box::pin(async move { Ok(Some(events)) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::collect_reply;

    #[tokio::test]
    async fn mock_echoes_input_word_by_word() {
        let reply = collect_reply(&MockTransport, "estimate   my\nproject", "s")
            .await
            .expect("mock never fails");
        assert_eq!(reply, "[MOCK_AGENT] estimate my project");
    }

    #[test]
    fn mock_reply_is_capped() {
        let long = "x".repeat(500);
        let reply = MockTransport::reply_for(&long);
        assert_eq!(reply.len(), MOCK_PREFIX.len() + 1 + MOCK_ECHO_CHARS);
    }

    #[test]
    fn stream_reply_uses_its_own_marker_and_shorter_cap() {
        let long = "y".repeat(500);
        let reply = MockTransport::stream_reply_for(&long);
        assert!(reply.starts_with("[MOCK_AGENT_STREAM] "));
        assert_eq!(
            reply.len(),
            MOCK_STREAM_PREFIX.len() + 1 + MOCK_STREAM_ECHO_CHARS
        );
    }

    #[tokio::test]
    async fn stream_events_emit_one_word_per_chunk() {
        let chunks: Vec<RawEvent> = MockTransport::stream_events("launch  plan")
            .map(|e| e.expect("mock never fails"))
            .collect()
            .await;
        assert_eq!(
            chunks,
            vec![
                RawEvent::chunk("[MOCK_AGENT_STREAM] "),
                RawEvent::chunk("launch "),
                RawEvent::chunk("plan "),
            ]
        );
    }
}
