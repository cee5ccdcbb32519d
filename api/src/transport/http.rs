use std::fmt::Display;

use futures::future::BoxFuture;
use futures::stream::{self, Stream, StreamExt};
use relay_core::{AgentTransport, EventSource, RawEvent, TransportError};
use reqwest::StatusCode;
use serde::Serialize;

use crate::config::AgentTarget;

/// Request body posted to the agent endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InvokeRequest<'a> {
    agent_id: &'a str,
    agent_alias_id: &'a str,
    session_id: &'a str,
    input_text: &'a str,
    region: &'a str,
}

/// Agent reached over HTTP. The endpoint answers with newline-delimited JSON
/// events (`{"chunk":{"bytes":"..."}}` per line), streamed as they arrive.
pub struct HttpTransport {
    client: reqwest::Client,
    target: AgentTarget,
    api_key: Option<String>,
    region: String,
}

impl HttpTransport {
    pub fn new(target: AgentTarget, api_key: Option<String>, region: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            target,
            api_key,
            region,
        }
    }
}

impl AgentTransport for HttpTransport {
    fn invoke<'a>(
        &'a self,
        input: &'a str,
        session_id: &'a str,
    ) -> BoxFuture<'a, Result<Option<EventSource>, TransportError>> {
        Box::pin(async move {
            let body = InvokeRequest {
                agent_id: &self.target.agent_id,
                agent_alias_id: &self.target.agent_alias_id,
                session_id,
                input_text: input,
                region: &self.region,
            };
            let mut request = self.client.post(&self.target.endpoint).json(&body);
            if let Some(key) = &self.api_key {
                request = request.bearer_auth(key);
            }

            let response = request
                .send()
                .await
                .map_err(|e| TransportError::Upstream(e.to_string()))?;

            let status = response.status();
            if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
                return Err(TransportError::Credentials(format!(
                    "agent endpoint returned {status}"
                )));
            }
            if !status.is_success() {
                let detail = response.text().await.unwrap_or_default();
                return Err(TransportError::Upstream(format!(
                    "agent endpoint returned {status}: {}",
                    detail.trim()
                )));
            }
            if status == StatusCode::NO_CONTENT {
                return Ok(None);
            }

            tracing::debug!(session_id, %status, "agent stream opened");
            Ok(Some(ndjson_events(Box::pin(response.bytes_stream())).boxed()))
        })
    }
}

struct LineReader<S> {
    body: S,
    buffer: Vec<u8>,
    finished: bool,
}

/// Blank and malformed lines yield nothing; a bad line is logged and the
/// rest of the stream still counts.
fn parse_line(line: &[u8]) -> Option<RawEvent> {
    let text = String::from_utf8_lossy(line);
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    match RawEvent::from_json_line(text) {
        Ok(event) => Some(event),
        Err(err) => {
            tracing::warn!(error = %err, "skipping malformed agent event line");
            None
        }
    }
}

/// Split a byte stream into newline-delimited JSON events. A body error is
/// reported once and ends the stream.
pub(crate) fn ndjson_events<S, B, E>(body: S) -> impl Stream<Item = Result<RawEvent, TransportError>>
where
    S: Stream<Item = Result<B, E>> + Unpin,
    B: AsRef<[u8]>,
    E: Display,
{
    let reader = LineReader {
        body,
        buffer: Vec::new(),
        finished: false,
    };
    stream::unfold(reader, |mut reader| async move {
        loop {
            if let Some(pos) = reader.buffer.iter().position(|b| *b == b'\n') {
                let line: Vec<u8> = reader.buffer.drain(..=pos).collect();
                match parse_line(&line) {
                    Some(event) => return Some((Ok(event), reader)),
                    None => continue,
                }
            }
            if reader.finished {
                let rest = std::mem::take(&mut reader.buffer);
                return parse_line(&rest).map(|event| (Ok(event), reader));
            }
            match reader.body.next().await {
                Some(Ok(chunk)) => reader.buffer.extend_from_slice(chunk.as_ref()),
                Some(Err(err)) => {
                    reader.finished = true;
                    reader.buffer.clear();
                    return Some((Err(TransportError::Upstream(err.to_string())), reader));
                }
                None => reader.finished = true,
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(parts: &[&str]) -> impl Stream<Item = Result<Vec<u8>, String>> + Unpin {
        let parts: Vec<Result<Vec<u8>, String>> =
            parts.iter().map(|p| Ok(p.as_bytes().to_vec())).collect();
        stream::iter(parts)
    }

    #[tokio::test]
    async fn lines_split_across_chunks_are_reassembled() {
        let events: Vec<RawEvent> = ndjson_events(body(&[
            "{\"chunk\":{\"bytes\":\"Hel",
            "lo\"}}\n\n{\"trace\":{}}\n{\"chunk\":",
            "{\"bytes\":\" there\"}}",
        ]))
        .map(|e| e.expect("valid event"))
        .collect()
        .await;

        assert_eq!(
            events,
            vec![
                RawEvent::chunk("Hello"),
                RawEvent::new("trace", None),
                RawEvent::chunk(" there"),
            ]
        );
    }

    #[tokio::test]
    async fn malformed_lines_are_skipped() {
        let events: Vec<RawEvent> = ndjson_events(body(&[
            "not json\n{\"chunk\":{\"bytes\":\"kept\"}}\n",
            "{\"chunk\":{\"bytes\":7}}\n{\"chunk\":{\"bytes\":\" too\"}}",
        ]))
        .map(|e| e.expect("malformed lines never surface"))
        .collect()
        .await;

        assert_eq!(events, vec![RawEvent::chunk("kept"), RawEvent::chunk(" too")]);
    }

    #[tokio::test]
    async fn multi_key_line_still_contributes_text() {
        let reply = relay_core::collect(Some(
            ndjson_events(body(&[
                "{\"chunk\":{\"bytes\":\"Hi\"},\"trace\":{}}\n{oops\n",
            ]))
            .boxed(),
        ))
        .await
        .expect("collect should succeed");
        assert_eq!(reply, "Hi");
    }

    #[tokio::test]
    async fn body_errors_end_the_stream() {
        let parts: Vec<Result<Vec<u8>, String>> = vec![
            Ok(b"{\"chunk\":{\"bytes\":\"a\"}}\npartial".to_vec()),
            Err("connection reset".to_string()),
        ];
        let mut events = Box::pin(ndjson_events(stream::iter(parts)));
        assert!(matches!(events.next().await, Some(Ok(_))));
        assert!(matches!(
            events.next().await,
            Some(Err(TransportError::Upstream(_)))
        ));
        assert!(events.next().await.is_none());
    }
}
