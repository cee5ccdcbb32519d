//! Aggregation of decoded agent events, eager (collect) or lazy (stream).

use std::pin::Pin;
use std::task::{Context, Poll, ready};

use futures::stream::{FusedStream, Stream, StreamExt};

use crate::decode::decode_event;
use crate::event::RawEvent;

/// Returned by collect mode when the agent produced no text at all.
pub const NO_TEXT_SENTINEL: &str = "[No text content returned by agent]";
/// Returned by collect mode when the transport handed back no event source.
pub const EMPTY_STREAM_SENTINEL: &str = "[Empty event stream]";

fn append_event(collected: &mut String, event: &RawEvent) {
    if event.payload.is_none() {
        return;
    }
    if let Some(fragment) = decode_event(event) {
        collected.push_str(&fragment.text);
    }
}

fn finish(collected: String) -> String {
    let trimmed = collected.trim();
    if trimmed.is_empty() {
        NO_TEXT_SENTINEL.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Collect mode over an in-memory event sequence.
pub fn aggregate<I>(events: I) -> String
where
    I: IntoIterator<Item = RawEvent>,
{
    let mut collected = String::new();
    for event in events {
        append_event(&mut collected, &event);
    }
    finish(collected)
}

/// Collect mode over a transport event source.
///
/// The first transport error aborts collection and is returned unchanged;
/// no retries happen here.
pub async fn collect<S, E>(source: Option<S>) -> Result<String, E>
where
    S: Stream<Item = Result<RawEvent, E>> + Unpin,
{
    let Some(mut source) = source else {
        tracing::debug!("agent returned no event source");
        return Ok(EMPTY_STREAM_SENTINEL.to_string());
    };

    let mut collected = String::new();
    while let Some(event) = source.next().await {
        append_event(&mut collected, &event?);
    }
    Ok(finish(collected))
}

/// Stream mode: lazily yield non-empty text fragments as events arrive.
pub fn stream<S>(source: Option<S>) -> FragmentStream<S> {
    FragmentStream {
        source,
        delivered: 0,
    }
}

/// Forward-only sequence of decoded text fragments.
///
/// Owns the event source and drops it as soon as the sequence ends, fails,
/// or is itself dropped by the consumer, so the transport is released on
/// every exit path.
pub struct FragmentStream<S> {
    source: Option<S>,
    delivered: usize,
}

impl<S> FragmentStream<S> {
    /// Number of fragments handed to the consumer so far.
    pub fn delivered(&self) -> usize {
        self.delivered
    }

    fn release(&mut self, reason: &'static str) {
        if self.source.take().is_some() {
            tracing::debug!(reason, delivered = self.delivered, "released agent event source");
        }
    }
}

impl<S, E> Stream for FragmentStream<S>
where
    S: Stream<Item = Result<RawEvent, E>> + Unpin,
{
    type Item = Result<String, E>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        loop {
            let Some(source) = self.source.as_mut() else {
                return Poll::Ready(None);
            };
            match ready!(Pin::new(source).poll_next(cx)) {
                Some(Ok(event)) => {
                    if event.payload.is_none() {
                        continue;
                    }
                    match decode_event(&event) {
                        Some(fragment) if !fragment.is_empty() => {
                            self.delivered += 1;
                            return Poll::Ready(Some(Ok(fragment.text)));
                        }
                        _ => continue,
                    }
                }
                Some(Err(err)) => {
                    self.release("transport error");
                    return Poll::Ready(Some(Err(err)));
                }
                None => {
                    self.release("end of stream");
                    return Poll::Ready(None);
                }
            }
        }
    }
}

impl<S, E> FusedStream for FragmentStream<S>
where
    S: Stream<Item = Result<RawEvent, E>> + Unpin,
{
    fn is_terminated(&self) -> bool {
        self.source.is_none()
    }
}

impl<S> Drop for FragmentStream<S> {
    fn drop(&mut self) {
        self.release("consumer stopped early");
    }
}
