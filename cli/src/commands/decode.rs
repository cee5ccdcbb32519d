use futures::StreamExt;
use futures::stream;
use relay_core::{RawEvent, TransportError};

use crate::util::{CliResult, read_input};

/// Parse newline-delimited JSON events, skipping blank lines.
pub fn parse_events(text: &str) -> Result<Vec<RawEvent>, String> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            RawEvent::from_json_line(line.trim()).map_err(|e| format!("line {}: {e}", idx + 1))
        })
        .collect()
}

/// Fragments in stream mode, in arrival order.
pub async fn fragments(events: Vec<RawEvent>) -> Result<Vec<String>, TransportError> {
    let source = stream::iter(events.into_iter().map(Ok::<_, TransportError>));
    relay_core::stream(Some(source)).collect::<Vec<_>>().await.into_iter().collect()
}

pub async fn run(input: Option<&str>, streaming: bool) -> CliResult {
    let events = parse_events(&read_input(input)?)?;
    tracing::debug!(count = events.len(), streaming, "decoding agent events");

    if streaming {
        for fragment in fragments(events).await? {
            println!("{fragment}");
        }
    } else {
        println!("{}", relay_core::aggregate(events));
    }
    Ok(0)
}
