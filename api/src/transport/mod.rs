//! Agent transports and the helpers routes use to drive them.

mod http;
mod mock;

use std::sync::Arc;

use futures::future::BoxFuture;
use relay_core::{AgentTransport, ConfigError, EventSource, TransportError};

use crate::config::AgentConfig;

pub use http::HttpTransport;
pub use mock::MockTransport;

/// Stands in when the deployment lacks agent identifiers. Every invocation
/// reports the configuration fault, so the server can still start and
/// answer health checks.
pub struct UnconfiguredTransport(pub ConfigError);

impl AgentTransport for UnconfiguredTransport {
    fn invoke<'a>(
        &'a self,
        _input: &'a str,
        _session_id: &'a str,
    ) -> BoxFuture<'a, Result<Option<EventSource>, TransportError>> {
        let err = self.0.clone();
        Box::pin(async move { Err(TransportError::Config(err)) })
    }
}

/// Pick the transport for this deployment.
pub fn from_config(config: &AgentConfig) -> Arc<dyn AgentTransport> {
    if config.use_mock {
        tracing::info!("Using mock agent transport");
        return Arc::new(MockTransport);
    }
    match config.require_agent() {
        Ok(target) => Arc::new(HttpTransport::new(
            target,
            config.api_key.clone(),
            config.region.clone(),
        )),
        Err(err) => {
            tracing::warn!("Agent not configured, requests will fail: {}", err);
            Arc::new(UnconfiguredTransport(err))
        }
    }
}

/// Invoke the agent and collect its whole answer.
pub async fn collect_reply(
    transport: &dyn AgentTransport,
    input: &str,
    session_id: &str,
) -> Result<String, TransportError> {
    let source = transport.invoke(input, session_id).await?;
    relay_core::collect(source).await
}
