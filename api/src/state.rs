use std::sync::Arc;

use relay_core::AgentTransport;

#[derive(Clone)]
pub struct AppState {
    pub transport: Arc<dyn AgentTransport>,
    /// True when the mock transport is active; dispatch short-circuits then.
    pub mock: bool,
}

impl AppState {
    pub fn new(transport: Arc<dyn AgentTransport>, mock: bool) -> Self {
        Self { transport, mock }
    }
}
