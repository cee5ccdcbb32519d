use thiserror::Error;

/// Failures of the agent transport. The core forwards these unchanged;
/// classifying them into protocol responses is the caller's job.
#[derive(Debug, Error)]
pub enum TransportError {
    /// No usable credentials for the agent service.
    #[error("agent credentials not configured: {0}")]
    Credentials(String),

    /// The agent service or the network between us failed.
    #[error("agent service failure: {0}")]
    Upstream(String),

    /// The transport delivered data that is not an event envelope.
    #[error("malformed agent event: {0}")]
    Malformed(String),

    /// The transport could not be reached because configuration is incomplete.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Missing identifiers needed to invoke the agent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("AGENT_ID/AGENT_ALIAS_ID not configured")]
    MissingAgentIds,

    #[error("AGENT_ENDPOINT not configured")]
    MissingEndpoint,
}
