use relay_core::ConfigError;

const DEFAULT_REGION: &str = "eu-central-1";
const DEFAULT_PORT: u16 = 3000;

/// Deployment settings read from the environment (after `.env` is loaded).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentConfig {
    pub agent_id: Option<String>,
    pub agent_alias_id: Option<String>,
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub region: String,
    pub use_mock: bool,
    pub port: u16,
}

/// Identifiers needed to invoke a real agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentTarget {
    pub agent_id: String,
    pub agent_alias_id: String,
    pub endpoint: String,
}

impl AgentConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Self {
            agent_id: get("AGENT_ID"),
            agent_alias_id: get("AGENT_ALIAS_ID"),
            endpoint: get("AGENT_ENDPOINT"),
            api_key: get("AGENT_API_KEY"),
            region: get("AGENT_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string()),
            use_mock: get("USE_MOCK_AGENT")
                .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
                .unwrap_or(false),
            port: get("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
        }
    }

    /// The agent to invoke, or the configuration fault that prevents it.
    pub fn require_agent(&self) -> Result<AgentTarget, ConfigError> {
        let (Some(agent_id), Some(agent_alias_id)) = (&self.agent_id, &self.agent_alias_id) else {
            return Err(ConfigError::MissingAgentIds);
        };
        let Some(endpoint) = &self.endpoint else {
            return Err(ConfigError::MissingEndpoint);
        };
        Ok(AgentTarget {
            agent_id: agent_id.clone(),
            agent_alias_id: agent_alias_id.clone(),
            endpoint: endpoint.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(pairs: &[(&str, &str)]) -> AgentConfig {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AgentConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let cfg = config(&[]);
        assert_eq!(cfg.region, "eu-central-1");
        assert_eq!(cfg.port, 3000);
        assert!(!cfg.use_mock);
        assert_eq!(cfg.require_agent(), Err(ConfigError::MissingAgentIds));
    }

    #[test]
    fn blank_values_count_as_missing() {
        let cfg = config(&[("AGENT_ID", "  "), ("AGENT_ALIAS_ID", "alias")]);
        assert_eq!(cfg.require_agent(), Err(ConfigError::MissingAgentIds));
    }

    #[test]
    fn endpoint_is_required_once_ids_are_set() {
        let cfg = config(&[("AGENT_ID", "a"), ("AGENT_ALIAS_ID", "b")]);
        assert_eq!(cfg.require_agent(), Err(ConfigError::MissingEndpoint));

        let cfg = config(&[
            ("AGENT_ID", "a"),
            ("AGENT_ALIAS_ID", "b"),
            ("AGENT_ENDPOINT", "http://agent.local/invoke"),
            ("USE_MOCK_AGENT", "TRUE"),
            ("PORT", "8080"),
        ]);
        let target = cfg.require_agent().expect("fully configured");
        assert_eq!(target.endpoint, "http://agent.local/invoke");
        assert!(cfg.use_mock);
        assert_eq!(cfg.port, 8080);
    }
}
