//! Orchestrator tuning options and connection settings

use serde::{Deserialize, Serialize};

use super::error::{ConfigError, ConfigResult};

/// Process-wide tuning surface of the orchestrator.
///
/// Read-only once the process has started.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorOptions {
    /// At or below this many tools, scoring is skipped entirely
    pub scoping_threshold: usize,
    /// Above this many tools (or with any MCP tool) the planning call runs
    pub planning_threshold: usize,
    /// Size of the scoped tool set
    pub initial_tool_count: usize,
    /// Hard ceiling on the scoped set when built-in tools are always included
    pub max_tool_count: usize,
    /// Recent user/assistant text turns fed to the planning call
    pub planning_history_message_count: usize,
    /// Temperature of the planning call
    pub planning_temperature: f32,
    /// Output token cap of the planning call
    pub planning_max_tokens: u32,
}

impl Default for OrchestratorOptions {
    fn default() -> Self {
        Self {
            scoping_threshold: 30,
            planning_threshold: 100,
            initial_tool_count: 10,
            max_tool_count: 20,
            planning_history_message_count: 6,
            planning_temperature: 0.1,
            planning_max_tokens: 300,
        }
    }
}

impl OrchestratorOptions {
    /// Check `0 < scoping <= planning` and `0 < initial <= max`.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.scoping_threshold == 0 {
            return Err(ConfigError::InvalidOptions(
                "scoping_threshold must be greater than zero".to_string(),
            ));
        }
        if self.scoping_threshold > self.planning_threshold {
            return Err(ConfigError::InvalidOptions(format!(
                "scoping_threshold ({}) must not exceed planning_threshold ({})",
                self.scoping_threshold, self.planning_threshold
            )));
        }
        if self.initial_tool_count == 0 {
            return Err(ConfigError::InvalidOptions(
                "initial_tool_count must be greater than zero".to_string(),
            ));
        }
        if self.initial_tool_count > self.max_tool_count {
            return Err(ConfigError::InvalidOptions(format!(
                "initial_tool_count ({}) must not exceed max_tool_count ({})",
                self.initial_tool_count, self.max_tool_count
            )));
        }
        Ok(())
    }
}

/// Deployments available on one provider connection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionSettings {
    /// Provider name (e.g. "openai", "anthropic", "ollama")
    pub provider: String,
    /// Connection name, unique per provider
    pub name: String,
    /// Model used for regular chat completions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_deployment: Option<String>,
    /// Cheaper/faster model used for auxiliary calls such as planning
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utility_deployment: Option<String>,
    /// Explicit API key; falls back to `<PROVIDER>_API_KEY`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Custom API base URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
}

impl ConnectionSettings {
    /// Create a connection without deployments
    pub fn new(provider: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            name: name.into(),
            default_deployment: None,
            utility_deployment: None,
            api_key: None,
            api_base: None,
        }
    }

    /// Set the default chat deployment
    pub fn with_default_deployment(mut self, deployment: impl Into<String>) -> Self {
        self.default_deployment = Some(deployment.into());
        self
    }

    /// Set the utility deployment
    pub fn with_utility_deployment(mut self, deployment: impl Into<String>) -> Self {
        self.utility_deployment = Some(deployment.into());
        self
    }

    /// Set the API key
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }
}

/// Find the connection for `provider`; without a name, the provider's first connection.
pub fn find_connection<'a>(
    connections: &'a [ConnectionSettings],
    provider: &str,
    name: Option<&str>,
) -> Option<&'a ConnectionSettings> {
    let mut candidates = connections
        .iter()
        .filter(|c| c.provider.eq_ignore_ascii_case(provider));

    match name {
        Some(name) => candidates.find(|c| c.name.eq_ignore_ascii_case(name)),
        None => candidates.next(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let options = OrchestratorOptions::default();
        assert!(options.validate().is_ok());
        assert_eq!(options.scoping_threshold, 30);
        assert_eq!(options.initial_tool_count, 10);
    }

    #[test]
    fn test_rejects_zero_scoping_threshold() {
        let options = OrchestratorOptions {
            scoping_threshold: 0,
            ..Default::default()
        };
        assert!(matches!(options.validate(), Err(ConfigError::InvalidOptions(_))));
    }

    #[test]
    fn test_rejects_scoping_above_planning() {
        let options = OrchestratorOptions {
            scoping_threshold: 50,
            planning_threshold: 40,
            ..Default::default()
        };
        assert!(matches!(options.validate(), Err(ConfigError::InvalidOptions(_))));
    }

    #[test]
    fn test_rejects_initial_above_max() {
        let options = OrchestratorOptions {
            initial_tool_count: 25,
            max_tool_count: 20,
            ..Default::default()
        };
        assert!(matches!(options.validate(), Err(ConfigError::InvalidOptions(_))));
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let options: OrchestratorOptions =
            serde_yaml::from_str("initial_tool_count: 5\n").unwrap();
        assert_eq!(options.initial_tool_count, 5);
        assert_eq!(options.planning_threshold, 100);
    }

    #[test]
    fn test_find_connection() {
        let connections = vec![
            ConnectionSettings::new("openai", "primary").with_default_deployment("gpt-4o"),
            ConnectionSettings::new("openai", "cheap").with_default_deployment("gpt-4o-mini"),
            ConnectionSettings::new("ollama", "local"),
        ];

        let found = find_connection(&connections, "OpenAI", Some("cheap")).unwrap();
        assert_eq!(found.default_deployment.as_deref(), Some("gpt-4o-mini"));

        let first = find_connection(&connections, "openai", None).unwrap();
        assert_eq!(first.name, "primary");

        assert!(find_connection(&connections, "anthropic", None).is_none());
        assert!(find_connection(&connections, "ollama", Some("remote")).is_none());
    }
}
