//! Step owners: the entities that supply a step's resilience policy.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use stepwise_types::config::EngineConfig;
use stepwise_types::policy::ResiliencePolicy;

/// Owner of one or more steps.
///
/// Supplies the resilience policy the engine applies to the owned steps and a
/// short description of the retry strategy for observability.
pub trait StepOwner: Send + Sync {
    /// Human-readable owner name.
    fn name(&self) -> &str;

    /// Retry configuration for steps owned by this entity.
    fn resilience_policy(&self) -> &ResiliencePolicy;

    /// Short description of the owner's strategy and retry behaviour.
    fn describe_policy(&self) -> String;
}

/// Configuration and resources available to an agent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    #[serde(default)]
    pub config: HashMap<String, Value>,
}

impl Environment {
    pub fn new(config: HashMap<String, Value>) -> Self {
        Self { config }
    }

    /// Deserialize a config entry into `T`. `None` if absent or mistyped.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.config
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }
}

/// The standard step owner: a named agent with an environment and a policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub resilience_policy: ResiliencePolicy,
}

impl Agent {
    /// Create an agent with the default resilience policy.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        environment: Environment,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            environment,
            resilience_policy: ResiliencePolicy::default(),
        }
    }

    /// Create an agent that uses the configured `default_policy`.
    pub fn from_config(
        name: impl Into<String>,
        description: impl Into<String>,
        environment: Environment,
        config: &EngineConfig,
    ) -> Self {
        Self::new(name, description, environment).with_policy(config.default_policy.clone())
    }

    /// Replace the agent's resilience policy.
    pub fn with_policy(mut self, policy: ResiliencePolicy) -> Self {
        self.resilience_policy = policy;
        self
    }
}

impl StepOwner for Agent {
    fn name(&self) -> &str {
        &self.name
    }

    fn resilience_policy(&self) -> &ResiliencePolicy {
        &self.resilience_policy
    }

    fn describe_policy(&self) -> String {
        let policy = &self.resilience_policy;
        format!(
            "{} (up to {} attempts, exponential backoff {}ms..{}ms)",
            self.description, policy.max_retries, policy.min_wait_ms, policy.max_wait_ms
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn agent_defaults_to_standard_policy() {
        let agent = Agent::new("ingestor", "Fetches and parses papers", Environment::default());
        assert_eq!(agent.resilience_policy(), &ResiliencePolicy::default());
        assert_eq!(StepOwner::name(&agent), "ingestor");
    }

    #[test]
    fn agent_from_config_uses_default_policy() {
        let config = EngineConfig {
            default_policy: ResiliencePolicy {
                max_retries: 5,
                min_wait_ms: 100,
                max_wait_ms: 400,
            },
            ..EngineConfig::default()
        };
        let agent = Agent::from_config("parser", "Parses papers", Environment::default(), &config);
        assert_eq!(agent.resilience_policy(), &config.default_policy);
        assert!(agent.describe_policy().contains("up to 5 attempts"));
    }

    #[test]
    fn describe_policy_mentions_retry_bounds() {
        let agent = Agent::new("extractor", "Extracts claims", Environment::default())
            .with_policy(ResiliencePolicy::no_wait(5));
        let description = agent.describe_policy();
        assert!(description.starts_with("Extracts claims"));
        assert!(description.contains("up to 5 attempts"));
        assert!(description.contains("0ms..0ms"));
    }

    #[test]
    fn environment_get_typed_values() {
        let mut config = HashMap::new();
        config.insert("llm_model".to_string(), json!("gpt-4o"));
        config.insert("max_pages".to_string(), json!(40));
        let env = Environment::new(config);

        assert_eq!(env.get::<String>("llm_model").as_deref(), Some("gpt-4o"));
        assert_eq!(env.get::<u32>("max_pages"), Some(40));
        assert_eq!(env.get::<u32>("llm_model"), None);
        assert_eq!(env.get::<String>("missing"), None);
    }
}
