//! Name-based orchestrator lookup with graceful fallback

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use super::default::DefaultOrchestrator;
use super::error::{OrchestrationError, OrchestrationResult};
use super::services::OrchestratorServices;
use super::strategy::ScopingStrategy;
use super::Orchestrator;
use crate::config::DEFAULT_ORCHESTRATOR_NAME;
use crate::logging::Logger;

/// Name of the orchestrator that exempts built-in tools from scoring
pub const EXEMPT_BUILTIN_ORCHESTRATOR_NAME: &str = "exempt-builtin";

/// Factory function type for creating orchestrators
pub type OrchestratorFactory = Box<dyn Fn() -> OrchestrationResult<Arc<dyn Orchestrator>> + Send + Sync>;

/// Definition of a registered orchestrator
pub struct OrchestratorDefinition {
    /// Unique name for this orchestrator
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Factory function to create instances
    pub factory: OrchestratorFactory,
}

impl std::fmt::Debug for OrchestratorDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrchestratorDefinition")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish()
    }
}

/// Resolves orchestrators by name.
///
/// `resolve` never fails: an unknown or broken name falls back to the
/// configured default, and a broken default falls back to the built-in
/// orchestrator.
pub struct OrchestratorResolver {
    definitions: RwLock<HashMap<String, OrchestratorDefinition>>,
    default_name: String,
    builtin: Arc<dyn Orchestrator>,
    logger: Arc<dyn Logger>,
}

impl OrchestratorResolver {
    /// Resolver with only the built-in fallback registered
    pub fn new(default_name: impl Into<String>, builtin: Arc<dyn Orchestrator>, logger: Arc<dyn Logger>) -> Self {
        Self {
            definitions: RwLock::new(HashMap::new()),
            default_name: default_name.into(),
            builtin,
            logger,
        }
    }

    /// Resolver with the `default` (uniform) and `exempt-builtin` orchestrators
    pub fn with_builtins(services: OrchestratorServices, default_name: Option<&str>) -> Self {
        let logger = Arc::clone(&services.logger);
        let builtin: Arc<dyn Orchestrator> = Arc::new(DefaultOrchestrator::new(
            DEFAULT_ORCHESTRATOR_NAME,
            ScopingStrategy::Uniform,
            services.clone(),
        ));

        let resolver = Self::new(
            default_name.unwrap_or(DEFAULT_ORCHESTRATOR_NAME),
            Arc::clone(&builtin),
            logger,
        );

        resolver.register(
            DEFAULT_ORCHESTRATOR_NAME,
            "Scores every tool uniformly against the plan or recent conversation",
            Box::new(move || Ok(Arc::clone(&builtin))),
        );

        resolver.register(
            EXEMPT_BUILTIN_ORCHESTRATOR_NAME,
            "Always includes local and system tools; ranks MCP server tools",
            Box::new(move || {
                Ok(Arc::new(DefaultOrchestrator::new(
                    EXEMPT_BUILTIN_ORCHESTRATOR_NAME,
                    ScopingStrategy::ExemptBuiltIn,
                    services.clone(),
                )) as Arc<dyn Orchestrator>)
            }),
        );

        resolver
    }

    /// Register (or replace) an orchestrator
    pub fn register(&self, name: &str, description: &str, factory: OrchestratorFactory) {
        self.definitions.write().insert(
            name.to_string(),
            OrchestratorDefinition {
                name: name.to_string(),
                description: description.to_string(),
                factory,
            },
        );
    }

    /// Registered orchestrators as `(name, description)`, sorted by name
    pub fn list(&self) -> Vec<(String, String)> {
        let mut entries: Vec<_> = self
            .definitions
            .read()
            .values()
            .map(|d| (d.name.clone(), d.description.clone()))
            .collect();
        entries.sort();
        entries
    }

    /// Name used when none is requested
    pub fn default_name(&self) -> &str {
        &self.default_name
    }

    fn create(&self, name: &str) -> OrchestrationResult<Arc<dyn Orchestrator>> {
        let definitions = self.definitions.read();
        let definition = definitions
            .get(name)
            .ok_or_else(|| OrchestrationError::Unavailable(format!("unknown orchestrator '{}'", name)))?;
        (definition.factory)()
    }

    /// Orchestrator registered as `name`, or the default when `name` is empty
    pub fn resolve(&self, name: Option<&str>) -> Arc<dyn Orchestrator> {
        let requested = name.map(str::trim).filter(|n| !n.is_empty());

        if let Some(name) = requested {
            match self.create(name) {
                Ok(orchestrator) => return orchestrator,
                Err(e) => self.logger.warn(&format!(
                    "[OrchestratorResolver] Cannot resolve '{}', using default '{}': {}",
                    name, self.default_name, e
                )),
            }
        }

        match self.create(&self.default_name) {
            Ok(orchestrator) => orchestrator,
            Err(e) => {
                self.logger.warn(&format!(
                    "[OrchestratorResolver] Default '{}' unavailable, using built-in orchestrator: {}",
                    self.default_name, e
                ));
                Arc::clone(&self.builtin)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::MockCompletionService;
    use crate::orchestrator::test_support::{logger, services};

    fn resolver(default_name: Option<&str>) -> OrchestratorResolver {
        let completion = Arc::new(MockCompletionService::echo(logger()));
        OrchestratorResolver::with_builtins(services(Vec::new(), completion), default_name)
    }

    #[test]
    fn test_resolves_registered_names() {
        let resolver = resolver(None);
        assert_eq!(resolver.resolve(Some("exempt-builtin")).name(), "exempt-builtin");
        assert_eq!(resolver.resolve(Some("default")).name(), "default");
    }

    #[test]
    fn test_empty_name_uses_default() {
        let resolver = resolver(Some("exempt-builtin"));
        assert_eq!(resolver.resolve(None).name(), "exempt-builtin");
        assert_eq!(resolver.resolve(Some("  ")).name(), "exempt-builtin");
    }

    #[test]
    fn test_unknown_name_falls_back_to_default() {
        let resolver = resolver(Some("exempt-builtin"));
        assert_eq!(resolver.resolve(Some("does-not-exist")).name(), "exempt-builtin");
    }

    #[test]
    fn test_failing_factory_falls_back() {
        let resolver = resolver(None);
        resolver.register(
            "broken",
            "Always fails",
            Box::new(|| Err(OrchestrationError::Unavailable("missing dependency".to_string()))),
        );
        assert_eq!(resolver.resolve(Some("broken")).name(), "default");
    }

    #[test]
    fn test_broken_default_uses_builtin() {
        let resolver = resolver(Some("nowhere"));
        assert_eq!(resolver.resolve(Some("also-missing")).name(), "default");
        assert_eq!(resolver.resolve(None).name(), "default");
    }

    #[test]
    fn test_list() {
        let names: Vec<_> = resolver(None).list().into_iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["default".to_string(), "exempt-builtin".to_string()]);
    }
}
