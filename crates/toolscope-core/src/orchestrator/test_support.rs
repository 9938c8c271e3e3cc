//! Fakes shared by the orchestrator tests

use std::sync::Arc;

use parking_lot::Mutex;

use super::services::OrchestratorServices;
use crate::completion::{ChatClient, ChatClientFactory, CompletionResult, MockCompletionService};
use crate::config::ConnectionSettings;
use crate::logging::{Logger, NoOpLogger};
use crate::templates::MemoryTemplateService;
use crate::tools::{StaticToolProvider, ToolRegistry, ToolRegistryProvider};
use crate::types::{ToolRegistryEntry, ToolSource};

pub fn logger() -> Arc<dyn Logger> {
    Arc::new(NoOpLogger::new())
}

pub fn tool(name: &str, description: &str, source: ToolSource) -> ToolRegistryEntry {
    ToolRegistryEntry::new(name, source).with_description(description)
}

/// `count` filler tools of `source` that share no words with typical queries
pub fn filler(prefix: &str, count: usize, source: ToolSource) -> Vec<ToolRegistryEntry> {
    (0..count)
        .map(|i| tool(&format!("{}_{}", prefix, i), "Generic utility helper", source))
        .collect()
}

/// Services over a single static provider holding `tools`
pub fn services(tools: Vec<ToolRegistryEntry>, completion: Arc<MockCompletionService>) -> OrchestratorServices {
    let provider: Arc<dyn ToolRegistryProvider> = Arc::new(StaticToolProvider::new("static", tools));
    services_over(vec![provider], completion)
}

/// Services over `providers`, queried in the given order
pub fn services_over(
    providers: Vec<Arc<dyn ToolRegistryProvider>>,
    completion: Arc<MockCompletionService>,
) -> OrchestratorServices {
    let registry = providers
        .into_iter()
        .fold(ToolRegistry::new(logger()), |registry, p| registry.with_provider(p));

    OrchestratorServices::new(
        Arc::new(registry),
        completion,
        Arc::new(MemoryTemplateService::with_builtins()),
        logger(),
    )
}

/// Hands out one client and records the deployments asked for
pub struct RecordingFactory {
    client: Arc<dyn ChatClient>,
    deployments: Mutex<Vec<String>>,
}

impl RecordingFactory {
    pub fn new(client: Arc<dyn ChatClient>) -> Self {
        Self {
            client,
            deployments: Mutex::new(Vec::new()),
        }
    }

    pub fn deployments(&self) -> Vec<String> {
        self.deployments.lock().clone()
    }
}

impl ChatClientFactory for RecordingFactory {
    fn create_chat_client(
        &self,
        _provider: &str,
        _connection: &ConnectionSettings,
        deployment: &str,
    ) -> CompletionResult<Arc<dyn ChatClient>> {
        self.deployments.lock().push(deployment.to_string());
        Ok(Arc::clone(&self.client))
    }
}
