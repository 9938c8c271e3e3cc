//! Collaborators shared by orchestrator instances

use std::sync::Arc;

use crate::completion::{ChatClientFactory, CompletionService};
use crate::config::{ConnectionSettings, OrchestratorOptions, Settings};
use crate::logging::Logger;
use crate::templates::TemplateService;
use crate::tools::ToolRegistry;

/// Everything an orchestrator needs, cheap to clone into factories
#[derive(Clone)]
pub struct OrchestratorServices {
    pub registry: Arc<ToolRegistry>,
    pub completion: Arc<dyn CompletionService>,
    pub templates: Arc<dyn TemplateService>,
    /// Source of utility-model clients for planning; the completion service is used when unset
    pub chat_clients: Option<Arc<dyn ChatClientFactory>>,
    pub connections: Vec<ConnectionSettings>,
    pub options: OrchestratorOptions,
    pub logger: Arc<dyn Logger>,
}

impl OrchestratorServices {
    /// Services with default options and no connections
    pub fn new(
        registry: Arc<ToolRegistry>,
        completion: Arc<dyn CompletionService>,
        templates: Arc<dyn TemplateService>,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            registry,
            completion,
            templates,
            chat_clients: None,
            connections: Vec::new(),
            options: OrchestratorOptions::default(),
            logger,
        }
    }

    /// Set the chat client factory
    pub fn with_chat_clients(mut self, factory: Arc<dyn ChatClientFactory>) -> Self {
        self.chat_clients = Some(factory);
        self
    }

    /// Set the provider connections
    pub fn with_connections(mut self, connections: Vec<ConnectionSettings>) -> Self {
        self.connections = connections;
        self
    }

    /// Take connections and tuning options from loaded settings
    pub fn with_settings(self, settings: &Settings) -> Self {
        self.with_connections(settings.connections.clone())
            .with_options(settings.orchestrator.clone())
    }

    /// Set the tuning options
    pub fn with_options(mut self, options: OrchestratorOptions) -> Self {
        self.options = options;
        self
    }
}
