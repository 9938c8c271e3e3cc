//! Built-in tool sources

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;

use super::error::ToolProviderResult;
use crate::config::Settings;
use crate::logging::Logger;
use crate::types::{CancellationToken, CompletionContext, ToolRegistryEntry, ToolSource};

/// A source of tools queried by the `ToolRegistry` on every orchestration
#[async_trait]
pub trait ToolRegistryProvider: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &str;

    /// List the tools this source offers for the given completion
    async fn get_tools(
        &self,
        context: &CompletionContext,
        cancel: &CancellationToken,
    ) -> ToolProviderResult<Vec<ToolRegistryEntry>>;
}

/// Tools the user picked explicitly for a profile.
///
/// Holds the catalog of locally defined tools and returns the ones named in
/// `CompletionContext::selected_tool_names`, in selection order.
pub struct LocalToolProvider {
    catalog: Vec<ToolRegistryEntry>,
    logger: Arc<dyn Logger>,
}

impl LocalToolProvider {
    /// Create a provider over a catalog of local tools
    pub fn new(catalog: Vec<ToolRegistryEntry>, logger: Arc<dyn Logger>) -> Self {
        let catalog = catalog
            .into_iter()
            .map(|mut entry| {
                entry.source = ToolSource::Local;
                entry
            })
            .collect();
        Self { catalog, logger }
    }
}

#[async_trait]
impl ToolRegistryProvider for LocalToolProvider {
    fn name(&self) -> &str {
        "local"
    }

    async fn get_tools(
        &self,
        context: &CompletionContext,
        _cancel: &CancellationToken,
    ) -> ToolProviderResult<Vec<ToolRegistryEntry>> {
        let mut seen = HashSet::new();
        let mut tools = Vec::new();

        for name in &context.selected_tool_names {
            if !seen.insert(name.as_str()) {
                continue;
            }
            match self.catalog.iter().find(|t| &t.name == name) {
                Some(tool) => tools.push(tool.clone()),
                None => self.logger.debug(&format!(
                    "[LocalToolProvider] Selected tool '{}' is not defined, skipping",
                    name
                )),
            }
        }

        Ok(tools)
    }
}

/// Tools that come with enabled features
pub struct SystemToolProvider {
    enabled_features: HashSet<String>,
    tools: Vec<(String, ToolRegistryEntry)>,
}

impl SystemToolProvider {
    /// Create a provider for the given enabled features
    pub fn new(enabled_features: impl IntoIterator<Item = String>) -> Self {
        Self {
            enabled_features: enabled_features.into_iter().collect(),
            tools: Vec::new(),
        }
    }

    /// Create a provider for the features enabled in `settings`
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.enabled_features.iter().cloned())
    }

    /// Register a tool that is available while `feature` is enabled
    pub fn with_tool(mut self, feature: impl Into<String>, mut tool: ToolRegistryEntry) -> Self {
        tool.source = ToolSource::System;
        self.tools.push((feature.into(), tool));
        self
    }

    /// Whether a feature is enabled
    pub fn is_enabled(&self, feature: &str) -> bool {
        self.enabled_features.contains(feature)
    }
}

#[async_trait]
impl ToolRegistryProvider for SystemToolProvider {
    fn name(&self) -> &str {
        "system"
    }

    async fn get_tools(
        &self,
        _context: &CompletionContext,
        _cancel: &CancellationToken,
    ) -> ToolProviderResult<Vec<ToolRegistryEntry>> {
        Ok(self
            .tools
            .iter()
            .filter(|(feature, _)| self.is_enabled(feature))
            .map(|(_, tool)| tool.clone())
            .collect())
    }
}

/// Fixed list of tools, returned as-is
pub struct StaticToolProvider {
    name: String,
    tools: Vec<ToolRegistryEntry>,
}

impl StaticToolProvider {
    /// Create a provider that always returns `tools`
    pub fn new(name: impl Into<String>, tools: Vec<ToolRegistryEntry>) -> Self {
        Self {
            name: name.into(),
            tools,
        }
    }
}

#[async_trait]
impl ToolRegistryProvider for StaticToolProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get_tools(
        &self,
        _context: &CompletionContext,
        _cancel: &CancellationToken,
    ) -> ToolProviderResult<Vec<ToolRegistryEntry>> {
        Ok(self.tools.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::NoOpLogger;

    fn catalog() -> Vec<ToolRegistryEntry> {
        vec![
            ToolRegistryEntry::new("get_weather", ToolSource::McpServer).with_description("Weather"),
            ToolRegistryEntry::new("search_docs", ToolSource::Local).with_description("Search docs"),
            ToolRegistryEntry::new("summarize", ToolSource::Local),
        ]
    }

    #[tokio::test]
    async fn test_local_provider_returns_selection_in_order() {
        let provider = LocalToolProvider::new(catalog(), Arc::new(NoOpLogger::new()));
        let context = CompletionContext::new()
            .with_selected_tools(["summarize", "missing", "get_weather", "summarize"]);

        let tools = provider.get_tools(&context, &CancellationToken::new()).await.unwrap();
        let names: Vec<_> = tools.iter().map(|t| t.name.as_str()).collect();

        assert_eq!(names, vec!["summarize", "get_weather"]);
        assert!(tools.iter().all(|t| t.source == ToolSource::Local));
    }

    #[tokio::test]
    async fn test_local_provider_without_selection() {
        let provider = LocalToolProvider::new(catalog(), Arc::new(NoOpLogger::new()));
        let tools = provider
            .get_tools(&CompletionContext::new(), &CancellationToken::new())
            .await
            .unwrap();
        assert!(tools.is_empty());
    }

    #[tokio::test]
    async fn test_system_provider_is_feature_gated() {
        let provider = SystemToolProvider::new(vec!["search".to_string()])
            .with_tool("search", ToolRegistryEntry::new("web_search", ToolSource::Local))
            .with_tool("images", ToolRegistryEntry::new("generate_image", ToolSource::Local));

        let tools = provider
            .get_tools(&CompletionContext::new(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name, "web_search");
        assert_eq!(tools[0].source, ToolSource::System);
    }

    #[tokio::test]
    async fn test_system_provider_follows_settings() {
        let settings = Settings::from_yaml("enabled_features:\n  - images\n").unwrap();
        let provider = SystemToolProvider::from_settings(&settings)
            .with_tool("search", ToolRegistryEntry::new("web_search", ToolSource::System))
            .with_tool("images", ToolRegistryEntry::new("generate_image", ToolSource::System));

        let tools = provider
            .get_tools(&CompletionContext::new(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name, "generate_image");
    }
}
