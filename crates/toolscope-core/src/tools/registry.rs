//! Tool registry aggregating every tool source
//!
//! The ToolRegistry is the central component for:
//! - Querying each registered provider for its current tools
//! - Isolating provider failures so one broken source never hides the rest
//! - Ad-hoc relevance search over the aggregated tools

use std::sync::Arc;

use super::error::{ToolProviderError, ToolProviderResult};
use super::providers::ToolRegistryProvider;
use super::scoring::rank;
use crate::logging::Logger;
use crate::tokenizer::tokenize;
use crate::types::{CancellationToken, CompletionContext, ToolRegistryEntry};

/// Registry over all tool providers
pub struct ToolRegistry {
    providers: Vec<Arc<dyn ToolRegistryProvider>>,
    logger: Arc<dyn Logger>,
}

impl ToolRegistry {
    /// Create a registry without providers
    pub fn new(logger: Arc<dyn Logger>) -> Self {
        Self {
            providers: Vec::new(),
            logger,
        }
    }

    /// Add a provider
    pub fn with_provider(mut self, provider: Arc<dyn ToolRegistryProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    /// Collect the tools of every provider.
    ///
    /// Providers are queried one after another, each call raced against
    /// `cancel`. A provider error is logged and its tools are left out; only
    /// cancellation aborts the call.
    pub async fn get_all(
        &self,
        context: &CompletionContext,
        cancel: &CancellationToken,
    ) -> ToolProviderResult<Vec<ToolRegistryEntry>> {
        let mut tools = Vec::new();

        for provider in &self.providers {
            if cancel.is_cancelled() {
                return Err(ToolProviderError::Cancelled);
            }

            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(ToolProviderError::Cancelled),
                result = provider.get_tools(context, cancel) => result,
            };

            match result {
                Ok(entries) => {
                    self.logger.debug(&format!(
                        "[ToolRegistry] Provider '{}' returned {} tools",
                        provider.name(),
                        entries.len()
                    ));
                    tools.extend(entries);
                }
                Err(ToolProviderError::Cancelled) => return Err(ToolProviderError::Cancelled),
                Err(e) => {
                    self.logger.error(&format!(
                        "[ToolRegistry] Provider '{}' failed, skipping its tools: {}",
                        provider.name(),
                        e
                    ));
                }
            }
        }

        if cancel.is_cancelled() {
            return Err(ToolProviderError::Cancelled);
        }

        self.logger.info(&format!(
            "[ToolRegistry] Collected {} tools from {} providers",
            tools.len(),
            self.providers.len()
        ));

        Ok(tools)
    }

    /// Top `top_k` tools relevant to `query`, best first.
    ///
    /// Tools sharing no stem with the query are not returned; ties keep
    /// provider order.
    pub async fn search(
        &self,
        query: &str,
        top_k: usize,
        context: &CompletionContext,
        cancel: &CancellationToken,
    ) -> ToolProviderResult<Vec<ToolRegistryEntry>> {
        let query_tokens = tokenize(query);
        if query_tokens.is_empty() || top_k == 0 {
            return Ok(Vec::new());
        }

        let tools = self.get_all(context, cancel).await?;

        Ok(rank(&tools, &query_tokens)
            .into_iter()
            .filter(|scored| scored.score > 0.0)
            .take(top_k)
            .map(|scored| scored.entry)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::NoOpLogger;
    use crate::tools::StaticToolProvider;
    use crate::types::ToolSource;
    use async_trait::async_trait;
    use std::time::{Duration, Instant};

    struct FailingProvider;

    #[async_trait]
    impl ToolRegistryProvider for FailingProvider {
        fn name(&self) -> &str {
            "failing"
        }

        async fn get_tools(
            &self,
            _context: &CompletionContext,
            _cancel: &CancellationToken,
        ) -> ToolProviderResult<Vec<ToolRegistryEntry>> {
            Err(ToolProviderError::Other("boom".to_string()))
        }
    }

    struct CancellingProvider;

    #[async_trait]
    impl ToolRegistryProvider for CancellingProvider {
        fn name(&self) -> &str {
            "cancelling"
        }

        async fn get_tools(
            &self,
            _context: &CompletionContext,
            _cancel: &CancellationToken,
        ) -> ToolProviderResult<Vec<ToolRegistryEntry>> {
            Err(ToolProviderError::Cancelled)
        }
    }

    /// Takes two seconds and never looks at the token
    struct SlowProvider;

    #[async_trait]
    impl ToolRegistryProvider for SlowProvider {
        fn name(&self) -> &str {
            "slow"
        }

        async fn get_tools(
            &self,
            _context: &CompletionContext,
            _cancel: &CancellationToken,
        ) -> ToolProviderResult<Vec<ToolRegistryEntry>> {
            tokio::time::sleep(Duration::from_secs(2)).await;
            Ok(vec![entry("search_docs", "Search documents", ToolSource::McpServer)])
        }
    }

    fn cancel_after(delay: Duration) -> CancellationToken {
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            trigger.cancel();
        });
        cancel
    }

    fn entry(name: &str, description: &str, source: ToolSource) -> ToolRegistryEntry {
        ToolRegistryEntry::new(name, source).with_description(description)
    }

    fn local() -> Arc<dyn ToolRegistryProvider> {
        Arc::new(StaticToolProvider::new(
            "local",
            vec![
                entry("summarize", "Summarize a document", ToolSource::Local),
                entry("translate", "Translate text to another language", ToolSource::Local),
            ],
        ))
    }

    fn mcp() -> Arc<dyn ToolRegistryProvider> {
        Arc::new(StaticToolProvider::new(
            "mcp",
            vec![
                entry("send_email", "Send an email message", ToolSource::McpServer),
                entry("read_inbox", "Read email messages from the inbox", ToolSource::McpServer),
                entry("list_events", "List calendar events", ToolSource::McpServer),
            ],
        ))
    }

    fn registry(providers: Vec<Arc<dyn ToolRegistryProvider>>) -> ToolRegistry {
        providers
            .into_iter()
            .fold(ToolRegistry::new(Arc::new(NoOpLogger::new())), |r, p| r.with_provider(p))
    }

    #[tokio::test]
    async fn test_get_all_concatenates_providers() {
        let registry = registry(vec![local(), mcp()]);
        let tools = registry
            .get_all(&CompletionContext::new(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(tools.len(), 5);
        assert_eq!(tools[0].name, "summarize");
        assert_eq!(tools[4].name, "list_events");
    }

    #[tokio::test]
    async fn test_failing_provider_is_isolated() {
        let registry = registry(vec![local(), Arc::new(FailingProvider), mcp()]);
        let tools = registry
            .get_all(&CompletionContext::new(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(tools.len(), 5);
    }

    #[tokio::test]
    async fn test_provider_cancellation_propagates() {
        let registry = registry(vec![local(), Arc::new(CancellingProvider), mcp()]);
        let result = registry
            .get_all(&CompletionContext::new(), &CancellationToken::new())
            .await;

        assert!(matches!(result, Err(ToolProviderError::Cancelled)));
    }

    #[tokio::test]
    async fn test_cancelled_token_stops_aggregation() {
        let registry = registry(vec![local(), mcp()]);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = registry.get_all(&CompletionContext::new(), &cancel).await;
        assert!(matches!(result, Err(ToolProviderError::Cancelled)));
    }

    #[tokio::test]
    async fn test_cancel_interrupts_unresponsive_provider() {
        let registry = registry(vec![local(), Arc::new(SlowProvider)]);
        let cancel = cancel_after(Duration::from_millis(20));

        let started = Instant::now();
        let result = registry.get_all(&CompletionContext::new(), &cancel).await;

        assert!(matches!(result, Err(ToolProviderError::Cancelled)));
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_search_reports_cancellation() {
        let slow: Arc<dyn ToolRegistryProvider> = Arc::new(SlowProvider);
        let registry = registry(vec![slow]);
        let cancel = cancel_after(Duration::from_millis(20));

        let result = registry
            .search("search documents", 5, &CompletionContext::new(), &cancel)
            .await;
        assert!(matches!(result, Err(ToolProviderError::Cancelled)));
    }

    #[tokio::test]
    async fn test_search_ranks_by_relevance() {
        let registry = registry(vec![local(), mcp()]);
        let results = registry
            .search("send an email", 2, &CompletionContext::new(), &CancellationToken::new())
            .await
            .unwrap();

        let names: Vec<_> = results.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["send_email", "read_inbox"]);
    }

    #[tokio::test]
    async fn test_search_excludes_unrelated_tools() {
        let registry = registry(vec![local(), mcp()]);
        let results = registry
            .search("calendar", 10, &CompletionContext::new(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "list_events");
    }

    #[tokio::test]
    async fn test_search_with_blank_query() {
        let registry = registry(vec![local(), mcp()]);
        let results = registry
            .search("   ", 3, &CompletionContext::new(), &CancellationToken::new())
            .await
            .unwrap();
        assert!(results.is_empty());
    }
}
