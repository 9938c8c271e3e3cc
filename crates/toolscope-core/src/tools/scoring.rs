//! Relevance scoring of tools against a query text

use crate::tokenizer::{tokenize, TokenSet};
use crate::types::ToolRegistryEntry;

/// A tool paired with its relevance score in `[0, 1]`
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredTool {
    pub entry: ToolRegistryEntry,
    pub score: f32,
}

/// Score one tool's tokens against the query tokens.
///
/// `max(matches / |query|, matches / |tool|)`: the better of how much of
/// the query the tool covers and how much of the tool the query covers.
pub fn relevance_score(query: &TokenSet, tool: &TokenSet) -> f32 {
    if query.is_empty() || tool.is_empty() {
        return 0.0;
    }

    let matches = query.intersection(tool).count();
    if matches == 0 {
        return 0.0;
    }

    let matches = matches as f32;
    (matches / query.len() as f32).max(matches / tool.len() as f32)
}

/// Score every entry and sort by descending score.
///
/// The sort is stable: equal scores keep registry order.
pub fn rank(entries: &[ToolRegistryEntry], query: &TokenSet) -> Vec<ScoredTool> {
    let mut scored: Vec<ScoredTool> = entries
        .iter()
        .map(|entry| ScoredTool {
            score: relevance_score(query, &tokenize(&entry.relevance_text())),
            entry: entry.clone(),
        })
        .collect();

    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    scored
}

/// Outcome of selecting a bounded tool subset
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// Chosen tools, best first
    pub tools: Vec<ToolRegistryEntry>,
    /// Score of each chosen tool; `None` when the selection fell back to registry order
    pub scores: Option<Vec<f32>>,
}

impl Selection {
    /// First `budget` entries in registry order
    pub fn registry_order(entries: &[ToolRegistryEntry], budget: usize) -> Self {
        Self {
            tools: entries.iter().take(budget).cloned().collect(),
            scores: None,
        }
    }

    /// Whether the tools were ranked by relevance
    pub fn is_scored(&self) -> bool {
        self.scores.is_some()
    }
}

/// Select at most `budget` entries relevant to `scoring_text`.
///
/// Blank text, text with no stems, or no tool scoring above zero all fall
/// back to the first `budget` entries in registry order. Otherwise the
/// best-scoring entries come first.
///
/// Zero-score entries are not filtered out: they fill the slots left after
/// the matches, in registry order, so a scored selection over a large
/// catalog still holds `budget` tools. `ToolRegistry::search` is stricter
/// and returns matches only.
pub fn select(entries: &[ToolRegistryEntry], scoring_text: &str, budget: usize) -> Selection {
    if scoring_text.trim().is_empty() {
        return Selection::registry_order(entries, budget);
    }

    let query = tokenize(scoring_text);
    if query.is_empty() {
        return Selection::registry_order(entries, budget);
    }

    let ranked = rank(entries, &query);
    if ranked.first().map_or(true, |top| top.score <= 0.0) {
        return Selection::registry_order(entries, budget);
    }

    let (tools, scores) = ranked
        .into_iter()
        .take(budget)
        .map(|s| (s.entry, s.score))
        .unzip();

    Selection {
        tools,
        scores: Some(scores),
    }
}
