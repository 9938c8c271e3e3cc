//! Prompt templates
//!
//! Templates are plain text with `{{ key }}` placeholders, looked up by id.

use std::collections::HashMap;

use parking_lot::RwLock;
use thiserror::Error;

/// Id of the built-in tool planning system prompt
pub const PLANNING_TEMPLATE_ID: &str = "tool-planning";

/// Built-in tool planning system prompt
pub const PLANNING_TEMPLATE: &str = r#"You are a planning assistant. You do not answer the user and you do not call tools.

Read the conversation and decide which of the available tools the assistant will need
for the user's latest request. Reply with a short plan: one line per step, naming the
tools to use and what each is for. If no tool is needed, say so in one sentence.

Local tools:
{{ local_tools }}

System tools:
{{ system_tools }}

MCP server tools:
{{ mcp_tools }}
"#;

/// Template errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("Template not found: {0}")]
    NotFound(String),

    #[error("Unterminated placeholder in template '{0}'")]
    Unterminated(String),
}

pub type TemplateResult<T> = Result<T, TemplateError>;

/// Renders named templates
pub trait TemplateService: Send + Sync {
    /// Render template `id` with `args`
    fn render(&self, id: &str, args: &HashMap<String, String>) -> TemplateResult<String>;
}

/// In-memory template store
pub struct MemoryTemplateService {
    templates: RwLock<HashMap<String, String>>,
}

impl MemoryTemplateService {
    /// Empty store
    pub fn new() -> Self {
        Self {
            templates: RwLock::new(HashMap::new()),
        }
    }

    /// Store with the built-in templates registered
    pub fn with_builtins() -> Self {
        let service = Self::new();
        service.register(PLANNING_TEMPLATE_ID, PLANNING_TEMPLATE);
        service
    }

    /// Add or replace a template
    pub fn register(&self, id: impl Into<String>, template: impl Into<String>) {
        self.templates.write().insert(id.into(), template.into());
    }
}

impl Default for MemoryTemplateService {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl TemplateService for MemoryTemplateService {
    fn render(&self, id: &str, args: &HashMap<String, String>) -> TemplateResult<String> {
        let templates = self.templates.read();
        let template = templates
            .get(id)
            .ok_or_else(|| TemplateError::NotFound(id.to_string()))?;
        substitute(id, template, args)
    }
}

/// Replace `{{ key }}` placeholders. Unknown keys render empty.
fn substitute(id: &str, template: &str, args: &HashMap<String, String>) -> TemplateResult<String> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after
            .find("}}")
            .ok_or_else(|| TemplateError::Unterminated(id.to_string()))?;

        if let Some(value) = args.get(after[..end].trim()) {
            out.push_str(value);
        }
        rest = &after[end + 2..];
    }

    out.push_str(rest);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_render_substitutes_placeholders() {
        let service = MemoryTemplateService::new();
        service.register("greet", "Hello {{name}}, from {{ place }}!");

        let text = service
            .render("greet", &args(&[("name", "Ada"), ("place", "London")]))
            .unwrap();
        assert_eq!(text, "Hello Ada, from London!");
    }

    #[test]
    fn test_unknown_template() {
        let service = MemoryTemplateService::new();
        assert_eq!(
            service.render("missing", &HashMap::new()),
            Err(TemplateError::NotFound("missing".to_string()))
        );
    }

    #[test]
    fn test_unterminated_placeholder() {
        let service = MemoryTemplateService::new();
        service.register("broken", "Hello {{ name");
        assert!(matches!(
            service.render("broken", &args(&[("name", "x")])),
            Err(TemplateError::Unterminated(_))
        ));
    }

    #[test]
    fn test_builtin_planning_template() {
        let service = MemoryTemplateService::with_builtins();
        let text = service
            .render(
                PLANNING_TEMPLATE_ID,
                &args(&[
                    ("local_tools", "- summarize: Summarize a document"),
                    ("system_tools", "(none)"),
                    ("mcp_tools", "- send_email: Send an email message"),
                ]),
            )
            .unwrap();

        assert!(text.contains("- summarize: Summarize a document"));
        assert!(text.contains("- send_email: Send an email message"));
        assert!(!text.contains("{{"));
    }
}
