//! Adapter between toolscope types and genai types
//!
//! Conversion functions plus construction of a genai `Client` whose auth and
//! endpoint come from a `ConnectionSettings` entry rather than genai's own
//! environment lookup.

use std::future::Future;
use std::pin::Pin;

use genai::chat::{
    ChatMessage as GenaiMessage, ChatOptions as GenaiOptions, ChatStreamEvent,
    MessageContent as GenaiContent, Tool as GenaiTool, ToolCall as GenaiToolCall,
};
use genai::resolver::{AuthData, AuthResolver, Endpoint, ServiceTargetResolver};
use genai::{adapter::AdapterKind, Client, ModelIden, ServiceTarget};

use crate::config::ConnectionSettings;
use crate::types::{ChatMessage, ContentPart, MessageContent, MessageRole, StreamChunk, ToolCall, ToolRegistryEntry};

use super::error::CompletionError;
use super::traits::ChatOptions;

// ============================================================================
// Message Conversion
// ============================================================================

/// Convert a ChatMessage to a genai ChatMessage.
///
/// Tool turns are flattened to text; the backend only needs them as context.
pub fn to_genai_message(msg: ChatMessage) -> GenaiMessage {
    let text = match msg.content {
        MessageContent::Text(text) => text,
        MessageContent::Parts(parts) => parts
            .into_iter()
            .map(|p| match p {
                ContentPart::Text { text } => text,
                ContentPart::ToolUse { name, input, .. } => {
                    format!("[Tool call {}]: {}", name, input)
                }
                ContentPart::ToolResult { tool_use_id, content } => {
                    format!("[Tool result for {}]: {}", tool_use_id, content)
                }
            })
            .collect::<Vec<_>>()
            .join("\n"),
    };
    let content = GenaiContent::from(text);

    match msg.role {
        MessageRole::System => GenaiMessage::system(content),
        MessageRole::User => GenaiMessage::user(content),
        MessageRole::Assistant => GenaiMessage::assistant(content),
    }
}

/// Convert messages to genai messages
pub fn to_genai_messages(messages: Vec<ChatMessage>) -> Vec<GenaiMessage> {
    messages.into_iter().map(to_genai_message).collect()
}

// ============================================================================
// Tool Conversion
// ============================================================================

/// Convert a registry entry to a genai Tool
pub fn to_genai_tool(tool: &ToolRegistryEntry) -> GenaiTool {
    let mut genai_tool = GenaiTool::new(&tool.name).with_description(tool.description_or_empty());

    if let Some(schema) = &tool.input_schema {
        genai_tool = genai_tool.with_schema(schema.clone());
    }

    genai_tool
}

// ============================================================================
// Options Conversion
// ============================================================================

/// Convert ChatOptions to genai ChatOptions
pub fn to_genai_options(options: &ChatOptions) -> GenaiOptions {
    let mut genai_opts = GenaiOptions::default();

    if let Some(temp) = options.temperature {
        genai_opts = genai_opts.with_temperature(temp as f64);
    }

    if let Some(max_tokens) = options.max_tokens {
        genai_opts = genai_opts.with_max_tokens(max_tokens);
    }

    genai_opts.with_capture_tool_calls(true)
}

// ============================================================================
// Response Conversion
// ============================================================================

/// Convert a genai ToolCall
pub fn from_genai_tool_call(tc: &GenaiToolCall) -> ToolCall {
    ToolCall {
        id: tc.call_id.clone(),
        name: tc.fn_name.clone(),
        input: tc.fn_arguments.clone(),
    }
}

/// Convert a genai stream event to a StreamChunk
pub fn from_genai_event(event: ChatStreamEvent) -> Option<Result<StreamChunk, CompletionError>> {
    match event {
        ChatStreamEvent::Chunk(chunk) => Some(Ok(StreamChunk::Text {
            text: chunk.content,
        })),
        ChatStreamEvent::ToolCallChunk(chunk) => Some(Ok(StreamChunk::ToolCallDelta {
            id: chunk.tool_call.call_id,
            name: Some(chunk.tool_call.fn_name),
            input_delta: Some(chunk.tool_call.fn_arguments.to_string()),
        })),
        ChatStreamEvent::End(end) => {
            // Captured calls are only complete once the stream ends
            let tool_calls = end.captured_tool_calls()?;
            let first = tool_calls.first()?;
            Some(Ok(StreamChunk::ToolCall {
                tool_call: from_genai_tool_call(first),
            }))
        }
        ChatStreamEvent::Start => None,
        ChatStreamEvent::ReasoningChunk(_) => None,
        ChatStreamEvent::ThoughtSignatureChunk(_) => None,
    }
}

// ============================================================================
// Client Creation
// ============================================================================

/// Environment variable holding the API key of `provider`
pub fn api_key_env_var(provider: &str) -> String {
    match provider.to_lowercase().as_str() {
        "gemini" | "google" => "GEMINI_API_KEY".to_string(),
        "azure" => "AZURE_OPENAI_API_KEY".to_string(),
        other => format!("{}_API_KEY", other.to_uppercase().replace('-', "_")),
    }
}

/// Create a genai Client for a connection.
///
/// Auth uses the connection's explicit key, else `<PROVIDER>_API_KEY`.
/// OpenAI-compatible providers are routed through the OpenAI adapter.
pub fn create_client(connection: &ConnectionSettings) -> Client {
    let provider = connection.provider.to_lowercase();
    let explicit_api_key = connection.api_key.clone();
    let api_base = connection.api_base.clone();

    let auth_provider = provider.clone();
    let auth_resolver = AuthResolver::from_resolver_async_fn(
        move |_model_iden: ModelIden| -> Pin<Box<dyn Future<Output = genai::resolver::Result<Option<AuthData>>> + Send>> {
            let explicit_key = explicit_api_key.clone();
            let env_var = api_key_env_var(&auth_provider);

            Box::pin(async move {
                if let Some(key) = explicit_key {
                    return Ok(Some(AuthData::from_single(key)));
                }
                // None lets genai handle keyless providers such as Ollama
                Ok(std::env::var(env_var).ok().map(AuthData::from_single))
            })
        },
    );

    let target_resolver = ServiceTargetResolver::from_resolver_fn(
        move |target: ServiceTarget| -> Result<ServiceTarget, genai::resolver::Error> {
            let custom = api_base.as_ref().map(|u| Endpoint::from_owned(u.clone()));

            let endpoint = match provider.as_str() {
                "openrouter" => {
                    custom.unwrap_or_else(|| Endpoint::from_static("https://openrouter.ai/api/v1/"))
                }
                "mistral" => {
                    custom.unwrap_or_else(|| Endpoint::from_static("https://api.mistral.ai/v1/"))
                }
                "azure" | "redhat" | "openai-compatible" => match custom {
                    Some(endpoint) => endpoint,
                    None => return Ok(target),
                },
                // Native genai providers resolve normally
                _ => return Ok(target),
            };

            let model = ModelIden::new(AdapterKind::OpenAI, target.model.model_name.clone());

            Ok(ServiceTarget {
                endpoint,
                auth: target.auth,
                model,
            })
        },
    );

    Client::builder()
        .with_auth_resolver(auth_resolver)
        .with_service_target_resolver(target_resolver)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use genai::chat::ChatRole;

    #[test]
    fn test_message_conversion() {
        let genai_msg = to_genai_message(ChatMessage::user("Hello, world!"));
        assert!(matches!(genai_msg.role, ChatRole::User));

        let genai_msg = to_genai_message(ChatMessage::system("Be brief"));
        assert!(matches!(genai_msg.role, ChatRole::System));
    }

    #[test]
    fn test_tool_conversion() {
        let tool = ToolRegistryEntry::new("get_weather", crate::types::ToolSource::McpServer)
            .with_description("Get weather for a location")
            .with_schema(serde_json::json!({
                "type": "object",
                "properties": { "location": { "type": "string" } }
            }));

        let genai_tool = to_genai_tool(&tool);
        assert_eq!(genai_tool.name, "get_weather");
    }

    #[test]
    fn test_api_key_env_var() {
        assert_eq!(api_key_env_var("openai"), "OPENAI_API_KEY");
        assert_eq!(api_key_env_var("Anthropic"), "ANTHROPIC_API_KEY");
        assert_eq!(api_key_env_var("gemini"), "GEMINI_API_KEY");
        assert_eq!(api_key_env_var("openai-compatible"), "OPENAI_COMPATIBLE_API_KEY");
    }
}
