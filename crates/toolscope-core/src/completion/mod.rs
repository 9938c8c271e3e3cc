//! Completion collaborators
//!
//! The orchestrator talks to language models through three seams:
//!
//! - `CompletionService`: the general transport (streaming for the main
//!   response, non-streaming for auxiliary calls)
//! - `ChatClientFactory` / `ChatClient`: a client pinned to one deployment,
//!   used when a cheaper "utility" model is configured for planning
//!
//! The genai backend implements all three over configured connections. The
//! mock backends are deterministic and record every request.

mod error;
mod genai_client;
mod genai_adapter;
mod mock;
mod traits;

pub use error::{CompletionError, CompletionResult};
pub use genai_client::{GenaiChatClient, GenaiChatClientFactory, GenaiCompletionService};
pub use genai_adapter::{api_key_env_var, create_client};
pub use mock::{MockChatClient, MockCompletionService, MockConfig, MockMode, RecordedRequest};
pub use traits::{collect_text, ChatClient, ChatClientFactory, ChatOptions, CompletionService, StreamResponse};
