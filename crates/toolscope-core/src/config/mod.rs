//! Settings and orchestrator tuning
//!
//! - `OrchestratorOptions`: thresholds and budgets of the scoping engine
//! - `ConnectionSettings`: provider connections and their deployments
//! - `FileSettingsProvider`: YAML file-based settings (user/workspace level)

mod error;
mod options;
mod file;

pub use error::{ConfigError, ConfigResult};
pub use options::{find_connection, ConnectionSettings, OrchestratorOptions};
pub use file::{FileSettingsProvider, Settings, SettingsLevel, DEFAULT_ORCHESTRATOR_NAME};
