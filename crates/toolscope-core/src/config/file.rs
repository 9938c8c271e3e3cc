//! File-based settings (YAML)
//!
//! Supports user-level (~/.config/toolscope/config.yaml) and workspace-level
//! (.config/toolscope/config.yaml) settings.

use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use super::error::{ConfigError, ConfigResult};
use super::options::{find_connection, ConnectionSettings, OrchestratorOptions};

/// Name of the orchestrator used when settings do not pick one
pub const DEFAULT_ORCHESTRATOR_NAME: &str = "default";

fn default_orchestrator_name() -> String {
    DEFAULT_ORCHESTRATOR_NAME.to_string()
}

/// Settings file structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Orchestrator tuning
    #[serde(default)]
    pub orchestrator: OrchestratorOptions,

    /// Orchestrator used when a request does not name one
    #[serde(default = "default_orchestrator_name")]
    pub default_orchestrator: String,

    /// Provider connections and their deployments
    #[serde(default)]
    pub connections: Vec<ConnectionSettings>,

    /// Features whose system tools are available
    #[serde(default)]
    pub enabled_features: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            orchestrator: OrchestratorOptions::default(),
            default_orchestrator: default_orchestrator_name(),
            connections: Vec::new(),
            enabled_features: Vec::new(),
        }
    }
}

impl Settings {
    /// Parse and validate settings from YAML text
    pub fn from_yaml(content: &str) -> ConfigResult<Self> {
        let settings: Settings = serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse YAML: {}", e)))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validate the orchestrator options
    pub fn validate(&self) -> ConfigResult<()> {
        self.orchestrator.validate()
    }

    /// Look up a connection for a provider
    pub fn connection(&self, provider: &str, name: Option<&str>) -> Option<&ConnectionSettings> {
        find_connection(&self.connections, provider, name)
    }
}

/// Settings level (user or workspace)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsLevel {
    /// User-level settings (~/.config/toolscope/config.yaml)
    User,
    /// Workspace-level settings (.config/toolscope/config.yaml in workspace root)
    Workspace,
}

/// File-based settings provider
///
/// Reads settings from a YAML file and caches them until `reload()`.
///
/// # Example
///
/// ```no_run
/// use toolscope_core::config::FileSettingsProvider;
///
/// let settings = FileSettingsProvider::user().settings().unwrap();
/// println!("default orchestrator: {}", settings.default_orchestrator);
/// ```
pub struct FileSettingsProvider {
    path: PathBuf,
    level: SettingsLevel,
    cache: RwLock<Option<Settings>>,
}

impl FileSettingsProvider {
    /// Create a new settings provider for a specific path
    pub fn new(path: impl Into<PathBuf>, level: SettingsLevel) -> Self {
        Self {
            path: path.into(),
            level,
            cache: RwLock::new(None),
        }
    }

    /// Create a user-level settings provider (~/.config/toolscope/config.yaml)
    pub fn user() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(".config"));
        let path = config_dir.join("toolscope").join("config.yaml");
        Self::new(path, SettingsLevel::User)
    }

    /// Create a workspace-level settings provider (.config/toolscope/config.yaml)
    pub fn workspace(workspace_root: impl AsRef<Path>) -> Self {
        let path = workspace_root.as_ref().join(".config").join("toolscope").join("config.yaml");
        Self::new(path, SettingsLevel::Workspace)
    }

    /// Get the settings file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the settings level
    pub fn level(&self) -> SettingsLevel {
        self.level
    }

    /// Check if the settings file exists
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    fn load(&self) -> ConfigResult<Settings> {
        if !self.path.exists() {
            return Ok(Settings::default());
        }

        let content = fs::read_to_string(&self.path)?;
        Settings::from_yaml(&content)
    }

    /// Get cached or load settings
    pub fn settings(&self) -> ConfigResult<Settings> {
        if let Some(settings) = self.cache.read().as_ref() {
            return Ok(settings.clone());
        }
        self.reload()
    }

    /// Reload settings from disk (invalidate cache)
    pub fn reload(&self) -> ConfigResult<Settings> {
        let settings = self.load()?;
        *self.cache.write() = Some(settings.clone());
        Ok(settings)
    }
}

impl std::fmt::Debug for FileSettingsProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSettingsProvider")
            .field("path", &self.path)
            .field("level", &self.level)
            .field("exists", &self.exists())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let provider = FileSettingsProvider::new(dir.path().join("config.yaml"), SettingsLevel::User);

        assert!(!provider.exists());
        let settings = provider.settings().unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.default_orchestrator, "default");
    }

    #[test]
    fn test_yaml_settings() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(
            &path,
            r#"
orchestrator:
  scoping_threshold: 20
  initial_tool_count: 8
default_orchestrator: exempt-builtin
connections:
  - provider: openai
    name: primary
    default_deployment: gpt-4o
    utility_deployment: gpt-4o-mini
enabled_features:
  - search
"#,
        )
        .unwrap();

        let provider = FileSettingsProvider::new(&path, SettingsLevel::Workspace);
        let settings = provider.settings().unwrap();

        assert_eq!(settings.orchestrator.scoping_threshold, 20);
        assert_eq!(settings.orchestrator.initial_tool_count, 8);
        assert_eq!(settings.orchestrator.planning_threshold, 100);
        assert_eq!(settings.default_orchestrator, "exempt-builtin");
        assert_eq!(settings.enabled_features, vec!["search".to_string()]);

        let connection = settings.connection("openai", None).unwrap();
        assert_eq!(connection.utility_deployment.as_deref(), Some("gpt-4o-mini"));
    }

    #[test]
    fn test_invalid_options_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "orchestrator:\n  scoping_threshold: 0\n").unwrap();

        let provider = FileSettingsProvider::new(&path, SettingsLevel::User);
        assert!(matches!(provider.settings(), Err(ConfigError::InvalidOptions(_))));
    }

    #[test]
    fn test_malformed_yaml_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "orchestrator: [not, a, map").unwrap();

        let provider = FileSettingsProvider::new(&path, SettingsLevel::User);
        assert!(matches!(provider.settings(), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_cache_until_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "default_orchestrator: first\n").unwrap();

        let provider = FileSettingsProvider::new(&path, SettingsLevel::User);
        assert_eq!(provider.settings().unwrap().default_orchestrator, "first");

        fs::write(&path, "default_orchestrator: second\n").unwrap();
        assert_eq!(provider.settings().unwrap().default_orchestrator, "first");
        assert_eq!(provider.reload().unwrap().default_orchestrator, "second");
    }

    #[test]
    fn test_workspace_path() {
        let provider = FileSettingsProvider::workspace("/tmp/project");
        assert!(provider.path().ends_with(".config/toolscope/config.yaml"));
        assert_eq!(provider.level(), SettingsLevel::Workspace);
    }
}
