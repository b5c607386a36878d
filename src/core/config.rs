use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::rules::unused_variable::DEFAULT_REMOVE_PATTERNS;
use crate::rules::{RuleId, DEFAULT_ORDER};

pub const CONFIG_FILE: &str = ".lintmend.yml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandsConfig {
    pub lint: String,
    pub build: String,
    pub test: String,
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            lint: "npm run lint".to_string(),
            build: "npm run build".to_string(),
            test: "npm run test:run -- --run --reporter=basic".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub commands: CommandsConfig,
    /// Upper bound for each analyzer, build, or test invocation.
    pub timeout_secs: u64,
    /// Extensions of files content-wide rules may rewrite.
    pub extensions: Vec<String>,
    /// Path substrings that are never rewritten.
    pub exclude: Vec<String>,
    pub order: Vec<RuleId>,
    pub remove_patterns: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            commands: CommandsConfig::default(),
            timeout_secs: 600,
            extensions: vec!["ts".to_string(), "tsx".to_string()],
            exclude: ["node_modules", "dist", ".vibe", "scripts"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            order: DEFAULT_ORDER.to_vec(),
            remove_patterns: DEFAULT_REMOVE_PATTERNS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Config {
    pub fn load(project_path: &Path) -> Self {
        let config_path = project_path.join(CONFIG_FILE);
        if !config_path.exists() {
            return Config::default();
        }
        match std::fs::read_to_string(&config_path) {
            Ok(content) => match serde_yaml::from_str::<Config>(&content) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!(path = %config_path.display(), error = %e, "invalid config, using defaults");
                    Config::default()
                }
            },
            Err(e) => {
                tracing::warn!(path = %config_path.display(), error = %e, "unreadable config, using defaults");
                Config::default()
            }
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = Config::load(tmp.path());
        assert_eq!(config.commands.lint, "npm run lint");
        assert_eq!(config.order, DEFAULT_ORDER.to_vec());
        assert!(config.exclude.contains(&"node_modules".to_string()));
        assert_eq!(config.timeout(), Duration::from_secs(600));
    }

    #[test]
    fn test_load_partial_config_from_file() {
        let tmp = TempDir::new().unwrap();
        let yaml = "\
commands:
  build: pnpm build
order:
  - unused-catch-binding
  - narrow-types
timeout_secs: 30
";
        fs::write(tmp.path().join(CONFIG_FILE), yaml).unwrap();
        let config = Config::load(tmp.path());
        assert_eq!(config.commands.build, "pnpm build");
        assert_eq!(config.commands.lint, "npm run lint");
        assert_eq!(
            config.order,
            vec![RuleId::UnusedCatchBinding, RuleId::NarrowTypes]
        );
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.extensions, vec!["ts".to_string(), "tsx".to_string()]);
    }

    #[test]
    fn test_invalid_config_falls_back_to_defaults() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "order: [not-a-rule]\n").unwrap();
        let config = Config::load(tmp.path());
        assert_eq!(config.order, DEFAULT_ORDER.to_vec());
    }
}
