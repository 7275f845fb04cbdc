//! Command-line configuration.
//!
//! Configuration is loaded in the following order (later overrides earlier):
//! 1. Default values
//! 2. YAML config file (if specified via STEPGRAPH_CONFIG or --config)
//! 3. Environment variables

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use stepgraph_template::{Limits, Syntax, Template, TemplateError};

/// Front-end configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Template delimiters.
    pub syntax: Syntax,
    /// Rendering bounds.
    pub limits: Limits,
    /// Output formatting.
    pub output: OutputConfig,
}

impl Config {
    /// Loads configuration from `path` (or STEPGRAPH_CONFIG), then applies
    /// environment variable overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var("STEPGRAPH_CONFIG").ok().map(PathBuf::from));

        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(path.to_path_buf(), e))?;
        let mut config: Config = serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::ParseError(path.to_path_buf(), e.to_string()))?;
        config.normalize();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(c) = std::env::var("STEPGRAPH_ARGUMENT_START") {
            self.syntax.argument_start = parse_char("STEPGRAPH_ARGUMENT_START", &c)?;
        }
        if let Ok(c) = std::env::var("STEPGRAPH_ARGUMENT_END") {
            self.syntax.argument_end = parse_char("STEPGRAPH_ARGUMENT_END", &c)?;
        }
        if let Ok(c) = std::env::var("STEPGRAPH_ESCAPE") {
            self.syntax.escape = parse_char("STEPGRAPH_ESCAPE", &c)?;
        }
        if let Ok(len) = std::env::var("STEPGRAPH_MAX_OUTPUT_LEN") {
            self.limits.max_output_len = parse_limit("STEPGRAPH_MAX_OUTPUT_LEN", &len)?;
        }
        self.output.apply_env_overrides();
        self.normalize();
        Ok(())
    }

    /// A zero output limit means unlimited.
    fn normalize(&mut self) {
        if self.limits.max_output_len == Some(0) {
            self.limits.max_output_len = None;
        }
    }

    /// Checks the delimiters can be told apart.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.syntax.validate().map_err(|e| match e {
            TemplateError::InvalidSyntax { reason } => ConfigError::ValidationError(reason),
            other => ConfigError::ValidationError(other.to_string()),
        })
    }

    /// Builds the template machine for this configuration.
    pub fn template(&self) -> Result<Template, TemplateError> {
        Template::new(self.syntax, self.limits)
    }

    /// Saves configuration to a YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = serde_yaml::to_string(self)
            .map_err(|e| ConfigError::ParseError(path.to_path_buf(), e.to_string()))?;
        std::fs::write(path, content).map_err(|e| ConfigError::IoError(path.to_path_buf(), e))?;
        Ok(())
    }
}

/// Output configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Print render results as JSON objects.
    pub json: bool,
}

impl OutputConfig {
    fn apply_env_overrides(&mut self) {
        if let Ok(json) = std::env::var("STEPGRAPH_OUTPUT_JSON") {
            self.json = json == "true" || json == "1";
        }
    }
}

fn parse_char(var: &str, value: &str) -> Result<char, ConfigError> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(ConfigError::ValidationError(format!(
            "{} must be a single character, got '{}'",
            var, value
        ))),
    }
}

fn parse_limit(var: &str, value: &str) -> Result<Option<usize>, ConfigError> {
    match value.trim().parse::<usize>() {
        Ok(0) => Ok(None),
        Ok(len) => Ok(Some(len)),
        Err(_) => Err(ConfigError::ValidationError(format!(
            "{} must be a non-negative integer, got '{}'",
            var, value
        ))),
    }
}

/// Configuration error.
#[derive(Debug)]
pub enum ConfigError {
    IoError(PathBuf, std::io::Error),
    ParseError(PathBuf, String),
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(path, e) => {
                write!(f, "failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(f, "failed to parse config file '{}': {}", path.display(), e)
            }
            ConfigError::ValidationError(msg) => {
                write!(f, "configuration validation failed: {}", msg)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.syntax, Syntax::default());
        assert_eq!(config.limits.max_output_len, None);
        assert!(!config.output.json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_yaml_roundtrip() {
        let config = Config {
            limits: Limits {
                max_output_len: Some(64),
            },
            ..Config::default()
        };
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let parsed: Config = serde_yaml::from_str("syntax:\n  escape: '%'\n").unwrap();
        assert_eq!(parsed.syntax.escape, '%');
        assert_eq!(parsed.syntax.argument_start, '{');
        assert!(!parsed.output.json);
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stepgraph.yaml");

        let mut config = Config::default();
        config.syntax.argument_start = '<';
        config.syntax.argument_end = '>';
        config.output.json = true;
        config.save(&path).unwrap();

        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::from_file(dir.path().join("absent.yaml"));
        assert!(matches!(result, Err(ConfigError::IoError(..))));
    }

    #[test]
    fn test_invalid_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.yaml");
        std::fs::write(&path, "syntax: [unclosed").unwrap();
        assert!(matches!(
            Config::from_file(&path),
            Err(ConfigError::ParseError(..))
        ));
    }

    #[test]
    fn test_validate_rejects_colliding_delimiters() {
        let mut config = Config::default();
        config.syntax.escape = '}';
        let err = config.validate().unwrap_err();
        assert!(err.to_string().starts_with("configuration validation failed"));
    }

    #[test]
    fn test_parse_char() {
        assert_eq!(parse_char("X", "é").unwrap(), 'é');
        assert!(parse_char("X", "").is_err());
        assert!(parse_char("X", "ab").is_err());
    }

    #[test]
    fn test_zero_output_limit_in_file_is_unlimited() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stepgraph.yaml");
        std::fs::write(&path, "limits:\n  max_output_len: 0\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.limits.max_output_len, None);
        assert_eq!(
            config.template().unwrap().render("abc", &[] as &[&str]).unwrap(),
            "abc"
        );
    }

    #[test]
    fn test_parse_limit() {
        assert_eq!(parse_limit("X", "0").unwrap(), None);
        assert_eq!(parse_limit("X", "128").unwrap(), Some(128));
        assert!(matches!(
            parse_limit("X", "lots"),
            Err(ConfigError::ValidationError(_))
        ));
        assert!(parse_limit("X", "-1").is_err());
    }

    #[test]
    fn test_template_from_config() {
        let mut config = Config::default();
        config.syntax.argument_start = '[';
        config.syntax.argument_end = ']';
        let template = config.template().unwrap();
        assert_eq!(template.render("[0] {0}", &["a"]).unwrap(), "a {0}");
    }
}
