//! Configuration loader and validator for the board→webhook job.
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("environment variable '{0}' is not set")]
    MissingEnv(String),
    #[error("Invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Root configuration struct mirroring the YAML schema exactly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    pub planka: Planka,
    pub hub: Hub,
    #[serde(default)]
    pub app: App,
}

/// Planka board connection settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Planka {
    pub base_url: String,
    pub username: String,
    pub password: String,
}

/// Automation hub webhook settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Hub {
    pub base_url: String,
    pub webhook_id: String,
}

/// App-level settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct App {
    #[serde(default)]
    pub horizon_days: u32,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            horizon_days: 0,
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

static ENV_PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("valid placeholder regex"));

/// Replace every `${VAR}` placeholder with the value of the matching process
/// environment variable. An unset variable is a hard error, never an empty
/// substitution.
pub fn substitute_env(raw: &str) -> Result<String, ConfigError> {
    let mut out = String::with_capacity(raw.len());
    let mut last = 0;
    for caps in ENV_PLACEHOLDER.captures_iter(raw) {
        let whole = caps.get(0).expect("capture 0 always present");
        let name = &caps[1];
        let value = std::env::var(name).map_err(|_| ConfigError::MissingEnv(name.to_string()))?;
        out.push_str(&raw[last..whole.start()]);
        out.push_str(&value);
        last = whole.end();
    }
    out.push_str(&raw[last..]);
    Ok(out)
}

/// Load configuration from a YAML file, substitute `${ENV_VAR}` placeholders,
/// parse, and validate.
/// - If `path` is None, uses `config.yaml` in the current working directory.
pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or_else(|| Path::new("config.yaml"));
    let content = fs::read_to_string(path)?;
    let content = substitute_env(&content)?;
    let cfg: Config = serde_yaml::from_str(&content)?;
    validate(&cfg)?;
    Ok(cfg)
}

/// Validate a configuration instance.
fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if cfg.planka.base_url.trim().is_empty() {
        return Err(ConfigError::Invalid("planka.base_url must be non-empty"));
    }
    if cfg.planka.username.trim().is_empty() {
        return Err(ConfigError::Invalid("planka.username must be non-empty"));
    }
    if cfg.planka.password.trim().is_empty() {
        return Err(ConfigError::Invalid("planka.password must be non-empty"));
    }

    if cfg.hub.base_url.trim().is_empty() {
        return Err(ConfigError::Invalid("hub.base_url must be non-empty"));
    }
    if cfg.hub.webhook_id.trim().is_empty() {
        return Err(ConfigError::Invalid("hub.webhook_id must be non-empty"));
    }

    if cfg.app.log_level.trim().is_empty() {
        return Err(ConfigError::Invalid("app.log_level must be non-empty"));
    }

    Ok(())
}

/// Example YAML configuration, also exercised by the config tests.
pub fn example() -> &'static str {
    r#"planka:
  base_url: "https://planka.example.com"
  username: "board-reader"
  password: "YOUR_PLANKA_PASSWORD"

hub:
  base_url: "https://hub.example.com"
  webhook_id: "YOUR_WEBHOOK_ID"

app:
  horizon_days: 3
  log_level: "info"
"#
}
