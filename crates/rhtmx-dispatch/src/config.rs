// File: src/config.rs
// Purpose: Routing configuration parsed from rhtmx.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::method::ANY_METHODS;
use crate::route::compiler::DEFAULT_RULE;

/// Dispatcher configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub routing: RoutingConfig,
}

/// Routing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Whether compiled patterns ignore case (default: true)
    #[serde(default = "default_true")]
    pub case_insensitive: bool,

    /// Rule for placeholders without a custom one (default: `\w+`)
    #[serde(default = "default_rule")]
    pub default_rule: String,

    /// Methods accepted by routes registered with `any`
    #[serde(default = "default_any_methods")]
    pub any_methods: Vec<String>,
}

fn default_true() -> bool {
    true
}

fn default_rule() -> String {
    DEFAULT_RULE.to_string()
}

fn default_any_methods() -> Vec<String> {
    ANY_METHODS.iter().map(|m| m.to_string()).collect()
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            case_insensitive: true,
            default_rule: default_rule(),
            any_methods: default_any_methods(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        Ok(config)
    }

    /// Load configuration from the default path (./rhtmx.toml)
    pub fn load_default() -> Result<Self> {
        Self::load("rhtmx.toml")
    }
}
