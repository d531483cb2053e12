//! Configuration structures.
//!
//! Configuration is loaded from an optional JSON file; every section falls
//! back to its defaults when omitted.

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::errors::Result;

/// Global arbiter configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,

    /// Status output configuration.
    #[serde(default)]
    pub output: OutputConfig,

    /// Kernel behaviour.
    #[serde(default)]
    pub kernel: KernelConfig,
}

impl Config {
    /// Load configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Tracing log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable JSON log formatting.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

/// Status rendering format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Status output configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,

    /// Width of a single matrix cell in the text table.
    pub column_width: usize,

    /// Print the state before the first event.
    pub print_initial: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            column_width: 5,
            print_initial: true,
        }
    }
}

/// Kernel behaviour.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct KernelConfig {
    /// Re-verify the state invariants after every committed operation.
    pub verify_invariants: bool,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            verify_invariants: cfg!(debug_assertions),
        }
    }
}
