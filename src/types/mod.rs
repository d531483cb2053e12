//! Core types for the banker arbiter.
//!
//! This module provides foundational types used throughout the system:
//! - **IDs**: Strongly-typed process identifiers
//! - **Errors**: Application error types with thiserror derives
//! - **Config**: Configuration structures for logging, output, and the kernel

mod config;
mod errors;
mod ids;

pub use config::{Config, KernelConfig, ObservabilityConfig, OutputConfig, OutputFormat};
pub use errors::{Error, Result};
pub use ids::ProcessId;

/// Count of resource units.
///
/// Signed so malformed input (negative components) can be represented and
/// rejected; committed state never holds a negative value.
pub type Units = i64;
