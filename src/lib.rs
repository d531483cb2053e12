//! # Banker Arbiter - Deadlock-Avoidance Resource Allocation
//!
//! A central arbiter that tracks finite, countable resource units and
//! grants or defers requests from competing processes so the system never
//! enters an unsafe state:
//! - Resource state: available vector and max/allocation/need matrices
//! - Safety checking with the banker's algorithm
//! - FIFO wait queue with strictly head-blocking drainage on release
//! - Scenario files and status tables for driving and inspecting the arbiter
//!
//! ## Architecture
//!
//! The arbiter follows a single-owner model where the `Kernel` owns all mutable state:
//! ```text
//!                       ┌─────────────────────────────────┐
//!   request/release  →  │             Kernel              │
//!                       │  ┌──────────┐  ┌────────────┐   │
//!                       │  │ Resource │  │   Safety   │   │
//!                       │  │  State   │  │  Checker   │   │
//!                       │  └──────────┘  └────────────┘   │
//!                       │  ┌──────────┐                   │
//!                       │  │   Wait   │                   │
//!                       │  │  Queue   │                   │
//!                       │  └──────────┘                   │
//!                       └─────────────────────────────────┘
//!                                    │ snapshots
//!                                    ▼
//!                             status / JSON output
//! ```

// Enforce strict safety at compile time
#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]

// Re-export public API
pub mod kernel;
pub mod status;
pub mod timeline;
pub mod types;

// Internal utilities
pub mod observability;

pub use kernel::{AllocateStatus, Grant, Kernel, KernelHandle, KernelSnapshot, WaitReason};
pub use timeline::{Event, Scenario, StepReport};
pub use types::{Config, Error, ProcessId, Result, Units};
