//! Kernel types: request outcomes, release reports, process phases, snapshots.

use serde::{Deserialize, Serialize};

use super::state::StateSnapshot;
use super::wait_queue::QueuedRequest;
use crate::types::{Result, Units};

/// Why a well-formed request could not be granted right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(rename_all = "snake_case")]
pub enum WaitReason {
    /// Some component exceeds the currently available units.
    ResourceUnavailable,
    /// Granting would leave no safe completion order.
    UnsafeState,
}

/// Result of a validated allocation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "grant", content = "reason")]
pub enum Grant {
    Granted,
    Waiting(WaitReason),
}

impl Grant {
    pub fn is_granted(self) -> bool {
        self == Grant::Granted
    }
}

/// Three-way request status.
///
/// ```text
/// Ok(Granted)    → Success
/// Ok(Waiting(_)) → Waiting
/// Err(_)         → Fail
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AllocateStatus {
    Fail,
    Success,
    Waiting,
}

impl AllocateStatus {
    pub fn of(result: &Result<Grant>) -> Self {
        match result {
            Ok(Grant::Granted) => AllocateStatus::Success,
            Ok(Grant::Waiting(_)) => AllocateStatus::Waiting,
            Err(_) => AllocateStatus::Fail,
        }
    }
}

/// What a successful release did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseReport {
    /// Units returned to `available` by the release itself.
    pub released: Vec<Units>,
    /// Queue entries granted during drainage, in grant order.
    pub drained: Vec<QueuedRequest>,
}

/// Per-process position in the request state machine.
///
/// ```text
/// Unrequested → {Granted | Waiting}
/// Waiting     → {Granted | Waiting}        (on any release)
/// Granted     → {Granted | Unrequested}    (on partial/full free)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ProcessPhase {
    Unrequested,
    Granted,
    Waiting,
}

/// Read-only view of everything a status printer may show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KernelSnapshot {
    #[serde(flatten)]
    pub state: StateSnapshot,
    /// Wait queue contents, head first.
    pub waiting: Vec<QueuedRequest>,
}

impl KernelSnapshot {
    pub fn process_count(&self) -> usize {
        self.state.max.len()
    }

    pub fn resource_count(&self) -> usize {
        self.state.available.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Error;

    #[test]
    fn test_allocate_status_of_result() {
        assert_eq!(
            AllocateStatus::of(&Ok(Grant::Granted)),
            AllocateStatus::Success
        );
        assert_eq!(
            AllocateStatus::of(&Ok(Grant::Waiting(WaitReason::UnsafeState))),
            AllocateStatus::Waiting
        );
        assert_eq!(
            AllocateStatus::of(&Err(Error::invalid_request("bad"))),
            AllocateStatus::Fail
        );
    }

    #[test]
    fn test_grant_serialization() {
        let json = serde_json::to_value(Grant::Waiting(WaitReason::ResourceUnavailable)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"grant": "waiting", "reason": "resource_unavailable"})
        );
        assert_eq!(
            serde_json::to_value(AllocateStatus::Success).unwrap(),
            serde_json::json!("success")
        );
    }
}
