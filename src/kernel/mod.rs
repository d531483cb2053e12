//! Kernel - the allocation arbiter.
//!
//! The Kernel owns the resource state and the wait queue and processes one
//! request or release at a time to completion:
//!
//! ```text
//! request → validate → apply → safety check → commit | undo (+ enqueue)
//! release → validate → release → drain queue head until it stops succeeding
//! ```
//!
//! Subsystems (state, safety, wait queue) are plain structs and functions
//! owned or called by the Kernel, not separate actors.

pub mod handle;
pub mod safety;
pub mod state;
pub mod types;
pub mod wait_queue;

pub use handle::KernelHandle;
pub use state::{ResourceState, StateSnapshot};
pub use types::{AllocateStatus, Grant, KernelSnapshot, ProcessPhase, ReleaseReport, WaitReason};
pub use wait_queue::{QueuedRequest, WaitQueue};

use crate::types::{Error, KernelConfig, ProcessId, Result, Units};

/// Banker's-algorithm arbiter over a fixed set of processes and resources.
#[derive(Debug)]
pub struct Kernel {
    state: ResourceState,
    queue: WaitQueue,
    config: KernelConfig,
}

impl Kernel {
    /// Build a kernel with zero allocation.
    ///
    /// Fails with [`Error::Configuration`] when `available` and `max` disagree
    /// on the number of resource classes.
    pub fn new(available: Vec<Units>, max: Vec<Vec<Units>>) -> Result<Self> {
        Self::with_config(available, max, KernelConfig::default())
    }

    pub fn with_config(
        available: Vec<Units>,
        max: Vec<Vec<Units>>,
        config: KernelConfig,
    ) -> Result<Self> {
        let state = ResourceState::new(available, max)?;
        tracing::debug!(
            "kernel_created: processes={}, resources={}",
            state.process_count(),
            state.resource_count()
        );
        Ok(Self {
            state,
            queue: WaitQueue::new(),
            config,
        })
    }

    // =========================================================================
    // Allocation
    // =========================================================================

    /// Request `request` units for `pid`. Deferred requests join the wait queue.
    pub fn allocate(&mut self, pid: ProcessId, request: &[Units]) -> Result<Grant> {
        self.try_allocate(pid, request, true)
    }

    /// [`allocate`](Self::allocate) collapsed into a three-way status.
    pub fn allocate_request(&mut self, pid: ProcessId, request: &[Units]) -> AllocateStatus {
        AllocateStatus::of(&self.allocate(pid, request))
    }

    fn try_allocate(&mut self, pid: ProcessId, request: &[Units], enqueue: bool) -> Result<Grant> {
        if let Err(e) = self.validate_request(pid, request) {
            tracing::warn!("request_rejected: {}, error={}", pid, e);
            return Err(e);
        }

        let grant = if exceeds(request, self.state.available()) {
            Grant::Waiting(WaitReason::ResourceUnavailable)
        } else {
            self.state.apply(pid, request);
            if safety::is_safe(&self.state) {
                Grant::Granted
            } else {
                self.state.undo(pid, request);
                Grant::Waiting(WaitReason::UnsafeState)
            }
        };

        match grant {
            Grant::Granted => {
                tracing::debug!("request_granted: {}, request={:?}", pid, request);
                self.verify()?;
            }
            Grant::Waiting(reason) => {
                tracing::debug!(
                    "request_deferred: {}, request={:?}, reason={:?}, enqueued={}",
                    pid,
                    request,
                    reason,
                    enqueue
                );
                if enqueue {
                    self.queue.enqueue(pid, request.to_vec());
                }
            }
        }
        Ok(grant)
    }

    fn validate_request(&self, pid: ProcessId, request: &[Units]) -> Result<()> {
        self.check_vector(pid, request).map_err(Error::invalid_request)?;

        let need = self.state.need_row(pid);
        if let Some(j) = request.iter().zip(need).position(|(&r, &n)| r > n) {
            return Err(Error::invalid_request(format!(
                "{} requested {} of resource {} but its remaining need is {}",
                pid, request[j], j, need[j]
            )));
        }
        Ok(())
    }

    // =========================================================================
    // Release
    // =========================================================================

    /// Release `release` units held by `pid` (everything when `None`), then
    /// drain the wait queue from its head.
    pub fn free(&mut self, pid: ProcessId, release: Option<&[Units]>) -> Result<ReleaseReport> {
        if let Err(e) = self.validate_release(pid, release) {
            tracing::warn!("release_rejected: {}, error={}", pid, e);
            return Err(e);
        }

        let released = self.state.release(pid, release);
        tracing::debug!("released: {}, units={:?}", pid, released);
        self.verify()?;

        let drained = self.drain()?;
        Ok(ReleaseReport { released, drained })
    }

    /// [`free`](Self::free) collapsed into success/failure.
    pub fn free_request(&mut self, pid: ProcessId, release: Option<&[Units]>) -> bool {
        self.free(pid, release).is_ok()
    }

    fn validate_release(&self, pid: ProcessId, release: Option<&[Units]>) -> Result<()> {
        let Some(release) = release else {
            return self.check_pid(pid).map_err(Error::invalid_release);
        };
        self.check_vector(pid, release).map_err(Error::invalid_release)?;

        let held = self.state.allocation_row(pid);
        if let Some(j) = release.iter().zip(held).position(|(&r, &h)| r > h) {
            return Err(Error::invalid_release(format!(
                "{} released {} of resource {} but holds {}",
                pid, release[j], j, held[j]
            )));
        }
        Ok(())
    }

    /// Re-attempt queued requests head first. Stops at the first head that is
    /// not granted; later entries are never tried ahead of it.
    fn drain(&mut self) -> Result<Vec<QueuedRequest>> {
        let mut drained = Vec::new();

        while let Some(head) = self.queue.peek().cloned() {
            match self.try_allocate(head.pid, &head.request, false) {
                Ok(Grant::Granted) => {
                    self.queue.dequeue();
                    tracing::debug!("queue_drained: {}, seq={}", head.pid, head.seq);
                    drained.push(head);
                }
                Ok(Grant::Waiting(_)) => break,
                Err(e) if !e.is_fatal() => {
                    tracing::warn!("queue_head_blocked: {}, seq={}, error={}", head.pid, head.seq, e);
                    break;
                }
                Err(e) => return Err(e),
            }
        }
        Ok(drained)
    }

    // =========================================================================
    // Validation helpers
    // =========================================================================

    fn check_pid(&self, pid: ProcessId) -> std::result::Result<(), String> {
        if pid.index() >= self.state.process_count() {
            return Err(format!(
                "{} out of range (process count {})",
                pid,
                self.state.process_count()
            ));
        }
        Ok(())
    }

    fn check_vector(&self, pid: ProcessId, vector: &[Units]) -> std::result::Result<(), String> {
        if vector.len() != self.state.resource_count() {
            return Err(format!(
                "vector has {} components, expected {}",
                vector.len(),
                self.state.resource_count()
            ));
        }
        self.check_pid(pid)?;
        if let Some(j) = vector.iter().position(|&v| v < 0) {
            return Err(format!("component {} is negative ({})", j, vector[j]));
        }
        Ok(())
    }

    fn verify(&self) -> Result<()> {
        if self.config.verify_invariants {
            self.state.check_invariants()?;
        }
        Ok(())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn state(&self) -> &ResourceState {
        &self.state
    }

    pub fn wait_queue(&self) -> &WaitQueue {
        &self.queue
    }

    pub fn process_count(&self) -> usize {
        self.state.process_count()
    }

    pub fn resource_count(&self) -> usize {
        self.state.resource_count()
    }

    pub fn is_safe(&self) -> bool {
        safety::is_safe(&self.state)
    }

    /// Completion order certifying the current state, if one exists.
    pub fn safe_sequence(&self) -> Option<Vec<ProcessId>> {
        safety::safe_sequence(
            self.state.available(),
            self.state.allocation(),
            self.state.need(),
        )
        .map(|order| order.into_iter().map(ProcessId::new).collect())
    }

    /// Where `pid` sits in the request state machine.
    pub fn process_phase(&self, pid: ProcessId) -> Result<ProcessPhase> {
        self.check_pid(pid).map_err(Error::invalid_request)?;
        if self.queue.contains_process(pid) {
            return Ok(ProcessPhase::Waiting);
        }
        if self.state.allocation_row(pid).iter().any(|&a| a > 0) {
            return Ok(ProcessPhase::Granted);
        }
        Ok(ProcessPhase::Unrequested)
    }

    pub fn snapshot(&self) -> KernelSnapshot {
        KernelSnapshot {
            state: self.state.snapshot(),
            waiting: self.queue.iter().cloned().collect(),
        }
    }
}

/// True when any component of `request` exceeds `available`.
fn exceeds(request: &[Units], available: &[Units]) -> bool {
    request.iter().zip(available).any(|(&r, &a)| r > a)
}
