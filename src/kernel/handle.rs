//! Shared kernel handle for concurrent callers.
//!
//! One mutex guards the whole kernel, so validate → apply → check →
//! commit/undo → drain runs as a single critical section and no caller sees a
//! tentative allocation.

use std::sync::Arc;
use tokio::sync::Mutex;

use super::{Grant, Kernel, KernelSnapshot, ReleaseReport};
use crate::types::{ProcessId, Result, Units};

/// Cloneable handle; every clone talks to the same kernel.
#[derive(Debug, Clone)]
pub struct KernelHandle {
    kernel: Arc<Mutex<Kernel>>,
}

impl KernelHandle {
    pub fn new(kernel: Kernel) -> Self {
        Self {
            kernel: Arc::new(Mutex::new(kernel)),
        }
    }

    pub async fn allocate(&self, pid: ProcessId, request: Vec<Units>) -> Result<Grant> {
        self.kernel.lock().await.allocate(pid, &request)
    }

    pub async fn free(&self, pid: ProcessId, release: Option<Vec<Units>>) -> Result<ReleaseReport> {
        self.kernel.lock().await.free(pid, release.as_deref())
    }

    pub async fn snapshot(&self) -> KernelSnapshot {
        self.kernel.lock().await.snapshot()
    }

    /// Run `f` with exclusive access to the kernel.
    pub async fn with_kernel<T>(&self, f: impl FnOnce(&mut Kernel) -> T) -> T {
        let mut kernel = self.kernel.lock().await;
        f(&mut kernel)
    }
}
