//! Resource state: available vector plus max/allocation/need matrices.
//!
//! Owned by the Kernel. Mutators perform no validation; the Kernel validates
//! every delta before calling them.

use serde::{Deserialize, Serialize};

use crate::types::{Error, ProcessId, Result, Units};

/// Allocation matrices for P processes over R resource classes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceState {
    available: Vec<Units>,
    max: Vec<Vec<Units>>,
    allocation: Vec<Vec<Units>>,
    need: Vec<Vec<Units>>,
    /// Per-class unit count fixed at construction (conservation target).
    total: Vec<Units>,
}

/// Owned read-only copy of a [`ResourceState`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub available: Vec<Units>,
    pub max: Vec<Vec<Units>>,
    pub allocation: Vec<Vec<Units>>,
    pub need: Vec<Vec<Units>>,
    pub total: Vec<Units>,
}

impl ResourceState {
    /// Create state with zero allocation and `need == max`.
    pub fn new(available: Vec<Units>, max: Vec<Vec<Units>>) -> Result<Self> {
        let resources = available.len();

        for (pid, row) in max.iter().enumerate() {
            if row.len() != resources {
                return Err(Error::configuration(format!(
                    "inconsistent number of resources: available has {} classes, max row {} has {}",
                    resources,
                    pid,
                    row.len()
                )));
            }
            if let Some(j) = row.iter().position(|&v| v < 0) {
                return Err(Error::configuration(format!(
                    "max demand of process {} for resource {} is negative",
                    pid, j
                )));
            }
        }
        if let Some(j) = available.iter().position(|&v| v < 0) {
            return Err(Error::configuration(format!(
                "available count for resource {} is negative",
                j
            )));
        }

        Ok(Self {
            total: available.clone(),
            allocation: vec![vec![0; resources]; max.len()],
            need: max.clone(),
            available,
            max,
        })
    }

    pub fn process_count(&self) -> usize {
        self.max.len()
    }

    pub fn resource_count(&self) -> usize {
        self.available.len()
    }

    pub fn available(&self) -> &[Units] {
        &self.available
    }

    pub fn total(&self) -> &[Units] {
        &self.total
    }

    pub fn max(&self) -> &[Vec<Units>] {
        &self.max
    }

    pub fn allocation(&self) -> &[Vec<Units>] {
        &self.allocation
    }

    pub fn need(&self) -> &[Vec<Units>] {
        &self.need
    }

    pub fn max_row(&self, pid: ProcessId) -> &[Units] {
        &self.max[pid.index()]
    }

    pub fn allocation_row(&self, pid: ProcessId) -> &[Units] {
        &self.allocation[pid.index()]
    }

    pub fn need_row(&self, pid: ProcessId) -> &[Units] {
        &self.need[pid.index()]
    }

    /// Move `delta` units from `available` to the process.
    pub fn apply(&mut self, pid: ProcessId, delta: &[Units]) {
        let i = pid.index();
        for (j, &d) in delta.iter().enumerate() {
            self.available[j] -= d;
            self.allocation[i][j] += d;
            self.need[i][j] -= d;
        }
    }

    /// Exact inverse of [`apply`](Self::apply).
    pub fn undo(&mut self, pid: ProcessId, delta: &[Units]) {
        let i = pid.index();
        for (j, &d) in delta.iter().enumerate() {
            self.available[j] += d;
            self.allocation[i][j] -= d;
            self.need[i][j] += d;
        }
    }

    /// Return units to `available`: exactly `delta`, or the whole allocation
    /// row when `None`. Returns the vector actually released.
    pub fn release(&mut self, pid: ProcessId, delta: Option<&[Units]>) -> Vec<Units> {
        let i = pid.index();
        match delta {
            Some(delta) => {
                self.undo(pid, delta);
                delta.to_vec()
            }
            None => {
                let released = std::mem::replace(
                    &mut self.allocation[i],
                    vec![0; self.available.len()],
                );
                for (avail, &r) in self.available.iter_mut().zip(&released) {
                    *avail += r;
                }
                self.need[i].clone_from(&self.max[i]);
                released
            }
        }
    }

    /// Verify bounds, the need identity and conservation of units.
    pub fn check_invariants(&self) -> Result<()> {
        for j in 0..self.resource_count() {
            if self.available[j] < 0 {
                return Err(Error::internal(format!(
                    "available[{}] is negative ({})",
                    j, self.available[j]
                )));
            }
            let held: Units = self.allocation.iter().map(|row| row[j]).sum();
            if self.available[j] + held != self.total[j] {
                return Err(Error::internal(format!(
                    "resource {} not conserved: available {} + allocated {} != total {}",
                    j, self.available[j], held, self.total[j]
                )));
            }
        }

        for i in 0..self.process_count() {
            for j in 0..self.resource_count() {
                let (max, alloc, need) = (self.max[i][j], self.allocation[i][j], self.need[i][j]);
                if alloc < 0 || alloc > max {
                    return Err(Error::internal(format!(
                        "allocation[{}][{}] = {} outside [0, {}]",
                        i, j, alloc, max
                    )));
                }
                if need != max - alloc {
                    return Err(Error::internal(format!(
                        "need[{}][{}] = {} but max - allocation = {}",
                        i,
                        j,
                        need,
                        max - alloc
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            available: self.available.clone(),
            max: self.max.clone(),
            allocation: self.allocation.clone(),
            need: self.need.clone(),
            total: self.total.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(i: usize) -> ProcessId {
        ProcessId::new(i)
    }

    fn two_by_two() -> ResourceState {
        ResourceState::new(vec![4, 2], vec![vec![3, 1], vec![2, 2]]).unwrap()
    }

    #[test]
    fn test_new_starts_with_need_equal_to_max() {
        let state = two_by_two();
        assert_eq!(state.process_count(), 2);
        assert_eq!(state.resource_count(), 2);
        assert_eq!(state.need(), state.max());
        assert_eq!(state.allocation(), &[vec![0, 0], vec![0, 0]]);
        assert_eq!(state.total(), &[4, 2]);
        state.check_invariants().unwrap();
    }

    #[test]
    fn test_new_rejects_column_mismatch() {
        let err = ResourceState::new(vec![1, 2, 3], vec![vec![1, 1]]).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_new_rejects_ragged_rows() {
        let err = ResourceState::new(vec![1, 2], vec![vec![1, 1], vec![1]]).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_new_rejects_negative_inputs() {
        assert!(matches!(
            ResourceState::new(vec![1, -2], vec![vec![1, 1]]),
            Err(Error::Configuration(_))
        ));
        assert!(matches!(
            ResourceState::new(vec![1, 2], vec![vec![1, -1]]),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn test_apply_then_undo_is_identity() {
        let mut state = two_by_two();
        let before = state.clone();

        state.apply(pid(0), &[2, 1]);
        assert_eq!(state.available(), &[2, 1]);
        assert_eq!(state.allocation_row(pid(0)), &[2, 1]);
        assert_eq!(state.need_row(pid(0)), &[1, 0]);
        state.check_invariants().unwrap();

        state.undo(pid(0), &[2, 1]);
        assert_eq!(state, before);
    }

    #[test]
    fn test_partial_release_returns_exact_vector() {
        let mut state = two_by_two();
        state.apply(pid(1), &[2, 2]);

        let released = state.release(pid(1), Some(&[1, 0]));
        assert_eq!(released, vec![1, 0]);
        assert_eq!(state.available(), &[3, 0]);
        assert_eq!(state.allocation_row(pid(1)), &[1, 2]);
        assert_eq!(state.need_row(pid(1)), &[1, 0]);
        state.check_invariants().unwrap();
    }

    #[test]
    fn test_full_release_restores_need_to_max() {
        let mut state = two_by_two();
        state.apply(pid(0), &[1, 1]);

        let released = state.release(pid(0), None);
        assert_eq!(released, vec![1, 1]);
        assert_eq!(state.available(), &[4, 2]);
        assert_eq!(state.need_row(pid(0)), state.max_row(pid(0)));

        // Second full release is a no-op
        let before = state.clone();
        assert_eq!(state.release(pid(0), None), vec![0, 0]);
        assert_eq!(state, before);
    }

    #[test]
    fn test_check_invariants_reports_conservation_break() {
        let mut state = two_by_two();
        // Bypass the mutators to simulate corruption
        state.available[0] = 1;
        let err = state.check_invariants().unwrap_err();
        assert!(matches!(err, Error::Internal(msg) if msg.contains("not conserved")));
    }

    #[test]
    fn test_snapshot_is_detached_copy() {
        let mut state = two_by_two();
        let snap = state.snapshot();
        state.apply(pid(0), &[1, 0]);
        assert_eq!(snap.available, vec![4, 2]);
        assert_eq!(snap.total, vec![4, 2]);
        assert_ne!(snap, state.snapshot());
    }
}
