//! FIFO of deferred allocation requests.
//!
//! No priority, timeout or cancellation: entries leave only through
//! `dequeue` during drainage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::types::{ProcessId, Units};

/// A request parked until a release makes it grantable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueuedRequest {
    pub pid: ProcessId,
    pub request: Vec<Units>,
    /// Arrival number, increasing across the queue's lifetime.
    pub seq: u64,
    pub enqueued_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct WaitQueue {
    entries: VecDeque<QueuedRequest>,
    next_seq: u64,
}

impl WaitQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a request at the tail. Returns its arrival number.
    pub fn enqueue(&mut self, pid: ProcessId, request: Vec<Units>) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push_back(QueuedRequest {
            pid,
            request,
            seq,
            enqueued_at: Utc::now(),
        });
        seq
    }

    pub fn peek(&self) -> Option<&QueuedRequest> {
        self.entries.front()
    }

    pub fn dequeue(&mut self) -> Option<QueuedRequest> {
        self.entries.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Entries in arrival order, head first.
    pub fn iter(&self) -> impl Iterator<Item = &QueuedRequest> {
        self.entries.iter()
    }

    pub fn contains_process(&self, pid: ProcessId) -> bool {
        self.entries.iter().any(|entry| entry.pid == pid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let mut queue = WaitQueue::new();
        assert!(queue.is_empty());
        assert!(queue.peek().is_none());

        queue.enqueue(ProcessId::new(2), vec![3]);
        queue.enqueue(ProcessId::new(0), vec![1]);
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.peek().unwrap().pid, ProcessId::new(2));

        let first = queue.dequeue().unwrap();
        assert_eq!(first.pid, ProcessId::new(2));
        assert_eq!(first.request, vec![3]);
        assert_eq!(first.seq, 0);

        let second = queue.dequeue().unwrap();
        assert_eq!(second.seq, 1);
        assert!(queue.dequeue().is_none());
    }

    #[test]
    fn test_sequence_numbers_keep_increasing() {
        let mut queue = WaitQueue::new();
        queue.enqueue(ProcessId::new(0), vec![1]);
        queue.dequeue();
        assert_eq!(queue.enqueue(ProcessId::new(1), vec![1]), 1);
    }

    #[test]
    fn test_iter_and_contains() {
        let mut queue = WaitQueue::new();
        queue.enqueue(ProcessId::new(4), vec![1, 0]);
        queue.enqueue(ProcessId::new(1), vec![0, 1]);

        let pids: Vec<_> = queue.iter().map(|e| e.pid.index()).collect();
        assert_eq!(pids, vec![4, 1]);
        assert!(queue.contains_process(ProcessId::new(1)));
        assert!(!queue.contains_process(ProcessId::new(0)));
    }
}
