//! Human-readable status output.
//!
//! Renderers only ever see [`KernelSnapshot`]s and timeline reports, so
//! printing cannot touch kernel state.

use std::fmt;

use crate::kernel::{AllocateStatus, KernelSnapshot, WaitReason};
use crate::timeline::{Event, StepOutcome, StepReport};
use crate::types::Units;

/// Matrix table, available vector and wait queue.
///
/// ```text
///           | MaxDemand      |  Allocation     |  Need
/// pid: 0    | 7    5    3    |  0    1    0    |  7    4    3
/// Available Resource:
/// 3  3  2
/// Waiting Queue:
/// (PID 4: 3, 3, 0, )
/// ```
#[derive(Debug, Clone, Copy)]
pub struct StatusTable<'a> {
    snapshot: &'a KernelSnapshot,
    column_width: usize,
}

impl<'a> StatusTable<'a> {
    pub fn new(snapshot: &'a KernelSnapshot, column_width: usize) -> Self {
        Self {
            snapshot,
            column_width,
        }
    }
}

impl fmt::Display for StatusTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let w = self.column_width;
        let block = w * self.snapshot.resource_count();
        let state = &self.snapshot.state;

        write!(f, "          | ")?;
        write!(f, "{:<block$}", "MaxDemand")?;
        write!(f, "|  ")?;
        write!(f, "{:<block$}", "Allocation")?;
        write!(f, "|  ")?;
        writeln!(f, "{:<block$}", "Need")?;

        for i in 0..self.snapshot.process_count() {
            write!(f, "pid: {:<5}| ", i)?;
            write_row(f, &state.max[i], w)?;
            write!(f, "|  ")?;
            write_row(f, &state.allocation[i], w)?;
            write!(f, "|  ")?;
            write_row(f, &state.need[i], w)?;
            writeln!(f)?;
        }

        writeln!(f, "Available Resource: ")?;
        for v in &state.available {
            write!(f, "{}  ", v)?;
        }
        writeln!(f)?;

        writeln!(f, "Waiting Queue: ")?;
        for (k, entry) in self.snapshot.waiting.iter().enumerate() {
            if k > 0 {
                write!(f, "   <---   ")?;
            }
            write!(f, "(PID {}: ", entry.pid.index())?;
            write_list(f, &entry.request)?;
            write!(f, ")")?;
        }
        writeln!(f)?;
        writeln!(f)
    }
}

fn write_row(f: &mut fmt::Formatter<'_>, row: &[Units], width: usize) -> fmt::Result {
    for v in row {
        write!(f, "{:<width$}", v)?;
    }
    Ok(())
}

fn write_list(f: &mut fmt::Formatter<'_>, values: &[Units]) -> fmt::Result {
    for v in values {
        write!(f, "{}, ", v)?;
    }
    Ok(())
}

/// Echo of a timeline event, e.g. `Request pid: 1; Allocate: 1, 0, 2, `.
#[derive(Debug, Clone, Copy)]
pub struct EventLine<'a>(pub &'a Event);

impl fmt::Display for EventLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Event::Request { pid, request } => {
                write!(f, "Request pid: {}; Allocate: ", pid.index())?;
                write_list(f, request)
            }
            Event::Release { pid, release } => {
                write!(f, "Request pid: {}; Free: ", pid.index())?;
                match release {
                    Some(release) => write_list(f, release),
                    None => write!(f, "all."),
                }
            }
        }
    }
}

/// One-line summary of a step outcome.
#[derive(Debug, Clone, Copy)]
pub struct OutcomeLine<'a>(pub &'a StepOutcome);

impl fmt::Display for OutcomeLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            StepOutcome::Request {
                status,
                reason,
                error,
            } => {
                let label = match status {
                    AllocateStatus::Success => "Success",
                    AllocateStatus::Waiting => "Waiting",
                    AllocateStatus::Fail => "Fail",
                };
                write!(f, "=> {}", label)?;
                if let Some(reason) = reason {
                    let reason = match reason {
                        WaitReason::ResourceUnavailable => "resources unavailable",
                        WaitReason::UnsafeState => "unsafe state",
                    };
                    write!(f, " ({})", reason)?;
                }
                if let Some(error) = error {
                    write!(f, ": {}", error)?;
                }
                Ok(())
            }
            StepOutcome::Release {
                ok,
                drained,
                error,
                ..
            } => {
                write!(f, "=> {}", if *ok { "Released" } else { "Fail" })?;
                if let Some(error) = error {
                    write!(f, ": {}", error)?;
                }
                for entry in drained {
                    write!(f, "; granted PID {} from queue", entry.pid.index())?;
                }
                Ok(())
            }
        }
    }
}

/// Event echo, outcome and table for one step.
pub fn render_step(report: &StepReport, column_width: usize) -> String {
    format!(
        "{}\n{}\n{}",
        EventLine(&report.event),
        OutcomeLine(&report.outcome),
        StatusTable::new(&report.snapshot, column_width)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::Kernel;
    use crate::types::ProcessId;
    use pretty_assertions::assert_eq;

    fn sample() -> KernelSnapshot {
        let mut kernel = Kernel::new(vec![3, 2], vec![vec![2, 1], vec![3, 2]]).unwrap();
        kernel.allocate(ProcessId::new(0), &[1, 1]).unwrap();
        kernel.allocate(ProcessId::new(1), &[3, 0]).unwrap();
        kernel.snapshot()
    }

    #[test]
    fn test_status_table_layout() {
        let rendered = StatusTable::new(&sample(), 5).to_string();
        let expected = concat!(
            "          | MaxDemand |  Allocation|  Need      \n",
            "pid: 0    | 2    1    |  1    1    |  1    0    \n",
            "pid: 1    | 3    2    |  0    0    |  3    2    \n",
            "Available Resource: \n",
            "2  1  \n",
            "Waiting Queue: \n",
            "(PID 1: 3, 0, )\n",
            "\n",
        );
        assert_eq!(rendered, expected);
    }

    #[test]
    fn test_waiting_queue_is_joined_with_arrows() {
        let mut kernel = Kernel::new(vec![1], vec![vec![1], vec![1], vec![1]]).unwrap();
        kernel.allocate(ProcessId::new(0), &[1]).unwrap();
        kernel.allocate(ProcessId::new(1), &[1]).unwrap();
        kernel.allocate(ProcessId::new(2), &[1]).unwrap();

        let rendered = StatusTable::new(&kernel.snapshot(), 5).to_string();
        assert!(rendered.contains("(PID 1: 1, )   <---   (PID 2: 1, )\n"));
    }

    #[test]
    fn test_event_lines() {
        let request = Event::Request {
            pid: ProcessId::new(1),
            request: vec![1, 0, 2],
        };
        assert_eq!(
            EventLine(&request).to_string(),
            "Request pid: 1; Allocate: 1, 0, 2, "
        );

        let release_all = Event::Release {
            pid: ProcessId::new(3),
            release: None,
        };
        assert_eq!(EventLine(&release_all).to_string(), "Request pid: 3; Free: all.");
    }

    #[test]
    fn test_outcome_lines() {
        let waiting = StepOutcome::Request {
            status: AllocateStatus::Waiting,
            reason: Some(WaitReason::UnsafeState),
            error: None,
        };
        assert_eq!(OutcomeLine(&waiting).to_string(), "=> Waiting (unsafe state)");

        let failed = StepOutcome::Release {
            ok: false,
            released: None,
            drained: Vec::new(),
            error: Some("invalid release: too much".to_string()),
        };
        assert_eq!(
            OutcomeLine(&failed).to_string(),
            "=> Fail: invalid release: too much"
        );
    }
}
