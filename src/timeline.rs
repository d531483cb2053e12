//! Scenario files: initial resources, max demands and a timeline of events.
//!
//! ```text
//! 3 3 2          ← available units per resource class
//!                ← blank
//! 7 5 3          ← one max-demand row per process
//! 3 2 2
//!                ← blank
//! + 1 1 0 2      ← request: any type token other than "-", pid, vector
//! - 1            ← release everything held by pid 1
//! - 1 1 0 0      ← release exactly (1,0,0)
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

use crate::kernel::{AllocateStatus, Grant, Kernel, KernelSnapshot, QueuedRequest, WaitReason};
use crate::types::{Error, KernelConfig, ProcessId, Result, Units};

/// Type token marking a release line.
pub const RELEASE_TOKEN: &str = "-";

/// One timeline entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Event {
    Request {
        pid: ProcessId,
        request: Vec<Units>,
    },
    Release {
        pid: ProcessId,
        /// `None` releases the whole allocation.
        release: Option<Vec<Units>>,
    },
}

impl Event {
    pub fn pid(&self) -> ProcessId {
        match self {
            Event::Request { pid, .. } | Event::Release { pid, .. } => *pid,
        }
    }
}

/// Parsed scenario file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub available: Vec<Units>,
    pub max: Vec<Vec<Units>>,
    pub events: Vec<Event>,
}

/// What happened when one event was applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepOutcome {
    Request {
        status: AllocateStatus,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<WaitReason>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    Release {
        ok: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        released: Option<Vec<Units>>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        drained: Vec<QueuedRequest>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
}

/// Event, its outcome and the state right after it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepReport {
    /// Zero-based position in the timeline.
    pub index: usize,
    pub event: Event,
    pub outcome: StepOutcome,
    pub snapshot: KernelSnapshot,
}

impl Scenario {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        std::fs::read_to_string(path)?.parse()
    }

    pub fn build_kernel(&self, config: KernelConfig) -> Result<Kernel> {
        Kernel::with_config(self.available.clone(), self.max.clone(), config)
    }

    /// Apply every event in order, calling `on_step` after each one.
    ///
    /// Rejected requests and releases are recorded in the step outcome and
    /// the run continues; only fatal kernel errors stop it.
    pub fn run(
        &self,
        kernel: &mut Kernel,
        mut on_step: impl FnMut(&StepReport),
    ) -> Result<Vec<StepReport>> {
        let mut reports = Vec::with_capacity(self.events.len());

        for (index, event) in self.events.iter().enumerate() {
            let outcome = apply_event(kernel, event)?;
            tracing::debug!("event_applied: index={}, {}", index, event.pid());
            let report = StepReport {
                index,
                event: event.clone(),
                outcome,
                snapshot: kernel.snapshot(),
            };
            on_step(&report);
            reports.push(report);
        }

        tracing::info!(
            "scenario_finished: events={}, waiting={}",
            reports.len(),
            kernel.wait_queue().len()
        );
        Ok(reports)
    }
}

fn apply_event(kernel: &mut Kernel, event: &Event) -> Result<StepOutcome> {
    match event {
        Event::Request { pid, request } => {
            let result = kernel.allocate(*pid, request);
            let status = AllocateStatus::of(&result);
            match result {
                Ok(grant) => Ok(StepOutcome::Request {
                    status,
                    reason: match grant {
                        Grant::Waiting(reason) => Some(reason),
                        Grant::Granted => None,
                    },
                    error: None,
                }),
                Err(e) if !e.is_fatal() => Ok(StepOutcome::Request {
                    status,
                    reason: None,
                    error: Some(e.to_string()),
                }),
                Err(e) => Err(e),
            }
        }
        Event::Release { pid, release } => match kernel.free(*pid, release.as_deref()) {
            Ok(report) => Ok(StepOutcome::Release {
                ok: true,
                released: Some(report.released),
                drained: report.drained,
                error: None,
            }),
            Err(e) if !e.is_fatal() => Ok(StepOutcome::Release {
                ok: false,
                released: None,
                drained: Vec::new(),
                error: Some(e.to_string()),
            }),
            Err(e) => Err(e),
        },
    }
}

impl FromStr for Scenario {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self> {
        // (1-based line number, trimmed content)
        let mut lines = input
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line.trim()));

        let (first, header) = lines
            .next()
            .ok_or_else(|| Error::parse(1, "missing available resource line"))?;
        if header.is_empty() {
            return Err(Error::parse(first, "available resource line is empty"));
        }
        let available = parse_units(first, header.split_whitespace())?;

        match lines.next() {
            Some((_, "")) => {}
            Some((line, _)) => {
                return Err(Error::parse(
                    line,
                    "expected a blank line after the available resources",
                ))
            }
            None => return Err(Error::parse(first + 1, "missing max-demand matrix")),
        }

        let mut max = Vec::new();
        for (line, content) in lines.by_ref() {
            if content.is_empty() {
                break;
            }
            max.push(parse_units(line, content.split_whitespace())?);
        }

        let mut events = Vec::new();
        for (line, content) in lines {
            if content.is_empty() {
                continue;
            }
            events.push(parse_event(line, content)?);
        }

        Ok(Scenario {
            available,
            max,
            events,
        })
    }
}

fn parse_event(line: usize, content: &str) -> Result<Event> {
    let mut tokens = content.split_whitespace();
    let kind = tokens
        .next()
        .ok_or_else(|| Error::parse(line, "empty event"))?;
    let pid_token = tokens
        .next()
        .ok_or_else(|| Error::parse(line, "event is missing a process id"))?;
    let pid = pid_token.parse::<usize>().map_err(|_| {
        Error::parse(
            line,
            format!("expected a process id, found `{}`", pid_token),
        )
    })?;
    let pid = ProcessId::new(pid);
    let vector = parse_units(line, tokens)?;

    if kind == RELEASE_TOKEN {
        let release = (!vector.is_empty()).then_some(vector);
        return Ok(Event::Release { pid, release });
    }
    if vector.is_empty() {
        return Err(Error::parse(line, "request requires a resource vector"));
    }
    Ok(Event::Request {
        pid,
        request: vector,
    })
}

fn parse_units<'a>(line: usize, tokens: impl Iterator<Item = &'a str>) -> Result<Vec<Units>> {
    tokens
        .map(|token| {
            token.parse::<Units>().map_err(|_| {
                Error::parse(line, format!("expected an integer, found `{}`", token))
            })
        })
        .collect()
}
