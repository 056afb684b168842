//! Job domain types
//!
//! A job is a remote, asynchronous simulation or optimization run identified
//! by an opaque server-issued id. The client observes its status; it never
//! drives transitions.

use serde::{Deserialize, Serialize};

use crate::optimization::OptimizationReport;
use crate::simulation::SimulationReport;

/// Kind of remote job a handle refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobKind {
    Simulation,
    Optimization,
}

impl JobKind {
    /// Human-readable label used in messages and logs.
    pub fn label(&self) -> &'static str {
        match self {
            JobKind::Simulation => "simulation",
            JobKind::Optimization => "optimization",
        }
    }
}

/// Identity of one remote job.
///
/// Created from a `createSimulation` / `createOptimization` mutation response
/// and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobHandle {
    /// Opaque server-issued job id.
    pub id: String,
    pub kind: JobKind,
}

impl JobHandle {
    pub fn new(id: impl Into<String>, kind: JobKind) -> Self {
        Self {
            id: id.into(),
            kind,
        }
    }
}

/// Remote job status as reported by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Queued,
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl JobStatus {
    /// Parse a wire label into a status.
    ///
    /// Returns `None` for labels outside the known set. Callers must treat
    /// that as a protocol error rather than mapping it to a non-terminal
    /// state, otherwise a server-side contract change turns into an
    /// infinite polling loop.
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "QUEUED" => Some(JobStatus::Queued),
            "RUNNING" => Some(JobStatus::Running),
            "COMPLETED" => Some(JobStatus::Completed),
            "FAILED" => Some(JobStatus::Failed),
            "CANCELLED" => Some(JobStatus::Cancelled),
            _ => None,
        }
    }

    /// True once no further transitions can occur.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Completed | JobStatus::Failed | JobStatus::Cancelled
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Queued => "QUEUED",
            JobStatus::Running => "RUNNING",
            JobStatus::Completed => "COMPLETED",
            JobStatus::Failed => "FAILED",
            JobStatus::Cancelled => "CANCELLED",
        }
    }
}

/// One status observation for a job.
#[derive(Debug, Clone)]
pub struct JobProgress {
    pub status: JobStatus,
    /// Completion percentage (0-100) when the server reports one.
    pub progress: Option<f64>,
    /// Server-reported reason when the job failed or was cancelled.
    pub failure_reason: Option<String>,
}

/// Final payload of a completed job.
///
/// The exact schema is owned by the remote service; beyond the artifact URL
/// and summary metrics the reports are carried through opaquely.
#[derive(Debug, Clone)]
pub enum JobOutcome {
    Simulation(SimulationReport),
    Optimization(OptimizationReport),
}

impl JobOutcome {
    /// URL of the primary downloadable artifact, if the server produced one.
    pub fn artifact_url(&self) -> Option<&str> {
        match self {
            JobOutcome::Simulation(report) => report.thermal_index_gcode_url.as_deref(),
            JobOutcome::Optimization(report) => {
                report.optimized_gcode_with_thermal_indexes_url.as_deref()
            }
        }
    }

    pub fn id(&self) -> &str {
        match self {
            JobOutcome::Simulation(report) => &report.id,
            JobOutcome::Optimization(report) => &report.id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_labels() {
        assert_eq!(JobStatus::parse("QUEUED"), Some(JobStatus::Queued));
        assert_eq!(JobStatus::parse("RUNNING"), Some(JobStatus::Running));
        assert_eq!(JobStatus::parse("COMPLETED"), Some(JobStatus::Completed));
        assert_eq!(JobStatus::parse("FAILED"), Some(JobStatus::Failed));
        assert_eq!(JobStatus::parse("CANCELLED"), Some(JobStatus::Cancelled));
    }

    #[test]
    fn parse_rejects_unknown_labels() {
        assert_eq!(JobStatus::parse("FINISHED"), None);
        assert_eq!(JobStatus::parse("running"), None);
        assert_eq!(JobStatus::parse(""), None);
    }

    #[test]
    fn terminal_states() {
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
        assert!(JobStatus::Cancelled.is_terminal());
        assert!(!JobStatus::Queued.is_terminal());
        assert!(!JobStatus::Running.is_terminal());
    }

    #[test]
    fn status_round_trips_through_labels() {
        for status in [
            JobStatus::Queued,
            JobStatus::Running,
            JobStatus::Completed,
            JobStatus::Failed,
            JobStatus::Cancelled,
        ] {
            assert_eq!(JobStatus::parse(status.as_str()), Some(status));
        }
    }
}
