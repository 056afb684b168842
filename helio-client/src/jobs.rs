//! Job status and result retrieval
//!
//! [`JobApi`] is the seam between the polling loop and the wire: one status
//! observation plus one result fetch per handle. [`HelioClient`] implements
//! it over the slim status queries; tests implement it with scripted
//! sequences.

use async_trait::async_trait;
use serde_json::{Value, json};

use helio_core::job::{JobHandle, JobKind, JobOutcome, JobProgress, JobStatus};

use crate::error::{ClientError, Result};
use crate::{HelioClient, Operation, queries};

/// Status observation and result retrieval for remote jobs.
#[async_trait]
pub trait JobApi {
    /// Observe the job's current status. Exactly one network call.
    async fn status(&self, handle: &JobHandle) -> Result<JobProgress>;

    /// Fetch the final result payload. Called once, after a COMPLETED
    /// status has been observed.
    async fn result(&self, handle: &JobHandle) -> Result<JobOutcome>;
}

#[async_trait]
impl JobApi for HelioClient {
    async fn status(&self, handle: &JobHandle) -> Result<JobProgress> {
        let (document, field) = match handle.kind {
            JobKind::Simulation => (queries::QUERY_SIMULATION_STATUS, "simulation"),
            JobKind::Optimization => (queries::QUERY_OPTIMIZATION_STATUS, "optimization"),
        };
        let operation = Operation::new(document).variable("id", json!(handle.id));
        let data = self
            .execute_for_data(&format!("{} status query", handle.kind.label()), operation)
            .await?;

        let object = field_object(&data, field, &handle.id)?;
        decode_progress(handle, object)
    }

    async fn result(&self, handle: &JobHandle) -> Result<JobOutcome> {
        let (document, field) = match handle.kind {
            JobKind::Simulation => (queries::QUERY_SIMULATION_RESULT, "simulation"),
            JobKind::Optimization => (queries::QUERY_OPTIMIZATION_RESULT, "optimization"),
        };
        let operation = Operation::new(document).variable("id", json!(handle.id));
        let data = self
            .execute_for_data(&format!("{} result query", handle.kind.label()), operation)
            .await?;
        let object = field_object(&data, field, &handle.id)?;

        match handle.kind {
            JobKind::Simulation => serde_json::from_value(object.clone())
                .map(JobOutcome::Simulation)
                .map_err(|e| {
                    ClientError::protocol(format!("malformed simulation result: {e}"), None)
                }),
            JobKind::Optimization => serde_json::from_value(object.clone())
                .map(JobOutcome::Optimization)
                .map_err(|e| {
                    ClientError::protocol(format!("malformed optimization result: {e}"), None)
                }),
        }
    }
}

/// Decode one status observation, rejecting labels outside the documented
/// set. An unrecognized label is a protocol error, never a silent RUNNING;
/// coercing it would poll forever after a server-side contract change.
fn decode_progress(handle: &JobHandle, object: &Value) -> Result<JobProgress> {
    let label = object.get("status").and_then(Value::as_str).ok_or_else(|| {
        ClientError::protocol(
            format!(
                "{} {} reported no status field",
                handle.kind.label(),
                handle.id
            ),
            None,
        )
    })?;
    let status = JobStatus::parse(label).ok_or_else(|| {
        ClientError::protocol(
            format!(
                "{} {} reported unrecognized status {label:?}",
                handle.kind.label(),
                handle.id
            ),
            None,
        )
    })?;

    Ok(JobProgress {
        status,
        progress: object.get("progress").and_then(Value::as_f64),
        failure_reason: object
            .get("failureReason")
            .and_then(Value::as_str)
            .map(str::to_string),
    })
}

/// Extract a non-null top-level field from the response data.
fn field_object<'a>(data: &'a Value, field: &str, id: &str) -> Result<&'a Value> {
    match data.get(field) {
        Some(Value::Null) | None => Err(ClientError::protocol(
            format!("response carried no {field} object for id {id}"),
            None,
        )),
        Some(object) => Ok(object),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sim_handle() -> JobHandle {
        JobHandle::new("s1", JobKind::Simulation)
    }

    #[test]
    fn decode_progress_reads_status_and_progress() {
        let object = json!({"status": "RUNNING", "progress": 42.5});
        let observed = decode_progress(&sim_handle(), &object).unwrap();
        assert_eq!(observed.status, JobStatus::Running);
        assert_eq!(observed.progress, Some(42.5));
        assert!(observed.failure_reason.is_none());
    }

    #[test]
    fn decode_progress_carries_failure_reason() {
        let object = json!({"status": "FAILED", "failureReason": "out of quota"});
        let observed = decode_progress(&sim_handle(), &object).unwrap();
        assert_eq!(observed.status, JobStatus::Failed);
        assert_eq!(observed.failure_reason.as_deref(), Some("out of quota"));
    }

    #[test]
    fn decode_progress_rejects_unknown_label() {
        let object = json!({"status": "ARCHIVED"});
        let err = decode_progress(&sim_handle(), &object).unwrap_err();
        match err {
            ClientError::Protocol { message, .. } => assert!(message.contains("ARCHIVED")),
            other => panic!("expected Protocol, got {other:?}"),
        }
    }

    #[test]
    fn decode_progress_rejects_missing_status() {
        let object = json!({"progress": 10.0});
        let err = decode_progress(&sim_handle(), &object).unwrap_err();
        assert!(matches!(err, ClientError::Protocol { .. }));
    }

    #[test]
    fn field_object_rejects_null_and_missing() {
        let data = json!({"simulation": null});
        assert!(field_object(&data, "simulation", "s1").is_err());
        assert!(field_object(&data, "optimization", "o1").is_err());

        let data = json!({"simulation": {"id": "s1"}});
        assert!(field_object(&data, "simulation", "s1").is_ok());
    }
}
