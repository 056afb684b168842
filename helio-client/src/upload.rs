//! G-code upload and registration
//!
//! Three-step workflow against the storage layer and the API:
//! 1. request a presigned upload URL,
//! 2. PUT the raw file bytes to it,
//! 3. register the object with `createGcodeV2` and wait until the server
//!    finishes processing it (status READY).
//!
//! The storage mechanics behind the presigned URL are opaque; the client
//! only uploads bytes to the URL it was handed.

use std::path::Path;

use serde::Deserialize;
use serde_json::{Value, json};
use tokio::time::{Duration, Instant, sleep};
use tracing::{debug, info, warn};

use crate::error::{ClientError, Result};
use crate::{HelioClient, Operation, queries};

/// File name sent with presigned-URL requests; the server derives the
/// stored object key itself.
const UPLOAD_FILE_NAME: &str = "test.gcode";

const GCODE_POLL_INTERVAL: Duration = Duration::from_secs(2);
const GCODE_MAX_WAIT: Duration = Duration::from_secs(120);

/// Statuses that end processing without a usable G-code.
const GCODE_FAILURE_STATUSES: [&str; 2] = ["ERROR", "RESTRICTED"];

#[derive(Debug, PartialEq)]
enum GcodeState {
    Ready,
    Failed,
    Processing,
}

/// Classify an observed gcode status label. The lifecycle has undocumented
/// intermediate labels, so anything not explicitly terminal keeps polling.
fn classify_gcode_status(status: &str) -> GcodeState {
    if status == "READY" {
        GcodeState::Ready
    } else if GCODE_FAILURE_STATUSES.contains(&status) {
        GcodeState::Failed
    } else {
        GcodeState::Processing
    }
}

/// A time-limited, pre-authorized upload target.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresignedUpload {
    /// Object key to register via `createGcodeV2`.
    pub key: String,
    /// Upload target URL.
    pub url: String,
    #[serde(default)]
    pub mime_type: Option<String>,
}

impl HelioClient {
    /// Request a presigned upload URL from the storage layer.
    pub async fn presigned_upload(&self) -> Result<PresignedUpload> {
        let operation = Operation::new(queries::QUERY_PRESIGNED_URL)
            .variable("fileName", json!(UPLOAD_FILE_NAME));
        let data = self.execute_for_data("getPresignedUrl", operation).await?;
        let target = data.get("getPresignedUrl").ok_or_else(|| {
            ClientError::protocol("getPresignedUrl returned no upload target", None)
        })?;
        serde_json::from_value(target.clone())
            .map_err(|e| ClientError::protocol(format!("malformed presigned upload: {e}"), None))
    }

    /// PUT raw bytes to a presigned upload target.
    ///
    /// The presigned URL carries its own authorization; no bearer token is
    /// attached.
    pub async fn upload_bytes(&self, target: &PresignedUpload, bytes: Vec<u8>) -> Result<()> {
        debug!(key = %target.key, size = bytes.len(), "uploading gcode bytes");
        let response = self
            .http_client()
            .put(&target.url)
            .header("Content-Type", "application/octet-stream")
            .body(bytes)
            .send()
            .await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::transport(format!(
                "upload failed: HTTP {status}: {}",
                crate::truncate(&body, 300)
            )));
        }
        Ok(())
    }

    /// Register an uploaded object as a G-code attached to a printer and
    /// material. Returns the new gcode id; processing continues remotely.
    pub async fn register_gcode(
        &self,
        gcode_key: &str,
        printer_id: &str,
        material_id: &str,
    ) -> Result<String> {
        let name = gcode_key.rsplit('/').next().unwrap_or(gcode_key);
        let input = json!({
            "name": name,
            "printerId": printer_id,
            "materialId": material_id,
            "gcodeKey": gcode_key,
            "isSingleShell": true,
        });
        let operation = Operation::new(queries::MUTATION_CREATE_GCODE).variable("input", input);
        let data = self.execute_for_data("createGcodeV2", operation).await?;

        let id = data
            .pointer("/createGcodeV2/id")
            .and_then(Value::as_str)
            .ok_or_else(|| ClientError::protocol("createGcodeV2 returned no id", None))?;
        info!(gcode_id = id, "gcode registered");
        Ok(id.to_string())
    }

    /// Poll a registered G-code until processing finishes.
    ///
    /// The gcode lifecycle has undocumented intermediate labels, so unlike
    /// job polling any non-terminal string keeps the loop going. Transient
    /// poll errors are tolerated within the wall-clock budget.
    pub async fn wait_gcode_ready(&self, gcode_id: &str) -> Result<()> {
        let started = Instant::now();

        loop {
            if started.elapsed() >= GCODE_MAX_WAIT {
                return Err(ClientError::PollTimeout {
                    waited: started.elapsed(),
                    max_wait: GCODE_MAX_WAIT,
                });
            }
            sleep(GCODE_POLL_INTERVAL).await;

            let operation =
                Operation::new(queries::QUERY_POLL_GCODE).variable("id", json!(gcode_id));
            let gcode = match self.execute_for_data("gcodeV2 poll", operation).await {
                Ok(data) => match data.get("gcodeV2") {
                    Some(Value::Null) | None => continue,
                    Some(gcode) => gcode.clone(),
                },
                Err(err) if err.is_transient() => {
                    warn!(gcode_id, "transient error while polling gcode: {err}");
                    continue;
                }
                Err(err) => return Err(err),
            };

            let processing_errors = collect_gcode_errors(&gcode);
            if !processing_errors.is_empty() {
                return Err(ClientError::GcodeRejected {
                    reason: processing_errors.join("; "),
                    trace_id: None,
                });
            }

            let status = gcode.get("status").and_then(Value::as_str).unwrap_or("");
            debug!(gcode_id, status, "observed gcode status");
            match classify_gcode_status(status) {
                GcodeState::Ready => return Ok(()),
                GcodeState::Failed => {
                    return Err(ClientError::GcodeRejected {
                        reason: format!("gcode processing ended with status {status}"),
                        trace_id: None,
                    });
                }
                GcodeState::Processing => {}
            }
        }
    }

    /// Full workflow: presigned URL, upload, register, wait until READY.
    /// Returns the registered gcode id.
    pub async fn upload_and_register_gcode(
        &self,
        path: &Path,
        printer_id: &str,
        material_id: &str,
    ) -> Result<String> {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            ClientError::Config(format!("cannot read {}: {e}", path.display()))
        })?;

        let target = self.presigned_upload().await?;
        self.upload_bytes(&target, bytes).await?;
        let gcode_id = self
            .register_gcode(&target.key, printer_id, material_id)
            .await?;
        self.wait_gcode_ready(&gcode_id).await?;
        Ok(gcode_id)
    }
}

/// Flatten the `errors` and `errorsV2` fields of a gcode object.
fn collect_gcode_errors(gcode: &Value) -> Vec<String> {
    let mut out = Vec::new();

    if let Some(errors) = gcode.get("errors").and_then(Value::as_array) {
        out.extend(
            errors
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string),
        );
    }

    if let Some(errors_v2) = gcode.get("errorsV2").and_then(Value::as_array) {
        for entry in errors_v2 {
            let kind = entry.get("type").and_then(Value::as_str).unwrap_or("");
            if kind.is_empty() {
                continue;
            }
            match entry.get("line").and_then(Value::as_i64) {
                Some(line) => out.push(format!("{kind} (line {line})")),
                None => out.push(kind.to_string()),
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gcode_status_classification() {
        assert_eq!(classify_gcode_status("READY"), GcodeState::Ready);
        assert_eq!(classify_gcode_status("ERROR"), GcodeState::Failed);
        assert_eq!(classify_gcode_status("RESTRICTED"), GcodeState::Failed);
        // Unknown and intermediate labels keep the loop polling.
        assert_eq!(classify_gcode_status("PROCESSING"), GcodeState::Processing);
        assert_eq!(classify_gcode_status("UPLOADED"), GcodeState::Processing);
        assert_eq!(classify_gcode_status(""), GcodeState::Processing);
    }

    #[test]
    fn collect_errors_empty_for_clean_gcode() {
        let gcode = json!({"status": "PROCESSING", "errors": [], "errorsV2": []});
        assert!(collect_gcode_errors(&gcode).is_empty());
    }

    #[test]
    fn collect_errors_flattens_both_fields() {
        let gcode = json!({
            "errors": ["unsupported flavor"],
            "errorsV2": [
                {"line": 120, "type": "BAD_MOVE"},
                {"type": "MISSING_HEADER"}
            ]
        });
        assert_eq!(
            collect_gcode_errors(&gcode),
            vec![
                "unsupported flavor".to_string(),
                "BAD_MOVE (line 120)".to_string(),
                "MISSING_HEADER".to_string(),
            ]
        );
    }

    #[test]
    fn presigned_upload_decodes_response_shape() {
        let target: PresignedUpload = serde_json::from_value(json!({
            "key": "uploads/abc/test.gcode",
            "url": "https://storage.example/presigned",
            "mimeType": "application/octet-stream"
        }))
        .unwrap();
        assert_eq!(target.key, "uploads/abc/test.gcode");
    }
}
