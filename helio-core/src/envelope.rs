//! GraphQL response envelope
//!
//! Every API response is decoded exactly once, at the gateway boundary, into
//! an [`Envelope`]. Downstream code works with the typed fields and never
//! re-inspects raw JSON maps for error shapes.

use serde::Deserialize;
use serde_json::Value;

/// One server-reported GraphQL error.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphqlError {
    pub message: String,
    /// Path to the field the error applies to, when the server reports one.
    #[serde(default)]
    pub path: Option<Vec<Value>>,
    #[serde(default)]
    pub extensions: Option<Value>,
}

/// Normalized GraphQL response.
///
/// On success `data` is populated; on failure `errors` is non-empty. Partial
/// results carry both, and callers deciding success must inspect both fields
/// rather than a single boolean.
#[derive(Debug, Clone)]
pub struct Envelope {
    pub data: Option<Value>,
    pub errors: Vec<GraphqlError>,
    /// Correlation id from the `trace-id` response header, for matching
    /// client failures against server-side logs.
    pub trace_id: Option<String>,
}

impl Envelope {
    /// True when the server reported at least one GraphQL-level error.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// All error messages joined for display.
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn graphql_error_decodes_minimal_shape() {
        let err: GraphqlError = serde_json::from_value(json!({"message": "bad input"})).unwrap();
        assert_eq!(err.message, "bad input");
        assert!(err.path.is_none());
        assert!(err.extensions.is_none());
    }

    #[test]
    fn graphql_error_decodes_full_shape() {
        let err: GraphqlError = serde_json::from_value(json!({
            "message": "not found",
            "path": ["simulation", "id"],
            "extensions": {"code": "NOT_FOUND"}
        }))
        .unwrap();
        assert_eq!(err.path.as_ref().unwrap().len(), 2);
        assert!(err.extensions.is_some());
    }

    #[test]
    fn error_summary_joins_messages() {
        let envelope = Envelope {
            data: None,
            errors: vec![
                GraphqlError {
                    message: "first".into(),
                    path: None,
                    extensions: None,
                },
                GraphqlError {
                    message: "second".into(),
                    path: None,
                    extensions: None,
                },
            ],
            trace_id: Some("t-1".into()),
        };
        assert!(envelope.has_errors());
        assert_eq!(envelope.error_summary(), "first; second");
    }
}
