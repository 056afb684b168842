//! Domain types for the Helio Additive API client.
//!
//! Pure data structures shared between the client library and the CLI:
//! job handles and statuses, the GraphQL response envelope, simulation and
//! optimization settings/reports, and catalog records. No I/O lives here.

pub mod catalog;
pub mod envelope;
pub mod job;
pub mod optimization;
pub mod simulation;

pub use envelope::{Envelope, GraphqlError};
pub use job::{JobHandle, JobKind, JobOutcome, JobProgress, JobStatus};
