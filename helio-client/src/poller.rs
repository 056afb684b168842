//! Job poller
//!
//! Converts a newly created [`JobHandle`] into a final [`JobOutcome`] by
//! repeated status observation through a [`JobApi`]. All retry, backoff,
//! and give-up policy lives here; the gateway below never retries.

use tokio::time::{Duration, Instant, sleep};
use tracing::{debug, info, warn};

use helio_core::job::{JobHandle, JobOutcome, JobStatus};

use crate::error::{ClientError, Result};
use crate::jobs::JobApi;

/// Delay growth between consecutive polls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Backoff {
    /// Same delay every cycle.
    Constant,
    /// Multiply the delay each cycle, capped.
    Exponential { factor: f64, cap: Duration },
}

impl Backoff {
    fn next(&self, current: Duration) -> Duration {
        match *self {
            Backoff::Constant => current,
            Backoff::Exponential { factor, cap } => current.mul_f64(factor).min(cap),
        }
    }
}

/// Polling policy for [`JobPoller`].
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Initial delay between status observations.
    pub poll_interval: Duration,
    /// Floor on the delay; the remote service is never polled faster than
    /// this, whatever the backoff computes.
    pub min_interval: Duration,
    /// Wall-clock budget. Once elapsed time reaches it the poller gives up
    /// with [`ClientError::PollTimeout`]; the remote job is NOT cancelled.
    pub max_wait: Duration,
    pub backoff: Backoff,
    /// Retry transient failures (network, rate limiting) during polling
    /// instead of surfacing the first one. Off by default so transport
    /// errors are visible unless the caller opts in.
    pub retry_transient: bool,
    /// Consecutive transient failures tolerated before giving up, when
    /// `retry_transient` is on.
    pub max_transient_failures: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(3),
            min_interval: Duration::from_secs(1),
            max_wait: Duration::from_secs(30 * 60),
            backoff: Backoff::Constant,
            retry_transient: false,
            max_transient_failures: 5,
        }
    }
}

/// Waits for one remote job at a time.
///
/// Each [`await_completion`] call owns its own loop state; polling different
/// handles concurrently needs no coordination. Dropping the returned future
/// abandons only the client-side loop.
///
/// [`await_completion`]: JobPoller::await_completion
pub struct JobPoller<'a, A: JobApi> {
    api: &'a A,
    config: PollConfig,
}

impl<'a, A: JobApi> JobPoller<'a, A> {
    pub fn new(api: &'a A, config: PollConfig) -> Self {
        Self { api, config }
    }

    /// Poll until the job reaches a terminal state, then return its result.
    ///
    /// COMPLETED triggers exactly one result fetch. FAILED or CANCELLED
    /// returns [`ClientError::JobFailed`] with the server-reported reason
    /// and never touches the result endpoint. An unrecognized status label
    /// surfaces as a protocol error from the underlying [`JobApi`] and
    /// stops the loop immediately.
    pub async fn await_completion(&self, handle: &JobHandle) -> Result<JobOutcome> {
        let started = Instant::now();
        let mut delay = self.config.poll_interval.max(self.config.min_interval);
        let mut transient_failures: u32 = 0;

        loop {
            match self.api.status(handle).await {
                Ok(observed) => {
                    transient_failures = 0;
                    debug!(
                        job_id = %handle.id,
                        status = observed.status.as_str(),
                        progress = observed.progress,
                        "observed job status"
                    );
                    match observed.status {
                        JobStatus::Completed => {
                            info!(job_id = %handle.id, "job completed, fetching result");
                            return self.api.result(handle).await;
                        }
                        JobStatus::Failed | JobStatus::Cancelled => {
                            let reason = observed.failure_reason.unwrap_or_else(|| {
                                format!(
                                    "{} reported {} without a reason",
                                    handle.kind.label(),
                                    observed.status.as_str()
                                )
                            });
                            return Err(ClientError::JobFailed {
                                status: observed.status,
                                reason,
                                trace_id: None,
                            });
                        }
                        JobStatus::Queued | JobStatus::Running => {}
                    }
                }
                Err(err) if self.config.retry_transient && err.is_transient() => {
                    transient_failures += 1;
                    warn!(
                        job_id = %handle.id,
                        failures = transient_failures,
                        budget = self.config.max_transient_failures,
                        "transient error while polling: {err}"
                    );
                    if transient_failures >= self.config.max_transient_failures {
                        return Err(err);
                    }
                }
                Err(err) => return Err(err),
            }

            let waited = started.elapsed();
            if waited >= self.config.max_wait {
                return Err(ClientError::PollTimeout {
                    waited,
                    max_wait: self.config.max_wait,
                });
            }

            sleep(delay).await;
            delay = self.config.backoff.next(delay).max(self.config.min_interval);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use helio_core::job::{JobKind, JobProgress};
    use helio_core::simulation::SimulationReport;

    /// Replays a scripted status sequence and counts calls. Once the script
    /// is exhausted it keeps reporting RUNNING.
    struct ScriptedApi {
        statuses: Mutex<VecDeque<Result<JobProgress>>>,
        status_calls: AtomicUsize,
        result_calls: AtomicUsize,
    }

    impl ScriptedApi {
        fn new(statuses: Vec<Result<JobProgress>>) -> Self {
            Self {
                statuses: Mutex::new(statuses.into()),
                status_calls: AtomicUsize::new(0),
                result_calls: AtomicUsize::new(0),
            }
        }

        fn status_calls(&self) -> usize {
            self.status_calls.load(Ordering::SeqCst)
        }

        fn result_calls(&self) -> usize {
            self.result_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl JobApi for ScriptedApi {
        async fn status(&self, _handle: &JobHandle) -> Result<JobProgress> {
            self.status_calls.fetch_add(1, Ordering::SeqCst);
            self.statuses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(observed(JobStatus::Running)))
        }

        async fn result(&self, handle: &JobHandle) -> Result<JobOutcome> {
            self.result_calls.fetch_add(1, Ordering::SeqCst);
            Ok(JobOutcome::Simulation(SimulationReport {
                id: handle.id.clone(),
                name: None,
                progress: Some(100.0),
                thermal_index_gcode_url: Some("https://cdn.example/out.gcode".to_string()),
                print_info: None,
                speed_factor: None,
                suggested_fixes: Vec::new(),
            }))
        }
    }

    fn observed(status: JobStatus) -> JobProgress {
        JobProgress {
            status,
            progress: None,
            failure_reason: None,
        }
    }

    fn handle() -> JobHandle {
        JobHandle::new("job-1", JobKind::Simulation)
    }

    fn zero_delay_config() -> PollConfig {
        PollConfig {
            poll_interval: Duration::ZERO,
            min_interval: Duration::ZERO,
            max_wait: Duration::from_secs(60),
            ..PollConfig::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn completed_sequence_makes_one_result_call() {
        let api = ScriptedApi::new(vec![
            Ok(observed(JobStatus::Queued)),
            Ok(observed(JobStatus::Running)),
            Ok(observed(JobStatus::Running)),
            Ok(observed(JobStatus::Completed)),
        ]);
        let poller = JobPoller::new(&api, zero_delay_config());
        let started = Instant::now();

        let outcome = poller.await_completion(&handle()).await.unwrap();

        assert_eq!(api.status_calls(), 4);
        assert_eq!(api.result_calls(), 1);
        assert_eq!(
            outcome.artifact_url(),
            Some("https://cdn.example/out.gcode")
        );
        // Zero interval: no simulated time may pass.
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_job_never_fetches_result() {
        let api = ScriptedApi::new(vec![
            Ok(observed(JobStatus::Running)),
            Ok(JobProgress {
                status: JobStatus::Failed,
                progress: Some(40.0),
                failure_reason: Some("mesh generation failed".to_string()),
            }),
        ]);
        let poller = JobPoller::new(&api, zero_delay_config());

        let err = poller.await_completion(&handle()).await.unwrap_err();

        match err {
            ClientError::JobFailed { status, reason, .. } => {
                assert_eq!(status, JobStatus::Failed);
                assert_eq!(reason, "mesh generation failed");
            }
            other => panic!("expected JobFailed, got {other:?}"),
        }
        assert_eq!(api.result_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_job_fails_with_fallback_reason() {
        let api = ScriptedApi::new(vec![Ok(observed(JobStatus::Cancelled))]);
        let poller = JobPoller::new(&api, zero_delay_config());

        let err = poller.await_completion(&handle()).await.unwrap_err();

        match err {
            ClientError::JobFailed { status, reason, .. } => {
                assert_eq!(status, JobStatus::Cancelled);
                assert!(reason.contains("CANCELLED"));
            }
            other => panic!("expected JobFailed, got {other:?}"),
        }
        assert_eq!(api.status_calls(), 1);
        assert_eq!(api.result_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn non_terminal_sequence_times_out_by_wall_clock() {
        // Script exhausted -> RUNNING forever.
        let api = ScriptedApi::new(vec![]);
        let config = PollConfig {
            poll_interval: Duration::from_millis(50),
            min_interval: Duration::ZERO,
            max_wait: Duration::from_millis(120),
            ..PollConfig::default()
        };
        let poller = JobPoller::new(&api, config);
        let started = Instant::now();

        let err = poller.await_completion(&handle()).await.unwrap_err();

        match err {
            ClientError::PollTimeout { waited, max_wait } => {
                assert!(waited >= max_wait);
                // Overshoot is bounded by one polling interval.
                assert!(waited <= max_wait + Duration::from_millis(50));
            }
            other => panic!("expected PollTimeout, got {other:?}"),
        }
        assert!(started.elapsed() >= Duration::from_millis(120));
        assert_eq!(api.result_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn protocol_error_mid_sequence_stops_immediately() {
        let api = ScriptedApi::new(vec![
            Ok(observed(JobStatus::Queued)),
            Err(ClientError::protocol(
                "simulation job-1 reported unrecognized status \"ARCHIVED\"",
                None,
            )),
        ]);
        let poller = JobPoller::new(&api, zero_delay_config());

        let err = poller.await_completion(&handle()).await.unwrap_err();

        assert!(matches!(err, ClientError::Protocol { .. }));
        assert_eq!(api.status_calls(), 2);
        assert_eq!(api.result_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn transport_error_surfaces_when_retry_is_off() {
        let api = ScriptedApi::new(vec![
            Ok(observed(JobStatus::Queued)),
            Err(ClientError::transport("connection reset")),
        ]);
        let poller = JobPoller::new(&api, zero_delay_config());

        let err = poller.await_completion(&handle()).await.unwrap_err();

        assert!(matches!(err, ClientError::Transport { .. }));
        assert_eq!(api.status_calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn transient_errors_retried_when_enabled() {
        let api = ScriptedApi::new(vec![
            Err(ClientError::transport("connection reset")),
            Ok(observed(JobStatus::Running)),
            Ok(observed(JobStatus::Completed)),
        ]);
        let config = PollConfig {
            retry_transient: true,
            ..zero_delay_config()
        };
        let poller = JobPoller::new(&api, config);

        let outcome = poller.await_completion(&handle()).await.unwrap();

        assert_eq!(outcome.id(), "job-1");
        assert_eq!(api.status_calls(), 3);
        assert_eq!(api.result_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn transient_retry_budget_is_bounded() {
        let failures = (0..10)
            .map(|_| Err(ClientError::transport("connection reset")))
            .collect();
        let api = ScriptedApi::new(failures);
        let config = PollConfig {
            retry_transient: true,
            max_transient_failures: 3,
            ..zero_delay_config()
        };
        let poller = JobPoller::new(&api, config);

        let err = poller.await_completion(&handle()).await.unwrap_err();

        assert!(matches!(err, ClientError::Transport { .. }));
        assert_eq!(api.status_calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn auth_error_is_never_retried() {
        let api = ScriptedApi::new(vec![Err(ClientError::Auth {
            status: 401,
            trace_id: None,
        })]);
        let config = PollConfig {
            retry_transient: true,
            ..zero_delay_config()
        };
        let poller = JobPoller::new(&api, config);

        let err = poller.await_completion(&handle()).await.unwrap_err();

        assert!(matches!(err, ClientError::Auth { .. }));
        assert_eq!(api.status_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn min_interval_floors_the_delay() {
        let api = ScriptedApi::new(vec![
            Ok(observed(JobStatus::Queued)),
            Ok(observed(JobStatus::Completed)),
        ]);
        let config = PollConfig {
            poll_interval: Duration::ZERO,
            min_interval: Duration::from_millis(10),
            max_wait: Duration::from_secs(60),
            ..PollConfig::default()
        };
        let poller = JobPoller::new(&api, config);
        let started = Instant::now();

        poller.await_completion(&handle()).await.unwrap();

        // One sleep between the two observations, floored to 10ms.
        assert_eq!(started.elapsed(), Duration::from_millis(10));
    }

    #[test]
    fn exponential_backoff_is_capped() {
        let backoff = Backoff::Exponential {
            factor: 2.0,
            cap: Duration::from_secs(8),
        };
        let mut delay = Duration::from_secs(3);
        delay = backoff.next(delay);
        assert_eq!(delay, Duration::from_secs(6));
        delay = backoff.next(delay);
        assert_eq!(delay, Duration::from_secs(8));
        delay = backoff.next(delay);
        assert_eq!(delay, Duration::from_secs(8));
    }

    #[test]
    fn constant_backoff_keeps_the_delay() {
        assert_eq!(
            Backoff::Constant.next(Duration::from_secs(3)),
            Duration::from_secs(3)
        );
    }
}
