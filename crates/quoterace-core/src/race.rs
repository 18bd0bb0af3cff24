//! First-valid-response-wins race across all registered sources.
//!
//! One task is spawned per [`SourceDescriptor`]. Every task shares a single
//! [`CancellationToken`] and the race shares a single deadline timer. The
//! coordinator runs in two phases:
//!
//! 1. wait for the first successful outcome, collecting failures as they
//!    arrive, until a winner appears, every task has finished, or the
//!    deadline fires;
//! 2. raise the cancellation token and drain the remaining tasks so every
//!    source contributes exactly one diagnostic entry.
//!
//! Successes observed in phase 2 are discarded and recorded as cancelled;
//! a winner, once chosen, is final.

use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::fetch::{CancelReason, FetchError, SourceFailure, SourceOutcome};
use crate::http_client::{HttpClient, HttpRequest};
use crate::registry::{SourceDescriptor, SourceRegistry};
use crate::{CanonicalRecord, SourceId, ValidationError};

/// The single successful outcome of a race.
#[derive(Debug, Clone)]
pub struct RaceWin {
    pub record: CanonicalRecord,
    pub source: SourceId,
    /// Failures of every other source, including those cancelled by the win.
    pub failures: Vec<SourceFailure>,
    pub latency_ms: u64,
}

/// Every source failed, or the deadline fired before any success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateFailure {
    pub failures: Vec<SourceFailure>,
    pub deadline_expired: bool,
    pub latency_ms: u64,
}

impl Display for AggregateFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.deadline_expired {
            write!(f, "no quote source succeeded before the deadline")?;
        } else {
            write!(f, "all quote sources failed")?;
        }

        if self.failures.is_empty() {
            return f.write_str(" (no sources registered)");
        }

        f.write_str(". Errors: ")?;
        for (index, failure) in self.failures.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{failure}")?;
        }
        Ok(())
    }
}

impl std::error::Error for AggregateFailure {}

pub type RaceResult = Result<RaceWin, AggregateFailure>;

/// What a fetch task reports back; cancellation reasons are assigned by the coordinator.
enum TaskOutcome {
    Finished(SourceOutcome),
    Cancelled(SourceId),
}

/// Issues one concurrent request per source and keeps the fastest valid answer.
#[derive(Clone)]
pub struct RaceCoordinator {
    http_client: Arc<dyn HttpClient>,
    request_timeout: Option<Duration>,
}

impl RaceCoordinator {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            request_timeout: None,
        }
    }

    /// Cap on each individual request; the race deadline still applies.
    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub async fn race(&self, registry: &SourceRegistry, deadline: Duration) -> RaceResult {
        let started = Instant::now();
        let cancel = CancellationToken::new();
        let request_timeout = match self.request_timeout {
            Some(cap) => cap.min(deadline),
            None => deadline,
        };
        let request_timeout_ms = duration_ms(request_timeout).max(1);

        let (sender, mut receiver) = mpsc::channel::<TaskOutcome>(registry.len().max(1));
        let mut tasks = JoinSet::new();
        for descriptor in registry.iter().cloned() {
            let sender = sender.clone();
            let client = Arc::clone(&self.http_client);
            let cancel = cancel.clone();
            tasks.spawn(async move {
                let outcome = fetch_source(client, descriptor, cancel, request_timeout_ms).await;
                let _ = sender.send(outcome).await;
            });
        }
        drop(sender);

        let timer = tokio::time::sleep(deadline);
        tokio::pin!(timer);

        let mut failures = Vec::with_capacity(registry.len());
        let mut deadline_expired = false;

        let winner = loop {
            tokio::select! {
                received = receiver.recv() => match received {
                    None => break None,
                    Some(TaskOutcome::Finished(SourceOutcome::Success { record, source })) => {
                        break Some((record, source));
                    }
                    Some(TaskOutcome::Finished(SourceOutcome::Failure(failure))) => {
                        debug!(source = %failure.source, error = %failure.error, "quote source failed");
                        failures.push(failure);
                    }
                    Some(TaskOutcome::Cancelled(source)) => {
                        failures.push(SourceFailure {
                            source,
                            error: FetchError::cancelled(CancelReason::Deadline),
                        });
                    }
                },
                () = &mut timer => {
                    deadline_expired = true;
                    break None;
                }
            }
        };

        cancel.cancel();
        let reason = if winner.is_some() {
            CancelReason::RaceWon
        } else {
            CancelReason::Deadline
        };

        while let Some(outcome) = receiver.recv().await {
            let failure = match outcome {
                TaskOutcome::Finished(SourceOutcome::Success { source, .. })
                | TaskOutcome::Cancelled(source) => SourceFailure {
                    source,
                    error: FetchError::cancelled(reason),
                },
                TaskOutcome::Finished(SourceOutcome::Failure(failure)) => failure,
            };
            failures.push(failure);
        }
        while tasks.join_next().await.is_some() {}

        let latency_ms = duration_ms(started.elapsed());
        match winner {
            Some((record, source)) => {
                info!(source = %source, latency_ms, "quote race won");
                Ok(RaceWin {
                    record,
                    source,
                    failures,
                    latency_ms,
                })
            }
            None => Err(AggregateFailure {
                failures,
                deadline_expired,
                latency_ms,
            }),
        }
    }
}

/// Fetch, status check, decode, and normalize for one source.
///
/// The cancellation token is observed at the I/O boundary and again before
/// normalization.
async fn fetch_source(
    client: Arc<dyn HttpClient>,
    descriptor: SourceDescriptor,
    cancel: CancellationToken,
    timeout_ms: u64,
) -> TaskOutcome {
    let source = descriptor.id();
    debug!(source = %source, address = descriptor.address(), "requesting quote source");

    let request = HttpRequest::get(descriptor.address())
        .with_header("accept", "application/json")
        .with_timeout_ms(timeout_ms);

    let response = tokio::select! {
        biased;
        () = cancel.cancelled() => return TaskOutcome::Cancelled(source),
        response = client.execute(request) => response,
    };

    if cancel.is_cancelled() {
        return TaskOutcome::Cancelled(source);
    }

    let outcome = match response {
        Err(error) => SourceOutcome::failure(source, FetchError::network(error.message())),
        Ok(response) if !response.is_success() => {
            SourceOutcome::failure(source, FetchError::http_status(response.status))
        }
        Ok(response) => match serde_json::from_str(&response.body) {
            Err(error) => SourceOutcome::failure(
                source,
                FetchError::validation(&ValidationError::MalformedPayload {
                    reason: error.to_string(),
                }),
            ),
            Ok(payload) => match descriptor.normalize(&payload) {
                Ok(record) => SourceOutcome::Success { record, source },
                Err(error) => SourceOutcome::failure(source, FetchError::validation(&error)),
            },
        },
    };

    TaskOutcome::Finished(outcome)
}

fn duration_ms(duration: Duration) -> u64 {
    duration.as_millis().min(u128::from(u64::MAX)) as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::FetchErrorKind;
    use crate::http_client::ScriptedHttpClient;
    use crate::registry::SourceRegistryBuilder;

    fn two_source_registry() -> SourceRegistry {
        SourceRegistryBuilder::only([SourceId::Dummyjson, SourceId::Catfact])
            .with_address(SourceId::Dummyjson, "http://a.test/quote")
            .with_address(SourceId::Catfact, "http://b.test/fact")
            .build()
    }

    #[tokio::test]
    async fn first_success_wins_and_loser_is_cancelled() {
        let client = ScriptedHttpClient::new()
            .with_json(
                "http://a.test/quote",
                Duration::ZERO,
                r#"{"id":420,"quote":"Q","author":"Au"}"#,
            )
            .with_json(
                "http://b.test/fact",
                Duration::from_millis(300),
                r#"{"fact":"F","length":1}"#,
            );
        let coordinator = RaceCoordinator::new(Arc::new(client.clone()));

        let win = coordinator
            .race(&two_source_registry(), Duration::from_secs(2))
            .await
            .expect("race should succeed");

        assert_eq!(win.source, SourceId::Dummyjson);
        assert_eq!(win.record.text(), "Q");
        assert_eq!(win.failures.len(), 1);
        assert_eq!(win.failures[0].source, SourceId::Catfact);
        assert_eq!(win.failures[0].error.kind(), FetchErrorKind::Cancelled);
        assert_eq!(client.abandoned_requests(), 1);
    }

    #[tokio::test]
    async fn empty_registry_fails_without_waiting_for_deadline() {
        let coordinator = RaceCoordinator::new(Arc::new(ScriptedHttpClient::new()));
        let registry = SourceRegistryBuilder::only(Vec::<SourceId>::new()).build();

        let started = Instant::now();
        let failure = coordinator
            .race(&registry, Duration::from_secs(5))
            .await
            .expect_err("nothing to race");

        assert!(failure.failures.is_empty());
        assert!(!failure.deadline_expired);
        assert!(started.elapsed() < Duration::from_secs(1));
        assert!(failure.to_string().contains("no sources registered"));
    }

    #[tokio::test]
    async fn malformed_json_is_a_validation_failure() {
        let client = ScriptedHttpClient::new()
            .with_json("http://a.test/quote", Duration::ZERO, "<html>oops</html>")
            .with_status("http://b.test/fact", Duration::ZERO, 404);
        let coordinator = RaceCoordinator::new(Arc::new(client));

        let failure = coordinator
            .race(&two_source_registry(), Duration::from_secs(2))
            .await
            .expect_err("both sources fail");

        let kinds = failure
            .failures
            .iter()
            .map(|failure| (failure.source, failure.error.kind()))
            .collect::<std::collections::HashMap<_, _>>();
        assert_eq!(kinds[&SourceId::Dummyjson], FetchErrorKind::Validation);
        assert_eq!(kinds[&SourceId::Catfact], FetchErrorKind::HttpStatus);
        assert!(!failure.deadline_expired);
    }
}
