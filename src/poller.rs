// This file is part of the terraform-provider-ionoscloud project
//
// Copyright (C) ANEO, 2024-2024. All rights reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License")
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Fixed-interval wait for a remote object to reach a terminal state.
//!
//! There is no backoff and no retry budget: the loop stops on the first terminal
//! state, on the first API error, or when the operation deadline elapses.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;

use crate::sdk::ApiError;

/// Classification of a remote state string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Readiness {
    Ready,
    Pending(String),
    Failed(String),
}

impl Readiness {
    /// Classify `state`: any of `ready` (case-insensitive) is ready,
    /// `FAILED` and its variants are failures, anything else is pending.
    pub fn classify(state: Option<&str>, ready: &[&str]) -> Self {
        let Some(state) = state else {
            return Readiness::Pending("UNKNOWN".to_owned());
        };
        if ready.iter().any(|r| r.eq_ignore_ascii_case(state)) {
            Readiness::Ready
        } else if state.to_ascii_uppercase().starts_with("FAILED") {
            Readiness::Failed(state.to_owned())
        } else {
            Readiness::Pending(state.to_owned())
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PollError {
    #[error("timed out after {elapsed:?} waiting for {kind} {id} to {goal}; the operation may still complete on the IONOS side, refresh the state to reconcile it")]
    Timeout {
        kind: &'static str,
        id: String,
        goal: &'static str,
        elapsed: Duration,
    },
    #[error("{kind} {id} reached state {state} while waiting for it to {goal}")]
    Failed {
        kind: &'static str,
        id: String,
        goal: &'static str,
        state: String,
    },
    #[error("error while waiting for {kind} {id} to {goal}: {source}")]
    Api {
        kind: &'static str,
        id: String,
        goal: &'static str,
        #[source]
        source: ApiError,
    },
}

#[derive(Debug, Clone)]
pub struct Poller {
    kind: &'static str,
    id: String,
    interval: Duration,
    timeout: Duration,
}

impl Poller {
    pub fn new(kind: &'static str, id: impl Into<String>, interval: Duration, timeout: Duration) -> Self {
        Self {
            kind,
            id: id.into(),
            interval,
            timeout,
        }
    }

    /// Call `check` every interval until it reports [`Readiness::Ready`].
    pub async fn until<F, Fut>(&self, goal: &'static str, mut check: F) -> Result<(), PollError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Readiness, ApiError>>,
    {
        let start = Instant::now();
        let deadline = start + self.timeout;
        let timeout = || PollError::Timeout {
            kind: self.kind,
            id: self.id.clone(),
            goal,
            elapsed: start.elapsed(),
        };

        loop {
            let readiness = match tokio::time::timeout_at(deadline, check()).await {
                Ok(Ok(readiness)) => readiness,
                Ok(Err(source)) => {
                    return Err(PollError::Api {
                        kind: self.kind,
                        id: self.id.clone(),
                        goal,
                        source,
                    })
                }
                Err(_) => return Err(timeout()),
            };

            match readiness {
                Readiness::Ready => {
                    tracing::debug!("{} {} is ready to {goal}", self.kind, self.id);
                    return Ok(());
                }
                Readiness::Failed(state) => {
                    return Err(PollError::Failed {
                        kind: self.kind,
                        id: self.id.clone(),
                        goal,
                        state,
                    })
                }
                Readiness::Pending(state) => {
                    tracing::debug!(
                        "{} {} is {state}, waiting {:?} to {goal}",
                        self.kind,
                        self.id,
                        self.interval
                    );
                }
            }

            tokio::select! {
                _ = tokio::time::sleep(self.interval) => (),
                _ = tokio::time::sleep_until(deadline) => return Err(timeout()),
            }
        }
    }

    /// Wait until fetching the object answers 404.
    ///
    /// `fetch` returns the readiness of the object while it still exists.
    pub async fn until_gone<F, Fut>(&self, fetch: F) -> Result<(), PollError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Readiness, ApiError>>,
    {
        let mut fetch = fetch;
        self.until("be deleted", || {
            let pending = fetch();
            async move {
                match pending.await {
                    Ok(Readiness::Failed(state)) => Ok(Readiness::Failed(state)),
                    Ok(Readiness::Pending(state)) => Ok(Readiness::Pending(state)),
                    Ok(Readiness::Ready) => Ok(Readiness::Pending("still present".to_owned())),
                    Err(err) if err.is_not_found() => Ok(Readiness::Ready),
                    Err(err) => Err(err),
                }
            }
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn poller(timeout: Duration) -> Poller {
        Poller::new("cluster", "c-1", Duration::from_secs(5), timeout)
    }

    #[test]
    fn classify_states() {
        let ready = &["AVAILABLE", "ACTIVE"];
        assert_eq!(Readiness::classify(Some("available"), ready), Readiness::Ready);
        assert_eq!(Readiness::classify(Some("ACTIVE"), ready), Readiness::Ready);
        assert_eq!(
            Readiness::classify(Some("FAILED_UPDATING"), ready),
            Readiness::Failed("FAILED_UPDATING".into())
        );
        assert_eq!(
            Readiness::classify(Some("BUSY"), ready),
            Readiness::Pending("BUSY".into())
        );
        assert!(matches!(
            Readiness::classify(None, ready),
            Readiness::Pending(_)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn ready_after_pending_states() {
        let calls = AtomicUsize::new(0);
        let res = poller(Duration::from_secs(60))
            .until("become available", || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    Ok(if n < 3 {
                        Readiness::Pending("BUSY".into())
                    } else {
                        Readiness::Ready
                    })
                }
            })
            .await;
        assert!(res.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_state_is_not_retried() {
        let calls = AtomicUsize::new(0);
        let res = poller(Duration::from_secs(60))
            .until("become available", || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok(Readiness::Failed("FAILED".into())) }
            })
            .await;
        assert!(matches!(res, Err(PollError::Failed { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_reports_timeout() {
        let res = poller(Duration::from_secs(12))
            .until("become available", || async {
                Ok(Readiness::Pending("BUSY".into()))
            })
            .await;
        let err = res.unwrap_err();
        assert!(matches!(err, PollError::Timeout { .. }));
        assert!(err.to_string().contains("may still complete"));
    }

    #[tokio::test(start_paused = true)]
    async fn api_errors_propagate_immediately() {
        let calls = AtomicUsize::new(0);
        let res = poller(Duration::from_secs(60))
            .until("become available", || {
                calls.fetch_add(1, Ordering::SeqCst);
                async {
                    Err(ApiError::Status {
                        url: "http://localhost/clusters/c-1".into(),
                        status: 500,
                        message: "boom".into(),
                    })
                }
            })
            .await;
        assert!(matches!(res, Err(PollError::Api { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn gone_once_not_found() {
        let calls = AtomicUsize::new(0);
        let res = poller(Duration::from_secs(60))
            .until_gone(|| {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 2 {
                        Ok(Readiness::Ready)
                    } else {
                        Err(ApiError::NotFound {
                            url: "http://localhost/clusters/c-1".into(),
                        })
                    }
                }
            })
            .await;
        assert!(res.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
