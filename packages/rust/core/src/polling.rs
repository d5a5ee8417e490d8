//! Completion polling for feeds and content.
//!
//! The platform owns job lifecycles and never pushes completion. A job is
//! observed as Pending or Done through a point-in-time boolean query; the
//! caller decides the cadence. Recurring feeds stay Pending forever.

use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, instrument};

use sourcebridge_platform::{Platform, requests};
use sourcebridge_shared::{Result, SourceBridgeError};

/// Something whose completion can be queried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionTarget {
    Feed(String),
    Content(String),
}

impl CompletionTarget {
    pub fn id(&self) -> &str {
        match self {
            Self::Feed(id) | Self::Content(id) => id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Feed(_) => "feed",
            Self::Content(_) => "content",
        }
    }
}

/// Observed state of a submitted job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CompletionState {
    Pending,
    Done,
}

impl CompletionState {
    pub fn is_done(self) -> bool {
        self == Self::Done
    }
}

/// One completion query.
pub async fn check_completion(
    platform: &dyn Platform,
    target: &CompletionTarget,
) -> Result<CompletionState> {
    let done = match target {
        CompletionTarget::Feed(id) => requests::is_feed_done(platform, id).await?,
        CompletionTarget::Content(id) => requests::is_content_done(platform, id).await?,
    };
    Ok(if done {
        CompletionState::Done
    } else {
        CompletionState::Pending
    })
}

/// Outcome of [`wait_for_completion`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOutcome {
    /// Last observed state.
    pub state: CompletionState,
    /// Number of completion queries issued.
    pub checks: u32,
}

/// Re-issue the completion query every `interval` until Done or `timeout`.
///
/// Timing out is not an error: the outcome carries the last observed
/// state (Pending). `on_check` sees each observation.
#[instrument(skip_all, fields(kind = target.kind(), id = target.id()))]
pub async fn wait_for_completion(
    platform: &dyn Platform,
    target: &CompletionTarget,
    interval: Duration,
    timeout: Duration,
    mut on_check: impl FnMut(u32, CompletionState),
) -> Result<WaitOutcome> {
    if interval.is_zero() {
        return Err(SourceBridgeError::validation("poll interval must be positive"));
    }

    let deadline = tokio::time::Instant::now() + timeout;
    let mut checks = 0;

    loop {
        let state = check_completion(platform, target).await?;
        checks += 1;
        on_check(checks, state);
        debug!(checks, ?state, "completion checked");

        if state.is_done() {
            info!(checks, "job completed");
            return Ok(WaitOutcome { state, checks });
        }

        let now = tokio::time::Instant::now();
        if now + interval > deadline {
            info!(checks, "gave up waiting for completion");
            return Ok(WaitOutcome { state, checks });
        }
        tokio::time::sleep(interval).await;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::{Value, json};

    use super::*;

    /// Reports done after `pending` checks and records operations.
    struct Countdown {
        pending: Mutex<u32>,
        calls: Mutex<Vec<(String, Value)>>,
    }

    impl Countdown {
        fn new(pending: u32) -> Self {
            Self {
                pending: Mutex::new(pending),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Platform for Countdown {
        async fn execute(&self, operation: &str, variables: Value) -> Result<Value> {
            self.calls
                .lock()
                .unwrap()
                .push((operation.to_string(), variables));
            let mut pending = self.pending.lock().unwrap();
            if *pending == 0 {
                Ok(json!({ "result": true }))
            } else {
                *pending -= 1;
                Ok(json!({ "result": false }))
            }
        }
    }

    #[tokio::test]
    async fn single_check_maps_states() {
        let platform = Countdown::new(1);
        let target = CompletionTarget::Feed("f1".into());
        assert_eq!(
            check_completion(&platform, &target).await.unwrap(),
            CompletionState::Pending
        );
        assert_eq!(
            check_completion(&platform, &target).await.unwrap(),
            CompletionState::Done
        );

        let calls = platform.calls.lock().unwrap();
        assert_eq!(calls[0].0, "isFeedDone");
        assert_eq!(calls[0].1, json!({ "id": "f1" }));
    }

    #[tokio::test]
    async fn content_target_uses_content_query() {
        let platform = Countdown::new(0);
        let target = CompletionTarget::Content("c1".into());
        check_completion(&platform, &target).await.unwrap();
        assert_eq!(platform.calls.lock().unwrap()[0].0, "isContentDone");
    }

    #[tokio::test(start_paused = true)]
    async fn waits_until_done() {
        let platform = Countdown::new(2);
        let target = CompletionTarget::Feed("f1".into());
        let mut seen = Vec::new();

        let outcome = wait_for_completion(
            &platform,
            &target,
            Duration::from_secs(5),
            Duration::from_secs(60),
            |n, state| seen.push((n, state)),
        )
        .await
        .unwrap();

        assert_eq!(outcome.state, CompletionState::Done);
        assert_eq!(outcome.checks, 3);
        assert_eq!(seen.last(), Some(&(3, CompletionState::Done)));
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_returns_pending() {
        let platform = Countdown::new(u32::MAX);
        let target = CompletionTarget::Feed("recurring".into());

        let outcome = wait_for_completion(
            &platform,
            &target,
            Duration::from_secs(10),
            Duration::from_secs(30),
            |_, _| {},
        )
        .await
        .unwrap();

        assert_eq!(outcome.state, CompletionState::Pending);
        assert_eq!(outcome.checks, 4);
    }
}
