//! Sequential increment replay against a single Habitica task.
//!
//! Issues exactly `count` score-up calls, one after another. Every call is
//! independent: a failed attempt is tallied and the next attempt proceeds.
//! There is no idempotency key, so re-running a day scores it again.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::integrations::HabitTracker;

/// Which HTTP statuses count as a successful call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuccessPolicy {
    /// Only `200 OK`.
    #[default]
    Exact200,
    /// Any status in `200..=299`.
    Any2xx,
}

impl SuccessPolicy {
    pub fn is_success(self, status: u16) -> bool {
        match self {
            SuccessPolicy::Exact200 => status == 200,
            SuccessPolicy::Any2xx => (200..300).contains(&status),
        }
    }
}

/// Result of one score-up attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IncrementOutcome {
    /// 1-based attempt number.
    pub attempt: u64,
    /// `None` when no response was received.
    pub status: Option<u16>,
    pub success: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReplayTally {
    pub succeeded: u64,
    pub failed: u64,
}

impl ReplayTally {
    pub fn total(&self) -> u64 {
        self.succeeded + self.failed
    }

    fn record(&mut self, outcome: &IncrementOutcome) {
        if outcome.success {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
    }
}

fn describe(result: &Result<u16>, success: bool) -> String {
    match result {
        Ok(_) if success => "Success".to_string(),
        Ok(status) => format!("Failure ({status})"),
        Err(e) => format!("Failure ({e})"),
    }
}

/// Score `task_id` up `count` times and tally the outcomes.
pub async fn replay<H: HabitTracker>(
    tracker: &H,
    task_id: &str,
    count: u64,
    policy: SuccessPolicy,
) -> ReplayTally {
    let mut tally = ReplayTally::default();

    for attempt in 1..=count {
        let result = tracker.score_up(task_id).await;
        let status = result.as_ref().ok().copied();
        let outcome = IncrementOutcome {
            attempt,
            status,
            success: status.is_some_and(|s| policy.is_success(s)),
        };

        let line = describe(&result, outcome.success);
        if outcome.success {
            tracing::info!("Request {attempt}/{count}: {line}");
        } else {
            tracing::warn!(status, "Request {attempt}/{count}: {line}");
        }
        tally.record(&outcome);
    }

    tally
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::integrations::TaskListing;
    use std::cell::RefCell;

    /// Answers score-up calls from a script of statuses; `None` simulates a
    /// dropped connection.
    struct ScriptedTracker {
        script: Vec<Option<u16>>,
        calls: RefCell<Vec<String>>,
    }

    impl ScriptedTracker {
        fn new(script: Vec<Option<u16>>) -> Self {
            Self {
                script,
                calls: RefCell::new(Vec::new()),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.borrow().len()
        }
    }

    impl HabitTracker for ScriptedTracker {
        async fn list_tasks(&self) -> Result<TaskListing> {
            Ok(TaskListing::Tasks(Vec::new()))
        }

        async fn score_up(&self, task_id: &str) -> Result<u16> {
            let n = self.call_count();
            self.calls.borrow_mut().push(task_id.to_string());
            match self.script.get(n).copied().flatten() {
                Some(status) => Ok(status),
                None => Err(CoreError::Io(std::io::Error::new(
                    std::io::ErrorKind::ConnectionReset,
                    "connection reset",
                ))),
            }
        }
    }

    #[test]
    fn exact_policy_only_accepts_200() {
        assert!(SuccessPolicy::Exact200.is_success(200));
        assert!(!SuccessPolicy::Exact200.is_success(201));
        assert!(!SuccessPolicy::Exact200.is_success(204));
        assert!(SuccessPolicy::Any2xx.is_success(201));
        assert!(SuccessPolicy::Any2xx.is_success(299));
        assert!(!SuccessPolicy::Any2xx.is_success(300));
        assert!(!SuccessPolicy::Any2xx.is_success(199));
    }

    #[test]
    fn describes_each_attempt_in_one_line() {
        assert_eq!(describe(&Ok(200), true), "Success");
        assert_eq!(describe(&Ok(503), false), "Failure (503)");
        let dropped = Err(CoreError::Io(std::io::Error::new(
            std::io::ErrorKind::ConnectionReset,
            "connection reset",
        )));
        assert_eq!(describe(&dropped, false), "Failure (IO error: connection reset)");
    }

    #[tokio::test]
    async fn zero_count_issues_no_calls() {
        let tracker = ScriptedTracker::new(vec![]);
        let tally = replay(&tracker, "abc123", 0, SuccessPolicy::Exact200).await;
        assert_eq!(tally, ReplayTally::default());
        assert_eq!(tracker.call_count(), 0);
    }

    #[tokio::test]
    async fn failure_midway_does_not_abort() {
        let tracker = ScriptedTracker::new(vec![
            Some(200),
            Some(500),
            Some(200),
            Some(200),
            Some(200),
        ]);
        let tally = replay(&tracker, "abc123", 5, SuccessPolicy::Exact200).await;
        assert_eq!(tracker.call_count(), 5);
        assert_eq!(tally, ReplayTally { succeeded: 4, failed: 1 });
        assert!(tracker.calls.borrow().iter().all(|id| id == "abc123"));
    }

    #[tokio::test]
    async fn transport_errors_are_tallied_as_failures() {
        let tracker = ScriptedTracker::new(vec![None, Some(200), None]);
        let tally = replay(&tracker, "abc123", 3, SuccessPolicy::Exact200).await;
        assert_eq!(tracker.call_count(), 3);
        assert_eq!(tally, ReplayTally { succeeded: 1, failed: 2 });
        assert_eq!(tally.total(), 3);
    }

    #[tokio::test]
    async fn every_call_failing_still_issues_count() {
        let tracker = ScriptedTracker::new(vec![Some(401); 7]);
        let tally = replay(&tracker, "abc123", 7, SuccessPolicy::Any2xx).await;
        assert_eq!(tracker.call_count(), 7);
        assert_eq!(tally, ReplayTally { succeeded: 0, failed: 7 });
    }

    #[tokio::test]
    async fn policy_decides_201() {
        let tracker = ScriptedTracker::new(vec![Some(201), Some(201)]);
        let strict = replay(&tracker, "t", 2, SuccessPolicy::Exact200).await;
        assert_eq!(strict, ReplayTally { succeeded: 0, failed: 2 });

        let tracker = ScriptedTracker::new(vec![Some(201), Some(201)]);
        let lenient = replay(&tracker, "t", 2, SuccessPolicy::Any2xx).await;
        assert_eq!(lenient, ReplayTally { succeeded: 2, failed: 0 });
    }
}
