//! Run summary and the optional remote error-reporting sink.

use chrono::NaiveDate;
use reqwest::Client;
use serde::Serialize;
use serde_json::json;
use std::fmt;

use crate::replay::ReplayTally;

/// What one run did. Built only by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub date: NaiveDate,
    pub total_steps: i64,
    pub increment_count: u64,
    pub task_id: Option<String>,
    pub succeeded: u64,
    pub failed: u64,
}

impl RunSummary {
    pub(crate) fn new(
        date: NaiveDate,
        total_steps: i64,
        increment_count: u64,
        task_id: Option<String>,
        tally: ReplayTally,
    ) -> Self {
        Self {
            date,
            total_steps,
            increment_count,
            task_id,
            succeeded: tally.succeeded,
            failed: tally.failed,
        }
    }

    pub fn task_found(&self) -> bool {
        self.task_id.is_some()
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} steps, {} increments, task {}, {} succeeded, {} failed",
            self.date,
            self.total_steps,
            self.increment_count,
            self.task_id.as_deref().unwrap_or("<not found>"),
            self.succeeded,
            self.failed
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportLevel {
    Info,
    Warning,
    Error,
}

/// Best-effort mirror of run messages to an external service.
///
/// Implementations must not fail the run: delivery problems are logged and
/// dropped.
#[allow(async_fn_in_trait)]
pub trait Reporter {
    async fn report(&self, level: ReportLevel, message: &str);
}

/// Message reported when a run for `today` ends in an error.
pub fn failure_message(today: NaiveDate, err: &impl fmt::Display) -> String {
    format!("fitsync run for {today} failed: {err}")
}

/// Used when no webhook is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopReporter;

impl Reporter for NoopReporter {
    async fn report(&self, _level: ReportLevel, _message: &str) {}
}

/// Posts `{level, message, source, timestamp}` JSON to a webhook.
pub struct WebhookReporter {
    webhook_url: String,
    http: Client,
}

impl WebhookReporter {
    pub fn new(webhook_url: impl Into<String>) -> Self {
        Self {
            webhook_url: webhook_url.into(),
            http: Client::new(),
        }
    }

    async fn post(&self, level: ReportLevel, message: &str) -> Result<(), String> {
        let body = json!({
            "level": level,
            "message": message,
            "source": "fitsync",
            "timestamp": chrono::Utc::now().to_rfc3339(),
        });

        let resp = self
            .http
            .post(&self.webhook_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if resp.status().is_success() {
            Ok(())
        } else {
            Err(format!("HTTP {}", resp.status()))
        }
    }
}

impl Reporter for WebhookReporter {
    async fn report(&self, level: ReportLevel, message: &str) {
        if let Err(e) = self.post(level, message).await {
            tracing::warn!("Failed to deliver report to error tracker: {e}");
        }
    }
}

/// Either sink, chosen from configuration.
pub enum ConfiguredReporter {
    Noop(NoopReporter),
    Webhook(WebhookReporter),
}

impl ConfiguredReporter {
    /// Webhook when `url` is set and non-blank, otherwise no-op.
    pub fn from_url(url: Option<&str>) -> Self {
        match url.map(str::trim).filter(|u| !u.is_empty()) {
            Some(url) => ConfiguredReporter::Webhook(WebhookReporter::new(url)),
            None => ConfiguredReporter::Noop(NoopReporter),
        }
    }
}

impl Reporter for ConfiguredReporter {
    async fn report(&self, level: ReportLevel, message: &str) {
        match self {
            ConfiguredReporter::Noop(r) => r.report(level, message).await,
            ConfiguredReporter::Webhook(r) => r.report(level, message).await,
        }
    }
}
