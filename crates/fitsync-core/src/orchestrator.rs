//! One top-to-bottom sync run.
//!
//! window -> fetch -> aggregate -> increment count -> resolve task -> replay.
//! Nothing is retried. Fetch and auth failures end the run with an error;
//! a missing task ends it early with a summary and no increments.

use chrono::NaiveDate;

use crate::aggregate::{increment_count, total_steps};
use crate::credentials::{ClientSecret, HabitCredentials};
use crate::error::Result;
use crate::integrations::oauth::OAuthConfig;
use crate::integrations::{FitnessSource, GoogleFitClient, HabitTracker, HabiticaClient};
use crate::replay::{replay, ReplayTally};
use crate::report::{
    failure_message, ConfiguredReporter, NoopReporter, ReportLevel, Reporter, RunSummary,
};
use crate::resolver::resolve_task;
use crate::storage::{Config, TokenCache};
use crate::window::compute_window;

pub struct RunOrchestrator<F, H, R = NoopReporter> {
    config: Config,
    fitness: F,
    tracker: H,
    reporter: R,
}

/// Orchestrator wired to the real services.
pub type LiveOrchestrator = RunOrchestrator<GoogleFitClient, HabiticaClient, ConfiguredReporter>;

impl<F: FitnessSource, H: HabitTracker> RunOrchestrator<F, H, NoopReporter> {
    pub fn new(config: Config, fitness: F, tracker: H) -> Self {
        Self {
            config,
            fitness,
            tracker,
            reporter: NoopReporter,
        }
    }
}

impl LiveOrchestrator {
    /// Load both credential files and build the Google Fit and Habitica
    /// clients described by `config`.
    pub fn from_config(config: Config) -> Result<Self> {
        let habit_creds = HabitCredentials::load(&config.credentials.habitica)?;
        let secret = ClientSecret::load(&config.credentials.client_secret)?;

        let oauth = OAuthConfig::for_fitness(&secret, config.oauth.redirect_port);
        let cache = TokenCache::new(&config.credentials.token_cache);
        let fitness = GoogleFitClient::new(&config.endpoints.fitness, oauth, cache);
        let tracker = HabiticaClient::new(
            &config.endpoints.habitica,
            habit_creds,
            config.success_policy,
        );
        let reporter = ConfiguredReporter::from_url(config.error_reporting.webhook_url.as_deref());

        Ok(RunOrchestrator::new(config, fitness, tracker).with_reporter(reporter))
    }
}

impl<F: FitnessSource, H: HabitTracker, R: Reporter> RunOrchestrator<F, H, R> {
    pub fn with_reporter<R2: Reporter>(self, reporter: R2) -> RunOrchestrator<F, H, R2> {
        RunOrchestrator {
            config: self.config,
            fitness: self.fitness,
            tracker: self.tracker,
            reporter,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run once for `today`.
    ///
    /// # Errors
    ///
    /// Authentication, dataset fetch and undecodable responses abort the run.
    /// The error is mirrored to the reporter before it is returned.
    pub async fn execute(&self, today: NaiveDate) -> Result<RunSummary> {
        match self.run(today).await {
            Ok(summary) => Ok(summary),
            Err(e) => {
                tracing::error!("Sync failed: {e}");
                self.reporter
                    .report(ReportLevel::Error, &failure_message(today, &e))
                    .await;
                Err(e)
            }
        }
    }

    async fn run(&self, today: NaiveDate) -> Result<RunSummary> {
        let config = &self.config;

        let window = compute_window(today);
        let series = self
            .fitness
            .fetch_dataset(&config.data_source_id, &window)
            .await?;

        let total = total_steps(&series);
        let count = increment_count(total, config.step_divisor);
        tracing::info!("Total steps: {total}, increments: {count}");

        let Some(task_id) = resolve_task(&self.tracker, &config.task_name).await? else {
            let message = format!("Task '{}' does not exist", config.task_name);
            tracing::warn!("{message}");
            self.reporter.report(ReportLevel::Warning, &message).await;
            return Ok(RunSummary::new(today, total, count, None, ReplayTally::default()));
        };

        tracing::info!("Scoring task {task_id} {count} time(s)");
        let tally = replay(&self.tracker, &task_id, count, config.success_policy).await;
        tracing::info!(
            "Finished: {} succeeded, {} failed",
            tally.succeeded,
            tally.failed
        );

        let summary = RunSummary::new(today, total, count, Some(task_id), tally);
        self.reporter
            .report(ReportLevel::Info, &summary.to_string())
            .await;
        Ok(summary)
    }
}
