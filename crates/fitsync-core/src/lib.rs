//! # fitsync Core Library
//!
//! Turns yesterday's Google Fit step count into Habitica task increments.
//! The CLI binary is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Window**: two-day lookback window keyed in nanoseconds since epoch
//! - **Integrations**: Google Fit (OAuth2) and Habitica (static API headers)
//!   clients behind the [`FitnessSource`] and [`HabitTracker`] traits
//! - **Aggregation**: step total and floor-divided increment count
//! - **Replay**: sequential score-up calls that tally failures instead of
//!   aborting
//! - **Storage**: TOML configuration and the OAuth token cache file
//!
//! ## Key Components
//!
//! - [`RunOrchestrator`]: sequences one sync run and builds the [`RunSummary`]
//! - [`Config`]: application configuration
//! - [`CoreError`]: error hierarchy

pub mod aggregate;
pub mod credentials;
pub mod error;
pub mod integrations;
pub mod models;
pub mod orchestrator;
pub mod replay;
pub mod report;
pub mod resolver;
pub mod storage;
pub mod window;

pub use aggregate::{increment_count, total_steps};
pub use error::{ApiError, ConfigError, CoreError, OAuthError};
pub use integrations::{FitnessSource, HabitTracker, TaskListing};
pub use models::{PointSeries, PointValue, StepPoint, Task};
pub use orchestrator::{LiveOrchestrator, RunOrchestrator};
pub use replay::{IncrementOutcome, ReplayTally, SuccessPolicy};
pub use report::{ReportLevel, Reporter, RunSummary};
pub use resolver::find_task;
pub use storage::{Config, TokenCache};
pub use window::{compute_window, TimeWindow};
