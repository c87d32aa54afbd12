use crate::error::Result;
use crate::models::{PointSeries, Task};
use crate::window::TimeWindow;

/// Source of step data. Implemented by the Google Fit client; tests use
/// in-memory fakes.
#[allow(async_fn_in_trait)]
pub trait FitnessSource {
    /// Fetch the dataset for `window` from `data_source_id`.
    ///
    /// Any failure here is fatal to the run.
    async fn fetch_dataset(&self, data_source_id: &str, window: &TimeWindow) -> Result<PointSeries>;
}

/// Outcome of asking the habit tracker for the user's tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskListing {
    Tasks(Vec<Task>),
    /// The service answered with a status the success policy rejects.
    Rejected { status: u16 },
}

/// Habit-tracking service. Credentials are held by the implementor.
#[allow(async_fn_in_trait)]
pub trait HabitTracker {
    /// List all of the user's tasks.
    async fn list_tasks(&self) -> Result<TaskListing>;

    /// Score `task_id` up once and return the HTTP status.
    ///
    /// `Err` means no response was received at all.
    async fn score_up(&self, task_id: &str) -> Result<u16>;
}
