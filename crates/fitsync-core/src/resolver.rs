//! Resolves the configured task name to a Habitica task id.

use crate::error::Result;
use crate::integrations::{HabitTracker, TaskListing};
use crate::models::Task;

/// First task whose name matches `name` case-insensitively. Whole-name
/// matches only.
pub fn find_task<'a>(name: &str, tasks: &'a [Task]) -> Option<&'a Task> {
    let wanted = name.to_lowercase();
    tasks.iter().find(|t| t.text.to_lowercase() == wanted)
}

/// Fetch the task listing once and resolve `name` against it.
///
/// A rejected listing is logged and resolves to `None`; transport and
/// decoding failures propagate.
pub async fn resolve_task<H: HabitTracker>(tracker: &H, name: &str) -> Result<Option<String>> {
    let tasks = match tracker.list_tasks().await? {
        TaskListing::Tasks(tasks) => tasks,
        TaskListing::Rejected { status } => {
            tracing::warn!(status, "Task listing failed with status {status}");
            return Ok(None);
        }
    };

    tracing::debug!(count = tasks.len(), "Fetched task listing");
    Ok(find_task(name, &tasks).map(|t| t.id.clone()))
}
