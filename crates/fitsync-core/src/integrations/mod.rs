pub mod google_fit;
pub mod habitica;
pub mod oauth;
pub mod traits;

pub use google_fit::GoogleFitClient;
pub use habitica::HabiticaClient;
pub use traits::{FitnessSource, HabitTracker, TaskListing};

use url::Url;

use crate::error::{ConfigError, Result};

/// Append percent-encoded path segments to a configured base URL.
pub(crate) fn endpoint(base: &str, segments: &[&str]) -> Result<Url> {
    let invalid = |message: String| ConfigError::InvalidValue {
        key: "endpoints".into(),
        message,
    };
    let mut url = Url::parse(base).map_err(|e| invalid(format!("{base}: {e}")))?;
    url.path_segments_mut()
        .map_err(|_| invalid(format!("{base} cannot be a base URL")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}
