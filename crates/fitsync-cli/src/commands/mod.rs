pub mod auth;
pub mod config;
pub mod run;
pub mod window;

use std::path::PathBuf;

use chrono::NaiveDate;
use fitsync_core::Config;

use crate::logging::{self, LogGuard};

/// Flags shared by every subcommand.
pub struct GlobalOpts {
    pub config: Option<PathBuf>,
    pub verbose: u8,
}

impl GlobalOpts {
    pub fn load_config(&self) -> Result<Config, Box<dyn std::error::Error>> {
        Ok(Config::load(self.config.as_deref())?)
    }

    /// Load config and start console + file logging at its `log_path`.
    pub fn load_with_logging(&self) -> Result<(Config, LogGuard), Box<dyn std::error::Error>> {
        let config = self.load_config()?;
        let guard = logging::init(self.verbose, Some(&config.log_path))?;
        Ok((config, guard))
    }
}

/// Error that has already gone through tracing to the console and the log
/// file. `main` only sets the exit code for it.
#[derive(Debug)]
pub struct AlreadyLogged;

impl std::fmt::Display for AlreadyLogged {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("sync failed")
    }
}

impl std::error::Error for AlreadyLogged {}

/// `--date` if given, otherwise today's local date.
pub fn resolve_date(date: Option<NaiveDate>) -> NaiveDate {
    date.unwrap_or_else(|| chrono::Local::now().date_naive())
}

pub fn runtime() -> Result<tokio::runtime::Runtime, Box<dyn std::error::Error>> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}
