//! The daily sync.

use chrono::NaiveDate;
use clap::Args;
use fitsync_core::report::{failure_message, ConfiguredReporter};
use fitsync_core::{LiveOrchestrator, ReportLevel, Reporter};

use super::{resolve_date, runtime, AlreadyLogged, GlobalOpts};

#[derive(Args)]
pub struct RunArgs {
    /// Treat this date as "today" (YYYY-MM-DD)
    #[arg(long)]
    date: Option<NaiveDate>,
    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(opts: &GlobalOpts, args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let (config, _guard) = opts.load_with_logging()?;
    let today = resolve_date(args.date);
    tracing::info!("Starting sync for {today}");

    let rt = runtime()?;
    let reporter = ConfiguredReporter::from_url(config.error_reporting.webhook_url.as_deref());

    let orchestrator = match LiveOrchestrator::from_config(config) {
        Ok(orchestrator) => orchestrator,
        Err(e) => {
            tracing::error!("Sync failed: {e}");
            rt.block_on(reporter.report(ReportLevel::Error, &failure_message(today, &e)));
            return Err(AlreadyLogged.into());
        }
    };

    // execute() logs and reports its own failures.
    let summary = rt
        .block_on(orchestrator.execute(today))
        .map_err(|_| AlreadyLogged)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{summary}");
    }
    Ok(())
}
