use chrono::NaiveDate;
use clap::Args;
use fitsync_core::compute_window;

use super::{resolve_date, GlobalOpts};

#[derive(Args)]
pub struct WindowArgs {
    /// Treat this date as "today" (YYYY-MM-DD)
    #[arg(long)]
    date: Option<NaiveDate>,
}

pub fn run(opts: &GlobalOpts, args: WindowArgs) -> Result<(), Box<dyn std::error::Error>> {
    crate::logging::init(opts.verbose, None)?;
    let window = compute_window(resolve_date(args.date));
    println!("start:   {}", window.start());
    println!("end:     {}", window.end());
    println!("dataset: {}", window.dataset_id());
    Ok(())
}
