use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod logging;

#[derive(Parser)]
#[command(name = "fitsync", version, about = "Sync Google Fit steps to a Habitica task")]
struct Cli {
    /// Path to config.toml (defaults to ~/.config/fitsync/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Increase log verbosity (-v for debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch yesterday's steps and score the configured task
    Run(commands::run::RunArgs),
    /// Print the dataset window for a date
    Window(commands::window::WindowArgs),
    /// Google Fit authorization
    Auth {
        #[command(subcommand)]
        action: commands::auth::AuthAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    let cli = Cli::parse();
    let opts = commands::GlobalOpts {
        config: cli.config,
        verbose: cli.verbose,
    };
    let result = match cli.command {
        Commands::Run(args) => commands::run::run(&opts, args),
        Commands::Window(args) => commands::window::run(&opts, args),
        Commands::Auth { action } => commands::auth::run(&opts, action),
        Commands::Config { action } => commands::config::run(&opts, action),
    };

    if let Err(e) = result {
        if !e.is::<commands::AlreadyLogged>() {
            eprintln!("error: {e}");
        }
        std::process::exit(1);
    }
}
