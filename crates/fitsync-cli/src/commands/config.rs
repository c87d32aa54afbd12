use clap::Subcommand;
use fitsync_core::Config;

use super::GlobalOpts;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Dot-separated key (e.g. "step_divisor", "endpoints.habitica")
        key: String,
    },
    /// Print the effective configuration as TOML
    Show,
    /// Print the config file location
    Path,
    /// Write the default configuration
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

pub fn run(opts: &GlobalOpts, action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let config = opts.load_config()?;
            match config.get(&key) {
                Some(value) => println!("{value}"),
                None => return Err(format!("unknown key: {key}").into()),
            }
        }
        ConfigAction::Show => {
            let config = opts.load_config()?;
            print!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigAction::Path => {
            let path = match &opts.config {
                Some(p) => p.clone(),
                None => Config::default_path()?,
            };
            println!("{}", path.display());
        }
        ConfigAction::Init { force } => {
            let path = match &opts.config {
                Some(p) => p.clone(),
                None => Config::default_path()?,
            };
            if path.exists() && !force {
                return Err(format!("{} already exists (use --force)", path.display()).into());
            }
            Config::default().save(&path)?;
            println!("wrote {}", path.display());
        }
    }
    Ok(())
}
