use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Identity/appointment state file path
    #[arg(short, long, value_name = "FILE")]
    pub data_file: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'L', long, value_name = "LEVEL", default_value = "info")]
    pub log_level: String,

    /// WebDriver endpoint URL
    #[arg(long, value_name = "URL")]
    pub webdriver_url: Option<String>,

    /// Browser to drive (firefox, chrome, edge, safari; anything else
    /// falls back to the platform default)
    #[arg(short, long, value_name = "BROWSER")]
    pub browser: Option<String>,

    /// Check only the first offered slot per location
    #[arg(long, value_name = "BOOL")]
    pub first_only: Option<bool>,

    /// Book the latest acceptable time of the day instead of the first
    #[arg(long, value_name = "BOOL")]
    pub latest_time: Option<bool>,

    /// Save the confirmation screen as a PNG after booking
    #[arg(long, value_name = "BOOL")]
    pub save_confirmation: Option<bool>,
}

impl CliArgs {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log level '{}'. Valid levels are: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }

        Ok(())
    }
}
