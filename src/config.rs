use std::path::PathBuf;

use config::Config;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::automation::BrowserKind;
use crate::cli::CliArgs;
use crate::error::AppError;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub webdriver: WebDriverConfig,
    #[serde(default)]
    pub booking: BookingConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct WebDriverConfig {
    /// WebDriver endpoint (geckodriver/chromedriver/safaridriver).
    #[validate(length(min = 1, message = "WebDriver URL cannot be empty"))]
    #[serde(default = "default_webdriver_url")]
    pub url: String,
    #[serde(default)]
    pub browser: BrowserKind,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BookingConfig {
    /// Check only the first offered slot per location, then move on.
    /// Recommended when appointments are sparse.
    #[serde(default = "default_true")]
    pub first_only: bool,
    /// Book the latest acceptable time of an acceptable day instead of
    /// the first.
    #[serde(default)]
    pub latest_time: bool,
    /// Capture the confirmation screen as a PNG after booking.
    #[serde(default)]
    pub save_confirmation: bool,
    #[serde(default = "default_confirmation_path")]
    pub confirmation_path: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Identity + appointment state file.
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,
}

fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_true() -> bool {
    true
}

fn default_confirmation_path() -> PathBuf {
    PathBuf::from("confirmation.png")
}

fn default_data_file() -> PathBuf {
    PathBuf::from("data.txt")
}

impl Default for WebDriverConfig {
    fn default() -> Self {
        Self {
            url: default_webdriver_url(),
            browser: BrowserKind::default(),
        }
    }
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            first_only: true,
            latest_time: false,
            save_confirmation: false,
            confirmation_path: default_confirmation_path(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { data_file: default_data_file() }
    }
}

impl AppConfig {
    /// Layers an optional `config.toml` under CLI overrides.
    pub fn load_with_cli_args(cli_args: &CliArgs) -> Result<Self, AppError> {
        let mut builder = Config::builder()
            .add_source(config::File::with_name("config").required(false));

        if let Some(config_path) = &cli_args.config {
            builder = builder.add_source(config::File::from(config_path.clone()));
        }

        if let Some(url) = &cli_args.webdriver_url {
            builder = builder.set_override("webdriver.url", url.as_str())?;
        }
        if let Some(browser) = &cli_args.browser {
            builder = builder.set_override("webdriver.browser", browser.to_lowercase())?;
        }
        if let Some(first_only) = cli_args.first_only {
            builder = builder.set_override("booking.first_only", first_only)?;
        }
        if let Some(latest_time) = cli_args.latest_time {
            builder = builder.set_override("booking.latest_time", latest_time)?;
        }
        if let Some(save_confirmation) = cli_args.save_confirmation {
            builder = builder.set_override("booking.save_confirmation", save_confirmation)?;
        }
        if let Some(data_file) = &cli_args.data_file {
            builder = builder.set_override("storage.data_file", data_file.to_string_lossy().to_string())?;
        }

        let app_config: AppConfig = builder.build()?.try_deserialize()?;

        app_config.validate().map_err(|e| {
            config::ConfigError::Message(format!("configuration validation failed: {e}"))
        })?;

        Ok(app_config)
    }

    /// `webdriver` is the only section carrying validation rules.
    pub fn validate(&self) -> Result<(), validator::ValidationErrors> {
        validator::Validate::validate(&self.webdriver)?;
        Ok(())
    }
}
