use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Browser automation error: {0}")]
    BrowserError(String),

    #[error("Unrecognized month name {0:?}")]
    UnknownMonth(String),

    #[error("Malformed time string {0:?}")]
    MalformedTime(String),

    #[error("Malformed number {0:?}")]
    MalformedNumber(String),

    #[error("Unexpected confirmation text {0:?}")]
    ConfirmationFormat(String),
}

impl AppError {
    pub fn browser(err: impl std::fmt::Display) -> Self {
        AppError::BrowserError(err.to_string())
    }

    /// Site text the validity engine cannot evaluate aborts the current
    /// location pass instead of risking a bad booking.
    pub fn aborts_location_pass(&self) -> bool {
        matches!(
            self,
            AppError::UnknownMonth(_) | AppError::MalformedTime(_) | AppError::MalformedNumber(_)
        )
    }
}
