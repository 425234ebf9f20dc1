use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request for {url} returned status {status}")]
    HttpStatus {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Invalid email message: {0}")]
    Email(#[from] lettre::error::Error),

    #[error("SMTP authentication failed: {0}")]
    SmtpAuth(lettre::transport::smtp::Error),

    #[error("SMTP error: {0}")]
    Smtp(lettre::transport::smtp::Error),
}

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;
