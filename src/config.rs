use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use url::Url;

/// Environment variable holding the SMTP credential. It is deliberately not
/// a recognized config-file key so the secret never ends up on disk.
pub const EMAIL_PASSWORD_VAR: &str = "EMAIL_PASSWORD";

#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Product page to watch.
    #[serde(default)]
    pub product_url: String,
    /// Alert when the extracted price drops strictly below this value.
    #[serde(default = "default_price_threshold")]
    pub price_threshold: f64,
    #[serde(default = "default_smtp_server")]
    pub smtp_server: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    #[serde(default)]
    pub email_sender: String,
    #[serde(default)]
    pub email_receiver: String,
    /// Filled in from [`EMAIL_PASSWORD_VAR`]; a value in the config file is
    /// ignored.
    #[serde(skip)]
    pub email_password: String,
    #[serde(default = "default_check_interval_secs")]
    pub check_interval_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_output_file")]
    pub output_file: PathBuf,
}

fn default_price_threshold() -> f64 {
    f64::INFINITY
}

fn default_smtp_server() -> String {
    "smtp.gmail.com".to_string()
}

fn default_smtp_port() -> u16 {
    587
}

fn default_check_interval_secs() -> u64 {
    // One check per day
    24 * 60 * 60
}

pub fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36"
        .to_string()
}

fn default_output_file() -> PathBuf {
    PathBuf::from("products.json")
}

impl AppConfig {
    /// Loads and validates the configuration. Any error returned here is
    /// fatal to the process: nothing network-facing runs before this
    /// succeeds.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let password = env::var(EMAIL_PASSWORD_VAR).unwrap_or_default();
        Self::load_with_password(path, password)
    }

    fn load_with_password(path: &Path, password: String) -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(File::from(path))
            // Environment variables with prefix "PRICEWATCH_" override file keys
            .add_source(Environment::with_prefix("PRICEWATCH"))
            .build()?;

        let mut config: AppConfig = s.try_deserialize()?;
        config.email_password = password;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.product_url.trim().is_empty() {
            return Err(ConfigError::Message("product_url must be set".into()));
        }

        if Url::parse(&self.product_url).is_err() {
            return Err(ConfigError::Message("product_url is not a valid URL".into()));
        }

        if self.email_sender.trim().is_empty() {
            return Err(ConfigError::Message("email_sender must be set".into()));
        }

        if self.email_receiver.trim().is_empty() {
            return Err(ConfigError::Message("email_receiver must be set".into()));
        }

        if self.email_password.is_empty() {
            return Err(ConfigError::Message(format!(
                "the {EMAIL_PASSWORD_VAR} environment variable must be set"
            )));
        }

        if self.smtp_port == 0 {
            return Err(ConfigError::Message("smtp_port must be greater than 0".into()));
        }

        if self.check_interval_secs == 0 {
            return Err(ConfigError::Message(
                "check_interval_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }
}

// Manual impl so the credential stays out of log output.
impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("product_url", &self.product_url)
            .field("price_threshold", &self.price_threshold)
            .field("smtp_server", &self.smtp_server)
            .field("smtp_port", &self.smtp_port)
            .field("email_sender", &self.email_sender)
            .field("email_receiver", &self.email_receiver)
            .field("email_password", &"<redacted>")
            .field("check_interval_secs", &self.check_interval_secs)
            .field("user_agent", &self.user_agent)
            .field("output_file", &self.output_file)
            .finish()
    }
}
