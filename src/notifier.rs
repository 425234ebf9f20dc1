use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::info;

use crate::Result;
use crate::config::AppConfig;
use crate::models::AlertMessage;
use crate::utils::error::AppError;

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, message: &AlertMessage) -> Result<()>;
}

/// Submits plain-text alerts over an authenticated STARTTLS session.
pub struct EmailNotifier {
    smtp_server: String,
    smtp_port: u16,
    sender: String,
    receiver: String,
    password: String,
}

impl EmailNotifier {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            smtp_server: config.smtp_server.clone(),
            smtp_port: config.smtp_port,
            sender: config.email_sender.clone(),
            receiver: config.email_receiver.clone(),
            password: config.email_password.clone(),
        }
    }

    fn build_message(&self, message: &AlertMessage) -> Result<Message> {
        Ok(Message::builder()
            .from(self.sender.parse()?)
            .to(self.receiver.parse()?)
            .subject(message.subject.clone())
            .header(ContentType::TEXT_PLAIN)
            .body(message.body.clone())?)
    }
}

// 535 is the canonical bad-credentials reply
fn is_auth_failure(error: &smtp::Error) -> bool {
    error.status().is_some_and(|code| code.to_string() == "535")
}

#[async_trait]
impl Notifier for EmailNotifier {
    async fn notify(&self, message: &AlertMessage) -> Result<()> {
        let email = self.build_message(message)?;
        let credentials = Credentials::new(self.sender.clone(), self.password.clone());

        // Unpooled transport: the session opens for this one submission and
        // closes when the transport drops, whether the send worked or not.
        let mailer = SmtpTransport::starttls_relay(&self.smtp_server)
            .map_err(AppError::Smtp)?
            .port(self.smtp_port)
            .credentials(credentials)
            .build();

        match mailer.send(&email) {
            Ok(_) => {
                info!(receiver = %self.receiver, "alert email sent");
                Ok(())
            }
            Err(e) if is_auth_failure(&e) => Err(AppError::SmtpAuth(e)),
            Err(e) => Err(AppError::Smtp(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn test_config() -> AppConfig {
        AppConfig {
            product_url: "https://example.com/product/123".to_string(),
            price_threshold: 40000.0,
            smtp_server: "smtp.gmail.com".to_string(),
            smtp_port: 587,
            email_sender: "sender@example.com".to_string(),
            email_receiver: "receiver@example.com".to_string(),
            email_password: "app-password".to_string(),
            check_interval_secs: 86400,
            user_agent: "TestAgent/1.0".to_string(),
            output_file: PathBuf::from("products.json"),
        }
    }

    fn sample_alert() -> AlertMessage {
        AlertMessage {
            subject: "Price Drop Alert for Noise Cancelling Headphones".to_string(),
            body: "The price has dropped to $35999.00.".to_string(),
        }
    }

    #[test]
    fn test_build_message_with_valid_addresses() {
        let notifier = EmailNotifier::new(&test_config());
        let message = notifier.build_message(&sample_alert()).unwrap();

        let envelope = message.envelope();
        assert_eq!(envelope.to().len(), 1);
        assert_eq!(envelope.to()[0].to_string(), "receiver@example.com");
    }

    #[test]
    fn test_build_message_rejects_invalid_sender() {
        let mut config = test_config();
        config.email_sender = "not an address".to_string();

        let notifier = EmailNotifier::new(&config);
        let result = notifier.build_message(&sample_alert());

        assert!(matches!(result, Err(AppError::Address(_))));
    }
}
