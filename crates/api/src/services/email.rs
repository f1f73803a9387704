//! Email delivery for event notifications.
//!
//! Providers:
//! - `console`: logs emails (development)
//! - `sendgrid`: SendGrid v3 mail API

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use domain::services::{EmailNotice, NotificationResult, NotificationSender};
use thiserror::Error;
use tracing::{debug, error, info};

use crate::config::EmailConfig;

const SENDGRID_SEND_URL: &str = "https://api.sendgrid.com/v3/mail/send";

/// Errors that can occur during email operations.
#[derive(Debug, Error)]
pub enum EmailError {
    #[error("Unknown email provider: {0}")]
    UnknownProvider(String),

    #[error("Failed to send email: {0}")]
    SendFailed(String),

    #[error("Provider error: {0}")]
    ProviderError(String),
}

/// Email service sending notification notices through the configured provider.
#[derive(Clone)]
pub struct EmailService {
    config: Arc<EmailConfig>,
    client: reqwest::Client,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();
        Self {
            config: Arc::new(config),
            client,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Deliver a notice. A disabled service reports `Ok(false)`.
    pub async fn deliver(&self, notice: &EmailNotice) -> Result<bool, EmailError> {
        if !self.config.enabled {
            debug!(
                to = %notice.to_email,
                subject = %notice.subject,
                "Email service disabled, skipping send"
            );
            return Ok(false);
        }

        match self.config.provider.as_str() {
            "console" => self.send_console(notice),
            "sendgrid" => self.send_sendgrid(notice).await,
            other => Err(EmailError::UnknownProvider(other.to_string())),
        }?;
        Ok(true)
    }

    fn send_console(&self, notice: &EmailNotice) -> Result<(), EmailError> {
        info!(
            to = %notice.to_email,
            to_name = %notice.to_name,
            subject = %notice.subject,
            from = %self.config.sender_email,
            "Email (console provider)"
        );
        info!(body = %notice.body, "Email body");
        Ok(())
    }

    async fn send_sendgrid(&self, notice: &EmailNotice) -> Result<(), EmailError> {
        let response = self
            .client
            .post(SENDGRID_SEND_URL)
            .bearer_auth(&self.config.sendgrid_api_key)
            .json(&sendgrid_payload(&self.config, notice))
            .send()
            .await
            .map_err(|e| EmailError::SendFailed(format!("SendGrid request failed: {}", e)))?;

        if response.status().is_success() {
            info!(to = %notice.to_email, subject = %notice.subject, "Email sent via SendGrid");
            Ok(())
        } else {
            let status = response.status();
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, error = %error_body, "SendGrid API error");
            Err(EmailError::ProviderError(format!(
                "SendGrid returned {}: {}",
                status, error_body
            )))
        }
    }
}

fn sendgrid_payload(config: &EmailConfig, notice: &EmailNotice) -> serde_json::Value {
    serde_json::json!({
        "personalizations": [{
            "to": [{ "email": notice.to_email, "name": notice.to_name }]
        }],
        "from": {
            "email": config.sender_email,
            "name": config.sender_name
        },
        "subject": notice.subject,
        "content": [{
            "type": "text/plain",
            "value": notice.body
        }]
    })
}

#[async_trait]
impl NotificationSender for EmailService {
    async fn send(&self, notice: &EmailNotice) -> NotificationResult {
        match self.deliver(notice).await {
            Ok(true) => NotificationResult::Sent,
            Ok(false) => NotificationResult::Skipped,
            Err(e) => NotificationResult::Failed(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> EmailConfig {
        EmailConfig {
            enabled: true,
            provider: "console".to_string(),
            sendgrid_api_key: String::new(),
            sender_email: "events@example.com".to_string(),
            sender_name: "Events".to_string(),
        }
    }

    fn notice() -> EmailNotice {
        EmailNotice {
            to_email: "bob@example.com".to_string(),
            to_name: "bob".to_string(),
            subject: "RSVP Status Updated".to_string(),
            body: "Hello".to_string(),
        }
    }

    #[tokio::test]
    async fn test_console_send() {
        let service = EmailService::new(test_config());
        assert!(service.is_enabled());
        assert_eq!(service.send(&notice()).await, NotificationResult::Sent);
    }

    #[tokio::test]
    async fn test_deliver_reports_whether_sent() {
        let service = EmailService::new(test_config());
        let sent = tokio_test::assert_ok!(service.deliver(&notice()).await);
        assert!(sent);

        let mut config = test_config();
        config.provider = "carrier-pigeon".to_string();
        let service = EmailService::new(config);
        tokio_test::assert_err!(service.deliver(&notice()).await);
    }

    #[tokio::test]
    async fn test_disabled_is_skipped() {
        let mut config = test_config();
        config.enabled = false;
        let service = EmailService::new(config);
        assert_eq!(service.send(&notice()).await, NotificationResult::Skipped);
    }

    #[tokio::test]
    async fn test_unknown_provider_fails() {
        let mut config = test_config();
        config.provider = "pigeon".to_string();
        let service = EmailService::new(config);
        assert!(matches!(
            service.send(&notice()).await,
            NotificationResult::Failed(msg) if msg.contains("pigeon")
        ));
    }

    #[test]
    fn test_sendgrid_payload() {
        let payload = sendgrid_payload(&test_config(), &notice());
        assert_eq!(payload["personalizations"][0]["to"][0]["email"], "bob@example.com");
        assert_eq!(payload["from"]["email"], "events@example.com");
        assert_eq!(payload["subject"], "RSVP Status Updated");
        assert_eq!(payload["content"][0]["value"], "Hello");
    }
}
