//! Email service for delivering invitation links.
//!
//! Supported providers:
//! - `console`: Logs emails to console (development)
//! - `sendgrid`: Uses the SendGrid API
//!
//! Delivery is fire-and-forget from the caller's perspective: a failed send
//! is reported back as `notification_sent: false` on an otherwise-successful
//! issuance, never as a hard failure.

use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::config::EmailConfig;

/// Errors that can occur during email operations.
#[derive(Debug, Error)]
pub enum EmailError {
    #[error("Email service not configured")]
    NotConfigured,

    #[error("Failed to send email: {0}")]
    SendFailed(String),

    #[error("Provider error: {0}")]
    ProviderError(String),
}

/// Email message to be sent.
#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub to: String,
    pub to_name: Option<String>,
    pub subject: String,
    pub body_text: String,
}

/// Email service for sending transactional emails.
#[derive(Clone)]
pub struct EmailService {
    config: Arc<EmailConfig>,
    app_base_url: String,
}

impl EmailService {
    pub fn new(config: EmailConfig, app_base_url: String) -> Self {
        Self {
            config: Arc::new(config),
            app_base_url,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Builds the invitation link the recipient follows to accept.
    pub fn invite_url(&self, secret: &str) -> String {
        format!("{}/invite/{}", self.app_base_url, secret)
    }

    /// Sends an invitation email carrying the one-time invitation link.
    pub async fn send_invitation_email(
        &self,
        to: &str,
        to_name: &str,
        organization_name: &str,
        secret: &str,
    ) -> Result<(), EmailError> {
        let invite_url = self.invite_url(secret);
        let message = EmailMessage {
            to: to.to_string(),
            to_name: Some(to_name.to_string()),
            subject: format!("You're invited to join {}", organization_name),
            body_text: format!(
                "Hello {},\n\n\
                 You have been invited to join {} on the directory platform.\n\
                 Follow this link to create your account:\n\n{}\n\n\
                 The link expires; if it no longer works, ask the sender to \
                 reissue the invitation.",
                to_name, organization_name, invite_url
            ),
        };

        self.send(message).await
    }

    /// Sends an email message through the configured provider.
    pub async fn send(&self, message: EmailMessage) -> Result<(), EmailError> {
        if !self.config.enabled {
            debug!(
                to = %message.to,
                subject = %message.subject,
                "Email service disabled, skipping send"
            );
            return Ok(());
        }

        match self.config.provider.as_str() {
            "console" => self.send_console(message),
            "sendgrid" => self.send_sendgrid(message).await,
            provider => {
                error!(provider = %provider, "Unknown email provider");
                Err(EmailError::NotConfigured)
            }
        }
    }

    /// Console provider - logs the email (for development).
    fn send_console(&self, message: EmailMessage) -> Result<(), EmailError> {
        info!(
            to = %message.to,
            to_name = ?message.to_name,
            subject = %message.subject,
            from = %self.config.sender_email,
            from_name = %self.config.sender_name,
            "Email (console provider)"
        );
        info!(body_text = %message.body_text, "Email body");
        Ok(())
    }

    /// SendGrid provider - sends via the SendGrid API.
    async fn send_sendgrid(&self, message: EmailMessage) -> Result<(), EmailError> {
        if self.config.sendgrid_api_key.is_empty() {
            return Err(EmailError::NotConfigured);
        }

        let client = reqwest::Client::new();

        let mut to = serde_json::json!({ "email": message.to });
        if let Some(name) = &message.to_name {
            to["name"] = serde_json::json!(name);
        }

        let body = serde_json::json!({
            "personalizations": [{ "to": [to] }],
            "from": {
                "email": self.config.sender_email,
                "name": self.config.sender_name
            },
            "subject": message.subject,
            "content": [{
                "type": "text/plain",
                "value": message.body_text
            }]
        });

        let response = client
            .post("https://api.sendgrid.com/v3/mail/send")
            .header(
                "Authorization",
                format!("Bearer {}", self.config.sendgrid_api_key),
            )
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| EmailError::SendFailed(format!("SendGrid request failed: {}", e)))?;

        if response.status().is_success() {
            info!(to = %message.to, subject = %message.subject, "Email sent via SendGrid");
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
