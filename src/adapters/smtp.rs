//! SMTP delivery via lettre. One connection per message, STARTTLS, no pooling.

use crate::config::SmtpSettings;
use crate::domain::ports::MailTransport;
use crate::utils::error::SendError;
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

pub struct SmtpMailer {
    settings: SmtpSettings,
}

impl SmtpMailer {
    pub fn new(settings: SmtpSettings) -> Self {
        Self { settings }
    }

    fn sender_mailbox(&self) -> Result<Mailbox, SendError> {
        let address: Address = self.settings.sender_email.parse().map_err(
            |e: lettre::address::AddressError| SendError::InvalidAddress {
                address: self.settings.sender_email.clone(),
                reason: e.to_string(),
            },
        )?;
        Ok(Mailbox::new(self.settings.sender_name.clone(), address))
    }

    fn build_message(&self, to: &str, subject: &str, body: &str) -> Result<Message, SendError> {
        let recipient: Mailbox =
            to.parse()
                .map_err(|e: lettre::address::AddressError| SendError::InvalidAddress {
                    address: to.to_string(),
                    reason: e.to_string(),
                })?;

        Message::builder()
            .from(self.sender_mailbox()?)
            .to(recipient)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| SendError::Message(e.to_string()))
    }

    /// 每次發送都建立新的 transport；離開此函式即釋放連線
    fn connect(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, SendError> {
        let creds = Credentials::new(
            self.settings.sender_email.clone(),
            self.settings.sender_password.clone(),
        );

        Ok(
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.settings.host)
                .map_err(|e| SendError::Connection(format!("SMTP relay error: {e}")))?
                .port(self.settings.port)
                .timeout(Some(self.settings.timeout))
                .credentials(creds)
                .build(),
        )
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), SendError> {
        let email = self.build_message(to, subject, body)?;
        let transport = self.connect()?;

        transport.send(email).await.map_err(|e| {
            if e.is_permanent() {
                SendError::Rejected(e.to_string())
            } else {
                SendError::Connection(e.to_string())
            }
        })?;

        tracing::debug!("SMTP session for {} closed", to);
        Ok(())
    }
}

/// `--dry-run` 使用：只記錄預覽，不連線
#[derive(Debug, Default)]
pub struct DryRunMailer;

#[async_trait]
impl MailTransport for DryRunMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), SendError> {
        tracing::info!("📝 [dry-run] To: {} | Subject: {}", to, subject);
        tracing::debug!("📝 [dry-run] Body:\n{}", body);
        Ok(())
    }
}
