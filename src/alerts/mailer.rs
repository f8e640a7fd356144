use lettre::message::{Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::debug;

use crate::alerts::renderer::ALERT_SUBJECT;
use crate::config::MailCredentials;
use crate::error::Result;

/// Sends alert documents through an authenticated STARTTLS relay
pub struct Mailer {
    host: String,
    port: u16,
    credentials: MailCredentials,
}

impl Mailer {
    pub fn new(host: &str, port: u16, credentials: MailCredentials) -> Self {
        Self {
            host: host.to_string(),
            port,
            credentials,
        }
    }

    /// Multipart message with a plain-text fallback and the HTML body
    pub fn build_message(&self, html: String, plain: String) -> Result<Message> {
        let from: Mailbox = self.credentials.user.parse()?;
        let to: Mailbox = self.credentials.recipient.parse()?;

        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(ALERT_SUBJECT)
            .multipart(
                MultiPart::alternative()
                    .singlepart(SinglePart::plain(plain))
                    .singlepart(SinglePart::html(html)),
            )?;

        Ok(message)
    }

    pub async fn send(&self, message: Message) -> Result<()> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.host)?
            .port(self.port)
            .credentials(Credentials::new(
                self.credentials.user.clone(),
                self.credentials.password.clone(),
            ))
            .build();

        debug!("Connecting to {}:{}", self.host, self.port);
        transport.send(message).await?;
        Ok(())
    }
}
