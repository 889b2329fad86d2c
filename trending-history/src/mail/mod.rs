//! Email delivery.
//!
//! [`Mailer`] is the seam between digest composition and transport.
//! [`SmtpMailer`] is the production implementation; [`DryRunMailer`] only logs.

mod config;
mod error;

pub use config::{MailConfig, DEFAULT_SMTP_PORT, DEFAULT_SMTP_SERVER};
pub use error::MailError;

use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::future::Future;
use tracing::{debug, info};

/// A rendered HTML email addressed to one recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    /// Recipient address.
    pub to: String,

    /// Subject line.
    pub subject: String,

    /// HTML body.
    pub html: String,
}

/// Delivers emails.
pub trait Mailer {
    /// Sends one email.
    fn send(&self, mail: &OutgoingMail) -> impl Future<Output = Result<(), MailError>> + Send;
}

/// Sends mail through an SMTP relay using STARTTLS.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
}

impl SmtpMailer {
    /// Creates a mailer from the given settings.
    ///
    /// # Errors
    ///
    /// Returns [`MailError`] if the sender address or relay can't be configured.
    pub fn new(config: &MailConfig) -> Result<Self, MailError> {
        let sender = parse_mailbox(&config.sender)?;
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.server)?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        debug!(server = %config.server, port = config.port, "Configured SMTP transport");
        Ok(Self { transport, sender })
    }
}

impl Mailer for SmtpMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        let message = Message::builder()
            .from(self.sender.clone())
            .to(parse_mailbox(&mail.to)?)
            .subject(mail.subject.as_str())
            .header(ContentType::TEXT_HTML)
            .body(mail.html.clone())?;

        self.transport.send(message).await?;
        info!(to = %mail.to, "Email sent");
        Ok(())
    }
}

/// Logs each email instead of sending it; used for dry runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunMailer;

impl Mailer for DryRunMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        info!(to = %mail.to, subject = %mail.subject, "[DRY RUN] Would send email");
        Ok(())
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, MailError> {
    address
        .parse::<Mailbox>()
        .map_err(|e| MailError::InvalidAddress {
            address: address.to_string(),
            source: e,
        })
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_sender() {
        let config = MailConfig {
            server: "localhost".to_string(),
            port: 2525,
            username: "u".to_string(),
            password: "p".to_string(),
            sender: "not an address".to_string(),
        };

        assert!(matches!(
            SmtpMailer::new(&config),
            Err(MailError::InvalidAddress { .. })
        ));
    }
}
