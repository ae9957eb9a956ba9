//! # Outbound Mail Transport
//!
//! The mail dependency behind a seam: [`Mailer`] is what the dispatcher
//! talks to, [`SmtpMailer`] is the production implementation over lettre's
//! async SMTP transport. Relay host and credentials come from
//! configuration; call sites only ever hand over a composed message.

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;

use crate::configs::config_alerter::AlerterConfig;

/// One outbound alert message, fully composed.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertEmail {
    pub sender: String,
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Error)]
pub enum MailerError {
    /// The message could not be built (bad address, invalid header).
    #[error("Invalid mail message: {0}")]
    Message(String),

    /// The transport refused or failed the send.
    #[error("SMTP transport error: {0}")]
    Transport(String),
}

/// Anything able to deliver one [`AlertEmail`].
///
/// A send that returns `Ok` is assumed delivered; there is no confirmation
/// polling on top of the transport's answer.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &AlertEmail) -> Result<(), MailerError>;
}

/// Production mailer over an async SMTP relay.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    /// Builds the transport from the configured relay; credentials are
    /// attached only when a username is configured.
    pub fn from_config(config: &AlerterConfig) -> Result<Self, MailerError> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp.relay)
            .map_err(|e| MailerError::Transport(e.to_string()))?;

        if !config.smtp.username.is_empty() {
            builder = builder.credentials(Credentials::new(
                config.smtp.username.clone(),
                config.smtp.password.clone(),
            ));
        }

        Ok(Self {
            transport: builder.build(),
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: &AlertEmail) -> Result<(), MailerError> {
        let from: Mailbox = email
            .sender
            .parse()
            .map_err(|e| MailerError::Message(format!("sender address: {e}")))?;
        let to: Mailbox = email
            .recipient
            .parse()
            .map_err(|e| MailerError::Message(format!("recipient address: {e}")))?;

        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(email.subject.clone())
            .body(email.body.clone())
            .map_err(|e| MailerError::Message(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| MailerError::Transport(e.to_string()))?;
        Ok(())
    }
}
