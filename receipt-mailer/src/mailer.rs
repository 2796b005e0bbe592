use crate::receipt::{ReceiptEmail, SendEmailRequest, Sender};
use crate::{Email, MailerConfig, MailerError, MessageId};
use async_trait::async_trait;

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_email(&self, email: Email) -> Result<MessageId, MailerError>;
}

#[async_trait]
impl<T: Mailer + ?Sized> Mailer for Box<T> {
    async fn send_email(&self, email: Email) -> Result<MessageId, MailerError> {
        (**self).send_email(email).await
    }
}

/// Sends rendered receipts through a configured transport.
pub struct ReceiptMailer {
    transport: Box<dyn Mailer>,
    sender: Sender,
}

impl ReceiptMailer {
    pub fn new(config: &MailerConfig) -> Result<Self, MailerError> {
        Ok(Self {
            transport: config.build_transport()?,
            sender: config.sender(),
        })
    }

    pub fn from_env() -> Result<Self, MailerError> {
        Self::new(&MailerConfig::from_env()?)
    }

    pub fn with_transport<T: Mailer + 'static>(transport: T, sender: Sender) -> Self {
        Self {
            transport: Box::new(transport),
            sender,
        }
    }

    pub fn sender(&self) -> &Sender {
        &self.sender
    }

    pub async fn send(&self, request: &SendEmailRequest) -> Result<MessageId, MailerError> {
        let email = ReceiptEmail::build(&self.sender, request)?;

        match self.transport.send_email(email).await {
            Ok(id) => {
                tracing::info!(message.id = %id, "Sent receipt email");
                Ok(id)
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to send receipt email");
                Err(e)
            }
        }
    }
}
