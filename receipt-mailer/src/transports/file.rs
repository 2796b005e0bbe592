use crate::{Email, Mailer, MailerError, MessageId};
use async_trait::async_trait;
use lettre::transport::file::FileTransport as LettreFileTransport;
use lettre::message::{MultiPart, SinglePart};
use lettre::{Message, Transport};
use std::path::{Path, PathBuf};

/// Writes each email as an `.eml` file instead of delivering it.
///
/// Meant for local development: nothing leaves the machine and the returned
/// [`MessageId`] is the file's stem.
#[derive(Debug, Clone)]
pub struct FileTransport {
    transport: LettreFileTransport,
    output_dir: PathBuf,
}

impl FileTransport {
    pub fn new<P: AsRef<Path>>(output_dir: P) -> Result<Self, MailerError> {
        let output_dir = output_dir.as_ref().to_path_buf();

        if !output_dir.exists() {
            std::fs::create_dir_all(&output_dir)?;
        }

        let transport = LettreFileTransport::new(&output_dir);

        Ok(Self {
            transport,
            output_dir,
        })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

#[async_trait]
impl Mailer for FileTransport {
    async fn send_email(&self, email: Email) -> Result<MessageId, MailerError> {
        let message = to_message(email)?;
        let transport = self.transport.clone();

        let id = tokio::task::spawn_blocking(move || transport.send(&message))
            .await
            .map_err(|e| MailerError::Builder(format!("Failed to write email: {e}")))??;

        tracing::debug!(message.id = %id, output_dir = %self.output_dir.display(), "Wrote receipt to file");
        Ok(MessageId(id))
    }
}

/// Convert to a MIME message: HTML alone, or text and HTML as alternatives.
fn to_message(email: Email) -> Result<Message, MailerError> {
    email.validate()?;

    let mut builder = Message::builder()
        .from(email.from.parse()?)
        .subject(email.subject);
    for recipient in &email.to {
        builder = builder.to(recipient.parse()?);
    }

    let html = SinglePart::html(email.html);
    let message = match email.text {
        Some(text) => builder.multipart(
            MultiPart::alternative()
                .singlepart(SinglePart::plain(text))
                .singlepart(html),
        )?,
        None => builder.singlepart(html)?,
    };

    Ok(message)
}
