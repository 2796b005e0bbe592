pub mod config;
pub mod email;
pub mod error;
pub mod mailer;
pub mod receipt;
pub mod text;
pub mod transports;

pub use config::{MailerConfig, TransportConfig};
pub use email::{Email, MessageId};
pub use error::MailerError;
pub use mailer::{Mailer, ReceiptMailer};
pub use receipt::{ReceiptEmail, SendEmailRequest, Sender};
pub use text::html_to_text;
pub use transports::{FileTransport, HttpTransport};

pub mod prelude {
    pub use crate::{
        Email, FileTransport, HttpTransport, Mailer, MailerConfig, MailerError,
        MessageId, ReceiptEmail, ReceiptMailer, SendEmailRequest, Sender,
    };
}
