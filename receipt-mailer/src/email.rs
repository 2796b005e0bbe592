use crate::MailerError;
use serde::{Deserialize, Serialize};

/// Identifier assigned to a sent message by whichever transport delivered it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub String);

impl MessageId {
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A fully addressed HTML email, ready for a transport.
///
/// Receipts are always HTML. The plain-text part is an optional alternative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Email {
    pub fn new<F, T, S, H>(from: F, to: T, subject: S, html: H) -> Self
    where
        F: Into<String>,
        T: Into<String>,
        S: Into<String>,
        H: Into<String>,
    {
        Self {
            from: from.into(),
            to: vec![to.into()],
            subject: subject.into(),
            html: html.into(),
            text: None,
        }
    }

    /// Attach a plain-text alternative. Blank text is ignored.
    pub fn with_text<S: Into<String>>(mut self, text: S) -> Self {
        let text = text.into();
        self.text = (!text.trim().is_empty()).then_some(text);
        self
    }

    pub fn validate(&self) -> Result<(), MailerError> {
        if self.to.is_empty() || self.to.iter().any(|to| to.trim().is_empty()) {
            return Err(MailerError::Builder("Every recipient needs an address".to_string()));
        }

        if self.from.trim().is_empty() {
            return Err(MailerError::Builder("From address is required".to_string()));
        }

        if self.subject.trim().is_empty() {
            return Err(MailerError::Builder("Subject is required".to_string()));
        }

        if self.html.trim().is_empty() {
            return Err(MailerError::Builder("HTML body is required".to_string()));
        }

        Ok(())
    }
}
