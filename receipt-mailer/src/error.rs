use thiserror::Error;

#[derive(Error, Debug)]
pub enum MailerError {
    /// The email provider answered with a non-success status.
    ///
    /// `message` is the provider's own error text, passed through unchanged.
    #[error("{message}")]
    Provider { status: u16, message: String },

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Email address error: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("{0}")]
    Builder(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("File transport error: {0}")]
    File(#[from] lettre::transport::file::Error),

    #[error("Email message error: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MailerError {
    /// Errors caused by the request itself rather than by delivery.
    pub fn is_invalid_request(&self) -> bool {
        matches!(self, MailerError::Builder(_) | MailerError::Address(_))
    }
}

pub type Result<T> = std::result::Result<T, MailerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_message_is_verbatim() {
        let err = MailerError::Provider {
            status: 422,
            message: "The `to` field must be a valid email".to_string(),
        };
        assert_eq!(err.to_string(), "The `to` field must be a valid email");
        assert!(!err.is_invalid_request());
    }

    #[test]
    fn test_builder_is_invalid_request() {
        let err = MailerError::Builder("Missing required fields: to".to_string());
        assert!(err.is_invalid_request());
        assert_eq!(err.to_string(), "Missing required fields: to");
    }
}
