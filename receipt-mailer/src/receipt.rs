use crate::{Email, MailerError, text::html_to_text};
use serde::{Deserialize, Serialize};

/// A request to deliver an already rendered receipt.
///
/// Serialized field names match the hand-off draft: `to`, `subject`,
/// `fromName`, `fromEmail`, `html`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendEmailRequest {
    #[serde(default)]
    pub to: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_email: Option<String>,
    #[serde(default)]
    pub html: String,
}

impl SendEmailRequest {
    pub fn new<T, S, H>(to: T, subject: S, html: H) -> Self
    where
        T: Into<String>,
        S: Into<String>,
        H: Into<String>,
    {
        Self {
            to: to.into(),
            subject: subject.into(),
            html: html.into(),
            ..Default::default()
        }
    }

    pub fn from_name<S: Into<String>>(mut self, name: S) -> Self {
        self.from_name = Some(name.into());
        self
    }

    pub fn from_email<S: Into<String>>(mut self, email: S) -> Self {
        self.from_email = Some(email.into());
        self
    }

    pub fn validate(&self) -> Result<(), MailerError> {
        let missing: Vec<&str> = [
            ("to", &self.to),
            ("subject", &self.subject),
            ("html", &self.html),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(MailerError::Builder(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )))
        }
    }
}

/// Who a receipt appears to come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sender {
    pub address: String,
    pub name: Option<String>,
}

impl Sender {
    pub fn new<S: Into<String>>(address: S) -> Self {
        Self {
            address: address.into(),
            name: None,
        }
    }

    /// Request overrides win over this sender, blank overrides are ignored.
    pub fn overridden_by(&self, request: &SendEmailRequest) -> Sender {
        let non_blank = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        Sender {
            address: non_blank(&request.from_email).unwrap_or_else(|| self.address.clone()),
            name: non_blank(&request.from_name).or_else(|| self.name.clone()),
        }
    }

    pub fn formatted(&self) -> String {
        match &self.name {
            Some(name) => format!("{} <{}>", name, self.address),
            None => self.address.clone(),
        }
    }
}

pub struct ReceiptEmail;

impl ReceiptEmail {
    /// Turn a send request into an [`Email`] with an HTML body and a derived
    /// plain-text alternative.
    pub fn build(sender: &Sender, request: &SendEmailRequest) -> Result<Email, MailerError> {
        request.validate()?;

        let sender = sender.overridden_by(request);
        let email = Email::new(
            sender.formatted(),
            request.to.trim(),
            request.subject.trim(),
            request.html.clone(),
        )
        .with_text(html_to_text(&request.html)?);

        email.validate()?;
        Ok(email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_lists_missing_fields() {
        let err = SendEmailRequest::new("", " ", "<p>x</p>")
            .validate()
            .unwrap_err();
        assert_eq!(err.to_string(), "Missing required fields: to, subject");

        let err = SendEmailRequest::default().validate().unwrap_err();
        assert_eq!(err.to_string(), "Missing required fields: to, subject, html");

        assert!(SendEmailRequest::new("a@b.co", "s", "<p>x</p>").validate().is_ok());
    }

    #[test]
    fn test_request_json_names() {
        let request: SendEmailRequest = serde_json::from_str(
            r#"{"to":"ana@example.com","subject":"Receipt","fromName":"Studio","fromEmail":"hi@studio.co","html":"<p>x</p>"}"#,
        )
        .unwrap();

        assert_eq!(request.from_name.as_deref(), Some("Studio"));
        assert_eq!(request.from_email.as_deref(), Some("hi@studio.co"));
    }

    #[test]
    fn test_sender_overrides() {
        let default_sender = Sender {
            address: "receipts@example.com".to_string(),
            name: Some("Receipts".to_string()),
        };

        let request = SendEmailRequest::new("a@b.co", "s", "h").from_name("Studio North");
        assert_eq!(
            default_sender.overridden_by(&request).formatted(),
            "Studio North <receipts@example.com>"
        );

        let request = SendEmailRequest::new("a@b.co", "s", "h")
            .from_email("hello@studionorth.co")
            .from_name("  ");
        assert_eq!(
            default_sender.overridden_by(&request).formatted(),
            "Receipts <hello@studionorth.co>"
        );

        assert_eq!(Sender::new("x@y.z").formatted(), "x@y.z");
    }

    #[test]
    fn test_build_receipt_email() {
        let request = SendEmailRequest::new(
            "ana@example.com",
            "Your receipt",
            "<p>Thanks for your order, Ana!</p>",
        );
        let email = ReceiptEmail::build(&Sender::new("receipts@example.com"), &request).unwrap();

        assert_eq!(email.to, vec!["ana@example.com"]);
        assert_eq!(email.from, "receipts@example.com");
        assert_eq!(email.text.as_deref(), Some("Thanks for your order, Ana!"));
    }

    #[test]
    fn test_build_rejects_incomplete_request() {
        let request = SendEmailRequest::new("ana@example.com", "", "<p>x</p>");
        let err = ReceiptEmail::build(&Sender::new("r@example.com"), &request).unwrap_err();
        assert!(err.is_invalid_request());
    }
}
