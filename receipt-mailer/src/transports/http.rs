use crate::{Email, Mailer, MailerError, MessageId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://api.resend.com";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Delivers email through a transactional email HTTP API.
///
/// Speaks the common `POST {api_url}/emails` JSON shape with bearer
/// authentication and an `{"id": ...}` response.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
}

#[derive(Debug, Serialize)]
struct SendPayload<'a> {
    from: &'a str,
    to: &'a [String],
    subject: &'a str,
    html: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    message: Option<String>,
    error: Option<String>,
}

impl HttpTransport {
    pub fn new<S: Into<String>>(api_key: S) -> Result<Self, MailerError> {
        Self::with_api_url(api_key, DEFAULT_API_URL)
    }

    pub fn with_api_url<K, U>(api_key: K, api_url: U) -> Result<Self, MailerError>
    where
        K: Into<String>,
        U: Into<String>,
    {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(MailerError::Config("Email API key is empty".to_string()));
        }

        let client = reqwest::ClientBuilder::new()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

#[async_trait]
impl Mailer for HttpTransport {
    async fn send_email(&self, email: Email) -> Result<MessageId, MailerError> {
        let payload = SendPayload {
            from: &email.from,
            to: &email.to,
            subject: &email.subject,
            html: &email.html,
            text: email.text.as_deref(),
        };

        let response = self
            .client
            .post(format!("{}/emails", self.api_url))
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = ?e, "Failed to reach email API");
                MailerError::Http(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), "Email API rejected the request");
            return Err(MailerError::Provider {
                status: status.as_u16(),
                message: provider_message(&body, status),
            });
        }

        let sent: SendResponse = response.json().await?;
        Ok(MessageId(sent.id))
    }
}

/// The provider's own error text, falling back to the raw body.
fn provider_message(body: &str, status: reqwest::StatusCode) -> String {
    if let Ok(error) = serde_json::from_str::<ProviderError>(body) {
        if let Some(message) = error.message.or(error.error) {
            return message;
        }
    }

    if body.trim().is_empty() {
        format!("Email API returned {status}")
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_key() {
        let err = HttpTransport::new("  ").unwrap_err();
        assert!(matches!(err, MailerError::Config(_)));
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let transport = HttpTransport::with_api_url("key", "http://localhost:1234/").unwrap();
        assert_eq!(transport.api_url(), "http://localhost:1234");
    }

    #[test]
    fn test_provider_message() {
        let status = reqwest::StatusCode::UNPROCESSABLE_ENTITY;
        assert_eq!(
            provider_message(r#"{"statusCode":422,"message":"Invalid `to` field"}"#, status),
            "Invalid `to` field"
        );
        assert_eq!(provider_message(r#"{"error":"quota"}"#, status), "quota");
        assert_eq!(provider_message("upstream down", status), "upstream down");
        assert_eq!(
            provider_message("", status),
            "Email API returned 422 Unprocessable Entity"
        );
    }
}
