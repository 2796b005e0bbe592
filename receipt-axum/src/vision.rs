//! Image-to-template conversion.
//!
//! Turning a photographed receipt into an HTML template is delegated to an
//! OpenAI-compatible vision model. The result is treated exactly like a
//! template a user pasted in: it is parsed for `{{NAME}}` placeholders and
//! nothing else about it is trusted.

use async_trait::async_trait;
use receipt_core::data_url;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_VISION_API_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_VISION_MODEL: &str = "gpt-4o";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

const INSTRUCTIONS: &str = "You convert photos and screenshots of purchase receipts into reusable HTML email templates. \
Reproduce the layout, colors and wording as a single self-contained HTML document with inline-friendly CSS in a <style> tag. \
Replace every customer-, order- or seller-specific value with a placeholder of the form {{UPPER_SNAKE_CASE}}, \
for example {{BUYER_NAME}}, {{ORDER_ID}}, {{DATE_PAID}}, {{TOTAL_AMOUNT}}, {{SELLER_EMAIL}} or {{SELLER_LOGO_URL}}. \
Use image placeholders as <img> src values. Never use double braces for anything else. \
Reply with the HTML document only.";

#[derive(Debug, Error)]
pub enum VisionError {
    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("{message}")]
    Provider { status: u16, message: String },

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("The vision model returned no HTML")]
    EmptyResponse,

    #[error("Configuration error: {0}")]
    Config(String),
}

/// An uploaded receipt photo.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub content_type: String,
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadedImage {
    pub fn validate(&self) -> Result<(), VisionError> {
        if self.bytes.is_empty() {
            return Err(VisionError::InvalidImage("the upload is empty".to_string()));
        }

        if !self.content_type.starts_with("image/") {
            return Err(VisionError::InvalidImage(format!(
                "expected an image, got {}",
                self.content_type
            )));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertedTemplate {
    pub html: String,
}

#[async_trait]
pub trait ImageConverter: Send + Sync {
    async fn convert(&self, image: UploadedImage) -> Result<ConvertedTemplate, VisionError>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisionConfig {
    pub api_url: String,
    pub api_key: String,
    pub model: String,
}

impl VisionConfig {
    /// `None` when no API key is configured.
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("RECEIPT_VISION_API_KEY").filter(|key| !key.trim().is_empty())?;

        Some(Self {
            api_url: lookup("RECEIPT_VISION_API_URL")
                .unwrap_or_else(|| DEFAULT_VISION_API_URL.to_string()),
            api_key,
            model: lookup("RECEIPT_VISION_MODEL")
                .unwrap_or_else(|| DEFAULT_VISION_MODEL.to_string()),
        })
    }
}

pub struct OpenAiImageConverter {
    client: reqwest::Client,
    config: VisionConfig,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: Vec<ContentPart<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart<'a> {
    Text { text: &'a str },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl OpenAiImageConverter {
    pub fn new(config: VisionConfig) -> Result<Self, VisionError> {
        if config.api_key.trim().is_empty() {
            return Err(VisionError::Config("vision API key is empty".to_string()));
        }

        let client = reqwest::ClientBuilder::new()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            config: VisionConfig {
                api_url: config.api_url.trim_end_matches('/').to_string(),
                ..config
            },
        })
    }
}

#[async_trait]
impl ImageConverter for OpenAiImageConverter {
    async fn convert(&self, image: UploadedImage) -> Result<ConvertedTemplate, VisionError> {
        image.validate()?;

        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: vec![ContentPart::Text { text: INSTRUCTIONS }],
                },
                ChatMessage {
                    role: "user",
                    content: vec![
                        ContentPart::Text {
                            text: "Convert this receipt into an HTML email template.",
                        },
                        ContentPart::ImageUrl {
                            image_url: ImageUrl {
                                url: data_url(&image.content_type, &image.bytes),
                            },
                        },
                    ],
                },
            ],
            max_tokens: 4096,
        };

        tracing::info!(
            model = %self.config.model,
            bytes = image.bytes.len(),
            file_name = image.file_name.as_deref().unwrap_or("unknown"),
            "Requesting image-to-HTML conversion"
        );

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.api_url))
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = ?e, "Failed to reach vision API");
                VisionError::Http(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), "Vision API returned error status");
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|parsed| parsed.error.message)
                .unwrap_or(body);
            return Err(VisionError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        let reply: ChatResponse = response.json().await?;
        let content = reply
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        let html = strip_code_fence(&content);
        if html.is_empty() {
            return Err(VisionError::EmptyResponse);
        }

        Ok(ConvertedTemplate {
            html: html.to_string(),
        })
    }
}

/// Models like to wrap documents in ```html fences.
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };

    body.trim_end().trim_end_matches("```").trim()
}
