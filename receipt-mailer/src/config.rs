use crate::receipt::Sender;
use crate::transports::http::DEFAULT_API_URL;
use crate::{FileTransport, HttpTransport, Mailer, MailerError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailerConfig {
    pub transport: TransportConfig,
    pub from_address: String,
    pub from_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransportConfig {
    Http { api_url: String, api_key: String },
    File { output_dir: PathBuf },
}

impl MailerConfig {
    pub fn from_env() -> Result<Self, MailerError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from any variable source, with the names used by
    /// [`MailerConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, MailerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let transport = if let Some(api_key) = lookup("RECEIPT_MAILER_API_KEY") {
            if api_key.trim().is_empty() {
                return Err(MailerError::Config(
                    "RECEIPT_MAILER_API_KEY is set but empty".to_string(),
                ));
            }
            TransportConfig::Http {
                api_url: lookup("RECEIPT_MAILER_API_URL")
                    .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
                api_key,
            }
        } else {
            // Default to file transport for development
            TransportConfig::File {
                output_dir: lookup("RECEIPT_MAILER_FILE_OUTPUT_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("./emails")),
            }
        };

        Ok(Self {
            transport,
            from_address: lookup("RECEIPT_MAILER_FROM_ADDRESS")
                .unwrap_or_else(|| "receipts@example.com".to_string()),
            from_name: lookup("RECEIPT_MAILER_FROM_NAME"),
        })
    }

    pub fn build_transport(&self) -> Result<Box<dyn Mailer>, MailerError> {
        match &self.transport {
            TransportConfig::Http { api_url, api_key } => {
                tracing::info!(api_url = %api_url, "Using HTTP email transport");
                Ok(Box::new(HttpTransport::with_api_url(
                    api_key.clone(),
                    api_url.clone(),
                )?))
            }
            TransportConfig::File { output_dir } => {
                tracing::info!(output_dir = %output_dir.display(), "Using file email transport");
                Ok(Box::new(FileTransport::new(output_dir)?))
            }
        }
    }

    pub fn sender(&self) -> Sender {
        Sender {
            address: self.from_address.clone(),
            name: self.from_name.clone(),
        }
    }
}

impl Default for MailerConfig {
    fn default() -> Self {
        Self {
            transport: TransportConfig::File {
                output_dir: PathBuf::from("./emails"),
            },
            from_address: "receipts@example.com".to_string(),
            from_name: None,
        }
    }
}
