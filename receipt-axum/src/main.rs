use std::sync::Arc;

use clap::Parser;
use receipt_axum::{ImageConverter, OpenAiImageConverter, VisionConfig};
use receipt_mailer::ReceiptMailer;
use tracing_subscriber::EnvFilter;

/// HTTP server for building and sending HTML email receipts
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Address to listen on
    #[arg(long, env = "RECEIPT_BIND", default_value = "0.0.0.0:3000")]
    bind: String,

    /// Prefix for every route, e.g. "/api"
    #[arg(long, env = "RECEIPT_BASE_PATH")]
    base_path: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mailer = Arc::new(ReceiptMailer::from_env()?);

    let converter: Option<Arc<dyn ImageConverter>> = match VisionConfig::from_env() {
        Some(config) => {
            tracing::info!(model = %config.model, "Image conversion enabled");
            Some(Arc::new(OpenAiImageConverter::new(config)?))
        }
        None => {
            tracing::info!("RECEIPT_VISION_API_KEY not set, image conversion disabled");
            None
        }
    };

    let routes = receipt_axum::routes(mailer)
        .with_shared_converter(converter)
        .build();

    let app = match cli.base_path.as_deref().map(|p| p.trim_matches('/')) {
        Some(prefix) if !prefix.is_empty() => axum::Router::new().nest(&format!("/{prefix}"), routes),
        _ => routes,
    };

    let listener = tokio::net::TcpListener::bind(&cli.bind).await?;
    tracing::info!(address = %cli.bind, "Receipt server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
