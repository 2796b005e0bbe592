//! # Receipt Axum Integration
//!
//! HTTP routes for building receipts from HTML templates: browse the built-in
//! platform templates, scan a template for its form fields, render it with
//! collected values, recover values from an already rendered receipt, send the
//! result by email and convert a receipt photo into a template.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use receipt_mailer::ReceiptMailer;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let mailer = Arc::new(ReceiptMailer::from_env()?);
//! let app = axum::Router::new().nest("/api", receipt_axum::routes(mailer).build());
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

mod error;
mod routes;
mod types;
pub mod vision;

pub use error::{ApiError, Result};
pub use routes::{AppState, MAX_IMAGE_BYTES, create_router};
pub use types::{
    ExtractRequest, ExtractResponse, HealthResponse, ImageToHtmlResponse, ParseRequest,
    RenderRequest, RenderResponse, SendEmailResponse, TemplateResponse,
};
pub use vision::{
    ConvertedTemplate, ImageConverter, OpenAiImageConverter, UploadedImage, VisionConfig,
    VisionError,
};

use axum::Router;
use receipt_mailer::ReceiptMailer;
use std::sync::Arc;

/// Create the receipt routes around a configured mailer.
///
/// Image conversion stays disabled (501) until a converter is supplied with
/// [`ReceiptRouterBuilder::with_converter`].
pub fn routes(mailer: Arc<ReceiptMailer>) -> ReceiptRouterBuilder {
    ReceiptRouterBuilder {
        mailer,
        converter: None,
    }
}

/// Builder for configuring receipt routes
pub struct ReceiptRouterBuilder {
    mailer: Arc<ReceiptMailer>,
    converter: Option<Arc<dyn ImageConverter>>,
}

impl ReceiptRouterBuilder {
    pub fn with_converter<C: ImageConverter + 'static>(mut self, converter: C) -> Self {
        self.converter = Some(Arc::new(converter));
        self
    }

    pub fn with_shared_converter(mut self, converter: Option<Arc<dyn ImageConverter>>) -> Self {
        self.converter = converter;
        self
    }

    /// Build the router with the configured options
    pub fn build(self) -> Router {
        create_router(AppState {
            mailer: self.mailer,
            converter: self.converter,
        })
    }
}

impl From<ReceiptRouterBuilder> for Router {
    fn from(builder: ReceiptRouterBuilder) -> Self {
        builder.build()
    }
}
