use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Path, State},
    response::IntoResponse,
    routing::{get, post},
};
use receipt_core::{Catalog, Dialect, extract_with, parse, parse_source, render};
use receipt_mailer::{ReceiptMailer, SendEmailRequest};

use crate::{
    error::{ApiError, Result},
    types::*,
    vision::{ImageConverter, UploadedImage},
};

/// Largest accepted receipt photo.
pub const MAX_IMAGE_BYTES: usize = 20 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub mailer: Arc<ReceiptMailer>,
    pub converter: Option<Arc<dyn ImageConverter>>,
}

pub fn create_router(state: AppState) -> Router {
    let template_routes = Router::new()
        .route("/templates", get(list_templates_handler))
        .route("/templates/parse", post(parse_template_handler))
        .route("/templates/{id}", get(get_template_handler))
        .route("/render", post(render_handler))
        .route("/extract", post(extract_handler));

    let service_routes = Router::new()
        .route("/send-email", post(send_email_handler))
        .route(
            "/image-to-html",
            post(image_to_html_handler).layer(DefaultBodyLimit::max(MAX_IMAGE_BYTES)),
        );

    Router::new()
        .route("/health", get(health_handler))
        .merge(template_routes)
        .merge(service_routes)
        .with_state(state)
}

async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn list_templates_handler() -> impl IntoResponse {
    Json(Catalog::all())
}

async fn get_template_handler(Path(id): Path<String>) -> Result<impl IntoResponse> {
    let template = Catalog::require(&id)?;
    let parsed = parse(template.html)?;

    Ok(Json(TemplateResponse {
        id: template.id.to_string(),
        name: template.name.to_string(),
        subject: template.subject.to_string(),
        html: template.html.to_string(),
        parsed,
    }))
}

async fn parse_template_handler(Json(request): Json<ParseRequest>) -> Result<impl IntoResponse> {
    let parsed = parse_source(request.html.as_deref())?;
    Ok(Json(parsed))
}

async fn render_handler(Json(request): Json<RenderRequest>) -> Result<impl IntoResponse> {
    let template = match (request.html, request.template_id) {
        (Some(html), _) => html,
        (None, Some(id)) => Catalog::require(&id)?.html.to_string(),
        (None, None) => {
            return Err(ApiError::BadRequest(
                "Provide either html or templateId".to_string(),
            ));
        }
    };

    Ok(Json(RenderResponse {
        html: render(&template, &request.values),
    }))
}

async fn extract_handler(Json(request): Json<ExtractRequest>) -> impl IntoResponse {
    let dialect = match request.platform.as_deref() {
        Some(platform) => Dialect::for_platform(platform),
        None => Dialect::generic(),
    };

    Json(ExtractResponse {
        values: extract_with(dialect, &request.html),
    })
}

async fn send_email_handler(
    State(state): State<AppState>,
    Json(request): Json<SendEmailRequest>,
) -> Result<impl IntoResponse> {
    let message_id = state.mailer.send(&request).await?;
    Ok(Json(SendEmailResponse { message_id }))
}

async fn image_to_html_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse> {
    let converter = state
        .converter
        .clone()
        .ok_or_else(|| ApiError::NotConfigured("image conversion".to_string()))?;

    let mut upload: Option<UploadedImage> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Multipart error: {e}")))?
    {
        if field.name() != Some("image") {
            continue;
        }

        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let file_name = field.file_name().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read image: {e}")))?;

        upload = Some(UploadedImage {
            content_type,
            file_name,
            bytes: bytes.to_vec(),
        });
        break;
    }

    let upload = upload.ok_or_else(|| ApiError::BadRequest("No image field found".to_string()))?;
    let converted = converter.convert(upload).await?;

    // A converted document that cannot be scanned still goes back to the caller.
    let parsed = parse(&converted.html).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Converted template could not be scanned");
        Default::default()
    });

    Ok(Json(ImageToHtmlResponse {
        html: converted.html,
        parsed,
    }))
}
