//! Tests for the receipt HTTP routes

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use receipt_axum::{ConvertedTemplate, ImageConverter, UploadedImage, VisionError};
use receipt_mailer::{FileTransport, ReceiptMailer, Sender};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

const BOUNDARY: &str = "receipt-test-boundary";

struct FakeConverter {
    seen: Arc<Mutex<Vec<UploadedImage>>>,
}

#[async_trait]
impl ImageConverter for FakeConverter {
    async fn convert(&self, image: UploadedImage) -> Result<ConvertedTemplate, VisionError> {
        image.validate()?;
        self.seen.lock().unwrap().push(image);
        Ok(ConvertedTemplate {
            html: r#"<p>Hi {{BUYER_NAME}}</p><img src="{{SELLER_LOGO_URL}}">"#.to_string(),
        })
    }
}

struct DownConverter;

#[async_trait]
impl ImageConverter for DownConverter {
    async fn convert(&self, _image: UploadedImage) -> Result<ConvertedTemplate, VisionError> {
        Err(VisionError::Provider {
            status: 429,
            message: "Rate limit reached for gpt-4o".to_string(),
        })
    }
}

fn file_mailer(dir: &TempDir) -> Arc<ReceiptMailer> {
    let transport = FileTransport::new(dir.path()).unwrap();
    Arc::new(ReceiptMailer::with_transport(
        transport,
        Sender::new("receipts@example.com"),
    ))
}

fn app(dir: &TempDir) -> Router {
    receipt_axum::routes(file_mailer(dir)).build()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_image(content_type: &str, bytes: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"receipt.png\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/image-to-html")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn test_health() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = send(app(&dir), get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_list_templates() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = send(app(&dir), get("/templates")).await;

    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["beacons", "stanstore", "fanbasis"]);
    assert_eq!(body[0]["name"], "Beacons");
    assert!(body[0].get("html").is_none());
}

#[tokio::test]
async fn test_get_template_describes_its_form() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = send(app(&dir), get("/templates/beacons")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "beacons");
    assert!(body["html"].as_str().unwrap().contains("{{BUYER_NAME}}"));

    let fields = body["fields"].as_array().unwrap();
    assert_eq!(fields.len(), 12);
    let total = fields.iter().find(|f| f["key"] == "TOTAL_AMOUNT").unwrap();
    assert_eq!(total["type"], "number");
    assert_eq!(total["label"], "Total Amount");
    let logo = fields.iter().find(|f| f["key"] == "SELLER_LOGO_URL").unwrap();
    assert_eq!(logo["type"], "file");

    assert!(!body["imageSources"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_template_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = send(app(&dir), get("/templates/gumroad")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 404);
}

#[tokio::test]
async fn test_parse_template() {
    let dir = tempfile::tempdir().unwrap();
    let request = post_json(
        "/templates/parse",
        json!({ "html": "<p>{{BUYER_EMAIL}} paid {{TOTAL_AMOUNT}} on {{DATE_PAID}}</p>" }),
    );
    let (status, body) = send(app(&dir), request).await;

    assert_eq!(status, StatusCode::OK);
    let keys: Vec<&str> = body["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["key"].as_str().unwrap())
        .collect();
    assert_eq!(keys, vec!["BUYER_EMAIL", "DATE_PAID", "TOTAL_AMOUNT"]);
    assert_eq!(body["fields"][0]["type"], "email");
    assert_eq!(body["fields"][0]["placeholder"], "Enter buyer email");
    assert_eq!(body["fields"][1]["type"], "date");
}

#[tokio::test]
async fn test_parse_without_html_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = send(app(&dir), post_json("/templates/parse", json!({}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "failed to parse template");
}

#[tokio::test]
async fn test_render_inline_html() {
    let dir = tempfile::tempdir().unwrap();
    let request = post_json(
        "/render",
        json!({
            "html": "<p>{{NAME}} paid {{TOTAL}} {{NAME}}{{MISSING}}</p>",
            "values": { "NAME": "Ana", "TOTAL": "$5", "UNUSED": null }
        }),
    );
    let (status, body) = send(app(&dir), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["html"], "<p>Ana paid $5 Ana</p>");
}

#[tokio::test]
async fn test_render_catalog_template() {
    let dir = tempfile::tempdir().unwrap();
    let request = post_json(
        "/render",
        json!({
            "templateId": "fanbasis",
            "values": { "BUYER_NAME": "Ana", "AMOUNT": 9 }
        }),
    );
    let (status, body) = send(app(&dir), request).await;

    assert_eq!(status, StatusCode::OK);
    let html = body["html"].as_str().unwrap();
    assert!(html.contains("Ana"));
    assert!(!html.contains("{{"));
}

#[tokio::test]
async fn test_render_unknown_template_id() {
    let dir = tempfile::tempdir().unwrap();
    let request = post_json("/render", json!({ "templateId": "gumroad", "values": {} }));
    let (status, _) = send(app(&dir), request).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_render_needs_a_template() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = send(app(&dir), post_json("/render", json!({ "values": {} }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);
}

#[tokio::test]
async fn test_extract_generic() {
    let dir = tempfile::tempdir().unwrap();
    let html = r#"<p>Thanks for your order, Ana!</p><p>Total: $42.50</p><p>Receipt #R-1001 </p><a href="mailto:shop@studio.co">Contact</a>"#;
    let (status, body) = send(app(&dir), post_json("/extract", json!({ "html": html }))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["values"],
        json!({
            "BUYER_NAME": "Ana",
            "ORDER_ID": "R-1001",
            "SELLER_EMAIL": "shop@studio.co",
            "TOTAL_AMOUNT": "42.50",
        })
    );
}

#[tokio::test]
async fn test_extract_without_matches_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let request = post_json("/extract", json!({ "html": "<p>nothing here</p>", "platform": "beacons" }));
    let (status, body) = send(app(&dir), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["values"], json!({}));
}

#[tokio::test]
async fn test_send_email_writes_message() {
    let dir = tempfile::tempdir().unwrap();
    let request = post_json(
        "/send-email",
        json!({
            "to": "ana@example.com",
            "subject": "Your Beacons receipt",
            "fromName": "Studio North",
            "html": "<p>Thanks for your order, Ana!</p>"
        }),
    );
    let (status, body) = send(app(&dir), request).await;

    assert_eq!(status, StatusCode::OK);
    let id = body["messageId"].as_str().unwrap();
    let written = std::fs::read_to_string(dir.path().join(format!("{id}.eml"))).unwrap();
    assert!(written.contains("Subject: Your Beacons receipt"));
    assert!(written.contains("ana@example.com"));
}

#[tokio::test]
async fn test_send_email_reports_missing_fields() {
    let dir = tempfile::tempdir().unwrap();
    let request = post_json("/send-email", json!({ "html": "<p>hi</p>" }));
    let (status, body) = send(app(&dir), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required fields: to, subject");
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_image_to_html_not_configured() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = send(app(&dir), post_image("image/png", b"\x89PNG")).await;

    assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
    assert_eq!(body["code"], 501);
}

#[tokio::test]
async fn test_image_to_html_converts_upload() {
    let dir = tempfile::tempdir().unwrap();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let app = receipt_axum::routes(file_mailer(&dir))
        .with_converter(FakeConverter { seen: seen.clone() })
        .build();

    let (status, body) = send(app, post_image("image/png", b"\x89PNG\r\n")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["html"].as_str().unwrap().contains("{{BUYER_NAME}}"));
    assert_eq!(body["fields"].as_array().unwrap().len(), 2);
    assert_eq!(body["imageSources"], json!(["{{SELLER_LOGO_URL}}"]));

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].content_type, "image/png");
    assert_eq!(seen[0].file_name.as_deref(), Some("receipt.png"));
    assert_eq!(seen[0].bytes, b"\x89PNG\r\n");
}

#[tokio::test]
async fn test_image_to_html_rejects_non_images() {
    let dir = tempfile::tempdir().unwrap();
    let app = receipt_axum::routes(file_mailer(&dir))
        .with_converter(FakeConverter {
            seen: Arc::new(Mutex::new(Vec::new())),
        })
        .build();

    let (status, _) = send(app, post_image("application/pdf", b"%PDF-1.7")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_image_to_html_passes_provider_message() {
    let dir = tempfile::tempdir().unwrap();
    let app = receipt_axum::routes(file_mailer(&dir))
        .with_converter(DownConverter)
        .build();

    let (status, body) = send(app, post_image("image/jpeg", b"\xff\xd8\xff")).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "Rate limit reached for gpt-4o");
}
