use std::path::Path;

use askama::Template;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use tracing::{error, info, warn};

use bgx_core::error::ExtractionError;
use bgx_core::export::{output_paths, save_entities_json};
use bgx_core::{BgxError, DocumentPipeline, ProcessedDocument};

use crate::state::AppState;
use crate::templates::{EntitiesTemplate, UploadTemplate};

pub async fn index() -> Response {
    render(&UploadTemplate { error: None })
}

pub async fn upload(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let (filename, data) = match read_file_part(&mut multipart).await {
        Some((filename, data)) if !filename.is_empty() => (filename, data),
        _ => {
            error!("No file part in the request");
            return Redirect::to("/").into_response();
        }
    };

    if !has_pdf_extension(&filename) {
        return form_error(StatusCode::BAD_REQUEST, "Only PDF files are allowed.");
    }

    let safe_name = sanitize_filename(&filename);
    let upload_dir = &state.config.server.upload_dir;
    let upload_path = upload_dir.join(&safe_name);

    if let Err(e) = tokio::fs::create_dir_all(upload_dir).await {
        error!("Cannot create {}: {}", upload_dir.display(), e);
        return form_error(StatusCode::INTERNAL_SERVER_ERROR, "Could not store the upload.");
    }
    if let Err(e) = tokio::fs::write(&upload_path, &data).await {
        error!("Cannot write {}: {}", upload_path.display(), e);
        return form_error(StatusCode::INTERNAL_SERVER_ERROR, "Could not store the upload.");
    }
    info!("Saved upload to {}", upload_path.display());

    let config = state.config.as_ref().clone();
    let processed = tokio::task::spawn_blocking(move || DocumentPipeline::new(config).process(&data)).await;

    let doc = match processed {
        Ok(Ok(doc)) => doc,
        Ok(Err(BgxError::Extraction(ExtractionError::NoText))) => {
            warn!("No text extracted from the PDF.");
            return Redirect::to("/").into_response();
        }
        Ok(Err(e)) => {
            error!("Failed to process {}: {}", safe_name, e);
            return form_error(StatusCode::UNPROCESSABLE_ENTITY, &format!("Could not read {}: {}", safe_name, e));
        }
        Err(e) => {
            error!("Processing task failed: {}", e);
            return form_error(StatusCode::INTERNAL_SERVER_ERROR, "Processing failed.");
        }
    };

    save_json(&state, &safe_name, &doc);

    render(&entities_page(safe_name, doc))
}

/// The first part named `file`, with its client filename and contents.
async fn read_file_part(multipart: &mut Multipart) -> Option<(String, Vec<u8>)> {
    loop {
        match multipart.next_field().await {
            Ok(Some(field)) if field.name() == Some("file") => {
                let filename = field.file_name().unwrap_or_default().to_string();
                return match field.bytes().await {
                    Ok(bytes) => Some((filename, bytes.to_vec())),
                    Err(e) => {
                        error!("Failed to read upload: {}", e);
                        None
                    }
                };
            }
            Ok(Some(_)) => continue,
            Ok(None) => return None,
            Err(e) => {
                error!("Malformed multipart body: {}", e);
                return None;
            }
        }
    }
}

fn has_pdf_extension(filename: &str) -> bool {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}

/// Keep the basename, replace anything outside `[A-Za-z0-9._-]` and strip leading dots.
pub fn sanitize_filename(filename: &str) -> String {
    let base = filename.rsplit(['/', '\\']).next().unwrap_or_default();

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    match cleaned.trim_start_matches('.') {
        "" => "upload.pdf".to_string(),
        name => name.to_string(),
    }
}

fn save_json(state: &AppState, safe_name: &str, doc: &ProcessedDocument) {
    let output_dir = &state.config.output.output_dir;
    if let Err(e) = std::fs::create_dir_all(output_dir) {
        error!("Cannot create {}: {}", output_dir.display(), e);
        return;
    }

    let path = output_paths(output_dir, Path::new(safe_name)).json;
    if let Err(e) = save_entities_json(&path, &doc.record) {
        error!("{}", e);
    }
}

fn entities_page(filename: String, doc: ProcessedDocument) -> EntitiesTemplate {
    let countries = [
        ("Beneficiary", doc.countries.beneficiary),
        ("Applicant", doc.countries.applicant),
    ]
    .into_iter()
    .filter_map(|(party, resolved)| resolved.map(|r| (party, r.country)))
    .collect();

    EntitiesTemplate {
        filename,
        entries: doc.record.entries(),
        countries,
        warnings: doc.warnings,
    }
}

fn form_error(status: StatusCode, message: &str) -> Response {
    let mut response = render(&UploadTemplate {
        error: Some(message.to_string()),
    });
    if response.status().is_success() {
        *response.status_mut() = status;
    }
    response
}

fn render<T: Template>(template: &T) -> Response {
    match template.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!("Template rendering failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, header};
    use bgx_core::BgxConfig;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};
    use tower::ServiceExt;

    use crate::router::app_router;

    const BOUNDARY: &str = "bgxboundary";

    fn test_state(dir: &tempfile::TempDir) -> AppState {
        let mut config = BgxConfig::default();
        config.extraction.use_ocr = false;
        config.server.upload_dir = dir.path().join("uploads");
        config.output.output_dir = dir.path().join("out");
        AppState::new(config)
    }

    fn multipart_request(name: &str, filename: &str, content: &[u8]) -> Request<Body> {
        let mut body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/upload")
            .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
            .body(Body::from(body))
            .unwrap()
    }

    /// One page with a single line of Courier text.
    fn text_pdf(text: &str) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![50.into(), 700.into()]),
                Operation::new("Tj", vec![Object::string_literal(text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_index_renders_form() {
        let dir = tempfile::tempdir().unwrap();
        let response = app_router(test_state(&dir))
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("enctype=\"multipart/form-data\""));
        assert!(html.contains("name=\"file\""));
    }

    #[tokio::test]
    async fn test_non_pdf_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let response = app_router(test_state(&dir))
            .oneshot(multipart_request("file", "guarantee.txt", b"BG No. 123"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_text(response).await.contains("Only PDF files are allowed."));
        assert!(!dir.path().join("uploads").exists());
    }

    #[tokio::test]
    async fn test_missing_file_redirects() {
        let dir = tempfile::tempdir().unwrap();
        let response = app_router(test_state(&dir))
            .oneshot(multipart_request("document", "bg.pdf", b"%PDF-1.5"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/");
    }

    #[tokio::test]
    async fn test_empty_filename_redirects() {
        let dir = tempfile::tempdir().unwrap();
        let response = app_router(test_state(&dir))
            .oneshot(multipart_request("file", "", b""))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }

    #[tokio::test]
    async fn test_unreadable_pdf_is_stored_and_reported() {
        let dir = tempfile::tempdir().unwrap();
        let response = app_router(test_state(&dir))
            .oneshot(multipart_request("file", "../my bg.PDF", b"not really a pdf"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body_text(response).await.contains("Could not read my_bg.PDF"));
        assert!(dir.path().join("uploads").join("my_bg.PDF").exists());
    }

    #[tokio::test]
    async fn test_upload_renders_fields_and_saves_json() {
        let dir = tempfile::tempdir().unwrap();
        let pdf = text_pdf("BG No.1234/2024 issued in favour of Oil India Limited, valid till 31/03/2025");

        let response = app_router(test_state(&dir))
            .oneshot(multipart_request("file", "bg 2024.pdf", &pdf))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("bg_2024.pdf"));
        assert!(html.contains("Beneficiary Name"));
        assert!(html.contains("Oil India Limited"));

        assert!(dir.path().join("uploads").join("bg_2024.pdf").exists());
        let saved = std::fs::read_to_string(dir.path().join("out").join("bg_2024_extracted_data.json")).unwrap();
        let json: serde_json::Value = serde_json::from_str(&saved).unwrap();
        assert_eq!(json["Beneficiary Name"], "Oil India Limited");
        assert_eq!(json["BG Number"][0], "1234/2024");
        assert!(json["Applicant Name"].is_null());
    }

    #[tokio::test]
    async fn test_pdf_without_text_redirects() {
        let dir = tempfile::tempdir().unwrap();
        let response = app_router(test_state(&dir))
            .oneshot(multipart_request("file", "blank.pdf", &text_pdf(" ")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/");
        assert!(dir.path().join("uploads").join("blank.pdf").exists());
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("bg.pdf"), "bg.pdf");
        assert_eq!(sanitize_filename("../../etc/passwd.pdf"), "passwd.pdf");
        assert_eq!(sanitize_filename("C:\\scans\\BG 2024 (final).pdf"), "BG_2024__final_.pdf");
        assert_eq!(sanitize_filename("..hidden.pdf"), "hidden.pdf");
        assert_eq!(sanitize_filename("..."), "upload.pdf");
        assert_eq!(sanitize_filename(""), "upload.pdf");
    }

    #[test]
    fn test_pdf_extension_check() {
        assert!(has_pdf_extension("bg.pdf"));
        assert!(has_pdf_extension("BG.PDF"));
        assert!(!has_pdf_extension("bg.pdf.exe"));
        assert!(!has_pdf_extension("pdf"));
    }
}
