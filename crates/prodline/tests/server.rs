use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use prodline::config::ServeConfig;
use prodline::server::router;
use tower::ServiceExt;

const BOUNDARY: &str = "prodline-test-boundary";

fn fixture(name: &str) -> Vec<u8> {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../prodline-parser/tests/data")
        .join(name);
    std::fs::read(path).expect("read fixture")
}

fn multipart_body(field: &str, file_name: &str, contents: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(contents);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn upload_request(field: &str, file_name: &str, contents: &[u8]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(field, file_name, contents)))
        .expect("build request")
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("collect body")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

#[tokio::test]
async fn index_serves_upload_form() {
    let app = router(&ServeConfig::default());
    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains(r#"action="/upload""#));
    assert!(html.contains(r#"name="file""#));
    assert!(html.contains("Up to 20 MB"));
}

#[tokio::test]
async fn valid_upload_renders_dashboard() {
    let app = router(&ServeConfig::default());
    let response = app
        .oneshot(upload_request(
            "file",
            "line_performance.csv",
            &fixture("line_performance.csv"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert_eq!(html.matches("<svg ").count(), 8);
    assert!(html.contains("Line 1 Charts"));
    assert!(html.contains("Line 2 Charts"));
    assert!(html.contains("PR vs Target PR for 1"));
    assert!(html.contains("line_performance.csv"));
    assert!(html.find("Line 1 Charts") < html.find("Line 2 Charts"));
}

#[tokio::test]
async fn workbook_upload_renders_dashboard() {
    let app = router(&ServeConfig::default());
    let response = app
        .oneshot(upload_request(
            "file",
            "line_performance.xlsx",
            &fixture("line_performance.xlsx"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert_eq!(html.matches("<svg ").count(), 8);
    assert!(html.contains("Line 1 Charts"));
    assert!(html.contains("Line 2 Charts"));
}

#[tokio::test]
async fn missing_columns_are_unprocessable() {
    let app = router(&ServeConfig::default());
    let csv = b"Date,Production Line,PR\n2024-03-01,1,88\n";
    let response = app
        .oneshot(upload_request("file", "partial.csv", csv))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let html = body_text(response).await;
    assert!(html.contains(r#"role="alert""#));
    assert!(html.contains("Planned Downtime"));
    assert!(!html.contains("<svg"));
}

#[tokio::test]
async fn bad_values_are_unprocessable() {
    let app = router(&ServeConfig::default());
    let csv = b"Date,Production Line,Planned Downtime,Micro stops,Unplanned Downtime,PR,Target PR\n\
2024-03-01,1,45,8,0,high,85\n";
    let response = app
        .oneshot(upload_request("file", "bad.csv", csv))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let html = body_text(response).await;
    assert!(html.contains("high"));
}

#[tokio::test]
async fn unreadable_file_is_bad_request() {
    let app = router(&ServeConfig::default());
    let response = app
        .oneshot(upload_request("file", "noise.bin", &[0xff, 0xfe, 0x00, 0x81, 0x9c]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let html = body_text(response).await;
    assert!(html.contains(r#"role="alert""#));
}

#[tokio::test]
async fn missing_file_field_is_bad_request() {
    let app = router(&ServeConfig::default());
    let response = app
        .oneshot(upload_request(
            "attachment",
            "line_performance.csv",
            &fixture("line_performance.csv"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let html = body_text(response).await;
    assert!(html.contains("No file was uploaded"));
}
