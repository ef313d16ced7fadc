use std::sync::Arc;

use anyhow::{Context, Result};
use axum::body::Bytes;
use axum::extract::multipart::MultipartError;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use prodline_core::html::{render_error_page, render_upload_page};
use prodline_core::{render_upload, ErrorKind, ExecutionContext};
use tokio::net::TcpListener;
use tracing::{error, info, info_span, warn, Instrument, Span};
use uuid::Uuid;

use crate::config::ServeConfig;

/// Multipart field that carries the uploaded workbook.
pub const UPLOAD_FIELD: &str = "file";

#[derive(Clone)]
pub struct AppState {
    context: Arc<ExecutionContext>,
    max_upload_mb: u64,
}

/// One upload, owned by a single request. Nothing outlives the response.
struct UploadContext {
    request_id: Uuid,
    file_name: String,
    bytes: Bytes,
}

pub fn router(config: &ServeConfig) -> Router {
    let state = Arc::new(AppState {
        context: Arc::new(ExecutionContext::default()),
        max_upload_mb: config.max_upload_mb,
    });

    Router::new()
        .route("/", get(index))
        .route("/upload", post(upload))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes()))
        .with_state(state)
}

pub async fn serve(config: ServeConfig) -> Result<()> {
    let app = router(&config);
    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;

    info!(
        max_upload_mb = config.max_upload_mb,
        "listening on {}",
        listener.local_addr()?
    );
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

/// Maps a pipeline failure to the response status. Unreadable files are the
/// client's fault; readable files with bad content are unprocessable.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Load => StatusCode::BAD_REQUEST,
        ErrorKind::Validation | ErrorKind::Parse => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(render_upload_page(state.max_upload_mb))
}

async fn upload(State(state): State<Arc<AppState>>, multipart: Multipart) -> Response {
    let request_id = Uuid::new_v4();
    let span = info_span!("upload", %request_id);
    handle_upload(state, request_id, multipart)
        .instrument(span)
        .await
}

async fn handle_upload(state: Arc<AppState>, request_id: Uuid, multipart: Multipart) -> Response {
    let upload = match read_upload(request_id, multipart).await {
        Ok(upload) => upload,
        Err((status, message)) => {
            warn!(status = status.as_u16(), %message, "upload rejected before processing");
            return error_response(status, &message);
        }
    };

    info!(
        request_id = %upload.request_id,
        file_name = %upload.file_name,
        bytes = upload.bytes.len(),
        "upload received"
    );

    let context = Arc::clone(&state.context);
    let span = Span::current();
    let UploadContext {
        file_name, bytes, ..
    } = upload;

    let result = tokio::task::spawn_blocking(move || {
        let _entered = span.enter();
        render_upload(&context, &bytes, &file_name)
    })
    .await;

    match result {
        Ok(Ok(page)) => (StatusCode::OK, Html(page)).into_response(),
        Ok(Err(err)) => {
            let status = status_for(err.kind());
            if status.is_server_error() {
                error!(error = %err, "dashboard rendering failed");
            } else {
                warn!(status = status.as_u16(), error = %err, "upload rejected");
            }
            error_response(status, &err.to_string())
        }
        Err(join_err) => {
            error!(error = %join_err, "pipeline task did not complete");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal error while rendering charts.",
            )
        }
    }
}

async fn read_upload(
    request_id: Uuid,
    mut multipart: Multipart,
) -> std::result::Result<UploadContext, (StatusCode, String)> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_rejection)? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let file_name = field
            .file_name()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or("upload")
            .to_string();
        let bytes = field.bytes().await.map_err(multipart_rejection)?;
        return Ok(UploadContext {
            request_id,
            file_name,
            bytes,
        });
    }

    Err((
        StatusCode::BAD_REQUEST,
        "No file was uploaded. Choose a file and try again.".to_string(),
    ))
}

fn multipart_rejection(err: MultipartError) -> (StatusCode, String) {
    (err.status(), err.body_text())
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Html(render_error_page(message))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_follows_error_kind() {
        assert_eq!(status_for(ErrorKind::Load), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_for(ErrorKind::Validation),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(status_for(ErrorKind::Parse), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            status_for(ErrorKind::Internal),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
