use axum::{
    extract::{
        multipart::{Multipart, MultipartRejection},
        DefaultBodyLimit, State,
    },
    http::StatusCode,
    response::Response,
    routing::get,
    Router,
};
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::{info, warn};

use crate::api::response;
use crate::error::{AppError, Result};
use crate::upload::{process_upload, UploadOutcome, UploadedFile};
use crate::AppState;

/// Name of the multipart field carrying the upload.
pub const FILE_FIELD: &str = "file";

pub fn create_router(app_state: AppState) -> Router {
    let static_dir = ServeDir::new(&app_state.config.static_dir);
    let body_limit = app_state.config.max_upload_bytes;

    Router::new()
        .route("/", get(index_handler).post(upload_handler))
        .route("/health", get(health_handler))
        .nest_service("/static", static_dir)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

async fn index_handler(State(state): State<AppState>) -> Response {
    response::index(&state.config.ai.prompt)
}

async fn health_handler() -> &'static str {
    "ok"
}

async fn upload_handler(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Response {
    let start_time = std::time::Instant::now();

    // Set an overall timeout for the entire handler
    let result = tokio::time::timeout(
        state.config.request_timeout,
        handle_upload(&state, multipart),
    )
    .await;

    let elapsed = start_time.elapsed();
    info!("Request processing took: {:?}", elapsed);

    match result {
        Ok(Ok(outcome)) => response::success(outcome),
        Ok(Err(err)) => {
            warn!(kind = err.kind(), "Upload failed: {}", err);
            error_page(&state, err.status_code(), &err.to_string())
        }
        Err(_) => {
            warn!("Request timed out after {:?}", elapsed);
            error_page(
                &state,
                StatusCode::REQUEST_TIMEOUT,
                "Request processing timed out",
            )
        }
    }
}

async fn handle_upload(
    state: &AppState,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<UploadOutcome> {
    let upload = read_upload(multipart?).await?;
    info!("Processing upload: {}", upload.file_name);
    process_upload(state, upload).await
}

fn error_page(state: &AppState, status: StatusCode, message: &str) -> Response {
    let status = if state.config.legacy_error_status {
        StatusCode::OK
    } else {
        status
    };
    response::error(status, message, Some(&state.config.ai.prompt))
}

async fn read_upload(mut multipart: Multipart) -> Result<UploadedFile> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await?.to_vec();

        return Ok(UploadedFile {
            file_name,
            content_type,
            bytes,
        });
    }

    Err(AppError::RequestError(format!(
        "multipart form has no `{}` field",
        FILE_FIELD
    )))
}
