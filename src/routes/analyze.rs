use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use tracing::{debug, info, warn};

use crate::agents::ReportAgent;
use crate::extract::{extract, Digest, FileKind, UploadedFile};
use crate::models::{AnalyzeResponse, AppState};
use crate::session::cookie::{session_cookie, session_from_headers};
use crate::session::{SessionData, SessionId};
use crate::types::{AppError, AppResult};

pub const DEFAULT_LANG: &str = "Arabic";

pub fn router() -> Router<AppState> {
    Router::new().route("/analyze", post(analyze))
}

struct AnalyzeForm {
    file: UploadedFile,
    lang: String,
}

/// Body-limit violations keep their 413; everything else is a malformed form
fn multipart_error(error: MultipartError) -> AppError {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(error.body_text())
    } else {
        AppError::InvalidRequest(error.body_text())
    }
}

async fn read_form(multipart: &mut Multipart) -> AppResult<AnalyzeForm> {
    let mut file = None;
    let mut lang = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(multipart_error)?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(multipart_error)?;
                debug!(filename = %filename, content_type = ?content_type, bytes = data.len(), "Received file field");
                file = Some(UploadedFile::new(filename, data));
            }
            Some("lang") => {
                let value = field
                    .text()
                    .await
                    .map_err(multipart_error)?;
                lang = Some(value);
            }
            other => debug!(field = ?other, "Ignoring form field"),
        }
    }

    let file = file.ok_or_else(|| AppError::InvalidRequest("No file uploaded".to_string()))?;
    let lang = lang
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .unwrap_or_else(|| DEFAULT_LANG.to_string());

    Ok(AnalyzeForm { file, lang })
}

async fn analyze(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<impl IntoResponse> {
    let mut multipart = multipart.map_err(|e| AppError::InvalidRequest(e.body_text()))?;
    let AnalyzeForm { file, lang } = read_form(&mut multipart).await?;

    let kind = FileKind::from_filename(&file.filename);
    let guessed = mime_guess::from_path(&file.filename).first_or_octet_stream();
    info!(
        filename = %file.filename,
        kind = ?kind,
        mime = %guessed,
        bytes = file.data.len(),
        lang = %lang,
        "Analyzing upload"
    );

    let digest = tokio::task::spawn_blocking(move || {
        extract(&file).unwrap_or_else(|e| {
            warn!(filename = %file.filename, error = %e, "Extraction failed, continuing with error digest");
            Digest::from_error(kind, &e)
        })
    })
    .await
    .map_err(|e| AppError::Internal(format!("Extraction task failed: {}", e)))?;

    let report = ReportAgent::generate(&state.llm, &state.config.llm, &digest.text, &lang).await?;

    let session_config = &state.config.session;
    // Only ids this store issued are reused; anything else gets a fresh id.
    let existing = match session_from_headers(&headers, &session_config.cookie_name) {
        Some(id) => state.sessions.get(&id).await.map(|_| id),
        None => None,
    };
    let session_id = existing.unwrap_or_else(SessionId::new);
    state
        .sessions
        .put(&session_id, SessionData::new(digest.text, report.clone(), lang))
        .await;
    info!(session = %session_id, report_chars = report.chars().count(), "Report stored in session");

    let cookie = session_cookie(&session_config.cookie_name, &session_id, session_config.ttl_secs);
    Ok((
        [(SET_COOKIE, cookie)],
        Json(AnalyzeResponse {
            report,
            chart: digest.chart,
        }),
    ))
}
