//! Static File Serving
//!
//! `/` serves `index.html` from the configured static directory and
//! `/static/*` serves the rest of that directory. A built-in page stands in
//! when the directory has no index.

use std::path::{Path, PathBuf};

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tower_http::services::ServeDir;
use tracing::{info, warn};

const FALLBACK_INDEX: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Strategic Report</title>
</head>
<body>
    <h1>Strategic Report</h1>
    <p>The server is running but no front-end page was found in the static directory.</p>
    <ul>
        <li><code>POST /analyze</code> multipart form with <code>file</code> and optional <code>lang</code></li>
        <li><code>POST /chat</code> JSON <code>{"query": "..."}</code></li>
        <li><code>GET /health</code></li>
    </ul>
</body>
</html>"#;

pub fn router(static_dir: PathBuf) -> Router {
    if static_dir.is_dir() {
        info!(path = %static_dir.display(), "Serving static files");
    } else {
        warn!(path = %static_dir.display(), "Static directory not found, using built-in index page");
    }

    let index_path = static_dir.join("index.html");
    Router::new()
        .route("/", get(move || serve_index(index_path.clone())))
        .nest_service("/static", ServeDir::new(static_dir))
}

async fn serve_index(path: PathBuf) -> Response {
    let content = read_index(&path).await.unwrap_or_else(|| FALLBACK_INDEX.to_string());
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        content,
    )
        .into_response()
}

async fn read_index(path: &Path) -> Option<String> {
    tokio::fs::read_to_string(path).await.ok()
}
