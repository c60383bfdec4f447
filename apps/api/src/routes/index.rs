use axum::response::Html;

use crate::render::INDEX_HTML;

/// GET /
/// Upload form; posts `file` and `job_description` to `/analyze`.
pub async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}
