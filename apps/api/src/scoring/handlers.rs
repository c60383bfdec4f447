use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::HeaderMap,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::extract::{self, DocumentFormat};
use crate::render;
use crate::scoring::upload::parse_analyze_form;
use crate::scoring::AnalysisResult;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub analysis_id: Uuid,
    #[serde(flatten)]
    pub analysis: AnalysisResult,
}

/// POST /analyze
/// JSON by default; an HTML page when the client's `Accept` header prefers it.
pub async fn handle_analyze(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let wants_html = render::prefers_html(&headers);

    let outcome = match multipart {
        Ok(multipart) => analyze_upload(&state, multipart).await,
        Err(rejection) => Err(AppError::Validation(rejection.body_text())),
    };

    match (outcome, wants_html) {
        (Ok(response), false) => Json(response).into_response(),
        (Ok(response), true) => Html(render::analysis_page(&response)).into_response(),
        (Err(err), false) => err.into_response(),
        (Err(err), true) => {
            err.log();
            let (status, _, message) = err.describe();
            (status, Html(render::error_page(status, &message))).into_response()
        }
    }
}

async fn analyze_upload(
    state: &AppState,
    multipart: Multipart,
) -> Result<AnalyzeResponse, AppError> {
    let form = parse_analyze_form(multipart, state.config.max_upload_bytes).await?;
    let format = DocumentFormat::from_filename(&form.file.filename)?;

    info!(
        "Upload received: filename={}, format={}, bytes={}, job_description={}",
        form.file.filename,
        format.as_str(),
        form.file.data.len(),
        form.job_description.is_some()
    );

    let data = form.file.data;
    let document = tokio::task::spawn_blocking(move || extract::extract(data, format))
        .await
        .map_err(|e| anyhow::anyhow!("extraction task failed: {e}"))??;

    let chars = document.content_chars();
    debug!(
        "Extracted {} characters from {} bytes of {}",
        chars,
        document.raw_bytes.len(),
        document.declared_format.as_str()
    );
    if chars < state.config.min_text_chars {
        return Err(AppError::InsufficientContent {
            chars,
            min: state.config.min_text_chars,
        });
    }

    let analysis = state
        .scorer
        .score(document.text.trim(), form.job_description.as_deref())
        .await?;

    let analysis_id = Uuid::new_v4();
    info!(
        "Analysis {} complete: score={}, strategy={}",
        analysis_id,
        analysis.ats_score,
        analysis.strategy.as_str()
    );

    Ok(AnalyzeResponse {
        analysis_id,
        analysis,
    })
}
