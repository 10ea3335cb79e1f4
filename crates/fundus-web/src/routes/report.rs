use axum::Json;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::http::header::{CACHE_CONTROL, CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::json;

use fundus_core::history::HistoryLink;
use fundus_core::report::ScreeningReport;
use fundus_export::pdf::generate_pdf;
use fundus_storage::store::RecordStore;

use super::{Selection, ViewQuery, select_report};
use crate::audit::AuditEvent;
use crate::error::{ApiError, JsonError};
use crate::state::AppState;

/// `GET /report.pdf`: the printable summary of the selected session.
pub async fn download<S: RecordStore>(
    State(state): State<AppState<S>>,
    headers: HeaderMap,
    Query(query): Query<ViewQuery>,
) -> Result<Response, ApiError> {
    let code = query
        .access_code()
        .ok_or_else(|| ApiError::BadRequest("missing access code".to_string()))?;
    state.sessions.authorize(&headers, &code)?;

    let timestamp = query.timestamp();
    let Selection { report, .. } = select_report(&state, &code, timestamp.as_deref()).await?;
    let report = report.ok_or_else(|| ApiError::NotFound(format!("no session {timestamp:?}")))?;

    let images = state.images.fetch_pair(&report.images).await;
    let font = state.report_font.clone();
    let styles = state.report_styles.clone();
    let captured_at = report.captured_at;

    let bytes =
        tokio::task::spawn_blocking(move || generate_pdf(&report, &images, &font, &styles))
            .await??;

    AuditEvent::new("report.download", code.as_str())
        .with_details(json!({ "captured_at": captured_at.to_string(), "bytes": bytes.len() }))
        .emit();

    Ok((
        [
            (CONTENT_TYPE, "application/pdf".to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"result_{code}.pdf\""),
            ),
            (CACHE_CONTROL, "no-store".to_string()),
        ],
        bytes,
    )
        .into_response())
}

#[derive(Debug, Serialize)]
pub struct ResultsResponse {
    pub history: Vec<HistoryLink>,
    /// `None` when the requested entry does not exist.
    pub report: Option<ScreeningReport>,
}

/// `GET /api/results`: the same data as the page, as JSON.
pub async fn results_json<S: RecordStore>(
    State(state): State<AppState<S>>,
    headers: HeaderMap,
    Query(query): Query<ViewQuery>,
) -> Result<Json<ResultsResponse>, JsonError> {
    let code = query
        .access_code()
        .ok_or_else(|| ApiError::BadRequest("missing access code".to_string()))?;
    state.sessions.authorize(&headers, &code)?;

    let timestamp = query.timestamp();
    let Selection { history, report } = select_report(&state, &code, timestamp.as_deref()).await?;
    let selected = report.as_ref().map(|r| r.captured_at);

    Ok(Json(ResultsResponse {
        history: history.links(selected),
        report,
    }))
}
