use axum::Form;
use axum::extract::{Query, State};
use axum::http::header::{LOCATION, SET_COOKIE};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use jiff::Timestamp;
use jiff::civil::Date;
use serde::Deserialize;
use serde_json::json;

use fundus_core::access_code::AccessCode;
use fundus_core::gate::{self, GateOutcome};
use fundus_core::messages;
use fundus_export::pages::{GatePage, Notice};
use fundus_export::sections::Tone;
use fundus_storage::store::RecordStore;

use super::{Target, ViewQuery, non_empty, notice_page, page_href, render, results_page};
use crate::audit::AuditEvent;
use crate::error::ApiError;
use crate::state::AppState;

/// `GET /`: the gate form, or the results once the session covers the code.
pub async fn show<S: RecordStore>(
    State(state): State<AppState<S>>,
    headers: HeaderMap,
    Query(query): Query<ViewQuery>,
) -> Result<Response, ApiError> {
    let Some(code) = query.access_code() else {
        return notice_page(&state, StatusCode::BAD_REQUEST, Tone::Error, messages::MISSING_ACCESS_CODE);
    };
    let timestamp = query.timestamp();

    if state.sessions.current(&headers, &code).is_none() {
        let page = GatePage::new(code.as_str(), timestamp);
        return Ok(render(&state, "gate.html", &page)?.into_response());
    }

    Ok(results_page(&state, &code, timestamp.as_deref(), Vec::new())
        .await?
        .into_response())
}

#[derive(Debug, Deserialize)]
pub struct VerifyForm {
    #[serde(default)]
    pub uuid: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub birthdate: String,
}

/// `POST /verify`: check the birthdate and start a session.
pub async fn verify<S: RecordStore>(
    State(state): State<AppState<S>>,
    Form(form): Form<VerifyForm>,
) -> Result<Response, ApiError> {
    let Ok(code) = AccessCode::parse(&form.uuid) else {
        return notice_page(&state, StatusCode::BAD_REQUEST, Tone::Error, messages::MISSING_ACCESS_CODE);
    };
    let timestamp = non_empty(form.timestamp.as_deref());
    let gate_page = || GatePage::new(code.as_str(), timestamp.clone());

    let Ok(birthdate) = form.birthdate.trim().parse::<Date>() else {
        let page = gate_page().with_notice(Notice::new(Tone::Error, messages::BIRTHDATE_REQUIRED));
        return Ok((StatusCode::BAD_REQUEST, render(&state, "gate.html", &page)?).into_response());
    };

    let now = Timestamp::now();
    if state.limiter().is_locked(&code, now) {
        AuditEvent::new("verify.locked", code.as_str()).emit();
        let page = gate_page().with_notice(Notice::new(Tone::Error, messages::TOO_MANY_ATTEMPTS));
        return Ok((StatusCode::TOO_MANY_REQUESTS, render(&state, "gate.html", &page)?).into_response());
    }

    let records = state.store.questionnaires(&code).await?;
    match gate::verify(records, &code, birthdate) {
        GateOutcome::Verified(history) => {
            state.limiter().clear(&code);
            AuditEvent::new("verify.success", code.as_str())
                .with_details(json!({ "sessions": history.entries().len() }))
                .emit();

            let token = state.sessions.issue(&code, now)?;
            let target = match Target::parse(timestamp.as_deref()) {
                Target::At(ts) => Some(ts),
                Target::Latest | Target::Invalid => None,
            };
            Ok((
                StatusCode::SEE_OTHER,
                [
                    (LOCATION, page_href(&code, target)),
                    (SET_COOKIE, state.sessions.set_cookie(&token)),
                ],
            )
                .into_response())
        }
        GateOutcome::Mismatch => {
            state.limiter().record_failure(&code, now);
            AuditEvent::new("verify.mismatch", code.as_str()).emit();
            let page = gate_page().mismatch(state.support_email.clone());
            Ok((StatusCode::UNAUTHORIZED, render(&state, "gate.html", &page)?).into_response())
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LogoutForm {
    #[serde(default)]
    pub uuid: Option<String>,
}

/// `POST /logout`: drop the session cookie and return to the gate.
pub async fn logout<S: RecordStore>(
    State(state): State<AppState<S>>,
    Form(form): Form<LogoutForm>,
) -> Response {
    let location = form
        .uuid
        .as_deref()
        .and_then(|raw| AccessCode::parse(raw).ok())
        .map(|code| page_href(&code, None))
        .unwrap_or_else(|| "/".to_string());
    (
        StatusCode::SEE_OTHER,
        [
            (LOCATION, location),
            (SET_COOKIE, state.sessions.clear_cookie()),
        ],
    )
        .into_response()
}
