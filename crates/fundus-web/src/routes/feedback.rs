use axum::Form;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{Html, IntoResponse, Response};
use jiff::Timestamp;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, warn};

use fundus_core::access_code::AccessCode;
use fundus_core::messages;
use fundus_core::models::feedback::{Feedback, FeedbackAnswers};
use fundus_export::pages::Notice;
use fundus_export::sections::Tone;
use fundus_storage::error::StorageError;
use fundus_storage::store::RecordStore;

use super::{non_empty, results_page};
use crate::audit::AuditEvent;
use crate::error::ApiError;
use crate::state::AppState;

/// Survey form as posted by the results page. Ratings are optional here so
/// an incomplete form re-renders with a message instead of a rejection.
#[derive(Debug, Default, Deserialize)]
pub struct FeedbackForm {
    #[serde(default)]
    pub uuid: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    pub overall_satisfaction: Option<u8>,
    pub ease_of_use: Option<u8>,
    pub clarity_of_results: Option<u8>,
    pub explanation_quality: Option<u8>,
    pub wait_time: Option<u8>,
    pub recommend_likelihood: Option<u8>,
    #[serde(default)]
    pub good_points: String,
    #[serde(default)]
    pub improvements: String,
    #[serde(default)]
    pub comments: String,
}

impl FeedbackForm {
    fn answers(&self) -> Option<FeedbackAnswers> {
        Some(FeedbackAnswers {
            overall_satisfaction: self.overall_satisfaction?,
            ease_of_use: self.ease_of_use?,
            clarity_of_results: self.clarity_of_results?,
            explanation_quality: self.explanation_quality?,
            wait_time: self.wait_time?,
            recommend_likelihood: self.recommend_likelihood?,
            good_points: self.good_points.clone(),
            improvements: self.improvements.clone(),
            comments: self.comments.clone(),
        })
    }
}

/// `POST /feedback`: store one survey response per access code.
pub async fn submit<S: RecordStore>(
    State(state): State<AppState<S>>,
    headers: HeaderMap,
    Form(form): Form<FeedbackForm>,
) -> Result<Response, ApiError> {
    let code = AccessCode::parse(&form.uuid)?;
    state.sessions.authorize(&headers, &code)?;

    let notice = match form.answers() {
        None => Notice::new(Tone::Error, messages::FEEDBACK_INVALID),
        Some(answers) => match Feedback::new(code.clone(), answers, Timestamp::now()) {
            Err(e) => {
                warn!(error = %e, "rejected feedback");
                Notice::new(Tone::Error, messages::FEEDBACK_INVALID)
            }
            Ok(feedback) => store_feedback(&state, &feedback).await,
        },
    };

    let timestamp = non_empty(form.timestamp.as_deref());
    let html: Html<String> = results_page(&state, &code, timestamp.as_deref(), vec![notice]).await?;
    Ok(html.into_response())
}

async fn store_feedback<S: RecordStore>(state: &AppState<S>, feedback: &Feedback) -> Notice {
    let code = &feedback.access_code;

    match state.store.feedback_exists(code).await {
        Ok(true) => return Notice::new(Tone::Info, messages::FEEDBACK_ALREADY_SUBMITTED),
        Ok(false) => {}
        Err(e) => warn!(error = %e, "feedback existence check failed; attempting insert"),
    }

    match state.store.insert_feedback(feedback).await {
        Ok(()) => {
            AuditEvent::new("feedback.submit", code.as_str())
                .with_details(json!({ "id": feedback.id.to_string() }))
                .emit();
            Notice::new(Tone::Success, messages::FEEDBACK_THANKS)
        }
        Err(StorageError::AlreadyExists { .. }) => {
            Notice::new(Tone::Info, messages::FEEDBACK_ALREADY_SUBMITTED)
        }
        Err(e) => {
            error!(error = %e, "failed to store feedback");
            Notice::new(Tone::Error, messages::GENERIC_ERROR)
        }
    }
}
