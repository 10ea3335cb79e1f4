pub mod feedback;
pub mod health;
pub mod page;
pub mod report;

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use tracing::warn;

use fundus_core::access_code::AccessCode;
use fundus_core::history::History;
use fundus_core::report::ScreeningReport;
use fundus_export::pages::{FeedbackPanel, HistoryItem, Notice, NoticePage, ReportSection, ResultsPage};
use fundus_export::sections::Tone;
use fundus_storage::store::RecordStore;

use crate::error::ApiError;
use crate::state::AppState;

/// `?uuid=…&timestamp=…` as carried by the barcode link and history links.
#[derive(Debug, Default, Deserialize)]
pub struct ViewQuery {
    pub uuid: Option<String>,
    pub timestamp: Option<String>,
}

impl ViewQuery {
    pub fn access_code(&self) -> Option<AccessCode> {
        self.uuid.as_deref().and_then(|raw| AccessCode::parse(raw).ok())
    }

    pub fn timestamp(&self) -> Option<String> {
        non_empty(self.timestamp.as_deref())
    }
}

pub(crate) fn non_empty(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Which history entry a request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Target {
    Latest,
    At(Timestamp),
    /// Present but unparseable. Never matches an entry.
    Invalid,
}

impl Target {
    pub(crate) fn parse(raw: Option<&str>) -> Self {
        match raw {
            None => Target::Latest,
            Some(s) => s.parse().map(Target::At).unwrap_or(Target::Invalid),
        }
    }
}

/// History plus the report for the selected entry, if any.
pub(crate) struct Selection {
    pub history: History,
    pub report: Option<ScreeningReport>,
}

pub(crate) async fn select_report<S: RecordStore>(
    state: &AppState<S>,
    code: &AccessCode,
    raw_timestamp: Option<&str>,
) -> Result<Selection, ApiError> {
    let history = History::new(state.store.questionnaires(code).await?);

    let selected = match Target::parse(raw_timestamp) {
        Target::Latest => history.latest(),
        Target::At(ts) => history.select(Some(ts)),
        Target::Invalid => None,
    };

    let report = match selected {
        Some(questionnaire) => {
            let results = state.store.results(code, questionnaire.captured_at).await?;
            Some(ScreeningReport::build(
                questionnaire,
                &results,
                state.today(),
                &state.time_zone,
            ))
        }
        None => None,
    };

    Ok(Selection { history, report })
}

pub(crate) fn page_href(code: &AccessCode, timestamp: Option<Timestamp>) -> String {
    match timestamp {
        Some(ts) => format!("/?uuid={code}&timestamp={ts}"),
        None => format!("/?uuid={code}"),
    }
}

pub(crate) fn pdf_href(code: &AccessCode, timestamp: Timestamp) -> String {
    format!("/report.pdf?uuid={code}&timestamp={timestamp}")
}

pub(crate) fn render<S, T: Serialize>(
    state: &AppState<S>,
    template: &str,
    page: &T,
) -> Result<Html<String>, ApiError> {
    Ok(Html(state.pages.render(template, page)?))
}

pub(crate) fn notice_page<S>(
    state: &AppState<S>,
    status: StatusCode,
    tone: Tone,
    text: &str,
) -> Result<Response, ApiError> {
    let html = render(state, "notice.html", &NoticePage::new(tone, text))?;
    Ok((status, html).into_response())
}

/// Render the results page for a verified caller.
pub(crate) async fn results_page<S: RecordStore>(
    state: &AppState<S>,
    code: &AccessCode,
    raw_timestamp: Option<&str>,
    notices: Vec<Notice>,
) -> Result<Html<String>, ApiError> {
    let Selection { history, report } = select_report(state, code, raw_timestamp).await?;

    let selected_at = report.as_ref().map(|r| r.captured_at);
    let section = report
        .as_ref()
        .map(|r| ReportSection::new(r, pdf_href(code, r.captured_at)));

    let items = history
        .links(selected_at)
        .into_iter()
        .map(|link| HistoryItem {
            label: link
                .captured_at
                .to_zoned(state.time_zone.clone())
                .strftime("%Y-%m-%d %H:%M")
                .to_string(),
            href: page_href(code, Some(link.captured_at)),
            selected: link.selected,
        })
        .collect();

    let submitted = match state.store.feedback_exists(code).await {
        Ok(exists) => exists,
        Err(e) => {
            warn!(error = %e, "feedback lookup failed; showing the survey");
            false
        }
    };

    let feedback = FeedbackPanel::new(
        code.as_str(),
        selected_at.map(|ts| ts.to_string()),
        submitted,
    );
    let mut page = ResultsPage::new(code.as_str(), section, items, feedback);
    for notice in notices {
        page = page.with_notice(notice);
    }

    render(state, "results.html", &page)
}
