//! Template contexts for the HTML pages.

use serde::Serialize;

use fundus_core::messages;
use fundus_core::report::ScreeningReport;

use crate::sections::{Finding, Row, Tone, findings, profile_rows};

#[derive(Debug, Clone, Serialize)]
pub struct Notice {
    pub tone: Tone,
    pub text: String,
}

impl Notice {
    pub fn new(tone: Tone, text: impl Into<String>) -> Self {
        Self {
            tone,
            text: text.into(),
        }
    }
}

/// Birthdate entry form.
#[derive(Debug, Clone, Serialize)]
pub struct GatePage {
    pub title: &'static str,
    pub prompt: &'static str,
    pub access_code: String,
    pub timestamp: Option<String>,
    pub notice: Option<Notice>,
    pub hints: Vec<&'static str>,
    pub support_email: Option<String>,
}

impl GatePage {
    pub fn new(access_code: impl Into<String>, timestamp: Option<String>) -> Self {
        Self {
            title: messages::PAGE_TITLE,
            prompt: messages::VERIFY_PROMPT,
            access_code: access_code.into(),
            timestamp,
            notice: None,
            hints: Vec::new(),
            support_email: None,
        }
    }

    /// Show the generic mismatch message with troubleshooting hints.
    pub fn mismatch(mut self, support_email: Option<String>) -> Self {
        self.notice = Some(Notice::new(Tone::Warning, messages::NO_MATCH));
        self.hints = messages::NO_MATCH_HINTS.to_vec();
        self.support_email = support_email;
        self
    }

    pub fn with_notice(mut self, notice: Notice) -> Self {
        self.notice = Some(notice);
        self
    }
}

/// Standalone message page (missing access code, errors).
#[derive(Debug, Clone, Serialize)]
pub struct NoticePage {
    pub title: &'static str,
    pub notice: Notice,
}

impl NoticePage {
    pub fn new(tone: Tone, text: impl Into<String>) -> Self {
        Self {
            title: messages::PAGE_TITLE,
            notice: Notice::new(tone, text),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HistoryItem {
    pub label: String,
    pub href: String,
    pub selected: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct EyeImage {
    pub label: &'static str,
    pub url: Option<String>,
}

/// The selected capture session, flattened for the template.
#[derive(Debug, Clone, Serialize)]
pub struct ReportSection {
    pub profile: Vec<Row>,
    pub images: Vec<EyeImage>,
    pub pending: bool,
    pub findings: Vec<Finding>,
    pub pdf_href: String,
}

impl ReportSection {
    pub fn new(report: &ScreeningReport, pdf_href: String) -> Self {
        Self {
            profile: profile_rows(report),
            images: vec![
                EyeImage {
                    label: "右目",
                    url: report.images.right.clone(),
                },
                EyeImage {
                    label: "左目",
                    url: report.images.left.clone(),
                },
            ],
            pending: report.pending,
            findings: findings(report),
            pdf_href,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RatingQuestion {
    pub name: &'static str,
    pub label: &'static str,
}

pub const RATING_QUESTIONS: [RatingQuestion; 6] = [
    RatingQuestion { name: "overall_satisfaction", label: "全体の満足度" },
    RatingQuestion { name: "ease_of_use", label: "操作のわかりやすさ" },
    RatingQuestion { name: "clarity_of_results", label: "結果の見やすさ" },
    RatingQuestion { name: "explanation_quality", label: "説明のわかりやすさ" },
    RatingQuestion { name: "wait_time", label: "待ち時間" },
    RatingQuestion { name: "recommend_likelihood", label: "他の人にすすめたいか" },
];

#[derive(Debug, Clone, Serialize)]
pub struct FeedbackPanel {
    pub access_code: String,
    pub timestamp: Option<String>,
    pub submitted: bool,
    pub questions: [RatingQuestion; 6],
}

impl FeedbackPanel {
    pub fn new(access_code: impl Into<String>, timestamp: Option<String>, submitted: bool) -> Self {
        Self {
            access_code: access_code.into(),
            timestamp,
            submitted,
            questions: RATING_QUESTIONS,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ResultsPage {
    pub title: &'static str,
    pub access_code: String,
    pub notices: Vec<Notice>,
    pub disclaimer: [&'static str; 2],
    /// `None` when the requested history entry does not exist.
    pub report: Option<ReportSection>,
    pub history: Vec<HistoryItem>,
    /// True while some entry is not the one on screen, so a link exists.
    pub show_history: bool,
    pub feedback: FeedbackPanel,
    pub messages: PageMessages,
}

/// Fixed strings the results template needs.
#[derive(Debug, Clone, Serialize)]
pub struct PageMessages {
    pub history_not_found: &'static str,
    pub analysis_pending: &'static str,
    pub image_not_captured: &'static str,
    pub feedback_already_submitted: &'static str,
}

impl Default for PageMessages {
    fn default() -> Self {
        Self {
            history_not_found: messages::HISTORY_NOT_FOUND,
            analysis_pending: messages::ANALYSIS_PENDING,
            image_not_captured: messages::IMAGE_NOT_CAPTURED,
            feedback_already_submitted: messages::FEEDBACK_ALREADY_SUBMITTED,
        }
    }
}

impl ResultsPage {
    pub fn new(
        access_code: impl Into<String>,
        report: Option<ReportSection>,
        history: Vec<HistoryItem>,
        feedback: FeedbackPanel,
    ) -> Self {
        Self {
            title: messages::PAGE_TITLE,
            access_code: access_code.into(),
            notices: Vec::new(),
            disclaimer: messages::DISCLAIMER,
            report,
            show_history: history.iter().any(|item| !item.selected),
            history,
            feedback,
            messages: PageMessages::default(),
        }
    }

    pub fn with_notice(mut self, notice: Notice) -> Self {
        self.notices.push(notice);
        self
    }
}
