//! Object key conventions.
//!
//! Pure string functions: these define the canonical layout of records in the
//! bucket. Timestamps render as RFC 3339 in UTC.

use jiff::Timestamp;

use crate::access_code::AccessCode;
use crate::models::result::EyeSide;

pub const QUESTIONNAIRES_PREFIX: &str = "questionnaires/";
pub const RESULTS_PREFIX: &str = "results/";
pub const FEEDBACK_PREFIX: &str = "feedback/";

pub fn questionnaire_prefix(code: &AccessCode) -> String {
    format!("{QUESTIONNAIRES_PREFIX}{code}/")
}

pub fn questionnaire(code: &AccessCode, captured_at: Timestamp) -> String {
    format!("{QUESTIONNAIRES_PREFIX}{code}/{captured_at}.json")
}

pub fn results_prefix(code: &AccessCode, captured_at: Timestamp) -> String {
    format!("{RESULTS_PREFIX}{code}/{captured_at}/")
}

pub fn result(code: &AccessCode, captured_at: Timestamp, eye: EyeSide) -> String {
    format!("{RESULTS_PREFIX}{code}/{captured_at}/{eye}.json")
}

pub fn feedback(code: &AccessCode) -> String {
    format!("{FEEDBACK_PREFIX}{code}.json")
}
