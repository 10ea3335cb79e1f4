use jiff::Timestamp;
use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::access_code::AccessCode;

/// Intake answers and image references for one capture session.
///
/// Written once by the intake flow and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Questionnaire {
    pub access_code: AccessCode,
    pub captured_at: Timestamp,
    pub birthdate: Date,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub height_cm: Option<f64>,
    #[serde(default)]
    pub weight_kg: Option<f64>,
    #[serde(default)]
    pub health_status: Option<String>,
    #[serde(default)]
    pub image_url_right: Option<String>,
    #[serde(default)]
    pub image_url_left: Option<String>,
}
