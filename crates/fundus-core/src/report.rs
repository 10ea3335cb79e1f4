//! View model shared by the results page, the JSON endpoint and the PDF.

use jiff::Timestamp;
use jiff::civil::Date;
use jiff::tz::TimeZone;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::access_code::AccessCode;
use crate::age::{FundusAgeSummary, real_age};
use crate::models::questionnaire::Questionnaire;
use crate::models::result::{EyeFindings, EyeSide, ResultRecord};
use crate::risk::{RiskSummary, bilateral_average};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Profile {
    pub gender: Option<String>,
    pub birthdate: Date,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub health_status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EyeImages {
    pub right: Option<String>,
    pub left: Option<String>,
}

/// Findings for one eye that has a result record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EyeSummary {
    pub eye: EyeSide,
    pub label: String,
    pub fundus_age: Option<FundusAgeSummary>,
    pub glaucoma: RiskSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScreeningReport {
    pub access_code: AccessCode,
    pub captured_at: Timestamp,
    /// Capture date in the deployment time zone.
    pub capture_date: Date,
    pub profile: Profile,
    pub real_age: i32,
    pub images: EyeImages,
    /// True while no result record carries any value.
    pub pending: bool,
    /// Right eye first. Eyes without a result record are omitted.
    pub eyes: Vec<EyeSummary>,
    /// Systemic risk, aggregated over both eyes.
    pub atherosclerosis: RiskSummary,
}

impl ScreeningReport {
    /// Assemble the report for one capture session.
    ///
    /// Result records belonging to another session are ignored.
    pub fn build(
        questionnaire: &Questionnaire,
        results: &[ResultRecord],
        today: Date,
        tz: &TimeZone,
    ) -> Self {
        let mut findings: Vec<EyeFindings> = results
            .iter()
            .filter(|r| {
                r.access_code == questionnaire.access_code
                    && r.captured_at == questionnaire.captured_at
            })
            .map(ResultRecord::findings)
            .collect();
        findings.sort_by_key(|f| f.eye);
        findings.dedup_by_key(|f| f.eye);

        let age = real_age(questionnaire.birthdate, today);
        let pending = findings.iter().all(EyeFindings::is_empty);

        let side = |eye: EyeSide| findings.iter().find(|f| f.eye == eye);
        let atherosclerosis = RiskSummary::from_score(bilateral_average(
            side(EyeSide::Left).and_then(|f| f.atherosclerosis_risk),
            side(EyeSide::Right).and_then(|f| f.atherosclerosis_risk),
        ));

        let eyes = findings
            .iter()
            .map(|f| EyeSummary {
                eye: f.eye,
                label: f.eye.label().to_string(),
                fundus_age: f.fundus_age.map(|fa| FundusAgeSummary::new(fa, age)),
                glaucoma: RiskSummary::from_score(f.glaucoma_risk),
            })
            .collect();

        Self {
            access_code: questionnaire.access_code.clone(),
            captured_at: questionnaire.captured_at,
            capture_date: questionnaire.captured_at.to_zoned(tz.clone()).date(),
            profile: Profile {
                gender: questionnaire.gender.clone(),
                birthdate: questionnaire.birthdate,
                height_cm: questionnaire.height_cm,
                weight_kg: questionnaire.weight_kg,
                health_status: questionnaire.health_status.clone(),
            },
            real_age: age,
            images: EyeImages {
                right: non_empty(questionnaire.image_url_right.as_deref()),
                left: non_empty(questionnaire.image_url_left.as_deref()),
            },
            pending,
            eyes,
            atherosclerosis,
        }
    }
}

fn non_empty(s: Option<&str>) -> Option<String> {
    s.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}
