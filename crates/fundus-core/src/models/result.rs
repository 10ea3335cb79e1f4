use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::access_code::AccessCode;
use crate::risk::normalize_score;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum EyeSide {
    Right,
    Left,
}

impl EyeSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Right => "right",
            Self::Left => "left",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Right => "右目",
            Self::Left => "左目",
        }
    }
}

impl std::fmt::Display for EyeSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// AI pipeline output for one eye of one capture session.
///
/// Two encodings exist in storage: flat columns, and an `analysis` object
/// (either embedded JSON or a JSON-encoded string). Use [`ResultRecord::findings`]
/// rather than reading the fields directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub access_code: AccessCode,
    pub captured_at: Timestamp,
    pub eye: EyeSide,
    #[serde(default)]
    pub fundus_age: Option<i32>,
    #[serde(default)]
    pub glaucoma_risk: Option<f64>,
    #[serde(default)]
    pub atherosclerosis_risk: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
struct EmbeddedAnalysis {
    #[serde(default)]
    fundus_age: Option<i32>,
    #[serde(default)]
    glaucoma_risk: Option<f64>,
    #[serde(default)]
    atherosclerosis_risk: Option<f64>,
}

/// Normalized per-eye values. `None` always means "not computed yet".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EyeFindings {
    pub eye: EyeSide,
    pub fundus_age: Option<i32>,
    pub glaucoma_risk: Option<f64>,
    pub atherosclerosis_risk: Option<f64>,
}

impl EyeFindings {
    pub fn is_empty(&self) -> bool {
        self.fundus_age.is_none()
            && self.glaucoma_risk.is_none()
            && self.atherosclerosis_risk.is_none()
    }
}

impl ResultRecord {
    /// Merge both encodings. Flat columns win; a malformed embedded object
    /// contributes nothing.
    pub fn findings(&self) -> EyeFindings {
        let embedded = self.embedded_analysis();
        EyeFindings {
            eye: self.eye,
            fundus_age: self.fundus_age.or(embedded.fundus_age),
            glaucoma_risk: normalize_score(self.glaucoma_risk.or(embedded.glaucoma_risk)),
            atherosclerosis_risk: normalize_score(
                self.atherosclerosis_risk.or(embedded.atherosclerosis_risk),
            ),
        }
    }

    fn embedded_analysis(&self) -> EmbeddedAnalysis {
        let parsed = match &self.analysis {
            None | Some(serde_json::Value::Null) => return EmbeddedAnalysis::default(),
            Some(serde_json::Value::String(raw)) => serde_json::from_str(raw),
            Some(value) => serde_json::from_value(value.clone()),
        };
        parsed.unwrap_or_else(|e| {
            tracing::warn!(
                access_code = %self.access_code,
                captured_at = %self.captured_at,
                eye = %self.eye,
                error = %e,
                "malformed embedded analysis, treating as no data"
            );
            EmbeddedAnalysis::default()
        })
    }
}
