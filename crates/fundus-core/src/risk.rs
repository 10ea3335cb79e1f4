use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::messages;

/// Ordinal risk band derived from a continuous score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum RiskBand {
    Low,
    Medium,
    High,
}

impl RiskBand {
    /// Lowest score that bands as medium.
    pub const MEDIUM_FLOOR: f64 = 0.3;
    /// Lowest score that bands as high.
    pub const HIGH_FLOOR: f64 = 0.7;

    /// Band a score. Lower edges are closed, upper edges open.
    pub fn classify(score: f64) -> Self {
        if score < Self::MEDIUM_FLOOR {
            Self::Low
        } else if score < Self::HIGH_FLOOR {
            Self::Medium
        } else {
            Self::High
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "リスク：低",
            Self::Medium => "リスク：中",
            Self::High => "リスク：高",
        }
    }

    pub fn recommendation(&self) -> &'static str {
        match self {
            Self::Low => "安心できる状態です。",
            Self::Medium => "健康に気をつけて生活習慣を見直しましょう。",
            Self::High => "気になる場合は専門家に相談すると安心です。",
        }
    }
}

impl std::fmt::Display for RiskBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

/// Normalize a stored score: NaN is treated as absent and everything else
/// is clamped into `[0, 1]`.
pub fn normalize_score(score: Option<f64>) -> Option<f64> {
    score
        .filter(|s| !s.is_nan())
        .map(|s| s.clamp(0.0, 1.0))
}

/// Band an optional score. `None` means the score has not been computed.
pub fn classify(score: Option<f64>) -> Option<RiskBand> {
    normalize_score(score).map(RiskBand::classify)
}

/// Combine left and right eye scores into one value.
///
/// Both present: their mean. One present: that one. Neither: `None`.
pub fn bilateral_average(left: Option<f64>, right: Option<f64>) -> Option<f64> {
    match (normalize_score(left), normalize_score(right)) {
        (Some(l), Some(r)) => Some((l + r) / 2.0),
        (Some(s), None) | (None, Some(s)) => Some(s),
        (None, None) => None,
    }
}

/// A score ready for display: the banding plus its fixed wording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RiskSummary {
    pub score: Option<f64>,
    pub band: Option<RiskBand>,
    pub label: String,
    pub recommendation: String,
}

impl RiskSummary {
    pub fn from_score(score: Option<f64>) -> Self {
        let score = normalize_score(score);
        match score.map(RiskBand::classify) {
            Some(band) => Self {
                score,
                band: Some(band),
                label: band.label().to_string(),
                recommendation: band.recommendation().to_string(),
            },
            None => Self {
                score: None,
                band: None,
                label: messages::NO_DATA.to_string(),
                recommendation: String::new(),
            },
        }
    }

    pub fn has_data(&self) -> bool {
        self.band.is_some()
    }
}
