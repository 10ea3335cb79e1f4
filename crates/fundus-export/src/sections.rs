//! Display text derived from a [`ScreeningReport`], shared by the HTML page
//! and the PDF so both say the same thing.

use serde::Serialize;

use fundus_core::age::AgeDeltaBand;
use fundus_core::messages;
use fundus_core::report::ScreeningReport;
use fundus_core::risk::{RiskBand, RiskSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Success,
    Info,
    Warning,
    Error,
}

impl From<Option<RiskBand>> for Tone {
    fn from(band: Option<RiskBand>) -> Self {
        match band {
            Some(RiskBand::Low) => Tone::Success,
            Some(RiskBand::Medium) => Tone::Warning,
            Some(RiskBand::High) => Tone::Error,
            None => Tone::Info,
        }
    }
}

impl From<AgeDeltaBand> for Tone {
    fn from(band: AgeDeltaBand) -> Self {
        match band {
            AgeDeltaBand::Favorable => Tone::Success,
            AgeDeltaBand::MildCaution => Tone::Warning,
            AgeDeltaBand::StrongCaution => Tone::Error,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    pub label: String,
    pub value: String,
}

/// One block of the AI findings section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub heading: String,
    pub lines: Vec<String>,
    pub tone: Tone,
}

fn row(label: &str, value: Option<String>) -> Row {
    Row {
        label: label.to_string(),
        value: value.unwrap_or_else(|| messages::UNREGISTERED.to_string()),
    }
}

pub fn profile_rows(report: &ScreeningReport) -> Vec<Row> {
    let p = &report.profile;
    vec![
        row("性別", p.gender.clone()),
        row("誕生日", Some(p.birthdate.to_string())),
        row("身長", p.height_cm.map(|h| format!("{h} cm"))),
        row("体重", p.weight_kg.map(|w| format!("{w} kg"))),
        row("健康状態", p.health_status.clone()),
        row("撮影日", Some(report.capture_date.to_string())),
    ]
}

fn risk_finding(heading: String, summary: &RiskSummary) -> Finding {
    let mut lines = vec![summary.label.clone()];
    if !summary.recommendation.is_empty() {
        lines.push(summary.recommendation.clone());
    }
    Finding {
        heading,
        lines,
        tone: summary.band.into(),
    }
}

/// Findings in display order. Empty while the analysis is pending.
pub fn findings(report: &ScreeningReport) -> Vec<Finding> {
    if report.pending {
        return Vec::new();
    }

    let mut out = Vec::new();
    for eye in &report.eyes {
        if let Some(age) = &eye.fundus_age {
            out.push(Finding {
                heading: format!("眼底年齢（{}）", eye.label),
                lines: vec![
                    format!("実年齢: {}歳", report.real_age),
                    format!("眼底年齢: {}歳", age.fundus_age),
                    age.message.clone(),
                ],
                tone: age.band.into(),
            });
        }
    }
    for eye in &report.eyes {
        out.push(risk_finding(format!("緑内障リスク（{}）", eye.label), &eye.glaucoma));
    }
    out.push(risk_finding(
        "動脈硬化リスク（両眼）".to_string(),
        &report.atherosclerosis,
    ));
    out
}
