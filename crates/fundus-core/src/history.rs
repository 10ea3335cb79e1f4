use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::questionnaire::Questionnaire;

/// Capture sessions visible to a verified caller, newest first.
#[derive(Debug, Clone, PartialEq)]
pub struct History {
    entries: Vec<Questionnaire>,
}

/// One row of the history list on the results page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct HistoryLink {
    pub captured_at: Timestamp,
    pub selected: bool,
}

impl History {
    pub fn new(mut entries: Vec<Questionnaire>) -> Self {
        entries.sort_by(|a, b| b.captured_at.cmp(&a.captured_at));
        entries.dedup_by(|a, b| a.captured_at == b.captured_at);
        Self { entries }
    }

    pub fn entries(&self) -> &[Questionnaire] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn latest(&self) -> Option<&Questionnaire> {
        self.entries.first()
    }

    /// Resolve which entry to display.
    ///
    /// Without a target the most recent entry is chosen. A target must match
    /// an entry exactly; a target that matches nothing resolves to `None`
    /// rather than falling back to the latest entry.
    pub fn select(&self, target: Option<Timestamp>) -> Option<&Questionnaire> {
        match target {
            Some(ts) => self.entries.iter().find(|q| q.captured_at == ts),
            None => self.latest(),
        }
    }

    pub fn links(&self, selected: Option<Timestamp>) -> Vec<HistoryLink> {
        self.entries
            .iter()
            .map(|q| HistoryLink {
                captured_at: q.captured_at,
                selected: Some(q.captured_at) == selected,
            })
            .collect()
    }
}
