use serde::Serialize;
use tracing::info;

/// Application-level audit record for patient-facing actions.
///
/// Birthdates and survey text are never part of an event.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEvent {
    pub action: &'static str,
    pub access_code: String,
    pub details: Option<serde_json::Value>,
}

impl AuditEvent {
    pub fn new(action: &'static str, access_code: impl Into<String>) -> Self {
        Self {
            action,
            access_code: access_code.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn emit(&self) {
        let details = self
            .details
            .as_ref()
            .map(|d| d.to_string())
            .unwrap_or_default();
        info!(
            audit.action = self.action,
            audit.access_code = %self.access_code,
            audit.details = %details,
            "audit event"
        );
    }
}
