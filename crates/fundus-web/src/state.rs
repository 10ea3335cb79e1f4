use std::sync::{Arc, Mutex, MutexGuard};

use jiff::Timestamp;
use jiff::civil::Date;
use jiff::tz::TimeZone;

use fundus_core::gate::AttemptLimiter;
use fundus_export::error::ExportError;
use fundus_export::render::PageRenderer;
use fundus_export::styles::{ReportFont, ReportStyles};
use fundus_storage::store::RecordStore;

use crate::config::WebConfig;
use crate::images::ImageFetcher;
use crate::session::SessionKeys;

/// Shared application state, cloned into every handler.
#[derive(Clone)]
pub struct AppState<S> {
    pub store: S,
    pub pages: Arc<PageRenderer>,
    pub sessions: Arc<SessionKeys>,
    pub limiter: Arc<Mutex<AttemptLimiter>>,
    pub report_font: ReportFont,
    pub report_styles: Arc<ReportStyles>,
    pub images: ImageFetcher,
    pub time_zone: TimeZone,
    pub support_email: Option<String>,
}

impl<S: RecordStore> AppState<S> {
    pub fn new(store: S, config: &WebConfig, report_font: ReportFont) -> Result<Self, ExportError> {
        Ok(Self {
            store,
            pages: Arc::new(PageRenderer::new()?),
            sessions: Arc::new(SessionKeys::new(
                config.session_secret.as_bytes(),
                config.session_ttl,
                config.cookie_secure,
            )),
            limiter: Arc::new(Mutex::new(AttemptLimiter::new(
                config.max_failed_attempts,
                config.lockout_window,
            ))),
            report_font,
            report_styles: Arc::new(ReportStyles::default()),
            images: ImageFetcher::new(config.image_timeout),
            time_zone: config.time_zone.clone(),
            support_email: config.support_email.clone(),
        })
    }

    /// Calendar date in the configured zone, used for real-age.
    pub fn today(&self) -> Date {
        Timestamp::now().to_zoned(self.time_zone.clone()).date()
    }

    /// Never hold the guard across an `.await`.
    pub fn limiter(&self) -> MutexGuard<'_, AttemptLimiter> {
        self.limiter
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
