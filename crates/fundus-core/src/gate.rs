use std::collections::HashMap;

use jiff::civil::Date;
use jiff::{SignedDuration, Timestamp};

use crate::access_code::AccessCode;
use crate::history::History;
use crate::models::questionnaire::Questionnaire;

/// Outcome of a birthdate check.
#[derive(Debug, Clone, PartialEq)]
pub enum GateOutcome {
    /// At least one record for the code carries the entered birthdate.
    /// Every record sharing the code becomes visible.
    Verified(History),
    /// Wrong birthdate and unknown code are deliberately indistinguishable.
    Mismatch,
}

/// Check `birthdate` against the records stored for `code`.
///
/// `records` is whatever the store returned for the code; rows for other
/// codes are ignored.
pub fn verify(records: Vec<Questionnaire>, code: &AccessCode, birthdate: Date) -> GateOutcome {
    let rows: Vec<Questionnaire> = records
        .into_iter()
        .filter(|q| &q.access_code == code)
        .collect();

    if rows.iter().any(|q| q.birthdate == birthdate) {
        GateOutcome::Verified(History::new(rows))
    } else {
        GateOutcome::Mismatch
    }
}

/// Per-code failed attempt counter with a sliding window.
///
/// Unknown codes are counted exactly like known ones.
#[derive(Debug)]
pub struct AttemptLimiter {
    max_failures: u32,
    window: SignedDuration,
    failures: HashMap<AccessCode, Vec<Timestamp>>,
}

impl AttemptLimiter {
    const SWEEP_THRESHOLD: usize = 10_000;

    /// `max_failures == 0` disables the limit.
    pub fn new(max_failures: u32, window: SignedDuration) -> Self {
        Self {
            max_failures,
            window,
            failures: HashMap::new(),
        }
    }

    pub fn is_locked(&mut self, code: &AccessCode, now: Timestamp) -> bool {
        if self.max_failures == 0 {
            return false;
        }
        self.prune(code, now);
        self.failures
            .get(code)
            .is_some_and(|f| f.len() >= self.max_failures as usize)
    }

    pub fn record_failure(&mut self, code: &AccessCode, now: Timestamp) {
        if self.max_failures == 0 {
            return;
        }
        self.prune(code, now);
        if self.failures.len() >= Self::SWEEP_THRESHOLD {
            self.sweep(now);
        }
        self.failures.entry(code.clone()).or_default().push(now);
    }

    pub fn clear(&mut self, code: &AccessCode) {
        self.failures.remove(code);
    }

    fn prune(&mut self, code: &AccessCode, now: Timestamp) {
        let window = self.window;
        if let Some(attempts) = self.failures.get_mut(code) {
            attempts.retain(|at| now.duration_since(*at) < window);
            if attempts.is_empty() {
                self.failures.remove(code);
            }
        }
    }

    /// Drop every code whose failures have all aged out of the window.
    fn sweep(&mut self, now: Timestamp) {
        let window = self.window;
        self.failures.retain(|_, attempts| {
            attempts.retain(|at| now.duration_since(*at) < window);
            !attempts.is_empty()
        });
    }
}
