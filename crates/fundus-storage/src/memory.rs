use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::Path;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use tracing::info;

use fundus_core::access_code::AccessCode;
use fundus_core::keys;
use fundus_core::models::feedback::Feedback;
use fundus_core::models::questionnaire::Questionnaire;
use fundus_core::models::result::ResultRecord;

use crate::error::StorageError;
use crate::store::RecordStore;

/// Contents of a seed file for [`MemoryStore`].
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub questionnaires: Vec<Questionnaire>,
    #[serde(default)]
    pub results: Vec<ResultRecord>,
    #[serde(default)]
    pub feedback: Vec<Feedback>,
}

#[derive(Debug, Default)]
struct Tables {
    questionnaires: Vec<Questionnaire>,
    results: Vec<ResultRecord>,
    feedback: HashMap<AccessCode, Feedback>,
}

/// Process-local store for development and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_seed(seed: SeedData) -> Self {
        let feedback = seed
            .feedback
            .into_iter()
            .map(|f| (f.access_code.clone(), f))
            .collect();
        Self {
            tables: Arc::new(RwLock::new(Tables {
                questionnaires: seed.questionnaires,
                results: seed.results,
                feedback,
            })),
        }
    }

    /// Load a JSON seed file (see [`SeedData`]).
    pub fn load_seed_file(path: &Path) -> Result<Self, StorageError> {
        let contents = std::fs::read(path)
            .map_err(|e| StorageError::Seed(format!("failed to read {}: {e}", path.display())))?;
        let seed: SeedData = serde_json::from_slice(&contents)?;
        info!(
            path = %path.display(),
            questionnaires = seed.questionnaires.len(),
            results = seed.results.len(),
            "loaded seed data"
        );
        Ok(Self::from_seed(seed))
    }

    pub fn insert_questionnaire(&self, questionnaire: Questionnaire) {
        self.write().questionnaires.push(questionnaire);
    }

    pub fn insert_result(&self, result: ResultRecord) {
        self.write().results.push(result);
    }

    pub fn feedback(&self, code: &AccessCode) -> Option<Feedback> {
        self.read().feedback.get(code).cloned()
    }

    // A poisoned lock only means a writer panicked mid-push; the tables are
    // still structurally valid.
    fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl RecordStore for MemoryStore {
    async fn questionnaires(&self, code: &AccessCode) -> Result<Vec<Questionnaire>, StorageError> {
        Ok(self
            .read()
            .questionnaires
            .iter()
            .filter(|q| &q.access_code == code)
            .cloned()
            .collect())
    }

    async fn results(
        &self,
        code: &AccessCode,
        captured_at: Timestamp,
    ) -> Result<Vec<ResultRecord>, StorageError> {
        Ok(self
            .read()
            .results
            .iter()
            .filter(|r| &r.access_code == code && r.captured_at == captured_at)
            .cloned()
            .collect())
    }

    async fn feedback_exists(&self, code: &AccessCode) -> Result<bool, StorageError> {
        Ok(self.read().feedback.contains_key(code))
    }

    async fn insert_feedback(&self, feedback: &Feedback) -> Result<(), StorageError> {
        match self.write().feedback.entry(feedback.access_code.clone()) {
            Entry::Occupied(_) => Err(StorageError::AlreadyExists {
                key: keys::feedback(&feedback.access_code),
            }),
            Entry::Vacant(slot) => {
                slot.insert(feedback.clone());
                Ok(())
            }
        }
    }
}
