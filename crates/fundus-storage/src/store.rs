use std::future::Future;

use jiff::Timestamp;

use fundus_core::access_code::AccessCode;
use fundus_core::models::feedback::Feedback;
use fundus_core::models::questionnaire::Questionnaire;
use fundus_core::models::result::ResultRecord;

use crate::error::StorageError;

/// Equality-keyed access to the three record tables.
///
/// Every read is scoped to a single access code. The only write is the
/// one-per-code feedback insert.
pub trait RecordStore: Clone + Send + Sync + 'static {
    /// All questionnaires stored under `code`, in no particular order.
    fn questionnaires(
        &self,
        code: &AccessCode,
    ) -> impl Future<Output = Result<Vec<Questionnaire>, StorageError>> + Send;

    /// Zero, one or two result records (one per eye) for a capture session.
    fn results(
        &self,
        code: &AccessCode,
        captured_at: Timestamp,
    ) -> impl Future<Output = Result<Vec<ResultRecord>, StorageError>> + Send;

    fn feedback_exists(
        &self,
        code: &AccessCode,
    ) -> impl Future<Output = Result<bool, StorageError>> + Send;

    /// Insert feedback. Fails with `StorageError::AlreadyExists` if the code
    /// already has a response.
    fn insert_feedback(
        &self,
        feedback: &Feedback,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;
}
