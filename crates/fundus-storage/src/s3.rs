use aws_sdk_s3::Client;
use jiff::Timestamp;
use serde::de::DeserializeOwned;
use tracing::debug;

use fundus_core::access_code::AccessCode;
use fundus_core::keys;
use fundus_core::models::feedback::Feedback;
use fundus_core::models::questionnaire::Questionnaire;
use fundus_core::models::result::ResultRecord;

use crate::error::StorageError;
use crate::objects;
use crate::store::RecordStore;

/// Records stored as JSON objects in a single bucket, laid out by
/// [`fundus_core::keys`].
#[derive(Clone)]
pub struct S3Store {
    client: Client,
    bucket: String,
}

impl S3Store {
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    async fn read_all<T: DeserializeOwned>(&self, prefix: &str) -> Result<Vec<T>, StorageError> {
        let keys = objects::list_keys(&self.client, &self.bucket, prefix, ".json").await?;

        let mut records = Vec::with_capacity(keys.len());
        for key in &keys {
            let body = objects::get_object(&self.client, &self.bucket, key).await?;
            records.push(serde_json::from_slice(&body)?);
        }
        debug!(prefix, count = records.len(), "read records");
        Ok(records)
    }
}

impl RecordStore for S3Store {
    async fn questionnaires(&self, code: &AccessCode) -> Result<Vec<Questionnaire>, StorageError> {
        self.read_all(&keys::questionnaire_prefix(code)).await
    }

    async fn results(
        &self,
        code: &AccessCode,
        captured_at: Timestamp,
    ) -> Result<Vec<ResultRecord>, StorageError> {
        self.read_all(&keys::results_prefix(code, captured_at)).await
    }

    async fn feedback_exists(&self, code: &AccessCode) -> Result<bool, StorageError> {
        objects::object_exists(&self.client, &self.bucket, &keys::feedback(code)).await
    }

    async fn insert_feedback(&self, feedback: &Feedback) -> Result<(), StorageError> {
        let key = keys::feedback(&feedback.access_code);
        let body = serde_json::to_vec_pretty(feedback)?;
        objects::put_object_if_absent(&self.client, &self.bucket, &key, body, "application/json")
            .await
    }
}
