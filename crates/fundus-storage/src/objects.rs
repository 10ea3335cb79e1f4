//! Thin wrappers over the S3 calls the store needs. Service errors are
//! mapped onto [`StorageError`] here so callers never see SDK types.

use aws_sdk_s3::Client;
use aws_sdk_s3::error::ProvideErrorMetadata;
use aws_smithy_types::byte_stream::ByteStream;

use crate::error::StorageError;

pub async fn get_object(client: &Client, bucket: &str, key: &str) -> Result<Vec<u8>, StorageError> {
    let output = match client.get_object().bucket(bucket).key(key).send().await {
        Ok(output) => output,
        Err(e) => {
            let err = e.into_service_error();
            return Err(if err.is_no_such_key() {
                StorageError::NotFound { key: key.to_string() }
            } else {
                StorageError::GetObject(format!("{key}: {err}"))
            });
        }
    };

    let data = output
        .body
        .collect()
        .await
        .map_err(|e| StorageError::GetObject(format!("{key}: {e}")))?;
    Ok(data.into_bytes().to_vec())
}

/// `HEAD` the key. A missing key is `Ok(false)`, not an error.
pub async fn object_exists(client: &Client, bucket: &str, key: &str) -> Result<bool, StorageError> {
    match client.head_object().bucket(bucket).key(key).send().await {
        Ok(_) => Ok(true),
        Err(e) => {
            let err = e.into_service_error();
            if err.is_not_found() {
                Ok(false)
            } else {
                Err(StorageError::GetObject(format!("{key}: {err}")))
            }
        }
    }
}

/// Create `key` with `If-None-Match: *`. Fails with
/// `StorageError::AlreadyExists` when any object is already there.
pub async fn put_object_if_absent(
    client: &Client,
    bucket: &str,
    key: &str,
    body: Vec<u8>,
    content_type: &str,
) -> Result<(), StorageError> {
    let result = client
        .put_object()
        .bucket(bucket)
        .key(key)
        .content_type(content_type)
        .if_none_match("*")
        .body(ByteStream::from(body))
        .send()
        .await;

    match result {
        Ok(_) => Ok(()),
        Err(e) => {
            let err = e.into_service_error();
            // 412 when the key exists, 409 when a concurrent conditional write won
            match err.code() {
                Some("PreconditionFailed" | "ConditionalRequestConflict") => {
                    Err(StorageError::AlreadyExists { key: key.to_string() })
                }
                _ => Err(StorageError::PutObject(format!("{key}: {err}"))),
            }
        }
    }
}

/// Keys under `prefix` ending in `suffix`, across all result pages.
pub async fn list_keys(
    client: &Client,
    bucket: &str,
    prefix: &str,
    suffix: &str,
) -> Result<Vec<String>, StorageError> {
    let mut pages = client
        .list_objects_v2()
        .bucket(bucket)
        .prefix(prefix)
        .into_paginator()
        .send();

    let mut keys = Vec::new();
    while let Some(page) = pages.next().await {
        let page = page.map_err(|e| StorageError::ListObjects(format!("{prefix}: {e}")))?;
        keys.extend(
            page.contents()
                .iter()
                .filter_map(|obj| obj.key())
                .filter(|key| key.ends_with(suffix))
                .map(str::to_string),
        );
    }
    Ok(keys)
}
