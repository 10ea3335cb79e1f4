//! fundus-storage
//!
//! Record access for questionnaires, AI results and survey feedback.
//! Records are JSON objects in S3; an in-memory store backs local runs
//! and tests.

pub mod client;
pub mod error;
pub mod memory;
pub mod objects;
pub mod s3;
pub mod store;
