//! fundus-core
//!
//! Pure domain types and decision rules for the screening results view:
//! identity gate, history selection, risk banding, age rules, and the
//! storage key layout. No AWS SDK dependency.

pub mod access_code;
pub mod age;
pub mod error;
pub mod gate;
pub mod history;
pub mod keys;
pub mod messages;
pub mod models;
pub mod report;
pub mod risk;
