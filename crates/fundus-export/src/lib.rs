//! fundus-export
//!
//! HTML page rendering (Tera) and the downloadable PDF report.

pub mod barcode;
pub mod error;
pub mod pages;
pub mod pdf;
pub mod render;
pub mod sections;
pub mod styles;
