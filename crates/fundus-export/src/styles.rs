use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::ExportError;

/// Page geometry and type sizes for the PDF report. Lengths are millimetres,
/// font sizes points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportStyles {
    pub page_width: f32,
    pub page_height: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub margin_left: f32,

    pub title_size: f32,
    pub heading_size: f32,
    pub body_size: f32,
    pub note_size: f32,

    pub barcode_width: f32,
    pub barcode_height: f32,

    pub thumbnail_size: f32,
    pub thumbnail_gap: f32,

    /// Extra indent for body lines under a heading.
    pub indent: f32,
}

impl Default for ReportStyles {
    fn default() -> Self {
        Self {
            page_width: 210.0,
            page_height: 297.0,
            margin_top: 14.0,
            margin_bottom: 14.0,
            margin_left: 12.0,
            title_size: 18.0,
            heading_size: 14.0,
            body_size: 11.0,
            note_size: 9.0,
            barcode_width: 80.0,
            barcode_height: 20.0,
            thumbnail_size: 60.0,
            thumbnail_gap: 7.0,
            indent: 4.0,
        }
    }
}

/// Typeface used for report text.
///
/// Japanese text needs an embedded TrueType font. The builtin Helvetica
/// drops every non-Latin glyph and is only used by tests; the server
/// refuses to start without a font file.
#[derive(Debug, Clone)]
pub enum ReportFont {
    Builtin,
    External(Arc<Vec<u8>>),
}

impl ReportFont {
    /// Read a TTF/OTF file once at startup.
    pub fn load(path: &Path) -> Result<Self, ExportError> {
        let bytes = std::fs::read(path)
            .map_err(|e| ExportError::Font(format!("{}: {e}", path.display())))?;
        if bytes.is_empty() {
            return Err(ExportError::Font(format!("{}: empty file", path.display())));
        }
        tracing::info!(path = %path.display(), bytes = bytes.len(), "loaded report font");
        Ok(Self::External(Arc::new(bytes)))
    }
}
