use serde::Serialize;
use tera::{Context, Tera};

use crate::error::ExportError;

const TEMPLATES: [(&str, &str); 4] = [
    ("base.html", include_str!("../templates/base.html")),
    ("gate.html", include_str!("../templates/gate.html")),
    ("notice.html", include_str!("../templates/notice.html")),
    ("results.html", include_str!("../templates/results.html")),
];

/// Compiled page templates. Built once at startup and shared.
pub struct PageRenderer {
    tera: Tera,
}

impl PageRenderer {
    pub fn new() -> Result<Self, ExportError> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES.to_vec())
            .map_err(|e| ExportError::TemplateParse(e.to_string()))?;
        Ok(Self { tera })
    }

    /// Render `template_name` with `page` as the context. Output is
    /// HTML-escaped.
    pub fn render<T: Serialize>(&self, template_name: &str, page: &T) -> Result<String, ExportError> {
        let context = Context::from_serialize(page)?;
        Ok(self.tera.render(template_name, &context)?)
    }
}
