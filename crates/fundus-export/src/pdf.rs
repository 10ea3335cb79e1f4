use std::io::Cursor;

use printpdf::image_crate::{self, DynamicImage};
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerReference, Point, Polygon, Rgb,
};
use tracing::warn;

use fundus_core::messages;
use fundus_core::report::ScreeningReport;

use crate::barcode::{bar_runs, code128_modules};
use crate::error::ExportError;
use crate::sections::{findings, profile_rows};
use crate::styles::{ReportFont, ReportStyles};

const PT_TO_MM: f32 = 0.3528;
const IMAGE_DPI: f32 = 300.0;

/// Fetched image bytes for each eye. `None` when the record has no image or
/// the fetch failed.
#[derive(Debug, Clone, Default)]
pub struct ReportImages {
    pub right: Option<Vec<u8>>,
    pub left: Option<Vec<u8>>,
}

/// Lay out the one-to-two page A4 summary and return the PDF bytes.
///
/// Images that fail to decode are replaced by a caption; only document-level
/// failures (font, barcode, serialization) are errors.
pub fn generate_pdf(
    report: &ScreeningReport,
    images: &ReportImages,
    font: &ReportFont,
    styles: &ReportStyles,
) -> Result<Vec<u8>, ExportError> {
    let (doc, page, layer) = PdfDocument::new(
        messages::REPORT_TITLE,
        Mm(styles.page_width),
        Mm(styles.page_height),
        "content",
    );

    let (regular, bold) = match font {
        ReportFont::External(bytes) => {
            let f = doc
                .add_external_font(Cursor::new(bytes.as_slice()))
                .map_err(|e| ExportError::Font(e.to_string()))?;
            (f.clone(), f)
        }
        ReportFont::Builtin => (
            doc.add_builtin_font(BuiltinFont::Helvetica)?,
            doc.add_builtin_font(BuiltinFont::HelveticaBold)?,
        ),
    };

    {
        let mut canvas = Canvas {
            doc: &doc,
            layer: doc.get_page(page).get_layer(layer),
            styles,
            regular,
            bold,
            y: styles.page_height - styles.margin_top,
        };

        canvas.title(messages::REPORT_TITLE);
        canvas.barcode(report.access_code.as_str())?;

        canvas.heading("基本情報");
        for row in profile_rows(report) {
            canvas.body(&format!("{}: {}", row.label, row.value));
        }
        canvas.gap(4.0);

        canvas.heading("撮影画像");
        canvas.thumbnails(report, images);

        canvas.heading("AIによる目の健康評価");
        if report.pending {
            canvas.body(messages::ANALYSIS_PENDING);
        } else {
            for finding in findings(report) {
                canvas.subheading(&finding.heading);
                for line in &finding.lines {
                    canvas.body(line);
                }
            }
        }
        canvas.gap(4.0);

        for line in messages::DISCLAIMER {
            canvas.note(&format!("注：{line}"));
        }
    }

    Ok(doc.save_to_bytes()?)
}

/// Top-down text cursor over the current page. Starts a new page when the
/// next block would cross the bottom margin.
struct Canvas<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    styles: &'a ReportStyles,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    y: f32,
}

impl Canvas<'_> {
    fn ensure_space(&mut self, height: f32) {
        if self.y - height >= self.styles.margin_bottom {
            return;
        }
        let (page, layer) = self.doc.add_page(
            Mm(self.styles.page_width),
            Mm(self.styles.page_height),
            "content",
        );
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = self.styles.page_height - self.styles.margin_top;
    }

    fn gap(&mut self, mm: f32) {
        self.y -= mm;
    }

    fn text_at(&mut self, text: &str, size: f32, x: f32, bold: bool) {
        let line_height = size * PT_TO_MM * 1.5;
        self.ensure_space(line_height);
        self.y -= line_height;
        let font = if bold { &self.bold } else { &self.regular };
        self.layer.use_text(text, size, Mm(x), Mm(self.y), font);
    }

    fn centered(&mut self, text: &str, size: f32, bold: bool) {
        let x = ((self.styles.page_width - text_width(text, size)) / 2.0).max(0.0);
        self.text_at(text, size, x, bold);
    }

    fn title(&mut self, text: &str) {
        self.centered(text, self.styles.title_size, true);
        self.gap(6.0);
    }

    fn heading(&mut self, text: &str) {
        self.gap(2.0);
        self.text_at(text, self.styles.heading_size, self.styles.margin_left, true);
        self.gap(1.0);
    }

    fn subheading(&mut self, text: &str) {
        let x = self.styles.margin_left + self.styles.indent;
        self.text_at(text, self.styles.body_size, x, true);
    }

    fn body(&mut self, text: &str) {
        let x = self.styles.margin_left + self.styles.indent * 2.0;
        self.text_at(text, self.styles.body_size, x, false);
    }

    fn note(&mut self, text: &str) {
        self.text_at(text, self.styles.note_size, self.styles.margin_left, false);
    }

    fn barcode(&mut self, code: &str) -> Result<(), ExportError> {
        let modules = code128_modules(code)?;
        let s = self.styles;
        self.ensure_space(s.barcode_height);

        let module_width = s.barcode_width / modules.len() as f32;
        let left = (s.page_width - s.barcode_width) / 2.0;
        let bottom = self.y - s.barcode_height;

        self.layer
            .set_fill_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));
        for (start, width) in bar_runs(&modules) {
            let x0 = left + start as f32 * module_width;
            let x1 = x0 + width as f32 * module_width;
            self.layer.add_polygon(rect(x0, bottom, x1, self.y));
        }

        self.y = bottom;
        self.gap(2.0);
        self.centered(code, s.note_size, false);
        self.centered(messages::BARCODE_CAPTION, s.note_size, false);
        self.gap(4.0);
        Ok(())
    }

    fn thumbnails(&mut self, report: &ScreeningReport, images: &ReportImages) {
        let slots = [
            (report.images.right.is_some(), images.right.as_deref(), "右目"),
            (report.images.left.is_some(), images.left.as_deref(), "左目"),
        ];
        if slots.iter().all(|(referenced, _, _)| !referenced) {
            self.body(messages::IMAGE_NOT_CAPTURED);
            return;
        }

        let s = self.styles;
        let caption_height = s.body_size * PT_TO_MM * 1.5;
        self.ensure_space(s.thumbnail_size + caption_height);
        let top = self.y;
        let bottom = top - s.thumbnail_size;

        let mut x = s.margin_left + s.indent;
        for (referenced, bytes, label) in slots {
            if !referenced {
                continue;
            }
            let placed = bytes.is_some_and(|b| self.place_image(b, x, bottom, label));
            let caption = if placed {
                label.to_string()
            } else {
                format!("{label}: {}", messages::IMAGE_UNAVAILABLE)
            };
            self.y = bottom;
            self.text_at(&caption, s.body_size, x, false);
            x += s.thumbnail_size + s.thumbnail_gap;
        }
        self.y = bottom - caption_height;
        self.gap(4.0);
    }

    fn place_image(&self, bytes: &[u8], x: f32, y: f32, label: &str) -> bool {
        let decoded = match image_crate::load_from_memory(bytes) {
            Ok(img) => img,
            Err(e) => {
                warn!(eye = label, error = %e, "could not decode eye image");
                return false;
            }
        };
        // Alpha channels are not supported by the PDF image writer.
        let rgb = DynamicImage::ImageRgb8(decoded.to_rgb8());
        let image = Image::from_dynamic_image(&rgb);

        let px_to_mm = 25.4 / IMAGE_DPI;
        let natural_w = image.image.width.0 as f32 * px_to_mm;
        let natural_h = image.image.height.0 as f32 * px_to_mm;
        if natural_w <= 0.0 || natural_h <= 0.0 {
            return false;
        }

        let size = self.styles.thumbnail_size;
        image.add_to_layer(
            self.layer.clone(),
            ImageTransform {
                translate_x: Some(Mm(x)),
                translate_y: Some(Mm(y)),
                scale_x: Some(size / natural_w),
                scale_y: Some(size / natural_h),
                dpi: Some(IMAGE_DPI),
                ..Default::default()
            },
        );
        true
    }
}

fn rect(x0: f32, y0: f32, x1: f32, y1: f32) -> Polygon {
    let corners = [(x0, y0), (x1, y0), (x1, y1), (x0, y1)];
    Polygon {
        rings: vec![
            corners
                .iter()
                .map(|&(x, y)| (Point::new(Mm(x), Mm(y)), false))
                .collect(),
        ],
        mode: PaintMode::Fill,
        winding_order: WindingOrder::NonZero,
    }
}

/// Approximate rendered width in millimetres: half an em for ASCII, a full
/// em for everything else. Only used for centering.
pub fn text_width(text: &str, size_pt: f32) -> f32 {
    let ems: f32 = text
        .chars()
        .map(|c| if c.is_ascii() { 0.5 } else { 1.0 })
        .sum();
    ems * size_pt * PT_TO_MM
}
