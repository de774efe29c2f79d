//! Single-page PDF invoice.

use printpdf::{
    path::PaintMode, BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Rect, Rgb,
};

use super::layout::{Advance, Align, FontStyle, PageGeometry, PageLayout, Rgb8, Surface};
use crate::error::{Field, RenderError};
use crate::format::sanitize_filename;
use crate::invoice::InvoiceRecord;
use crate::settings::Settings;

pub const PAGE_WIDTH_MM: f32 = 130.0;
pub const PAGE_HEIGHT_MM: f32 = 160.0;

const TITLE_H: f32 = 12.0;
const TITLE_GAP: f32 = 5.0;
const LABEL_W: f32 = 35.0;
const ROW_H: f32 = 8.0;
const TOTAL_GAP: f32 = 3.0;
const FOOTER_Y: f32 = 135.0;
const FOOTER_H: f32 = 10.0;

const TITLE_FILL: Rgb8 = Rgb8(245, 245, 245);
const HEADING_TEXT: Rgb8 = Rgb8(0, 51, 102);
const LABEL_TEXT: Rgb8 = Rgb8(50, 50, 50);
const TOTAL_FILL: Rgb8 = Rgb8(230, 230, 250);
const FOOTER_TEXT: Rgb8 = Rgb8(100, 100, 100);

pub struct PdfRenderer {
    footer_note: String,
}

impl PdfRenderer {
    pub fn new(settings: &Settings) -> Self {
        Self {
            footer_note: settings.footer_note.clone(),
        }
    }

    pub fn file_name(record: &InvoiceRecord) -> String {
        sanitize_filename(&format!("invoice_{}.pdf", record.id()))
    }

    pub fn render(&self, record: &InvoiceRecord) -> Result<Vec<u8>, RenderError> {
        let surface = PrintPdfSurface::new(&record.title())?;
        let surface = self.layout(record, surface)?;
        surface.finish()
    }

    /// Lays the invoice out onto any surface and returns it once the page is closed.
    pub fn layout<S: Surface>(&self, record: &InvoiceRecord, surface: S) -> Result<S, RenderError> {
        if record.id().as_str().is_empty() {
            return Err(RenderError::MissingField(Field::Id));
        }
        if record.client().trim().is_empty() {
            return Err(RenderError::MissingField(Field::Client));
        }
        if record.description().trim().is_empty() {
            return Err(RenderError::MissingField(Field::Description));
        }

        let mut page = PageLayout::open(surface, PageGeometry::new(PAGE_WIDTH_MM, PAGE_HEIGHT_MM));

        // Title band
        page.set_fill_color(TITLE_FILL);
        page.set_text_color(HEADING_TEXT);
        page.set_font(FontStyle::Bold, 12.0);
        page.cell(0.0, TITLE_H, &record.title(), Align::Center, true, Advance::NextLine);
        page.gap(TITLE_GAP);

        add_row(&mut page, "Client:", record.client());
        add_row(&mut page, "Service:", record.description());
        add_row(&mut page, "Quantity:", &record.quantity_text());
        add_row(&mut page, "Rate per Unit:", &record.rate_text());

        // Highlighted total; text colour carries over from the last row.
        page.gap(TOTAL_GAP);
        page.set_font(FontStyle::Bold, 11.0);
        page.set_fill_color(TOTAL_FILL);
        page.cell(LABEL_W, ROW_H, "Total:", Align::Left, true, Advance::Right);
        page.cell(0.0, ROW_H, &record.total_text(), Align::Left, true, Advance::NextLine);

        // Fixed footer regardless of how far the rows reached.
        page.set_y(FOOTER_Y);
        page.set_font(FontStyle::Italic, 9.0);
        page.set_text_color(FOOTER_TEXT);
        page.cell(0.0, FOOTER_H, &self.footer_note, Align::Center, false, Advance::NextLine);

        log::debug!("[render] laid out {} ending at y={:.1}mm", record.title(), page.y());
        Ok(page.close())
    }
}

fn add_row<S: Surface>(page: &mut PageLayout<S>, label: &str, value: &str) {
    page.set_font(FontStyle::Bold, 11.0);
    page.set_text_color(LABEL_TEXT);
    page.cell(LABEL_W, ROW_H, label, Align::Left, false, Advance::Right);
    page.set_font(FontStyle::Regular, 11.0);
    page.set_text_color(Rgb8::BLACK);
    page.multi_cell(0.0, ROW_H, value);
}

fn pdf_color(c: Rgb8) -> Color {
    let (r, g, b) = c.to_unit();
    Color::Rgb(Rgb::new(r, g, b, None))
}

/// printpdf backend. Text and rectangle fills share the PDF non-stroking
/// colour, so both are tracked here and applied right before each draw.
struct PrintPdfSurface {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    italic: IndirectFontRef,
    font: FontStyle,
    font_size: f32,
    text_color: Rgb8,
    fill_color: Rgb8,
}

impl PrintPdfSurface {
    fn new(title: &str) -> Result<Self, RenderError> {
        let (doc, page1, layer1) =
            PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
        let layer = doc.get_page(page1).get_layer(layer1);

        let builtin = |font: BuiltinFont| {
            doc.add_builtin_font(font)
                .map_err(|e| RenderError::Pdf(e.to_string()))
        };
        let regular = builtin(BuiltinFont::Helvetica)?;
        let bold = builtin(BuiltinFont::HelveticaBold)?;
        let italic = builtin(BuiltinFont::HelveticaOblique)?;

        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            italic,
            font: FontStyle::Regular,
            font_size: 12.0,
            text_color: Rgb8::BLACK,
            fill_color: Rgb8::WHITE,
        })
    }

    fn current_font(&self) -> &IndirectFontRef {
        match self.font {
            FontStyle::Regular => &self.regular,
            FontStyle::Bold => &self.bold,
            FontStyle::Italic => &self.italic,
        }
    }

    fn finish(self) -> Result<Vec<u8>, RenderError> {
        let mut writer = std::io::BufWriter::new(Vec::<u8>::new());
        self.doc
            .save(&mut writer)
            .map_err(|e| RenderError::Pdf(e.to_string()))?;
        writer
            .into_inner()
            .map_err(|e| RenderError::Pdf(e.to_string()))
    }
}

impl Surface for PrintPdfSurface {
    fn set_font(&mut self, style: FontStyle, size_pt: f32) {
        self.font = style;
        self.font_size = size_pt;
    }

    fn set_text_color(&mut self, color: Rgb8) {
        self.text_color = color;
    }

    fn set_fill_color(&mut self, color: Rgb8) {
        self.fill_color = color;
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.layer.set_fill_color(pdf_color(self.fill_color));
        // printpdf uses a bottom-left origin.
        let rect = Rect::new(
            Mm(x),
            Mm(PAGE_HEIGHT_MM - y - h),
            Mm(x + w),
            Mm(PAGE_HEIGHT_MM - y),
        )
        .with_mode(PaintMode::Fill);
        self.layer.add_rect(rect);
    }

    fn text(&mut self, x: f32, y: f32, text: &str) {
        self.layer.set_fill_color(pdf_color(self.text_color));
        self.layer.use_text(
            text,
            self.font_size,
            Mm(x),
            Mm(PAGE_HEIGHT_MM - y),
            self.current_font(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::InvoiceId;
    use crate::render::layout::{DrawOp, RecordingSurface};

    fn record(description: &str) -> InvoiceRecord {
        InvoiceRecord::with_id(
            InvoiceId::parse("abc12345").unwrap(),
            "Acme",
            description,
            "hours",
            2.0,
            50.0,
            "USD",
        )
        .unwrap()
    }

    fn ops_for(record: &InvoiceRecord) -> Vec<DrawOp> {
        PdfRenderer::new(&Settings::default())
            .layout(record, RecordingSurface::new())
            .unwrap()
            .into_ops()
    }

    fn text_op<'a>(ops: &'a [DrawOp], wanted: &str) -> &'a DrawOp {
        ops.iter()
            .find(|op| matches!(op, DrawOp::Text { text, .. } if text == wanted))
            .unwrap_or_else(|| panic!("no text {wanted:?} in {ops:#?}"))
    }

    fn text_y(ops: &[DrawOp], wanted: &str) -> f32 {
        match text_op(ops, wanted) {
            DrawOp::Text { y, .. } => *y,
            DrawOp::Rect { .. } => unreachable!(),
        }
    }

    #[test]
    fn title_and_total_lines() {
        let ops = ops_for(&record("Logo design"));

        match text_op(&ops, "Invoice #abc12345") {
            DrawOp::Text { style, size, color, .. } => {
                assert_eq!(*style, FontStyle::Bold);
                assert_eq!(*size, 12.0);
                assert_eq!(*color, HEADING_TEXT);
            }
            DrawOp::Rect { .. } => unreachable!(),
        }
        match text_op(&ops, "USD 100.0") {
            DrawOp::Text { style, .. } => assert_eq!(*style, FontStyle::Bold),
            DrawOp::Rect { .. } => unreachable!(),
        }
        for expected in ["Acme", "Logo design", "2.0 hours", "USD 50.0", "Total:", "Thank you!"] {
            text_op(&ops, expected);
        }
    }

    #[test]
    fn filled_bands() {
        let ops = ops_for(&record("Logo design"));
        let rects: Vec<_> = ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Rect { x, y, w, h, color } => Some((*x, *y, *w, *h, *color)),
                DrawOp::Text { .. } => None,
            })
            .collect();
        assert_eq!(
            rects,
            vec![
                (10.0, 10.0, 110.0, 12.0, TITLE_FILL),
                // 12 title + 5 gap + 4 rows of 8 + 3 gap
                (10.0, 62.0, 35.0, 8.0, TOTAL_FILL),
                (45.0, 62.0, 75.0, 8.0, TOTAL_FILL),
            ]
        );
    }

    #[test]
    fn labels_use_dark_gray_and_values_black() {
        let ops = ops_for(&record("Logo design"));
        match text_op(&ops, "Service:") {
            DrawOp::Text { color, style, .. } => {
                assert_eq!(*color, LABEL_TEXT);
                assert_eq!(*style, FontStyle::Bold);
            }
            DrawOp::Rect { .. } => unreachable!(),
        }
        match text_op(&ops, "Logo design") {
            DrawOp::Text { color, style, x, .. } => {
                assert_eq!(*color, Rgb8::BLACK);
                assert_eq!(*style, FontStyle::Regular);
                assert_eq!(*x, 46.0);
            }
            DrawOp::Rect { .. } => unreachable!(),
        }
    }

    #[test]
    fn footer_is_fixed_near_the_bottom() {
        let short = ops_for(&record("Logo design"));
        let long = ops_for(&record(&"Extended brand work ".repeat(12)));

        let footer_short = text_y(&short, "Thank you!");
        assert_eq!(footer_short, text_y(&long, "Thank you!"));
        assert!(footer_short > FOOTER_Y && footer_short < FOOTER_Y + FOOTER_H);

        match text_op(&short, "Thank you!") {
            DrawOp::Text { style, size, color, .. } => {
                assert_eq!(*style, FontStyle::Italic);
                assert_eq!(*size, 9.0);
                assert_eq!(*color, FOOTER_TEXT);
            }
            DrawOp::Rect { .. } => unreachable!(),
        }
    }

    #[test]
    fn wrapped_description_pushes_following_rows_down() {
        let short = ops_for(&record("Logo design"));
        let long = ops_for(&record(&"Extended brand work ".repeat(12)));
        let shift = text_y(&long, "Quantity:") - text_y(&short, "Quantity:");
        let rows = (shift / ROW_H).round();
        assert!(rows >= 1.0);
        assert!((rows * ROW_H - shift).abs() < 1e-3);
    }

    #[test]
    fn custom_footer_note() {
        let settings = Settings {
            footer_note: "Payment due in 14 days".to_string(),
            ..Settings::default()
        };
        let ops = PdfRenderer::new(&settings)
            .layout(&record("Logo design"), RecordingSurface::new())
            .unwrap()
            .into_ops();
        text_op(&ops, "Payment due in 14 days");
    }

    #[test]
    fn renders_pdf_bytes() {
        let bytes = PdfRenderer::new(&Settings::default())
            .render(&record("Logo design"))
            .unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
        assert!(bytes.len() > 200);
    }

    #[test]
    fn suggested_file_name() {
        assert_eq!(PdfRenderer::file_name(&record("x")), "invoice_abc12345.pdf");
    }
}
