use super::layout::{FontFace, PageLayout};
use crate::error::{Result, RmdifyError};
use printpdf::{BuiltinFont, IndirectFontRef, Line, Mm, PdfDocument, Point};

const LAYER_NAME: &str = "Text";

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    mono: IndirectFontRef,
}

impl Fonts {
    fn get(&self, face: FontFace) -> &IndirectFontRef {
        match face {
            FontFace::Regular => &self.regular,
            FontFace::Bold => &self.bold,
            FontFace::Mono => &self.mono,
        }
    }
}

fn pdf_error<E: std::fmt::Debug>(e: E) -> RmdifyError {
    RmdifyError::Export(format!("PDF generation failed: {:?}", e))
}

/// Write a laid-out document as PDF bytes using the built-in base-14 fonts.
pub fn render(title: &str, layout: &PageLayout) -> Result<Vec<u8>> {
    let width = Mm(layout.setup.width_mm);
    let height = Mm(layout.setup.height_mm);
    let (doc, first_page, first_layer) = PdfDocument::new(title, width, height, LAYER_NAME);

    let fonts = Fonts {
        regular: doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(pdf_error)?,
        bold: doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(pdf_error)?,
        mono: doc
            .add_builtin_font(BuiltinFont::Courier)
            .map_err(pdf_error)?,
    };

    for (i, page) in layout.pages.iter().enumerate() {
        let layer = if i == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page_index, layer_index) = doc.add_page(width, height, LAYER_NAME);
            doc.get_page(page_index).get_layer(layer_index)
        };

        // PDF y runs bottom-up
        let flip = |y_mm: f32| Mm(layout.setup.height_mm - y_mm);

        for line in &page.lines {
            if line.text.is_empty() {
                continue;
            }
            layer.use_text(
                line.text.clone(),
                line.style.size_pt,
                Mm(line.x_mm),
                flip(line.y_mm),
                fonts.get(line.style.face),
            );
        }

        if !page.rules.is_empty() {
            layer.set_outline_thickness(0.5);
        }
        for rule in &page.rules {
            layer.add_line(Line {
                points: vec![
                    (Point::new(Mm(rule.x1_mm), flip(rule.y_mm)), false),
                    (Point::new(Mm(rule.x2_mm), flip(rule.y_mm)), false),
                ],
                is_closed: false,
            });
        }
    }

    doc.save_to_bytes().map_err(pdf_error)
}
