//! Page layout for PDF export.
//!
//! Blocks are placed top to bottom on fixed-size pages. Text is wrapped with
//! an average glyph width per font face (no real font metrics), and a new page
//! starts whenever the next line would cross the bottom margin.

use super::blocks::Block;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const PT_TO_MM: f32 = 0.352_778;
const BODY_SIZE: f32 = 11.0;
const CODE_SIZE: f32 = 10.0;
const BODY_ADVANCE: f32 = 6.0;
const CODE_ADVANCE: f32 = 5.0;
const BLOCK_GAP: f32 = 5.0;
const INDENT: f32 = 6.0;
// Deeper nesting is drawn at this level so text stays on the page
pub const MAX_INDENT_LEVEL: u8 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontFace {
    Regular,
    Bold,
    Mono,
}

impl FontFace {
    /// Average advance of one glyph as a fraction of the font size.
    fn glyph_factor(self) -> f32 {
        match self {
            FontFace::Regular => 0.5,
            FontFace::Bold => 0.55,
            FontFace::Mono => 0.6,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub face: FontFace,
    pub size_pt: f32,
}

impl TextStyle {
    const BODY: TextStyle = TextStyle {
        face: FontFace::Regular,
        size_pt: BODY_SIZE,
    };
    const CODE: TextStyle = TextStyle {
        face: FontFace::Mono,
        size_pt: CODE_SIZE,
    };

    fn heading(level: u8) -> (TextStyle, f32) {
        let (size_pt, advance) = match level {
            1 => (24.0, 12.0),
            2 => (18.0, 10.0),
            3 => (14.0, 8.0),
            _ => (12.0, 7.0),
        };
        (
            TextStyle {
                face: FontFace::Bold,
                size_pt,
            },
            advance,
        )
    }

    fn text_width_mm(&self, text: &str) -> f32 {
        text.width() as f32 * self.char_width_mm()
    }

    fn char_width_mm(&self) -> f32 {
        self.size_pt * self.face.glyph_factor() * PT_TO_MM
    }
}

/// A line of text positioned on a page. `y_mm` is the baseline, measured
/// from the top edge.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    pub x_mm: f32,
    pub y_mm: f32,
    pub style: TextStyle,
}

/// A horizontal rule, `y_mm` from the top edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedRule {
    pub x1_mm: f32,
    pub x2_mm: f32,
    pub y_mm: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub lines: Vec<PlacedLine>,
    pub rules: Vec<PlacedRule>,
}

impl Page {
    fn is_empty(&self) -> bool {
        self.lines.is_empty() && self.rules.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSetup {
    pub width_mm: f32,
    pub height_mm: f32,
    pub margin_mm: f32,
}

impl PageSetup {
    /// A4 portrait with 20 mm margins.
    pub fn a4() -> Self {
        Self {
            width_mm: 210.0,
            height_mm: 297.0,
            margin_mm: 20.0,
        }
    }

    pub fn printable_width(&self) -> f32 {
        self.width_mm - self.margin_mm * 2.0
    }

    fn bottom(&self) -> f32 {
        self.height_mm - self.margin_mm
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    pub setup: PageSetup,
    pub pages: Vec<Page>,
}

struct Cursor {
    setup: PageSetup,
    pages: Vec<Page>,
    y: f32,
}

impl Cursor {
    fn new(setup: PageSetup) -> Self {
        Self {
            setup,
            pages: vec![Page::default()],
            y: setup.margin_mm,
        }
    }

    fn page(&mut self) -> &mut Page {
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    /// Reserve `advance` mm of vertical space, breaking the page if needed.
    /// Returns the top of the reserved band.
    fn reserve(&mut self, advance: f32) -> f32 {
        let current_empty = self.pages.last().map(Page::is_empty).unwrap_or(true);
        if self.y + advance > self.setup.bottom() && !current_empty {
            self.pages.push(Page::default());
            self.y = self.setup.margin_mm;
        }
        let top = self.y;
        self.y += advance;
        top
    }

    fn line(&mut self, text: String, x_mm: f32, style: TextStyle, advance: f32) {
        let top = self.reserve(advance);
        let baseline = top + advance * 0.8;
        self.page().lines.push(PlacedLine {
            text,
            x_mm,
            y_mm: baseline,
            style,
        });
    }

    fn gap(&mut self) {
        // No leading space at the top of a page
        if self.y > self.setup.margin_mm {
            self.y += BLOCK_GAP;
        }
    }
}

/// Lay out blocks on pages. Always returns at least one (possibly empty) page.
pub fn layout(blocks: &[Block], setup: &PageSetup) -> PageLayout {
    let mut cursor = Cursor::new(*setup);
    let left = setup.margin_mm;
    let width = setup.printable_width();
    let mut previous: Option<&Block> = None;

    for block in blocks {
        // Consecutive list items and table rows stay tight
        let tight = matches!(
            (previous, block),
            (Some(Block::ListItem { .. }), Block::ListItem { .. })
                | (Some(Block::TableRow { .. }), Block::TableRow { .. })
        );
        if previous.is_some() && !tight {
            cursor.gap();
        }

        match block {
            Block::Heading { level, text } => {
                let (style, advance) = TextStyle::heading(*level);
                for line in wrap(text, width, &style) {
                    cursor.line(line, left, style, advance);
                }
            }
            Block::Paragraph { text, quote_depth } => {
                let indent = indent_mm(*quote_depth);
                for line in wrap(text, width - indent, &TextStyle::BODY) {
                    cursor.line(line, left + indent, TextStyle::BODY, BODY_ADVANCE);
                }
            }
            Block::ListItem {
                marker,
                text,
                depth,
            } => {
                let style = TextStyle::BODY;
                let indent = indent_mm(*depth);
                let marker_width = style.text_width_mm(marker);
                let lines = wrap(text, width - indent - marker_width, &style);
                for (i, line) in lines.into_iter().enumerate() {
                    if i == 0 {
                        cursor.line(format!("{}{}", marker, line), left + indent, style, BODY_ADVANCE);
                    } else {
                        cursor.line(line, left + indent + marker_width, style, BODY_ADVANCE);
                    }
                }
            }
            Block::Code { lines } => {
                for line in lines {
                    for chunk in split_to_width(line, width, &TextStyle::CODE) {
                        cursor.line(chunk, left, TextStyle::CODE, CODE_ADVANCE);
                    }
                }
            }
            Block::TableRow { cells, header } => {
                let style = if *header {
                    TextStyle {
                        face: FontFace::Bold,
                        size_pt: BODY_SIZE,
                    }
                } else {
                    TextStyle::BODY
                };
                for line in wrap(&cells.join(" | "), width, &style) {
                    cursor.line(line, left, style, BODY_ADVANCE);
                }
            }
            Block::Rule => {
                let top = cursor.reserve(BODY_ADVANCE);
                cursor.page().rules.push(PlacedRule {
                    x1_mm: left,
                    x2_mm: left + width,
                    y_mm: top + BODY_ADVANCE / 2.0,
                });
            }
        }
        previous = Some(block);
    }

    PageLayout {
        setup: *setup,
        pages: cursor.pages,
    }
}

fn indent_mm(depth: u8) -> f32 {
    f32::from(depth.min(MAX_INDENT_LEVEL)) * INDENT
}

/// Greedy word wrap. Words wider than a full line are split by character.
/// Empty text yields a single empty line.
fn wrap(text: &str, max_width: f32, style: &TextStyle) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };
        if style.text_width_mm(&candidate) <= max_width {
            current = candidate;
            continue;
        }
        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if style.text_width_mm(word) <= max_width {
            current = word.to_string();
        } else {
            let mut pieces = split_to_width(word, max_width, style);
            current = pieces.pop().unwrap_or_default();
            lines.extend(pieces);
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Hard split by character, keeping whitespace as-is.
fn split_to_width(text: &str, max_width: f32, style: &TextStyle) -> Vec<String> {
    let char_width = style.char_width_mm();
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_width = 0.0;

    for c in text.chars() {
        let w = c.width().unwrap_or(0) as f32 * char_width;
        if current_width + w > max_width && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current_width = 0.0;
        }
        current.push(c);
        current_width += w;
    }
    chunks.push(current);
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::blocks;

    fn lay(markdown: &str) -> PageLayout {
        layout(&blocks::parse(markdown), &PageSetup::a4())
    }

    fn all_text(layout: &PageLayout) -> Vec<String> {
        layout
            .pages
            .iter()
            .flat_map(|p| p.lines.iter().map(|l| l.text.clone()))
            .collect()
    }

    #[test]
    fn empty_document_has_one_page() {
        let result = lay("");
        assert_eq!(result.pages.len(), 1);
        assert!(result.pages[0].lines.is_empty());
    }

    #[test]
    fn headings_use_bold_sizes() {
        let result = lay("# Big\n\n## Medium\n\n### Small\n\nBody");
        let lines = &result.pages[0].lines;
        assert_eq!(lines[0].style.size_pt, 24.0);
        assert_eq!(lines[1].style.size_pt, 18.0);
        assert_eq!(lines[2].style.size_pt, 14.0);
        assert_eq!(lines[0].style.face, FontFace::Bold);
        assert_eq!(lines[3].style, TextStyle::BODY);
    }

    #[test]
    fn long_paragraph_wraps_within_margins() {
        let text = "word ".repeat(200);
        let result = lay(&text);
        let setup = PageSetup::a4();
        let lines = &result.pages[0].lines;
        assert!(lines.len() > 1);
        for line in lines {
            let right = line.x_mm + line.style.text_width_mm(&line.text);
            assert!(right <= setup.width_mm - setup.margin_mm + 0.01);
        }
    }

    #[test]
    fn content_longer_than_a_page_paginates() {
        let markdown = (1..=120)
            .map(|i| format!("Paragraph number {}", i))
            .collect::<Vec<_>>()
            .join("\n\n");
        let result = lay(&markdown);
        assert!(result.pages.len() > 1);

        let setup = PageSetup::a4();
        for page in &result.pages {
            for line in &page.lines {
                assert!(line.y_mm >= setup.margin_mm);
                assert!(line.y_mm <= setup.height_mm - setup.margin_mm);
            }
        }
        // Nothing lost across the break
        assert_eq!(all_text(&result).len(), 120);
    }

    #[test]
    fn fenced_code_is_rendered_verbatim_in_mono() {
        let result = lay("Intro\n\n```\nlet x = 1;\n    nested();\n```");
        let code: Vec<_> = result.pages[0]
            .lines
            .iter()
            .filter(|l| l.style.face == FontFace::Mono)
            .map(|l| l.text.as_str())
            .collect();
        assert_eq!(code, vec!["let x = 1;", "    nested();"]);
    }

    #[test]
    fn list_items_carry_markers_and_indent() {
        let result = lay("- one\n  - two\n1. first");
        let lines = &result.pages[0].lines;
        assert_eq!(lines[0].text, "• one");
        assert_eq!(lines[1].text, "• two");
        assert!(lines[1].x_mm > lines[0].x_mm);
        assert_eq!(lines[2].text, "1. first");
    }

    #[test]
    fn deep_nesting_stays_inside_margins() {
        let setup = PageSetup::a4();
        let quoted = format!("{} {}", ">".repeat(40), "nested words ".repeat(30));
        let listed = (0..40)
            .map(|i| format!("{}- level {}", "  ".repeat(i), i))
            .collect::<Vec<_>>()
            .join("\n");

        for markdown in [quoted, listed] {
            let result = lay(&markdown);
            for line in &result.pages[0].lines {
                assert!(line.x_mm <= setup.margin_mm + f32::from(MAX_INDENT_LEVEL) * INDENT);
                let right = line.x_mm + line.style.text_width_mm(&line.text);
                assert!(right <= setup.width_mm - setup.margin_mm + 0.01);
            }
        }
    }

    #[test]
    fn rules_are_placed() {
        let result = lay("above\n\n---\n\nbelow");
        assert_eq!(result.pages[0].rules.len(), 1);
    }

    #[test]
    fn overlong_word_is_split() {
        let style = TextStyle::BODY;
        let lines = wrap(&"x".repeat(400), 50.0, &style);
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| style.text_width_mm(l) <= 50.0 + 0.01));
        assert_eq!(lines.concat().len(), 400);
    }
}
