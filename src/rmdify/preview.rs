//! Rendered preview of a draft as plain terminal text.

use crate::export::blocks::{self, Block};
use crate::export::layout::MAX_INDENT_LEVEL;

const RULE_WIDTH: usize = 40;

/// Render Markdown for reading: headings underlined, list markers
/// normalized, code indented verbatim.
pub fn render(markdown: &str) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut previous: Option<&Block> = None;
    let parsed = blocks::parse(markdown);

    for block in &parsed {
        let tight = matches!(
            (previous, block),
            (Some(Block::ListItem { .. }), Block::ListItem { .. })
                | (Some(Block::TableRow { .. }), Block::TableRow { .. })
        );
        if previous.is_some() && !tight {
            out.push(String::new());
        }

        match block {
            Block::Heading { level, text } => {
                out.push(text.clone());
                let underline = if *level == 1 { '=' } else { '-' };
                if *level <= 2 {
                    out.push(underline.to_string().repeat(text.chars().count().max(3)));
                }
            }
            Block::Paragraph { text, quote_depth } => {
                let prefix = "> ".repeat(usize::from((*quote_depth).min(MAX_INDENT_LEVEL)));
                out.push(format!("{}{}", prefix, text));
            }
            Block::ListItem {
                marker,
                text,
                depth,
            } => {
                out.push(format!(
                    "{}{}{}",
                    "  ".repeat(usize::from((*depth).min(MAX_INDENT_LEVEL))),
                    marker,
                    text
                ));
            }
            Block::Code { lines } => {
                out.extend(lines.iter().map(|l| format!("    {}", l)));
            }
            Block::TableRow { cells, .. } => out.push(cells.join(" | ")),
            Block::Rule => out.push("─".repeat(RULE_WIDTH)),
        }
        previous = Some(block);
    }

    out.join("\n")
}
