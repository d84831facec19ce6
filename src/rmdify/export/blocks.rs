//! Markdown to a flat list of layout blocks.
//!
//! Inline markup (emphasis, code spans, links) is reduced to its text by the
//! parser, so no marker stripping happens here. Code blocks keep their lines
//! verbatim.

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading { level: u8, text: String },
    Paragraph { text: String, quote_depth: u8 },
    ListItem { marker: String, text: String, depth: u8 },
    Code { lines: Vec<String> },
    TableRow { cells: Vec<String>, header: bool },
    Rule,
}

struct OpenItem {
    marker: String,
    depth: u8,
}

#[derive(Default)]
struct BlockBuilder {
    blocks: Vec<Block>,
    text: String,
    heading: Option<u8>,
    code: Option<String>,
    lists: Vec<Option<u64>>,
    item: Option<OpenItem>,
    quote_depth: u8,
    cells: Vec<String>,
    in_table_head: bool,
}

impl BlockBuilder {
    fn take_text(&mut self) -> String {
        let text = std::mem::take(&mut self.text);
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    fn push_text(&mut self, text: &str) {
        match self.code.as_mut() {
            Some(code) => code.push_str(text),
            None => self.text.push_str(text),
        }
    }

    fn flush_item(&mut self) {
        if let Some(item) = self.item.take() {
            let text = self.take_text();
            self.blocks.push(Block::ListItem {
                marker: item.marker,
                text,
                depth: item.depth,
            });
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Heading { level, .. } => {
                self.heading = Some(heading_level(level));
                self.text.clear();
            }
            Tag::Paragraph => {
                if self.item.is_some() && !self.text.is_empty() {
                    self.text.push(' ');
                } else if self.item.is_none() {
                    self.text.clear();
                }
            }
            Tag::List(start) => {
                // A nested list ends the parent item's own text
                self.flush_item();
                self.lists.push(start);
            }
            Tag::Item => {
                self.flush_item();
                let depth = u8::try_from(self.lists.len().saturating_sub(1)).unwrap_or(u8::MAX);
                let marker = match self.lists.last_mut() {
                    Some(Some(n)) => {
                        let marker = format!("{}. ", n);
                        *n += 1;
                        marker
                    }
                    _ => "• ".to_string(),
                };
                self.item = Some(OpenItem { marker, depth });
                self.text.clear();
            }
            Tag::CodeBlock(_) => {
                self.flush_item();
                self.code = Some(String::new());
            }
            Tag::BlockQuote { .. } => self.quote_depth = self.quote_depth.saturating_add(1),
            Tag::TableHead => self.in_table_head = true,
            Tag::TableCell => self.text.clear(),
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Heading(_) => {
                let text = self.take_text();
                let level = self.heading.take().unwrap_or(1);
                self.blocks.push(Block::Heading { level, text });
            }
            TagEnd::Paragraph => {
                if self.item.is_none() {
                    let text = self.take_text();
                    if !text.is_empty() {
                        self.blocks.push(Block::Paragraph {
                            text,
                            quote_depth: self.quote_depth,
                        });
                    }
                }
            }
            TagEnd::Item => self.flush_item(),
            TagEnd::List { .. } => {
                self.flush_item();
                self.lists.pop();
            }
            TagEnd::CodeBlock => {
                if let Some(code) = self.code.take() {
                    let lines = code.lines().map(str::to_string).collect();
                    self.blocks.push(Block::Code { lines });
                }
            }
            TagEnd::BlockQuote { .. } => self.quote_depth = self.quote_depth.saturating_sub(1),
            TagEnd::TableCell => {
                let cell = self.take_text();
                self.cells.push(cell);
            }
            TagEnd::TableHead | TagEnd::TableRow => {
                let cells = std::mem::take(&mut self.cells);
                self.blocks.push(Block::TableRow {
                    cells,
                    header: self.in_table_head,
                });
                self.in_table_head = false;
            }
            _ => {}
        }
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) | Event::Code(text) => self.push_text(&text),
            Event::SoftBreak | Event::HardBreak => self.push_text(" "),
            Event::Rule => self.blocks.push(Block::Rule),
            Event::TaskListMarker(done) => {
                self.text.push_str(if done { "[x] " } else { "[ ] " });
            }
            _ => {}
        }
    }
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Parse Markdown into layout blocks, in document order.
pub fn parse(markdown: &str) -> Vec<Block> {
    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS;
    let mut builder = BlockBuilder::default();
    for event in Parser::new_ext(markdown, options) {
        builder.event(event);
    }
    builder.flush_item();
    builder.blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn para(text: &str) -> Block {
        Block::Paragraph {
            text: text.into(),
            quote_depth: 0,
        }
    }

    #[test]
    fn headings_and_paragraphs() {
        let blocks = parse("# One\n\n## Two\n\nSome *emphasis* and `code`.");
        assert_eq!(
            blocks,
            vec![
                Block::Heading {
                    level: 1,
                    text: "One".into()
                },
                Block::Heading {
                    level: 2,
                    text: "Two".into()
                },
                para("Some emphasis and code."),
            ]
        );
    }

    #[test]
    fn soft_breaks_join_lines() {
        assert_eq!(parse("first\nsecond"), vec![para("first second")]);
    }

    #[test]
    fn fenced_code_is_kept_verbatim() {
        let blocks = parse("```js\nconst a = 1;\n  indented();\n```");
        assert_eq!(
            blocks,
            vec![Block::Code {
                lines: vec!["const a = 1;".into(), "  indented();".into()]
            }]
        );
    }

    #[test]
    fn bullet_and_ordered_lists() {
        let blocks = parse("- **a**\n- b\n\n3. x\n4. y");
        assert_eq!(
            blocks,
            vec![
                Block::ListItem {
                    marker: "• ".into(),
                    text: "a".into(),
                    depth: 0
                },
                Block::ListItem {
                    marker: "• ".into(),
                    text: "b".into(),
                    depth: 0
                },
                Block::ListItem {
                    marker: "3. ".into(),
                    text: "x".into(),
                    depth: 0
                },
                Block::ListItem {
                    marker: "4. ".into(),
                    text: "y".into(),
                    depth: 0
                },
            ]
        );
    }

    #[test]
    fn nested_list_items_get_depth() {
        let blocks = parse("- parent\n  - child\n- next");
        assert_eq!(
            blocks,
            vec![
                Block::ListItem {
                    marker: "• ".into(),
                    text: "parent".into(),
                    depth: 0
                },
                Block::ListItem {
                    marker: "• ".into(),
                    text: "child".into(),
                    depth: 1
                },
                Block::ListItem {
                    marker: "• ".into(),
                    text: "next".into(),
                    depth: 0
                },
            ]
        );
    }

    #[test]
    fn task_items_show_state() {
        let blocks = parse("- [x] done\n- [ ] todo");
        assert!(matches!(&blocks[0], Block::ListItem { text, .. } if text == "[x] done"));
        assert!(matches!(&blocks[1], Block::ListItem { text, .. } if text == "[ ] todo"));
    }

    #[test]
    fn deep_quote_nesting_saturates() {
        let blocks = parse(&format!("{} deep", ">".repeat(300)));
        assert_eq!(
            blocks,
            vec![Block::Paragraph {
                text: "deep".into(),
                quote_depth: u8::MAX
            }]
        );
    }

    #[test]
    fn quotes_rules_and_tables() {
        let blocks = parse("> quoted\n\n---\n\n| a | b |\n|---|---|\n| 1 | 2 |");
        assert_eq!(
            blocks,
            vec![
                Block::Paragraph {
                    text: "quoted".into(),
                    quote_depth: 1
                },
                Block::Rule,
                Block::TableRow {
                    cells: vec!["a".into(), "b".into()],
                    header: true
                },
                Block::TableRow {
                    cells: vec!["1".into(), "2".into()],
                    header: false
                },
            ]
        );
    }
}
