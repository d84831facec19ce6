use chrono::{DateTime, Utc};
use colored::Colorize;
use rmdify::api::{CmdMessage, ListedDocument, MessageLevel};
use rmdify::config::{RmdifyConfig, CONFIG_KEYS};
use rmdify::model::Document;
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 100;
const COMPACT_WIDTH: usize = 40;
const TIME_WIDTH: usize = 14;
const STAR_MARKER: &str = "★";
const EXCERPT_CHARS: usize = 50;

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

/// Title banner followed by a body.
pub(super) fn print_document(doc: &Document, body: &str) {
    println!("{}", doc.title.bold());
    println!("--------------------------------");
    println!("{}", body);
}

pub(super) fn print_page(title: &str, body: &str) {
    println!("{}", title.bold());
    let rest = body.strip_prefix(title).unwrap_or(body).trim_start_matches('\n');
    if !rest.is_empty() {
        println!();
        println!("{}", rest);
    }
}

pub(super) fn print_config(config: &RmdifyConfig) {
    for key in CONFIG_KEYS {
        if let Ok(value) = config.get(key) {
            println!("{} = {}", key, value);
        }
    }
}

/// One line per document: index, title and excerpt, star, age.
pub(super) fn print_documents(docs: &[ListedDocument]) {
    if docs.is_empty() {
        println!("No documents found.");
        return;
    }

    for listed in docs {
        let idx_str = format!("{}. ", listed.index);
        let right_suffix = if listed.starred {
            format!("{} ", STAR_MARKER)
        } else {
            "  ".to_string()
        };

        let excerpt = listed.document.excerpt(EXCERPT_CHARS);
        let title_content = if excerpt.is_empty() {
            listed.document.title.clone()
        } else {
            format!("{} {}", listed.document.title, excerpt)
        };

        let fixed_width = 4 + idx_str.width() + right_suffix.width() + TIME_WIDTH;
        let available = LINE_WIDTH.saturating_sub(fixed_width);
        let title_display = truncate_to_width(&title_content, available);
        let padding = available.saturating_sub(title_display.width());

        println!(
            "    {}{}{}{}{}",
            idx_str,
            title_display,
            " ".repeat(padding),
            right_suffix.yellow(),
            format_time_ago(listed.document.last_modified).dimmed()
        );
    }
}

/// Narrow listing for the mobile shell: index, star and title only.
pub(super) fn print_documents_compact(docs: &[ListedDocument]) {
    if docs.is_empty() {
        println!("No documents found.");
        return;
    }
    for listed in docs {
        let marker = if listed.starred { STAR_MARKER } else { " " };
        let line = format!("{}. {} {}", listed.index, marker, listed.document.title);
        println!("{}", truncate_to_width(&line, COMPACT_WIDTH));
    }
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    let time_str = Formatter::new().convert(duration.to_std().unwrap_or_default());
    format!("{:>width$}", time_str, width = TIME_WIDTH)
}
